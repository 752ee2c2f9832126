use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Options forwarded to the form engine's registration call.
///
/// The binder only looks at `required` (to inject the field's own rule when
/// the caller did not supply one); everything else reaches the engine as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<RequiredRule>,
    #[serde(default)]
    pub disabled: bool,
    /// Engine-specific flags.
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

impl RegisterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required(mut self, rule: RequiredRule) -> Self {
        self.required = Some(rule);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether a required rule is present and switched on.
    pub fn is_required(&self) -> bool {
        self.required.as_ref().is_some_and(RequiredRule::is_enabled)
    }

    /// Fill in `rule` unless the caller already chose a required setting.
    pub(crate) fn or_required(mut self, rule: RequiredRule) -> Self {
        if self.required.is_none() {
            self.required = Some(rule);
        }
        self
    }
}

/// Required-selection rule: a plain switch or a switch carrying its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequiredRule {
    Flag(bool),
    Message(String),
}

impl RequiredRule {
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Flag(enabled) => *enabled,
            Self::Message(_) => true,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Flag(_) => None,
            Self::Message(message) => Some(message),
        }
    }
}

impl From<bool> for RequiredRule {
    fn from(enabled: bool) -> Self {
        Self::Flag(enabled)
    }
}

impl From<&str> for RequiredRule {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}
