//! Key derivation for registration names and control identifiers.
//!
//! [`derive`] turns an arbitrary string into a fragment that is safe to use as
//! a group name and as an addressable control id:
//!
//! 1. every character is lowercased;
//! 2. each maximal run of characters that are neither alphabetic nor decimal
//!    digits becomes a single `_`;
//! 3. leading and trailing `_` are trimmed;
//! 4. an input with nothing left derives to `_`.
//!
//! Fragments never contain [`SEPARATOR`], so a composite key built with
//! [`compose`] splits back into exactly the fragments it was built from.
//!
//! Distinct inputs can still derive to the same fragment. Known classes are
//! case-only differences (`"Yes"` / `"yes"`), differences confined to
//! punctuation or whitespace (`"a b"` / `"a-b"` / `"a_b"`), and inputs made only
//! of punctuation. This is accepted and is not detected while binding; the
//! `gridform-lint` tool reports such pairs ahead of time.

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator placed between fragments of a composite key.
pub const SEPARATOR: char = '-';

/// Fragment produced for inputs that contain no alphanumeric characters.
pub const EMPTY_FRAGMENT: &str = "_";

static NON_WORD_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\p{Alphabetic}\p{Nd}]+").expect("fragment regex must compile")
});

/// Derive a deterministic key fragment from `raw`.
pub fn derive(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let replaced = NON_WORD_RUN.replace_all(&lowered, "_");
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        EMPTY_FRAGMENT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Derive every part and join the fragments with [`SEPARATOR`].
pub fn compose<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut key = String::new();
    for part in parts {
        if !key.is_empty() {
            key.push(SEPARATOR);
        }
        key.push_str(&derive(part));
    }
    key
}

/// Append one more derived fragment to an already composed key.
pub fn extend(key: &str, part: &str) -> String {
    let fragment = derive(part);
    let mut out = String::with_capacity(key.len() + 1 + fragment.len());
    out.push_str(key);
    out.push(SEPARATOR);
    out.push_str(&fragment);
    out
}
