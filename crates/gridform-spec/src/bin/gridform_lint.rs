use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gridform_spec::{Catalog, FieldIssue, KeyCollision, generate_schema_json_pretty};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "gridform-lint", about = "Validate gridform field catalog documents")]
struct Cli {
    /// Catalog files to check. `.json` files are read as JSON, anything else as YAML.
    #[arg(required_unless_present = "schema")]
    files: Vec<PathBuf>,

    /// Emit a machine-readable JSON report instead of text.
    #[arg(long)]
    json: bool,

    /// Print the catalog JSON schema and exit.
    #[arg(long)]
    schema: bool,
}

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_error: Option<String>,
    issues: Vec<FieldIssue>,
    collisions: Vec<KeyCollision>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.schema {
        println!("{}", generate_schema_json_pretty()?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut reports = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        reports.push(lint_file(path)?);
    }

    if cli.json {
        let rendered =
            serde_json::to_string_pretty(&reports).context("failed to serialize lint report")?;
        println!("{rendered}");
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    if reports.iter().all(|report| report.ok) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn lint_file(path: &Path) -> Result<FileReport> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog `{}`", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        Catalog::from_json_str(&text).map_err(|err| err.to_string())
    } else {
        Catalog::from_yaml_str(&text).map_err(|err| err.to_string())
    };

    let display = path.display().to_string();
    let catalog = match parsed {
        Ok(catalog) => catalog,
        Err(message) => {
            return Ok(FileReport {
                path: display,
                ok: false,
                parse_error: Some(message),
                issues: Vec::new(),
                collisions: Vec::new(),
            });
        }
    };

    let issues = match catalog.validate() {
        Ok(()) => Vec::new(),
        Err(err) => err.into_issues(),
    };
    Ok(FileReport {
        path: display,
        ok: issues.is_empty(),
        parse_error: None,
        issues,
        collisions: catalog.key_collisions(),
    })
}

fn print_report(report: &FileReport) {
    if let Some(message) = &report.parse_error {
        println!("{}: failed to parse: {message}", report.path);
        return;
    }
    if report.ok {
        println!("{}: ok", report.path);
    } else {
        println!("{}: {} issue(s)", report.path, report.issues.len());
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }
    for collision in &report.collisions {
        println!("  warning: {collision}");
    }
}
