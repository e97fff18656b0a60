//! Command output
//!
//! Commands print a human-readable summary by default and a JSON document
//! with `--json`.

use goalias_core::AliasWarning;
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_flags(json: bool) -> Self {
        if json { OutputFormat::Json } else { OutputFormat::Human }
    }
}

/// Print `value` as pretty JSON on stdout
pub fn write_output<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    println!("{json}");
    Ok(())
}

/// Result of `goalias generate`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    pub package: String,
    pub import_path: String,
    /// File written, or `None` when the source went to stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub types: usize,
    pub constants: usize,
    pub functions: usize,
    pub warnings: Vec<AliasWarning>,
}

/// What happened to one package of a profile run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PackageStatus {
    Written {
        file: String,
        warnings: Vec<AliasWarning>,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageReport {
    /// Package directory
    pub source: String,
    /// Profile import path, when the source path could be mapped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(flatten)]
    pub status: PackageStatus,
}

/// Result of `goalias profile`
#[derive(Debug, Clone, Serialize)]
pub struct ProfileOutput {
    pub profile: String,
    pub output_root: String,
    pub packages: Vec<PackageReport>,
}

impl ProfileOutput {
    pub fn written(&self) -> usize {
        self.count(|s| matches!(s, PackageStatus::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, PackageStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, PackageStatus::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&PackageStatus) -> bool) -> usize {
        self.packages.iter().filter(|p| predicate(&p.status)).count()
    }

    /// One line per package plus a summary
    pub fn print_human(&self) {
        for report in &self.packages {
            match &report.status {
                PackageStatus::Written { file, warnings } => {
                    println!("wrote {file}");
                    for warning in warnings {
                        println!("  warning: {warning}");
                    }
                }
                PackageStatus::Skipped { reason } => println!("skipped {}: {reason}", report.source),
                PackageStatus::Failed { error } => println!("failed {}: {error}", report.source),
            }
        }
        println!(
            "profile {}: {} written, {} skipped, {} failed",
            self.profile,
            self.written(),
            self.skipped(),
            self.failed()
        );
    }
}
