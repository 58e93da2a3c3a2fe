pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::{error::Result, validation::{validate_non_empty_string, validate_path, Validate}};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "customer-import")]
#[command(about = "Import customers from a CSV or JSON file, skipping emails that already exist")]
pub struct CliConfig {
    /// Profile name, selects [profiles.<name>] in the configuration file
    pub profile_name: String,

    /// Source file path (.csv or .json)
    pub source: String,

    /// Path to the TOML configuration file (default: ./customer-import.toml when present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Run against an empty in-memory store; nothing is written to the real store
    #[arg(long)]
    pub dry_run: bool,

    /// Write the run summary as JSON to this path
    #[arg(long)]
    pub report: Option<String>,

    /// Exit with a non-zero code when any record failed
    #[arg(long)]
    pub fail_on_record_errors: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Log process CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("profile-name", &self.profile_name)?;
        validate_path("source", &self.source)?;
        if let Some(report) = &self.report {
            validate_path("report", report)?;
        }
        Ok(())
    }
}
