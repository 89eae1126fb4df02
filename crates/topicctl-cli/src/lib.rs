//! Command-line surface for kafka-topicctl.
//!
//! Parsing lives here rather than in the binary so the command surface and
//! the command runner can be exercised against an in-memory cluster.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use topicctl::{
    AdminConnector, DEFAULT_SNAPSHOT_PATH, ExportOptions, ImportOptions, SessionConfig,
    SyncError, export, import,
};

#[derive(Parser, Debug)]
#[command(
    name = "kafka-topicctl",
    version,
    about = "Export and import Kafka topic configuration",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Write every topic's configuration to a snapshot file
    Export(ExportCmd),
    /// Create the topics listed in a snapshot file
    Import(ImportCmd),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ConnectionArgs {
    /// Kafka bootstrap server, e.g. broker:9092
    #[arg(
        long,
        value_name = "HOST:PORT",
        value_parser = clap::builder::NonEmptyStringValueParser::new()
    )]
    pub bootstrap: String,

    /// Connection timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

impl ConnectionArgs {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.bootstrap.clone()).with_timeout(Duration::from_secs(self.timeout))
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ExportCmd {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Output snapshot file (.json, or .yaml/.yml for YAML)
    #[arg(long, default_value = DEFAULT_SNAPSHOT_PATH)]
    pub out: PathBuf,

    /// Leave out internal topics (names starting with "__")
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub exclude_internal: bool,
}

impl ExportCmd {
    pub fn options(&self) -> ExportOptions {
        ExportOptions {
            output: self.out.clone(),
            exclude_internal: self.exclude_internal,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ImportCmd {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Input snapshot file
    #[arg(long = "in", value_name = "PATH", default_value = DEFAULT_SNAPSHOT_PATH)]
    pub input: PathBuf,

    /// Skip topics that already exist instead of failing
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub if_not_exists: bool,
}

impl ImportCmd {
    pub fn options(&self) -> ImportOptions {
        ImportOptions {
            input: self.input.clone(),
            skip_if_exists: self.if_not_exists,
        }
    }
}

/// Run one command and return the completion line to print.
pub async fn run<C: AdminConnector>(command: &Commands, connector: &C) -> Result<String, SyncError> {
    match command {
        Commands::Export(args) => {
            let report = export(connector, &args.connection.session_config(), &args.options()).await?;
            Ok(format!(
                "Export complete: {} topics written to {}",
                report.exported,
                report.output.display()
            ))
        }
        Commands::Import(args) => {
            let report = import(connector, &args.connection.session_config(), &args.options()).await?;
            Ok(format!(
                "Import complete: {} created, {} skipped",
                report.created.len(),
                report.skipped.len()
            ))
        }
    }
}
