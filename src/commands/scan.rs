//! Scan command implementation

use miette::{IntoDiagnostic, Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::ScanConfig;
use crate::error::DegloopError;
use crate::executors::{CommandExecutor, ScanExecutor};

impl FromCommand for ScanConfig {
    fn from_command(command: Commands) -> Result<Self, DegloopError> {
        match command {
            Commands::Scan {
                input,
                engine,
                format,
                quiet,
            } => ScanConfig::builder()
                .with_input(input)
                .with_format(format.format)
                .with_quiet(quiet)
                .with_engine(engine.to_engine_config()?)
                .build(),
            _ => Err(DegloopError::ConfigurationError {
                message: "Invalid command type for ScanConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(ScanConfig);

/// Execute the scan command
pub fn execute_scan_command(command: Commands) -> Result<()> {
    let config = ScanConfig::from_command(command)
        .into_diagnostic()
        .wrap_err("Failed to build scan configuration")?;
    ScanExecutor::execute(config)
}
