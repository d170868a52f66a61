//! Collapse command implementation

use miette::{IntoDiagnostic, Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::CollapseConfig;
use crate::error::DegloopError;
use crate::executors::{CollapseExecutor, CommandExecutor};

impl FromCommand for CollapseConfig {
    fn from_command(command: Commands) -> Result<Self, DegloopError> {
        match command {
            Commands::Collapse {
                input,
                output,
                engine,
                format,
                quiet,
            } => CollapseConfig::builder()
                .with_input(input)
                .with_output(output)
                .with_format(format.format)
                .with_quiet(quiet)
                .with_engine(engine.to_engine_config()?)
                .build(),
            _ => Err(DegloopError::ConfigurationError {
                message: "Invalid command type for CollapseConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(CollapseConfig);

/// Execute the collapse command
pub fn execute_collapse_command(command: Commands) -> Result<()> {
    let config = CollapseConfig::from_command(command)
        .into_diagnostic()
        .wrap_err("Failed to build collapse configuration")?;
    CollapseExecutor::execute(config)
}
