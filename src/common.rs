//! Common functionality shared across commands

use clap::Args;

/// Engine tuning flags shared by multiple commands
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Maximum segment length for cycle participation and dead-end removal
    #[arg(long, env = "DEGLOOP_MAX_LENGTH")]
    pub max_length: Option<f64>,

    /// Never delete a removal candidate longer than this
    #[arg(long, env = "DEGLOOP_TOLERANCE")]
    pub tolerance: Option<f64>,

    /// Decimal places used to canonicalize endpoint coordinates
    #[arg(long, env = "DEGLOOP_PRECISION")]
    pub precision: Option<u32>,

    /// Cycle orders to process, ascending subset of 1..=4
    #[arg(long, env = "DEGLOOP_ORDERS", value_delimiter = ',')]
    pub orders: Vec<usize>,

    /// Category priority table, most important first
    #[arg(long, env = "DEGLOOP_HIERARCHY", value_delimiter = ',')]
    pub hierarchy: Vec<String>,
}

impl EngineArgs {
    /// Convert the CLI flags into a validated engine configuration
    pub fn to_engine_config(
        &self,
    ) -> Result<crate::config::EngineConfig, crate::error::DegloopError> {
        use crate::common::ConfigBuilder;

        let mut builder = crate::config::EngineConfig::builder();
        if let Some(max_length) = self.max_length {
            builder = builder.with_max_segment_length(max_length);
        }
        if let Some(tolerance) = self.tolerance {
            builder = builder.with_removal_length_tolerance(tolerance);
        }
        if let Some(precision) = self.precision {
            builder = builder.with_precision(precision);
        }
        if !self.orders.is_empty() {
            builder = builder.with_orders(self.orders.clone());
        }
        if !self.hierarchy.is_empty() {
            builder = builder.with_hierarchy(self.hierarchy.clone());
        }
        builder.build()
    }
}

/// Common output format arguments
#[derive(Args, Debug, Clone)]
pub struct FormatArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = crate::constants::output::DEFAULT_FORMAT, env = "DEGLOOP_FORMAT")]
    pub format: crate::cli::OutputFormat,
}

/// Generic builder trait for configuration objects
pub trait ConfigBuilder: Sized {
    type Config;

    /// Build the configuration, returning an error if validation fails
    fn build(self) -> Result<Self::Config, crate::error::DegloopError>;
}

/// Trait for configurations that can be created from CLI commands
/// This trait simplifies command-to-config conversions
pub trait FromCommand: Sized {
    /// The command variant that this config can be created from
    fn from_command(command: crate::cli::Commands) -> Result<Self, crate::error::DegloopError>;
}

/// Macro to implement `TryFrom<Commands>` using [`FromCommand`] trait
#[macro_export]
macro_rules! impl_try_from_command {
    ($config:ty) => {
        impl std::convert::TryFrom<$crate::cli::Commands> for $config {
            type Error = $crate::error::DegloopError;

            fn try_from(command: $crate::cli::Commands) -> Result<Self, Self::Error> {
                <$config as $crate::common::FromCommand>::from_command(command)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> EngineArgs {
        EngineArgs {
            max_length: None,
            tolerance: None,
            precision: None,
            orders: vec![],
            hierarchy: vec![],
        }
    }

    #[test]
    fn test_empty_engine_args_yield_defaults() {
        let config = empty_args().to_engine_config().unwrap();
        assert_eq!(config.max_segment_length, 500.0);
        assert_eq!(config.orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_engine_args_override_defaults() {
        let mut args = empty_args();
        args.tolerance = Some(750.0);
        args.orders = vec![1, 2];

        let config = args.to_engine_config().unwrap();
        assert_eq!(config.removal_length_tolerance, 750.0);
        assert_eq!(config.orders, vec![1, 2]);
    }

    #[test]
    fn test_invalid_engine_args_are_rejected() {
        let mut args = empty_args();
        args.orders = vec![3, 1];
        assert!(args.to_engine_config().is_err());
    }
}
