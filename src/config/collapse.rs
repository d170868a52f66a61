//! Collapse command configuration

use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::config::EngineConfig;

/// Configuration for the collapse command
///
/// This struct contains all options for running the removal engine over a
/// line-feature document and writing the generalized result.
#[derive(Debug, Clone)]
pub struct CollapseConfig {
    /// Input line-feature document
    pub input: PathBuf,
    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
    /// Output format for the summary report
    pub format: OutputFormat,
    /// Suppress progress output
    pub quiet: bool,
    /// Engine parameters
    pub engine: EngineConfig,
}

impl CollapseConfig {
    pub fn builder() -> CollapseConfigBuilder {
        CollapseConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct CollapseConfigBuilder {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    quiet: bool,
    engine: Option<EngineConfig>,
}

impl CollapseConfigBuilder {
    pub fn with_input(mut self, input: PathBuf) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = Some(engine);
        self
    }
}

impl crate::common::ConfigBuilder for CollapseConfigBuilder {
    type Config = CollapseConfig;

    fn build(self) -> Result<Self::Config, crate::error::DegloopError> {
        Ok(CollapseConfig {
            input: self.input.ok_or_else(|| {
                crate::error::DegloopError::ConfigurationError {
                    message: "Missing required field: input".to_string(),
                }
            })?,
            output: self.output,
            format: self.format.ok_or_else(|| {
                crate::error::DegloopError::ConfigurationError {
                    message: "Missing required field: format".to_string(),
                }
            })?,
            quiet: self.quiet,
            engine: self.engine.ok_or_else(|| {
                crate::error::DegloopError::ConfigurationError {
                    message: "Missing required field: engine".to_string(),
                }
            })?,
        })
    }
}
