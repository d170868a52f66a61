//! Scan command configuration

use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::config::EngineConfig;

/// Configuration for the detect-only scan command
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Input line-feature document
    pub input: PathBuf,
    /// Output format for the scan report
    pub format: OutputFormat,
    /// Suppress progress output
    pub quiet: bool,
    /// Engine parameters (the destructive ones are simply unused)
    pub engine: EngineConfig,
}

impl ScanConfig {
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct ScanConfigBuilder {
    input: Option<PathBuf>,
    format: Option<OutputFormat>,
    quiet: bool,
    engine: Option<EngineConfig>,
}

impl ScanConfigBuilder {
    pub fn with_input(mut self, input: PathBuf) -> Self {
        self.input = Some(input);
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

impl crate::common::ConfigBuilder for ScanConfigBuilder {
    type Config = ScanConfig;

    fn build(self) -> Result<Self::Config, crate::error::DegloopError> {
        Ok(ScanConfig {
            input: self.input.ok_or_else(|| {
                crate::error::DegloopError::ConfigurationError {
                    message: "Missing required field: input".to_string(),
                }
            })?,
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
