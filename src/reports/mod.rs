//! Report generation modules for different output formats
//!
//! This module contains report generators for the run summary:
//! - human: Human-readable console output
//! - json: JSON format for programmatic use

pub mod human;
pub mod json;

use crate::core::RunSummary;
use crate::error::DegloopError;

/// Common trait for all report generators
pub trait ReportGenerator {
    /// Generate a report from a finished orchestrator run
    fn generate_report(&self, summary: &RunSummary) -> Result<String, DegloopError>;
}

// Re-export for convenience
pub use human::HumanReportGenerator;
pub use json::JsonReportGenerator;
