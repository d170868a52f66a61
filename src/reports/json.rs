//! JSON report generation for programmatic use

use super::ReportGenerator;
use crate::core::RunSummary;
use crate::error::DegloopError;

pub struct JsonReportGenerator;

impl JsonReportGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReportGenerator {
    fn generate_report(&self, summary: &RunSummary) -> Result<String, DegloopError> {
        let mut out = serde_json::to_string_pretty(summary)?;
        out.push('\n');
        Ok(out)
    }
}
