//! Human-readable console report generation

use std::fmt::Write;

use console::style;

use super::ReportGenerator;
use crate::core::RunSummary;
use crate::error::DegloopError;
use crate::utils::string::pluralize;

pub struct HumanReportGenerator;

impl HumanReportGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HumanReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HumanReportGenerator {
    fn generate_report(&self, summary: &RunSummary) -> Result<String, DegloopError> {
        let mut output = String::new();

        let removed = summary.total_removed();
        if removed == 0 {
            write!(
                output,
                "\n{} Network is already loop-free. Nothing to collapse.\n",
                style("✅").green().bold()
            )?;
        } else {
            write!(
                output,
                "\n{} Removed {} {} ({} -> {} segments):\n\n",
                style("🔺").red().bold(),
                style(removed).red().bold(),
                pluralize("segment", removed),
                summary.input_segments,
                summary.output_segments,
            )?;
        }

        if summary.prepass_removed > 0 {
            writeln!(
                output,
                "  {} Pre-pass: {} {} (islands and short dead ends)",
                style("🧹").yellow(),
                style(summary.prepass_removed).bold(),
                pluralize("segment", summary.prepass_removed)
            )?;
        }

        for outcome in &summary.orders {
            let marker = if outcome.converged {
                style("✓").green()
            } else {
                style("⚠").red().bold()
            };
            writeln!(
                output,
                "  {} Order {}: {} {} found, {} removed, {} rejected ({} {})",
                marker,
                style(outcome.order).bold(),
                outcome.cycles_found,
                pluralize("cycle", outcome.cycles_found),
                style(outcome.removed).red(),
                style(outcome.rejected).yellow(),
                outcome.iterations,
                pluralize("iteration", outcome.iterations),
            )?;
            if !outcome.converged {
                writeln!(
                    output,
                    "    {} iteration cap reached before the fixed point; follow up manually",
                    style("!").red()
                )?;
            }
        }

        if summary.skipped_degenerate > 0 {
            writeln!(
                output,
                "\n{} Skipped {} {} with degenerate geometry",
                style("ℹ").blue(),
                summary.skipped_degenerate,
                pluralize("segment", summary.skipped_degenerate)
            )?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OrderOutcome;

    fn summary() -> RunSummary {
        RunSummary {
            input_segments: 12,
            output_segments: 9,
            skipped_degenerate: 1,
            prepass_removed: 1,
            orders: vec![
                OrderOutcome {
                    order: 1,
                    iterations: 1,
                    cycles_found: 0,
                    removed: 0,
                    rejected: 0,
                    converged: true,
                },
                OrderOutcome {
                    order: 2,
                    iterations: 3,
                    cycles_found: 2,
                    removed: 2,
                    rejected: 0,
                    converged: false,
                },
            ],
        }
    }

    #[test]
    fn test_report_mentions_counts_and_flags() {
        let report = HumanReportGenerator::new()
            .generate_report(&summary())
            .unwrap();

        assert!(report.contains("Removed 3 segments"));
        assert!(report.contains("Order 1"));
        assert!(report.contains("Order 2"));
        assert!(report.contains("iteration cap reached"));
        assert!(report.contains("degenerate geometry"));
    }

    #[test]
    fn test_clean_network_report() {
        let clean = RunSummary {
            input_segments: 4,
            output_segments: 4,
            skipped_degenerate: 0,
            prepass_removed: 0,
            orders: vec![],
        };
        let report = HumanReportGenerator::new().generate_report(&clean).unwrap();
        assert!(report.contains("already loop-free"));
    }
}
