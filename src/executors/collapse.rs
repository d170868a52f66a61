//! Collapse command executor

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};

use crate::cli::OutputFormat;
use crate::config::CollapseConfig;
use crate::executors::CommandExecutor;
use crate::feature_io;
use crate::orchestrator::TriangleRemovalOrchestrator;
use crate::progress::ProgressReporter;
use crate::reports::{HumanReportGenerator, JsonReportGenerator, ReportGenerator};
use crate::store::{MemoryStore, SegmentStore};

pub struct CollapseExecutor;

impl CommandExecutor for CollapseExecutor {
    type Config = CollapseConfig;

    fn execute(config: Self::Config) -> Result<()> {
        // Create a progress reporter if we're in an interactive terminal
        let mut progress = if !config.quiet && console::Term::stderr().is_term() {
            Some(ProgressReporter::new())
        } else {
            None
        };

        if let Some(p) = progress.as_mut() {
            p.start_loading(&config.input.display().to_string());
        }

        let loaded = feature_io::read_collection(&config.input)
            .into_diagnostic()
            .wrap_err("Failed to read the input line-feature document")?;

        if let Some(p) = progress.as_mut() {
            p.finish_loading(loaded.segments.len());
        }
        if loaded.skipped > 0 {
            eprintln!(
                "{} Skipped {} unusable feature(s) in the input",
                style("⚠").yellow(),
                loaded.skipped
            );
        }

        let mut store = MemoryStore::from(loaded.segments);

        let orchestrator = TriangleRemovalOrchestrator::new(&config.engine);
        let summary = orchestrator
            .run(&mut store, progress.as_ref())
            .wrap_err("Loop collapsing failed")?;

        feature_io::write_collection(&store.read_all(), config.output.as_deref())
            .into_diagnostic()
            .wrap_err("Failed to write the generalized network")?;

        let report_result = match config.format {
            OutputFormat::Human => HumanReportGenerator::new().generate_report(&summary),
            OutputFormat::Json => JsonReportGenerator::new().generate_report(&summary),
        };

        match report_result {
            Ok(report) => eprint!("{report}"),
            Err(e) => {
                return Err(e)
                    .into_diagnostic()
                    .wrap_err("Failed to generate report");
            }
        }

        Ok(())
    }
}
