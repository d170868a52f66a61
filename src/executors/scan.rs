//! Scan command executor

use std::fmt::Write as _;

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::ScanConfig;
use crate::detector::CycleDetector;
use crate::executors::CommandExecutor;
use crate::feature_io;
use crate::graph::NetworkGraphBuilder;
use crate::progress::ProgressReporter;
use crate::utils::string::pluralize;

#[derive(Debug, Serialize)]
struct ScanReport {
    segments: usize,
    skipped_features: usize,
    orders: Vec<ScanOrderReport>,
}

#[derive(Debug, Serialize)]
struct ScanOrderReport {
    order: usize,
    cycles: usize,
    systems: usize,
}

pub struct ScanExecutor;

impl CommandExecutor for ScanExecutor {
    type Config = ScanConfig;

    fn execute(config: Self::Config) -> Result<()> {
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

        let mut builder = NetworkGraphBuilder::new(config.engine.precision);
        builder
            .build_dissolved_graph(&loaded.segments, progress.as_ref())
            .wrap_err("Failed to build the network graph")?;

        let mut orders = Vec::with_capacity(config.engine.orders.len());
        for &order in &config.engine.orders {
            let mut detector = CycleDetector::new();
            detector
                .detect_cycles(builder.graph(), order)
                .wrap_err("Failed to detect cycles")?;
            orders.push(ScanOrderReport {
                order,
                cycles: detector.cycle_count(),
                systems: detector.systems().len(),
            });
        }

        let report = ScanReport {
            segments: loaded.segments.len(),
            skipped_features: loaded.skipped,
            orders,
        };

        match config.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .into_diagnostic()
                    .wrap_err("Failed to serialize the scan report")?;
                println!("{json}");
            }
            OutputFormat::Human => {
                print!("{}", render_human(&report).into_diagnostic()?);
            }
        }

        Ok(())
    }
}

fn render_human(report: &ScanReport) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    let total: usize = report.orders.iter().map(|o| o.cycles).sum();

    if total == 0 {
        write!(
            out,
            "\n{} No cycles detected across {} segments. {}\n",
            style("✅").green().bold(),
            report.segments,
            style("🎉").dim()
        )?;
    } else {
        write!(
            out,
            "\n{} Found {} {} across {} segments:\n\n",
            style("🔺").yellow().bold(),
            style(total).red().bold(),
            pluralize("cycle", total),
            report.segments
        )?;
        for order in &report.orders {
            writeln!(
                out,
                "  {} Order {}: {} {} in {} {}",
                style("•").dim(),
                style(order.order).bold(),
                order.cycles,
                pluralize("cycle", order.cycles),
                order.systems,
                pluralize("system", order.systems),
            )?;
        }
    }

    if report.skipped_features > 0 {
        writeln!(
            out,
            "\n{} Skipped {} unusable {}",
            style("ℹ").blue(),
            report.skipped_features,
            pluralize("feature", report.skipped_features)
        )?;
    }

    Ok(out)
}
