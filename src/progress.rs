use std::sync::atomic::{AtomicUsize, Ordering};

use console::{Term, style};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::constants::progress::{SPINNER_FRAMES, TICK_INTERVAL};
use crate::core::OrderOutcome;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";

/// Console progress reporting for interactive runs
///
/// The engine itself stays silent; executors hand it an optional reporter
/// so unit tests and pipeline embedding see no output at all.
pub struct ProgressReporter {
    term: Term,
    spinner_position: AtomicUsize,
    multi_progress: MultiProgress,
    current_bar: Option<ProgressBar>,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    pub fn new() -> Self {
        let term = Term::stderr();
        Self {
            term,
            spinner_position: AtomicUsize::new(0),
            multi_progress: MultiProgress::new(),
            current_bar: None,
        }
    }

    pub fn create_spinner(&mut self, message: &str) -> ProgressBar {
        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template(SPINNER_TEMPLATE)
                .expect("Spinner template should be valid")
                .tick_strings(SPINNER_FRAMES),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(TICK_INTERVAL);
        pb
    }

    fn frame(&self) -> &'static str {
        let pos = self.spinner_position.fetch_add(1, Ordering::Relaxed) % SPINNER_FRAMES.len();
        SPINNER_FRAMES[pos]
    }

    pub fn start_loading(&mut self, path: &str) {
        let _ = self.term.clear_line();
        eprintln!("{} Loading line features...", style("🔍").cyan());
        let spinner = self.create_spinner(&format!("Reading: {path}..."));
        self.current_bar = Some(spinner);
    }

    pub fn finish_loading(&mut self, count: usize) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
        let _ = self.term.clear_line();
        eprintln!(
            "\r{} Loaded {} segment{}",
            style("✓").green(),
            style(count).yellow().bold(),
            if count == 1 { "" } else { "s" }
        );
    }

    pub fn start_prepass(&self) {
        eprintln!(
            "\n{} Sweeping islands and short dead ends...",
            style("🧹").yellow()
        );
    }

    pub fn finish_prepass(&self, removed: usize) {
        if removed == 0 {
            eprintln!("{} Nothing to sweep", style("✓").green());
        } else {
            eprintln!(
                "{} Swept away {} segment{}",
                style("✓").green(),
                style(removed).red().bold(),
                if removed == 1 { "" } else { "s" }
            );
        }
    }

    pub fn start_order(&self, order: usize) {
        eprintln!(
            "\n{} Collapsing order-{} cycles...",
            style("🔄").yellow(),
            style(order).bold()
        );
    }

    pub fn building_graph(&self, segments: usize) {
        let _ = self.term.clear_line();
        eprint!(
            "\r{} Dissolving network graph ({} segments)... ",
            style(self.frame()).cyan(),
            style(segments).dim()
        );
    }

    pub fn order_iteration(&self, order: usize, iteration: usize, cycles: usize) {
        let _ = self.term.clear_line();
        eprint!(
            "\r{} Order {}, iteration {}: {} cycle{} found ",
            style(self.frame()).yellow(),
            order,
            iteration,
            style(cycles).bold(),
            if cycles == 1 { "" } else { "s" }
        );
    }

    pub fn finish_order(&self, outcome: &OrderOutcome) {
        let _ = self.term.clear_line();
        if !outcome.converged {
            eprintln!(
                "\r{} Order {} did NOT converge within {} iterations ({} removed so far)",
                style("⚠").red().bold(),
                outcome.order,
                outcome.iterations,
                outcome.removed
            );
        } else if outcome.cycles_found == 0 {
            eprintln!(
                "\r{} Order {}: no cycles {}",
                style("✓").green(),
                outcome.order,
                style("🎉").dim()
            );
        } else {
            eprintln!(
                "\r{} Order {}: {} removed, {} rejected in {} iteration{}",
                style("✓").green(),
                outcome.order,
                style(outcome.removed).red().bold(),
                style(outcome.rejected).yellow(),
                outcome.iterations,
                if outcome.iterations == 1 { "" } else { "s" }
            );
        }
    }
}
