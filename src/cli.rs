use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::common::{EngineArgs, FormatArgs};

#[derive(Parser)]
#[command(
    name = "degloop",
    about = "🔺 Collapse redundant junction loops in road-network line-work",
    long_about = "degloop is one stage of a map-generalization pipeline. It finds small closed \
                  loops (cycles of 1-4 edges) in a road-network graph that stem from redundant \
                  digitization, picks the least important segment of each loop through a fixed \
                  category hierarchy, and deletes it while preserving connectivity and branches \
                  of other transport media. True roundabouts are expected to be filtered \
                  upstream and never reach this tool.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collapse the loops and write the generalized network
    ///
    /// Runs the island/dead-end pre-pass and then drives every configured
    /// cycle order to a cycle-free fixed point, order by order. The output
    /// collection keeps the input schema, minus removed segments, plus any
    /// branch segments reinserted to preserve topology.
    #[command(
        long_about = "Run the full removal engine over a line-feature JSON document. The engine \
                      first sweeps isolated islands and short dead ends, then repeatedly \
                      dissolves the network, detects cycles of the current order, ranks each \
                      cycle's segments through the category hierarchy, and removes the least \
                      important one - reinserting branch segments where deleting would sever a \
                      tunnel or bridge of another medium. Orders are processed in the fixed \
                      1 -> 2 -> 3 -> 4 sequence."
    )]
    Collapse {
        /// Input line-feature JSON document
        #[arg(value_name = "INPUT", env = "DEGLOOP_INPUT")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, env = "DEGLOOP_OUTPUT")]
        output: Option<PathBuf>,

        #[command(flatten)]
        engine: EngineArgs,

        #[command(flatten)]
        format: FormatArgs,

        /// Suppress progress output
        #[arg(long, short, env = "DEGLOOP_QUIET")]
        quiet: bool,
    },

    /// Detect and report loops without touching the network
    ///
    /// Builds the dissolved graph once per configured order and reports how
    /// many cycles of each order exist. Nothing is removed; use this to size
    /// a job or sanity-check parameters before collapsing.
    #[command(
        long_about = "Analyze a line-feature JSON document and report the cycles the removal \
                      engine would see, per configured order, without mutating anything. Handy \
                      for checking canonicalization precision and the length parameters against \
                      real data before running the destructive stage."
    )]
    Scan {
        /// Input line-feature JSON document
        #[arg(value_name = "INPUT", env = "DEGLOOP_INPUT")]
        input: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,

        #[command(flatten)]
        format: FormatArgs,

        /// Suppress progress output
        #[arg(long, short, env = "DEGLOOP_QUIET")]
        quiet: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}
