//! # degloop - Collapse Redundant Junction Loops in Road Networks
//!
//! degloop is one stage of a map-generalization pipeline. Overlapping
//! digitization leaves small closed loops ("triangles") in road-network
//! line-work: cycles of 1, 2, 3 or occasionally 4 edges that draw one
//! physical junction with redundant geometry. At the target scale these
//! loops are clutter; degloop collapses each to a single through-connection
//! while preserving network connectivity and class hierarchy. True
//! roundabouts are filtered out upstream and never reach this crate.
//!
//! ## Main Components
//!
//! - **Graph**: Builds the undirected endpoint graph, including the degree-2
//!   dissolve that merges polyline chains between true junctions
//! - **Detector**: Finds cycles per order (self-loops, parallel pairs, and a
//!   fundamental-cycle basis for orders >= 3)
//! - **Hierarchy**: Deterministic importance ranking of candidate segments
//! - **Resolver**: Picks the one segment to delete per cycle and the branch
//!   segments to reinsert for topology preservation
//! - **Orchestrator**: Drives everything to a cycle-free fixed point,
//!   order by order, with an island/dead-end pre-pass
//!
//! ## Usage
//!
//! ### Real-World Example: Generalizing a Network In-Process
//!
//! ```
//! use degloop::config::EngineConfig;
//! use degloop::core::{Medium, Segment};
//! use degloop::orchestrator::TriangleRemovalOrchestrator;
//! use degloop::store::{MemoryStore, SegmentStore};
//! use geo_types::LineString;
//!
//! # fn main() -> miette::Result<()> {
//! // Step 1: Load your working network into a store. Any SegmentStore
//! // implementation works; MemoryStore is the built-in one.
//! let triangle = vec![
//!     (1, vec![(0.0, 0.0), (10.0, 0.0)]),
//!     (2, vec![(10.0, 0.0), (5.0, 8.0)]),
//!     (3, vec![(5.0, 8.0), (0.0, 0.0)]),
//! ];
//! let segments: Vec<Segment> = triangle
//!     .into_iter()
//!     .map(|(id, coords)| {
//!         Segment::new(
//!             id,
//!             LineString::from(coords),
//!             "county",
//!             None,
//!             Medium::Surface,
//!             id,
//!         )
//!     })
//!     .collect();
//! let mut store = MemoryStore::from(segments);
//!
//! // Step 2: Configure and run the orchestrator
//! let config = EngineConfig::default();
//! let orchestrator = TriangleRemovalOrchestrator::new(&config);
//! let summary = orchestrator.run(&mut store, None)?;
//!
//! // Step 3: Inspect the outcome
//! assert_eq!(summary.total_decisions(), 1);
//! assert_eq!(store.len(), 2);
//! println!(
//!     "{} -> {} segments",
//!     summary.input_segments, summary.output_segments
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ### Example: Detect-Only Inspection
//!
//! ```
//! use degloop::detector::CycleDetector;
//! use degloop::graph::NetworkGraphBuilder;
//! # use degloop::core::{Medium, Segment};
//! # use geo_types::LineString;
//!
//! # fn main() -> miette::Result<()> {
//! # let segments = vec![
//! #     Segment::new(1, LineString::from(vec![(0.0, 0.0), (4.0, 0.0)]),
//! #                  "county", None, Medium::Surface, 1),
//! #     Segment::new(2, LineString::from(vec![(4.0, 0.0), (0.0, 0.0)]),
//! #                  "county", None, Medium::Surface, 2),
//! # ];
//! let mut builder = NetworkGraphBuilder::new(3);
//! builder.build_dissolved_graph(&segments, None)?;
//!
//! let mut detector = CycleDetector::new();
//! detector.detect_cycles(builder.graph(), 2)?;
//!
//! println!("Found {} parallel-edge cycles", detector.cycle_count());
//! # assert_eq!(detector.cycle_count(), 1);
//! # Ok(())
//! # }
//! ```

// Private modules
mod constants;
mod progress;
mod utils;

// Public modules
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod core;
pub mod detector;
pub mod error;
pub mod executors;
pub mod feature_io;
pub mod geometry;
pub mod graph;
pub mod hierarchy;
pub mod orchestrator;
pub mod reports;
pub mod resolver;
pub mod store;

// Main entry point for the library
pub fn run() -> miette::Result<()> {
    use clap::Parser;

    use crate::cli::Cli;
    use crate::commands::execute_command;

    let cli = Cli::parse();
    execute_command(cli.command)
}
