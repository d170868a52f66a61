//! Core type definitions
//!
//! This module contains the basic data structures used throughout the
//! application, with minimal logic - focusing on data representation.

use geo_types::{LineString, MultiLineString};
use serde::{Deserialize, Serialize};

/// Identifier of a working-network segment
pub type SegmentId = u64;

/// Physical carrying context of a segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    #[default]
    Surface,
    Bridge,
    Tunnel,
}

impl std::fmt::Display for Medium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Medium::Surface => write!(f, "surface"),
            Medium::Bridge => write!(f, "bridge"),
            Medium::Tunnel => write!(f, "tunnel"),
        }
    }
}

/// A line segment in the working network
#[derive(Debug, Clone)]
pub struct Segment {
    pub id: SegmentId,
    pub line: LineString,
    /// Euclidean length, cached at construction
    pub length: f64,
    pub category: String,
    pub subclass: Option<i64>,
    pub medium: Medium,
    /// Id of the raw input line this segment descends from
    pub original_line_id: u64,
}

impl Segment {
    /// Build a segment, caching its Euclidean length
    pub fn new(
        id: SegmentId,
        line: LineString,
        category: impl Into<String>,
        subclass: Option<i64>,
        medium: Medium,
        original_line_id: u64,
    ) -> Self {
        let length = crate::geometry::line_length(&line);
        Self {
            id,
            line,
            length,
            category: category.into(),
            subclass,
            medium,
            original_line_id,
        }
    }
}

/// Canonical node identity: endpoint coordinates rounded to a fixed precision
/// and scaled to integers. Node identity is never a raw floating-point pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub x: i64,
    pub y: i64,
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One edge of a detected cycle. After dissolving, a single edge may cover
/// several working segments; `segment_ids` maps it back to them.
#[derive(Debug, Clone)]
pub struct CycleEdge {
    pub segment_ids: Vec<SegmentId>,
    pub line: LineString,
    pub length: f64,
    pub endpoints: (NodeKey, NodeKey),
}

/// An ordered closed walk through the network graph
#[derive(Debug, Clone)]
pub struct Cycle {
    /// Walk nodes without the closing repeat; `nodes[0]` follows `nodes[last]`
    pub nodes: Vec<NodeKey>,
    pub edges: Vec<CycleEdge>,
}

impl Cycle {
    /// Number of edges in the cycle
    pub fn order(&self) -> usize {
        self.edges.len()
    }

    /// Working segments participating in this cycle
    pub fn segment_ids(&self) -> Vec<SegmentId> {
        let mut ids: Vec<SegmentId> = self
            .edges
            .iter()
            .flat_map(|e| e.segment_ids.iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// The dissolved line-work of the cycle
    pub fn line_work(&self) -> MultiLineString {
        MultiLineString::new(self.edges.iter().map(|e| e.line.clone()).collect())
    }
}

/// A maximal set of cycles transitively connected through shared nodes,
/// resolved as one unit
#[derive(Debug, Clone)]
pub struct CycleSystem {
    pub cycles: Vec<Cycle>,
}

impl CycleSystem {
    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }
}

/// The resolver's verdict for one cycle: exactly one segment to delete, plus
/// any branch segments to put back to keep the network connected
#[derive(Debug, Clone)]
pub struct RemovalDecision {
    pub remove: SegmentId,
    pub reinsert: Vec<Segment>,
}

/// Per-order outcome of the fixed-point loop
#[derive(Debug, Clone, Serialize)]
pub struct OrderOutcome {
    pub order: usize,
    pub iterations: usize,
    pub cycles_found: usize,
    pub removed: usize,
    pub rejected: usize,
    /// False when the defensive iteration cap fired for this order
    pub converged: bool,
}

/// Summary of one full orchestrator run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input_segments: usize,
    pub output_segments: usize,
    pub skipped_degenerate: usize,
    /// Islands and short dead ends deleted by the pre-pass
    pub prepass_removed: usize,
    pub orders: Vec<OrderOutcome>,
}

impl RunSummary {
    pub fn total_removed(&self) -> usize {
        self.prepass_removed + self.orders.iter().map(|o| o.removed).sum::<usize>()
    }

    pub fn total_decisions(&self) -> usize {
        self.orders.iter().map(|o| o.removed).sum()
    }

    pub fn all_converged(&self) -> bool {
        self.orders.iter().all(|o| o.converged)
    }
}
