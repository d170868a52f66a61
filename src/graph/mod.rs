//! Network graph construction
//!
//! Builds an undirected graph of canonical segment endpoints, including the
//! degree-2 dissolve that merges polyline chains so each edge between true
//! junctions is a single edge.

mod builder;
mod types;

pub use builder::NetworkGraphBuilder;
pub use types::{EndpointPair, NetworkEdge, NetworkNode};
