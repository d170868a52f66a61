//! Cycle detection over the network graph
//!
//! Order 1 cycles are self-loop edges, order 2 cycles are parallel edges
//! between one node pair, and orders >= 3 come out of a fundamental-cycle
//! basis over a spanning forest. Detected cycles can be grouped into cycle
//! systems (maximal sets transitively connected through shared nodes).

mod detector_impl;

pub use detector_impl::CycleDetector;
