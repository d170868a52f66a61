//! The triangle-removal driver
//!
//! Runs the working network to a cycle-free fixed point order by order,
//! including the island/dead-end pre-pass.

mod orchestrator_impl;

pub use orchestrator_impl::TriangleRemovalOrchestrator;
