//! Cycle resolution
//!
//! For one cycle or cycle-system, decide exactly which segment to delete and
//! which branch segments must be put back so the network stays connected.

mod resolver_impl;

pub use resolver_impl::CycleResolver;
