//! # Segment store
//!
//! The engine never talks to a concrete geometry/attribute backend. It is
//! handed something implementing [`SegmentStore`] - read-all, get, insert,
//! delete - and treats each `read_all` result as one immutable working-network
//! snapshot. The orchestrator fully materializes the next snapshot (deletes
//! plus reinsertions) before reading again, so there is never reader/writer
//! overlap within a run.

use std::collections::BTreeMap;

use crate::core::{Segment, SegmentId};

/// Minimal repository interface over a line-feature collection
pub trait SegmentStore {
    /// Snapshot of every currently-kept segment
    fn read_all(&self) -> Vec<Segment>;

    fn get(&self, id: SegmentId) -> Option<&Segment>;

    /// Insert or replace a segment by id
    fn insert(&mut self, segment: Segment);

    /// Returns true when the id existed
    fn delete(&mut self, id: SegmentId) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store backing tests and the CLI. Keyed by a `BTreeMap` so
/// snapshot order is deterministic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    segments: BTreeMap<SegmentId, Segment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> Vec<SegmentId> {
        self.segments.keys().copied().collect()
    }
}

impl From<Vec<Segment>> for MemoryStore {
    fn from(segments: Vec<Segment>) -> Self {
        Self {
            segments: segments.into_iter().map(|s| (s.id, s)).collect(),
        }
    }
}

impl SegmentStore for MemoryStore {
    fn read_all(&self) -> Vec<Segment> {
        self.segments.values().cloned().collect()
    }

    fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(&id)
    }

    fn insert(&mut self, segment: Segment) {
        self.segments.insert(segment.id, segment);
    }

    fn delete(&mut self, id: SegmentId) -> bool {
        self.segments.remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.segments.len()
    }
}
