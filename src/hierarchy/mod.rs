//! # Hierarchy ranking
//!
//! Total, deterministic ordering of candidate segments by cartographic
//! importance, so a "worst" segment can always be picked even under ties or
//! missing attributes. Sort keys, in order: category priority through the
//! configured table (unknown categories after all known ones), numeric
//! subclass (null sentineled high), length (non-finite sentineled high), and
//! finally segment id. Identical multisets rank identically in any input
//! order.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::Segment;

pub struct HierarchyRanker {
    priority: HashMap<String, usize>,
    table_len: usize,
}

impl HierarchyRanker {
    /// Build a ranker from an ordered category table, most important first
    pub fn new<S: AsRef<str>>(table: &[S]) -> Self {
        let priority = table
            .iter()
            .enumerate()
            .map(|(i, cat)| (cat.as_ref().to_string(), i))
            .collect();
        Self {
            priority,
            table_len: table.len(),
        }
    }

    fn category_rank(&self, category: &str) -> usize {
        self.priority
            .get(category)
            .copied()
            .unwrap_or(self.table_len)
    }

    fn sort_key(&self, segment: &Segment) -> (usize, i64, f64, u64) {
        let length = if segment.length.is_finite() {
            segment.length
        } else {
            f64::MAX
        };
        (
            self.category_rank(&segment.category),
            segment.subclass.unwrap_or(i64::MAX),
            length,
            segment.id,
        )
    }

    fn compare(&self, a: &Segment, b: &Segment) -> Ordering {
        let ka = self.sort_key(a);
        let kb = self.sort_key(b);
        ka.0.cmp(&kb.0)
            .then(ka.1.cmp(&kb.1))
            .then(ka.2.total_cmp(&kb.2))
            .then(ka.3.cmp(&kb.3))
    }

    /// Rank candidates ascending: first is most important, last is the
    /// least-important ("worst") member
    pub fn rank<'a>(&self, mut candidates: Vec<&'a Segment>) -> Vec<&'a Segment> {
        candidates.sort_by(|a, b| self.compare(a, b));
        candidates
    }

    /// The least-important candidate, if any
    pub fn worst<'a>(&self, candidates: &[&'a Segment]) -> Option<&'a Segment> {
        self.rank(candidates.to_vec()).last().copied()
    }

    /// The most-important candidate, if any
    pub fn best<'a>(&self, candidates: &[&'a Segment]) -> Option<&'a Segment> {
        self.rank(candidates.to_vec()).first().copied()
    }
}
