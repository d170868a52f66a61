use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::core::{Cycle, CycleSystem, NodeKey, RemovalDecision, Segment, SegmentId};
use crate::geometry;
use crate::hierarchy::HierarchyRanker;

/// Resolver deciding, per cycle, the one segment to remove and the branch
/// segments to reinsert
///
/// A cycle yields no decision (and is left intact) when its overlap set is
/// empty or when the least-important overlap member is longer than the
/// removal tolerance - a long real road that incidentally closes a large loop
/// must never be deleted.
pub struct CycleResolver<'a> {
    ranker: &'a HierarchyRanker,
    removal_tolerance: f64,
    precision: u32,
}

impl<'a> CycleResolver<'a> {
    pub fn new(ranker: &'a HierarchyRanker, removal_tolerance: f64, precision: u32) -> Self {
        Self {
            ranker,
            removal_tolerance,
            precision,
        }
    }

    /// Resolve every decomposed unit of a cycle system independently.
    /// Cycles whose segments were already claimed by an earlier decision in
    /// the same system are skipped; the next iteration re-detects whatever
    /// remains of them.
    pub fn resolve_system(
        &self,
        system: &CycleSystem,
        snapshot: &BTreeMap<SegmentId, Segment>,
    ) -> Vec<RemovalDecision> {
        let mut decisions = Vec::new();
        let mut claimed: HashSet<SegmentId> = HashSet::new();

        // Independent single loops first, then the chained ones
        let mut units: Vec<&Cycle> = system.cycles.iter().collect();
        units.sort_by_key(|c| c.order());

        for cycle in units {
            if cycle.segment_ids().iter().any(|id| claimed.contains(id)) {
                continue;
            }
            if let Some(decision) = self.resolve_cycle(cycle, snapshot) {
                claimed.insert(decision.remove);
                decisions.push(decision);
            }
        }

        decisions
    }

    /// Unconditional full removal of a self-loop; there is no meaningful
    /// "other side" to preserve, so hierarchy and tolerance play no part
    pub fn resolve_self_loop(
        &self,
        cycle: &Cycle,
        snapshot: &BTreeMap<SegmentId, Segment>,
    ) -> Vec<RemovalDecision> {
        self.overlap_set(cycle, snapshot)
            .into_iter()
            .map(|segment| RemovalDecision {
                remove: segment.id,
                reinsert: Vec::new(),
            })
            .collect()
    }

    /// Steps 1-6 of the resolution algorithm for one cycle
    pub fn resolve_cycle(
        &self,
        cycle: &Cycle,
        snapshot: &BTreeMap<SegmentId, Segment>,
    ) -> Option<RemovalDecision> {
        // 1. Overlap set: working segments spatially contained in the
        //    dissolved cycle line-work
        let overlap = self.overlap_set(cycle, snapshot);
        if overlap.is_empty() {
            return None;
        }

        // 2. The removal candidate is the least-important overlap member
        let candidate = self.ranker.worst(&overlap)?;

        // 3. Length gate
        if candidate.length > self.removal_tolerance {
            return None;
        }

        let candidate_ends = geometry::canonical_endpoints(&candidate.line, self.precision)?;
        let candidate_coords = geometry::endpoint_coords(&candidate.line)?;

        // 4. Classify the remaining working segments
        let ring = geometry::cycle_ring(cycle, self.precision);
        let line_work = cycle.line_work();
        let mut inside: Vec<&Segment> = Vec::new();
        let mut witness_nodes: BTreeSet<NodeKey> = BTreeSet::new();
        let mut endpoint_witnessed = false;

        for segment in snapshot.values() {
            if segment.id == candidate.id {
                continue;
            }
            let covered = ring
                .as_ref()
                .is_some_and(|r| geometry::ring_covers(r, &segment.line))
                || geometry::line_work_covers(&line_work, &segment.line);
            if covered {
                inside.push(segment);
                continue;
            }
            // An uncontained segment marks every node it touches as a real
            // junction the add-back set must not grow across
            if let Some((s, e)) = geometry::canonical_endpoints(&segment.line, self.precision) {
                witness_nodes.insert(s);
                witness_nodes.insert(e);
                if s == candidate_ends.0 || s == candidate_ends.1 || e == candidate_ends.0
                    || e == candidate_ends.1
                {
                    endpoint_witnessed = true;
                }
            }
            // Mid-span contact counts too: a T-junction digitized through a
            // vertex still witnesses the endpoint
            if geometry::touches_point(&segment.line, candidate_coords.0)
                || geometry::touches_point(&segment.line, candidate_coords.1)
            {
                endpoint_witnessed = true;
            }
        }

        // 5. Branch preservation: only needed when an outside witness touches
        //    a candidate endpoint and the cycle interior carries another
        //    transport medium
        let cross_medium = inside.iter().any(|s| s.medium != candidate.medium);
        let reinsert = if endpoint_witnessed && cross_medium {
            self.grow_branch(&inside, &witness_nodes)
        } else {
            Vec::new()
        };

        // 6. Done
        Some(RemovalDecision {
            remove: candidate.id,
            reinsert,
        })
    }

    fn overlap_set<'s>(
        &self,
        cycle: &Cycle,
        snapshot: &'s BTreeMap<SegmentId, Segment>,
    ) -> Vec<&'s Segment> {
        let line_work = cycle.line_work();
        snapshot
            .values()
            .filter(|segment| geometry::line_work_covers(&line_work, &segment.line))
            .collect()
    }

    /// Greedily grow a connected add-back set from the highest-priority
    /// inside segment. A segment joins when it shares an endpoint with the
    /// current set and that endpoint is not an outside-witnessed junction.
    fn grow_branch(
        &self,
        inside: &[&Segment],
        witness_nodes: &BTreeSet<NodeKey>,
    ) -> Vec<Segment> {
        let Some(seed) = self.ranker.best(inside) else {
            return Vec::new();
        };

        let mut taken: BTreeSet<SegmentId> = BTreeSet::new();
        let mut frontier_nodes: BTreeSet<NodeKey> = BTreeSet::new();
        let mut branch = Vec::new();

        let mut admit = |segment: &Segment,
                         taken: &mut BTreeSet<SegmentId>,
                         frontier: &mut BTreeSet<NodeKey>,
                         branch: &mut Vec<Segment>| {
            taken.insert(segment.id);
            if let Some((s, e)) = geometry::canonical_endpoints(&segment.line, self.precision) {
                frontier.insert(s);
                frontier.insert(e);
            }
            branch.push(segment.clone());
        };

        admit(seed, &mut taken, &mut frontier_nodes, &mut branch);

        loop {
            let mut grew = false;
            for &segment in inside {
                if taken.contains(&segment.id) {
                    continue;
                }
                let Some((s, e)) =
                    geometry::canonical_endpoints(&segment.line, self.precision)
                else {
                    continue;
                };
                let joins_at = [s, e]
                    .into_iter()
                    .find(|n| frontier_nodes.contains(n) && !witness_nodes.contains(n));
                if joins_at.is_some() {
                    admit(segment, &mut taken, &mut frontier_nodes, &mut branch);
                    grew = true;
                }
            }
            if !grew {
                break;
            }
        }

        branch
    }
}

#[cfg(test)]
mod tests {
    use geo_types::LineString;

    use super::*;
    use crate::constants::engine::DEFAULT_HIERARCHY;
    use crate::core::Medium;
    use crate::detector::CycleDetector;
    use crate::graph::NetworkGraphBuilder;

    const PRECISION: u32 = 3;

    fn seg(id: u64, coords: &[(f64, f64)], category: &str, medium: Medium) -> Segment {
        Segment::new(
            id,
            LineString::from(coords.to_vec()),
            category,
            None,
            medium,
            id,
        )
    }

    fn snapshot_of(segments: &[Segment]) -> BTreeMap<SegmentId, Segment> {
        segments.iter().map(|s| (s.id, s.clone())).collect()
    }

    fn detect_order(segments: &[Segment], order: usize) -> Vec<Cycle> {
        let mut builder = NetworkGraphBuilder::new(PRECISION);
        builder.build_dissolved_graph(segments, None).unwrap();
        let mut detector = CycleDetector::new();
        detector.detect_cycles(builder.graph(), order).unwrap();
        detector.cycles().to_vec()
    }

    fn triangle(categories: [&str; 3], media: [Medium; 3]) -> Vec<Segment> {
        vec![
            seg(1, &[(0.0, 0.0), (10.0, 0.0)], categories[0], media[0]),
            seg(2, &[(10.0, 0.0), (5.0, 8.0)], categories[1], media[1]),
            seg(3, &[(5.0, 8.0), (0.0, 0.0)], categories[2], media[2]),
        ]
    }

    #[test]
    fn test_equal_triangle_removes_longest() {
        let ranker = HierarchyRanker::new(DEFAULT_HIERARCHY);
        let resolver = CycleResolver::new(&ranker, 1000.0, PRECISION);

        let segments = triangle(["county"; 3], [Medium::Surface; 3]);
        let cycles = detect_order(&segments, 3);
        assert_eq!(cycles.len(), 1);

        let decision = resolver
            .resolve_cycle(&cycles[0], &snapshot_of(&segments))
            .expect("triangle resolves");
        // Ties broken by length: the 10-unit base loses to the 9.43 flanks
        assert_eq!(decision.remove, 1);
        assert!(decision.reinsert.is_empty());
    }

    #[test]
    fn test_category_decides_before_length() {
        let ranker = HierarchyRanker::new(DEFAULT_HIERARCHY);
        let resolver = CycleResolver::new(&ranker, 1000.0, PRECISION);

        let segments = triangle(
            ["private", "county", "county"],
            [Medium::Surface; 3],
        );
        let cycles = detect_order(&segments, 3);
        let decision = resolver
            .resolve_cycle(&cycles[0], &snapshot_of(&segments))
            .unwrap();
        assert_eq!(decision.remove, 1);
    }

    #[test]
    fn test_long_candidate_is_rejected() {
        let ranker = HierarchyRanker::new(DEFAULT_HIERARCHY);
        let resolver = CycleResolver::new(&ranker, 1000.0, PRECISION);

        // The worst-ranked member is 2000 units long; the cycle stays intact
        let segments = vec![
            seg(1, &[(0.0, 0.0), (2000.0, 0.0)], "private", Medium::Surface),
            seg(2, &[(2000.0, 0.0), (1000.0, 5.0)], "county", Medium::Surface),
            seg(3, &[(1000.0, 5.0), (0.0, 0.0)], "county", Medium::Surface),
        ];
        let cycles = detect_order(&segments, 3);
        assert!(
            resolver
                .resolve_cycle(&cycles[0], &snapshot_of(&segments))
                .is_none()
        );
    }

    #[test]
    fn test_empty_overlap_yields_no_decision() {
        let ranker = HierarchyRanker::new(DEFAULT_HIERARCHY);
        let resolver = CycleResolver::new(&ranker, 1000.0, PRECISION);

        let segments = triangle(["county"; 3], [Medium::Surface; 3]);
        let cycles = detect_order(&segments, 3);

        // Snapshot no longer carries the cycle members
        let stale = snapshot_of(&[seg(
            9,
            &[(50.0, 50.0), (60.0, 50.0)],
            "county",
            Medium::Surface,
        )]);
        assert!(resolver.resolve_cycle(&cycles[0], &stale).is_none());
    }

    #[test]
    fn test_two_cycle_keeps_higher_category() {
        let ranker = HierarchyRanker::new(DEFAULT_HIERARCHY);
        let resolver = CycleResolver::new(&ranker, 1000.0, PRECISION);

        let segments = vec![
            seg(1, &[(0.0, 0.0), (30.0, 40.0)], "county", Medium::Surface),
            seg(2, &[(30.0, 40.0), (0.0, 0.0)], "private", Medium::Surface),
        ];
        let cycles = detect_order(&segments, 2);
        assert_eq!(cycles.len(), 1);

        let decision = resolver
            .resolve_cycle(&cycles[0], &snapshot_of(&segments))
            .unwrap();
        assert_eq!(decision.remove, 2, "the private segment loses");
    }

    #[test]
    fn test_branch_preservation_reinserts_connecting_edges() {
        let ranker = HierarchyRanker::new(DEFAULT_HIERARCHY);
        let resolver = CycleResolver::new(&ranker, 1000.0, PRECISION);

        // Triangle with a tunnel flank; a bridge spur outside touches the
        // removal candidate's endpoint at (0,0). The spur anchors that
        // corner, so the dissolve folds the two degree-2 corners away and
        // the loop surfaces as an order-2 cycle of merged edges.
        let mut segments = triangle(
            ["private", "county", "county"],
            [Medium::Surface, Medium::Surface, Medium::Tunnel],
        );
        segments.push(seg(
            4,
            &[(0.0, 0.0), (0.0, -20.0)],
            "municipal",
            Medium::Bridge,
        ));

        let cycles = detect_order(&segments, 2);
        assert_eq!(cycles.len(), 1);

        let decision = resolver
            .resolve_cycle(&cycles[0], &snapshot_of(&segments))
            .expect("resolvable");
        assert_eq!(decision.remove, 1);
        assert!(
            !decision.reinsert.is_empty(),
            "a branch must be reinserted to restore connectivity"
        );

        // The reinserted branch reconnects the candidate's endpoints without
        // crossing the witnessed junction at (0,0)
        let ids: Vec<SegmentId> = decision.reinsert.iter().map(|s| s.id).collect();
        assert!(ids.contains(&2) && ids.contains(&3));
        // And the outside spur itself is never part of the add-back set
        assert!(!ids.contains(&4));
    }

    #[test]
    fn test_no_branch_logic_without_cross_medium() {
        let ranker = HierarchyRanker::new(DEFAULT_HIERARCHY);
        let resolver = CycleResolver::new(&ranker, 1000.0, PRECISION);

        let mut segments = triangle(
            ["private", "county", "county"],
            [Medium::Surface; 3],
        );
        segments.push(seg(
            4,
            &[(0.0, 0.0), (0.0, -20.0)],
            "municipal",
            Medium::Surface,
        ));

        let cycles = detect_order(&segments, 2);
        let decision = resolver
            .resolve_cycle(&cycles[0], &snapshot_of(&segments))
            .unwrap();
        assert!(decision.reinsert.is_empty());
    }

    #[test]
    fn test_self_loop_resolution_is_unconditional() {
        let ranker = HierarchyRanker::new(DEFAULT_HIERARCHY);
        let resolver = CycleResolver::new(&ranker, 1000.0, PRECISION);

        // Longer than the tolerance and of the highest category; removed
        // regardless
        let loop_seg = seg(
            1,
            &[(0.0, 0.0), (800.0, 0.0), (800.0, 800.0), (0.0, 0.0)],
            "motorway",
            Medium::Surface,
        );
        let segments = vec![loop_seg];
        let cycles = detect_order(&segments, 1);
        assert_eq!(cycles.len(), 1);

        let decisions = resolver.resolve_self_loop(&cycles[0], &snapshot_of(&segments));
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].remove, 1);
        assert!(decisions[0].reinsert.is_empty());
    }

    #[test]
    fn test_system_resolution_skips_claimed_segments() {
        let ranker = HierarchyRanker::new(DEFAULT_HIERARCHY);
        let resolver = CycleResolver::new(&ranker, 1000.0, PRECISION);

        // Two loops hanging off the shared junction (10,0); after the
        // dissolve each surfaces as an order-2 cycle touching that node
        let segments = vec![
            seg(1, &[(0.0, 0.0), (10.0, 0.0)], "private", Medium::Surface),
            seg(2, &[(10.0, 0.0), (5.0, 8.0)], "county", Medium::Surface),
            seg(3, &[(5.0, 8.0), (0.0, 0.0)], "county", Medium::Surface),
            seg(4, &[(10.0, 0.0), (20.0, 0.0)], "private", Medium::Surface),
            seg(5, &[(20.0, 0.0), (15.0, 8.0)], "county", Medium::Surface),
            seg(6, &[(15.0, 8.0), (10.0, 0.0)], "county", Medium::Surface),
        ];
        let mut builder = NetworkGraphBuilder::new(PRECISION);
        builder.build_dissolved_graph(&segments, None).unwrap();
        let mut detector = CycleDetector::new();
        detector.detect_cycles(builder.graph(), 2).unwrap();
        let systems = detector.systems();
        assert_eq!(systems.len(), 1);

        let decisions = resolver.resolve_system(&systems[0], &snapshot_of(&segments));
        assert_eq!(decisions.len(), 2);
        let removed: Vec<SegmentId> = decisions.iter().map(|d| d.remove).collect();
        assert!(removed.contains(&1) && removed.contains(&4));
    }
}
