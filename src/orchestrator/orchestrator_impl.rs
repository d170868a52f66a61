use std::collections::BTreeMap;

use miette::{Result, WrapErr};

use crate::config::EngineConfig;
use crate::core::{Cycle, OrderOutcome, RemovalDecision, RunSummary, Segment, SegmentId};
use crate::detector::CycleDetector;
use crate::geometry;
use crate::graph::NetworkGraphBuilder;
use crate::hierarchy::HierarchyRanker;
use crate::progress::ProgressReporter;
use crate::resolver::CycleResolver;
use crate::store::SegmentStore;

/// Floor for the defensive iteration cap, regardless of network size
const MIN_ITERATION_CAP: usize = 16;

/// Drives the whole network to a cycle-free fixed point
///
/// Per cycle order k (in the configured 1 -> 2 -> 3 -> 4 sequence):
/// SIMPLIFY rebuilds the dissolved graph, DETECT finds order-k cycles,
/// FILTER drops cycles that could never pass the length gate, RESOLVE turns
/// the rest into removal decisions, APPLY materializes the next snapshot,
/// and the loop repeats until an iteration changes nothing. A
/// size-proportional iteration cap bounds every loop; exceeding it flags the
/// order as non-convergent and the run continues with the next order.
pub struct TriangleRemovalOrchestrator<'a> {
    config: &'a EngineConfig,
    ranker: HierarchyRanker,
}

impl<'a> TriangleRemovalOrchestrator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        let ranker = HierarchyRanker::new(&config.hierarchy);
        Self { config, ranker }
    }

    /// Run the pre-pass and every configured order to its fixed point
    pub fn run(
        &self,
        store: &mut dyn SegmentStore,
        progress: Option<&ProgressReporter>,
    ) -> Result<RunSummary> {
        let input_segments = store.len();

        if let Some(p) = progress {
            p.start_prepass();
        }
        let prepass_removed = self.prepass(store);
        if let Some(p) = progress {
            p.finish_prepass(prepass_removed);
        }

        let mut skipped_degenerate = 0;
        let mut orders = Vec::with_capacity(self.config.orders.len());
        for &order in &self.config.orders {
            let outcome = self
                .process_order(store, order, &mut skipped_degenerate, progress)
                .wrap_err_with(|| format!("Failed while collapsing order-{order} cycles"))?;
            if let Some(p) = progress {
                p.finish_order(&outcome);
            }
            orders.push(outcome);
        }

        Ok(RunSummary {
            input_segments,
            output_segments: store.len(),
            skipped_degenerate,
            prepass_removed,
            orders,
        })
    }

    /// Repeatedly delete isolated islands (both endpoints degree 1,
    /// unconditional) and short dead ends (one endpoint degree 1, length
    /// below the max-length parameter) until a pass removes nothing
    fn prepass(&self, store: &mut dyn SegmentStore) -> usize {
        let precision = self.config.precision;
        let mut total = 0;

        loop {
            let snapshot = store.read_all();
            let mut degree: BTreeMap<crate::core::NodeKey, usize> = BTreeMap::new();
            for segment in &snapshot {
                if let Some((s, e)) = geometry::canonical_endpoints(&segment.line, precision) {
                    *degree.entry(s).or_default() += 1;
                    *degree.entry(e).or_default() += 1;
                }
            }

            let mut doomed: Vec<SegmentId> = Vec::new();
            for segment in &snapshot {
                let Some((s, e)) = geometry::canonical_endpoints(&segment.line, precision) else {
                    continue;
                };
                if s == e {
                    // A self-loop is order-1 business, not a dead end
                    continue;
                }
                let ds = degree[&s];
                let de = degree[&e];
                if ds == 1 && de == 1 {
                    doomed.push(segment.id);
                } else if (ds == 1) != (de == 1)
                    && segment.length < self.config.max_segment_length
                {
                    doomed.push(segment.id);
                }
            }

            if doomed.is_empty() {
                break;
            }
            for id in doomed {
                if store.delete(id) {
                    total += 1;
                }
            }
        }

        total
    }

    /// The per-order fixed-point state machine
    fn process_order(
        &self,
        store: &mut dyn SegmentStore,
        order: usize,
        skipped_degenerate: &mut usize,
        progress: Option<&ProgressReporter>,
    ) -> Result<OrderOutcome> {
        if let Some(p) = progress {
            p.start_order(order);
        }

        let cap = MIN_ITERATION_CAP.max(2 * store.len());
        let resolver = CycleResolver::new(
            &self.ranker,
            self.config.removal_length_tolerance,
            self.config.precision,
        );

        let mut iterations = 0;
        let mut cycles_found = 0;
        let mut removed = 0;
        let mut rejected = 0;
        let mut converged = true;

        loop {
            if iterations >= cap {
                converged = false;
                break;
            }
            iterations += 1;

            // SIMPLIFY
            let working = store.read_all();
            let mut builder = NetworkGraphBuilder::new(self.config.precision);
            builder
                .build_dissolved_graph(&working, progress)
                .wrap_err("Failed to build the network graph")?;
            // The same degenerate rows resurface every iteration; record,
            // don't accumulate
            *skipped_degenerate = (*skipped_degenerate).max(builder.skipped_degenerate());

            // DETECT
            let mut detector = CycleDetector::new();
            detector
                .detect_cycles(builder.graph(), order)
                .wrap_err("Failed to detect cycles")?;
            if !detector.has_cycles() {
                break;
            }
            let found_now = detector.cycle_count();
            cycles_found += found_now;
            if let Some(p) = progress {
                p.order_iteration(order, iterations, found_now);
            }

            let snapshot: BTreeMap<SegmentId, Segment> =
                working.into_iter().map(|s| (s.id, s)).collect();

            // FILTER + RESOLVE
            let mut decisions: Vec<RemovalDecision> = Vec::new();
            let mut dropped_now = 0;
            if order == 1 {
                for cycle in detector.cycles() {
                    decisions.extend(resolver.resolve_self_loop(cycle, &snapshot));
                }
            } else {
                for system in detector.systems() {
                    let (kept, dropped): (Vec<Cycle>, Vec<Cycle>) = system
                        .cycles
                        .into_iter()
                        .partition(|c| self.passes_length_prefilter(c, &snapshot));
                    dropped_now += dropped.len();
                    let filtered = crate::core::CycleSystem { cycles: kept };
                    decisions.extend(resolver.resolve_system(&filtered, &snapshot));
                }
            }
            rejected += dropped_now;

            if decisions.is_empty() {
                // Every remaining cycle is unresolvable or gated out; that is
                // convergence, not a reason to retry
                rejected += found_now - dropped_now;
                break;
            }

            // APPLY
            for decision in &decisions {
                if store.delete(decision.remove) {
                    removed += 1;
                }
            }
            for decision in decisions {
                for segment in decision.reinsert {
                    store.insert(segment);
                }
            }
        }

        Ok(OrderOutcome {
            order,
            iterations,
            cycles_found,
            removed,
            rejected,
            converged,
        })
    }

    /// Cheap pre-filter ahead of the costlier resolution: a cycle whose every
    /// participating working segment already exceeds the removal tolerance
    /// can never produce a candidate that passes the length gate
    fn passes_length_prefilter(
        &self,
        cycle: &Cycle,
        snapshot: &BTreeMap<SegmentId, Segment>,
    ) -> bool {
        let tolerance = self.config.removal_length_tolerance;
        cycle
            .segment_ids()
            .iter()
            .filter_map(|id| snapshot.get(id))
            .any(|segment| segment.length <= tolerance)
    }
}
