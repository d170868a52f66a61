use std::collections::{BTreeMap, BTreeSet};

use geo_types::LineString;
use miette::Result;
use petgraph::graph::{NodeIndex, UnGraph};

use super::types::{EndpointPair, NetworkEdge, NetworkNode};
use crate::core::{NodeKey, Segment};
use crate::geometry;
use crate::progress::ProgressReporter;

/// Builder for the undirected network graph
///
/// Nodes are canonical endpoint keys; edges are working segments, merged
/// through degree-2 pass-through nodes (the dissolve) so each edge between
/// true junctions is a single edge carrying the ids of the raw segments it
/// covers.
pub struct NetworkGraphBuilder {
    precision: u32,
    graph: UnGraph<NetworkNode, NetworkEdge>,
    node_indices: BTreeMap<NodeKey, NodeIndex>,
    skipped_degenerate: usize,
}

struct RawEdge {
    segment_id: u64,
    start: NodeKey,
    end: NodeKey,
    line: LineString,
    length: f64,
}

impl RawEdge {
    fn other_end(&self, node: NodeKey) -> NodeKey {
        if node == self.start { self.end } else { self.start }
    }

    fn single(&self) -> NetworkEdge {
        NetworkEdge {
            segment_ids: vec![self.segment_id],
            line: self.line.clone(),
            length: self.length,
            endpoints: (self.start, self.end),
        }
    }
}

impl NetworkGraphBuilder {
    /// Create a builder canonicalizing endpoints to `precision` decimals
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            graph: UnGraph::default(),
            node_indices: BTreeMap::new(),
            skipped_degenerate: 0,
        }
    }

    /// Build the dissolved graph from the working-network segments
    ///
    /// Segments with degenerate geometry are skipped (and counted), never
    /// fatal. An empty input yields an empty graph.
    pub fn build_dissolved_graph(
        &mut self,
        segments: &[Segment],
        progress: Option<&ProgressReporter>,
    ) -> Result<()> {
        if let Some(p) = progress {
            p.building_graph(segments.len());
        }

        let raw = self.collect_raw_edges(segments);
        let edges = dissolve(&raw, self.precision);
        for edge in edges {
            self.insert_edge(edge);
        }
        Ok(())
    }

    /// Build an undissolved graph from explicit endpoint pairs, used when
    /// points rather than lines are the direct input
    pub fn build_endpoint_graph(&mut self, pairs: &[EndpointPair]) -> Result<()> {
        for pair in pairs {
            let line = LineString::from(vec![pair.start, pair.end]);
            let endpoints = (
                geometry::canonical_key(pair.start, self.precision),
                geometry::canonical_key(pair.end, self.precision),
            );
            let length = geometry::line_length(&line);
            self.insert_edge(NetworkEdge {
                segment_ids: vec![pair.segment_id],
                line,
                length,
                endpoints,
            });
        }
        Ok(())
    }

    pub fn graph(&self) -> &UnGraph<NetworkNode, NetworkEdge> {
        &self.graph
    }

    /// Segments skipped for degenerate geometry during the last build
    pub fn skipped_degenerate(&self) -> usize {
        self.skipped_degenerate
    }

    fn collect_raw_edges(&mut self, segments: &[Segment]) -> Vec<RawEdge> {
        let mut raw = Vec::with_capacity(segments.len());
        for segment in segments {
            if geometry::is_degenerate(&segment.line) {
                self.skipped_degenerate += 1;
                continue;
            }
            let Some((start, end)) = geometry::canonical_endpoints(&segment.line, self.precision)
            else {
                self.skipped_degenerate += 1;
                continue;
            };
            raw.push(RawEdge {
                segment_id: segment.id,
                start,
                end,
                line: segment.line.clone(),
                length: segment.length,
            });
        }
        raw
    }

    fn node_index(&mut self, key: NodeKey) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(NetworkNode { key });
        self.node_indices.insert(key, idx);
        idx
    }

    fn insert_edge(&mut self, edge: NetworkEdge) {
        let a = self.node_index(edge.endpoints.0);
        let b = self.node_index(edge.endpoints.1);
        self.graph.add_edge(a, b, edge);
    }
}

/// Merge degree-2 chains into single edges
///
/// Anchors are nodes of degree != 2 or nodes carrying a self-loop. Chains are
/// walked anchor-to-anchor. A chain that closes back on its own anchor keeps
/// its final raw segment as a separate edge, so a dangling loop stays a
/// 2-cycle instead of collapsing into a synthetic self-loop. Pure rings
/// (every node degree 2) are left unmerged so their cycle order is preserved.
fn dissolve(raw: &[RawEdge], precision: u32) -> Vec<NetworkEdge> {
    let mut degree: BTreeMap<NodeKey, usize> = BTreeMap::new();
    let mut adjacency: BTreeMap<NodeKey, Vec<usize>> = BTreeMap::new();
    let mut anchors: BTreeSet<NodeKey> = BTreeSet::new();

    for (i, edge) in raw.iter().enumerate() {
        if edge.start == edge.end {
            *degree.entry(edge.start).or_default() += 2;
            anchors.insert(edge.start);
        } else {
            *degree.entry(edge.start).or_default() += 1;
            *degree.entry(edge.end).or_default() += 1;
            adjacency.entry(edge.start).or_default().push(i);
            adjacency.entry(edge.end).or_default().push(i);
        }
    }
    for (&node, &deg) in &degree {
        if deg != 2 {
            anchors.insert(node);
        }
    }

    let mut visited = vec![false; raw.len()];
    let mut out = Vec::new();

    // Self-loops pass through untouched
    for (i, edge) in raw.iter().enumerate() {
        if edge.start == edge.end {
            visited[i] = true;
            out.push(edge.single());
        }
    }

    for &anchor in &anchors {
        let Some(incident) = adjacency.get(&anchor) else {
            continue;
        };
        for &first in incident {
            if visited[first] {
                continue;
            }
            visited[first] = true;

            let mut chain = vec![first];
            let mut walk_nodes = vec![anchor, raw[first].other_end(anchor)];
            let mut current = raw[first].other_end(anchor);
            let mut previous = first;

            while current != anchor && !anchors.contains(&current) {
                let next = adjacency
                    .get(&current)
                    .and_then(|edges| {
                        edges.iter().copied().find(|&e| e != previous && !visited[e])
                    });
                let Some(next) = next else { break };
                visited[next] = true;
                current = raw[next].other_end(current);
                chain.push(next);
                walk_nodes.push(current);
                previous = next;
            }

            if current == anchor && chain.len() >= 2 {
                let last = chain.pop().expect("chain has at least two members");
                walk_nodes.pop();
                out.push(merge_chain(raw, &chain, &walk_nodes, precision));
                out.push(raw[last].single());
            } else {
                out.push(merge_chain(raw, &chain, &walk_nodes, precision));
            }
        }
    }

    // Whatever is left forms pure rings; keep their raw segments as-is
    for (i, edge) in raw.iter().enumerate() {
        if !visited[i] {
            out.push(edge.single());
        }
    }

    out
}

fn merge_chain(
    raw: &[RawEdge],
    chain: &[usize],
    walk_nodes: &[NodeKey],
    precision: u32,
) -> NetworkEdge {
    if chain.len() == 1 {
        return raw[chain[0]].single();
    }

    let mut line = geometry::oriented(&raw[chain[0]].line, walk_nodes[0], precision);
    let mut segment_ids = vec![raw[chain[0]].segment_id];
    let mut length = raw[chain[0]].length;

    for (i, &idx) in chain.iter().enumerate().skip(1) {
        let part = geometry::oriented(&raw[idx].line, walk_nodes[i], precision);
        geometry::extend_line(&mut line, &part);
        segment_ids.push(raw[idx].segment_id);
        length += raw[idx].length;
    }

    NetworkEdge {
        segment_ids,
        line,
        length,
        endpoints: (walk_nodes[0], *walk_nodes.last().expect("walk is non-empty")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Medium;

    fn seg(id: u64, coords: &[(f64, f64)]) -> Segment {
        Segment::new(
            id,
            LineString::from(coords.to_vec()),
            "county",
            None,
            Medium::Surface,
            id,
        )
    }

    fn build(segments: &[Segment]) -> NetworkGraphBuilder {
        let mut builder = NetworkGraphBuilder::new(3);
        builder.build_dissolved_graph(segments, None).unwrap();
        builder
    }

    #[test]
    fn test_empty_input_builds_empty_graph() {
        let builder = build(&[]);
        assert_eq!(builder.graph().node_count(), 0);
        assert_eq!(builder.graph().edge_count(), 0);
    }

    #[test]
    fn test_degenerate_segments_skipped_not_fatal() {
        let segments = vec![
            seg(1, &[(0.0, 0.0), (10.0, 0.0)]),
            seg(2, &[(5.0, 5.0)]),
            seg(3, &[(0.0, 0.0), (f64::NAN, 1.0)]),
        ];
        let builder = build(&segments);
        assert_eq!(builder.skipped_degenerate(), 2);
        assert_eq!(builder.graph().edge_count(), 1);
    }

    #[test]
    fn test_chain_between_junctions_dissolves_into_one_edge() {
        // A four-piece polyline between two T-junctions
        let segments = vec![
            seg(1, &[(0.0, 0.0), (1.0, 0.0)]),
            seg(2, &[(1.0, 0.0), (2.0, 0.0)]),
            seg(3, &[(2.0, 0.0), (3.0, 0.0)]),
            seg(4, &[(3.0, 0.0), (4.0, 0.0)]),
            // Spurs making the chain ends true junctions
            seg(5, &[(0.0, 0.0), (0.0, 1.0)]),
            seg(6, &[(0.0, 0.0), (0.0, -1.0)]),
            seg(7, &[(4.0, 0.0), (4.0, 1.0)]),
            seg(8, &[(4.0, 0.0), (4.0, -1.0)]),
        ];
        let builder = build(&segments);

        let merged: Vec<&NetworkEdge> = builder
            .graph()
            .edge_weights()
            .filter(|e| e.segment_ids.len() > 1)
            .collect();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].segment_ids, vec![1, 2, 3, 4]);
        assert!((merged[0].length - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_pure_ring_is_left_unmerged() {
        let segments = vec![
            seg(1, &[(0.0, 0.0), (10.0, 0.0)]),
            seg(2, &[(10.0, 0.0), (5.0, 8.0)]),
            seg(3, &[(5.0, 8.0), (0.0, 0.0)]),
        ];
        let builder = build(&segments);
        assert_eq!(builder.graph().node_count(), 3);
        assert_eq!(builder.graph().edge_count(), 3);
        assert!(builder.graph().edge_weights().all(|e| e.segment_ids.len() == 1));
    }

    #[test]
    fn test_anchored_loop_becomes_two_edges_not_a_self_loop() {
        // A loop hanging off one junction node
        let segments = vec![
            seg(1, &[(0.0, 0.0), (2.0, 1.0)]),
            seg(2, &[(2.0, 1.0), (4.0, 0.0)]),
            seg(3, &[(4.0, 0.0), (2.0, -1.0)]),
            seg(4, &[(2.0, -1.0), (0.0, 0.0)]),
            // Outside spur anchoring (0,0)
            seg(5, &[(0.0, 0.0), (-3.0, 0.0)]),
            seg(6, &[(0.0, 0.0), (0.0, 3.0)]),
        ];
        let builder = build(&segments);

        assert!(
            builder.graph().edge_weights().all(|e| !e.is_self_loop()),
            "dissolving must never fabricate a self-loop"
        );
        // Loop must survive as a parallel pair between the anchor and the
        // split node
        let loop_edges: Vec<&NetworkEdge> = builder
            .graph()
            .edge_weights()
            .filter(|e| e.segment_ids.iter().all(|id| (1..=4).contains(id)))
            .collect();
        assert_eq!(loop_edges.len(), 2);
        let covered: usize = loop_edges.iter().map(|e| e.segment_ids.len()).sum();
        assert_eq!(covered, 4);
    }

    #[test]
    fn test_self_loop_segment_passes_through() {
        let segments = vec![seg(1, &[(1.0, 1.0), (2.0, 2.0), (2.0, 0.0), (1.0, 1.0)])];
        let builder = build(&segments);
        assert_eq!(builder.graph().edge_count(), 1);
        assert!(builder.graph().edge_weights().next().unwrap().is_self_loop());
    }

    #[test]
    fn test_endpoint_pair_input() {
        let pairs = vec![
            EndpointPair {
                segment_id: 1,
                start: geo_types::Coord { x: 0.0, y: 0.0 },
                end: geo_types::Coord { x: 1.0, y: 0.0 },
            },
            EndpointPair {
                segment_id: 2,
                start: geo_types::Coord { x: 1.0, y: 0.0 },
                end: geo_types::Coord { x: 0.0, y: 0.0 },
            },
        ];
        let mut builder = NetworkGraphBuilder::new(3);
        builder.build_endpoint_graph(&pairs).unwrap();

        // Two parallel edges between the same canonical pair
        assert_eq!(builder.graph().node_count(), 2);
        assert_eq!(builder.graph().edge_count(), 2);
    }
}
