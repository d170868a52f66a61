use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use miette::Result;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::core::{Cycle, CycleEdge, CycleSystem, NodeKey};
use crate::graph::{NetworkEdge, NetworkNode};

/// Detector for closed walks of a bounded order in the network graph
///
/// Digitizing direction is irrelevant: the graph is undirected and only
/// canonical endpoint equality matters.
pub struct CycleDetector {
    cycles: Vec<Cycle>,
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleDetector {
    pub fn new() -> Self {
        Self { cycles: Vec::new() }
    }

    /// Detect all cycles of exactly `order` edges
    ///
    /// An empty or edge-less graph simply finds nothing; it is never an
    /// error.
    pub fn detect_cycles(
        &mut self,
        graph: &UnGraph<NetworkNode, NetworkEdge>,
        order: usize,
    ) -> Result<()> {
        if graph.edge_count() == 0 {
            return Ok(());
        }

        match order {
            0 => {}
            1 => self.find_self_loops(graph),
            2 => self.find_parallel_pairs(graph),
            _ => self.find_basis_cycles(graph, order),
        }

        Ok(())
    }

    /// Get all detected cycles
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    /// Group detected cycles into maximal systems connected through shared
    /// nodes; each system is resolved as one unit
    pub fn systems(&self) -> Vec<CycleSystem> {
        let mut groups: Vec<(HashSet<NodeKey>, Vec<Cycle>)> = Vec::new();

        for cycle in &self.cycles {
            let nodes: HashSet<NodeKey> = cycle.nodes.iter().copied().collect();
            let touching: Vec<usize> = groups
                .iter()
                .enumerate()
                .filter(|(_, (group_nodes, _))| !group_nodes.is_disjoint(&nodes))
                .map(|(i, _)| i)
                .collect();

            match touching.split_first() {
                None => groups.push((nodes, vec![cycle.clone()])),
                Some((&home, bridged)) => {
                    // The cycle may bridge several groups; fold them into the
                    // first, removing from the back so indices stay valid
                    for &i in bridged.iter().rev() {
                        let (nodes_b, cycles_b) = groups.swap_remove(i);
                        groups[home].0.extend(nodes_b);
                        groups[home].1.extend(cycles_b);
                    }
                    groups[home].0.extend(nodes);
                    groups[home].1.push(cycle.clone());
                }
            }
        }

        groups
            .into_iter()
            .map(|(_, cycles)| CycleSystem { cycles })
            .collect()
    }

    fn find_self_loops(&mut self, graph: &UnGraph<NetworkNode, NetworkEdge>) {
        for edge in graph.edge_references() {
            if edge.source() == edge.target() {
                let key = graph[edge.source()].key;
                self.cycles.push(Cycle {
                    nodes: vec![key],
                    edges: vec![cycle_edge(edge.weight(), key, key)],
                });
            }
        }
    }

    fn find_parallel_pairs(&mut self, graph: &UnGraph<NetworkNode, NetworkEdge>) {
        let mut by_pair: BTreeMap<(NodeKey, NodeKey), Vec<EdgeIndex>> = BTreeMap::new();
        for edge in graph.edge_references() {
            if edge.source() == edge.target() {
                continue;
            }
            let a = graph[edge.source()].key;
            let b = graph[edge.target()].key;
            let pair = if a <= b { (a, b) } else { (b, a) };
            by_pair.entry(pair).or_default().push(edge.id());
        }

        for ((a, b), edges) in by_pair {
            // Disjoint consecutive pairs; leftovers surface on a later
            // iteration once the network has been rebuilt
            for chunk in edges.chunks(2) {
                if let [first, second] = chunk {
                    self.cycles.push(Cycle {
                        nodes: vec![a, b],
                        edges: vec![
                            cycle_edge(&graph[*first], a, b),
                            cycle_edge(&graph[*second], b, a),
                        ],
                    });
                }
            }
        }
    }

    /// Fundamental-cycle basis: BFS spanning forest, one cycle per non-tree
    /// edge, filtered to walks of exactly `order` edges
    fn find_basis_cycles(&mut self, graph: &UnGraph<NetworkNode, NetworkEdge>, order: usize) {
        let mut parent: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> = HashMap::new();
        let mut depth: HashMap<NodeIndex, usize> = HashMap::new();
        let mut tree_edges: HashSet<EdgeIndex> = HashSet::new();

        for start in graph.node_indices() {
            if depth.contains_key(&start) {
                continue;
            }
            depth.insert(start, 0);
            let mut queue = VecDeque::from([start]);
            while let Some(node) = queue.pop_front() {
                for edge in graph.edges(node) {
                    let other = if edge.source() == node {
                        edge.target()
                    } else {
                        edge.source()
                    };
                    if other == node || depth.contains_key(&other) {
                        continue;
                    }
                    depth.insert(other, depth[&node] + 1);
                    parent.insert(other, (node, edge.id()));
                    tree_edges.insert(edge.id());
                    queue.push_back(other);
                }
            }
        }

        for chord in graph.edge_references() {
            if tree_edges.contains(&chord.id()) || chord.source() == chord.target() {
                continue;
            }
            let walk = tree_walk(&parent, &depth, chord.source(), chord.target());
            let Some((nodes, edges)) = walk else { continue };
            if edges.len() + 1 != order {
                continue;
            }

            let mut cycle_nodes: Vec<NodeKey> = nodes.iter().map(|&n| graph[n].key).collect();
            let mut cycle_edges: Vec<CycleEdge> = Vec::with_capacity(order);
            for (i, &edge_idx) in edges.iter().enumerate() {
                cycle_edges.push(cycle_edge(
                    &graph[edge_idx],
                    cycle_nodes[i],
                    cycle_nodes[i + 1],
                ));
            }
            // The chord closes the walk back to its first node
            let last = *cycle_nodes.last().expect("walk has nodes");
            cycle_edges.push(cycle_edge(&graph[chord.id()], last, cycle_nodes[0]));

            self.cycles.push(Cycle {
                nodes: cycle_nodes,
                edges: cycle_edges,
            });
        }
    }
}

/// Tree path from `u` to `v` as (ordered nodes, ordered tree edges)
fn tree_walk(
    parent: &HashMap<NodeIndex, (NodeIndex, EdgeIndex)>,
    depth: &HashMap<NodeIndex, usize>,
    u: NodeIndex,
    v: NodeIndex,
) -> Option<(Vec<NodeIndex>, Vec<EdgeIndex>)> {
    let (&du, &dv) = (depth.get(&u)?, depth.get(&v)?);

    let mut up_nodes = vec![u];
    let mut up_edges = Vec::new();
    let mut down_nodes = vec![v];
    let mut down_edges = Vec::new();
    let (mut a, mut b) = (u, v);
    let (mut da, mut db) = (du, dv);

    while da > db {
        let (p, e) = *parent.get(&a)?;
        up_nodes.push(p);
        up_edges.push(e);
        a = p;
        da -= 1;
    }
    while db > da {
        let (p, e) = *parent.get(&b)?;
        down_nodes.push(p);
        down_edges.push(e);
        b = p;
        db -= 1;
    }
    while a != b {
        let (pa, ea) = *parent.get(&a)?;
        let (pb, eb) = *parent.get(&b)?;
        up_nodes.push(pa);
        up_edges.push(ea);
        down_nodes.push(pb);
        down_edges.push(eb);
        a = pa;
        b = pb;
    }

    // up side ends at the meeting node; splice the down side in reverse,
    // dropping its duplicate of the meeting node
    down_nodes.pop();
    down_edges.reverse();
    down_nodes.reverse();
    up_nodes.extend(down_nodes);
    up_edges.extend(down_edges);
    Some((up_nodes, up_edges))
}

fn cycle_edge(edge: &NetworkEdge, from: NodeKey, to: NodeKey) -> CycleEdge {
    CycleEdge {
        segment_ids: edge.segment_ids.clone(),
        line: edge.line.clone(),
        length: edge.length,
        endpoints: (from, to),
    }
}

#[cfg(test)]
mod tests {
    use geo_types::Coord;

    use super::*;
    use crate::graph::{EndpointPair, NetworkGraphBuilder};

    fn pair(id: u64, start: (f64, f64), end: (f64, f64)) -> EndpointPair {
        EndpointPair {
            segment_id: id,
            start: Coord {
                x: start.0,
                y: start.1,
            },
            end: Coord { x: end.0, y: end.1 },
        }
    }

    fn graph_of(pairs: &[EndpointPair]) -> NetworkGraphBuilder {
        let mut builder = NetworkGraphBuilder::new(3);
        builder.build_endpoint_graph(pairs).unwrap();
        builder
    }

    #[test]
    fn test_empty_graph_finds_nothing() {
        let builder = graph_of(&[]);
        let mut detector = CycleDetector::new();
        for order in 1..=4 {
            detector.detect_cycles(builder.graph(), order).unwrap();
        }
        assert!(!detector.has_cycles());
    }

    #[test]
    fn test_order_one_self_loop() {
        let builder = graph_of(&[
            pair(1, (0.0, 0.0), (0.0, 0.0)),
            pair(2, (0.0, 0.0), (5.0, 0.0)),
        ]);
        let mut detector = CycleDetector::new();
        detector.detect_cycles(builder.graph(), 1).unwrap();

        assert_eq!(detector.cycle_count(), 1);
        let cycle = &detector.cycles()[0];
        assert_eq!(cycle.order(), 1);
        assert_eq!(cycle.segment_ids(), vec![1]);
    }

    #[test]
    fn test_order_two_parallel_edges() {
        // Digitized in opposite directions; only canonical equality matters
        let builder = graph_of(&[
            pair(1, (0.0, 0.0), (5.0, 0.0)),
            pair(2, (5.0, 0.0), (0.0, 0.0)),
            pair(3, (5.0, 0.0), (9.0, 0.0)),
        ]);
        let mut detector = CycleDetector::new();
        detector.detect_cycles(builder.graph(), 2).unwrap();

        assert_eq!(detector.cycle_count(), 1);
        let cycle = &detector.cycles()[0];
        assert_eq!(cycle.order(), 2);
        assert_eq!(cycle.segment_ids(), vec![1, 2]);
    }

    #[test]
    fn test_order_three_triangle() {
        let builder = graph_of(&[
            pair(1, (0.0, 0.0), (10.0, 0.0)),
            pair(2, (10.0, 0.0), (5.0, 8.0)),
            pair(3, (5.0, 8.0), (0.0, 0.0)),
            // A tail that must not end up in any cycle
            pair(4, (10.0, 0.0), (20.0, 0.0)),
        ]);
        let mut detector = CycleDetector::new();
        detector.detect_cycles(builder.graph(), 3).unwrap();

        assert_eq!(detector.cycle_count(), 1);
        let cycle = &detector.cycles()[0];
        assert_eq!(cycle.order(), 3);
        assert_eq!(cycle.segment_ids(), vec![1, 2, 3]);
        assert_eq!(cycle.nodes.len(), 3);
    }

    #[test]
    fn test_order_four_quad() {
        let builder = graph_of(&[
            pair(1, (0.0, 0.0), (10.0, 0.0)),
            pair(2, (10.0, 0.0), (10.0, 10.0)),
            pair(3, (10.0, 10.0), (0.0, 10.0)),
            pair(4, (0.0, 10.0), (0.0, 0.0)),
        ]);
        let mut detector = CycleDetector::new();
        detector.detect_cycles(builder.graph(), 3).unwrap();
        assert_eq!(detector.cycle_count(), 0, "a quad is not an order-3 cycle");

        detector.detect_cycles(builder.graph(), 4).unwrap();
        assert_eq!(detector.cycle_count(), 1);
        assert_eq!(detector.cycles()[0].order(), 4);
    }

    #[test]
    fn test_walk_is_closed_and_ordered() {
        let builder = graph_of(&[
            pair(1, (0.0, 0.0), (10.0, 0.0)),
            pair(2, (10.0, 0.0), (5.0, 8.0)),
            pair(3, (5.0, 8.0), (0.0, 0.0)),
        ]);
        let mut detector = CycleDetector::new();
        detector.detect_cycles(builder.graph(), 3).unwrap();

        let cycle = &detector.cycles()[0];
        let n = cycle.nodes.len();
        for (i, edge) in cycle.edges.iter().enumerate() {
            assert_eq!(edge.endpoints.0, cycle.nodes[i]);
            assert_eq!(edge.endpoints.1, cycle.nodes[(i + 1) % n]);
        }
    }

    #[test]
    fn test_two_triangles_sharing_a_node_group_into_one_system() {
        let builder = graph_of(&[
            pair(1, (0.0, 0.0), (10.0, 0.0)),
            pair(2, (10.0, 0.0), (5.0, 8.0)),
            pair(3, (5.0, 8.0), (0.0, 0.0)),
            pair(4, (10.0, 0.0), (20.0, 0.0)),
            pair(5, (20.0, 0.0), (15.0, 8.0)),
            pair(6, (15.0, 8.0), (10.0, 0.0)),
        ]);
        let mut detector = CycleDetector::new();
        detector.detect_cycles(builder.graph(), 3).unwrap();

        assert_eq!(detector.cycle_count(), 2);
        let systems = detector.systems();
        assert_eq!(systems.len(), 1);
        assert_eq!(systems[0].cycle_count(), 2);
    }

    #[test]
    fn test_disjoint_cycles_form_separate_systems() {
        let builder = graph_of(&[
            pair(1, (0.0, 0.0), (10.0, 0.0)),
            pair(2, (10.0, 0.0), (5.0, 8.0)),
            pair(3, (5.0, 8.0), (0.0, 0.0)),
            pair(4, (100.0, 0.0), (110.0, 0.0)),
            pair(5, (110.0, 0.0), (105.0, 8.0)),
            pair(6, (105.0, 8.0), (100.0, 0.0)),
        ]);
        let mut detector = CycleDetector::new();
        detector.detect_cycles(builder.graph(), 3).unwrap();

        assert_eq!(detector.systems().len(), 2);
    }
}
