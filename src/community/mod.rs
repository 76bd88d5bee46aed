//! Community detection over the undirected projection of a group graph

use crate::graph::SocialGraph;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::Undirected;
use std::collections::{BTreeMap, HashMap};

/// Safety cap on local-moving sweeps
const MAX_SWEEPS: usize = 100;

/// Assignment of every node to exactly one community.
///
/// Community ids are dense, starting at 0, numbered in order of first
/// appearance over ascending node index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    assignments: Vec<usize>,
}

impl Partition {
    /// Build a partition from explicit node -> community assignments
    pub fn from_assignments(assignments: Vec<usize>) -> Self {
        Self { assignments }
    }

    /// Community id of a node
    pub fn community_of(&self, node: usize) -> usize {
        self.assignments[node]
    }

    /// Number of nodes covered
    pub fn node_count(&self) -> usize {
        self.assignments.len()
    }

    /// Number of distinct communities
    pub fn community_count(&self) -> usize {
        self.assignments.iter().max().map_or(0, |&max| max + 1)
    }

    /// Members of each community, keyed by community id
    pub fn communities(&self) -> BTreeMap<usize, Vec<usize>> {
        let mut map: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (node, &community) in self.assignments.iter().enumerate() {
            map.entry(community).or_default().push(node);
        }
        map
    }

    /// Raw node -> community assignments
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Compare two partitions as groupings, ignoring community labels.
    ///
    /// Modularity optimization is tie-sensitive, so tests compare
    /// partition equivalence rather than exact ids.
    pub fn is_equivalent(&self, other: &Partition) -> bool {
        if self.assignments.len() != other.assignments.len() {
            return false;
        }
        normalize(&self.assignments) == normalize(&other.assignments)
    }
}

fn normalize(assignments: &[usize]) -> Vec<usize> {
    let mut relabel: HashMap<usize, usize> = HashMap::new();
    let mut next = 0;
    assignments
        .iter()
        .map(|&community| {
            *relabel.entry(community).or_insert_with(|| {
                let id = next;
                next += 1;
                id
            })
        })
        .collect()
}

/// Project the directed nomination graph to an undirected weighted graph.
///
/// An undirected edge u-v exists if u->v or v->u exists; when both
/// directions (or duplicates) are present, their weights are summed into
/// the single undirected edge. Self-loops are carried over.
pub fn project_undirected(graph: &SocialGraph) -> Graph<u32, f64, Undirected> {
    let mut merged: BTreeMap<(u32, u32), f64> = BTreeMap::new();
    for (src, list) in graph.out_edges.iter().enumerate() {
        for &(dst, weight) in list {
            let key = if (src as u32) <= dst {
                (src as u32, dst)
            } else {
                (dst, src as u32)
            };
            *merged.entry(key).or_insert(0.0) += weight;
        }
    }

    let mut projection = Graph::<u32, f64, Undirected>::new_undirected();
    for node in 0..graph.node_count {
        projection.add_node(node as u32);
    }
    for ((a, b), weight) in merged {
        projection.add_edge(NodeIndex::new(a as usize), NodeIndex::new(b as usize), weight);
    }

    projection
}

/// Modularity of a partition over an undirected weighted graph.
///
/// Q = (1/2m) * sum over intra-community edges of [w - k_a * k_b / 2m],
/// where m is the total edge weight and k the weighted node degree.
pub fn modularity(projection: &Graph<u32, f64, Undirected>, assignments: &[usize]) -> f64 {
    let mut m = 0.0;
    for edge in projection.edge_indices() {
        m += *projection.edge_weight(edge).unwrap_or(&0.0);
    }
    if m == 0.0 {
        return 0.0;
    }

    let mut degrees = vec![0.0; projection.node_count()];
    for node in projection.node_indices() {
        let mut degree = 0.0;
        for edge in projection.edges(node) {
            degree += edge.weight();
        }
        degrees[node.index()] = degree;
    }

    let mut q = 0.0;
    for edge in projection.edge_indices() {
        let (a, b) = match projection.edge_endpoints(edge) {
            Some(endpoints) => endpoints,
            None => continue,
        };
        let weight = *projection.edge_weight(edge).unwrap_or(&0.0);
        if assignments[a.index()] == assignments[b.index()] {
            q += weight - degrees[a.index()] * degrees[b.index()] / (2.0 * m);
        }
    }

    q / (2.0 * m)
}

/// Detect communities by greedy modularity optimization.
///
/// Multi-level (Louvain-style): local moving sweeps nodes in ascending
/// index order, moving each to the neighboring community with the
/// largest positive modularity gain until a sweep changes nothing;
/// communities are then aggregated into super-nodes and the moving
/// repeats on the coarsened graph, until a level makes no move.
/// Candidate communities are examined in ascending id order, so ties
/// resolve reproducibly.
pub fn detect_communities(graph: &SocialGraph) -> Partition {
    let n = graph.node_count;
    if n == 0 {
        return Partition {
            assignments: Vec::new(),
        };
    }

    let projection = project_undirected(graph);
    let mut edges: Vec<(usize, usize, f64)> = projection
        .edge_indices()
        .filter_map(|edge| {
            let (a, b) = projection.edge_endpoints(edge)?;
            Some((a.index(), b.index(), *projection.edge_weight(edge).unwrap_or(&0.0)))
        })
        .collect();

    let mut node_count = n;
    let mut global: Vec<usize> = (0..n).collect();
    let mut levels = 0;
    loop {
        let (assignments, moved) = local_moving(node_count, &edges);
        if !moved {
            break;
        }

        for community in global.iter_mut() {
            *community = assignments[*community];
        }

        let merged_count = assignments.iter().max().map_or(0, |&max| max + 1);
        if merged_count == node_count {
            break;
        }
        edges = aggregate(&edges, &assignments);
        node_count = merged_count;
        levels += 1;
    }

    let assignments = normalize(&global);
    log::debug!(
        "Community detection: {} aggregation level(s), {} communities",
        levels,
        assignments.iter().max().map_or(0, |&max| max + 1)
    );

    Partition { assignments }
}

/// One local-moving pass over a weighted undirected edge list.
///
/// Starts from singleton communities and sweeps nodes in ascending
/// order until a full sweep changes nothing. Returns compacted
/// assignments and whether any node moved at all.
fn local_moving(node_count: usize, edges: &[(usize, usize, f64)]) -> (Vec<usize>, bool) {
    let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); node_count];
    let mut degrees = vec![0.0; node_count];
    let mut two_m = 0.0;
    for &(a, b, weight) in edges {
        if a == b {
            // A self-loop counts twice toward its node's degree
            adjacency[a].push((a, weight));
            degrees[a] += 2.0 * weight;
        } else {
            adjacency[a].push((b, weight));
            adjacency[b].push((a, weight));
            degrees[a] += weight;
            degrees[b] += weight;
        }
        two_m += 2.0 * weight;
    }

    if two_m == 0.0 {
        // No edges: every node stays its own community
        return ((0..node_count).collect(), false);
    }

    let mut assignments: Vec<usize> = (0..node_count).collect();
    let mut community_degree = degrees.clone();

    let mut any_moved = false;
    let mut sweeps = 0;
    let mut improved = true;
    while improved && sweeps < MAX_SWEEPS {
        improved = false;
        sweeps += 1;

        for node in 0..node_count {
            let current = assignments[node];

            // Weight from this node into each adjacent community
            let mut links: BTreeMap<usize, f64> = BTreeMap::new();
            links.insert(current, 0.0);
            for &(neighbor, weight) in &adjacency[node] {
                if neighbor == node {
                    continue;
                }
                *links.entry(assignments[neighbor]).or_insert(0.0) += weight;
            }

            // Evaluate moves with the node detached from its community
            community_degree[current] -= degrees[node];

            let mut best_community = current;
            let mut best_gain = gain(links[&current], degrees[node], community_degree[current], two_m);
            for (&candidate, &link_weight) in &links {
                if candidate == current {
                    continue;
                }
                let candidate_gain =
                    gain(link_weight, degrees[node], community_degree[candidate], two_m);
                if candidate_gain > best_gain {
                    best_gain = candidate_gain;
                    best_community = candidate;
                }
            }

            community_degree[best_community] += degrees[node];
            if best_community != current {
                assignments[node] = best_community;
                improved = true;
                any_moved = true;
            }
        }
    }

    (normalize(&assignments), any_moved)
}

/// Collapse communities into super-nodes: intra-community weight becomes
/// the super-node's self-loop, inter-community weights are summed
fn aggregate(edges: &[(usize, usize, f64)], assignments: &[usize]) -> Vec<(usize, usize, f64)> {
    let mut merged: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    for &(a, b, weight) in edges {
        let (ca, cb) = (assignments[a], assignments[b]);
        let key = if ca <= cb { (ca, cb) } else { (cb, ca) };
        *merged.entry(key).or_insert(0.0) += weight;
    }
    merged
        .into_iter()
        .map(|((a, b), weight)| (a, b, weight))
        .collect()
}

/// Modularity gain of attaching a detached node to a community
fn gain(link_weight: f64, node_degree: f64, community_degree: f64, two_m: f64) -> f64 {
    link_weight - node_degree * community_degree / two_m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn graph_from_edges(nodes: &[&str], edges: &[(&str, &str, f64)]) -> SocialGraph {
        let mut builder = GraphBuilder::with_capacity(nodes.len());
        for node in nodes {
            builder.get_or_create_node(node);
        }
        for &(src, dst, weight) in edges {
            builder.add_nomination(src, dst, weight);
        }
        builder.build()
    }

    #[test]
    fn partition_covers_every_node_exactly_once() {
        let graph = graph_from_edges(
            &["1", "2", "3", "4", "5"],
            &[("1", "2", 2.0), ("2", "3", 1.0), ("5", "4", 3.0)],
        );
        let partition = detect_communities(&graph);

        assert_eq!(partition.node_count(), graph.node_count);
        let members: usize = partition.communities().values().map(|m| m.len()).sum();
        assert_eq!(members, graph.node_count);
    }

    #[test]
    fn anti_parallel_weights_are_summed_in_projection() {
        let graph = graph_from_edges(&["1", "2"], &[("1", "2", 2.0), ("2", "1", 3.0)]);
        let projection = project_undirected(&graph);

        assert_eq!(projection.edge_count(), 1);
        let edge = projection.edge_indices().next().unwrap();
        assert_eq!(*projection.edge_weight(edge).unwrap(), 5.0);
    }

    #[test]
    fn two_triangles_with_a_bridge_split_into_two_communities() {
        // Dense triangles {1,2,3} and {4,5,6} joined by one weak edge
        let graph = graph_from_edges(
            &["1", "2", "3", "4", "5", "6"],
            &[
                ("1", "2", 3.0),
                ("2", "3", 3.0),
                ("3", "1", 3.0),
                ("4", "5", 3.0),
                ("5", "6", 3.0),
                ("6", "4", 3.0),
                ("3", "4", 1.0),
            ],
        );
        let partition = detect_communities(&graph);

        let expected = Partition {
            assignments: vec![0, 0, 0, 1, 1, 1],
        };
        assert!(partition.is_equivalent(&expected));

        // The detected grouping should not be worse than the single-blob one
        let projection = project_undirected(&graph);
        let detected = modularity(&projection, partition.assignments());
        let blob = modularity(&projection, &[0; 6]);
        assert!(detected > blob);
    }

    #[test]
    fn aggregation_collapses_intra_community_weight_into_self_loops() {
        let edges = vec![(0, 1, 3.0), (1, 2, 1.0), (2, 3, 3.0)];
        let aggregated = aggregate(&edges, &[0, 0, 1, 1]);

        assert_eq!(aggregated, vec![(0, 0, 3.0), (0, 1, 1.0), (1, 1, 3.0)]);
    }

    #[test]
    fn coarsened_super_nodes_merge_when_their_link_dominates() {
        // Two super-nodes with small self-loops and a dominant link
        // between them; a further level must fold them together
        let edges = vec![(0, 0, 1.0), (1, 1, 1.0), (0, 1, 10.0)];
        let (assignments, moved) = local_moving(2, &edges);

        assert!(moved);
        assert_eq!(assignments, vec![0, 0]);
    }

    #[test]
    fn edgeless_graph_puts_each_node_alone() {
        let graph = graph_from_edges(&["1", "2", "3"], &[]);
        let partition = detect_communities(&graph);

        assert_eq!(partition.community_count(), 3);
    }

    #[test]
    fn empty_graph_yields_empty_partition() {
        let graph = graph_from_edges(&[], &[]);
        let partition = detect_communities(&graph);
        assert_eq!(partition.node_count(), 0);
        assert_eq!(partition.community_count(), 0);
    }

    #[test]
    fn equivalence_ignores_label_permutation() {
        let a = Partition {
            assignments: vec![0, 0, 1, 1],
        };
        let b = Partition {
            assignments: vec![5, 5, 2, 2],
        };
        let c = Partition {
            assignments: vec![0, 1, 1, 0],
        };
        assert!(a.is_equivalent(&b));
        assert!(!a.is_equivalent(&c));
    }
}
