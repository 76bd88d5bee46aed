//! Group cohesion metrics

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::graph::SocialGraph;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The four cohesion percentages of a group.
///
/// Values are 0-100 under the nomination cap and are reported unclamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    /// Actual nominations relative to the theoretical maximum
    pub connectedness: f64,

    /// Share of nominations that are returned
    pub reciprocity: f64,

    /// Share of the group inside the largest weakly-connected component
    pub reachability: f64,

    /// Share of the group the best-connected member reaches within the
    /// broadcast radius
    pub speed_of_communication: f64,
}

/// Union-Find data structure for weakly-connected component analysis
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Size of each set (for union by rank)
    rank: Vec<u32>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure
    pub fn new(size: usize) -> Self {
        let mut parent = Vec::with_capacity(size);
        let mut rank = Vec::with_capacity(size);

        // Initialize each node as its own set
        for i in 0..size {
            parent.push(i as u32);
            rank.push(1);
        }

        Self { parent, rank }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let px = self.parent[x as usize];
        if px != x {
            // Path compression: set parent to root
            self.parent[x as usize] = self.find(px);
        }
        self.parent[x as usize]
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return; // Already in the same set
        }

        // Union by rank: attach smaller tree under root of larger tree
        let rank_x = self.rank[root_x as usize];
        let rank_y = self.rank[root_y as usize];

        if rank_x > rank_y {
            self.parent[root_y as usize] = root_x;
            self.rank[root_x as usize] += self.rank[root_y as usize];
        } else {
            self.parent[root_x as usize] = root_y;
            self.rank[root_y as usize] += self.rank[root_x as usize];
        }
    }

    /// Get the size of the set containing x
    pub fn size(&mut self, x: u32) -> u32 {
        let root = self.find(x);
        self.rank[root as usize]
    }
}

/// Members of the largest weakly-connected component, ascending by node
/// index. Size ties resolve to the component containing the lowest index.
pub fn largest_weak_component(graph: &SocialGraph) -> Vec<usize> {
    let n = graph.node_count;
    let mut sets = DisjointSets::new(n);
    for (src, list) in graph.out_edges.iter().enumerate() {
        for &(dst, _) in list {
            sets.union(src as u32, dst);
        }
    }

    let mut best_root = None;
    let mut best_size = 0;
    for node in 0..n {
        let root = sets.find(node as u32);
        let size = sets.size(root);
        if size > best_size {
            best_size = size;
            best_root = Some(root);
        }
    }

    let best_root = match best_root {
        Some(root) => root,
        None => return Vec::new(),
    };

    (0..n)
        .filter(|&node| sets.find(node as u32) == best_root)
        .collect()
}

/// Count nodes reachable from `start` within `radius` undirected hops,
/// excluding `start` itself
fn reachable_within(graph: &SocialGraph, start: usize, radius: usize) -> usize {
    let mut distance = vec![usize::MAX; graph.node_count];
    distance[start] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(start);

    let mut reached = 0;
    while let Some(node) = queue.pop_front() {
        if distance[node] == radius {
            continue;
        }
        for neighbor in graph.undirected_neighbors(node) {
            let neighbor = neighbor as usize;
            if distance[neighbor] == usize::MAX {
                distance[neighbor] = distance[node] + 1;
                reached += 1;
                queue.push_back(neighbor);
            }
        }
    }

    reached
}

/// Compute the four cohesion metrics of a group graph.
///
/// Fails with `EmptyGraph` when the graph has no nodes; every other
/// degenerate shape resolves through the documented tie-breaks.
pub fn compute_metrics(
    graph: &SocialGraph,
    config: &AnalyzerConfig,
) -> Result<GroupMetrics, AnalysisError> {
    let n = graph.node_count;
    if n == 0 {
        return Err(AnalysisError::EmptyGraph);
    }

    let edge_count = graph.edge_count();
    let max_connections = config.nomination_cap * n;
    let connectedness = edge_count as f64 / max_connections as f64 * 100.0;

    // Each direction of a mutual pair counts, matching the cap below
    let mutual_edges: usize = graph
        .out_edges
        .iter()
        .enumerate()
        .map(|(src, list)| {
            list.iter()
                .filter(|&&(dst, _)| graph.has_edge(dst as usize, src as u32))
                .count()
        })
        .sum();
    let max_mutual = edge_count.min(max_connections / 2);
    let reciprocity = if max_mutual > 0 {
        mutual_edges as f64 / max_mutual as f64 * 100.0
    } else {
        0.0
    };

    let component = largest_weak_component(graph);
    let reachability = component.len() as f64 / n as f64 * 100.0;

    // Best-connected member by total degree; ties go to the lowest node
    // index, which is first-appearance order in the roster
    let most_connected = component
        .iter()
        .copied()
        .max_by_key(|&node| (graph.in_degree(node) + graph.out_degree(node), usize::MAX - node))
        .unwrap_or(0);
    let reached = reachable_within(graph, most_connected, config.broadcast_radius);
    let speed_of_communication = reached as f64 / n as f64 * 100.0;

    log::debug!(
        "Metrics over {} nodes / {} edges: connectedness {:.2}%, reciprocity {:.2}%, \
reachability {:.2}%, speed {:.2}%",
        n,
        edge_count,
        connectedness,
        reciprocity,
        reachability,
        speed_of_communication,
    );

    Ok(GroupMetrics {
        connectedness,
        reciprocity,
        reachability,
        speed_of_communication,
    })
}
