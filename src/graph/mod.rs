//! Directed weighted graph representation for one survey group

pub mod builder;

pub use builder::GraphBuilder;

/// Adjacency-list representation of a directed weighted nomination graph.
///
/// Node identifiers are the respondents' self-reported numbers, interned
/// to dense `u32` indices in first-appearance order (subjects in row order,
/// then nominees as they are referenced). Adjacency lists are sorted by
/// target so `has_edge` is a binary search.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Original respondent identifiers, indexed by node
    pub node_ids: Vec<String>,

    /// Outgoing edges per node: (target, closeness weight), sorted by target
    pub out_edges: Vec<Vec<(u32, f64)>>,

    /// Incoming edge sources per node, sorted
    pub in_edges: Vec<Vec<u32>>,
}

impl SocialGraph {
    /// Total number of directed edges
    pub fn edge_count(&self) -> usize {
        self.out_edges.iter().map(|list| list.len()).sum()
    }

    /// Outgoing edges for a node as (target, weight) pairs
    pub fn outgoing_edges(&self, node: usize) -> &[(u32, f64)] {
        &self.out_edges[node]
    }

    /// Sources of incoming edges for a node
    pub fn incoming_edges(&self, node: usize) -> &[u32] {
        &self.in_edges[node]
    }

    /// Out-degree of a node
    pub fn out_degree(&self, node: usize) -> usize {
        self.out_edges[node].len()
    }

    /// In-degree of a node
    pub fn in_degree(&self, node: usize) -> usize {
        self.in_edges[node].len()
    }

    /// Check if there's an edge from src to dst
    pub fn has_edge(&self, src: usize, dst: u32) -> bool {
        self.out_edges[src]
            .binary_search_by_key(&dst, |&(target, _)| target)
            .is_ok()
    }

    /// Weight of the edge from src to dst, if present
    pub fn edge_weight(&self, src: usize, dst: u32) -> Option<f64> {
        self.out_edges[src]
            .binary_search_by_key(&dst, |&(target, _)| target)
            .ok()
            .map(|pos| self.out_edges[src][pos].1)
    }

    /// Neighbors of a node ignoring edge direction, deduplicated and sorted
    pub fn undirected_neighbors(&self, node: usize) -> Vec<u32> {
        let mut neighbors: Vec<u32> = self.out_edges[node]
            .iter()
            .map(|&(target, _)| target)
            .chain(self.in_edges[node].iter().copied())
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    /// Original respondent identifier for a node index
    pub fn node_id(&self, node: usize) -> &str {
        &self.node_ids[node]
    }

    /// All directed edges as (source id, target id, weight) triples,
    /// in source-index then target-index order
    pub fn edge_list(&self) -> Vec<(String, String, f64)> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for (src, list) in self.out_edges.iter().enumerate() {
            for &(dst, weight) in list {
                edges.push((
                    self.node_ids[src].clone(),
                    self.node_ids[dst as usize].clone(),
                    weight,
                ));
            }
        }
        edges
    }
}
