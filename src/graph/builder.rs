//! Graph construction module

use crate::data::SurveyRow;
use crate::graph::SocialGraph;
use std::collections::HashMap;

/// Builder for incrementally constructing a SocialGraph from roster rows
pub struct GraphBuilder {
    /// Number of nodes
    node_count: usize,

    /// Mapping from respondent identifiers to node indices
    id_to_index: HashMap<String, u32>,

    /// Respondent identifiers in insertion order
    node_ids: Vec<String>,

    /// Outgoing (target, weight) lists per node, unsorted until build
    out_edges: Vec<Vec<(u32, f64)>>,
}

impl GraphBuilder {
    /// Create a new graph builder with the given node capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            node_count: 0,
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            out_edges: Vec::with_capacity(capacity),
        }
    }

    /// Get or create a node for the given respondent identifier.
    /// Re-adding an existing identifier is a no-op.
    pub fn get_or_create_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.node_count as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.out_edges.push(Vec::new());
        self.node_count += 1;

        idx
    }

    /// Add a nomination edge from subject to friend with the given
    /// closeness weight. The friend becomes a node even if it never
    /// appears as a subject. Re-adding an existing (subject, friend)
    /// pair overwrites the stored weight.
    pub fn add_nomination(&mut self, subject: &str, friend: &str, strength: f64) {
        let src = self.get_or_create_node(subject);
        let dst = self.get_or_create_node(friend);

        let list = &mut self.out_edges[src as usize];
        if let Some(entry) = list.iter_mut().find(|(target, _)| *target == dst) {
            entry.1 = strength;
        } else {
            list.push((dst, strength));
        }
    }

    /// Add one roster row: the subject node plus an edge per filled slot
    pub fn add_row(&mut self, row: &SurveyRow) {
        self.get_or_create_node(&row.subject);
        for nomination in row.filled_nominations() {
            self.add_nomination(&row.subject, &nomination.friend, nomination.strength);
        }
    }

    /// Build the graph, sorting adjacency lists and deriving incoming lists
    pub fn build(mut self) -> SocialGraph {
        // Sort for binary search efficiency
        for list in &mut self.out_edges {
            list.sort_unstable_by_key(|&(target, _)| target);
        }

        let mut in_edges: Vec<Vec<u32>> = vec![Vec::new(); self.node_count];
        for (src, list) in self.out_edges.iter().enumerate() {
            for &(dst, _) in list {
                in_edges[dst as usize].push(src as u32);
            }
        }
        for list in &mut in_edges {
            list.sort_unstable();
        }

        SocialGraph {
            node_count: self.node_count,
            node_ids: self.node_ids,
            out_edges: self.out_edges,
            in_edges,
        }
    }

    /// Build a graph directly from a group's roster rows
    pub fn from_rows(rows: &[SurveyRow]) -> SocialGraph {
        let mut builder = Self::with_capacity(rows.len());
        for row in rows {
            builder.add_row(row);
        }
        builder.build()
    }
}
