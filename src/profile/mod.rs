//! Behavioral role classification

use crate::community::Partition;
use crate::config::AnalyzerConfig;
use crate::graph::SocialGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The five named behavioral profiles of a group.
///
/// Membership is not mutually exclusive: a node can appear in several
/// profiles, or in none. Isolate, Solitary and Star exclude each other
/// through their degree conditions alone; no further exclusivity is
/// imposed. Each set lists respondent identifiers in node order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profiles {
    /// No connections at all (in-degree 0, out-degree 0)
    #[serde(rename = "Isolates")]
    pub isolates: Vec<String>,

    /// Nominated by others but nominates nobody
    #[serde(rename = "Solitary")]
    pub solitary: Vec<String>,

    /// Heavily nominated (in-degree at or above the star threshold)
    #[serde(rename = "Star")]
    pub stars: Vec<String>,

    /// Enough reciprocal ties inside the own community
    #[serde(rename = "Cliques")]
    pub cliques: Vec<String>,

    /// Nominations spanning several communities
    #[serde(rename = "Interconnector")]
    pub interconnectors: Vec<String>,
}

/// Classify every node of a group graph into behavioral profiles.
///
/// All predicates are evaluated independently per node; the partition
/// is only consulted for the Clique and Interconnector rules.
pub fn classify(graph: &SocialGraph, partition: &Partition, config: &AnalyzerConfig) -> Profiles {
    let mut profiles = Profiles::default();

    for node in 0..graph.node_count {
        let in_degree = graph.in_degree(node);
        let out_degree = graph.out_degree(node);
        let id = graph.node_id(node).to_string();

        if in_degree == 0 && out_degree == 0 {
            profiles.isolates.push(id.clone());
        }
        if in_degree > 0 && out_degree == 0 {
            profiles.solitary.push(id.clone());
        }
        if in_degree >= config.star_threshold {
            profiles.stars.push(id.clone());
        }

        if reciprocal_community_ties(graph, partition, node) >= config.clique_threshold {
            profiles.cliques.push(id.clone());
        }

        if nominee_community_span(graph, partition, node) >= config.interconnector_threshold {
            profiles.interconnectors.push(id);
        }
    }

    log::debug!(
        "Profiles: {} isolates, {} solitary, {} stars, {} clique members, {} interconnectors",
        profiles.isolates.len(),
        profiles.solitary.len(),
        profiles.stars.len(),
        profiles.cliques.len(),
        profiles.interconnectors.len(),
    );

    profiles
}

/// Count neighbors (in either direction) that reciprocate the tie and
/// share the node's community
fn reciprocal_community_ties(graph: &SocialGraph, partition: &Partition, node: usize) -> usize {
    let community = partition.community_of(node);
    graph
        .undirected_neighbors(node)
        .into_iter()
        .filter(|&neighbor| {
            graph.has_edge(node, neighbor)
                && graph.has_edge(neighbor as usize, node as u32)
                && partition.community_of(neighbor as usize) == community
        })
        .count()
}

/// Number of distinct communities among a node's nominees
fn nominee_community_span(graph: &SocialGraph, partition: &Partition, node: usize) -> usize {
    let communities: BTreeSet<usize> = graph
        .outgoing_edges(node)
        .iter()
        .map(|&(target, _)| partition.community_of(target as usize))
        .collect();
    communities.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community;
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

    fn classify_default(graph: &SocialGraph, partition: &Partition) -> Profiles {
        classify(graph, partition, &AnalyzerConfig::default())
    }

    #[test]
    fn nodes_without_outgoing_nominations_are_solitary() {
        // A->B(2), B->A(1), A->C(1), A->D(3)
        let graph = graph_from_edges(
            &["A", "B", "C", "D"],
            &[("A", "B", 2.0), ("B", "A", 1.0), ("A", "C", 1.0), ("A", "D", 3.0)],
        );
        let partition = community::detect_communities(&graph);
        let profiles = classify_default(&graph, &partition);

        assert_eq!(profiles.solitary, vec!["C".to_string(), "D".to_string()]);
        assert!(profiles.isolates.is_empty());
        assert!(profiles.stars.is_empty());
    }

    #[test]
    fn unconnected_node_is_an_isolate() {
        let graph = graph_from_edges(&["1"], &[]);
        let partition = community::detect_communities(&graph);
        let profiles = classify_default(&graph, &partition);

        assert_eq!(profiles.isolates, vec!["1".to_string()]);
        assert!(profiles.solitary.is_empty());
    }

    #[test]
    fn hub_with_four_nominations_is_a_star() {
        let graph = graph_from_edges(
            &["hub", "1", "2", "3", "4"],
            &[
                ("1", "hub", 1.0),
                ("2", "hub", 2.0),
                ("3", "hub", 3.0),
                ("4", "hub", 1.0),
            ],
        );
        let partition = community::detect_communities(&graph);
        let profiles = classify_default(&graph, &partition);

        assert_eq!(profiles.stars, vec!["hub".to_string()]);
    }

    #[test]
    fn isolate_solitary_star_never_intersect() {
        let graph = graph_from_edges(
            &["A", "B", "C", "D", "E", "F"],
            &[
                ("A", "B", 1.0),
                ("B", "A", 2.0),
                ("C", "B", 1.0),
                ("D", "B", 3.0),
                ("E", "B", 2.0),
            ],
        );
        let partition = community::detect_communities(&graph);
        let profiles = classify_default(&graph, &partition);

        let isolates: BTreeSet<_> = profiles.isolates.iter().collect();
        let solitary: BTreeSet<_> = profiles.solitary.iter().collect();
        let stars: BTreeSet<_> = profiles.stars.iter().collect();
        let triple: Vec<_> = isolates
            .intersection(&solitary)
            .filter(|id| stars.contains(**id))
            .collect();
        assert!(triple.is_empty());
    }

    #[test]
    fn mutual_triangle_forms_a_clique() {
        let graph = graph_from_edges(
            &["1", "2", "3"],
            &[
                ("1", "2", 3.0),
                ("2", "1", 3.0),
                ("2", "3", 3.0),
                ("3", "2", 3.0),
                ("3", "1", 3.0),
                ("1", "3", 3.0),
            ],
        );
        let partition = community::detect_communities(&graph);
        let profiles = classify_default(&graph, &partition);

        assert_eq!(
            profiles.cliques,
            vec!["1".to_string(), "2".to_string(), "3".to_string()]
        );
    }

    #[test]
    fn one_way_ties_do_not_form_a_clique() {
        let graph = graph_from_edges(
            &["1", "2", "3"],
            &[("1", "2", 3.0), ("2", "3", 3.0), ("3", "1", 3.0)],
        );
        let partition = Partition::from_assignments(vec![0, 0, 0]);
        let profiles = classify_default(&graph, &partition);

        assert!(profiles.cliques.is_empty());
    }

    #[test]
    fn reciprocal_ties_outside_the_community_do_not_count() {
        let graph = graph_from_edges(
            &["1", "2", "3"],
            &[
                ("1", "2", 3.0),
                ("2", "1", 3.0),
                ("1", "3", 3.0),
                ("3", "1", 3.0),
            ],
        );
        // Node 1 has two reciprocal ties, but only one inside its community
        let partition = Partition::from_assignments(vec![0, 0, 1]);
        let profiles = classify_default(&graph, &partition);

        assert!(profiles.cliques.is_empty());
    }

    #[test]
    fn nominating_into_three_communities_makes_an_interconnector() {
        let graph = graph_from_edges(
            &["bridge", "a", "b", "c"],
            &[("bridge", "a", 1.0), ("bridge", "b", 1.0), ("bridge", "c", 1.0)],
        );
        let partition = Partition::from_assignments(vec![0, 1, 2, 3]);
        let profiles = classify_default(&graph, &partition);

        assert_eq!(profiles.interconnectors, vec!["bridge".to_string()]);
    }

    #[test]
    fn incoming_edges_do_not_make_an_interconnector() {
        let graph = graph_from_edges(
            &["sink", "a", "b", "c"],
            &[("a", "sink", 1.0), ("b", "sink", 1.0), ("c", "sink", 1.0)],
        );
        let partition = Partition::from_assignments(vec![0, 1, 2, 3]);
        let profiles = classify_default(&graph, &partition);

        assert!(profiles.interconnectors.is_empty());
    }
}
