//! Per-group analysis pipeline

use crate::community::{self, Partition};
use crate::config::AnalyzerConfig;
use crate::data::{self, RawSurveyRow};
use crate::error::AnalysisError;
use crate::graph::{GraphBuilder, SocialGraph};
use crate::metrics::{self, GroupMetrics};
use crate::profile::{self, Profiles};
use serde::Serialize;
use std::collections::BTreeMap;

/// Complete analysis results for one survey group
#[derive(Debug, Clone, Serialize)]
pub struct GroupAnalysis {
    /// Group name from the roster
    pub group: String,

    /// Number of members (including nominees without their own row)
    pub node_count: usize,

    /// Number of directed nomination edges
    pub edge_count: usize,

    /// Member identifiers in graph order
    pub nodes: Vec<String>,

    /// Nomination edges as (source, target, closeness) triples
    pub edges: Vec<(String, String, f64)>,

    /// Member identifier -> detected community id
    pub communities: BTreeMap<String, usize>,

    /// Behavioral profile membership
    pub profiles: Profiles,

    /// Group cohesion metrics
    pub metrics: GroupMetrics,
}

/// Run the full pipeline for one group: validate the group's rows,
/// build the graph, detect communities, classify roles, compute
/// cohesion metrics.
///
/// Validation happens here rather than at load time so a malformed row
/// fails only this group. The graph and partition are built once and
/// shared by the classifier and the metrics; both stay local to this
/// call.
pub fn analyze_group(
    group: &str,
    rows: &[RawSurveyRow],
    config: &AnalyzerConfig,
) -> Result<GroupAnalysis, AnalysisError> {
    log::info!("Analyzing group '{}' ({} rows)", group, rows.len());

    let rows = data::validate_rows(rows)?;
    let graph = GraphBuilder::from_rows(&rows);
    let partition = community::detect_communities(&graph);
    let profiles = profile::classify(&graph, &partition, config);
    let metrics = metrics::compute_metrics(&graph, config)?;

    Ok(collect(group, &graph, &partition, profiles, metrics))
}

fn collect(
    group: &str,
    graph: &SocialGraph,
    partition: &Partition,
    profiles: Profiles,
    metrics: GroupMetrics,
) -> GroupAnalysis {
    let communities = (0..graph.node_count)
        .map(|node| (graph.node_id(node).to_string(), partition.community_of(node)))
        .collect();

    GroupAnalysis {
        group: group.to_string(),
        node_count: graph.node_count,
        edge_count: graph.edge_count(),
        nodes: graph.node_ids.clone(),
        edges: graph.edge_list(),
        communities,
        profiles,
        metrics,
    }
}
