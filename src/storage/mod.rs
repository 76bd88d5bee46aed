//! Results persistence module

use crate::analysis::GroupAnalysis;
use anyhow::Result;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Save analysis results to the specified directory.
///
/// Writes one JSON file per group plus a run-level summary that also
/// records groups whose analysis failed.
pub fn save_results(
    analyses: &[GroupAnalysis],
    failures: &[(String, String)],
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving {} group result(s) to {}", analyses.len(), output_dir);

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(analyses, failures, output_dir)?;
    save_groups(analyses, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save run-level summary information
fn save_summary(
    analyses: &[GroupAnalysis],
    failures: &[(String, String)],
    output_dir: &str,
) -> Result<()> {
    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let summary = json!({
        "group_count": analyses.len(),
        "failed_group_count": failures.len(),
        "groups": analyses.iter().map(|analysis| {
            json!({
                "group": analysis.group,
                "node_count": analysis.node_count,
                "edge_count": analysis.edge_count,
                "community_count": analysis.communities.values().max().map_or(0, |&max| max + 1),
                "metrics": analysis.metrics,
            })
        }).collect::<Vec<_>>(),
        "failures": failures.iter().map(|(group, reason)| {
            json!({ "group": group, "reason": reason })
        }).collect::<Vec<_>>(),
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save the full analysis of each group
fn save_groups(analyses: &[GroupAnalysis], output_dir: &str) -> Result<()> {
    let groups_dir = Path::new(output_dir).join("groups");
    fs::create_dir_all(&groups_dir)?;

    for analysis in analyses {
        let path = groups_dir.join(format!("group_{}.json", file_stem(&analysis.group)));
        let mut file = File::create(path)?;
        file.write_all(to_string_pretty(analysis)?.as_bytes())?;
    }

    Ok(())
}

/// Group names come straight from the roster; keep filenames portable
fn file_stem(group: &str) -> String {
    group
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_replaces_non_alphanumeric_characters() {
        assert_eq!(file_stem("Class 7/B"), "Class_7_B");
        assert_eq!(file_stem("G1"), "G1");
    }
}
