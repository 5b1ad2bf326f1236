//! Dependency-graph rendering for a named entry.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::dot::to_dot;
use super::entry::EntryResolver;
use super::metadata::{output_parent_names, scan_output_signals};
use super::svg::to_svg;
use super::traverse::{dfs, ClusterGraph, GraphDoc, NodeColor, RenderSession};
use crate::utils::error::{Error, Result};

/// Render DPI of the generated image
pub const RENDER_DPI: u32 = 400;

/// Label of the primary cluster
pub const TARGET_CLUSTER_LABEL: &str = "Entry and Its Parent(s)";
/// Label of the output-ancestry cluster
pub const OUTPUT_CLUSTER_LABEL: &str = "Parent(s) of the Output Entry";

/// Name of the synthetic output node
const OUTPUT_NODE: &str = "output";

/// Files written by one render invocation
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// Retained graph source
    pub dot_path: PathBuf,
    /// Rendered image
    pub svg_path: PathBuf,
}

/// Generate the dependency graph for `target` under `dest_dir`.
///
/// Writes `<dest_dir>/image` (DOT source, retained) and
/// `<dest_dir>/image.svg`. An unknown target is an error and produces no
/// partial output; unresolvable parents inside the traversal are skipped.
pub fn draw(
    resolver: &dyn EntryResolver,
    target: &str,
    dest_dir: &Path,
) -> Result<RenderOutcome> {
    let target_entry = resolver
        .byname(target)
        .ok_or_else(|| Error::EntryNotFound(target.to_string()))?;

    let signals = scan_output_signals(&target_entry);

    let mut session = RenderSession::new();
    let mut doc = GraphDoc {
        dpi: RENDER_DPI,
        ..Default::default()
    };

    if let Some(cluster) = dfs(resolver, target, TARGET_CLUSTER_LABEL, false, &mut session) {
        doc.clusters.push(cluster);
    }

    if signals.output {
        doc.free_nodes
            .push((OUTPUT_NODE.to_string(), NodeColor::Blue));
        doc.free_edges
            .push((target.to_string(), OUTPUT_NODE.to_string()));
    }

    // Output ancestry: the captured parent data wins over the
    // output_entry_parents list when both are present.
    let output_parents = if signals.parent_data.is_some() {
        output_parent_names(&target_entry)
    } else {
        signals.entry_parents.clone()
    };

    if !output_parents.is_empty() {
        // All output sub-traversals share one rendered cluster.
        let mut output_cluster = ClusterGraph {
            label: OUTPUT_CLUSTER_LABEL.to_string(),
            ..Default::default()
        };

        for parent_name in &output_parents {
            let Some(cluster) =
                dfs(resolver, parent_name, OUTPUT_CLUSTER_LABEL, true, &mut session)
            else {
                continue;
            };

            output_cluster.nodes.extend(cluster.nodes);
            output_cluster.edges.extend(cluster.edges);
            doc.free_edges
                .push((parent_name.clone(), OUTPUT_NODE.to_string()));
        }

        if !output_cluster.nodes.is_empty() {
            doc.clusters.push(output_cluster);
        }
    }

    fs::create_dir_all(dest_dir)?;
    let dot_path = dest_dir.join("image");
    let svg_path = dest_dir.join("image.svg");

    fs::write(&dot_path, to_dot(&doc))?;
    fs::write(&svg_path, to_svg(&doc))?;

    info!("Graph generated for '{}' under {}", target, dest_dir.display());

    Ok(RenderOutcome { dot_path, svg_path })
}
