//! DOT source generation for the render graph.

use super::traverse::GraphDoc;

/// Quote a node name for DOT output
fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Render the graph document as DOT source.
///
/// The layout mirrors what the graphviz toolchain expects: a global dpi
/// attribute, ellipse nodes, and one dotted subgraph per cluster.
pub fn to_dot(doc: &GraphDoc) -> String {
    let mut out = String::new();

    out.push_str("digraph {\n");
    out.push_str(&format!("\tgraph [dpi={}]\n", doc.dpi));
    out.push_str("\tnode [shape=ellipse]\n");

    for (index, cluster) in doc.clusters.iter().enumerate() {
        out.push_str(&format!("\tsubgraph cluster_{} {{\n", index));
        out.push_str("\t\tstyle=dotted\n");
        out.push_str(&format!("\t\tlabel=\"{}\"\n", cluster.label));

        for node in &cluster.nodes {
            out.push_str(&format!(
                "\t\t{} [color={} style=filled]\n",
                quote(&node.name),
                node.color.dot_name()
            ));
        }
        for (parent, child) in &cluster.edges {
            out.push_str(&format!("\t\t{} -> {}\n", quote(parent), quote(child)));
        }

        out.push_str("\t}\n");
    }

    for (name, color) in &doc.free_nodes {
        out.push_str(&format!(
            "\t{} [color={} style=filled]\n",
            quote(name),
            color.dot_name()
        ));
    }
    for (from, to) in &doc.free_edges {
        out.push_str(&format!("\t{} -> {}\n", quote(from), quote(to)));
    }

    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::traverse::{ClusterGraph, NodeColor, RenderedNode};

    fn sample_doc() -> GraphDoc {
        GraphDoc {
            dpi: 400,
            clusters: vec![ClusterGraph {
                label: "Entry and Its Parent(s)".to_string(),
                nodes: vec![
                    RenderedNode {
                        name: "target".to_string(),
                        color: NodeColor::Red,
                        depth: 0,
                    },
                    RenderedNode {
                        name: "parent".to_string(),
                        color: NodeColor::LightCoral,
                        depth: 1,
                    },
                ],
                edges: vec![("parent".to_string(), "target".to_string())],
            }],
            free_nodes: vec![("output".to_string(), NodeColor::Blue)],
            free_edges: vec![("target".to_string(), "output".to_string())],
        }
    }

    #[test]
    fn test_dot_structure() {
        let dot = to_dot(&sample_doc());

        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("graph [dpi=400]"));
        assert!(dot.contains("node [shape=ellipse]"));
        assert!(dot.contains("subgraph cluster_0 {"));
        assert!(dot.contains("style=dotted"));
        assert!(dot.contains("label=\"Entry and Its Parent(s)\""));
        assert!(dot.contains("\"target\" [color=red style=filled]"));
        assert!(dot.contains("\"parent\" -> \"target\""));
        assert!(dot.contains("\"output\" [color=blue style=filled]"));
        assert!(dot.contains("\"target\" -> \"output\""));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_dot_escapes_quotes() {
        let mut doc = sample_doc();
        doc.free_nodes.push(("odd\"name".to_string(), NodeColor::Blue));

        let dot = to_dot(&doc);
        assert!(dot.contains("\"odd\\\"name\""));
    }
}
