//! SVG rendering of the graph document.
//!
//! Clusters lay out side by side; inside a cluster, nodes sit in depth
//! layers with the traversal root at the bottom and its ancestors stacked
//! above. The synthetic output node, when present, hangs below the clusters.

use std::collections::HashMap;

use super::traverse::{GraphDoc, NodeColor};

/// Layout constants
const NODE_RY: f64 = 18.0;
const ROW_HEIGHT: f64 = 80.0;
const NODE_GAP: f64 = 36.0;
const CLUSTER_PAD: f64 = 34.0;
const CLUSTER_GAP: f64 = 60.0;
const MARGIN: f64 = 30.0;
const LABEL_HEIGHT: f64 = 26.0;
const FREE_NODE_DROP: f64 = 90.0;

const COLOR_TEXT: &str = "#2c3e50";
const COLOR_EDGE: &str = "#2c3e50";
const COLOR_CLUSTER: &str = "#7f8c8d";
const FONT: &str = "Arial, sans-serif";

fn node_rx(name: &str) -> f64 {
    (name.len() as f64 * 4.2 + 22.0).max(40.0)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

struct PlacedNode {
    x: f64,
    y: f64,
    rx: f64,
    color: NodeColor,
    name: String,
}

/// Render the graph document as a standalone SVG string.
pub fn to_svg(doc: &GraphDoc) -> String {
    let mut placed: Vec<PlacedNode> = Vec::new();
    let mut centers: HashMap<String, (f64, f64, f64)> = HashMap::new();
    let mut cluster_boxes: Vec<(f64, f64, f64, f64, String)> = Vec::new();

    let mut cursor_x = MARGIN;
    let mut max_bottom = MARGIN;

    for cluster in &doc.clusters {
        let max_depth = cluster.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let rows = max_depth + 1;

        // Nodes per depth layer, deepest ancestors on top.
        let mut row_widths = vec![0.0f64; rows];
        for node in &cluster.nodes {
            row_widths[node.depth] += node_rx(&node.name) * 2.0 + NODE_GAP;
        }

        let content_width = row_widths.iter().cloned().fold(120.0, f64::max);
        let box_x = cursor_x;
        let box_y = MARGIN;
        let box_w = content_width + 2.0 * CLUSTER_PAD;
        let box_h = LABEL_HEIGHT + rows as f64 * ROW_HEIGHT + CLUSTER_PAD;

        let mut offsets = vec![0.0f64; rows];
        for node in &cluster.nodes {
            let rx = node_rx(&node.name);
            let row_used = &mut offsets[node.depth];
            let slot = (content_width - row_widths[node.depth]) / 2.0;
            let x = box_x + CLUSTER_PAD + slot + *row_used + rx + NODE_GAP / 2.0;
            // depth 0 at the bottom of the cluster box
            let y = box_y
                + LABEL_HEIGHT
                + (rows - 1 - node.depth) as f64 * ROW_HEIGHT
                + ROW_HEIGHT / 2.0;
            *row_used += rx * 2.0 + NODE_GAP;

            centers.insert(node.name.clone(), (x, y, rx));
            placed.push(PlacedNode {
                x,
                y,
                rx,
                color: node.color,
                name: node.name.clone(),
            });
        }

        cluster_boxes.push((box_x, box_y, box_w, box_h, cluster.label.clone()));
        cursor_x += box_w + CLUSTER_GAP;
        max_bottom = max_bottom.max(box_y + box_h);
    }

    let total_width = (cursor_x - CLUSTER_GAP + MARGIN).max(2.0 * MARGIN + 120.0);

    // Free nodes hang centered below the clusters.
    let free_y = max_bottom + FREE_NODE_DROP;
    let free_count = doc.free_nodes.len();
    for (i, (name, color)) in doc.free_nodes.iter().enumerate() {
        let rx = node_rx(name);
        let x = total_width * (i + 1) as f64 / (free_count + 1) as f64;

        centers.insert(name.clone(), (x, free_y, rx));
        placed.push(PlacedNode {
            x,
            y: free_y,
            rx,
            color: *color,
            name: name.clone(),
        });
    }

    let total_height = if free_count > 0 {
        free_y + NODE_RY + MARGIN
    } else {
        max_bottom + MARGIN
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {:.0} {:.0}" width="{:.0}" height="{:.0}">"#,
        total_width, total_height, total_width, total_height
    ));
    svg.push('\n');

    svg.push_str(&format!(
        r#"<defs><marker id="arrow" markerWidth="10" markerHeight="8" refX="9" refY="4" orient="auto"><path d="M0,0 L10,4 L0,8 z" fill="{}"/></marker></defs>"#,
        COLOR_EDGE
    ));
    svg.push('\n');

    svg.push_str(&format!(
        r#"<rect width="{:.0}" height="{:.0}" fill="white"/>"#,
        total_width, total_height
    ));
    svg.push('\n');

    for (x, y, w, h, label) in &cluster_boxes {
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="{}" stroke-width="1" stroke-dasharray="4 3"/>"#,
            x, y, w, h, COLOR_CLUSTER
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="{}" font-size="13" fill="{}">{}</text>"#,
            x + 8.0,
            y + 17.0,
            FONT,
            COLOR_TEXT,
            escape_xml(label)
        ));
        svg.push('\n');
    }

    let all_edges = doc
        .clusters
        .iter()
        .flat_map(|c| c.edges.iter())
        .chain(doc.free_edges.iter());

    for (from, to) in all_edges {
        let (Some(&(x1, y1, _)), Some(&(x2, y2, _))) = (centers.get(from), centers.get(to))
        else {
            continue;
        };

        // Leave the source at its lower rim, enter the target at its upper
        // rim (parents sit above children).
        let (start_y, end_y) = if y1 <= y2 {
            (y1 + NODE_RY, y2 - NODE_RY)
        } else {
            (y1 - NODE_RY, y2 + NODE_RY)
        };

        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1.2" marker-end="url(#arrow)"/>"#,
            x1, start_y, x2, end_y, COLOR_EDGE
        ));
        svg.push('\n');
    }

    for node in &placed {
        svg.push_str(&format!(
            r#"<ellipse cx="{:.1}" cy="{:.1}" rx="{:.1}" ry="{:.1}" fill="{}" stroke="{}" stroke-width="1"/>"#,
            node.x,
            node.y,
            node.rx,
            NODE_RY,
            node.color.svg_fill(),
            COLOR_EDGE
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="{}" font-size="12" fill="{}">{}</text>"#,
            node.x,
            node.y + 4.0,
            FONT,
            COLOR_TEXT,
            escape_xml(&node.name)
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}
