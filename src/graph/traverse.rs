//! Ancestry traversal and the in-memory graph document.

use std::collections::HashSet;

use tracing::{debug, error};

use super::entry::{Entry, EntryResolver};
use super::metadata::{parent_refs, ParentRef, PARENT_ENTRIES_KEY};

/// Fill color of a rendered node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeColor {
    /// The first node visited in a render invocation
    Red,
    /// Ancestor of the output entry
    LightBlue,
    /// Ancestor of the primary target
    LightCoral,
    /// The synthetic output node
    Blue,
}

impl NodeColor {
    pub fn dot_name(&self) -> &'static str {
        match self {
            NodeColor::Red => "red",
            NodeColor::LightBlue => "lightblue",
            NodeColor::LightCoral => "lightcoral",
            NodeColor::Blue => "blue",
        }
    }

    pub fn svg_fill(&self) -> &'static str {
        match self {
            NodeColor::Red => "#e74c3c",
            NodeColor::LightBlue => "#add8e6",
            NodeColor::LightCoral => "#f08080",
            NodeColor::Blue => "#3498db",
        }
    }
}

/// One laid-out node: name, fill color, and distance from the traversal root
#[derive(Debug, Clone)]
pub struct RenderedNode {
    pub name: String,
    pub color: NodeColor,
    pub depth: usize,
}

/// Nodes and edges discovered by one traversal, drawn inside one visual
/// cluster. Edges run parent -> child.
#[derive(Debug, Clone, Default)]
pub struct ClusterGraph {
    pub label: String,
    pub nodes: Vec<RenderedNode>,
    pub edges: Vec<(String, String)>,
}

/// The complete graph of one render invocation: clusters plus free-standing
/// nodes and edges (the synthetic output node and its links).
#[derive(Debug, Clone, Default)]
pub struct GraphDoc {
    pub dpi: u32,
    pub clusters: Vec<ClusterGraph>,
    pub free_nodes: Vec<(String, NodeColor)>,
    pub free_edges: Vec<(String, String)>,
}

/// Per-invocation traversal state.
///
/// The first node any traversal of this session visits is colored red, no
/// matter which cluster triggered it. The flag lives here, not in process
/// state, so one render call can never leak into the next.
#[derive(Debug, Default)]
pub struct RenderSession {
    initial_root_visited: bool,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_color(&mut self, is_output: bool) -> NodeColor {
        if !self.initial_root_visited {
            self.initial_root_visited = true;
            NodeColor::Red
        } else if is_output {
            NodeColor::LightBlue
        } else {
            NodeColor::LightCoral
        }
    }
}

/// Iterative depth-first traversal over parent links, starting at `root`.
///
/// Entry names deduplicate through a visited set; parent references that do
/// not resolve are skipped. Returns `None` when the root itself does not
/// resolve.
pub fn dfs(
    resolver: &dyn EntryResolver,
    root: &str,
    label: &str,
    is_output: bool,
    session: &mut RenderSession,
) -> Option<ClusterGraph> {
    let root_entry = match resolver.byname(root) {
        Some(entry) => entry,
        None => {
            error!("Cannot resolve entry '{}'", root);
            return None;
        }
    };

    let mut graph = ClusterGraph {
        label: label.to_string(),
        ..Default::default()
    };
    let mut visited: HashSet<String> = HashSet::new();
    let mut stack: Vec<(Entry, usize)> = vec![(root_entry, 0)];

    while let Some((entry, depth)) = stack.pop() {
        let name = entry.name().to_string();
        if visited.contains(&name) {
            continue;
        }

        let color = session.next_color(is_output);
        graph.nodes.push(RenderedNode {
            name: name.clone(),
            color,
            depth,
        });
        visited.insert(name.clone());

        let parents = match entry.get(PARENT_ENTRIES_KEY) {
            Some(value) => parent_refs(value),
            None => Vec::new(),
        };

        for parent in parents {
            let parent_entry = match parent {
                ParentRef::ByName(parent_name) => match resolver.byname(&parent_name) {
                    Some(entry) => entry,
                    None => {
                        debug!("Skipping unresolvable parent '{}'", parent_name);
                        continue;
                    }
                },
                ParentRef::Inline(parent_name, data) => Entry::inline(parent_name, data),
            };

            graph
                .edges
                .push((parent_entry.name().to_string(), name.clone()));
            stack.push((parent_entry, depth + 1));
        }
    }

    Some(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    /// In-memory resolver for traversal tests
    pub struct MemCatalog {
        entries: HashMap<String, Value>,
    }

    impl MemCatalog {
        pub fn new(entries: &[(&str, Value)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|(name, data)| (name.to_string(), data.clone()))
                    .collect(),
            }
        }
    }

    impl EntryResolver for MemCatalog {
        fn byname(&self, name: &str) -> Option<Entry> {
            let data = self.entries.get(name)?.as_object()?.clone();
            Some(Entry::inline(name.to_string(), data))
        }
    }

    fn diamond_catalog() -> MemCatalog {
        // target -> {left, right} -> base
        MemCatalog::new(&[
            (
                "target",
                json!({"_parent_entries": [["^", "byname", "left"], ["^", "byname", "right"]]}),
            ),
            ("left", json!({"_parent_entries": ["base"]})),
            ("right", json!({"_parent_entries": ["base"]})),
            ("base", json!({})),
        ])
    }

    #[test]
    fn test_dfs_visits_each_name_once() {
        let catalog = diamond_catalog();
        let mut session = RenderSession::new();

        let graph = dfs(&catalog, "target", "cluster", false, &mut session).unwrap();

        let mut names: Vec<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["base", "left", "right", "target"]);
    }

    #[test]
    fn test_dfs_first_node_is_red() {
        let catalog = diamond_catalog();
        let mut session = RenderSession::new();

        let graph = dfs(&catalog, "target", "cluster", false, &mut session).unwrap();

        let red: Vec<&RenderedNode> = graph
            .nodes
            .iter()
            .filter(|n| n.color == NodeColor::Red)
            .collect();
        assert_eq!(red.len(), 1);
        assert_eq!(red[0].name, "target");
        assert!(graph
            .nodes
            .iter()
            .filter(|n| n.name != "target")
            .all(|n| n.color == NodeColor::LightCoral));
    }

    #[test]
    fn test_first_node_red_in_output_cluster_too() {
        let catalog = diamond_catalog();
        let mut session = RenderSession::new();

        // When the output cluster happens to be traversed first, it still
        // owns the red node.
        let graph = dfs(&catalog, "left", "cluster", true, &mut session).unwrap();
        assert_eq!(graph.nodes[0].color, NodeColor::Red);

        let second = dfs(&catalog, "right", "cluster", true, &mut session).unwrap();
        assert!(second.nodes.iter().all(|n| n.color == NodeColor::LightBlue));
    }

    #[test]
    fn test_red_does_not_leak_across_sessions() {
        let catalog = diamond_catalog();

        let mut first = RenderSession::new();
        let _ = dfs(&catalog, "target", "cluster", false, &mut first);

        let mut second = RenderSession::new();
        let graph = dfs(&catalog, "target", "cluster", false, &mut second).unwrap();
        assert_eq!(graph.nodes[0].color, NodeColor::Red);
    }

    #[test]
    fn test_dfs_edges_run_parent_to_child() {
        let catalog = diamond_catalog();
        let mut session = RenderSession::new();

        let graph = dfs(&catalog, "target", "cluster", false, &mut session).unwrap();
        assert!(graph
            .edges
            .contains(&("left".to_string(), "target".to_string())));
        assert!(graph
            .edges
            .contains(&("base".to_string(), "left".to_string())));
    }

    #[test]
    fn test_dfs_skips_unresolvable_parent() {
        let catalog = MemCatalog::new(&[(
            "target",
            json!({"_parent_entries": ["ghost", ["^", "byname", "real"]]}),
        ), ("real", json!({}))]);
        let mut session = RenderSession::new();

        let graph = dfs(&catalog, "target", "cluster", false, &mut session).unwrap();

        assert_eq!(graph.nodes.len(), 2);
        assert!(graph.nodes.iter().all(|n| n.name != "ghost"));
        assert!(!graph
            .edges
            .iter()
            .any(|(parent, _)| parent == "ghost"));
    }

    #[test]
    fn test_dfs_unresolvable_root() {
        let catalog = MemCatalog::new(&[]);
        let mut session = RenderSession::new();
        assert!(dfs(&catalog, "missing", "cluster", false, &mut session).is_none());
    }

    #[test]
    fn test_dfs_inline_parent() {
        let catalog = MemCatalog::new(&[(
            "target",
            json!({"_parent_entries": [{"name": "embedded", "tags": []}]}),
        )]);
        let mut session = RenderSession::new();

        let graph = dfs(&catalog, "target", "cluster", false, &mut session).unwrap();
        assert!(graph.nodes.iter().any(|n| n.name == "embedded"));
    }
}
