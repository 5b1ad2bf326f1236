//! End-to-end dependency-graph rendering against a directory catalog.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use imagenet_bench::graph::{draw, DirCatalog};
use imagenet_bench::Error;

fn write_entry(root: &Path, name: &str, data: &Value) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("data_axs.json"), data.to_string()).unwrap();
}

/// A catalog mimicking a classifier workflow: the target depends on an
/// environment and a dataset, and its output entry has its own ancestry.
fn seed_catalog(root: &Path) {
    write_entry(
        root,
        "image_classifier",
        &json!({
            "_parent_entries": [["^", "byname", "python_env"], ["^", "byname", "dataset"]],
            "output_entry": {"_parent_entries": [["^", "byname", "collector"]]}
        }),
    );
    write_entry(root, "python_env", &json!({"_parent_entries": ["shell"]}));
    write_entry(root, "dataset", &json!({}));
    write_entry(root, "shell", &json!({}));
    write_entry(
        root,
        "collector",
        &json!({"_parent_entries": [["^", "byname", "shell"]]}),
    );
}

#[test]
fn draw_writes_dot_and_svg() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_root = dir.path().join("catalog");
    let dest = dir.path().join("render");
    seed_catalog(&catalog_root);

    let catalog = DirCatalog::new(&catalog_root);
    let outcome = draw(&catalog, "image_classifier", &dest).unwrap();

    assert_eq!(outcome.dot_path, dest.join("image"));
    assert_eq!(outcome.svg_path, dest.join("image.svg"));
    assert!(outcome.dot_path.exists());
    assert!(outcome.svg_path.exists());

    let dot = fs::read_to_string(&outcome.dot_path).unwrap();
    assert!(dot.contains("Entry and Its Parent(s)"));
    assert!(dot.contains("Parent(s) of the Output Entry"));
    assert!(dot.contains("graph [dpi=400]"));
    assert!(dot.contains("style=dotted"));

    // The target is the first node visited, and the only red one.
    assert!(dot.contains("\"image_classifier\" [color=red style=filled]"));
    assert_eq!(dot.matches("color=red").count(), 1);

    // Target ancestry is light-coral, output ancestry light-blue.
    assert!(dot.contains("\"python_env\" [color=lightcoral style=filled]"));
    assert!(dot.contains("\"collector\" [color=lightblue style=filled]"));

    // Output node and its links.
    assert!(dot.contains("\"output\" [color=blue style=filled]"));
    assert!(dot.contains("\"image_classifier\" -> \"output\""));
    assert!(dot.contains("\"collector\" -> \"output\""));

    // Parent -> child edges inside the target cluster.
    assert!(dot.contains("\"python_env\" -> \"image_classifier\""));
    assert!(dot.contains("\"shell\" -> \"python_env\""));

    let svg = fs::read_to_string(&outcome.svg_path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Entry and Its Parent(s)"));
    assert!(svg.contains("image_classifier"));
}

#[test]
fn draw_red_node_does_not_leak_between_invocations() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_root = dir.path().join("catalog");
    seed_catalog(&catalog_root);
    let catalog = DirCatalog::new(&catalog_root);

    for dest in ["first", "second"] {
        let outcome = draw(&catalog, "image_classifier", &dir.path().join(dest)).unwrap();
        let dot = fs::read_to_string(&outcome.dot_path).unwrap();
        assert_eq!(dot.matches("color=red").count(), 1);
    }
}

#[test]
fn draw_unknown_target_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_root = dir.path().join("catalog");
    let dest = dir.path().join("render");
    seed_catalog(&catalog_root);

    let catalog = DirCatalog::new(&catalog_root);
    let result = draw(&catalog, "no_such_entry", &dest);

    assert!(matches!(result, Err(Error::EntryNotFound(_))));
    assert!(!dest.join("image").exists());
    assert!(!dest.join("image.svg").exists());
}

#[test]
fn draw_skips_unresolvable_parents() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_root = dir.path().join("catalog");
    let dest = dir.path().join("render");

    write_entry(
        &catalog_root,
        "lonely",
        &json!({"_parent_entries": [["^", "byname", "ghost"], ["^", "byname", "real"]]}),
    );
    write_entry(&catalog_root, "real", &json!({}));

    let catalog = DirCatalog::new(&catalog_root);
    let outcome = draw(&catalog, "lonely", &dest).unwrap();

    let dot = fs::read_to_string(&outcome.dot_path).unwrap();
    assert!(!dot.contains("ghost"));
    assert!(dot.contains("\"real\" -> \"lonely\""));
}

#[test]
fn draw_tags_only_entry_gets_output_node_without_second_cluster() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_root = dir.path().join("catalog");
    let dest = dir.path().join("render");

    write_entry(&catalog_root, "tagged", &json!({"tags": ["script_output"]}));

    let catalog = DirCatalog::new(&catalog_root);
    let outcome = draw(&catalog, "tagged", &dest).unwrap();

    let dot = fs::read_to_string(&outcome.dot_path).unwrap();
    assert!(dot.contains("\"output\" [color=blue style=filled]"));
    assert!(dot.contains("\"tagged\" -> \"output\""));
    assert!(!dot.contains("Parent(s) of the Output Entry"));
}

#[test]
fn draw_output_entry_parents_path() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_root = dir.path().join("catalog");
    let dest = dir.path().join("render");

    // No nested parent-entries structure: the output_entry_parents list is
    // the fallback resolution path.
    write_entry(
        &catalog_root,
        "producer",
        &json!({"output_entry_parents": [["^", "byname", "out_base"]]}),
    );
    write_entry(&catalog_root, "out_base", &json!({}));

    let catalog = DirCatalog::new(&catalog_root);
    let outcome = draw(&catalog, "producer", &dest).unwrap();

    let dot = fs::read_to_string(&outcome.dot_path).unwrap();
    assert!(dot.contains("Parent(s) of the Output Entry"));
    assert!(dot.contains("\"out_base\" [color=lightblue style=filled]"));
    assert!(dot.contains("\"out_base\" -> \"output\""));
}

#[test]
fn draw_plain_entry_has_no_output_node() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_root = dir.path().join("catalog");
    let dest = dir.path().join("render");

    write_entry(&catalog_root, "plain", &json!({"kind": "tool"}));

    let catalog = DirCatalog::new(&catalog_root);
    let outcome = draw(&catalog, "plain", &dest).unwrap();

    let dot = fs::read_to_string(&outcome.dot_path).unwrap();
    assert!(!dot.contains("\"output\""));
    assert!(dot.contains("\"plain\" [color=red style=filled]"));
}
