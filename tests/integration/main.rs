//! Integration tests for vaultgraph
//!
//! These drive the compiled binary against temporary vaults.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn vaultgraph(vault: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vaultgraph"))
        .arg("--vault")
        .arg(vault)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("KB_VAULT_PATH")
        .output()
        .expect("Failed to execute vaultgraph")
}

fn sample_vault() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("folder")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join("a.md"), "see [[b]] and [[folder/]]").unwrap();
    fs::write(root.join("folder/c.md"), "[[a|Home]]").unwrap();
    fs::write(root.join(".git/ignored.md"), "[[a]]").unwrap();
    temp_dir
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_vaultgraph"))
        .arg("--help")
        .output()
        .expect("Failed to execute vaultgraph");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Wikilink graph and backlinks"));
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("backlinks"));
}

#[test]
fn test_index_json_prints_graph() {
    let vault = sample_vault();
    let output = vaultgraph(vault.path(), &["index", "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<_> = graph["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a.md", "folder/", "folder/c.md"]);

    let edges: Vec<_> = graph["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["source"].as_str().unwrap(), e["target"].as_str().unwrap()))
        .collect();
    assert_eq!(
        edges,
        vec![("a.md", "b.md"), ("a.md", "folder/"), ("folder/c.md", "a.md")]
    );
}

#[test]
fn test_index_summary() {
    let vault = sample_vault();
    let output = vaultgraph(vault.path(), &["index"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("documents:   2"));
    assert!(stdout.contains("directories: 1"));
    assert!(stdout.contains("links:       3"));
    assert!(stdout.contains("dangling:    1"));
}

#[test]
fn test_backlinks_command() {
    let vault = sample_vault();

    let output = vaultgraph(vault.path(), &["backlinks", "a.md"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "folder/c.md\n");

    let output = vaultgraph(vault.path(), &["backlinks", "nothing.md"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_vault_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = vaultgraph(&temp_dir.path().join("missing"), &["index"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to index vault"));
}

#[test]
fn test_library_pipeline_matches_binary() {
    use vaultgraph_indexer::{FsStore, GraphIndex};

    let vault = sample_vault();
    let index = GraphIndex::new(FsStore::new(vault.path()));
    let graph = index.build().unwrap();

    let output = vaultgraph(vault.path(), &["index", "--json"]);
    let from_binary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(serde_json::to_value(graph.as_ref()).unwrap(), from_binary);
}
