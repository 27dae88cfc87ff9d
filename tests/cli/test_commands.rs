//! Command handler tests through `run()`

use crate::common::{DocTree, TestEnv};
use clap::Parser;
use docvec::cli::{run, Cli, Commands};
use docvec::core::storage::StorageManager;
use std::path::{Path, PathBuf};

/// Write a config file for `env` with its index roots
fn write_config(env: &TestEnv, indexes: &[(&str, &Path)]) -> PathBuf {
    let mut text = format!(
        "[storage]\nindex_dir = '{}'\n\n[indexing]\nchunk_size = 200\noverlap = 20\n\n[indexes]\n",
        env.index_dir().display()
    );
    for (name, root) in indexes {
        text.push_str(&format!("{name} = '{}'\n", root.display()));
    }

    let path = env.data.path().join("config.toml");
    std::fs::write(&path, text).unwrap();
    path
}

fn run_args(config: &Path, args: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = vec!["docvec", "--config", config.to_str().unwrap()];
    argv.extend_from_slice(args);
    run(Cli::try_parse_from(argv).unwrap())
}

#[test]
fn test_parse_search_arguments() {
    let cli = Cli::try_parse_from([
        "docvec", "search", "bread", "-i", "notes", "-i", "wiki", "-k", "3", "--min-score", "0.2",
        "--merge-gap", "1", "--files-only",
    ])
    .unwrap();

    let Commands::Search(args) = cli.command else {
        panic!("expected search command");
    };
    assert_eq!(args.query, "bread");
    assert_eq!(args.indexes, vec!["notes", "wiki"]);
    assert_eq!(args.top_k, Some(3));
    assert_eq!(args.min_score, Some(0.2));
    assert_eq!(args.merge_gap, Some(1));
    assert!(args.files_only);
}

#[test]
fn test_index_all_conflicts_with_names() {
    assert!(Cli::try_parse_from(["docvec", "index", "--all", "notes"]).is_err());
    assert!(Cli::try_parse_from(["docvec", "index", "--all"]).is_ok());
}

#[test]
fn test_index_search_status_delete_flow() {
    let tree = DocTree::notes();
    let env = TestEnv::new();
    let config = write_config(&env, &[("notes", tree.path())]);

    run_args(&config, &["--format", "json", "index", "--all"]).unwrap();
    let storage = StorageManager::new(env.index_dir());
    assert!(storage.index_exists("notes"));

    run_args(&config, &["--format", "json", "search", "tomatoes", "-i", "notes"]).unwrap();
    run_args(&config, &["search", "tomatoes", "--files-only", "--merge-gap", "2"]).unwrap();
    run_args(&config, &["--format", "json", "status"]).unwrap();
    run_args(&config, &["status", "notes"]).unwrap();

    run_args(&config, &["delete", "notes", "--force"]).unwrap();
    assert!(!storage.index_exists("notes"));
}

#[test]
fn test_index_unknown_name_fails() {
    let tree = DocTree::notes();
    let env = TestEnv::new();
    let config = write_config(&env, &[("notes", tree.path())]);

    assert!(run_args(&config, &["index", "missing"]).is_err());
    assert!(!StorageManager::new(env.index_dir()).index_exists("notes"));
}

#[test]
fn test_index_continues_past_failing_root() {
    let tree = DocTree::notes();
    let env = TestEnv::new();
    let gone = env.data.path().join("does-not-exist");
    let config = write_config(&env, &[("broken", gone.as_path()), ("notes", tree.path())]);

    // The run reports failure but still builds the healthy index
    assert!(run_args(&config, &["index", "--all"]).is_err());
    let storage = StorageManager::new(env.index_dir());
    assert!(storage.index_exists("notes"));
    assert!(!storage.index_exists("broken"));
}

#[test]
fn test_delete_unbuilt_index_fails() {
    let tree = DocTree::notes();
    let env = TestEnv::new();
    let config = write_config(&env, &[("notes", tree.path())]);

    assert!(run_args(&config, &["delete", "notes", "--force"]).is_err());
}

#[test]
fn test_show_config_json() {
    let tree = DocTree::notes();
    let env = TestEnv::new();
    let config = write_config(&env, &[("notes", tree.path())]);

    run_args(&config, &["--format", "json", "show-config"]).unwrap();
}

#[test]
fn test_invalid_config_is_rejected() {
    let env = TestEnv::new();
    let path = env.data.path().join("bad.toml");
    std::fs::write(&path, "[indexing]\nchunk_size = 10\noverlap = 10\n").unwrap();

    assert!(run_args(&path, &["status"]).is_err());
}

#[test]
fn test_delete_rejects_names_outside_index_dir() {
    let env = TestEnv::new();
    let config = write_config(&env, &[]);
    let victim = env.data.path().join("victim");
    std::fs::create_dir_all(&victim).unwrap();
    std::fs::write(victim.join("manifest.json"), "{}").unwrap();

    // index_dir is {data}/indexes, so this would name {data}/victim
    assert!(run_args(&config, &["delete", "../victim", "--force"]).is_err());
    assert!(victim.join("manifest.json").exists());
}
