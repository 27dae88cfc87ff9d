// On-disk layout, listing, validation and deletion of built indexes

use crate::common::{CountingEmbedder, DocTree, TestEnv};
use docvec::core::storage::store::{CHUNKS_FILE, EMBEDDINGS_FILE, MANIFEST_FILE};
use docvec::core::storage::{IndexValidator, StorageManager};
use docvec::DocvecError;
use std::fs;

#[test]
fn test_index_directory_layout() {
    let tree = DocTree::notes();
    let env = TestEnv::new().with_index("notes", tree.path());
    let stats = env.update("notes", &CountingEmbedder::new(256));

    let dir = env.index_dir().join("notes");
    assert_eq!(stats.index_dir, dir);
    assert!(dir.join(MANIFEST_FILE).is_file());
    assert!(dir.join(CHUNKS_FILE).is_file());
    assert!(dir.join(EMBEDDINGS_FILE).is_file());

    // One JSON record per line
    let lines = fs::read_to_string(dir.join(CHUNKS_FILE)).unwrap();
    assert_eq!(lines.lines().count(), stats.chunks);
    for line in lines.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value.get("hash").is_some());
    }
}

#[test]
fn test_manifest_records_build() {
    let tree = DocTree::notes();
    let env = TestEnv::new().with_index("notes", tree.path());
    env.update("notes", &CountingEmbedder::new(256));

    let manifest = env.services().storage.store("notes").manifest().unwrap();
    assert_eq!(manifest.name, "notes");
    assert_eq!(manifest.root_path, tree.path());
    assert_eq!(manifest.embedding_model, "fnv1a-bow");
    assert_eq!(manifest.backend, docvec::BACKEND);
    assert_eq!(manifest.counts.files, 3);
    assert_eq!(manifest.vector_dim, Some(256));
}

#[test]
fn test_list_indexes_sorted_and_skips_unbuilt() {
    let tree = DocTree::notes();
    let env = TestEnv::new()
        .with_index("zeta", tree.path())
        .with_index("alpha", tree.path());
    env.update("zeta", &CountingEmbedder::new(256));
    env.update("alpha", &CountingEmbedder::new(256));
    fs::create_dir_all(env.index_dir().join("half-built")).unwrap();

    let storage = StorageManager::new(env.index_dir());
    let names: Vec<String> = storage
        .list_indexes()
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();

    assert_eq!(names, vec!["alpha", "zeta"]);
    assert!(!storage.index_exists("half-built"));
}

#[test]
fn test_validator_flags_misaligned_index() {
    let tree = DocTree::notes();
    let env = TestEnv::new().with_index("notes", tree.path());
    env.update("notes", &CountingEmbedder::new(256));

    let storage = StorageManager::new(env.index_dir());
    let validator = IndexValidator::new(&storage);
    assert!(validator.validate_index("notes").unwrap().is_consistent);

    fs::write(env.index_dir().join("notes").join(EMBEDDINGS_FILE), "[]").unwrap();

    let report = validator.validate_index("notes").unwrap();
    assert!(!report.aligned);
    assert!(!report.is_consistent);
    assert_eq!(report.embedding_vectors, 0);
}

#[test]
fn test_misaligned_index_is_rebuilt_from_scratch() {
    let tree = DocTree::notes();
    let env = TestEnv::new().with_index("notes", tree.path());
    env.update("notes", &CountingEmbedder::new(256));
    fs::write(env.index_dir().join("notes").join(EMBEDDINGS_FILE), "[]").unwrap();

    let embedder = CountingEmbedder::new(256);
    let stats = env.update("notes", &embedder);

    assert!(!stats.skipped);
    assert_eq!(stats.embedded, stats.chunks);
    let store = env.services().storage.store("notes");
    assert_eq!(store.chunks().len(), store.embeddings().len());
}

#[test]
fn test_delete_index() {
    let tree = DocTree::notes();
    let env = TestEnv::new().with_index("notes", tree.path());
    env.update("notes", &CountingEmbedder::new(256));

    let storage = StorageManager::new(env.index_dir());
    storage.delete_index("notes").unwrap();

    assert!(!storage.index_exists("notes"));
    assert!(matches!(
        storage.delete_index("notes"),
        Err(DocvecError::IndexNotFound(_))
    ));
    // Documents are untouched
    assert!(tree.files.iter().all(|f| f.exists()));
}
