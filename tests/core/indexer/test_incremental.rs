// Incremental update behavior: reuse, skipping and re-embedding

use crate::common::{assert_valid_stats, CountingEmbedder, DocTree, TestEnv};

#[test]
fn test_first_build_embeds_every_chunk() {
    let tree = DocTree::notes();
    let env = TestEnv::new().with_index("notes", tree.path());
    let embedder = CountingEmbedder::new(256);

    let stats = env.update("notes", &embedder);

    assert_valid_stats(&stats);
    assert_eq!(stats.files, 3);
    assert!(!stats.skipped);
    assert_eq!(stats.reused, 0);
    assert_eq!(stats.embedded, stats.chunks);
    assert_eq!(embedder.texts(), stats.chunks);
}

#[test]
fn test_unchanged_tree_is_skipped() {
    let tree = DocTree::notes();
    let env = TestEnv::new().with_index("notes", tree.path());
    let first = CountingEmbedder::new(256);
    env.update("notes", &first);

    let store = env.services().storage.store("notes");
    let before = store.manifest().unwrap();

    let second = CountingEmbedder::new(256);
    let stats = env.update("notes", &second);

    assert!(stats.skipped);
    assert_eq!(stats.embedded, 0);
    assert_eq!(stats.reused, stats.chunks);
    assert_eq!(second.calls(), 0);

    // Nothing was rewritten
    let after = store.manifest().unwrap();
    assert_eq!(before.updated, after.updated);
}

#[test]
fn test_edit_re_embeds_only_changed_chunks() {
    let tree = DocTree::notes();
    let env = TestEnv::new().with_index("notes", tree.path());
    env.update("notes", &CountingEmbedder::new(256));

    tree.write(
        "kitchen/bread.md",
        "# Rye bread\n\nRye needs a longer proof than wheat.\n",
    );

    let embedder = CountingEmbedder::new(256);
    let stats = env.update("notes", &embedder);

    assert_valid_stats(&stats);
    assert!(!stats.skipped);
    assert_eq!(stats.embedded, 1);
    assert_eq!(stats.reused, 2);
    assert_eq!(embedder.texts(), 1);
}

#[test]
fn test_removed_file_drops_its_chunks() {
    let tree = DocTree::notes();
    let env = TestEnv::new().with_index("notes", tree.path());
    env.update("notes", &CountingEmbedder::new(256));

    tree.remove("travel/trains.txt");

    let embedder = CountingEmbedder::new(256);
    let stats = env.update("notes", &embedder);

    assert_eq!(stats.files, 2);
    assert_eq!(stats.embedded, 0);
    assert!(!stats.skipped);

    let chunks = env.services().storage.store("notes").chunks();
    assert!(chunks.iter().all(|c| !c.path.ends_with("trains.txt")));
}

#[test]
fn test_signature_change_re_embeds_everything() {
    let tree = DocTree::notes();
    let env = TestEnv::new().with_index("notes", tree.path());
    env.update("notes", &CountingEmbedder::new(256));

    let embedder = CountingEmbedder::new(64);
    let stats = env.update("notes", &embedder);

    assert_eq!(stats.reused, 0);
    assert_eq!(stats.embedded, stats.chunks);

    let manifest = env.services().storage.store("notes").manifest().unwrap();
    assert_eq!(manifest.vector_dim, Some(64));
    assert_eq!(
        manifest.embedding_signature.params.get("dimension").map(String::as_str),
        Some("64")
    );
}

#[test]
fn test_created_survives_updates() {
    let tree = DocTree::notes();
    let env = TestEnv::new().with_index("notes", tree.path());
    env.update("notes", &CountingEmbedder::new(256));
    let store = env.services().storage.store("notes");
    let first = store.manifest().unwrap();

    tree.write("new.md", "a brand new note on kites");
    env.update("notes", &CountingEmbedder::new(256));
    let second = store.manifest().unwrap();

    assert_eq!(first.created, second.created);
    assert!(second.updated >= first.updated);
    assert_eq!(second.counts.files, 4);
}

#[test]
fn test_stored_chunks_and_vectors_stay_aligned() {
    let tree = DocTree::long_document(40);
    let env = TestEnv::new().with_index("journal", tree.path());
    env.update("journal", &CountingEmbedder::new(256));

    tree.write("journal.md", "# Field journal\n\nShort now.\n");
    env.update("journal", &CountingEmbedder::new(256));

    let store = env.services().storage.store("journal");
    let manifest = store.manifest().unwrap();
    let chunks = store.chunks();
    let embeddings = store.embeddings();

    assert_eq!(chunks.len(), embeddings.len());
    assert_eq!(manifest.counts.chunks, chunks.len());
    assert!(embeddings.iter().all(|v| v.len() == 256));
}

#[test]
fn test_batches_respect_batch_size() {
    let tree = DocTree::long_document(40);
    let mut env = TestEnv::new().with_index("journal", tree.path());
    env.config.indexing.batch_size = 3;
    let embedder = CountingEmbedder::new(256);

    let stats = env.update("journal", &embedder);

    assert_eq!(embedder.calls(), stats.chunks.div_ceil(3));
}
