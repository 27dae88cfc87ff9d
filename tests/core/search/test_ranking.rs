// Ranking, line mapping and degraded indexes

use crate::common::{CountingEmbedder, DocTree, TestEnv};
use docvec::core::storage::store::EMBEDDINGS_FILE;
use docvec::DocvecError;
use std::fs;

fn built_notes() -> (DocTree, TestEnv) {
    let tree = DocTree::notes();
    let env = TestEnv::new().with_index("notes", tree.path());
    env.update("notes", &CountingEmbedder::new(256));
    (tree, env)
}

#[test]
fn test_most_similar_document_ranks_first() {
    let (_tree, env) = built_notes();

    let response = env.search("sourdough starter flour", &["notes"], 3);

    assert_eq!(response.results.len(), 3);
    assert!(response.results[0].path.ends_with("bread.md"));
    assert_eq!(response.results[0].index, "notes");
}

#[test]
fn test_scores_are_non_increasing() {
    let tree = DocTree::long_document(40);
    let env = TestEnv::new().with_index("journal", tree.path());
    env.update("journal", &CountingEmbedder::new(256));

    let response = env.search("rainy weather birds", &[], 10);

    assert!(!response.results.is_empty());
    for pair in response.results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_results_capped_at_top_k() {
    let tree = DocTree::long_document(40);
    let env = TestEnv::new().with_index("journal", tree.path());
    env.update("journal", &CountingEmbedder::new(256));

    let response = env.search("birds", &["journal"], 2);
    assert_eq!(response.results.len(), 2);
}

#[test]
fn test_line_numbers_point_into_file() {
    let (tree, env) = built_notes();

    let response = env.search("night trains vienna", &["notes"], 1);
    let hit = &response.results[0];
    assert!(hit.path.ends_with("trains.txt"));

    let line_count = fs::read_to_string(tree.path().join("travel/trains.txt"))
        .unwrap()
        .lines()
        .count();
    assert_eq!(hit.line_start, 1);
    assert_eq!(hit.line_end, line_count);
    assert!(hit.preview.iter().any(|l| l.contains("Night trains")));
}

#[test]
fn test_zero_preview_lines_gives_empty_preview() {
    let (_tree, mut env) = built_notes();
    env.config.search.preview_lines = 0;

    let response = env.search("tomatoes", &["notes"], 3);
    assert!(response.results.iter().all(|h| h.preview.is_empty()));
}

#[test]
fn test_per_index_cap_limits_each_index() {
    let long = DocTree::long_document(40);
    let notes = DocTree::notes();
    let mut env = TestEnv::new()
        .with_index("journal", long.path())
        .with_index("notes", notes.path());
    env.update("journal", &CountingEmbedder::new(256));
    env.update("notes", &CountingEmbedder::new(256));
    env.config.search.per_index_cap = Some(2);

    let response = env.search("birds river weather water", &[], 10);

    let from_journal = response.results.iter().filter(|h| h.index == "journal").count();
    let from_notes = response.results.iter().filter(|h| h.index == "notes").count();
    assert_eq!(from_journal, 2);
    assert_eq!(from_notes, 2);
}

#[test]
fn test_unbuilt_index_is_reported_not_fatal() {
    let notes = DocTree::notes();
    let other = DocTree::notes();
    let env = TestEnv::new()
        .with_index("notes", notes.path())
        .with_index("other", other.path());
    env.update("notes", &CountingEmbedder::new(256));

    let response = env.search("tomatoes", &[], 5);

    assert!(!response.results.is_empty());
    assert!(response.results.iter().all(|h| h.index == "notes"));
    let other_status = response.stats.iter().find(|s| s.name == "other").unwrap();
    assert!(!other_status.loaded);
    assert!(other_status.error.is_some());
}

#[test]
fn test_misaligned_index_is_degraded() {
    let (_tree, env) = built_notes();
    fs::write(env.index_dir().join("notes").join(EMBEDDINGS_FILE), "[]").unwrap();

    let response = env.search("tomatoes", &["notes"], 5);

    assert!(response.results.is_empty());
    assert!(!response.stats[0].loaded);
}

#[test]
fn test_dimension_mismatch_is_degraded() {
    let (_tree, mut env) = built_notes();
    env.config.embedding.dimension = 64;

    let response = env.search("tomatoes", &["notes"], 5);

    assert!(response.results.is_empty());
    let status = &response.stats[0];
    assert!(!status.loaded);
    assert!(status.error.as_deref().unwrap().contains("dimension"));
}

#[test]
fn test_invalid_requests_are_rejected() {
    let (_tree, env) = built_notes();
    let services = env.services();

    let request = services.search_request("   ", vec![], 5);
    assert!(matches!(
        services.search.search(&request, services.embedder.as_ref()),
        Err(DocvecError::InvalidQuery(_))
    ));

    let request = services.search_request("tomatoes", vec![], 0);
    assert!(matches!(
        services.search.search(&request, services.embedder.as_ref()),
        Err(DocvecError::InvalidQuery(_))
    ));

    let request = services.search_request("tomatoes", vec!["missing".to_string()], 5);
    assert!(matches!(
        services.search.search(&request, services.embedder.as_ref()),
        Err(DocvecError::IndexNotFound(_))
    ));
}

#[test]
fn test_missing_base_dir_is_invalid_path() {
    let notes = DocTree::notes();
    let env = TestEnv::new().with_index("notes", notes.path());
    let services = env.services();

    let request = services.search_request("tomatoes", vec![], 5);
    assert!(matches!(
        services.search.search(&request, services.embedder.as_ref()),
        Err(DocvecError::InvalidPath(_))
    ));
}
