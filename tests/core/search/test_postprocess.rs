// Threshold, grouping and merging applied to real search output

use crate::common::{CountingEmbedder, DocTree, TestEnv};
use docvec::core::search::{apply_threshold, group_by_file, merge_adjacent};

fn built_journal() -> (DocTree, TestEnv) {
    let tree = DocTree::long_document(40);
    let env = TestEnv::new().with_index("journal", tree.path());
    env.update("journal", &CountingEmbedder::new(256));
    (tree, env)
}

#[test]
fn test_threshold_on_search_results() {
    let (_tree, env) = built_journal();
    let response = env.search("birds river", &[], 20);
    let cutoff = response.results[response.results.len() / 2].score;

    let kept = apply_threshold(response.results.clone(), cutoff);

    assert!(!kept.is_empty());
    assert!(kept.len() <= response.results.len());
    assert!(kept.iter().all(|h| h.score >= cutoff));
}

#[test]
fn test_group_by_file_single_document() {
    let (_tree, env) = built_journal();
    let response = env.search("birds river", &[], 10);
    let total = response.results.len();

    let groups = group_by_file(response.results);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].hits.len(), total);
}

#[test]
fn test_merge_overlapping_chunks() {
    let (_tree, env) = built_journal();
    let response = env.search("birds river weather", &[], 20);
    let best = response.results[0].score;

    // Overlapping chunks share lines, so a zero gap already merges them
    let merged = merge_adjacent(response.results.clone(), 0, 20);

    assert!(merged.len() < response.results.len());
    assert_eq!(merged[0].score, best);
    for pair in merged.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    // Merged ranges no longer touch within the same file
    let mut ranges: Vec<(usize, usize)> = merged.iter().map(|h| (h.line_start, h.line_end)).collect();
    ranges.sort();
    for pair in ranges.windows(2) {
        assert!(pair[1].0 > pair[0].1);
    }
}
