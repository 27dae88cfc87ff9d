//! Threshold, grouping and merging over ranked hits.

use crate::core::search::engine::sort_by_score;
use crate::core::types::SearchHit;

/// Hits from one file of one index
#[derive(Debug, Clone, PartialEq)]
pub struct FileGroup {
    pub index: String,
    pub path: String,
    pub hits: Vec<SearchHit>,
}

/// Drop hits scoring below `min_score`
pub fn apply_threshold(hits: Vec<SearchHit>, min_score: f32) -> Vec<SearchHit> {
    hits.into_iter().filter(|h| h.score >= min_score).collect()
}

/// Group hits by `(index, path)`, in the order each file first appears
pub fn group_by_file(hits: Vec<SearchHit>) -> Vec<FileGroup> {
    let mut groups: Vec<FileGroup> = Vec::new();

    for hit in hits {
        match groups
            .iter_mut()
            .find(|g| g.index == hit.index && g.path == hit.path)
        {
            Some(group) => group.hits.push(hit),
            None => groups.push(FileGroup {
                index: hit.index.clone(),
                path: hit.path.clone(),
                hits: vec![hit],
            }),
        }
    }

    groups
}

/// Merge same-file hits separated by at most `gap` lines
///
/// A merged hit spans both line ranges, keeps the higher score and
/// the union of both previews without duplicates. The result is
/// re-ranked and cut to `top_k`.
pub fn merge_adjacent(hits: Vec<SearchHit>, gap: usize, top_k: usize) -> Vec<SearchHit> {
    let mut merged = Vec::with_capacity(hits.len());

    for group in group_by_file(hits) {
        let mut file_hits = group.hits;
        file_hits.sort_by_key(|h| (h.line_start, h.line_end));

        let mut iter = file_hits.into_iter();
        let Some(mut current) = iter.next() else {
            continue;
        };

        for next in iter {
            if next.line_start <= current.line_end.saturating_add(gap) {
                absorb(&mut current, next);
            } else {
                merged.push(std::mem::replace(&mut current, next));
            }
        }
        merged.push(current);
    }

    sort_by_score(&mut merged);
    merged.truncate(top_k);
    merged
}

fn absorb(into: &mut SearchHit, other: SearchHit) {
    into.line_start = into.line_start.min(other.line_start);
    into.line_end = into.line_end.max(other.line_end);
    into.score = into.score.max(other.score);
    for line in other.preview {
        if !into.preview.contains(&line) {
            into.preview.push(line);
        }
    }
}
