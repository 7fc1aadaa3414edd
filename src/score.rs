use std::cmp::Reverse;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matcher::{Edit, EditKind, SentenceMatch};

pub const MAX_SUGGESTIONS: usize = 5;

const SUBSTITUTION_PENALTIES: [i64; 5] = [5, 4, 3, 2, 1];
const INSERT_DELETE_PENALTIES: [i64; 5] = [10, 8, 6, 4, 2];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub completed_sentence: String,
    pub source: String,
    pub line_offset: usize,
    pub score: i64,
}

/// Penalty for one edit. Positions past the end of the table reuse its last
/// entry.
pub fn penalty(edit: Edit) -> i64 {
    let table = match edit.kind {
        EditKind::Substitution => &SUBSTITUTION_PENALTIES,
        EditKind::Insertion | EditKind::Deletion => &INSERT_DELETE_PENALTIES,
    };
    let idx = edit.position.saturating_sub(1).min(table.len() - 1);
    table[idx]
}

/// `2 * prefix_len`, less the edit penalty if the match needed one.
pub fn score(prefix_len: usize, matched: SentenceMatch) -> i64 {
    let base = 2 * prefix_len as i64;
    match matched {
        SentenceMatch::Contains => base,
        SentenceMatch::Edited(edit) => base - penalty(edit),
    }
}

/// Order by score descending then case-insensitive text, drop repeated
/// sentences, keep the first `limit`.
///
/// The sort is stable, so fully tied entries keep their incoming order.
pub fn rank(mut suggestions: Vec<Suggestion>, limit: usize) -> Vec<Suggestion> {
    suggestions.sort_by_cached_key(|s| (Reverse(s.score), s.completed_sentence.to_lowercase()));

    let mut seen = HashSet::new();
    suggestions
        .into_iter()
        .filter(|s| seen.insert(s.completed_sentence.clone()))
        .take(limit)
        .collect()
}
