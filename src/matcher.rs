#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Substitution,
    Insertion,
    Deletion,
}

/// A single edit and its 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edit {
    pub kind: EditKind,
    pub position: usize,
}

/// Outcome of comparing a reference string to a candidate of similar length.
///
/// Positions are 1-based and count characters. For `Insertion` the position
/// indexes the extra character in the candidate; for `Deletion` it indexes the
/// character of the reference that the candidate lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Exact,
    Substitution(usize),
    Insertion(usize),
    Deletion(usize),
    NoMatch,
}

impl MatchResult {
    pub fn edit(self) -> Option<Edit> {
        let (kind, position) = match self {
            MatchResult::Substitution(p) => (EditKind::Substitution, p),
            MatchResult::Insertion(p) => (EditKind::Insertion, p),
            MatchResult::Deletion(p) => (EditKind::Deletion, p),
            MatchResult::Exact | MatchResult::NoMatch => return None,
        };
        Some(Edit { kind, position })
    }
}

/// How a sentence satisfied a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceMatch {
    /// The prefix occurs verbatim somewhere in the sentence.
    Contains,
    /// Some window of the sentence is one edit away from the prefix.
    Edited(Edit),
}

pub fn single_edit_match(reference: &str, candidate: &str) -> MatchResult {
    let reference: Vec<char> = reference.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();
    match_chars(&reference, &candidate)
}

/// Single linear pass; never builds an edit-distance table since only
/// distance one matters.
pub(crate) fn match_chars(reference: &[char], candidate: &[char]) -> MatchResult {
    if reference == candidate {
        return MatchResult::Exact;
    }

    let (lr, lc) = (reference.len(), candidate.len());
    if lr == lc {
        let mut diffs = reference
            .iter()
            .zip(candidate)
            .enumerate()
            .filter(|(_, (r, c))| r != c)
            .map(|(i, _)| i);
        return match (diffs.next(), diffs.next()) {
            (Some(i), None) => MatchResult::Substitution(i + 1),
            _ => MatchResult::NoMatch,
        };
    }

    if lr + 1 == lc {
        let i = common_prefix_len(reference, candidate);
        if reference[i..] == candidate[i + 1..] {
            return MatchResult::Insertion(i + 1);
        }
        return MatchResult::NoMatch;
    }

    if lc + 1 == lr {
        let i = common_prefix_len(reference, candidate);
        if reference[i + 1..] == candidate[i..] {
            return MatchResult::Deletion(i + 1);
        }
        return MatchResult::NoMatch;
    }

    MatchResult::NoMatch
}

fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Decide whether `sentence` completes `prefix`, both already normalized.
///
/// Containment wins outright. Otherwise windows are scanned by start position
/// left to right and, at each start, by length `lp - 1`, `lp`, `lp + 1`; the
/// first window one edit away is taken. This is not a search for the cheapest
/// window in the sentence.
pub fn match_sentence(prefix: &str, sentence: &str) -> Option<SentenceMatch> {
    if sentence.contains(prefix) {
        return Some(SentenceMatch::Contains);
    }

    let prefix: Vec<char> = prefix.chars().collect();
    let sentence: Vec<char> = sentence.chars().collect();
    let lp = prefix.len();
    if lp == 0 {
        return None;
    }

    for start in 0..sentence.len() {
        let remaining = sentence.len() - start;
        for len in [lp - 1, lp, lp + 1] {
            if len == 0 || len > remaining {
                continue;
            }
            let window = &sentence[start..start + len];
            if let Some(edit) = match_chars(&prefix, window).edit() {
                return Some(SentenceMatch::Edited(edit));
            }
        }
    }
    None
}
