use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, SentenceId};

const MIN_GRAM: usize = 3;
const MAX_GRAM: usize = 5;
const SHORT_WORD: usize = 2;

/// Pruning structure consulted before fuzzy matching.
///
/// Implementations only ever see normalized text. `probe` is specific to the
/// structure; `lookup` layers the shared retry rule on top of it. An empty
/// `lookup` result tells the engine to scan the whole corpus.
pub trait CandidateIndex: Send + Sync {
    /// Tag stored alongside cached snapshots so one index kind is never
    /// restored as another.
    const KIND: &'static str;

    fn index_sentence(&mut self, id: SentenceId, normalized: &str);

    fn probe(&self, word: &str) -> BTreeSet<SentenceId>;

    fn clear(&mut self);

    fn key_count(&self) -> usize;

    /// Every id the index refers to.
    fn referenced_ids(&self) -> Box<dyn Iterator<Item = SentenceId> + '_>;

    /// Build settings that change which keys get produced. Snapshots record
    /// this so an index built one way is never restored for another.
    fn settings(&self) -> String {
        String::new()
    }

    fn lookup(&self, first_word: &str) -> BTreeSet<SentenceId> {
        let found = self.probe(first_word);
        if !found.is_empty() {
            return found;
        }
        if first_word.chars().count() < MIN_GRAM {
            return found;
        }
        let cut = first_word
            .char_indices()
            .nth(MIN_GRAM)
            .map_or(first_word.len(), |(i, _)| i);
        self.probe(&first_word[..cut])
    }

    fn is_consistent_with(&self, corpus: &Corpus) -> bool {
        self.referenced_ids().all(|id| corpus.contains(id))
    }
}

/// Which words of a sentence contribute keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyScope {
    #[default]
    FirstWord,
    AllWords,
}

/// Maps every 3-, 4- and 5-character substring of a word (or a whole
/// 2-character word) to the sentences that contain it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramIndex {
    scope: KeyScope,
    keys: HashMap<String, Vec<SentenceId>>,
}

impl NgramIndex {
    pub fn new(scope: KeyScope) -> Self {
        NgramIndex {
            scope,
            keys: HashMap::new(),
        }
    }

    pub fn scope(&self) -> KeyScope {
        self.scope
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    fn register(&mut self, key: &str, id: SentenceId) {
        let ids = self.keys.entry(key.to_string()).or_default();
        // Ids arrive in ascending order, so repeats from one sentence are adjacent.
        if ids.last() != Some(&id) {
            ids.push(id);
        }
    }

    fn index_word(&mut self, id: SentenceId, word: &str) {
        let bounds = char_bounds(word);
        let len = bounds.len() - 1;
        if len == SHORT_WORD {
            self.register(word, id);
            return;
        }
        for gram in MIN_GRAM..=MAX_GRAM.min(len) {
            for start in 0..=len - gram {
                self.register(&word[bounds[start]..bounds[start + gram]], id);
            }
        }
    }

    fn get(&self, key: &str) -> impl Iterator<Item = SentenceId> + '_ {
        self.keys.get(key).into_iter().flatten().copied()
    }
}

impl CandidateIndex for NgramIndex {
    const KIND: &'static str = "ngram";

    fn index_sentence(&mut self, id: SentenceId, normalized: &str) {
        let mut words = normalized.split(' ').filter(|w| !w.is_empty());
        match self.scope {
            KeyScope::FirstWord => {
                if let Some(word) = words.next() {
                    self.index_word(id, word);
                }
            }
            KeyScope::AllWords => {
                for word in words {
                    self.index_word(id, word);
                }
            }
        }
    }

    /// Anchored at the start of `word`: probes its 3-, 4- and 5-character
    /// prefixes, or the whole word when it has exactly 2 characters. A
    /// 1-character word probes nothing.
    fn probe(&self, word: &str) -> BTreeSet<SentenceId> {
        let bounds = char_bounds(word);
        let len = bounds.len() - 1;
        if len == SHORT_WORD {
            return self.get(word).collect();
        }
        (MIN_GRAM..=MAX_GRAM.min(len))
            .flat_map(|gram| self.get(&word[..bounds[gram]]))
            .collect()
    }

    fn clear(&mut self) {
        self.keys.clear();
    }

    fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn referenced_ids(&self) -> Box<dyn Iterator<Item = SentenceId> + '_> {
        Box::new(self.keys.values().flatten().copied())
    }

    fn settings(&self) -> String {
        match self.scope {
            KeyScope::FirstWord => "scope=first-word".to_string(),
            KeyScope::AllWords => "scope=all-words".to_string(),
        }
    }
}

/// Byte offsets of every char boundary in `word`, including the end.
fn char_bounds(word: &str) -> Vec<usize> {
    word.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(word.len()))
        .collect()
}
