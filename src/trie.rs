use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, SentenceId};
use crate::index::CandidateIndex;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Node {
    children: HashMap<char, usize>,
    /// Sentences whose normalized text ends exactly here.
    terminals: Vec<SentenceId>,
}

/// Character trie over whole normalized sentences.
///
/// A probe walks the word from the root and returns every sentence below the
/// node it reaches, so only sentences *starting* with the word are found. Unlike
/// [`NgramIndex`](crate::index::NgramIndex), a 1-character word does select
/// candidates here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixTrieIndex {
    nodes: Vec<Node>,
}

impl Default for PrefixTrieIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrieIndex {
    pub fn new() -> Self {
        PrefixTrieIndex {
            nodes: vec![Node::default()],
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn descend(&self, word: &str) -> Option<usize> {
        word.chars()
            .try_fold(0, |node, c| self.nodes[node].children.get(&c).copied())
    }

    /// Gathers the subtree with an explicit stack; depth is bounded only by
    /// sentence length.
    fn collect_subtree(&self, root: usize) -> BTreeSet<SentenceId> {
        let mut found = BTreeSet::new();
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            let node = &self.nodes[node];
            found.extend(node.terminals.iter().copied());
            pending.extend(node.children.values().copied());
        }
        found
    }
}

impl CandidateIndex for PrefixTrieIndex {
    const KIND: &'static str = "trie";

    fn index_sentence(&mut self, id: SentenceId, normalized: &str) {
        let mut node = 0;
        for c in normalized.chars() {
            node = match self.nodes[node].children.get(&c) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.insert(c, next);
                    next
                }
            };
        }
        self.nodes[node].terminals.push(id);
    }

    fn probe(&self, word: &str) -> BTreeSet<SentenceId> {
        match self.descend(word) {
            Some(node) => self.collect_subtree(node),
            None => BTreeSet::new(),
        }
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    /// Number of distinct sentence prefixes, i.e. nodes below the root.
    fn key_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    fn referenced_ids(&self) -> Box<dyn Iterator<Item = SentenceId> + '_> {
        Box::new(self.nodes.iter().flat_map(|n| n.terminals.iter().copied()))
    }

    /// Besides the ids, the arena must form a tree rooted at node 0: every
    /// edge points at a valid non-root node and each non-root node has exactly
    /// one parent. Anything else could make a subtree walk loop forever.
    fn is_consistent_with(&self, corpus: &Corpus) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let mut parents = vec![0usize; self.nodes.len()];
        for &child in self.nodes.iter().flat_map(|n| n.children.values()) {
            if child == 0 || child >= self.nodes.len() {
                return false;
            }
            parents[child] += 1;
        }
        parents[1..].iter().all(|&count| count == 1)
            && self.referenced_ids().all(|id| corpus.contains(id))
    }
}
