use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::corpus::{Corpus, SentenceId};
use crate::error::{Error, Result};
use crate::index::{CandidateIndex, NgramIndex};
use crate::ingest::SourceLine;
use crate::matcher::match_sentence;
use crate::normalize::{first_word, normalize};
use crate::score::{MAX_SUGGESTIONS, Suggestion, rank, score};

/// The corpus and its candidate index, built once and then only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autocomplete<I = NgramIndex> {
    corpus: Corpus,
    index: I,
}

impl<I: CandidateIndex> Autocomplete<I> {
    /// Ingest `lines` in order. Whatever `index` already held is discarded.
    pub fn build<L>(lines: L, mut index: I) -> Self
    where
        L: IntoIterator<Item = SourceLine>,
    {
        let mut corpus = Corpus::new();
        for line in lines {
            corpus.add(&line.text, &line.source, line.line_offset);
        }

        index.clear();
        for record in corpus.iter() {
            index.index_sentence(record.id, &record.normalized_text);
        }

        info!(
            sentences = corpus.len(),
            keys = index.key_count(),
            index = I::KIND,
            "Built autocomplete index"
        );
        Autocomplete { corpus, index }
    }

    /// Reassemble from restored parts, refusing an index that points outside
    /// the corpus.
    pub fn from_parts(corpus: Corpus, index: I) -> Result<Self> {
        if !corpus.is_well_formed() {
            return Err(Error::CorruptSnapshot(
                "sentence ids are out of sequence".to_string(),
            ));
        }
        if !index.is_consistent_with(&corpus) {
            return Err(Error::CorruptSnapshot(
                "index references sentences missing from the corpus".to_string(),
            ));
        }
        Ok(Autocomplete { corpus, index })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub(crate) fn into_parts(self) -> (Corpus, I) {
        (self.corpus, self.index)
    }

    /// Sentences worth matching against `normalized_prefix`, in id order.
    ///
    /// Falls back to the whole corpus when the index yields nothing, which is
    /// what lets unindexed first words (single characters, unseen grams) still
    /// find their matches.
    pub fn candidates(&self, normalized_prefix: &str) -> Vec<SentenceId> {
        let word = first_word(normalized_prefix);
        let found = self.index.lookup(word);
        if found.is_empty() {
            debug!(word, "No indexed candidates, scanning the full corpus");
            return self.corpus.ids().collect();
        }
        debug!(word, candidates = found.len(), "Indexed candidates");
        found.into_iter().collect()
    }

    /// Up to [`MAX_SUGGESTIONS`] completions for `prefix`, best first.
    pub fn query(&self, prefix: &str) -> Vec<Suggestion> {
        let normalized = normalize(prefix);
        if normalized.is_empty() {
            return Vec::new();
        }
        let prefix_len = normalized.chars().count();

        let suggestions: Vec<Suggestion> = self
            .candidates(&normalized)
            .par_iter()
            .filter_map(|&id| {
                let record = self.corpus.get(id).ok()?;
                let matched = match_sentence(&normalized, &record.normalized_text)?;
                Some(Suggestion {
                    completed_sentence: record.original_text.clone(),
                    source: record.source.clone(),
                    line_offset: record.line_offset,
                    score: score(prefix_len, matched),
                })
            })
            .collect();

        rank(suggestions, MAX_SUGGESTIONS)
    }

    pub fn query_batch(&self, prefixes: &[String]) -> Vec<Vec<Suggestion>> {
        prefixes
            .par_iter()
            .map(|prefix| self.query(prefix))
            .collect()
    }
}
