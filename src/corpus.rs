use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::normalize::normalize;

/// Position of a sentence in the corpus. Stable for the life of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentenceId(usize);

impl SentenceId {
    pub fn new(index: usize) -> Self {
        SentenceId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SentenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    pub id: SentenceId,
    pub original_text: String,
    pub normalized_text: String,
    pub source: String,
    /// 1-based line number within `source`.
    pub line_offset: usize,
}

/// Append-only store of every ingested sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    records: Vec<SentenceRecord>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, original_text: &str, source: &str, line_offset: usize) -> SentenceId {
        let id = SentenceId(self.records.len());
        self.records.push(SentenceRecord {
            id,
            original_text: original_text.to_string(),
            normalized_text: normalize(original_text),
            source: source.to_string(),
            line_offset,
        });
        id
    }

    pub fn get(&self, id: SentenceId) -> Result<&SentenceRecord> {
        self.records.get(id.0).ok_or(Error::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SentenceRecord> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = SentenceId> + use<> {
        (0..self.records.len()).map(SentenceId)
    }

    pub fn contains(&self, id: SentenceId) -> bool {
        id.0 < self.records.len()
    }

    /// True when every record's id matches its position, which is what a
    /// freshly built corpus always satisfies. Used to vet restored snapshots.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.records
            .iter()
            .enumerate()
            .all(|(i, record)| record.id.0 == i)
    }
}
