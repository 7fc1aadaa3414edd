//! Typo-tolerant sentence autocomplete.
//!
//! Lines of text are ingested into a [`Corpus`] and indexed by a
//! [`CandidateIndex`]. A query normalizes the typed prefix, asks the index for
//! candidate sentences, keeps those that contain the prefix verbatim or within
//! one substituted, inserted or deleted character, and returns the best five.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sentcomplete::{Autocomplete, IngestOptions, KeyScope, NgramIndex, read_tree};
//!
//! let lines = read_tree(Path::new("corpus/"), &IngestOptions::default())?;
//! let engine = Autocomplete::build(lines, NgramIndex::new(KeyScope::FirstWord));
//! for s in engine.query("to be or nto") {
//!     println!("{} ({}:{}) {}", s.completed_sentence, s.source, s.line_offset, s.score);
//! }
//! # Ok::<(), sentcomplete::Error>(())
//! ```

pub mod cache;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod index;
pub mod ingest;
pub mod matcher;
pub mod normalize;
pub mod score;
pub mod trie;

pub use cache::{FileCache, Snapshot, SnapshotStore, restore_or_build};
pub use corpus::{Corpus, SentenceId, SentenceRecord};
pub use engine::Autocomplete;
pub use error::{Error, Result};
pub use index::{CandidateIndex, KeyScope, NgramIndex};
pub use ingest::{IngestOptions, SourceLine, read_tree, split_lines};
pub use matcher::{Edit, EditKind, MatchResult, SentenceMatch, match_sentence, single_edit_match};
pub use normalize::normalize;
pub use score::{MAX_SUGGESTIONS, Suggestion, penalty, rank, score};
pub use trie::PrefixTrieIndex;
