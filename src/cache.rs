//! Snapshot persistence for a built [`Autocomplete`].
//!
//! A snapshot file is zstd-compressed JSON:
//!
//! ```text
//! { "format": "sentcomplete-snapshot", "version": 2, "index_kind": "ngram",
//!   "root": "...", "config": "scope=first-word;ext=txt",
//!   "checksum": "<blake3 hex of payload>", "payload": "<engine JSON>" }
//! ```
//!
//! Restores verify the version, the index kind, the checksum and finally that
//! the index only points at sentences that exist. Any failure means the file
//! is discarded and the corpus is re-ingested. A snapshot whose root or config
//! differs from the current run is ignored and overwritten.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::Autocomplete;
use crate::error::{Error, Result};
use crate::index::CandidateIndex;
use crate::ingest::{IngestOptions, read_tree};

/// Bump whenever the serialized shape of the engine changes.
pub const SNAPSHOT_VERSION: u32 = 2;

const SNAPSHOT_FORMAT: &str = "sentcomplete-snapshot";
const ZSTD_LEVEL: i32 = 3;

/// A restored engine together with the root and settings it was built from.
#[derive(Debug)]
pub struct Snapshot<I> {
    pub root: String,
    pub config: String,
    pub engine: Autocomplete<I>,
}

/// Somewhere a built engine can be parked between runs.
pub trait SnapshotStore {
    /// `Ok(None)` means nothing has been stored yet.
    fn load<I>(&self) -> Result<Option<Snapshot<I>>>
    where
        I: CandidateIndex + DeserializeOwned;

    fn save<I>(&self, root: &str, config: &str, engine: &Autocomplete<I>) -> Result<()>
    where
        I: CandidateIndex + Serialize;

    /// Drop whatever is stored. Missing data is not an error.
    fn discard(&self) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    format: String,
    version: u32,
    index_kind: String,
    root: String,
    config: String,
    checksum: String,
    payload: String,
}

#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCache { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(&self, compressed: &[u8]) -> Result<Envelope> {
        let json = zstd::decode_all(compressed)
            .map_err(|e| Error::CorruptSnapshot(format!("decompression failed: {}", e)))?;
        let envelope: Envelope = serde_json::from_slice(&json)
            .map_err(|e| Error::CorruptSnapshot(format!("unreadable envelope: {}", e)))?;
        if envelope.format != SNAPSHOT_FORMAT {
            return Err(Error::CorruptSnapshot(format!(
                "unexpected format tag {:?}",
                envelope.format
            )));
        }
        if envelope.version != SNAPSHOT_VERSION {
            return Err(Error::SnapshotVersion {
                found: envelope.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(envelope)
    }
}

impl SnapshotStore for FileCache {
    fn load<I>(&self) -> Result<Option<Snapshot<I>>>
    where
        I: CandidateIndex + DeserializeOwned,
    {
        let compressed = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No snapshot at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let envelope = self.decode(&compressed)?;
        if envelope.index_kind != I::KIND {
            return Err(Error::CorruptSnapshot(format!(
                "snapshot holds a {} index, expected {}",
                envelope.index_kind,
                I::KIND
            )));
        }
        if blake3::hash(envelope.payload.as_bytes()).to_hex().as_str() != envelope.checksum {
            return Err(Error::CorruptSnapshot("checksum mismatch".to_string()));
        }

        let engine: Autocomplete<I> = serde_json::from_str(&envelope.payload)?;
        let (corpus, index) = engine.into_parts();
        let engine = Autocomplete::from_parts(corpus, index)?;

        info!(
            "Loaded snapshot from {}: {} sentences, {} keys",
            self.path.display(),
            engine.corpus().len(),
            engine.index().key_count()
        );
        Ok(Some(Snapshot {
            root: envelope.root,
            config: envelope.config,
            engine,
        }))
    }

    fn save<I>(&self, root: &str, config: &str, engine: &Autocomplete<I>) -> Result<()>
    where
        I: CandidateIndex + Serialize,
    {
        let payload = serde_json::to_string(engine)?;
        let envelope = Envelope {
            format: SNAPSHOT_FORMAT.to_string(),
            version: SNAPSHOT_VERSION,
            index_kind: I::KIND.to_string(),
            root: root.to_string(),
            config: config.to_string(),
            checksum: blake3::hash(payload.as_bytes()).to_hex().to_string(),
            payload,
        };
        let json = serde_json::to_vec(&envelope)?;
        let compressed =
            zstd::encode_all(json.as_slice(), ZSTD_LEVEL).map_err(|e| Error::io(&self.path, e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        // Write then rename so a crash never leaves a half-written snapshot.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &compressed).map_err(|e| Error::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| Error::io(&self.path, e))?;

        info!("Saved snapshot to {}", self.path.display());
        Ok(())
    }

    fn discard(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }
}

/// Restore an engine for `root` from `store`, or ingest `root` and store the
/// result.
///
/// A snapshot that fails to load is discarded; one recorded for another root,
/// another index setting or another extension filter is ignored. Failing to
/// save a fresh build is logged and otherwise ignored.
pub fn restore_or_build<S, I>(
    store: &S,
    root: &Path,
    options: &IngestOptions,
    index: I,
) -> Result<Autocomplete<I>>
where
    S: SnapshotStore,
    I: CandidateIndex + Serialize + DeserializeOwned,
{
    let root_key = root.display().to_string();
    let config = snapshot_config(&index, options);
    match store.load::<I>() {
        Ok(Some(snapshot)) if snapshot.root == root_key && snapshot.config == config => {
            return Ok(snapshot.engine);
        }
        Ok(Some(snapshot)) if snapshot.root != root_key => info!(
            "Snapshot was built from {}, rebuilding for {}",
            snapshot.root, root_key
        ),
        Ok(Some(snapshot)) => info!(
            "Snapshot was built with [{}], rebuilding with [{}]",
            snapshot.config, config
        ),
        Ok(None) => {}
        Err(e) => {
            warn!("Could not load snapshot: {}. Rebuilding from scratch.", e);
            if let Err(e) = store.discard() {
                warn!("Could not discard snapshot: {}", e);
            }
        }
    }

    let engine = Autocomplete::build(read_tree(root, options)?, index);
    if let Err(e) = store.save(&root_key, &config, &engine) {
        warn!("Could not save snapshot: {}", e);
    }
    Ok(engine)
}

/// Everything besides the root that decides what a fresh build contains.
fn snapshot_config<I: CandidateIndex>(index: &I, options: &IngestOptions) -> String {
    format!("{};{}", index.settings(), options.fingerprint())
}
