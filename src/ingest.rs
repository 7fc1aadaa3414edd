use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// One non-empty, trimmed line of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    pub text: String,
    pub source: String,
    /// 1-based line number.
    pub line_offset: usize,
}

impl SourceLine {
    pub fn new(text: impl Into<String>, source: impl Into<String>, line_offset: usize) -> Self {
        SourceLine {
            text: text.into(),
            source: source.into(),
            line_offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// File extensions to read, compared case-insensitively. Empty reads every
    /// file.
    pub extensions: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions {
            extensions: vec!["txt".to_string()],
        }
    }
}

impl IngestOptions {
    pub fn all_files() -> Self {
        IngestOptions {
            extensions: Vec::new(),
        }
    }

    /// Canonical form of the accepted extensions: lowercased, without a
    /// leading dot, sorted and deduplicated. `*` stands for every file.
    pub fn fingerprint(&self) -> String {
        if self.extensions.is_empty() {
            return "ext=*".to_string();
        }
        let exts: BTreeSet<String> = self
            .extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        format!("ext={}", exts.into_iter().collect::<Vec<_>>().join(","))
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// Split file content into trimmed, non-empty lines. Blank lines still count
/// toward the offsets of the lines after them.
pub fn split_lines(source: &str, content: &str) -> Vec<SourceLine> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let text = line.trim();
            if text.is_empty() {
                None
            } else {
                Some(SourceLine::new(text, source, i + 1))
            }
        })
        .collect()
}

/// Walk `root` recursively in file-name order and collect the lines of every
/// accepted file.
///
/// Only a missing or unreadable root is an error. Entries that cannot be
/// walked and files that cannot be read as UTF-8 are logged and skipped.
pub fn read_tree(root: &Path, options: &IngestOptions) -> Result<Vec<SourceLine>> {
    fs::metadata(root).map_err(|e| Error::io(root, e))?;

    let mut lines = Vec::new();
    let mut files = 0usize;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !options.accepts(path) {
            continue;
        }

        match fs::read_to_string(path) {
            Ok(content) => {
                let found = split_lines(&path.display().to_string(), &content);
                debug!("Read {} lines from {}", found.len(), path.display());
                lines.extend(found);
                files += 1;
            }
            Err(e) => warn!("Skipped {}: {}", path.display(), e),
        }
    }

    info!(
        "Loaded {} sentences from {} files under {}",
        lines.len(),
        files,
        root.display()
    );
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_skips_blank_and_trims() {
        let lines = split_lines("a.txt", "  first  \n\n\t\nsecond\r\n   \nthird");
        assert_eq!(
            lines,
            vec![
                SourceLine::new("first", "a.txt", 1),
                SourceLine::new("second", "a.txt", 4),
                SourceLine::new("third", "a.txt", 6),
            ]
        );
    }

    #[test]
    fn test_extension_filter() {
        let options = IngestOptions::default();
        assert!(options.accepts(Path::new("notes/a.txt")));
        assert!(options.accepts(Path::new("notes/A.TXT")));
        assert!(!options.accepts(Path::new("notes/data.csv")));
        assert!(!options.accepts(Path::new("notes/README")));

        let options = IngestOptions {
            extensions: vec![".md".to_string(), "txt".to_string()],
        };
        assert!(options.accepts(Path::new("b.md")));

        assert!(IngestOptions::all_files().accepts(Path::new("README")));
    }

    #[test]
    fn test_fingerprint_ignores_order_case_and_dots() {
        let a = IngestOptions {
            extensions: vec!["md".to_string(), ".TXT".to_string(), "txt".to_string()],
        };
        let b = IngestOptions {
            extensions: vec!["txt".to_string(), "md".to_string()],
        };
        assert_eq!(a.fingerprint(), "ext=md,txt");
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(IngestOptions::default().fingerprint(), IngestOptions::all_files().fingerprint());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let err = read_tree(Path::new("/definitely/not/a/real/root"), &IngestOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
