// ==============================================================================
// Library Integration Tests: Ingestion, Queries and Snapshot Restore
// ==============================================================================

mod common;

use std::fs;

use pretty_assertions::assert_eq;
use sentcomplete::{
    Autocomplete, FileCache, IngestOptions, KeyScope, NgramIndex, PrefixTrieIndex, SnapshotStore,
    read_tree, restore_or_build,
};

fn build(dir: &std::path::Path) -> Autocomplete {
    let lines = read_tree(dir, &IngestOptions::default()).expect("ingest corpus");
    Autocomplete::build(lines, NgramIndex::new(KeyScope::FirstWord))
}

#[test]
fn test_subfolders_are_scanned_and_csv_ignored() {
    let dir = common::corpus_dir();
    let lines = read_tree(dir.path(), &IngestOptions::default()).unwrap();

    let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Hello world example",
            "Python programming language",
            "To be or not to be, that is the question",
            "Nested file content",
            "A different test of file paths in a sub dir.",
        ]
    );
    assert!(lines[3].source.ends_with("nested.txt"));
}

#[test]
fn test_line_offsets_are_one_based_and_count_blank_lines() {
    let dir = common::corpus_dir();
    let lines = read_tree(dir.path(), &IngestOptions::default()).unwrap();
    let python = lines
        .iter()
        .find(|l| l.text.starts_with("Python"))
        .unwrap();
    assert_eq!(python.line_offset, 3);
    assert!(python.source.ends_with("programming.txt"));
}

#[test]
fn test_all_files_option_reads_every_extension() {
    let dir = common::corpus_dir();
    let lines = read_tree(dir.path(), &IngestOptions::all_files()).unwrap();
    assert!(lines.iter().any(|l| l.text == "CSV,data,here"));
}

#[test]
fn test_unreadable_file_is_skipped() {
    let dir = common::corpus_dir();
    fs::write(dir.path().join("binary.txt"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
    let lines = read_tree(dir.path(), &IngestOptions::default()).unwrap();
    assert_eq!(lines.len(), 5);
}

#[test]
fn test_complete_workflow() {
    let dir = common::corpus_dir();
    let engine = build(dir.path());

    let results = engine.query("to be");
    assert_eq!(
        results[0].completed_sentence,
        "To be or not to be, that is the question"
    );
    assert_eq!(results[0].score, 10);
    assert_eq!(results[0].line_offset, 1);

    let results = engine.query("HELLO");
    assert!(
        results
            .iter()
            .any(|s| s.completed_sentence.starts_with("Hello world"))
    );

    assert!(engine.query("zxqwerty").is_empty());
}

#[test]
fn test_results_never_exceed_limit_and_are_sorted() {
    let dir = common::corpus_dir();
    let engine = build(dir.path());
    for prefix in ["a", "e", "to", "python", "notto", "extra"] {
        let results = engine.query(prefix);
        assert!(results.len() <= 5);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

#[test]
fn test_trie_and_ngram_agree_on_exact_sentences() {
    let dir = common::corpus_dir();
    let lines = read_tree(dir.path(), &IngestOptions::default()).unwrap();
    let ngram = Autocomplete::build(lines.clone(), NgramIndex::default());
    let trie = Autocomplete::build(lines.clone(), PrefixTrieIndex::new());
    for line in &lines {
        assert_eq!(ngram.query(&line.text)[0], trie.query(&line.text)[0]);
    }
}

#[test]
fn test_restore_or_build_uses_snapshot_on_second_run() {
    let dir = common::corpus_dir();
    let cache_dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(cache_dir.path().join("snapshot.zst"));
    let options = IngestOptions::default();

    let first = restore_or_build(&cache, dir.path(), &options, NgramIndex::default()).unwrap();
    assert!(cache.path().exists());

    // The snapshot, not the directory, answers the second run.
    fs::remove_file(dir.path().join("shakespeare.txt")).unwrap();
    let second = restore_or_build(&cache, dir.path(), &options, NgramIndex::default()).unwrap();
    assert_eq!(second, first);
    assert_eq!(second.query("to be").len(), 1);
}

#[test]
fn test_corrupt_snapshot_triggers_rebuild() {
    let dir = common::corpus_dir();
    let cache_dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(cache_dir.path().join("snapshot.zst"));
    fs::write(cache.path(), b"garbage").unwrap();

    let engine = restore_or_build(
        &cache,
        dir.path(),
        &IngestOptions::default(),
        NgramIndex::default(),
    )
    .unwrap();
    assert_eq!(engine.corpus().len(), 5);

    let restored = cache.load::<NgramIndex>().unwrap().unwrap();
    assert_eq!(restored.engine, engine);
}

#[test]
fn test_snapshot_for_other_root_is_ignored() {
    let first_dir = common::corpus_dir();
    let second_dir = tempfile::tempdir().unwrap();
    common::write(second_dir.path(), "only.txt", "A single lonely line\n");

    let cache_dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(cache_dir.path().join("snapshot.zst"));
    let options = IngestOptions::default();

    restore_or_build(&cache, first_dir.path(), &options, NgramIndex::default()).unwrap();
    let engine =
        restore_or_build(&cache, second_dir.path(), &options, NgramIndex::default()).unwrap();
    assert_eq!(engine.corpus().len(), 1);
}

#[test]
fn test_snapshot_with_other_key_scope_is_rebuilt() {
    let dir = common::corpus_dir();
    let cache_dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(cache_dir.path().join("snapshot.zst"));
    let options = IngestOptions::default();

    restore_or_build(&cache, dir.path(), &options, NgramIndex::new(KeyScope::AllWords)).unwrap();
    let engine = restore_or_build(
        &cache,
        dir.path(),
        &options,
        NgramIndex::new(KeyScope::FirstWord),
    )
    .unwrap();
    assert_eq!(engine.index().scope(), KeyScope::FirstWord);

    // The rebuilt engine replaced the stale snapshot.
    let stored = cache.load::<NgramIndex>().unwrap().unwrap();
    assert_eq!(stored.engine.index().scope(), KeyScope::FirstWord);
}

#[test]
fn test_snapshot_with_other_extensions_is_rebuilt() {
    let dir = common::corpus_dir();
    let cache_dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(cache_dir.path().join("snapshot.zst"));

    let everything = restore_or_build(
        &cache,
        dir.path(),
        &IngestOptions::all_files(),
        NgramIndex::default(),
    )
    .unwrap();
    assert_eq!(everything.corpus().len(), 6);

    let txt_only = restore_or_build(
        &cache,
        dir.path(),
        &IngestOptions::default(),
        NgramIndex::default(),
    )
    .unwrap();
    assert_eq!(txt_only.corpus().len(), 5);
    assert!(
        txt_only
            .corpus()
            .iter()
            .all(|record| record.original_text != "CSV,data,here")
    );
}
