// ==============================================================================
// CLI for sentcomplete
// ==============================================================================
//
// Ingests a directory of text files (or restores a cached snapshot of one) and
// then either answers the `--query` prefixes given on the command line or runs
// an interactive loop where each typed line extends the current prefix.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

use sentcomplete::{
    Autocomplete, CandidateIndex, FileCache, IngestOptions, KeyScope, NgramIndex,
    PrefixTrieIndex, SnapshotStore, Suggestion, read_tree, restore_or_build,
};

const DEFAULT_CACHE: &str = "sentcomplete-cache.json.zst";
const RESET: &str = "#";
const QUIT: &str = ":q";

#[derive(Parser)]
#[command(
    name = "sentcomplete",
    about = "Typo-tolerant sentence autocomplete over a directory of text files"
)]
struct Cli {
    /// Directory whose text files make up the corpus.
    root: PathBuf,

    /// Snapshot file used to skip re-ingestion on later runs.
    #[arg(long, default_value = DEFAULT_CACHE)]
    cache: PathBuf,

    /// Neither read nor write a snapshot.
    #[arg(long)]
    no_cache: bool,

    /// Ignore an existing snapshot and write a fresh one.
    #[arg(long)]
    rebuild: bool,

    #[arg(long, value_enum, default_value_t = IndexChoice::Ngram)]
    index: IndexChoice,

    /// Which words of each sentence the n-gram index keys on.
    #[arg(long, value_enum, default_value_t = ScopeChoice::FirstWord)]
    scope: ScopeChoice,

    /// File extension to ingest. May be repeated.
    #[arg(long = "ext", default_values_t = [String::from("txt")])]
    extensions: Vec<String>,

    /// Ingest every file regardless of extension.
    #[arg(long, conflicts_with = "extensions")]
    all_files: bool,

    /// Answer this prefix and exit instead of starting the interactive loop.
    /// May be repeated.
    #[arg(short, long = "query")]
    queries: Vec<String>,

    /// Print suggestions as JSON, one object per prefix.
    #[arg(long)]
    json: bool,

    /// Log filter, e.g. `debug` or `sentcomplete=trace`. Defaults to RUST_LOG,
    /// then `info`.
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long)]
    no_color: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum IndexChoice {
    Ngram,
    Trie,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeChoice {
    FirstWord,
    AllWords,
}

impl From<ScopeChoice> for KeyScope {
    fn from(choice: ScopeChoice) -> Self {
        match choice {
            ScopeChoice::FirstWord => KeyScope::FirstWord,
            ScopeChoice::AllWords => KeyScope::AllWords,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level.as_deref(), cli.no_color)?;

    match cli.index {
        IndexChoice::Ngram => run(&cli, NgramIndex::new(cli.scope.into())),
        IndexChoice::Trie => run(&cli, PrefixTrieIndex::new()),
    }
}

fn init_logger(log_level: Option<&str>, no_color: bool) -> anyhow::Result<()> {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log filter {:?}", level))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(!no_color)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {}", e))
}

fn run<I>(cli: &Cli, index: I) -> anyhow::Result<()>
where
    I: CandidateIndex + Serialize + DeserializeOwned,
{
    let options = if cli.all_files {
        IngestOptions::all_files()
    } else {
        IngestOptions {
            extensions: cli.extensions.clone(),
        }
    };
    let engine = load_engine(cli, &options, index)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !cli.queries.is_empty() {
        let answers = engine.query_batch(&cli.queries);
        for (prefix, suggestions) in cli.queries.iter().zip(&answers) {
            print_suggestions(&mut out, prefix, suggestions, cli.json)?;
        }
        return Ok(());
    }

    interactive(&engine, &mut out, cli.json)
}

fn load_engine<I>(cli: &Cli, options: &IngestOptions, index: I) -> anyhow::Result<Autocomplete<I>>
where
    I: CandidateIndex + Serialize + DeserializeOwned,
{
    if cli.no_cache {
        let lines = read_tree(&cli.root, options)
            .with_context(|| format!("ingest {}", cli.root.display()))?;
        return Ok(Autocomplete::build(lines, index));
    }

    let cache = FileCache::new(&cli.cache);
    if cli.rebuild {
        cache
            .discard()
            .with_context(|| format!("remove snapshot {}", cache.path().display()))?;
    }
    restore_or_build(&cache, &cli.root, options, index)
        .with_context(|| format!("ingest {}", cli.root.display()))
}

fn interactive<I, W>(engine: &Autocomplete<I>, out: &mut W, json: bool) -> anyhow::Result<()>
where
    I: CandidateIndex,
    W: Write,
{
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut current = String::new();
    let mut line = String::new();

    writeln!(out, "Enter your text:")?;
    loop {
        write!(out, "{}", current)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break; // EOF
        }
        let typed = line.trim_end_matches(['\n', '\r']);
        if typed == QUIT {
            break;
        }
        if typed == RESET {
            current.clear();
            writeln!(out, "Enter your text:")?;
            continue;
        }

        current.push_str(typed);
        print_suggestions(out, &current, &engine.query(&current), json)?;
    }
    Ok(())
}

fn print_suggestions<W: Write>(
    out: &mut W,
    prefix: &str,
    suggestions: &[Suggestion],
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let value = serde_json::json!({ "prefix": prefix, "suggestions": suggestions });
        writeln!(out, "{}", value)?;
        return Ok(());
    }

    if suggestions.is_empty() {
        writeln!(out, "No suggestions found.")?;
        return Ok(());
    }
    writeln!(out, "Here are {} suggestions:", suggestions.len())?;
    for (i, s) in suggestions.iter().enumerate() {
        let stem = Path::new(&s.source)
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_else(|| s.source.as_str().into());
        writeln!(
            out,
            "{}. {} ({} {})",
            i + 1,
            s.completed_sentence,
            stem,
            s.line_offset
        )?;
    }
    Ok(())
}
