//! SATD lineage mining CLI
//!
//! # Usage
//!
//! ```bash
//! # Resolve one commit pair
//! satdtrack pair --repo /work/project --old HEAD~1 --new HEAD
//!
//! # Bisect a commit window for every debt comment at its start
//! satdtrack range --repo /work/project --start v1.0 --end HEAD --out sqlite:satd.db
//!
//! # Walk every adjacent pair across one or more repositories
//! satdtrack mine --repo /work/a --repo /work/b --start v1.0 --end HEAD --out jsonl:records.jsonl
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use satd_core::{MiningSession, Resolution, TrackerConfig};
use satd_storage::{JsonlWriter, ResolutionSink, SqliteResolutionStore};

type CliError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "satdtrack")]
#[command(about = "SATD lineage miner - tracks the fate of TODO/FIXME comments across git history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every debt comment across one commit pair
    Pair {
        /// Repository path
        #[arg(long)]
        repo: PathBuf,

        /// Older commit (SHA, tag, HEAD~n)
        #[arg(long)]
        old: String,

        /// Newer commit
        #[arg(long)]
        new: String,

        #[command(flatten)]
        out: OutArgs,

        #[command(flatten)]
        tracker: TrackerArgs,
    },

    /// Bisect a commit window for every debt comment present at its start
    Range {
        /// Repository path
        #[arg(long)]
        repo: PathBuf,

        /// Oldest commit of the window
        #[arg(long)]
        start: String,

        /// Newest commit of the window
        #[arg(long)]
        end: String,

        #[command(flatten)]
        out: OutArgs,

        #[command(flatten)]
        tracker: TrackerArgs,
    },

    /// Walk every adjacent commit pair in a window, repo by repo
    Mine {
        /// Repository path (repeatable; repositories run in parallel)
        #[arg(long, required = true)]
        repo: Vec<PathBuf>,

        /// Oldest commit of the window
        #[arg(long)]
        start: String,

        /// Newest commit of the window
        #[arg(long)]
        end: String,

        #[command(flatten)]
        out: OutArgs,

        #[command(flatten)]
        tracker: TrackerArgs,
    },
}

#[derive(Args)]
struct OutArgs {
    /// Output target: "sqlite:PATH", "jsonl:PATH", or "-" for stdout JSONL
    #[arg(long, default_value = "-")]
    out: String,
}

#[derive(Args)]
struct TrackerArgs {
    /// Similarity threshold for treating two comment texts as the same debt
    #[arg(long, default_value_t = 0.5)]
    threshold: f64,

    /// Tracked source file suffix
    #[arg(long, default_value = ".java")]
    suffix: String,

    /// Ignore-word excluding a comment from mining (repeatable, replaces defaults)
    #[arg(long = "ignore-word")]
    ignore_words: Vec<String>,

    /// Debt marker keyword (repeatable, replaces defaults)
    #[arg(long = "marker")]
    markers: Vec<String>,

    /// Disable rename/copy detection
    #[arg(long)]
    no_renames: bool,
}

impl TrackerArgs {
    fn to_config(&self) -> TrackerConfig {
        let mut config = TrackerConfig::new()
            .with_similarity_threshold(self.threshold)
            .with_source_suffix(self.suffix.clone())
            .with_rename_detection(!self.no_renames);
        if !self.ignore_words.is_empty() {
            config = config.with_ignorable_words(self.ignore_words.clone());
        }
        if !self.markers.is_empty() {
            config = config.with_debt_markers(self.markers.clone());
        }
        config
    }
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Pair {
            repo,
            old,
            new,
            out,
            tracker,
        } => run_pair(repo, &old, &new, &out, &tracker)?,
        Commands::Range {
            repo,
            start,
            end,
            out,
            tracker,
        } => run_range(repo, &start, &end, &out, &tracker)?,
        Commands::Mine {
            repo,
            start,
            end,
            out,
            tracker,
        } => run_mine(repo, &start, &end, &out, &tracker)?,
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn make_sink(spec: &str) -> Result<Box<dyn ResolutionSink + Send>, CliError> {
    if spec == "-" {
        return Ok(Box::new(JsonlWriter::new(
            Box::new(io::stdout()) as Box<dyn Write + Send>
        )));
    }
    if let Some(path) = spec.strip_prefix("sqlite:") {
        return Ok(Box::new(SqliteResolutionStore::new(path)?));
    }
    if let Some(path) = spec.strip_prefix("jsonl:") {
        let file = BufWriter::new(File::create(path)?);
        return Ok(Box::new(JsonlWriter::new(
            Box::new(file) as Box<dyn Write + Send>
        )));
    }
    Err(format!("unrecognized --out '{spec}', expected sqlite:PATH, jsonl:PATH or -").into())
}

fn run_pair(
    repo: PathBuf,
    old: &str,
    new: &str,
    out: &OutArgs,
    tracker: &TrackerArgs,
) -> Result<(), CliError> {
    let mut session = MiningSession::open(&repo, tracker.to_config())?;
    let mut sink = make_sink(&out.out)?;
    let mut tally = Tally::new();

    let outcome = session.resolve_pair(old, new)?;
    tally.count(outcome.instances.iter().map(|i| i.resolution));
    sink.write_pair(&outcome)?;
    sink.flush()?;

    tally.print(&format!("{} -> {}", old, new));
    Ok(())
}

fn run_range(
    repo: PathBuf,
    start: &str,
    end: &str,
    out: &OutArgs,
    tracker: &TrackerArgs,
) -> Result<(), CliError> {
    let mut session = MiningSession::open(&repo, tracker.to_config())?;
    let mut sink = make_sink(&out.out)?;
    let mut tally = Tally::new();

    let located = session.locate_in_range(start, end)?;
    tally.count(located.iter().map(|l| l.instance.resolution));
    sink.write_located(&located)?;
    sink.flush()?;

    tally.print(&format!("{}..{}", start, end));
    Ok(())
}

fn run_mine(
    repos: Vec<PathBuf>,
    start: &str,
    end: &str,
    out: &OutArgs,
    tracker: &TrackerArgs,
) -> Result<(), CliError> {
    let sink = Arc::new(Mutex::new(make_sink(&out.out)?));

    // Each repository gets its own session; only the sink is shared
    let tallies: Vec<Tally> = repos
        .par_iter()
        .map(|repo| mine_repo(repo, start, end, tracker, &sink))
        .collect::<Result<Vec<_>, CliError>>()?;

    sink.lock().unwrap().flush()?;

    let mut total = Tally::new();
    for tally in tallies {
        total.merge(tally);
    }
    total.print(&format!("{} repositories, {}..{}", repos.len(), start, end));
    Ok(())
}

fn mine_repo(
    repo: &PathBuf,
    start: &str,
    end: &str,
    tracker: &TrackerArgs,
    sink: &Arc<Mutex<Box<dyn ResolutionSink + Send>>>,
) -> Result<Tally, CliError> {
    let mut session = MiningSession::open(repo, tracker.to_config())?;
    let mut tally = Tally::new();

    for (old, new) in session.pair_revs(start, end)? {
        // A broken pair is skipped, not fatal for the walk
        let outcome = match session.resolve_pair(&old, &new) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    repo = %repo.display(),
                    old = old.as_str(),
                    new = new.as_str(),
                    error = %err,
                    "skipping unresolvable commit pair"
                );
                continue;
            }
        };
        tally.count(outcome.instances.iter().map(|i| i.resolution));
        sink.lock().unwrap().write_pair(&outcome)?;
    }

    Ok(tally)
}

/// Per-resolution record counts for the end-of-run summary
struct Tally {
    counts: BTreeMap<&'static str, u64>,
}

impl Tally {
    fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    fn count(&mut self, resolutions: impl Iterator<Item = Resolution>) {
        for resolution in resolutions {
            *self.counts.entry(resolution.as_str()).or_insert(0) += 1;
        }
    }

    fn merge(&mut self, other: Tally) {
        for (key, value) in other.counts {
            *self.counts.entry(key).or_insert(0) += value;
        }
    }

    fn print(&self, scope: &str) {
        let total: u64 = self.counts.values().sum();
        eprintln!("✅ {scope}: {total} records");
        for (resolution, count) in &self.counts {
            eprintln!("   {resolution}: {count}");
        }
    }
}
