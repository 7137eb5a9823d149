//! Cache hierarchy simulator CLI.
//!
//! Replays the reads of a memory trace through the cache hierarchy described
//! by a JSON model and prints the per-level report. It performs:
//! 1. **Configuration:** Load the model and apply command-line overrides.
//! 2. **Replay:** Stream the trace (or standard input) through the simulator.
//! 3. **Report:** Print the text or JSON report and optionally write it to a file.

use std::error::Error as _;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cachesim_core::common::error::{ConfigError, ReportError, SimError};
use cachesim_core::config::{Config, HitAttribution, PrefetchPolicyKind, StrideSelection};
use cachesim_core::sim::{Simulator, TraceReader};
use cachesim_core::stats::SimReport;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Functional multi-level cache hierarchy simulator",
    long_about = "Replay the reads of a memory trace through a cache hierarchy and report hits, misses, evictions and cycles per level.\n\nExamples:\n  cachesim trace.log model.json\n  cachesim trace.log model.json -p common-stride -o out/report.txt\n  zcat trace.log.gz | cachesim - model.json --json"
)]
struct Cli {
    /// Memory trace file; `-` reads standard input.
    memtrace: PathBuf,

    /// Cache model JSON (record-array descriptor or structured form).
    model: PathBuf,

    /// Prefetch policy: `common-stride` or `next-line`.
    #[arg(short, long)]
    prefetch: Option<PrefetchPolicyKind>,

    /// Override the 1-based level prefetches are injected into.
    #[arg(long)]
    fetch_level: Option<usize>,

    /// Common-stride adds the winning stride's occurrence count instead of the stride.
    #[arg(long)]
    occurrence_count: bool,

    /// Credit hits to the first level whose latency matches the returned latency.
    #[arg(long)]
    latency_match: bool,

    /// Create placeholder lines that never match (no warm hits on address 0).
    #[arg(long)]
    strict_cold_lines: bool,

    /// Also write the report to this file; parent directories are created.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the statistics as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Fatal CLI failure.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("failed to open memory trace {}", path.display())]
    OpenTrace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write report {}", path.display())]
    WriteReport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize report")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[!] FATAL: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("    caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs the stderr log subscriber.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Loads the model and applies command-line overrides.
fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::from_path(&cli.model)?;

    if let Some(policy) = cli.prefetch {
        config.prefetch.policy = policy;
    }
    if cli.occurrence_count {
        config.prefetch.stride_selection = StrideSelection::OccurrenceCount;
    }
    if let Some(level) = cli.fetch_level {
        config.fetch_level = Some(level);
    }
    if cli.latency_match {
        config.hit_attribution = HitAttribution::LatencyMatch;
    }
    if cli.strict_cold_lines {
        config.strict_cold_lines = true;
    }

    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let mut sim = Simulator::new(&config)?;
    let chunk_bytes = config.chunk_bytes();

    info!(trace = %cli.memtrace.display(), chunk_bytes, "replaying memory trace");
    if cli.memtrace.as_os_str() == "-" {
        sim.run(TraceReader::new(io::stdin().lock(), chunk_bytes))?;
    } else {
        let file = File::open(&cli.memtrace).map_err(|source| CliError::OpenTrace {
            path: cli.memtrace.clone(),
            source,
        })?;
        sim.run(TraceReader::new(BufReader::new(file), chunk_bytes))?;
    }

    let stats = sim.stats();
    let name = run_name(&cli.model, &cli.memtrace, sim.prefetch_policy());
    let report = SimReport {
        run_name: &name,
        prefetch_level: sim.prefetch_level(),
        stats: &stats,
    };
    let text = if cli.json {
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        json
    } else {
        report.render()?
    };

    print!("{text}");
    if let Some(path) = &cli.output {
        write_report(path, &text)?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

/// `<model stem>-<trace>[.<policy>]`, the banner printed at the top of a report.
fn run_name(model: &Path, memtrace: &Path, policy: Option<&str>) -> String {
    let stem = model
        .file_stem()
        .map_or_else(|| model.to_string_lossy(), |stem| stem.to_string_lossy());
    let mut name = format!("{stem}-{}", memtrace.display());
    if let Some(policy) = policy {
        name.push('.');
        name.push_str(policy);
    }
    name
}

fn write_report(path: &Path, text: &str) -> Result<(), CliError> {
    let failed = |source: io::Error| CliError::WriteReport {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(failed)?;
    }
    fs::write(path, text).map_err(failed)
}
