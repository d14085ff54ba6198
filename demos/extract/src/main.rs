//! `extract` — OSM PBF extract → drivable road graph → largest component → JSON.
//!
//! The full pipeline, writing the outputs included, is repeated `--runs`
//! times to time it.  Every run overwrites the same output files.
//!
//! Run with:
//!   cargo run -p extract --profile fast -- annarbor.osm.pbf --out annarbor.json

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use memory_stats::memory_stats;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rg_core::RoadConfig;
use rg_network::osm::load_from_pbf;
use rg_network::{ComponentExtractor, DanglingEdgePolicy, Extraction, SpeedPolicy};
use rg_output::{CsvEdgeWriter, GraphWriter, JsonWriter};

// ── Memory helper ─────────────────────────────────────────────────────────────

fn mem_mb() -> f64 {
    memory_stats()
        .map(|s| s.physical_mem as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}

// ── Arguments ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OnBadSpeed {
    /// Stop at the first road whose speed cannot be determined.
    Abort,
    /// Leave such roads out of the graph.
    Skip,
    /// Use `--fallback-mph` for such roads.
    Fallback,
}

#[derive(Parser)]
#[command(name = "extract")]
#[command(about = "Build the largest connected drivable road graph from an OSM PBF extract", long_about = None)]
struct Cli {
    /// OSM PBF file to read.
    input: PathBuf,

    /// Where to write the graph JSON.
    #[arg(long, short, default_value = "graph.json")]
    out: PathBuf,

    /// Also write a `from,to,distance_miles,time_hours` edge list.
    #[arg(long)]
    edges_csv: Option<PathBuf>,

    /// TOML file overriding tag keys, drivable classes, and default speeds.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Number of timed runs.
    #[arg(long, short, default_value_t = 10)]
    runs: u32,

    #[arg(long, value_enum, default_value_t = OnBadSpeed::Abort)]
    on_bad_speed: OnBadSpeed,

    /// Speed (mph) used with `--on-bad-speed fallback`.
    #[arg(long, default_value_t = 25.0)]
    fallback_mph: f64,

    /// Fail instead of dropping edges that point at unknown nodes.
    #[arg(long)]
    strict: bool,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn speed_policy(&self) -> SpeedPolicy {
        match self.on_bad_speed {
            OnBadSpeed::Abort => SpeedPolicy::Abort,
            OnBadSpeed::Skip => SpeedPolicy::Skip,
            OnBadSpeed::Fallback => SpeedPolicy::Fallback(self.fallback_mph),
        }
    }

    fn extractor(&self) -> ComponentExtractor {
        let policy = if self.strict { DanglingEdgePolicy::Reject } else { DanglingEdgePolicy::Drop };
        ComponentExtractor::new().dangling_edges(policy)
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

fn run_once(cli: &Cli, config: &RoadConfig) -> Result<Extraction> {
    let (graph, stats) = load_from_pbf(&cli.input, config, cli.speed_policy())
        .with_context(|| format!("loading {}", cli.input.display()))?;
    info!(
        nodes = graph.node_count(),
        kept = stats.paths_kept,
        skipped = stats.paths_skipped,
        "road graph loaded"
    );
    Ok(cli.extractor().extract(graph)?)
}

fn write_outputs(cli: &Cli, extraction: &Extraction) -> Result<()> {
    let mut json = JsonWriter::create(&cli.out)
        .with_context(|| format!("creating {}", cli.out.display()))?
        .pretty(cli.pretty);
    json.write_graph(&extraction.graph)?;
    json.finish()?;

    if let Some(path) = &cli.edges_csv {
        let mut csv = CsvEdgeWriter::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        csv.write_graph(&extraction.graph)?;
        csv.finish()?;
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RoadConfig> {
    match path {
        Some(p) => RoadConfig::load(p).with_context(|| format!("reading config {}", p.display())),
        None => Ok(RoadConfig::default()),
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if cli.runs == 0 {
        bail!("--runs must be at least 1");
    }
    let config = load_config(cli.config.as_deref())?;

    println!("=== extract: {} ===", cli.input.display());
    println!("  runs={}  memory at start: {:.0} MB", cli.runs, mem_mb());

    let mut total = Duration::ZERO;
    let mut last = None;
    for run in 1..=cli.runs {
        let t0 = Instant::now();
        let extraction = run_once(&cli, &config)?;
        write_outputs(&cli, &extraction)?;
        let elapsed = t0.elapsed();
        total += elapsed;

        println!(
            "  run {:2}  {:.3}s  nodes={:>9}  edges={:>9}  components={:>7}  mem={:.0} MB",
            run,
            elapsed.as_secs_f64(),
            extraction.graph.node_count(),
            extraction.graph.edge_count(),
            extraction.component_count,
            mem_mb(),
        );
        last = Some(extraction);
    }

    let average = total / cli.runs;
    println!();
    println!("  average over {} runs: {:.3}s", cli.runs, average.as_secs_f64());
    if let Some(extraction) = last {
        println!(
            "  discarded {} nodes outside the largest component, dropped {} edges",
            extraction.discarded_nodes, extraction.dropped_edges,
        );
    }
    println!("  written: {}", cli.out.display());
    if let Some(path) = &cli.edges_csv {
        println!("  written: {}", path.display());
    }
    Ok(())
}
