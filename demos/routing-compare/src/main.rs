//! `routing-compare` — throughput of one MANET routing protocol over a
//! half-mobile, half-stationary network.
//!
//! Every second the received bytes at all sinks are written as one CSV row.
//! At the end, per-flow statistics go to `<trace name>.flowmon.json` and,
//! unless disabled, the node movements to `<trace name>.mob`.
//!
//! Run with:
//!   cargo run -p routing-compare --release -- --protocol OLSR --sinks 10
//!
//! A configuration file (JSON, any subset of fields) can replace the
//! defaults; flags override both:
//!   cargo run -p routing-compare -- --config run.json --seed 7
//!
//! Replications over several seeds (no files written):
//!   cargo run -p routing-compare --release --features parallel -- --sweep 1,2,3,4

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mn_core::{ExperimentConfig, RoutingProtocol};
use mn_measure::{CsvSampleWriter, SampleSink};
use mn_sim::{ExperimentBuilder, NoopObserver, RunReport};

#[derive(Parser, Debug)]
#[command(name = "routing-compare")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with experiment parameters; missing fields keep defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Routing protocol: OLSR, AODV, DSDV or DSR (or 1-4)
    #[arg(long)]
    protocol: Option<RoutingProtocol>,

    /// Nodes in each half (mobile and stationary)
    #[arg(long)]
    nodes: Option<u32>,

    /// Number of source/sink pairs
    #[arg(long)]
    sinks: Option<u32>,

    /// Maximum node speed, m/s
    #[arg(long)]
    max_speed: Option<f64>,

    /// Pause at each waypoint, seconds
    #[arg(long)]
    pause: Option<f64>,

    /// Transmit power, dBm
    #[arg(long)]
    tx_power: Option<f64>,

    /// Simulated duration, seconds
    #[arg(long)]
    total_time: Option<f64>,

    /// Seed for every random stream of the run
    #[arg(long)]
    seed: Option<u64>,

    /// Throughput time series output
    #[arg(long)]
    csv_file: Option<PathBuf>,

    /// Skip the `.mob` mobility trace
    #[arg(long)]
    no_trace_mobility: bool,

    /// Directory for the flow statistics and mobility trace files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Write samples to this SQLite database instead of the CSV file
    /// (needs the `sqlite` feature)
    #[arg(long)]
    sqlite: Option<PathBuf>,

    /// Run one replication per seed instead of a single run
    #[arg(long, value_delimiter = ',')]
    sweep: Vec<u64>,
}

// ── Configuration ─────────────────────────────────────────────────────────────

fn load_config(args: &Args) -> Result<ExperimentConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => ExperimentConfig::default(),
    };

    if let Some(p) = args.protocol    { config.protocol = p; }
    if let Some(n) = args.nodes       { config.nodes_per_half = n; }
    if let Some(k) = args.sinks       { config.sinks = k; }
    if let Some(v) = args.max_speed   { config.max_speed = v; }
    if let Some(p) = args.pause       { config.pause_secs = p; }
    if let Some(p) = args.tx_power    { config.tx_power_dbm = p; }
    if let Some(t) = args.total_time  { config.total_time_secs = t; }
    if let Some(s) = args.seed        { config.seed = s; }
    if let Some(f) = &args.csv_file   { config.csv_file = f.clone(); }
    if args.no_trace_mobility         { config.trace_mobility = false; }

    Ok(config)
}

// ── Output ────────────────────────────────────────────────────────────────────

fn open_sink(config: &ExperimentConfig, args: &Args) -> Result<Box<dyn SampleSink>> {
    if let Some(path) = &args.sqlite {
        #[cfg(feature = "sqlite")]
        {
            let run = format!("{}_seed{}", config.trace_basename(), config.seed);
            let sink = mn_measure::SqliteSampleWriter::open(path, &run)
                .with_context(|| format!("opening {}", path.display()))?;
            return Ok(Box::new(sink));
        }
        #[cfg(not(feature = "sqlite"))]
        anyhow::bail!("{}: built without the `sqlite` feature", path.display());
    }

    let sink = CsvSampleWriter::create(&config.csv_file)
        .with_context(|| format!("creating {}", config.csv_file.display()))?;
    Ok(Box::new(sink))
}

fn print_summary(config: &ExperimentConfig, report: &RunReport) {
    let secs = report.end_time.as_secs_f64();
    println!("protocol          {}", config.protocol);
    println!("sinks             {}", config.sinks);
    println!("samples           {}", report.samples.len());
    println!("packets sent      {}", report.packets_sent);
    println!("packets received  {}", report.received_packets);
    println!("bytes received    {}", report.received_bytes);
    if secs > 0.0 {
        println!("mean throughput   {:.3} kbps", report.received_bytes as f64 * 8.0 / 1000.0 / secs);
    }
    if let Some(ratio) = report.flow_stats.as_ref().and_then(|s| s.aggregate.delivery_ratio) {
        println!("delivery ratio    {:.3}", ratio);
    }
}

// ── Runs ──────────────────────────────────────────────────────────────────────

fn run_once(config: ExperimentConfig, args: &Args) -> Result<()> {
    let base = config.trace_basename();
    let mut builder =
        ExperimentBuilder::new(config.clone()).flow_stats_path(artifact(&args.out_dir, &base, "flowmon.json"));
    if config.trace_mobility {
        builder = builder.mobility_trace_path(artifact(&args.out_dir, &base, "mob"));
    }
    let experiment = builder.build().context("setting up experiment")?;

    let mut sink = open_sink(&config, args)?;
    let report = experiment.run(&mut sink, &mut NoopObserver).context("running experiment")?;

    print_summary(&config, &report);
    Ok(())
}

fn run_sweep(config: &ExperimentConfig, seeds: &[u64]) -> Result<()> {
    let replications = mn_sim::sweep(config, seeds).context("running sweep")?;
    println!("seed,packets_sent,packets_received,bytes_received,delivery_ratio");
    for r in &replications {
        let ratio = r.report.flow_stats.as_ref().and_then(|s| s.aggregate.delivery_ratio);
        println!(
            "{},{},{},{},{}",
            r.seed,
            r.report.packets_sent,
            r.report.received_packets,
            r.report.received_bytes,
            ratio.map(|v| format!("{v:.4}")).unwrap_or_default(),
        );
    }
    Ok(())
}

fn artifact(dir: &Path, base: &str, ext: &str) -> PathBuf {
    dir.join(format!("{base}.{ext}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("warn,mn_sim=info,routing_compare=info,mn_measure::reception=info")
        }))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    // Nothing is created before this passes.
    config.validate().context("invalid configuration")?;

    info!(
        protocol = %config.protocol,
        nodes = config.node_count(),
        sinks = config.sinks,
        tx_power_dbm = config.tx_power_dbm,
        seed = config.seed,
        "starting"
    );

    if args.sweep.is_empty() {
        run_once(config, &args)
    } else {
        run_sweep(&config, &args.sweep)
    }
}
