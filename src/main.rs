//! Command-line driver: single-configuration runs and the reference parameter sweep.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::warn;
use std::path::PathBuf;

use trace_cache_sim::cache::{CacheConfig, LruPolicy};
use trace_cache_sim::report::ResultWriter;
use trace_cache_sim::simulator::Simulator;
use trace_cache_sim::sweep::{run_sweep, SweepConfig, REFERENCE_TRACES};
use trace_cache_sim::trace::TraceFile;

#[derive(Parser)]
#[command(name = "trace-cache-sim", version, about = "Set-associative LRU cache simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay one trace against one cache configuration
    Simulate(SimulateArgs),
    /// Run the fixed configuration and the cache size / block size / associativity sweeps
    Sweep(SweepArgs),
}

#[derive(Args)]
struct GeometryArgs {
    /// Total cache capacity in bytes
    #[arg(long, default_value_t = 1024 * 1024)]
    cache_size: u64,
    /// Block size in bytes (power of two)
    #[arg(long, default_value_t = 4)]
    block_size: u64,
    /// Ways per set (1 = direct-mapped)
    #[arg(long, default_value_t = 4)]
    associativity: usize,
    /// Recency tracking inside a set
    #[arg(long, value_enum, default_value_t = PolicyCli::TouchOnly)]
    policy: PolicyCli,
}

impl GeometryArgs {
    fn config(&self) -> CacheConfig {
        CacheConfig {
            size_bytes: self.cache_size,
            block_size: self.block_size,
            associativity: self.associativity,
            policy: self.policy.into(),
        }
    }
}

#[derive(Args)]
struct SimulateArgs {
    /// Trace file to replay
    #[arg(long)]
    trace: PathBuf,
    #[command(flatten)]
    geometry: GeometryArgs,
}

#[derive(Args)]
struct SweepArgs {
    /// Trace files to run. Defaults to the reference traces under --trace-dir
    #[arg(long = "trace", value_name = "PATH")]
    traces: Vec<PathBuf>,
    /// Directory holding the reference traces
    #[arg(long, default_value = ".")]
    trace_dir: PathBuf,
    /// Result table
    #[arg(long, short, default_value = "cache_simulation_results.csv")]
    output: PathBuf,
    /// Simulate configurations in parallel
    #[arg(long)]
    parallel: bool,
    /// Fixed values held while one parameter varies
    #[command(flatten)]
    geometry: GeometryArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyCli {
    TouchOnly,
    FullOrder,
}

impl From<PolicyCli> for LruPolicy {
    fn from(value: PolicyCli) -> Self {
        match value {
            PolicyCli::TouchOnly => LruPolicy::TouchOnly,
            PolicyCli::FullOrder => LruPolicy::FullOrder,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(args) => run_simulation(args),
        Command::Sweep(args) => run_reference_sweep(args),
    }
}

fn run_simulation(args: SimulateArgs) -> Result<()> {
    let trace = TraceFile::load(&args.trace)
        .with_context(|| format!("Failed to load trace {}", args.trace.display()))?;
    let config = args.geometry.config();
    let mut sim = Simulator::new(config).context("Invalid cache configuration")?;
    let stats = *sim.replay(&trace);

    println!("Trace          : {}", trace.name);
    println!("Cache size     : {} bytes", config.size_bytes);
    println!("Block size     : {} bytes", config.block_size);
    println!("Associativity  : {}", config.associativity);
    println!("Sets           : {}", sim.cache().num_sets());
    println!("LRU policy     : {}", config.policy);
    println!("Accesses       : {}", stats.accesses);
    match stats.rates() {
        Ok((hit, miss)) => {
            println!("Hits           : {} ({:.2}%)", stats.hits, hit);
            println!("Misses         : {} ({:.2}%)", stats.misses, miss);
        }
        Err(e) => println!("Hit rate       : N/A ({e})"),
    }
    Ok(())
}

fn run_reference_sweep(args: SweepArgs) -> Result<()> {
    let traces = if args.traces.is_empty() {
        REFERENCE_TRACES
            .iter()
            .map(|name| args.trace_dir.join(format!("{name}.trace")))
            .collect()
    } else {
        args.traces
    };

    // Open the sink first: without it there is nothing to produce.
    let mut writer = ResultWriter::create(&args.output)
        .with_context(|| format!("Unable to open {} for writing", args.output.display()))?;

    let config = SweepConfig {
        fixed: args.geometry.config(),
        traces,
        parallel: args.parallel,
        ..SweepConfig::default()
    };
    let outcome = run_sweep(&config);

    writer
        .write_all(&outcome.results)
        .with_context(|| format!("Failed writing {}", args.output.display()))?;
    writer.finish()?;

    for skipped in &outcome.skipped {
        warn!(
            "no result for {} ({} sweep, {} KB, {} B, {}-way): {}",
            skipped.job.trace.display(),
            skipped.job.kind,
            skipped.job.config.size_bytes / 1024,
            skipped.job.config.block_size,
            skipped.job.config.associativity,
            skipped.reason
        );
    }
    println!(
        "Wrote {} rows to {} ({} configurations skipped)",
        outcome.results.len(),
        args.output.display(),
        outcome.skipped.len()
    );
    Ok(())
}
