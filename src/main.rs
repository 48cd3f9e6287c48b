//! coagulate command-line entrypoint

use clap::Parser;
use coagulate::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Detect communities in an undirected edge list.
///
/// Runs until interrupted (Ctrl-C or SIGTERM) or a configured limit is reached, writing the
/// partition to OUTPUT periodically and once more on exit. An existing OUTPUT is resumed.
#[derive(Parser, Debug)]
#[command(name = "coagulate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Edge list: whitespace-separated pairs of node ids
    input: PathBuf,

    /// Checkpoint/result file
    output: PathBuf,

    /// TOML configuration file
    #[arg(long, env = "COAGULATE_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds between checkpoint writes
    #[arg(long)]
    checkpoint_interval: Option<f64>,

    /// Seconds between stall checks
    #[arg(long)]
    convergence_interval: Option<f64>,

    /// Minimum objective change that counts as progress
    #[arg(long)]
    convergence_threshold: Option<f64>,

    /// Seed for split sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many optimization steps
    #[arg(long)]
    max_steps: Option<u64>,

    /// Ignore any existing OUTPUT and start from singletons
    #[arg(long)]
    fresh: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<CoagulateConfig> {
        let mut cfg = match &self.config {
            Some(path) => CoagulateConfig::load(path)?,
            None => CoagulateConfig::default(),
        };
        if let Some(v) = self.checkpoint_interval {
            cfg.checkpoint_interval_secs = v;
        }
        if let Some(v) = self.convergence_interval {
            cfg.convergence_check_interval_secs = v;
        }
        if let Some(v) = self.convergence_threshold {
            cfg.convergence_threshold = v;
        }
        if self.seed.is_some() {
            cfg.rng_seed = self.seed;
        }
        if self.max_steps.is_some() {
            cfg.max_steps = self.max_steps;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn run(cli: &Cli, shutdown: Arc<AtomicBool>) -> Result<RunSummary> {
    let config = cli.resolve_config()?;
    let graph = AdjacencyGraph::read_edge_list(&cli.input)?;
    if graph.total_nodes() == 0 {
        return Err(CoagulateError::EmptyGraph);
    }
    let partition = if cli.fresh {
        Partition::initialize(&graph)?
    } else {
        load_or_initialize(&cli.output, &graph)?
    };
    log::info!(
        "starting with {} communities, Q = {:.6}",
        partition.count(),
        partition.objective()
    );
    ControlLoop::new(&graph, partition, config, &cli.output, shutdown)?.run()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        log::error!("cannot install signal handler: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli, shutdown) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
