use clap::Parser;
use clustergen::config::Config;
use clustergen::config_loader::{self, CliOverrides};
use clustergen::orchestrator;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

/// Test cluster topology and producer binding generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the cluster configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for topology, genesis and launch plan files
    #[arg(short, long, default_value = "cluster_output")]
    output: PathBuf,

    /// Topology shape (line, ring, star, mesh, bridge) or topology file
    #[arg(short, long)]
    shape: Option<String>,

    /// Total number of nodes, bios included
    #[arg(short = 'n', long)]
    total_nodes: Option<usize>,

    /// Number of producing nodes, bios included
    #[arg(short, long)]
    pnodes: Option<usize>,

    /// Number of unique producers
    #[arg(long)]
    producers: Option<usize>,

    /// Number of producers shared by every producing node
    #[arg(long)]
    shared_producers: Option<usize>,

    /// Number of trailing nodes configured but not started
    #[arg(long)]
    unstarted_nodes: Option<usize>,

    /// Genesis file to start from
    #[arg(short, long)]
    genesis: Option<PathBuf>,

    /// Override max_block_cpu_usage in genesis
    #[arg(long)]
    max_block_cpu_usage: Option<u32>,

    /// Override max_transaction_cpu_usage in genesis
    #[arg(long)]
    max_transaction_cpu_usage: Option<u32>,

    /// Print the topology JSON instead of writing files
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            shape: self.shape.clone(),
            total_nodes: self.total_nodes,
            producer_nodes: self.pnodes,
            producers: self.producers,
            shared_producers: self.shared_producers,
            unstarted_nodes: self.unstarted_nodes,
            genesis: self.genesis.clone(),
            max_block_cpu_usage: self.max_block_cpu_usage,
            max_transaction_cpu_usage: self.max_transaction_cpu_usage,
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Read quietly first: the log level lives in the configuration
    let mut config = match &args.config {
        Some(path) => config_loader::read_config(path)?,
        None => Config::default(),
    };

    // Logging level comes from the configuration unless RUST_LOG is set
    let level = config.general.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    info!("Starting cluster generation");
    if let Some(path) = &args.config {
        info!("Loaded configuration from: {:?}", path);
    }

    config_loader::apply_overrides(&mut config, &args.overrides())?;

    if args.dry_run {
        let network = orchestrator::build_network(&config)?;
        println!("{}", network.to_json()?);
        return Ok(());
    }

    info!("Output directory: {:?}", args.output);
    let files = orchestrator::generate_cluster_files(&config, &args.output)?;
    info!("Topology: {:?}", files.topology);
    info!("Genesis: {:?}", files.genesis);
    info!("Launch plan: {:?}", files.launch_plan);
    Ok(())
}
