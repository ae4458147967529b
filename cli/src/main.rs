//! Multicast simulator CLI
//!
//! ```bash
//! # Ten devices, first seven in the group, ten packets
//! mcast-sim run --population 10 --group-size 7 --packets 10 --seed 42
//!
//! # Independent runs over several populations
//! mcast-sim sweep --populations 5,10,20,40 --packets 50
//!
//! # Unicast vs multicast link-level comparison
//! mcast-sim compare --populations 5,10,25,50,100 --json
//! ```

mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use mcast_core::{
    compare_delivery_modes, run_population_sweep, DeviceId, EventSink, LinkBudget, Simulation, SimulationConfig,
    TracingSink,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::output::JsonLinesSink;

#[derive(Parser, Debug)]
#[command(name = "mcast-sim")]
#[command(version, about = "Discrete-time base-station multicast simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation and print the verification report
    Run(RunArgs),
    /// Run independent simulations over several population sizes
    Sweep(SweepArgs),
    /// Compare unicast and multicast reliability and resource cost
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON config file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of devices, identified 1..=N
    #[arg(short = 'n', long)]
    population: Option<u32>,

    /// Explicit group members, e.g. 1,2,3
    #[arg(short = 'g', long, value_delimiter = ',', conflicts_with = "group_size")]
    group: Option<Vec<DeviceId>>,

    /// Group made of the first K devices
    #[arg(long)]
    group_size: Option<u32>,

    /// Number of packets to send
    #[arg(short = 'p', long)]
    packets: Option<u64>,

    /// Random seed. When omitted, the config seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Per-recipient delivery probability (0.0-1.0)
    #[arg(long)]
    reliability: Option<f64>,

    /// Cosmetic delay between slots in milliseconds
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Stream simulation events to stdout as JSON lines instead of logging them
    #[arg(long, conflicts_with = "json")]
    events_json: bool,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[arg(long, value_delimiter = ',', default_value = "5,10,20,40,80")]
    populations: Vec<u32>,

    #[arg(short = 'p', long, default_value = "20")]
    packets: u64,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    reliability: Option<f64>,

    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct CompareArgs {
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "5,10,15,20,25,30,35,40,45,50,55,60,65,70,75,80,85,90,95,100,110,120,130,140,150"
    )]
    populations: Vec<u32>,

    /// JSON link budget file; missing fields use defaults
    #[arg(long)]
    budget: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,mcast_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(args),
        Command::Sweep(args) => sweep(args),
        Command::Compare(args) => compare(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "simulation failed");
            ExitCode::FAILURE
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn run(args: RunArgs) -> CliResult {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };
    if let Some(population) = args.population {
        config.population = population;
        if args.group.is_none() && args.group_size.is_none() && args.config.is_none() {
            config = config.with_group_size(mcast_core::sweep::group_size_for(population));
        }
    }
    if let Some(group) = args.group {
        config.group_members = group;
    }
    if let Some(size) = args.group_size {
        config = config.with_group_size(size);
    }
    if let Some(packets) = args.packets {
        config.packet_count = packets;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(reliability) = args.reliability {
        config.reliability = reliability;
    }
    if let Some(ms) = args.pacing_ms {
        config.slot_pacing_ms = ms;
    }

    info!(config = %config.encode(), "Resolved configuration");

    let sink: Box<dyn EventSink> = if args.events_json {
        Box::new(JsonLinesSink::new(std::io::stdout()))
    } else {
        Box::new(TracingSink)
    };
    let mut sim = Simulation::new(config)?.with_sink(sink);

    let report = sim.run()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_report(&report);
    }
    Ok(())
}

fn sweep(args: SweepArgs) -> CliResult {
    let mut base = SimulationConfig { packet_count: args.packets, ..Default::default() };
    base.seed = args.seed.unwrap_or_else(rand::random);
    if let Some(reliability) = args.reliability {
        base.reliability = reliability;
    }
    info!(seed = base.seed, populations = ?args.populations, "Starting sweep");

    let results = run_population_sweep(&base, &args.populations)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        output::print_sweep(&results);
    }
    Ok(())
}

fn compare(args: CompareArgs) -> CliResult {
    let budget: LinkBudget = match &args.budget {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => LinkBudget::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "Starting unicast/multicast comparison");

    let points = compare_delivery_modes(&budget, &args.populations, seed)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else {
        output::print_comparison(&points);
    }
    Ok(())
}
