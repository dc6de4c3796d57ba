//! Headless evolution runner
//!
//! Builds a simulation from a config file and/or flags, runs it for a fixed
//! number of ticks, prints a text frame every N ticks and a final census.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use evo_grid::core::config::SimulationConfig;
use evo_grid::core::error::Result;
use evo_grid::render::Frame;
use evo_grid::simulation::{Simulation, TracingSink};

/// Headless evolution runner - grid world of evolving agents
#[derive(Parser, Debug)]
#[command(name = "evo_sim")]
#[command(about = "Run the evolutionary grid simulation without a display")]
struct Args {
    /// TOML config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in tiles
    #[arg(long)]
    width: Option<u32>,

    /// Grid height in tiles
    #[arg(long)]
    height: Option<u32>,

    /// Agents placed at start
    #[arg(long)]
    population: Option<usize>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of seeded agents that are social (0.0-1.0)
    #[arg(long)]
    social_fraction: Option<f64>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 500)]
    ticks: u64,

    /// Print a frame every N ticks (0 = only the final frame)
    #[arg(long, default_value_t = 100)]
    frame_every: u64,

    /// Turn off the disaster engine
    #[arg(long)]
    no_disasters: bool,

    /// Print the final census as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Suppress frames; only the final census is printed
    #[arg(long, short = 'q')]
    quiet: bool,
}

impl Args {
    fn build_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(population) = self.population {
            config.initial_population = population;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(fraction) = self.social_fraction {
            config.social_fraction = fraction;
        }
        if self.no_disasters {
            config.disasters_enabled = false;
        }
        config.validate_run(self.ticks)?;
        Ok(config)
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.build_config()?;
    tracing::info!(seed = config.seed, ticks = args.ticks, "starting evo_sim");

    let mut sim = Simulation::new(config)?;
    sim.add_sink(Box::new(TracingSink));

    for _ in 0..args.ticks {
        sim.tick();
        let tick = sim.current_tick();
        if !args.quiet && args.frame_every > 0 && tick % args.frame_every == 0 {
            print_frame(&sim);
        }
        if sim.world().population() == 0 {
            tracing::info!(tick, "population extinct");
            break;
        }
    }

    if !args.quiet && (args.frame_every == 0 || sim.current_tick() % args.frame_every != 0) {
        print_frame(&sim);
    }

    let census = sim.census();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&census)?);
    } else {
        print!("{}", census.summary());
    }
    Ok(())
}

fn print_frame(sim: &Simulation) {
    let frame = Frame::capture(sim.world(), &sim.census(), sim.event_log());
    println!("=== tick {} ===", frame.tick);
    print!("{}", frame.to_text());
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("evo_grid=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
