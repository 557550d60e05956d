use std::io::{self, BufRead};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;

use conway_settle::config::{
    DEFAULT_DISPLAY_CADENCE, DEFAULT_INITIAL_FRACTION, DEFAULT_MAX_PERIOD, DEFAULT_SIDE_LENGTH,
    DEFAULT_STABILITY_THRESHOLD,
};
use conway_settle::grid::pattern_by_name;
use conway_settle::{App, Grid, RunControl, RunSettings, SimConfig, Simulation, TextRenderer};

/// Conway's Game of Life on a bounded grid, stopping once the population stagnates.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Participating side length of the square grid.
    #[arg(short = 's', long, default_value_t = DEFAULT_SIDE_LENGTH)]
    size: usize,

    /// Fraction of cells alive at generation 0, within [0, 1].
    #[arg(short = 'f', long, default_value_t = DEFAULT_INITIAL_FRACTION)]
    fraction: f64,

    /// Redraw every N generations.
    #[arg(short = 'c', long, default_value_t = DEFAULT_DISPLAY_CADENCE)]
    cadence: u32,

    /// Longest oscillator period recognized by the stability check.
    #[arg(long, default_value_t = DEFAULT_MAX_PERIOD)]
    max_period: usize,

    /// Consecutive matching generations needed to declare stability.
    #[arg(long, default_value_t = DEFAULT_STABILITY_THRESHOLD)]
    threshold: u32,

    /// Seed for the random initial population.
    #[arg(long)]
    seed: Option<u64>,

    /// Start from a named pattern instead of a random fill
    /// (glider, blinker, toad, beacon, block, r-pentomino).
    #[arg(short = 'p', long, conflicts_with_all = ["fraction", "seed"])]
    pattern: Option<String>,

    /// Milliseconds to wait between generations.
    #[arg(long, default_value_t = 50)]
    delay_ms: u64,

    /// Stop after this many generations.
    #[arg(short = 'n', long)]
    max_generations: Option<u64>,

    /// Keep running after stability has been reached.
    #[arg(long)]
    keep_running: bool,

    /// Print status lines only, without the grid.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            side_length: self.size,
            initial_fraction: self.fraction,
            display_cadence: self.cadence,
            max_period: self.max_period,
            stability_threshold: self.threshold,
            seed: self.seed,
        }
    }

    fn run_settings(&self) -> RunSettings {
        RunSettings {
            delay: Duration::from_millis(self.delay_ms),
            max_generations: self.max_generations,
            keep_running: self.keep_running,
        }
    }
}

fn build_simulation(cli: &Cli) -> anyhow::Result<Simulation> {
    let config = cli.sim_config();
    match &cli.pattern {
        Some(name) => {
            let pattern = pattern_by_name(name).ok_or_else(|| anyhow!("unknown pattern '{name}'"))?;
            let mut grid = Grid::new(config.side_length)?;
            grid.place_pattern_centered(&pattern)
                .with_context(|| format!("pattern '{name}' does not fit"))?;
            grid.commit_all();
            Ok(Simulation::from_grid(config, grid)?)
        }
        None => Ok(Simulation::new(config)?),
    }
}

/// Toggle pause on each line read from stdin; `q` stops the run.
fn spawn_control_listener(control: RunControl) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "q" | "quit" => {
                    control.stop();
                    break;
                }
                _ => control.toggle(),
            }
        }
    });
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let simulation = build_simulation(&cli).context("invalid configuration")?;

    let config = simulation.config();
    log::info!(
        "Grid {0}x{0}, initial population {1}, redraw every {2} generation(s)",
        config.side_length,
        simulation.population(),
        config.display_cadence,
    );
    let tracker = simulation.tracker();
    log::info!(
        "Stability: {} consecutive matches within a {}-generation window",
        tracker.threshold(),
        tracker.window(),
    );
    log::info!("Controls:");
    log::info!("  Enter     - Pause / Resume");
    log::info!("  q, Enter  - Quit");

    let stdout = io::stdout().lock();
    let renderer = if cli.quiet {
        TextRenderer::status_only(stdout)
    } else {
        TextRenderer::new(stdout)
    };

    let mut app = App::new(simulation, renderer, cli.run_settings());
    spawn_control_listener(app.control());
    let summary = app.run()?;

    match summary.stability_onset {
        Some(onset) => log::info!(
            "Finished at generation {} with {} live cells (stable since generation {onset})",
            summary.generations,
            summary.population,
        ),
        None => log::info!(
            "Finished at generation {} with {} live cells",
            summary.generations,
            summary.population,
        ),
    }
    Ok(())
}
