use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SimConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::stability::StabilityTracker;

/// Advance every participating cell by one generation.
///
/// Runs in two phases: all pending states are computed from the committed
/// state of the previous generation, then the whole grid is committed. No cell
/// observes a neighbor's new state mid-scan.
pub fn advance_generation(grid: &mut Grid) {
    let side = grid.side();
    for row in 1..=side {
        for col in 1..=side {
            let neighbors = grid.count_live_neighbors(row, col);
            let next = match neighbors {
                3 => true,
                2 => grid.is_alive(row, col),
                _ => false,
            };
            grid.set_pending(row, col, next);
        }
    }
    grid.commit_all();
}

/// Outcome of a single [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub generation: u64,
    pub population: u64,
    /// Set only on the generation where stability is first reached.
    pub stabilized: bool,
}

/// One simulation run: a grid, its stability tracker and the settings it was
/// built from.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    grid: Grid,
    tracker: StabilityTracker,
    population: u64,
}

impl Simulation {
    /// Build a grid from `config`, seed it at random and commit generation 0.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let mut grid = Grid::new(config.side_length)?;
        match config.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                grid.randomize_population_with(config.initial_fraction, &mut rng)?;
            }
            None => {
                grid.randomize_population(config.initial_fraction)?;
            }
        }
        grid.commit_all();
        Self::from_grid(config, grid)
    }

    /// Start a run from an already committed grid (e.g. a placed pattern).
    ///
    /// `config.side_length` is replaced by the grid's own side length.
    pub fn from_grid(mut config: SimConfig, grid: Grid) -> Result<Self> {
        config.side_length = grid.side();
        config.validate()?;
        let tracker = StabilityTracker::new(config.max_period, config.stability_threshold)?;
        let population = grid.population();
        Ok(Self {
            config,
            grid,
            tracker,
            population,
        })
    }

    /// Compute the next generation and feed its population to the tracker.
    pub fn step(&mut self) -> StepReport {
        advance_generation(&mut self.grid);
        self.population = self.grid.population();
        let stabilized = self.tracker.record_generation(self.population);
        log::debug!(
            "generation {}: {} live cells",
            self.tracker.generation(),
            self.population
        );
        StepReport {
            generation: self.tracker.generation(),
            population: self.population,
            stabilized,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Committed grid state. Never exposes a half-computed generation.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tracker(&self) -> &StabilityTracker {
        &self.tracker
    }

    pub fn generation(&self) -> u64 {
        self.tracker.generation()
    }

    /// Live participating cells in the current generation.
    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn is_stable(&self) -> bool {
        self.tracker.has_reached_stability()
    }

    pub fn stability_onset(&self) -> Option<u64> {
        self.tracker.stability_onset_generation()
    }
}
