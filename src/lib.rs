//! Conway's Game of Life on a bounded square grid.
//!
//! The grid is padded with a ring of permanently dead border cells, so the
//! neighbor scan never needs bounds checks. Each generation is computed into
//! pending state and committed in one pass. A [`StabilityTracker`] watches the
//! population and flags when the run has settled into a still or oscillating
//! pattern.

pub mod app;
pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod renderer;
pub mod simulation;
pub mod stability;

pub use app::{App, CycleOutcome, RunControl, RunSettings, RunSummary};
pub use cell::Cell;
pub use config::SimConfig;
pub use error::{Result, SimError};
pub use grid::Grid;
pub use renderer::{Frame, Renderer, TextRenderer};
pub use simulation::{advance_generation, Simulation, StepReport};
pub use stability::StabilityTracker;
