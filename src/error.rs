use thiserror::Error;

/// Errors surfaced by grid construction, seeding and rendering.
#[derive(Error, Debug)]
pub enum SimError {
    /// Participating side length must be at least 1.
    #[error("invalid side length {0}: must be a positive integer")]
    InvalidSideLength(usize),

    /// Live fraction must be a finite value in [0, 1].
    #[error("invalid initial live fraction {0}: must be within [0, 1]")]
    InvalidFraction(f64),

    /// Display cadence must be at least 1 generation.
    #[error("invalid display cadence {0}: must be a positive integer")]
    InvalidCadence(u32),

    /// Stability history window must hold at least one generation.
    #[error("invalid history window {0}: must be a positive integer")]
    InvalidWindow(usize),

    /// Stability threshold must be at least 1 generation.
    #[error("invalid stability threshold {0}: must be a positive integer")]
    InvalidThreshold(u32),

    /// A pattern cell landed outside the participating area.
    #[error("cell ({row}, {col}) is outside the participating area 1..={side}")]
    OutOfBounds { row: usize, col: usize, side: usize },

    /// Renderer output failed.
    #[error("render error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
