use rand::Rng;

use crate::cell::Cell;
use crate::config::validate_fraction;
use crate::error::{Result, SimError};

/// Total padding per axis: one dead border cell on each side of the
/// participating area.
pub const GRID_BORDER: usize = 2;

/// Offsets of the eight neighbors, relative to the top-left corner of the
/// 3x3 block centred on a cell. The centre `(1, 1)` is deliberately absent.
const NEIGHBOR_OFFSETS: [(usize, usize); 8] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 2),
    (2, 0),
    (2, 1),
    (2, 2),
];

/// Square grid padded with a one-cell ring of permanently dead border cells.
///
/// Cells live in one row-major matrix of `size * size` entries. The
/// participating cells are additionally listed, in row-major order, as indices
/// into that same matrix, so both views observe the same `Cell` values.
///
/// Coordinates are matrix coordinates: participating cells occupy
/// `1..=side` on both axes, while `0` and `side + 1` are border.
#[derive(Debug, Clone)]
pub struct Grid {
    side: usize,
    size: usize,
    cells: Vec<Cell>,
    participants: Vec<usize>,
}

impl Grid {
    /// Build an all-dead grid with `side * side` participating cells.
    pub fn new(side: usize) -> Result<Self> {
        if side == 0 {
            return Err(SimError::InvalidSideLength(side));
        }
        let size = side + GRID_BORDER;
        let mut cells = Vec::with_capacity(size * size);
        let mut participants = Vec::with_capacity(side * side);

        for row in 0..size {
            for col in 0..size {
                let border = row == 0 || col == 0 || row == size - 1 || col == size - 1;
                if !border {
                    participants.push(cells.len());
                }
                cells.push(Cell::new(row, col, border));
            }
        }

        Ok(Self {
            side,
            size,
            cells,
            participants,
        })
    }

    /// Participating side length.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Matrix side length, border included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The whole matrix as a row-major slice, border included.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The matrix one row at a time, border included.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Participating cells in row-major order.
    pub fn participants(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.participants.iter().map(move |&idx| &self.cells[idx])
    }

    /// Number of participating cells (`side * side`).
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Look up a cell without panicking on bad coordinates.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.size && col < self.size {
            self.cells.get(row * self.size + col)
        } else {
            None
        }
    }

    /// Current state of the cell at `(row, col)`. Panics when off the matrix.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.cells[self.index_of(row, col)].is_alive()
    }

    /// Record the next state of a participating cell.
    pub fn set_pending(&mut self, row: usize, col: usize, alive: bool) {
        let idx = self.participant_index(row, col);
        self.cells[idx].set_pending(alive);
    }

    /// Count live cells among the eight neighbors of a participating cell.
    ///
    /// The border ring guarantees every neighbor is inside the matrix, so no
    /// per-neighbor bounds checks are made.
    pub fn count_live_neighbors(&self, row: usize, col: usize) -> u8 {
        let top_left = self.participant_index(row, col) - self.size - 1;
        NEIGHBOR_OFFSETS
            .iter()
            .filter(|&&(dr, dc)| self.cells[top_left + dr * self.size + dc].is_alive())
            .count() as u8
    }

    /// Commit pending state into current state for every participating cell.
    pub fn commit_all(&mut self) {
        for &idx in &self.participants {
            self.cells[idx].commit();
        }
    }

    /// Count live participating cells.
    pub fn population(&self) -> u64 {
        self.participants().filter(|c| c.is_alive()).count() as u64
    }

    /// Seed `floor(fraction * side²)` distinct participating cells as pending
    /// alive using the thread RNG. Does not commit.
    pub fn randomize_population(&mut self, fraction: f64) -> Result<usize> {
        self.randomize_population_with(fraction, &mut rand::thread_rng())
    }

    /// Like [`Grid::randomize_population`] with a caller-provided RNG.
    ///
    /// Cells are drawn without replacement, so the work is bounded even for
    /// fractions close to 1.0. Every other participating cell is set pending
    /// dead. Returns the number of cells selected.
    pub fn randomize_population_with<R: Rng + ?Sized>(
        &mut self,
        fraction: f64,
        rng: &mut R,
    ) -> Result<usize> {
        validate_fraction(fraction)?;
        let total = self.participants.len();
        let amount = (live_target(fraction, total) as usize).min(total);

        for &idx in &self.participants {
            self.cells[idx].set_pending(false);
        }
        for pick in rand::seq::index::sample(rng, total, amount).into_iter() {
            let idx = self.participants[pick];
            self.cells[idx].set_pending(true);
        }
        Ok(amount)
    }

    /// Mark the cells of `pattern` pending alive, offsets taken from `origin`.
    ///
    /// Nothing is written unless every cell lands in the participating area.
    /// Does not commit.
    pub fn place_pattern(&mut self, pattern: &[(usize, usize)], origin: (usize, usize)) -> Result<()> {
        let targets: Vec<(usize, usize)> = pattern
            .iter()
            .map(|&(dr, dc)| (origin.0 + dr, origin.1 + dc))
            .collect();
        if let Some(&(row, col)) = targets.iter().find(|&&(r, c)| !self.is_participating(r, c)) {
            return Err(SimError::OutOfBounds {
                row,
                col,
                side: self.side,
            });
        }
        for (row, col) in targets {
            self.set_pending(row, col, true);
        }
        Ok(())
    }

    /// Place a pattern so its bounding box sits in the middle of the grid.
    pub fn place_pattern_centered(&mut self, pattern: &[(usize, usize)]) -> Result<()> {
        let height = pattern.iter().map(|&(r, _)| r + 1).max().unwrap_or(0);
        let width = pattern.iter().map(|&(_, c)| c + 1).max().unwrap_or(0);
        let origin = (
            1 + self.side.saturating_sub(height) / 2,
            1 + self.side.saturating_sub(width) / 2,
        );
        self.place_pattern(pattern, origin)
    }

    fn is_participating(&self, row: usize, col: usize) -> bool {
        (1..=self.side).contains(&row) && (1..=self.side).contains(&col)
    }

    fn index_of(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "({row}, {col}) is outside the {size}x{size} matrix",
            size = self.size
        );
        row * self.size + col
    }

    fn participant_index(&self, row: usize, col: usize) -> usize {
        let idx = self.index_of(row, col);
        assert!(
            !self.cells[idx].is_border(),
            "({row}, {col}) is a border cell"
        );
        idx
    }
}

/// `floor(fraction * total)`, with products that land a rounding error below
/// a whole number (0.29 * 100 = 28.999999999999996) snapped up to it.
fn live_target(fraction: f64, total: usize) -> f64 {
    let exact = fraction * total as f64;
    let nearest = exact.round();
    if (exact - nearest).abs() < 1e-9 {
        nearest
    } else {
        exact.floor()
    }
}

// ── Predefined patterns ──
// Offsets are (row, col) from the pattern's top-left corner.

/// Glider: small, moving pattern.
pub fn pattern_glider() -> Vec<(usize, usize)> {
    vec![(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)]
}

/// Blinker: period-2 oscillator, starting horizontal.
pub fn pattern_blinker() -> Vec<(usize, usize)> {
    vec![(0, 0), (0, 1), (0, 2)]
}

/// Toad: period-2 oscillator.
pub fn pattern_toad() -> Vec<(usize, usize)> {
    vec![(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)]
}

/// Beacon: period-2 oscillator made of two diagonal blocks.
pub fn pattern_beacon() -> Vec<(usize, usize)> {
    vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)]
}

/// Block: 2x2 still life.
pub fn pattern_block() -> Vec<(usize, usize)> {
    vec![(0, 0), (0, 1), (1, 0), (1, 1)]
}

/// R-pentomino: a methuselah that runs for 1103 generations on an open plane.
pub fn pattern_r_pentomino() -> Vec<(usize, usize)> {
    vec![(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)]
}

/// Look up a predefined pattern by name (case-insensitive).
pub fn pattern_by_name(name: &str) -> Option<Vec<(usize, usize)>> {
    match name.to_ascii_lowercase().as_str() {
        "glider" => Some(pattern_glider()),
        "blinker" => Some(pattern_blinker()),
        "toad" => Some(pattern_toad()),
        "beacon" => Some(pattern_beacon()),
        "block" => Some(pattern_block()),
        "r-pentomino" | "r_pentomino" | "rpentomino" => Some(pattern_r_pentomino()),
        _ => None,
    }
}
