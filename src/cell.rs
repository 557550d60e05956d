/// A single automaton unit.
///
/// The visible state only changes through [`Cell::commit`]; the transition rule
/// writes into the pending slot so a whole generation can be evaluated against
/// the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    row: usize,
    col: usize,
    state: bool,
    pending: bool,
    border: bool,
}

impl Cell {
    /// Create a dead cell at a fixed matrix position.
    pub fn new(row: usize, col: usize, border: bool) -> Self {
        Self {
            row,
            col,
            state: false,
            pending: false,
            border,
        }
    }

    /// Record the next state. Has no visible effect until [`Cell::commit`].
    ///
    /// Border cells never accept a live pending value.
    pub fn set_pending(&mut self, alive: bool) {
        assert!(
            !(self.border && alive),
            "border cell ({}, {}) must stay dead",
            self.row,
            self.col
        );
        self.pending = alive;
    }

    /// Copy the pending value into the current state.
    pub fn commit(&mut self) {
        self.state = self.pending;
    }

    pub fn is_alive(&self) -> bool {
        self.state
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn is_border(&self) -> bool {
        self.border
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }
}
