use std::collections::VecDeque;

use crate::config::{DEFAULT_MAX_PERIOD, DEFAULT_STABILITY_THRESHOLD};
use crate::error::{Result, SimError};

/// Watches live-cell counts and flags when the grid stops producing new
/// behavior.
///
/// A generation "matches" when its population equals any of the previous
/// `window` populations, which catches still lifes and oscillators with a
/// period up to `window`. Stability is declared once `threshold` generations
/// in a row have matched. This is a heuristic: a population that merely
/// revisits old counts can be misjudged as settled.
#[derive(Debug, Clone)]
pub struct StabilityTracker {
    /// Ring buffer of the most recent population counts, oldest first.
    history: VecDeque<u64>,
    window: usize,
    threshold: u32,
    generation: u64,
    consecutive: u32,
    onset: Option<u64>,
}

impl Default for StabilityTracker {
    fn default() -> Self {
        Self {
            history: VecDeque::with_capacity(DEFAULT_MAX_PERIOD),
            window: DEFAULT_MAX_PERIOD,
            threshold: DEFAULT_STABILITY_THRESHOLD,
            generation: 0,
            consecutive: 0,
            onset: None,
        }
    }
}

impl StabilityTracker {
    pub fn new(window: usize, threshold: u32) -> Result<Self> {
        if window == 0 {
            return Err(SimError::InvalidWindow(window));
        }
        if threshold == 0 {
            return Err(SimError::InvalidThreshold(threshold));
        }
        Ok(Self {
            history: VecDeque::with_capacity(window),
            window,
            threshold,
            ..Self::default()
        })
    }

    /// Record the population of the generation just computed.
    ///
    /// Returns `true` only for the generation on which stability is first
    /// reached, so callers can fire a single notification.
    pub fn record_generation(&mut self, live_count: u64) -> bool {
        let matched = self.history.contains(&live_count);

        if self.history.len() >= self.window {
            self.history.pop_front();
        }
        self.history.push_back(live_count);

        self.consecutive = if matched {
            self.consecutive.saturating_add(1)
        } else {
            0
        };
        self.generation += 1;

        if self.onset.is_none() && self.consecutive >= self.threshold {
            self.onset = Some(self.generation - u64::from(self.threshold));
            return true;
        }
        false
    }

    /// Whether stability has been reached at any point in this run.
    pub fn has_reached_stability(&self) -> bool {
        self.onset.is_some()
    }

    /// Generation at which the repeating pattern is believed to have begun.
    pub fn stability_onset_generation(&self) -> Option<u64> {
        self.onset
    }

    /// Number of generations recorded so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current run of consecutive matching generations.
    pub fn consecutive_matches(&self) -> u32 {
        self.consecutive
    }

    /// Retained population counts, oldest first.
    pub fn history(&self) -> impl Iterator<Item = u64> + '_ {
        self.history.iter().copied()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}
