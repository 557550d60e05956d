use crate::error::{Result, SimError};

/// Default participating side length.
pub const DEFAULT_SIDE_LENGTH: usize = 100;

/// Default fraction of participating cells seeded alive.
pub const DEFAULT_INITIAL_FRACTION: f64 = 0.5;

/// Default number of generations between redraws.
pub const DEFAULT_DISPLAY_CADENCE: u32 = 1;

/// Longest oscillator period the stability tracker can recognize.
pub const DEFAULT_MAX_PERIOD: usize = 20;

/// Consecutive matching generations required before the grid counts as stagnant.
pub const DEFAULT_STABILITY_THRESHOLD: u32 = 100;

/// Settings for a single simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Participating side length (the border is added on top of this).
    pub side_length: usize,
    /// Fraction of participating cells alive at generation 0.
    pub initial_fraction: f64,
    /// Redraw every this many generations. Not consumed by the engine.
    pub display_cadence: u32,
    /// Size of the population history window.
    pub max_period: usize,
    /// Consecutive matches needed to flag stability.
    pub stability_threshold: u32,
    /// Seed for the initial fill; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            side_length: DEFAULT_SIDE_LENGTH,
            initial_fraction: DEFAULT_INITIAL_FRACTION,
            display_cadence: DEFAULT_DISPLAY_CADENCE,
            max_period: DEFAULT_MAX_PERIOD,
            stability_threshold: DEFAULT_STABILITY_THRESHOLD,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Reject out-of-range settings. Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.side_length == 0 {
            return Err(SimError::InvalidSideLength(self.side_length));
        }
        validate_fraction(self.initial_fraction)?;
        if self.display_cadence == 0 {
            return Err(SimError::InvalidCadence(self.display_cadence));
        }
        if self.max_period == 0 {
            return Err(SimError::InvalidWindow(self.max_period));
        }
        if self.stability_threshold == 0 {
            return Err(SimError::InvalidThreshold(self.stability_threshold));
        }
        Ok(())
    }
}

pub(crate) fn validate_fraction(fraction: f64) -> Result<()> {
    if fraction.is_finite() && (0.0..=1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(SimError::InvalidFraction(fraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert_eq!(config.side_length, 100);
        assert!((config.initial_fraction - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.display_cadence, 1);
        assert_eq!(config.max_period, 20);
        assert_eq!(config.stability_threshold, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_side_rejected() {
        let config = SimConfig {
            side_length: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidSideLength(0))
        ));
    }

    #[test]
    fn test_fraction_out_of_range_rejected() {
        for bad in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            let config = SimConfig {
                initial_fraction: bad,
                ..SimConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(SimError::InvalidFraction(_))),
                "fraction {bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_fraction_bounds_inclusive() {
        assert!(validate_fraction(0.0).is_ok());
        assert!(validate_fraction(1.0).is_ok());
    }

    #[test]
    fn test_zero_cadence_window_threshold_rejected() {
        let base = SimConfig::default();
        let cadence = SimConfig { display_cadence: 0, ..base.clone() };
        let window = SimConfig { max_period: 0, ..base.clone() };
        let threshold = SimConfig { stability_threshold: 0, ..base };
        assert!(matches!(cadence.validate(), Err(SimError::InvalidCadence(0))));
        assert!(matches!(window.validate(), Err(SimError::InvalidWindow(0))));
        assert!(matches!(threshold.validate(), Err(SimError::InvalidThreshold(0))));
    }
}
