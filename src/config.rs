use crate::constants::{ACCEPTABLE_ROOT_WINDOW_SIZE, EPOCH_UNIT_SECONDS, MAX_CLOCK_GAP_SECONDS};
use crate::errors::ConfigError;

/// Tolerance parameters shared by the root tracker and the validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RlnConfig {
    pub epoch_unit_seconds: u64,
    pub max_clock_gap_seconds: u64,
    pub root_window_size: usize,
}

impl Default for RlnConfig {
    fn default() -> Self {
        Self {
            epoch_unit_seconds: EPOCH_UNIT_SECONDS,
            max_clock_gap_seconds: MAX_CLOCK_GAP_SECONDS,
            root_window_size: ACCEPTABLE_ROOT_WINDOW_SIZE,
        }
    }
}

impl RlnConfig {
    /// Check the parameters before anything is built from them.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.epoch_unit_seconds == 0 {
            return Err(ConfigError::ZeroEpochUnit);
        }
        if self.root_window_size == 0 {
            return Err(ConfigError::EmptyRootWindow);
        }
        Ok(())
    }

    /// Clock-gap tolerance expressed in whole epochs (rounded down).
    #[must_use]
    pub const fn max_epoch_gap(&self) -> u64 {
        if self.epoch_unit_seconds == 0 {
            return 0;
        }
        self.max_clock_gap_seconds / self.epoch_unit_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_EPOCH_GAP;

    #[test]
    fn default_gap_matches_constant() {
        let cfg = RlnConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_epoch_gap(), MAX_EPOCH_GAP);
        assert_eq!(MAX_EPOCH_GAP, 2);
    }

    #[test]
    fn gap_rounds_down() {
        let cfg = RlnConfig { epoch_unit_seconds: 7, ..RlnConfig::default() };
        assert_eq!(cfg.max_epoch_gap(), 2);
        let cfg = RlnConfig { epoch_unit_seconds: 30, ..RlnConfig::default() };
        assert_eq!(cfg.max_epoch_gap(), 0);
    }

    #[test]
    fn degenerate_values_rejected() {
        let cfg = RlnConfig { epoch_unit_seconds: 0, ..RlnConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroEpochUnit));
        let cfg = RlnConfig { root_window_size: 0, ..RlnConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyRootWindow));
    }
}
