//! Engine configuration

use crate::error::EngineError;
use crate::types::{
    DEFAULT_COLOR_COUNT, DEFAULT_GRID_SIZE, MAX_COLOR_COUNT, MAX_GRID_SIZE, MAX_SHUFFLE_ATTEMPTS,
    MIN_COLOR_COUNT, MIN_GRID_SIZE,
};

/// Tunables for one engine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Side length of the square grid
    pub size: usize,
    /// Number of gem colors (K)
    pub colors: u8,
    /// Reshuffle attempts before giving up
    pub max_shuffle_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            colors: DEFAULT_COLOR_COUNT,
            max_shuffle_attempts: MAX_SHUFFLE_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    pub fn new(size: usize, colors: u8) -> Self {
        Self {
            size,
            colors,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.size) {
            return Err(EngineError::GridSize(self.size));
        }
        if !(MIN_COLOR_COUNT..=MAX_COLOR_COUNT).contains(&self.colors) {
            return Err(EngineError::ColorCount(self.colors));
        }
        if self.max_shuffle_attempts == 0 {
            return Err(EngineError::ShuffleBudget);
        }
        Ok(())
    }
}
