use crate::core::EngineConfig;
use crate::types::{DEFAULT_COLOR_COUNT, DEFAULT_GRID_SIZE, MAX_SHUFFLE_ATTEMPTS};

/// Moves played by the autoplay driver when none is given
pub const DEFAULT_AUTOPLAY_MOVES: u32 = 50;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub size: usize,
    pub colors: u8,
    pub seed: u64,
    pub max_shuffle_attempts: u32,
    /// Autoplay length
    pub moves: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            colors: DEFAULT_COLOR_COUNT,
            seed: 0,
            max_shuffle_attempts: MAX_SHUFFLE_ATTEMPTS,
            moves: DEFAULT_AUTOPLAY_MOVES,
        }
    }
}

impl RunConfig {
    /// Read `GEMFALL_SIZE`, `GEMFALL_COLORS`, `GEMFALL_SEED` and `GEMFALL_MAX_SHUFFLES`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    /// Absent or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let size = lookup("GEMFALL_SIZE")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.size);
        let colors = lookup("GEMFALL_COLORS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.colors);
        let seed = lookup("GEMFALL_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);
        let max_shuffle_attempts = lookup("GEMFALL_MAX_SHUFFLES")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_shuffle_attempts);

        Self {
            size,
            colors,
            seed,
            max_shuffle_attempts,
            moves: defaults.moves,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            size: self.size,
            colors: self.colors,
            max_shuffle_attempts: self.max_shuffle_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_overrides_defaults() {
        let config = RunConfig::from_lookup(|key| match key {
            "GEMFALL_SIZE" => Some("10".to_string()),
            "GEMFALL_SEED" => Some(" 99 ".to_string()),
            "GEMFALL_COLORS" => Some("lots".to_string()),
            _ => None,
        });

        assert_eq!(config.size, 10);
        assert_eq!(config.seed, 99);
        assert_eq!(config.colors, DEFAULT_COLOR_COUNT);
        assert_eq!(config.max_shuffle_attempts, MAX_SHUFFLE_ATTEMPTS);
        assert_eq!(config.engine_config().size, 10);
    }

    #[test]
    fn empty_lookup_is_default() {
        assert_eq!(RunConfig::from_lookup(|_| None), RunConfig::default());
        assert_eq!(RunConfig::default().engine_config(), EngineConfig::default());
    }
}
