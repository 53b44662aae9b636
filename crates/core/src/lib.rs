//! Core engine module - pure, deterministic, and testable
//!
//! This crate contains every rule of the tile-matching game: match detection,
//! special-tile promotion and detonation, gravity, refill, scoring and deadlock
//! reshuffling. It has **no dependencies** on rendering, networking, or I/O:
//!
//! - **Deterministic**: Same seed and actions produce identical animation sequences
//! - **Testable**: Every component is a small value-typed module with unit tests
//! - **Portable**: A renderer replays the returned sequences without engine access
//!
//! # Module Structure
//!
//! - [`grid`]: NxN row-major board of optional tiles
//! - [`matcher`]: run detection, L/T merging, swap prediction, legal-move search
//! - [`classifier`]: match shape to special promotion, upgrade rules
//! - [`detonation`]: affected cells per special and per special pair, chain closure
//! - [`gravity`]: column collapse
//! - [`generator`]: refill colors that never complete a run
//! - [`scoring`]: points per match and cascade multiplier
//! - [`cycle`]: detect → promote → detonate → eliminate → fall → refill loop
//! - [`swap`] / [`props`]: player actions
//! - [`reshuffle`]: deadlock detection and repair
//! - [`engine`]: the façade owning grid, RNG, score and move counter
//!
//! # Example
//!
//! ```
//! use gemfall_core::Engine;
//!
//! let mut engine = Engine::new(8, 12345).unwrap();
//! let (from, to) = engine.find_legal_move().unwrap();
//!
//! let seq = engine.swap(from, to).unwrap();
//! assert!(seq.succeeded());
//! assert!(!seq.rounds.is_empty());
//! assert_eq!(engine.current_score(), seq.score_delta);
//! assert!(engine.has_any_legal_move());
//! ```
//!
//! # Logging
//!
//! Diagnostics go through the `log` facade: `debug!` for actions and
//! reshuffles, `trace!` per cascade round, `warn!` when refill has no safe color
//! or a reshuffle is slow. Nothing is printed unless the host installs a logger.

pub mod classifier;
pub mod config;
pub mod cycle;
pub mod detonation;
pub mod engine;
pub mod error;
pub mod generator;
pub mod gravity;
pub mod grid;
pub mod matcher;
pub mod props;
pub mod reshuffle;
pub mod rng;
pub mod scoring;
pub mod sequence;
pub mod snapshot;
pub mod swap;

pub use gemfall_types as types;

// Re-export commonly used types for convenience
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, GridParseError};
pub use generator::TileGenerator;
pub use grid::Grid;
pub use matcher::{detect_all, detect_at, find_legal_move, has_any_legal_move, Match};
pub use rng::SimpleRng;
pub use scoring::{score_match, ScoreResult};
pub use sequence::{
    AnimationSequence, Effect, EliminationStep, FallMove, FallStep, NewTile, PlacedTile,
    RemovedTile, Round, ShuffleStep, SwapStep,
};
pub use snapshot::GridSnapshot;
pub use swap::SwapPath;
