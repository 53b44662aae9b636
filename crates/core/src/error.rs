//! Error types for the engine
//!
//! Player-facing rejections (bad coordinates, non-productive swaps, props on
//! invalid targets) are not errors: they are encoded in the returned
//! [`AnimationSequence`](crate::AnimationSequence). These types cover bad
//! configuration and internal-consistency violations only.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("grid size {0} is outside the supported range 4..=16")]
    GridSize(usize),

    #[error("palette of {0} colors is outside the supported range 2..=8")]
    ColorCount(u8),

    #[error("max_shuffle_attempts must be at least 1")]
    ShuffleBudget,

    #[error("grid uses color {color} but the palette only has {colors}")]
    ColorOutOfPalette { color: u8, colors: u8 },

    #[error("no playable arrangement found after {attempts} reshuffle attempts")]
    ReshuffleExhausted { attempts: u32 },

    #[error("cascade did not settle within {rounds} rounds")]
    CascadeOverflow { rounds: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridParseError {
    #[error("grid has no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
}
