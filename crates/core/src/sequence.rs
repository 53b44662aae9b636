//! Animation sequence - everything a renderer needs to replay one player action
//!
//! A sequence is a plain value: the engine builds it, hands it to the caller,
//! and keeps no reference to it. Rounds are appended in resolution order and
//! never modified afterwards.

use crate::grid::Grid;
use crate::types::{EffectKind, Pos, Tile};

/// The swap attempt that opened the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    pub from: Pos,
    pub to: Pos,
    /// False for rejected and bounced swaps
    pub success: bool,
}

/// A tile removed from the grid, as it looked before removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedTile {
    pub pos: Pos,
    pub tile: Tile,
}

/// A detonation to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub kind: EffectKind,
    pub origin: Pos,
}

/// A cell whose tile was replaced in place (promotion or rainbow transform)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedTile {
    pub pos: Pos,
    pub tile: Tile,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EliminationStep {
    /// Removed tiles in row-major order
    pub removed: Vec<RemovedTile>,
    pub effects: Vec<Effect>,
    /// Cells that became specials this round, with their new tile
    pub promotions: Vec<PlacedTile>,
    /// Tiles a rainbow pair turned into specials before they detonated
    pub transforms: Vec<PlacedTile>,
}

/// One tile sliding down its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallMove {
    pub from: Pos,
    pub to: Pos,
    pub tile: Tile,
}

/// A refill tile dropped in from above the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTile {
    pub to: Pos,
    pub tile: Tile,
}

/// Moves and refills of one round; all of them animate simultaneously
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallStep {
    pub moves: Vec<FallMove>,
    pub spawned: Vec<NewTile>,
}

impl FallStep {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.spawned.is_empty()
    }
}

/// One elimination followed by one fall
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Round {
    pub elimination: EliminationStep,
    pub fall: FallStep,
    /// Points scored by this round
    pub score: u32,
    /// Cascade multiplier the round was scored with
    pub combo: u32,
}

/// Full grid after a deadlock reshuffle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleStep {
    pub grid: Grid,
}

/// Result of one player action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationSequence {
    pub swap: Option<SwapStep>,
    pub rounds: Vec<Round>,
    pub shuffle: Option<ShuffleStep>,
    /// Sum of the round scores
    pub score_delta: u32,
}

impl AnimationSequence {
    /// Sequence with no steps at all (rejected prop)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sequence carrying only a failed swap step
    pub fn rejected_swap(from: Pos, to: Pos) -> Self {
        Self {
            swap: Some(SwapStep {
                from,
                to,
                success: false,
            }),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.swap.is_none() && self.rounds.is_empty() && self.shuffle.is_none()
    }

    /// True when the action changed the grid
    pub fn succeeded(&self) -> bool {
        match self.swap {
            Some(step) => step.success,
            None => !self.rounds.is_empty(),
        }
    }

    /// Total number of tiles removed across all rounds
    pub fn removed_count(&self) -> usize {
        self.rounds.iter().map(|r| r.elimination.removed.len()).sum()
    }
}
