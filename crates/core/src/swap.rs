//! Swap handler
//!
//! Validates a swap request, picks the resolution path from the two tiles
//! involved and runs it to a quiet grid. Legality is decided before the grid
//! is touched, so a rejected or bounced swap leaves it unchanged.

use log::debug;

use crate::cycle::CycleProcessor;
use crate::detonation::{detonate_rainbow, pair_blast, Marks};
use crate::error::EngineError;
use crate::generator::TileGenerator;
use crate::grid::Grid;
use crate::matcher::swap_would_match;
use crate::sequence::{AnimationSequence, SwapStep};
use crate::types::{Pos, Special, Tile};

/// How a swap resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapPath {
    /// Plain exchange that must line up a run
    Ordinary,
    /// Two specials detonate together
    SpecialPair,
    /// Rainbow against an ordinary tile clears that tile's color
    RainbowWildcard,
}

impl SwapPath {
    pub fn classify(a: Tile, b: Tile) -> Self {
        let rainbow = |t: Tile| t.special == Special::Rainbow;
        match (a.special.is_special(), b.special.is_special()) {
            (true, true) => SwapPath::SpecialPair,
            _ if rainbow(a) || rainbow(b) => SwapPath::RainbowWildcard,
            _ => SwapPath::Ordinary,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwapPath::Ordinary => "ordinary",
            SwapPath::SpecialPair => "specialPair",
            SwapPath::RainbowWildcard => "rainbowWildcard",
        }
    }
}

/// Resolve a swap of `a` and `b`; with `force` an ordinary swap is kept even if
/// it matches nothing
pub fn resolve_swap(
    grid: &mut Grid,
    generator: &mut TileGenerator,
    a: Pos,
    b: Pos,
    force: bool,
) -> Result<AnimationSequence, EngineError> {
    let (Some(ta), Some(tb)) = (grid.tile(a), grid.tile(b)) else {
        return Ok(AnimationSequence::rejected_swap(a, b));
    };
    if !a.is_adjacent(b) {
        return Ok(AnimationSequence::rejected_swap(a, b));
    }

    let path = SwapPath::classify(ta, tb);
    if path == SwapPath::Ordinary && !force && !swap_would_match(grid, a, b) {
        return Ok(AnimationSequence::rejected_swap(a, b));
    }

    debug!(
        "swap ({}, {}) <-> ({}, {}) via {}{}",
        a.row,
        a.col,
        b.row,
        b.col,
        path.as_str(),
        if force { " (forced)" } else { "" }
    );
    grid.swap(a, b);

    let mut cycle = CycleProcessor::new(grid, generator);
    match path {
        SwapPath::Ordinary => cycle.cascade(true)?,
        SwapPath::SpecialPair => {
            let mut marks = Marks::new(cycle.grid().size());
            let transforms = pair_blast(cycle.grid_mut(), &mut marks, a, b);
            cycle.resolve_marked(marks, transforms);
            cycle.cascade(false)?;
        }
        SwapPath::RainbowWildcard => {
            // After the exchange `ta` sits at `b` and `tb` at `a`.
            let (rainbow, color) = if ta.special == Special::Rainbow {
                (b, tb.match_color())
            } else {
                (a, ta.match_color())
            };
            let mut marks = Marks::new(cycle.grid().size());
            if let Some(color) = color {
                detonate_rainbow(cycle.grid(), &mut marks, rainbow, color);
            }
            cycle.resolve_marked(marks, Vec::new());
            cycle.cascade(false)?;
        }
    }

    let (rounds, score_delta) = cycle.finish();
    Ok(AnimationSequence {
        swap: Some(SwapStep {
            from: a,
            to: b,
            success: true,
        }),
        rounds,
        shuffle: None,
        score_delta,
    })
}
