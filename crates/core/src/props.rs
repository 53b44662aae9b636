//! Props - single-target power-ups
//!
//! A prop on an empty, wildcard or off-grid cell is rejected with an empty
//! sequence. Stock counting belongs to the caller.

use log::debug;

use crate::cycle::CycleProcessor;
use crate::detonation::{expand, Marks};
use crate::error::EngineError;
use crate::generator::TileGenerator;
use crate::grid::Grid;
use crate::sequence::AnimationSequence;
use crate::types::{EffectKind, Pos, Tile};

/// Tile a prop may target
fn target(grid: &Grid, at: Pos) -> Option<Tile> {
    grid.tile(at).filter(|t| !t.is_wildcard())
}

fn run(
    grid: &mut Grid,
    generator: &mut TileGenerator,
    marks: Marks,
) -> Result<AnimationSequence, EngineError> {
    let mut cycle = CycleProcessor::new(grid, generator);
    cycle.resolve_marked(marks, Vec::new());
    cycle.cascade(false)?;
    let (rounds, score_delta) = cycle.finish();
    Ok(AnimationSequence {
        rounds,
        score_delta,
        ..AnimationSequence::default()
    })
}

/// Destroy the tile at `at`; a special there detonates
pub fn hit(
    grid: &mut Grid,
    generator: &mut TileGenerator,
    at: Pos,
) -> Result<AnimationSequence, EngineError> {
    if target(grid, at).is_none() {
        return Ok(AnimationSequence::empty());
    }
    debug!("hit ({}, {})", at.row, at.col);

    let mut marks = Marks::new(grid.size());
    marks.mark(grid, at);
    expand(grid, &mut marks);
    run(grid, generator, marks)
}

/// Eliminate every tile sharing the color at `at`
pub fn type_clear(
    grid: &mut Grid,
    generator: &mut TileGenerator,
    at: Pos,
) -> Result<AnimationSequence, EngineError> {
    let Some(color) = target(grid, at).and_then(|t| t.match_color()) else {
        return Ok(AnimationSequence::empty());
    };
    debug!("type clear ({}, {}) color {}", at.row, at.col, color);

    let mut marks = Marks::new(grid.size());
    marks.push_effect(EffectKind::RainbowFlash, at);
    for p in grid.positions_of(color) {
        marks.mark(grid, p);
    }
    expand(grid, &mut marks);
    run(grid, generator, marks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Special;

    fn grid() -> Grid {
        Grid::parse(&["ABCD", "BCDA", "CDAB", "DABC"]).unwrap()
    }

    #[test]
    fn rejected_targets_return_empty_sequences() {
        let mut g = grid();
        g.set(Pos::new(1, 1), Some(Tile::rainbow()));
        g.set(Pos::new(2, 2), None);
        let before = g.clone();
        let mut generator = TileGenerator::new(1, 4);

        for at in [Pos::new(1, 1), Pos::new(2, 2), Pos::new(4, 0)] {
            assert!(hit(&mut g, &mut generator, at).unwrap().is_empty());
            assert!(type_clear(&mut g, &mut generator, at).unwrap().is_empty());
        }
        assert_eq!(g, before);
    }

    #[test]
    fn hit_removes_one_tile() {
        let mut g = grid();
        let mut generator = TileGenerator::new(1, 4);
        let seq = hit(&mut g, &mut generator, Pos::new(3, 0)).unwrap();
        assert!(seq.swap.is_none());
        assert_eq!(seq.rounds[0].elimination.removed.len(), 1);
        assert!(g.is_full());
    }

    #[test]
    fn hit_on_special_detonates() {
        let mut g = grid();
        g.set(Pos::new(1, 0), Some(Tile::gem(1).with_special(Special::LineH)));
        let mut generator = TileGenerator::new(1, 4);
        let seq = hit(&mut g, &mut generator, Pos::new(1, 0)).unwrap();
        let first = &seq.rounds[0];
        assert_eq!(first.elimination.removed.len(), 4);
        assert_eq!(first.elimination.effects[0].kind, EffectKind::LineH);
    }

    #[test]
    fn type_clear_removes_whole_color() {
        let mut g = grid();
        let mut generator = TileGenerator::new(1, 4);
        let seq = type_clear(&mut g, &mut generator, Pos::new(0, 0)).unwrap();
        let first = &seq.rounds[0];
        assert_eq!(first.elimination.removed.len(), 4);
        assert!(first.elimination.removed.iter().all(|r| r.tile == Tile::gem(0)));
        assert_eq!(first.elimination.effects[0].kind, EffectKind::RainbowFlash);
    }
}
