//! Deadlock detection and reshuffling
//!
//! Each attempt permutes the tiles already on the grid (Fisher-Yates), then
//! walks the cells in row-major order and places the first remaining tile of
//! the permutation that completes no run there. An attempt is accepted when the
//! result has no match and at least one legal swap. The multiset of tiles,
//! specials included, is preserved.

use log::{debug, warn};

use crate::error::EngineError;
use crate::grid::Grid;
use crate::matcher::{completes_run, detect_all, has_any_legal_move};
use crate::rng::SimpleRng;
use crate::types::{Pos, Tile};

/// Attempts after which a reshuffle is worth a warning
const SLOW_RESHUFFLE: u32 = 100;

/// True when the grid has no match and no productive swap
pub fn is_deadlocked(grid: &Grid) -> bool {
    detect_all(grid).is_empty() && !has_any_legal_move(grid)
}

/// One arrangement of `pool` over `slots`, avoiding runs where the pool allows
fn arrange(grid: &Grid, slots: &[Pos], mut pool: Vec<Tile>) -> Grid {
    let mut candidate = Grid::new(grid.size());
    for &pos in slots {
        let pick = pool
            .iter()
            .position(|t| match t.match_color() {
                Some(color) => !completes_run(&candidate, pos, color),
                None => true,
            })
            .unwrap_or(0);
        if pick < pool.len() {
            candidate.set(pos, Some(pool.remove(pick)));
        }
    }
    candidate
}

/// Permute the grid's tiles until it is quiet and playable
///
/// Returns the number of attempts used.
pub fn reshuffle(
    grid: &mut Grid,
    rng: &mut SimpleRng,
    max_attempts: u32,
) -> Result<u32, EngineError> {
    let slots: Vec<Pos> = grid.positions().filter(|&p| grid.tile(p).is_some()).collect();
    let mut pool: Vec<Tile> = slots.iter().filter_map(|&p| grid.tile(p)).collect();

    for attempt in 1..=max_attempts {
        rng.shuffle(&mut pool);
        let candidate = arrange(grid, &slots, pool.clone());
        if detect_all(&candidate).is_empty() && has_any_legal_move(&candidate) {
            if attempt >= SLOW_RESHUFFLE {
                warn!("reshuffle needed {} attempts", attempt);
            } else {
                debug!("reshuffled in {} attempt(s)", attempt);
            }
            *grid = candidate;
            return Ok(attempt);
        }
    }

    Err(EngineError::ReshuffleExhausted {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Special;

    fn checkerboard(size: usize) -> Grid {
        let mut grid = Grid::new(size);
        for p in grid.positions().collect::<Vec<_>>() {
            grid.set(p, Some(Tile::gem(((p.row + p.col) % 2) as u8)));
        }
        grid
    }

    fn color_counts(grid: &Grid) -> Vec<usize> {
        (0..8).map(|c| grid.positions_of(c).len()).collect()
    }

    #[test]
    fn deadlock_detection() {
        let diagonal = Grid::parse(&["ABCA", "BCAB", "CABC", "ABCA"]).unwrap();
        assert!(is_deadlocked(&diagonal));
        // Two colors always leave a swap that lines up three.
        assert!(!is_deadlocked(&checkerboard(8)));
        assert!(!is_deadlocked(&Grid::parse(&["AABA", "CDCD", "DCDC", "CDCD"]).unwrap()));
    }

    #[test]
    fn reshuffle_two_colors_into_playable_board() {
        let mut grid = checkerboard(8);
        let counts = color_counts(&grid);
        let mut rng = SimpleRng::new(2024);

        let attempts = reshuffle(&mut grid, &mut rng, 10_000).unwrap();
        assert!(attempts >= 1);
        assert!(detect_all(&grid).is_empty());
        assert!(has_any_legal_move(&grid));
        assert_eq!(color_counts(&grid), counts);
    }

    #[test]
    fn specials_survive_reshuffle() {
        let mut grid = checkerboard(6);
        grid.set(Pos::new(0, 0), Some(Tile::gem(0).with_special(Special::Diamond)));
        let mut rng = SimpleRng::new(7);
        reshuffle(&mut grid, &mut rng, 10_000).unwrap();

        let diamonds = grid
            .positions()
            .filter(|&p| grid.tile(p).map(|t| t.special) == Some(Special::Diamond))
            .count();
        assert_eq!(diamonds, 1);
    }

    #[test]
    fn impossible_layout_exhausts_budget() {
        // A single color can never be arranged without runs.
        let mut grid = Grid::parse(&["AAAA", "AAAA", "AAAA", "AAAA"]).unwrap();
        let before = grid.clone();
        let mut rng = SimpleRng::new(1);
        assert_eq!(
            reshuffle(&mut grid, &mut rng, 5),
            Err(EngineError::ReshuffleExhausted { attempts: 5 })
        );
        assert_eq!(grid, before);
    }
}
