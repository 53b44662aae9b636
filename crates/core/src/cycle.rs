//! Cycle processor - detect, promote, detonate, eliminate, fall, refill, repeat
//!
//! A processor borrows the engine's grid and generator for the duration of one
//! player action and accumulates the rounds it resolves. The combo depth lives
//! here, so it starts at zero for every action.

use log::trace;

use crate::classifier::upgrade;
use crate::detonation::{expand, Marks};
use crate::error::EngineError;
use crate::generator::TileGenerator;
use crate::gravity::collapse;
use crate::grid::Grid;
use crate::matcher::{detect_all, Match};
use crate::scoring::{combo_multiplier, score_match};
use crate::sequence::{EliminationStep, FallStep, PlacedTile, RemovedTile, Round};
use crate::types::{Special, MAX_CASCADE_ROUNDS};

pub struct CycleProcessor<'a> {
    grid: &'a mut Grid,
    generator: &'a mut TileGenerator,
    combo: u32,
    rounds: Vec<Round>,
    total: u32,
}

impl<'a> CycleProcessor<'a> {
    pub fn new(grid: &'a mut Grid, generator: &'a mut TileGenerator) -> Self {
        Self {
            grid,
            generator,
            combo: 0,
            rounds: Vec::new(),
            total: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        self.grid
    }

    /// Current cascade depth
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Resolve a round whose cells were marked by a detonation rather than a match
    ///
    /// Used for special pairs, rainbow swaps and props. The round scores nothing
    /// and counts as one cascade level.
    pub fn resolve_marked(&mut self, marks: Marks, transforms: Vec<PlacedTile>) {
        if marks.is_empty() {
            return;
        }
        self.push_round(marks, Vec::new(), transforms, 0);
    }

    /// Run match rounds until the grid is quiet
    ///
    /// With `promote_first`, promotions are applied in the first round only.
    pub fn cascade(&mut self, promote_first: bool) -> Result<(), EngineError> {
        let mut first = promote_first;
        let mut resolved = 0u32;

        loop {
            let matches = detect_all(self.grid);
            if matches.is_empty() {
                break;
            }
            resolved += 1;
            if resolved > MAX_CASCADE_ROUNDS {
                return Err(EngineError::CascadeOverflow {
                    rounds: MAX_CASCADE_ROUNDS,
                });
            }

            let mut marks = Marks::new(self.grid.size());
            let promotions = if first {
                self.promote(&matches, &mut marks)
            } else {
                Vec::new()
            };

            let score = matches
                .iter()
                .map(|m| score_match(m, self.combo).total)
                .fold(0u32, u32::saturating_add);

            for m in &matches {
                for &p in &m.cells {
                    marks.mark(self.grid, p);
                }
            }
            expand(self.grid, &mut marks);

            trace!(
                "round {}: {} matches, {} promotions, score {}",
                self.rounds.len(),
                matches.len(),
                promotions.len(),
                score
            );
            self.push_round(marks, promotions, Vec::new(), score);
            first = false;
        }

        Ok(())
    }

    /// Write each match's promotion onto its pivot and reserve the cell
    fn promote(&mut self, matches: &[Match], marks: &mut Marks) -> Vec<PlacedTile> {
        let mut promotions = Vec::new();
        for m in matches.iter().filter(|m| m.promotion != Special::None) {
            let Some(tile) = self.grid.tile(m.pivot) else {
                continue;
            };
            let placed = tile.with_special(upgrade(tile.special, m.promotion));
            self.grid.set(m.pivot, Some(placed));
            marks.reserve(m.pivot);
            promotions.push(PlacedTile {
                pos: m.pivot,
                tile: placed,
            });
        }
        promotions
    }

    fn push_round(
        &mut self,
        mut marks: Marks,
        promotions: Vec<PlacedTile>,
        transforms: Vec<PlacedTile>,
        score: u32,
    ) {
        let removed: Vec<RemovedTile> = marks
            .matched()
            .into_iter()
            .filter_map(|pos| self.grid.take(pos).map(|tile| RemovedTile { pos, tile }))
            .collect();

        let moves = collapse(self.grid);
        let spawned = self.generator.fill_empties(self.grid);

        self.rounds.push(Round {
            elimination: EliminationStep {
                removed,
                effects: marks.take_effects(),
                promotions,
                transforms,
            },
            fall: FallStep { moves, spawned },
            score,
            combo: combo_multiplier(self.combo),
        });
        self.total = self.total.saturating_add(score);
        self.combo += 1;
    }

    /// Rounds resolved so far and their summed score
    pub fn finish(self) -> (Vec<Round>, u32) {
        (self.rounds, self.total)
    }
}
