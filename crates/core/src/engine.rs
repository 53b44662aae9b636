//! Engine module - the public façade
//!
//! The engine owns the grid and the RNG stream. Every action runs to completion
//! on the caller's thread and returns a self-contained [`AnimationSequence`].
//! After an accepted action the grid is full, quiet and playable: when no
//! legal swap remains it is reshuffled and the sequence ends with a shuffle step.

use log::debug;

use crate::config::EngineConfig;
use crate::cycle::CycleProcessor;
use crate::error::EngineError;
use crate::generator::TileGenerator;
use crate::gravity::collapse;
use crate::grid::Grid;
use crate::matcher::{detect_all, find_legal_move, has_any_legal_move};
use crate::props;
use crate::reshuffle::{is_deadlocked, reshuffle};
use crate::sequence::{AnimationSequence, EliminationStep, FallStep, Round, ShuffleStep};
use crate::snapshot::GridSnapshot;
use crate::swap::resolve_swap;
use crate::types::{PlayerAction, Pos};

/// Match-3 engine state
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    grid: Grid,
    generator: TileGenerator,
    seed: u64,
    score: u32,
    /// Accepted player actions
    moves: u32,
}

impl Engine {
    /// Create an engine with the default palette on a `size` x `size` grid
    pub fn new(size: usize, seed: u64) -> Result<Self, EngineError> {
        Self::initialize(
            EngineConfig {
                size,
                ..EngineConfig::default()
            },
            seed,
        )
    }

    /// Fill a fresh grid that is quiet and has at least one legal swap
    pub fn initialize(config: EngineConfig, seed: u64) -> Result<Self, EngineError> {
        config.validate()?;

        let mut generator = TileGenerator::new(seed, config.colors);
        let mut grid = Grid::new(config.size);
        generator.fill_initial(&mut grid);
        if !detect_all(&grid).is_empty() || !has_any_legal_move(&grid) {
            reshuffle(&mut grid, generator.rng_mut(), config.max_shuffle_attempts)?;
        }

        debug!(
            "engine initialized: {}x{}, {} colors, seed {}",
            config.size, config.size, config.colors, seed
        );
        Ok(Self {
            config,
            grid,
            generator,
            seed,
            score: 0,
            moves: 0,
        })
    }

    /// Adopt an existing grid as-is
    ///
    /// The grid's side length overrides `config.size`. Nothing is resolved
    /// until [`settle`](Self::settle) or the first action.
    pub fn with_grid(config: EngineConfig, grid: Grid, seed: u64) -> Result<Self, EngineError> {
        let config = EngineConfig {
            size: grid.size(),
            ..config
        };
        config.validate()?;

        if let Some(color) = grid
            .cells()
            .iter()
            .flatten()
            .filter_map(|t| t.match_color())
            .find(|&c| c >= config.colors)
        {
            return Err(EngineError::ColorOutOfPalette {
                color,
                colors: config.colors,
            });
        }

        Ok(Self {
            config,
            grid,
            generator: TileGenerator::new(seed, config.colors),
            seed,
            score: 0,
            moves: 0,
        })
    }

    /// Bring an adopted grid to rest: fill holes, resolve standing matches
    /// (without promotions) and reshuffle a deadlock
    ///
    /// Points scored here count toward the score but not as a move.
    pub fn settle(&mut self) -> Result<AnimationSequence, EngineError> {
        let mut seq = AnimationSequence::empty();

        if !self.grid.is_full() {
            let moves = collapse(&mut self.grid);
            let spawned = self.generator.fill_empties(&mut self.grid);
            seq.rounds.push(Round {
                elimination: EliminationStep::default(),
                fall: FallStep { moves, spawned },
                score: 0,
                combo: 1,
            });
        }

        let mut cycle = CycleProcessor::new(&mut self.grid, &mut self.generator);
        cycle.cascade(false)?;
        let (rounds, score_delta) = cycle.finish();
        seq.rounds.extend(rounds);
        seq.score_delta = score_delta;
        self.score = self.score.saturating_add(score_delta);

        self.reshuffle_if_deadlocked(&mut seq)?;
        Ok(seq)
    }

    /// Swap two adjacent tiles
    pub fn swap(&mut self, from: Pos, to: Pos) -> Result<AnimationSequence, EngineError> {
        let seq = resolve_swap(&mut self.grid, &mut self.generator, from, to, false)?;
        self.finish_action(seq)
    }

    /// Prop: destroy the tile at `at`
    pub fn use_hit(&mut self, at: Pos) -> Result<AnimationSequence, EngineError> {
        let seq = props::hit(&mut self.grid, &mut self.generator, at)?;
        self.finish_action(seq)
    }

    /// Prop: swap two adjacent tiles even when nothing lines up
    pub fn use_force_swap(
        &mut self,
        from: Pos,
        to: Pos,
    ) -> Result<AnimationSequence, EngineError> {
        let seq = resolve_swap(&mut self.grid, &mut self.generator, from, to, true)?;
        self.finish_action(seq)
    }

    /// Prop: clear every tile of the color at `at`
    pub fn use_type_clear(&mut self, at: Pos) -> Result<AnimationSequence, EngineError> {
        let seq = props::type_clear(&mut self.grid, &mut self.generator, at)?;
        self.finish_action(seq)
    }

    /// Apply a player action
    pub fn apply_action(
        &mut self,
        action: PlayerAction,
    ) -> Result<AnimationSequence, EngineError> {
        match action {
            PlayerAction::Swap { from, to } => self.swap(from, to),
            PlayerAction::Hit { at } => self.use_hit(at),
            PlayerAction::ForceSwap { from, to } => self.use_force_swap(from, to),
            PlayerAction::TypeClear { at } => self.use_type_clear(at),
        }
    }

    fn finish_action(
        &mut self,
        mut seq: AnimationSequence,
    ) -> Result<AnimationSequence, EngineError> {
        if !seq.succeeded() {
            return Ok(seq);
        }
        self.score = self.score.saturating_add(seq.score_delta);
        self.moves += 1;
        self.reshuffle_if_deadlocked(&mut seq)?;
        Ok(seq)
    }

    fn reshuffle_if_deadlocked(
        &mut self,
        seq: &mut AnimationSequence,
    ) -> Result<(), EngineError> {
        if !is_deadlocked(&self.grid) {
            return Ok(());
        }
        reshuffle(
            &mut self.grid,
            self.generator.rng_mut(),
            self.config.max_shuffle_attempts,
        )?;
        seq.shuffle = Some(ShuffleStep {
            grid: self.grid.clone(),
        });
        Ok(())
    }

    pub fn current_score(&self) -> u32 {
        self.score
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn has_any_legal_move(&self) -> bool {
        has_any_legal_move(&self.grid)
    }

    /// First productive swap in scan order
    pub fn find_legal_move(&self) -> Option<(Pos, Pos)> {
        find_legal_move(&self.grid)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn snapshot_into(&self, out: &mut GridSnapshot) {
        out.write_grid(&self.grid);
        out.colors = self.config.colors;
        out.seed = self.seed;
        out.score = self.score;
        out.moves = self.moves;
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let mut s = GridSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
