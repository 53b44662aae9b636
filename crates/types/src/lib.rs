//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine, wire adapter, renderers, tests).
//!
//! # Grid Geometry
//!
//! - Cells are addressed by [`Pos`] (`row`, `col`), row 0 at the top
//! - Gravity pulls toward the highest row index
//! - The grid is square; its side length is configurable (default 8)
//!
//! # Palette
//!
//! Ordinary tiles carry a [`Color::Gem`] index in `0..colors`. A rainbow special carries
//! [`Color::Wildcard`], which never takes part in an ordinary run.
//!
//! # Scoring Constants
//!
//! | Run length | Base |
//! |------------|------|
//! | 3 | 30 |
//! | 4 | 80 |
//! | 5 | 200 |
//! | 6+ | 300 + 50 per extra tile |
//!
//! # Examples
//!
//! ```
//! use gemfall_types::{Color, Pos, Special, Tile};
//!
//! let tile = Tile::gem(2).with_special(Special::LineH);
//! assert_eq!(tile.match_color(), Some(2));
//!
//! let rainbow = Tile::rainbow();
//! assert_eq!(rainbow.color, Color::Wildcard);
//! assert_eq!(rainbow.match_color(), None);
//!
//! assert!(Pos::new(3, 3).is_adjacent(Pos::new(3, 4)));
//! assert!(!Pos::new(3, 3).is_adjacent(Pos::new(4, 4)));
//! ```

/// Default grid side length (8x8)
pub const DEFAULT_GRID_SIZE: usize = 8;

/// Smallest supported grid side length
pub const MIN_GRID_SIZE: usize = 4;

/// Largest supported grid side length
pub const MAX_GRID_SIZE: usize = 16;

/// Default number of gem colors in the palette
pub const DEFAULT_COLOR_COUNT: u8 = 6;

/// Smallest supported palette
pub const MIN_COLOR_COUNT: u8 = 2;

/// Largest supported palette (letters `A`..`H` in grid notation)
pub const MAX_COLOR_COUNT: u8 = 8;

/// Reshuffle attempts before the engine reports an internal-consistency violation
pub const MAX_SHUFFLE_ATTEMPTS: u32 = 10_000;

/// Upper bound on cascade rounds resolved for a single action
pub const MAX_CASCADE_ROUNDS: u32 = 1_000;

/// Minimum run length that counts as a match
pub const MIN_RUN: usize = 3;

/// Manhattan radius of a single diamond detonation (13 cells)
pub const DIAMOND_RANGE: u8 = 2;

/// Manhattan radius of a diamond × diamond detonation (25 cells)
pub const SUPER_DIAMOND_RANGE: u8 = 3;

/// Base scores for runs of 3, 4 and 5 tiles
pub const RUN_SCORES: [u32; 3] = [30, 80, 200];

/// Base score of a 6-tile run
pub const LONG_RUN_BASE: u32 = 300;

/// Added per tile beyond six
pub const LONG_RUN_STEP: u32 = 50;

/// Bonus for L and T shaped matches
pub const SHAPE_BONUS: u32 = 100;


/// A cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Flat row-major index on a grid of side `size`
    #[inline(always)]
    pub fn index(self, size: usize) -> usize {
        self.row * size + self.col
    }

    /// Inverse of [`Pos::index`]
    #[inline(always)]
    pub fn from_index(index: usize, size: usize) -> Self {
        Self {
            row: index / size,
            col: index % size,
        }
    }

    /// Manhattan distance between two cells
    pub fn manhattan(self, other: Pos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True for 4-neighbours (never for the same cell)
    ///
    /// # Examples
    ///
    /// ```
    /// use gemfall_types::Pos;
    ///
    /// assert!(Pos::new(0, 0).is_adjacent(Pos::new(1, 0)));
    /// assert!(!Pos::new(0, 0).is_adjacent(Pos::new(0, 2)));
    /// ```
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }
}

/// Tile color
///
/// - **Gem(n)**: ordinary palette color `n`
/// - **Wildcard**: carried by rainbow specials; matches nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Gem(u8),
    Wildcard,
}

impl Color {
    /// Gem index, `None` for the wildcard
    pub fn gem(self) -> Option<u8> {
        match self {
            Color::Gem(c) => Some(c),
            Color::Wildcard => None,
        }
    }

    /// Single-character grid notation: `A`.. for gems, `*` for the wildcard
    ///
    /// # Examples
    ///
    /// ```
    /// use gemfall_types::Color;
    ///
    /// assert_eq!(Color::Gem(0).symbol(), 'A');
    /// assert_eq!(Color::Gem(5).symbol(), 'F');
    /// assert_eq!(Color::Wildcard.symbol(), '*');
    /// ```
    pub fn symbol(self) -> char {
        match self {
            Color::Gem(c) => (b'A' + c) as char,
            Color::Wildcard => '*',
        }
    }

    /// Parse the grid notation produced by [`Color::symbol`] (case-insensitive)
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '*' => Some(Color::Wildcard),
            c if c.is_ascii_alphabetic() => {
                let idx = c.to_ascii_uppercase() as u8 - b'A';
                (idx < MAX_COLOR_COUNT).then_some(Color::Gem(idx))
            }
            _ => None,
        }
    }
}

/// Special tile kinds
///
/// - **LineH**: clears its whole row when detonated
/// - **LineV**: clears its whole column
/// - **Diamond**: clears a Manhattan radius-2 diamond
/// - **Rainbow**: clears every tile of one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Special {
    #[default]
    None,
    LineH,
    LineV,
    Diamond,
    Rainbow,
}

impl Special {
    /// Upgrade priority: NONE=1 < LINE=2 < DIAMOND=3 < RAINBOW=4
    pub fn priority(self) -> u8 {
        match self {
            Special::None => 1,
            Special::LineH | Special::LineV => 2,
            Special::Diamond => 3,
            Special::Rainbow => 4,
        }
    }

    pub fn is_line(self) -> bool {
        matches!(self, Special::LineH | Special::LineV)
    }

    pub fn is_special(self) -> bool {
        self != Special::None
    }

    /// Parse special kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use gemfall_types::Special;
    ///
    /// assert_eq!(Special::from_str("lineH"), Some(Special::LineH));
    /// assert_eq!(Special::from_str("RAINBOW"), Some(Special::Rainbow));
    /// assert_eq!(Special::from_str("bomb"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Special::None),
            "lineh" => Some(Special::LineH),
            "linev" => Some(Special::LineV),
            "diamond" => Some(Special::Diamond),
            "rainbow" => Some(Special::Rainbow),
            _ => None,
        }
    }

    /// Convert to camelCase string for the wire protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            Special::None => "none",
            Special::LineH => "lineH",
            Special::LineV => "lineV",
            Special::Diamond => "diamond",
            Special::Rainbow => "rainbow",
        }
    }
}

/// A tile resting on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub color: Color,
    pub special: Special,
}

impl Tile {
    /// Plain gem tile
    pub const fn gem(color: u8) -> Self {
        Self {
            color: Color::Gem(color),
            special: Special::None,
        }
    }

    /// Rainbow special (always wildcard colored)
    pub const fn rainbow() -> Self {
        Self {
            color: Color::Wildcard,
            special: Special::Rainbow,
        }
    }

    /// Same tile carrying `special`; promoting to rainbow turns the color into the wildcard
    pub fn with_special(self, special: Special) -> Self {
        match special {
            Special::Rainbow => Self::rainbow(),
            _ => Self { special, ..self },
        }
    }

    /// Color used for run detection (`None` for wildcards)
    pub fn match_color(&self) -> Option<u8> {
        self.color.gem()
    }

    pub fn is_wildcard(&self) -> bool {
        self.color == Color::Wildcard
    }
}

/// A cell on the grid
///
/// - `None`: Empty cell
/// - `Some(Tile)`: Cell holding a tile
pub type Cell = Option<Tile>;

/// Shape of a detected match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    HLine,
    VLine,
    LShape,
    TShape,
}

impl Shape {
    pub fn is_line(self) -> bool {
        matches!(self, Shape::HLine | Shape::VLine)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::HLine => "hLine",
            Shape::VLine => "vLine",
            Shape::LShape => "lShape",
            Shape::TShape => "tShape",
        }
    }
}

/// Visual detonation effect emitted in an elimination step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    LineH,
    LineV,
    Diamond { range: u8 },
    RainbowFlash,
}

impl EffectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::LineH => "lineH",
            EffectKind::LineV => "lineV",
            EffectKind::Diamond { .. } => "diamond",
            EffectKind::RainbowFlash => "rainbowFlash",
        }
    }
}

/// Kinds of player actions the engine accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Ordinary swap of two adjacent tiles
    Swap,
    /// Prop: destroy a single tile
    Hit,
    /// Prop: swap two adjacent tiles even if nothing matches
    ForceSwap,
    /// Prop: clear every tile of one color
    TypeClear,
}

impl ActionKind {
    /// Parse action kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use gemfall_types::ActionKind;
    ///
    /// assert_eq!(ActionKind::from_str("swap"), Some(ActionKind::Swap));
    /// assert_eq!(ActionKind::from_str("typeClear"), Some(ActionKind::TypeClear));
    /// assert_eq!(ActionKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "swap" => Some(ActionKind::Swap),
            "hit" => Some(ActionKind::Hit),
            "forceswap" => Some(ActionKind::ForceSwap),
            "typeclear" => Some(ActionKind::TypeClear),
            _ => None,
        }
    }

    /// Convert to camelCase string for the wire protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Swap => "swap",
            ActionKind::Hit => "hit",
            ActionKind::ForceSwap => "forceSwap",
            ActionKind::TypeClear => "typeClear",
        }
    }
}

/// A player action with its target cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Swap { from: Pos, to: Pos },
    Hit { at: Pos },
    ForceSwap { from: Pos, to: Pos },
    TypeClear { at: Pos },
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Swap { .. } => ActionKind::Swap,
            PlayerAction::Hit { .. } => ActionKind::Hit,
            PlayerAction::ForceSwap { .. } => ActionKind::ForceSwap,
            PlayerAction::TypeClear { .. } => ActionKind::TypeClear,
        }
    }
}
