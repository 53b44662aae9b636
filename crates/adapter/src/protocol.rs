//! Protocol module - JSON message types for the wire adapter
//!
//! Line-delimited JSON. Every message carries `type` and `seq`; outbound
//! messages add `ts` (milliseconds since the Unix epoch). Responses echo the
//! `seq` of the request they answer.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::core::{AnimationSequence, Grid, GridSnapshot};
use crate::error::ProtocolError;
use crate::types::{ActionKind, Color, EffectKind, PlayerAction, Pos, Special, Tile};

/// Grid coordinate on the wire: `[row, col]`
pub type Coord = [usize; 2];

fn coord(pos: Pos) -> Coord {
    [pos.row, pos.col]
}

fn pos(coord: Coord) -> Pos {
    Pos::new(coord[0], coord[1])
}

// ============== Client -> Engine Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "command")]
    Command,
}

impl Default for CommandType {
    fn default() -> Self {
        Self::Command
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapshotType {
    #[serde(rename = "snapshot")]
    Snapshot,
}

impl Default for SnapshotType {
    fn default() -> Self {
        Self::Snapshot
    }
}

/// Player action name (case-insensitive on input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionName(pub ActionKind);

impl<'de> Deserialize<'de> for ActionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ActionKind::from_str(&s)
            .map(ActionName)
            .ok_or_else(|| serde::de::Error::custom("unknown action"))
    }
}

impl Serialize for ActionName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

/// Command message: one player action
#[derive(Debug, Clone, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub action: ActionName,
    #[serde(default)]
    pub from: Option<Coord>,
    #[serde(default)]
    pub to: Option<Coord>,
    #[serde(default)]
    pub at: Option<Coord>,
}

impl CommandMessage {
    /// Resolve the coordinates the action needs
    pub fn to_action(&self) -> Result<PlayerAction, ProtocolError> {
        let action = self.action.0.as_str();
        let need = |field: &'static str, value: Option<Coord>| {
            value
                .map(pos)
                .ok_or(ProtocolError::MissingField { action, field })
        };

        Ok(match self.action.0 {
            ActionKind::Swap => PlayerAction::Swap {
                from: need("from", self.from)?,
                to: need("to", self.to)?,
            },
            ActionKind::ForceSwap => PlayerAction::ForceSwap {
                from: need("from", self.from)?,
                to: need("to", self.to)?,
            },
            ActionKind::Hit => PlayerAction::Hit {
                at: need("at", self.at)?,
            },
            ActionKind::TypeClear => PlayerAction::TypeClear {
                at: need("at", self.at)?,
            },
        })
    }
}

/// Request for an observation of the current grid
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotRequest {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: SnapshotType,
    pub seq: u64,
}

// ============== Engine -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceType {
    #[serde(rename = "sequence")]
    Sequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "internal")]
    Internal,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Tile color: gem index, or the string `"wildcard"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorWire {
    Gem(u8),
    Wildcard,
}

impl From<Color> for ColorWire {
    fn from(value: Color) -> Self {
        match value {
            Color::Gem(c) => Self::Gem(c),
            Color::Wildcard => Self::Wildcard,
        }
    }
}

impl Serialize for ColorWire {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            ColorWire::Gem(c) => serializer.serialize_u8(*c),
            ColorWire::Wildcard => serializer.serialize_str("wildcard"),
        }
    }
}

impl<'de> Deserialize<'de> for ColorWire {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = ColorWire;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a gem index or \"wildcard\"")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u8::try_from(v)
                    .map(ColorWire::Gem)
                    .map_err(|_| E::custom("gem index out of range"))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v.eq_ignore_ascii_case("wildcard") {
                    Ok(ColorWire::Wildcard)
                } else {
                    Err(E::custom("invalid color"))
                }
            }
        }

        deserializer.deserialize_any(V)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialLower {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "lineH")]
    LineH,
    #[serde(rename = "lineV")]
    LineV,
    #[serde(rename = "diamond")]
    Diamond,
    #[serde(rename = "rainbow")]
    Rainbow,
}

impl From<Special> for SpecialLower {
    fn from(value: Special) -> Self {
        match value {
            Special::None => Self::None,
            Special::LineH => Self::LineH,
            Special::LineV => Self::LineV,
            Special::Diamond => Self::Diamond,
            Special::Rainbow => Self::Rainbow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKindLower {
    #[serde(rename = "lineH")]
    LineH,
    #[serde(rename = "lineV")]
    LineV,
    #[serde(rename = "diamond")]
    Diamond,
    #[serde(rename = "rainbowFlash")]
    RainbowFlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileWire {
    pub color: ColorWire,
    pub special: SpecialLower,
}

impl From<Tile> for TileWire {
    fn from(value: Tile) -> Self {
        Self {
            color: value.color.into(),
            special: value.special.into(),
        }
    }
}

/// A tile at a cell (removed, promoted, transformed or spawned)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileAt {
    pub at: Coord,
    #[serde(flatten)]
    pub tile: TileWire,
}

impl TileAt {
    fn new(at: Pos, tile: Tile) -> Self {
        Self {
            at: coord(at),
            tile: tile.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectWire {
    pub kind: EffectKindLower,
    pub origin: Coord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<u8>,
}

impl EffectWire {
    fn new(kind: EffectKind, origin: Pos) -> Self {
        let (kind, range) = match kind {
            EffectKind::LineH => (EffectKindLower::LineH, None),
            EffectKind::LineV => (EffectKindLower::LineV, None),
            EffectKind::Diamond { range } => (EffectKindLower::Diamond, Some(range)),
            EffectKind::RainbowFlash => (EffectKindLower::RainbowFlash, None),
        };
        Self {
            kind,
            origin: coord(origin),
            range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveWire {
    pub from: Coord,
    pub to: Coord,
    #[serde(flatten)]
    pub tile: TileWire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapWire {
    pub from: Coord,
    pub to: Coord,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundWire {
    pub removed: Vec<TileAt>,
    pub effects: Vec<EffectWire>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub promotions: Vec<TileAt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<TileAt>,
    pub moves: Vec<MoveWire>,
    pub spawned: Vec<TileAt>,
    pub score: u32,
    pub combo: u32,
}

/// Row-major cells, one array per row; `null` is an empty cell
pub type CellsWire = Vec<Vec<Option<TileWire>>>;

fn cells_wire(grid: &Grid) -> CellsWire {
    let size = grid.size();
    (0..size)
        .map(|row| {
            (0..size)
                .map(|col| grid.tile(Pos::new(row, col)).map(TileWire::from))
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffleWire {
    pub cells: CellsWire,
}

/// Animation sequence for one command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceMessage {
    #[serde(rename = "type")]
    pub msg_type: SequenceType,
    pub seq: u64,
    pub ts: u64,
    pub action: ActionName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap: Option<SwapWire>,
    pub rounds: Vec<RoundWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle: Option<ShuffleWire>,
    pub score_delta: u32,
    pub score: u32,
    pub moves: u32,
    pub state_hash: StateHash,
}

/// Grid state observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub size: usize,
    pub colors: u8,
    pub seed: u64,
    pub score: u32,
    pub moves: u32,
    pub playable: bool,
    /// Grid notation, one string per row
    pub rows: Vec<String>,
    pub cells: CellsWire,
    pub state_hash: StateHash,
}

/// Deterministic state hash serialized as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:016x}", self.0))
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid hex"))
    }
}

/// FNV-1a, stable across Rust versions and platforms (unlike `DefaultHasher`).
#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Hash of everything an observation reports
pub fn state_hash(snapshot: &GridSnapshot) -> StateHash {
    let mut hasher = Fnv1aHasher::new();
    snapshot.hash(&mut hasher);
    StateHash(hasher.finish())
}

// ============== Message Parsing ==============

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Command(CommandMessage),
    Snapshot(SnapshotRequest),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
    pub msg_type: String,
}

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "snapshot")]
        Snapshot(SnapshotRequest),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Ok(InboundMessage::Snapshot(m)) => Ok(ParsedMessage::Snapshot(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct Header {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let header = serde_json::from_str::<Header>(json)?;
            let msg_type = header.msg_type.unwrap_or_else(|| "unknown".to_string());
            if msg_type != "command" && msg_type != "snapshot" {
                return Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: header.seq.unwrap_or(0),
                    msg_type,
                }));
            }
            Err(e)
        }
    }
}

/// Pull `seq` out of a line that failed to parse, for the error reply
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Message Builders ==============

/// Wire form of an animation sequence
pub fn create_sequence(
    seq: u64,
    action: ActionKind,
    anim: &AnimationSequence,
    snapshot: &GridSnapshot,
) -> SequenceMessage {
    let rounds = anim
        .rounds
        .iter()
        .map(|round| RoundWire {
            removed: round
                .elimination
                .removed
                .iter()
                .map(|r| TileAt::new(r.pos, r.tile))
                .collect(),
            effects: round
                .elimination
                .effects
                .iter()
                .map(|e| EffectWire::new(e.kind, e.origin))
                .collect(),
            promotions: round
                .elimination
                .promotions
                .iter()
                .map(|p| TileAt::new(p.pos, p.tile))
                .collect(),
            transforms: round
                .elimination
                .transforms
                .iter()
                .map(|p| TileAt::new(p.pos, p.tile))
                .collect(),
            moves: round
                .fall
                .moves
                .iter()
                .map(|m| MoveWire {
                    from: coord(m.from),
                    to: coord(m.to),
                    tile: m.tile.into(),
                })
                .collect(),
            spawned: round
                .fall
                .spawned
                .iter()
                .map(|n| TileAt::new(n.to, n.tile))
                .collect(),
            score: round.score,
            combo: round.combo,
        })
        .collect();

    SequenceMessage {
        msg_type: SequenceType::Sequence,
        seq,
        ts: current_timestamp_ms(),
        action: ActionName(action),
        swap: anim.swap.map(|s| SwapWire {
            from: coord(s.from),
            to: coord(s.to),
            success: s.success,
        }),
        rounds,
        shuffle: anim.shuffle.as_ref().map(|s| ShuffleWire {
            cells: cells_wire(&s.grid),
        }),
        score_delta: anim.score_delta,
        score: snapshot.score,
        moves: snapshot.moves,
        state_hash: state_hash(snapshot),
    }
}

/// Build observation message from a snapshot
pub fn build_observation(seq: u64, snapshot: &GridSnapshot, playable: bool) -> ObservationMessage {
    let grid = snapshot.to_grid();
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        size: snapshot.size,
        colors: snapshot.colors,
        seed: snapshot.seed,
        score: snapshot.score,
        moves: snapshot.moves,
        playable,
        rows: grid.to_rows(),
        cells: cells_wire(&grid),
        state_hash: state_hash(snapshot),
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
