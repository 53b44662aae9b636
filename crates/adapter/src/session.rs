//! Session - one engine driven by line-delimited JSON
//!
//! Transport-agnostic: the caller feeds inbound lines and writes the returned
//! messages wherever it likes (the binary uses stdin/stdout).

use log::{debug, warn};

use crate::config::RunConfig;
use crate::core::{Engine, EngineError};
use crate::error::ProtocolError;
use crate::protocol::{
    build_observation, create_error, create_sequence, extract_seq_best_effort, parse_message,
    ErrorCode, ErrorMessage, ObservationMessage, ParsedMessage, SequenceMessage,
};
use crate::types::PlayerAction;

/// Reply to one inbound line
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    Sequence(SequenceMessage),
    Observation(ObservationMessage),
    Error(ErrorMessage),
}

impl OutboundMessage {
    pub fn seq(&self) -> u64 {
        match self {
            OutboundMessage::Sequence(m) => m.seq,
            OutboundMessage::Observation(m) => m.seq,
            OutboundMessage::Error(m) => m.seq,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        match self {
            OutboundMessage::Sequence(m) => serde_json::to_string(m),
            OutboundMessage::Observation(m) => serde_json::to_string(m),
            OutboundMessage::Error(m) => serde_json::to_string(m),
        }
    }
}

/// Engine plus protocol bookkeeping
#[derive(Debug, Clone)]
pub struct Session {
    engine: Engine,
    last_seq: Option<u64>,
}

impl Session {
    pub fn new(config: &RunConfig) -> Result<Self, EngineError> {
        let engine = Engine::initialize(config.engine_config(), config.seed)?;
        Ok(Self::from_engine(engine))
    }

    pub fn from_engine(engine: Engine) -> Self {
        Self {
            engine,
            last_seq: None,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Handle one inbound line. Blank lines produce no reply.
    pub fn handle_line(&mut self, line: &str) -> Option<OutboundMessage> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let reply = match parse_message(trimmed) {
            Ok(ParsedMessage::Command(cmd)) => match self.check_seq(cmd.seq) {
                Some(err) => OutboundMessage::Error(err),
                None => match cmd.to_action() {
                    Ok(action) => self.execute(cmd.seq, action),
                    Err(e) => protocol_error(cmd.seq, &e),
                },
            },
            Ok(ParsedMessage::Snapshot(req)) => match self.check_seq(req.seq) {
                Some(err) => OutboundMessage::Error(err),
                None => OutboundMessage::Observation(self.observation(req.seq)),
            },
            Ok(ParsedMessage::Unknown(m)) => {
                protocol_error(m.seq, &ProtocolError::UnknownType(m.msg_type))
            }
            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                protocol_error(seq, &ProtocolError::Json(e))
            }
        };
        Some(reply)
    }

    /// Apply `action` and describe the result
    pub fn execute(&mut self, seq: u64, action: PlayerAction) -> OutboundMessage {
        match self.engine.apply_action(action) {
            Ok(anim) => {
                debug!(
                    "seq {}: {} removed {} tiles in {} rounds (+{})",
                    seq,
                    action.kind().as_str(),
                    anim.removed_count(),
                    anim.rounds.len(),
                    anim.score_delta
                );
                OutboundMessage::Sequence(create_sequence(
                    seq,
                    action.kind(),
                    &anim,
                    &self.engine.snapshot(),
                ))
            }
            Err(e) => {
                warn!("seq {}: engine failure: {}", seq, e);
                OutboundMessage::Error(create_error(seq, ErrorCode::Internal, &e.to_string()))
            }
        }
    }

    /// Play the hint move, if any
    pub fn autoplay_step(&mut self, seq: u64) -> Option<OutboundMessage> {
        let (from, to) = self.engine.find_legal_move()?;
        Some(self.execute(seq, PlayerAction::Swap { from, to }))
    }

    pub fn observation(&self, seq: u64) -> ObservationMessage {
        build_observation(
            seq,
            &self.engine.snapshot(),
            self.engine.has_any_legal_move(),
        )
    }

    fn check_seq(&mut self, seq: u64) -> Option<ErrorMessage> {
        if self.last_seq.is_some_and(|last| seq <= last) {
            return Some(create_error(
                seq,
                ErrorCode::InvalidCommand,
                "seq must be strictly increasing",
            ));
        }
        self.last_seq = Some(seq);
        None
    }
}

fn protocol_error(seq: u64, err: &ProtocolError) -> OutboundMessage {
    OutboundMessage::Error(create_error(seq, err.code(), &err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(&RunConfig {
            seed: 11,
            ..RunConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn snapshot_request_returns_observation() {
        let mut session = session();
        let reply = session
            .handle_line(r#"{"type":"snapshot","seq":1}"#)
            .unwrap();
        let OutboundMessage::Observation(obs) = reply else {
            panic!("expected observation");
        };
        assert_eq!(obs.seq, 1);
        assert_eq!(obs.size, 8);
        assert_eq!(obs.rows.len(), 8);
        assert!(obs.playable);
    }

    #[test]
    fn hint_swap_over_the_wire() {
        let mut session = session();
        let (from, to) = session.engine().find_legal_move().unwrap();
        let line = format!(
            r#"{{"type":"command","seq":3,"action":"swap","from":[{},{}],"to":[{},{}]}}"#,
            from.row, from.col, to.row, to.col
        );

        let reply = session.handle_line(&line).unwrap();
        let OutboundMessage::Sequence(msg) = reply else {
            panic!("expected sequence");
        };
        assert_eq!(msg.seq, 3);
        assert!(msg.swap.unwrap().success);
        assert!(!msg.rounds.is_empty());
        assert_eq!(msg.score, session.engine().current_score());
        assert_eq!(msg.moves, 1);
    }

    #[test]
    fn seq_must_increase() {
        let mut session = session();
        session.handle_line(r#"{"type":"snapshot","seq":5}"#);
        let reply = session
            .handle_line(r#"{"type":"snapshot","seq":5}"#)
            .unwrap();
        let OutboundMessage::Error(err) = reply else {
            panic!("expected error");
        };
        assert_eq!(err.code, ErrorCode::InvalidCommand);
    }

    #[test]
    fn malformed_lines_are_reported() {
        let mut session = session();
        assert!(session.handle_line("   ").is_none());

        let reply = session.handle_line(r#"{"seq": 8, "type":"command""#).unwrap();
        assert_eq!(reply.seq(), 8);
        assert!(matches!(reply, OutboundMessage::Error(_)));

        let reply = session.handle_line(r#"{"type":"hello","seq":9}"#).unwrap();
        let json = reply.to_json().unwrap();
        assert!(json.contains("invalid_command"));
        assert!(json.contains("hello"));
    }

    #[test]
    fn autoplay_advances_moves() {
        let mut session = session();
        for seq in 1..=5 {
            let reply = session.autoplay_step(seq).unwrap();
            assert!(matches!(reply, OutboundMessage::Sequence(_)));
        }
        assert_eq!(session.engine().moves(), 5);
    }
}
