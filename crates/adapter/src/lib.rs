//! Adapter module - external control via line-delimited JSON
//!
//! This crate lets bots, replay tools and renderers drive an engine without
//! linking against its types. It knows nothing about transports: a
//! [`Session`] turns one inbound line into one outbound message, and the
//! host decides where the lines come from (the `gemfall pipe` subcommand
//! uses stdin/stdout).
//!
//! # Message Types
//!
//! ## Client → Engine
//!
//! - **command**: one player action (`swap`, `forceSwap`, `hit`, `typeClear`)
//! - **snapshot**: request an observation of the current grid
//!
//! ## Engine → Client
//!
//! - **sequence**: the animation sequence of one action, plus score and state hash
//! - **observation**: full grid snapshot
//! - **error**: error response with code and message
//!
//! Every reply echoes the request's `seq`, which must strictly increase.
//!
//! # Environment Variables
//!
//! - `GEMFALL_SIZE`: grid side length (default: 8)
//! - `GEMFALL_COLORS`: palette size (default: 6)
//! - `GEMFALL_SEED`: RNG seed (default: 0)
//! - `GEMFALL_MAX_SHUFFLES`: reshuffle attempts before giving up (default: 10000)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Engine: {"type":"snapshot","seq":1}
//! Engine -> Client: {"type":"observation","seq":1,"ts":1234567890,"size":8,"rows":["ABCD..."],...}
//! Client -> Engine: {"type":"command","seq":2,"action":"swap","from":[3,4],"to":[3,5]}
//! Engine -> Client: {"type":"sequence","seq":2,"ts":1234567891,"swap":{...},"rounds":[...],...}
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod session;

pub use gemfall_core as core;
pub use gemfall_types as types;

// Re-export protocol types for convenience
pub use config::RunConfig;
pub use error::ProtocolError;
pub use protocol::*;
pub use session::{OutboundMessage, Session};
