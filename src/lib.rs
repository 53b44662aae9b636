//! Gemfall (workspace facade crate).
//!
//! Re-exports the engine as `gemfall::{core, adapter, types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use gemfall_adapter as adapter;
pub use gemfall_core as core;
pub use gemfall_types as types;
