//! Command-line parsing for the `gemfall` binary.

use anyhow::{anyhow, Result};

use gemfall::adapter::RunConfig;

pub const USAGE: &str =
    "usage: gemfall <autoplay|pipe> [--size N] [--colors K] [--seed S] [--moves M]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Play hint moves and print one sequence per action
    Autoplay,
    /// Answer JSON command lines from stdin
    Pipe,
}

impl Mode {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "autoplay" => Some(Mode::Autoplay),
            "pipe" => Some(Mode::Pipe),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Mode::Autoplay => "autoplay",
            Mode::Pipe => "pipe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub mode: Mode,
    pub config: RunConfig,
}

/// Parse `args` (without the program name) on top of `base`.
///
/// Flags override whatever `base` carries, usually the environment.
pub fn parse_args(args: &[String], base: RunConfig) -> Result<Cli> {
    let first = args.first().ok_or_else(|| anyhow!(USAGE))?;
    let mode = Mode::from_str(first).ok_or_else(|| anyhow!("unknown command: {}", first))?;
    let name = mode.as_str();

    let mut config = base;
    let mut i = 1usize;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let v = args
            .get(i)
            .ok_or_else(|| anyhow!("{}: missing value for {}", name, flag))?;
        let invalid = || anyhow!("{}: invalid {} value: {}", name, flag, v);
        match flag {
            "--size" => config.size = v.parse().map_err(|_| invalid())?,
            "--colors" => config.colors = v.parse().map_err(|_| invalid())?,
            "--seed" => config.seed = v.parse().map_err(|_| invalid())?,
            "--moves" => config.moves = v.parse().map_err(|_| invalid())?,
            other => {
                return Err(anyhow!("{}: unknown argument: {}", name, other));
            }
        }
        i += 1;
    }

    Ok(Cli { mode, config })
}
