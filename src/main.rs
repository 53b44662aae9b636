//! Gemfall runner (default binary).
//!
//! `gemfall autoplay` plays hint moves and prints one `sequence` line per
//! action followed by a final `observation`. `gemfall pipe` reads JSON command
//! lines on stdin and answers on stdout. Diagnostics go to stderr, filtered
//! by `GEMFALL_LOG`.

mod cli;

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Result};
use log::info;
use tracing_subscriber::EnvFilter;

use cli::{parse_args, Mode};
use gemfall::adapter::{OutboundMessage, RunConfig, Session};

/// Install the stderr subscriber; `log` records are bridged into it
fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_env("GEMFALL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("logging: {}", e))
}

fn main() -> Result<()> {
    init_logging()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args, RunConfig::from_env())?;
    let mut session = Session::new(&cli.config)?;
    info!(
        "{}x{} grid, {} colors, seed {}",
        cli.config.size, cli.config.size, cli.config.colors, cli.config.seed
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.mode {
        Mode::Autoplay => autoplay(&mut session, cli.config.moves, &mut out),
        Mode::Pipe => pipe(&mut session, io::stdin().lock(), &mut out),
    }
}

fn autoplay(session: &mut Session, moves: u32, out: &mut impl Write) -> Result<()> {
    let mut seq = 1u64;
    for _ in 0..moves {
        let msg = session
            .autoplay_step(seq)
            .ok_or_else(|| anyhow!("autoplay: no legal move at seq {}", seq))?;
        let failed = matches!(msg, OutboundMessage::Error(_));
        write_line(out, &msg)?;
        if failed {
            return Err(anyhow!("autoplay: engine failure at seq {}", seq));
        }
        seq += 1;
    }

    let obs = OutboundMessage::Observation(session.observation(seq));
    write_line(out, &obs)?;
    info!(
        "autoplay finished: {} moves, score {}",
        session.engine().moves(),
        session.engine().current_score()
    );
    Ok(())
}

fn pipe(session: &mut Session, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        if let Some(msg) = session.handle_line(&line) {
            write_line(out, &msg)?;
        }
    }
    Ok(())
}

fn write_line(out: &mut impl Write, msg: &OutboundMessage) -> Result<()> {
    let line = msg.to_json()?;
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_installs_once_and_takes_log_records() {
        assert!(init_logging().is_ok());
        // Library crates log through the `log` facade.
        assert!(log::log_enabled!(log::Level::Error));
        assert!(init_logging().is_err());
    }
}
