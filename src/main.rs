//! `overlay-replay`: read a replay script on stdin, print the resulting
//! elements as JSON on stdout. Logs go to stderr.

use std::io::{self, Write};
use std::process::ExitCode;

use overlay_canvas::config::EditorConfig;
use overlay_canvas::error::EditorResult;
use overlay_canvas::replay;

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "replay failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> EditorResult<()> {
    let config = EditorConfig::from_env()?;
    let elements = replay::run_reader(io::stdin().lock(), config)?;

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &elements)?;
    writeln!(out)?;
    Ok(())
}
