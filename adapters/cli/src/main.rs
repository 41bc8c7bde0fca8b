#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs scripted Ocean Descent dives.

mod config;
mod script;
mod session;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use ocean_descent_rendering::{Frame, RenderingBackend};
use ocean_descent_system_ingestion::Dataset;
use tracing_subscriber::EnvFilter;

use crate::{config::SessionConfig, session::Session};

#[derive(Parser, Debug)]
#[command(author, version, about = "Scripted ocean depth exploration", long_about = None)]
struct Cli {
    /// Session configuration TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset JSON file or CSV table directory, overriding the configured one
    #[arg(long)]
    data: Option<PathBuf>,

    /// Seed for layer assignment and drift, overriding the configured ones
    #[arg(long)]
    seed: Option<u64>,

    /// Input script; read from stdin when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Cells per character in the text preview
    #[arg(long, default_value_t = 10)]
    preview_step: u32,
}

/// Writes each frame as a caption, a downsampled viewport and HUD readings.
struct TextBackend<W> {
    out: W,
    step: u32,
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        writeln!(self.out, "== {}", frame.caption())?;
        write!(self.out, "{}", frame.text_preview(self.step))?;
        writeln!(self.out, "{}", frame.hud_summary())?;
        Ok(())
    }
}

/// Entry point for the Ocean Descent command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(data) = cli.data {
        config.data.dataset = Some(data);
    }
    if let Some(seed) = cli.seed {
        config.data.seed = seed;
        config.drift.seed = seed;
    }

    let dataset = match &config.data.dataset {
        Some(path) => Dataset::from_path(path)
            .with_context(|| format!("failed to load dataset {}", path.display()))?,
        None => {
            tracing::warn!("no dataset configured; diving through empty water");
            Dataset::default()
        }
    };

    let script = match &cli.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script at {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("failed to read script from stdin")?,
    };
    let inputs = script::parse_script(&script)?;

    let mut session = Session::new(&config, &dataset)?;
    let mut backend = TextBackend {
        out: io::stdout().lock(),
        step: cli.preview_step,
    };
    let summary = session.run(inputs, &mut backend)?;
    tracing::info!(
        steps = summary.steps,
        collected = summary.collected,
        out_of_fuel = summary.out_of_fuel,
        "dive finished"
    );
    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}
