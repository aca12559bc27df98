//! # sigma CLI Entry Point
//!
//! `sigma [mode]` where mode is one of `all` (default), `tests`, `libs` or
//! `deploy`. Configuration comes from an optional `sigma.toml` in the current
//! directory.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use sigma::build::MakeTool;
use sigma::config::SigmaConfig;
use sigma::gate;
use sigma::pipeline::{Mode, Pipeline};
use sigma::version::VersionStore;
use std::fmt::Display;

#[derive(Parser)]
#[command(name = "sigma")]
#[command(
    about = "Build, test-gate and deploy a native library project",
    version = env!("CARGO_PKG_VERSION")
)]
#[command(long_about = None)]
struct Cli {
    /// Build mode: all, tests, libs or deploy [default: all]
    #[arg(num_args = 0.., value_name = "MODE", allow_hyphen_values = true)]
    mode: Vec<String>,
}

fn fail(e: impl Display) -> ! {
    println!("{} {}", "x".red(), e);
    std::process::exit(1);
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => fail(e),
    };

    // Mode errors win over config errors
    let mode = Mode::from_args(&cli.mode).unwrap_or_else(|e| fail(e));

    let root = std::env::current_dir().context("Failed to determine current directory")?;

    let outcome = SigmaConfig::load(&root).and_then(|config| {
        let versions = VersionStore::new(&config.version_file);
        let build_tool = MakeTool::new(config.build.program.clone());
        let test_gate = gate::from_config(&config.test_gate);

        Pipeline::new(&config, &versions, &build_tool, test_gate.as_ref()).run(mode)
    });

    if let Err(e) = outcome {
        fail(e);
    }
    Ok(())
}
