//! Test gate collaborators.
//!
//! The pipeline never runs or parses tests itself; it asks a [`TestGate`]
//! for a single pass/fail answer. [`AlwaysPass`] is the default.
//! [`SummaryLogGate`] reads the `<FinalSummary .../>` record written by the
//! XML test log formatter:
//!
//! ```text
//!   <FinalSummary UnitsPassed=12 UnitsFailed=0 UnitsErrored=0 ChecksPassed=340 ChecksFailed=0/>
//! ```

use crate::config::TestGateConfig;
use crate::error::DeployError;
use colored::*;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

pub trait TestGate {
    /// `true` when deployment may go ahead.
    fn passed(&self) -> Result<bool, DeployError>;
}

/// Gate that never blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysPass;

impl TestGate for AlwaysPass {
    fn passed(&self) -> Result<bool, DeployError> {
        Ok(true)
    }
}

/// The gate a project's `[test_gate]` section asks for.
pub fn from_config(config: &TestGateConfig) -> Box<dyn TestGate> {
    if config.enabled {
        Box::new(SummaryLogGate::new(config.command.clone(), &config.log))
    } else {
        Box::new(AlwaysPass)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub units_failed: u64,
    pub units_errored: u64,
}

impl Summary {
    pub fn passed(&self) -> bool {
        self.units_failed == 0 && self.units_errored == 0
    }
}

static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(UnitsFailed|UnitsErrored)="?(\d+)"?"#).expect("static regex is valid")
});

/// Find the first `<FinalSummary` record and read its failure counters.
pub fn scan_summary(log: &str) -> Option<Summary> {
    let line = log
        .lines()
        .find(|line| line.trim_start().starts_with("<FinalSummary"))?;

    let mut summary = Summary::default();
    for caps in FIELD_RE.captures_iter(line) {
        // Counters too large for u64 still mean "something failed"
        let count = caps[2].parse::<u64>().unwrap_or(u64::MAX);
        match &caps[1] {
            "UnitsFailed" => summary.units_failed = count,
            _ => summary.units_errored = count,
        }
    }
    Some(summary)
}

/// Runs the test binary (optional) and judges its summary log.
#[derive(Debug, Clone)]
pub struct SummaryLogGate {
    pub command: Option<String>,
    pub log: PathBuf,
}

impl SummaryLogGate {
    pub fn new(command: Option<String>, log: impl Into<PathBuf>) -> Self {
        Self {
            command,
            log: log.into(),
        }
    }

    fn run_command(&self, command: &str) {
        println!("   {} Running tests: '{}'...", "🧪".magenta(), command);
        // Exit status is not consulted; the log decides
        let status = if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/C", command]).status()
        } else {
            Command::new("sh").args(["-c", command]).status()
        };
        if let Err(e) = status {
            println!("   {} Could not start test command: {}", "!".yellow(), e);
        }
    }
}

impl TestGate for SummaryLogGate {
    fn passed(&self) -> Result<bool, DeployError> {
        if let Some(command) = &self.command {
            self.run_command(command);
        }

        let content = fs::read_to_string(&self.log).map_err(|e| DeployError::fs(&self.log, e))?;

        match scan_summary(&content) {
            Some(summary) => {
                if !summary.passed() {
                    println!(
                        "   {} {} unit(s) failed, {} unit(s) errored",
                        "x".red(),
                        summary.units_failed,
                        summary.units_errored
                    );
                }
                Ok(summary.passed())
            }
            None => {
                println!(
                    "   {} No test summary found in {}",
                    "x".red(),
                    self.log.display()
                );
                Ok(false)
            }
        }
    }
}
