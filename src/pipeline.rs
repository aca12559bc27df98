//! Compile → test gate → deploy sequencing.
//!
//! A run walks the stages strictly in order, each at most once:
//!
//! ```text
//! Validate -> Compile? -> TestGate? -> Deploy? -> Done
//! ```
//!
//! | mode     | compile | test gate | deploy |
//! |----------|---------|-----------|--------|
//! | `all`    | yes     | yes       | yes    |
//! | `tests`  | yes     | yes       | no     |
//! | `libs`   | yes     | no        | no     |
//! | `deploy` | no      | no        | yes    |
//!
//! The version file is only written after a release has been assembled, so a
//! halted run leaves it exactly as it was.

use crate::build::{self, BuildTool};
use crate::config::SigmaConfig;
use crate::error::DeployError;
use crate::gate::TestGate;
use crate::release::{ReleaseAssembler, ReleaseDescriptor};
use crate::ui;
use crate::version::{self, VersionStore};
use colored::*;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    All,
    Tests,
    Libs,
    Deploy,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::All, Mode::Tests, Mode::Libs, Mode::Deploy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::All => "all",
            Mode::Tests => "tests",
            Mode::Libs => "libs",
            Mode::Deploy => "deploy",
        }
    }

    /// Validate the raw CLI arguments: none means `all`, one must name a
    /// mode, more than one is rejected.
    pub fn from_args(args: &[String]) -> Result<Mode, DeployError> {
        match args {
            [] => Ok(Mode::All),
            [arg] => arg.parse(),
            _ => Err(DeployError::InvalidMode(
                "No more than one build argument may be provided.".to_string(),
            )),
        }
    }

    pub fn compiles(&self) -> bool {
        *self != Mode::Deploy
    }

    pub fn runs_test_gate(&self) -> bool {
        matches!(self, Mode::All | Mode::Tests)
    }

    pub fn deploys(&self) -> bool {
        matches!(self, Mode::All | Mode::Deploy)
    }
}

impl FromStr for Mode {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Mode::ALL.iter().map(|m| m.as_str()).collect();
                DeployError::InvalidMode(format!(
                    "Unknown mode: {}. Expected one of: {}.",
                    s,
                    known.join(", ")
                ))
            })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Validate,
    Compile,
    TestGate,
    Deploy,
    Done,
}

/// What a completed run did.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub stages: Vec<Stage>,
    /// `None` when the compile stage did not run
    pub build_succeeded: Option<bool>,
    pub release: Option<ReleaseDescriptor>,
}

impl Outcome {
    fn new() -> Self {
        Self {
            stages: vec![Stage::Validate],
            build_succeeded: None,
            release: None,
        }
    }

    fn enter(&mut self, stage: Stage) {
        debug_assert!(self.stages.last().is_some_and(|last| *last < stage));
        self.stages.push(stage);
    }
}

pub struct Pipeline<'a> {
    config: &'a SigmaConfig,
    versions: &'a VersionStore,
    build_tool: &'a dyn BuildTool,
    gate: &'a dyn TestGate,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a SigmaConfig,
        versions: &'a VersionStore,
        build_tool: &'a dyn BuildTool,
        gate: &'a dyn TestGate,
    ) -> Self {
        Self {
            config,
            versions,
            build_tool,
            gate,
        }
    }

    /// Validate raw CLI arguments, then run.
    pub fn run_args(&self, args: &[String]) -> Result<Outcome, DeployError> {
        let mode = Mode::from_args(args)?;
        self.run(mode)
    }

    pub fn run(&self, mode: Mode) -> Result<Outcome, DeployError> {
        let mut outcome = Outcome::new();

        if mode.compiles() {
            outcome.enter(Stage::Compile);
            outcome.build_succeeded = Some(self.compile(mode)?);
        }

        if mode.runs_test_gate() {
            outcome.enter(Stage::TestGate);
            if !self.gate.passed()? {
                return Err(DeployError::TestGateFailure(
                    "The test run reported failed or errored units.".to_string(),
                ));
            }
            println!("   {} Test gate passed", "✓".green());
        }

        if mode.deploys() {
            outcome.enter(Stage::Deploy);
            outcome.release = Some(self.deploy()?);
        }

        outcome.enter(Stage::Done);
        ui::banner("done");
        Ok(outcome)
    }

    fn compile(&self, mode: Mode) -> Result<bool, DeployError> {
        ui::banner("compiling...");
        let targets = build::targets_for(mode, &self.config.build.lib_targets);
        let ok = self.build_tool.run(&targets)?;

        if !ok {
            if self.config.build.halt_on_failure {
                return Err(DeployError::BuildFailed(format!(
                    "'{} {}' did not succeed",
                    self.config.build.program,
                    targets.join(" ")
                )));
            }
            println!(
                "{} Build tool reported a failure; continuing \
                 (set build.halt_on_failure to stop here)",
                "!".yellow()
            );
        }
        Ok(ok)
    }

    fn deploy(&self) -> Result<ReleaseDescriptor, DeployError> {
        ui::banner("deploying...");

        if !self.versions.exists() {
            println!(
                "{} No version file at {}; starting from 0.0.0",
                "!".yellow(),
                self.versions.path().display()
            );
        }
        let current = self.versions.load()?;
        let next = version::bump_patch(&current)?;

        let assembler = ReleaseAssembler::from_config(self.config);
        let release = assembler.assemble(&next)?;

        self.versions.save(&next)?;

        println!();
        println!("DEPLOYMENT NAME: {}", release.name.bold().green());
        println!();
        print_summary(&release);
        Ok(release)
    }
}

fn print_summary(release: &ReleaseDescriptor) {
    let mut table = ui::Table::new(&["Release", "Value"]);
    table.add_row(vec!["Name".to_string(), release.name.clone()]);
    table.add_row(vec![
        "Location".to_string(),
        release.root.display().to_string(),
    ]);
    table.add_row(vec![
        "Libraries".to_string(),
        release.artifacts.len().to_string(),
    ]);
    table.add_row(vec![
        "Headers".to_string(),
        format!(
            "{} files, {} directories",
            release.headers.files, release.headers.dirs
        ),
    ]);
    table.print();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_args_accepts_every_mode() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_args(&args(&[mode.as_str()])).unwrap(), mode);
        }
    }

    #[test]
    fn test_from_args_defaults_to_all() {
        assert_eq!(Mode::from_args(&[]).unwrap(), Mode::All);
    }

    #[test]
    fn test_from_args_rejects_unknown_and_extra() {
        let cases: [&[&str]; 5] = [
            &["release"],
            &["ALL"],
            &[""],
            &["all", "deploy"],
            &["tests", "tests"],
        ];
        for bad in cases {
            let err = Mode::from_args(&args(bad)).unwrap_err();
            assert!(matches!(err, DeployError::InvalidMode(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_stage_table() {
        let table = |m: Mode| (m.compiles(), m.runs_test_gate(), m.deploys());
        assert_eq!(table(Mode::All), (true, true, true));
        assert_eq!(table(Mode::Tests), (true, true, false));
        assert_eq!(table(Mode::Libs), (true, false, false));
        assert_eq!(table(Mode::Deploy), (false, false, true));
    }

    #[test]
    fn test_stage_order() {
        assert!(Stage::Validate < Stage::Compile);
        assert!(Stage::Compile < Stage::TestGate);
        assert!(Stage::TestGate < Stage::Deploy);
        assert!(Stage::Deploy < Stage::Done);
    }
}
