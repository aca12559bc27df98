use crate::error::DeployError;
use crate::pipeline::Mode;
use colored::*;
use std::process::Command;

/// External build tool the compile stage hands targets to.
pub trait BuildTool {
    /// Build `targets`; `Ok(true)` when the tool exited successfully.
    fn run(&self, targets: &[String]) -> Result<bool, DeployError>;
}

/// `make <targets...>` with inherited stdio.
#[derive(Debug, Clone)]
pub struct MakeTool {
    pub program: String,
}

impl MakeTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl BuildTool for MakeTool {
    fn run(&self, targets: &[String]) -> Result<bool, DeployError> {
        println!(
            "   {} Running: {} {}",
            "🔧".cyan(),
            self.program,
            targets.join(" ")
        );

        match Command::new(&self.program).args(targets).status() {
            Ok(status) => Ok(status.success()),
            Err(e) => {
                println!("{} Failed to start '{}': {}", "x".red(), self.program, e);
                Ok(false)
            }
        }
    }
}

/// Targets handed to the build tool for `mode`. `libs` expands to the
/// configured library targets, every other mode is its own target.
pub fn targets_for(mode: Mode, lib_targets: &[String]) -> Vec<String> {
    match mode {
        Mode::Libs => lib_targets.to_vec(),
        other => vec![other.as_str().to_string()],
    }
}
