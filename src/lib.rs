//! # sigma - build, gate and deploy native libraries
//!
//! sigma drives an external build tool for a C/C++ library project, can
//! hold deployment back on a failing test run, and packages each successful
//! deployment into a fresh, versioned release directory:
//!
//! ```text
//! deploy/<Project>-<major>.<minor>.<patch>/
//! ├── lib/       shared libraries
//! └── include/   public headers
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! sigma          # compile everything, gate on tests, deploy
//! sigma libs     # compile the library targets only
//! sigma deploy   # package what is already built
//! ```
//!
//! ## Module Organization
//!
//! - [`pipeline`] - mode validation and stage sequencing
//! - [`release`] - release directory assembly
//! - [`version`] - the persisted `MAJOR`/`MINOR`/`PATCH` file
//! - [`artifacts`] / [`mirror`] - what goes into `lib/` and `include/`
//! - [`build`] / [`gate`] - external build tool and test gate collaborators

/// Shared-library collection from the build directory.
pub mod artifacts;

/// External build tool invocation.
pub mod build;

/// Project configuration (`sigma.toml`).
pub mod config;

/// Error type shared by every stage.
pub mod error;

/// Test gate collaborators.
pub mod gate;

/// Header tree mirroring.
pub mod mirror;

/// Stage sequencing and mode validation.
pub mod pipeline;

/// Release directory assembly.
pub mod release;

/// Terminal UI utilities (banners, tables).
pub mod ui;

/// Semantic version file.
pub mod version;

pub use error::DeployError;
pub use pipeline::{Mode, Outcome, Pipeline, Stage};
