//! Release assembly.
//!
//! A release is a fresh directory named `<Project>-<major>.<minor>.<patch>`
//! under the deploy directory:
//!
//! ```text
//! deploy/ChaosCore-1.2.4/
//! ├── lib/        shared libraries from the build directory (flat)
//! └── include/    public headers, same tree as the source header dir
//! ```
//!
//! An existing release directory is never touched. A failure halfway through
//! leaves whatever was already copied in place; there is no rollback.

use crate::artifacts::{self, ArtifactCollector};
use crate::config::SigmaConfig;
use crate::error::DeployError;
use crate::mirror::{self, HeaderFilter, MirrorStats};
use colored::*;
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    pub name: String,
    pub version: Version,
    pub root: PathBuf,
    pub lib_dir: PathBuf,
    pub include_dir: PathBuf,
    /// Paths of the copied libraries inside `lib_dir`
    pub artifacts: Vec<PathBuf>,
    pub headers: MirrorStats,
}

pub fn release_name(project_name: &str, version: &Version) -> String {
    format!(
        "{}-{}.{}.{}",
        project_name, version.major, version.minor, version.patch
    )
}

/// Where releases come from and where they go.
#[derive(Debug, Clone)]
pub struct ReleaseAssembler {
    pub project_name: String,
    pub build_dir: PathBuf,
    pub header_dir: PathBuf,
    pub deploy_dir: PathBuf,
    pub collector: ArtifactCollector,
    pub headers: HeaderFilter,
}

impl ReleaseAssembler {
    pub fn from_config(config: &SigmaConfig) -> Self {
        Self {
            project_name: config.project_name.clone(),
            build_dir: config.build_dir.clone(),
            header_dir: config.header_dir.clone(),
            deploy_dir: config.deploy_dir.clone(),
            collector: ArtifactCollector::new(config.artifacts.extensions.clone()),
            headers: config.headers.filter(),
        }
    }

    pub fn destination(&self, version: &Version) -> PathBuf {
        self.deploy_dir.join(release_name(&self.project_name, version))
    }

    pub fn assemble(&self, version: &Version) -> Result<ReleaseDescriptor, DeployError> {
        let name = release_name(&self.project_name, version);
        let root = self.deploy_dir.join(&name);

        if root.exists() {
            return Err(DeployError::AlreadyExists(root));
        }

        create_dir(&root, true)?;
        let lib_dir = root.join("lib");
        create_dir(&lib_dir, false)?;
        let include_dir = root.join("include");
        create_dir(&include_dir, false)?;

        let found = self.collector.collect(&self.build_dir)?;
        if found.is_empty() {
            println!(
                "   {} No {} libraries found in {}",
                "!".yellow(),
                self.collector.extensions().join("/"),
                self.build_dir.display()
            );
        }
        let copied = artifacts::copy_into(&found, &lib_dir)?;
        for lib in &copied {
            if let Some(file) = lib.file_name() {
                println!("   {} lib/{}", "+".green(), file.to_string_lossy());
            }
        }

        let headers = mirror::mirror(&self.header_dir, &include_dir, &self.headers)?;
        println!(
            "   {} include/ ({} headers in {} directories)",
            "+".green(),
            headers.files,
            headers.dirs
        );

        Ok(ReleaseDescriptor {
            name,
            version: version.clone(),
            root,
            lib_dir,
            include_dir,
            artifacts: copied,
            headers,
        })
    }
}

fn create_dir(path: &Path, with_parents: bool) -> Result<(), DeployError> {
    let result = if with_parents {
        fs::create_dir_all(path)
    } else {
        fs::create_dir(path)
    };
    result.map_err(|e| DeployError::fs(path, e))
}
