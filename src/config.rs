//! Project configuration (`sigma.toml`).
//!
//! Every key is optional; a project without a `sigma.toml` gets the layout
//! below.
//!
//! ```toml
//! project_name = "ChaosCore"
//! version_file = "semver"
//! build_dir = "build/linux_x86"
//! header_dir = "src/cxx"
//! deploy_dir = "deploy"
//!
//! [build]
//! program = "make"
//! lib_targets = ["chaoscore_base", "chaoscore_io", "chaoscore_gfx", "chaoscore_test"]
//! halt_on_failure = false
//!
//! [artifacts]
//! extensions = [".so"]
//!
//! [headers]
//! extension = ".hpp"
//! private_prefix = "__"
//!
//! [test_gate]
//! enabled = false
//! command = "./build/linux_x86/tests --stdout pretty 3 --fileout logs/tests/log.xml xml 3"
//! log = "logs/tests/log.xml"
//! ```

use crate::artifacts;
use crate::error::DeployError;
use crate::mirror::HeaderFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "sigma.toml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SigmaConfig {
    pub project_name: String,
    pub version_file: PathBuf,
    pub build_dir: PathBuf,
    pub header_dir: PathBuf,
    pub deploy_dir: PathBuf,
    pub build: BuildConfig,
    pub artifacts: ArtifactsConfig,
    pub headers: HeadersConfig,
    pub test_gate: TestGateConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub program: String,
    pub lib_targets: Vec<String>,
    /// Stop before the test gate when the build tool exits non-zero
    pub halt_on_failure: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactsConfig {
    pub extensions: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HeadersConfig {
    pub extension: String,
    pub private_prefix: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TestGateConfig {
    pub enabled: bool,
    pub command: Option<String>,
    pub log: PathBuf,
}

impl Default for SigmaConfig {
    fn default() -> Self {
        Self {
            project_name: "ChaosCore".to_string(),
            version_file: PathBuf::from("semver"),
            build_dir: PathBuf::from("build").join("linux_x86"),
            header_dir: PathBuf::from("src").join("cxx"),
            deploy_dir: PathBuf::from("deploy"),
            build: BuildConfig::default(),
            artifacts: ArtifactsConfig::default(),
            headers: HeadersConfig::default(),
            test_gate: TestGateConfig::default(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: "make".to_string(),
            lib_targets: ["chaoscore_base", "chaoscore_io", "chaoscore_gfx", "chaoscore_test"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            halt_on_failure: false,
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            extensions: artifacts::host_extensions(),
        }
    }
}

impl Default for HeadersConfig {
    fn default() -> Self {
        let filter = HeaderFilter::default();
        Self {
            extension: filter.extension,
            private_prefix: filter.private_prefix,
        }
    }
}

impl Default for TestGateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: None,
            log: PathBuf::from("logs").join("tests").join("log.xml"),
        }
    }
}

impl HeadersConfig {
    pub fn filter(&self) -> HeaderFilter {
        HeaderFilter {
            extension: self.extension.clone(),
            private_prefix: self.private_prefix.clone(),
        }
    }
}

impl SigmaConfig {
    /// Read `<root>/sigma.toml` (or use defaults) and anchor every relative
    /// path at `root`.
    pub fn load(root: &Path) -> Result<Self, DeployError> {
        let path = root.join(CONFIG_FILE);
        let config = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                DeployError::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            Self::parse(&content)?
        } else {
            Self::default()
        };
        Ok(config.rooted_at(root))
    }

    pub fn parse(content: &str) -> Result<Self, DeployError> {
        toml::from_str(content).map_err(|e| DeployError::Config(format!("{}: {}", CONFIG_FILE, e)))
    }

    pub fn rooted_at(mut self, root: &Path) -> Self {
        self.version_file = root.join(&self.version_file);
        self.build_dir = root.join(&self.build_dir);
        self.header_dir = root.join(&self.header_dir);
        self.deploy_dir = root.join(&self.deploy_dir);
        self.test_gate.log = root.join(&self.test_gate.log);
        self
    }
}
