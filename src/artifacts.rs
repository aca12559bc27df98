use crate::error::DeployError;
use std::fs;
use std::path::{Path, PathBuf};

/// Shared-library extensions produced on the host platform.
pub fn host_extensions() -> Vec<String> {
    let ext = if cfg!(target_os = "windows") {
        ".dll"
    } else if cfg!(target_os = "macos") {
        ".dylib"
    } else {
        ".so"
    };
    vec![ext.to_string()]
}

/// Picks release binaries out of a flat build output directory.
#[derive(Debug, Clone)]
pub struct ArtifactCollector {
    extensions: Vec<String>,
}

impl ArtifactCollector {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    pub fn for_host() -> Self {
        Self::new(host_extensions())
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }

    /// Files directly inside `build_dir` whose name ends with a configured
    /// extension. Subdirectories are not searched. An empty result is not an
    /// error.
    pub fn collect(&self, build_dir: &Path) -> Result<Vec<PathBuf>, DeployError> {
        let entries = fs::read_dir(build_dir).map_err(|e| DeployError::fs(build_dir, e))?;

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DeployError::fs(build_dir, e))?;
            let path = entry.path();
            let name = entry.file_name();
            // `is_file` follows symlinks, so linked libraries are picked up too
            if path.is_file() && self.matches(&name.to_string_lossy()) {
                found.push(path);
            }
        }

        found.sort();
        Ok(found)
    }
}

/// Copy every artifact into `lib_dir`, keeping file names.
pub fn copy_into(artifacts: &[PathBuf], lib_dir: &Path) -> Result<Vec<PathBuf>, DeployError> {
    let mut copied = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let Some(name) = artifact.file_name() else {
            continue;
        };
        let dest = lib_dir.join(name);
        fs::copy(artifact, &dest).map_err(|e| DeployError::fs(artifact, e))?;
        copied.push(dest);
    }
    Ok(copied)
}
