use std::path::PathBuf;

/// Everything that can stop a pipeline run.
///
/// None of these are recovered from: the run halts where the error is
/// detected and nothing already written is rolled back.
#[derive(Debug)]
pub enum DeployError {
    /// Bad, absent or repeated mode argument
    InvalidMode(String),
    /// The release directory for this version is already there
    AlreadyExists(PathBuf),
    /// A version field is present but is not a non-negative integer
    Parse {
        path: PathBuf,
        line: usize,
        value: String,
    },
    /// Copy / mkdir / read failure
    Filesystem { path: PathBuf, source: std::io::Error },
    /// The patch number cannot be incremented any further
    VersionOverflow(semver::Version),
    /// The test gate reported failed or errored units
    TestGateFailure(String),
    /// The build tool failed and the config asks to halt on it
    BuildFailed(String),
    /// `sigma.toml` could not be read or parsed
    Config(String),
}

impl DeployError {
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeployError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

impl std::fmt::Display for DeployError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeployError::InvalidMode(msg) => write!(f, "{}", msg),
            DeployError::AlreadyExists(path) => write!(
                f,
                "Deployment directory already exists: {}. Remove it and retry.",
                path.display()
            ),
            DeployError::Parse { path, line, value } => write!(
                f,
                "Invalid version field in {} (line {}): '{}' is not a non-negative integer",
                path.display(),
                line,
                value
            ),
            DeployError::Filesystem { path, source } => {
                write!(f, "Filesystem error at {}: {}", path.display(), source)
            }
            DeployError::VersionOverflow(version) => write!(
                f,
                "Version {} cannot be bumped: patch is already at its maximum",
                version
            ),
            DeployError::TestGateFailure(msg) => {
                write!(f, "TESTS FAILED: Deployment halted. {}", msg)
            }
            DeployError::BuildFailed(msg) => write!(f, "Build failed: {}", msg),
            DeployError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for DeployError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeployError::Filesystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<walkdir::Error> for DeployError {
    fn from(e: walkdir::Error) -> Self {
        let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
        let source = e
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        DeployError::Filesystem { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_message_names_path() {
        let err = DeployError::AlreadyExists(PathBuf::from("deploy/Project-1.2.4"));
        let msg = err.to_string();
        assert!(msg.contains("already exists"));
        assert!(msg.contains("Project-1.2.4"));
    }

    #[test]
    fn test_filesystem_error_has_source() {
        use std::error::Error;
        let err = DeployError::fs(
            "build",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.source().is_some());
        assert!(err.to_string().contains("build"));
    }
}
