//! Semantic version bookkeeping.
//!
//! The version lives in a small plain-text file at the project root:
//!
//! ```text
//! MAJOR 1
//! MINOR 2
//! PATCH 3
//! ```
//!
//! Reading is permissive: unknown lines are ignored and missing fields
//! default to 0. Writing always produces exactly the three lines above.

use crate::error::DeployError;
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};

const MAJOR: &str = "MAJOR";
const MINOR: &str = "MINOR";
const PATCH: &str = "PATCH";

/// File-backed store for the project's single version record.
#[derive(Debug, Clone)]
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the stored version. A missing file loads as `0.0.0`.
    pub fn load(&self) -> Result<Version, DeployError> {
        if !self.path.exists() {
            return Ok(Version::new(0, 0, 0));
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| DeployError::fs(&self.path, e))?;
        parse_version(&content, &self.path)
    }

    /// Overwrite the file with the three canonical lines.
    pub fn save(&self, version: &Version) -> Result<(), DeployError> {
        fs::write(&self.path, render_version(version)).map_err(|e| DeployError::fs(&self.path, e))
    }
}

/// The version a successful deployment moves to.
pub fn bump_patch(version: &Version) -> Result<Version, DeployError> {
    let patch = version
        .patch
        .checked_add(1)
        .ok_or_else(|| DeployError::VersionOverflow(version.clone()))?;
    Ok(Version::new(version.major, version.minor, patch))
}

pub fn render_version(version: &Version) -> String {
    format!(
        "{MAJOR} {}\n{MINOR} {}\n{PATCH} {}\n",
        version.major, version.minor, version.patch
    )
}

fn parse_version(content: &str, path: &Path) -> Result<Version, DeployError> {
    let mut version = Version::new(0, 0, 0);

    for (idx, line) in content.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let (Some(key), Some(value)) = (tokens.next(), tokens.next()) else {
            continue;
        };

        let slot = match key {
            MAJOR => &mut version.major,
            MINOR => &mut version.minor,
            PATCH => &mut version.patch,
            _ => continue,
        };

        *slot = value.parse::<u64>().map_err(|_| DeployError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            value: value.to_string(),
        })?;
    }

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<Version, DeployError> {
        parse_version(content, Path::new("semver"))
    }

    #[test]
    fn test_parse_full_file() {
        let v = parse("MAJOR 1\nMINOR 2\nPATCH 3\n").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let v = parse("MINOR 7\n").unwrap();
        assert_eq!(v, Version::new(0, 7, 0));
        assert_eq!(parse("").unwrap(), Version::new(0, 0, 0));
    }

    #[test]
    fn test_unknown_and_malformed_lines_are_ignored() {
        let v = parse("# comment\nBUILD 99\nMAJOR\n\nPATCH 4\nMAJOR 2\n").unwrap();
        assert_eq!(v, Version::new(2, 0, 4));
    }

    #[test]
    fn test_non_integer_field_is_parse_error() {
        let err = parse("MAJOR 1\nMINOR two\n").unwrap_err();
        match err {
            DeployError::Parse { line, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(parse("PATCH -1"), Err(DeployError::Parse { .. })));
    }

    #[test]
    fn test_bump_patch_only_touches_patch() {
        assert_eq!(bump_patch(&Version::new(1, 2, 3)).unwrap(), Version::new(1, 2, 4));
    }

    #[test]
    fn test_bump_patch_at_maximum_is_error() {
        let tmp = TempDir::new().unwrap();
        let store = VersionStore::new(tmp.path().join("semver"));
        let content = format!("MAJOR 1\nMINOR 2\nPATCH {}\n", u64::MAX);
        fs::write(store.path(), &content).unwrap();

        let loaded = store.load().unwrap();
        let err = bump_patch(&loaded).unwrap_err();

        assert!(matches!(err, DeployError::VersionOverflow(ref v) if *v == loaded));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), content);
    }

    #[test]
    fn test_save_load_is_byte_stable() {
        let tmp = TempDir::new().unwrap();
        let store = VersionStore::new(tmp.path().join("semver"));

        for v in [
            Version::new(0, 0, 0),
            Version::new(1, 2, 3),
            Version::new(10, 0, 4_000_000_000),
        ] {
            store.save(&v).unwrap();
            let first = fs::read(store.path()).unwrap();
            let loaded = store.load().unwrap();
            assert_eq!(loaded, v);
            store.save(&loaded).unwrap();
            assert_eq!(fs::read(store.path()).unwrap(), first);
        }
    }

    #[test]
    fn test_save_drops_unknown_lines() {
        let tmp = TempDir::new().unwrap();
        let store = VersionStore::new(tmp.path().join("semver"));
        fs::write(store.path(), "NOTE keep me\nPATCH 5\n").unwrap();

        let v = store.load().unwrap();
        store.save(&v).unwrap();

        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "MAJOR 0\nMINOR 0\nPATCH 5\n"
        );
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let tmp = TempDir::new().unwrap();
        let store = VersionStore::new(tmp.path().join("nope"));
        assert!(!store.exists());
        assert_eq!(store.load().unwrap(), Version::new(0, 0, 0));
    }
}
