//! Header tree mirroring.
//!
//! Reproduces the directory structure of a source tree under a destination
//! root and copies in only the files a predicate accepts. Every directory is
//! recreated, including ones that end up empty, so the release `include/`
//! tree has the same shape as the source tree.

use crate::error::DeployError;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Decides which files from the source tree end up in the mirror.
pub trait IncludePredicate {
    fn includes(&self, file_name: &str) -> bool;
}

impl<F: Fn(&str) -> bool> IncludePredicate for F {
    fn includes(&self, file_name: &str) -> bool {
        self(file_name)
    }
}

/// Public headers: a fixed extension, minus anything starting with the
/// private prefix (`__log.hpp` and friends).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFilter {
    pub extension: String,
    pub private_prefix: String,
}

impl Default for HeaderFilter {
    fn default() -> Self {
        Self {
            extension: ".hpp".to_string(),
            private_prefix: "__".to_string(),
        }
    }
}

impl IncludePredicate for HeaderFilter {
    fn includes(&self, file_name: &str) -> bool {
        let private =
            !self.private_prefix.is_empty() && file_name.starts_with(&self.private_prefix);
        !private && file_name.ends_with(&self.extension)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MirrorStats {
    /// Directories created under the destination root
    pub dirs: usize,
    /// Files copied
    pub files: usize,
}

/// Depth-first copy of `src_root`'s structure into `dst_root` (which must
/// exist). Symlinks are not followed while walking: a link to a file is copied
/// as a regular file, a link to a directory becomes an empty directory.
pub fn mirror(
    src_root: &Path,
    dst_root: &Path,
    predicate: &dyn IncludePredicate,
) -> Result<MirrorStats, DeployError> {
    if !src_root.is_dir() {
        return Err(DeployError::fs(
            src_root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "header directory not found"),
        ));
    }

    let mut stats = MirrorStats::default();

    // Pre-order walk: a directory is always yielded before its contents
    let walker = WalkDir::new(src_root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        let rel = path
            .strip_prefix(src_root)
            .map_err(|e| DeployError::fs(path, std::io::Error::other(e)))?;
        let dest = dst_root.join(rel);

        // Resolves symlinks; dangling links report neither dir nor file
        if path.is_dir() {
            fs::create_dir(&dest).map_err(|e| DeployError::fs(&dest, e))?;
            stats.dirs += 1;
        } else if path.is_file() {
            let name = entry.file_name().to_string_lossy();
            if predicate.includes(&name) {
                fs::copy(path, &dest).map_err(|e| DeployError::fs(path, e))?;
                stats.files += 1;
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    fn count(root: &Path) -> (usize, usize) {
        let mut dirs = 0;
        let mut files = 0;
        for entry in WalkDir::new(root).min_depth(1) {
            let entry = entry.unwrap();
            if entry.file_type().is_dir() {
                dirs += 1;
            } else {
                files += 1;
            }
        }
        (dirs, files)
    }

    #[test]
    fn test_header_filter() {
        let filter = HeaderFilter::default();
        assert!(filter.includes("Vector.hpp"));
        assert!(!filter.includes("__log.hpp"));
        assert!(!filter.includes("Stream.cpp"));
        assert!(!filter.includes("Vector.hpp.bak"));
        assert!(filter.includes("_single.hpp"));
    }

    #[test]
    fn test_mirror_preserves_structure_and_filters() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("include");
        fs::create_dir(&dst).unwrap();

        write(&src, "a/x.hpp");
        write(&src, "a/__priv.hpp");
        write(&src, "a/x.cpp");
        write(&src, "b/y.hpp");
        write(&src, "b/deep/z.hpp");
        write(&src, "top.hpp");
        fs::create_dir_all(src.join("c/empty")).unwrap();
        write(&src, "c/only.cpp");

        let stats = mirror(&src, &dst, &HeaderFilter::default()).unwrap();

        // a, b, b/deep, c, c/empty
        assert_eq!(stats, MirrorStats { dirs: 5, files: 4 });
        assert_eq!(count(&dst), (5, 4));
        assert!(dst.join("a/x.hpp").is_file());
        assert!(dst.join("b/y.hpp").is_file());
        assert!(dst.join("b/deep/z.hpp").is_file());
        assert!(dst.join("top.hpp").is_file());
        assert!(!dst.join("a/__priv.hpp").exists());
        assert!(!dst.join("a/x.cpp").exists());
        assert!(dst.join("c/empty").is_dir());
        assert_eq!(fs::read_to_string(dst.join("b/y.hpp")).unwrap(), "b/y.hpp");
    }

    #[test]
    fn test_mirror_with_closure_predicate() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("out");
        fs::create_dir(&dst).unwrap();
        write(&src, "k/a.h");
        write(&src, "k/b.hpp");

        let only_h = |name: &str| name.ends_with(".h");
        let stats = mirror(&src, &dst, &only_h).unwrap();

        assert_eq!(stats, MirrorStats { dirs: 1, files: 1 });
        assert!(dst.join("k/a.h").exists());
    }

    #[test]
    fn test_missing_source_is_filesystem_error() {
        let tmp = TempDir::new().unwrap();
        let err = mirror(
            &tmp.path().join("nope"),
            tmp.path(),
            &HeaderFilter::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DeployError::Filesystem { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_copied_as_plain_entries() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("out");
        fs::create_dir(&dst).unwrap();
        write(&src, "real/a.hpp");
        std::os::unix::fs::symlink(src.join("real/a.hpp"), src.join("link.hpp")).unwrap();
        std::os::unix::fs::symlink(src.join("real"), src.join("linkdir")).unwrap();

        let stats = mirror(&src, &dst, &HeaderFilter::default()).unwrap();

        assert_eq!(stats, MirrorStats { dirs: 2, files: 2 });
        let link_meta = fs::symlink_metadata(dst.join("link.hpp")).unwrap();
        assert!(link_meta.file_type().is_file());
        assert!(dst.join("linkdir").is_dir());
        assert!(!dst.join("linkdir/a.hpp").exists());
    }
}
