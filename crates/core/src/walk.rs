//! Source tree traversal
//!
//! Yields every non-directory entry below a root, depth first, with entries
//! sorted by file name inside each directory. The walk is lazy and single
//! pass; the first error is handed to the caller, who decides whether to stop.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// A file found below the source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as found on disk (root joined with the relative path)
    pub path: PathBuf,
    /// Path relative to the source root
    pub relative: PathBuf,
}

/// Lazy iterator over the files of a source tree
pub struct SourceFiles {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl SourceFiles {
    /// Start walking `root`
    ///
    /// The root itself is never yielded, so a root that is a plain file
    /// produces nothing.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let inner = WalkDir::new(&root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();
        Self { root, inner }
    }
}

impl Iterator for SourceFiles {
    type Item = Result<SourceFile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.into_path();
            let relative = path
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());

            return Some(Ok(SourceFile { path, relative }));
        }
    }
}
