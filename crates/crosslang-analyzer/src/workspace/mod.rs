//! The built-in [`SymbolSource`](crate::bridge::SymbolSource): open editor
//! buffers layered over the files on disk.

pub mod outline;
mod source;

use std::{
    collections::HashSet,
    ffi::OsStr,
    path::{Path, PathBuf},
};

pub use source::WorkspaceSource;
use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRECTORIES: [&str; 8] = ["target", "build", "node_modules", "out", "bin", "obj", "dist", "vendor"];

/// Workspace roots plus the user's excluded paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceScope {
    roots: Vec<PathBuf>,
    excluded_prefixes: Vec<PathBuf>,
}

impl WorkspaceScope {
    /// Relative entries of `exclude_paths` are resolved against every root.
    pub fn new(
        roots: Vec<PathBuf>,
        exclude_paths: &[String],
    ) -> Self {
        let mut excluded_prefixes = Vec::new();
        let mut seen = HashSet::new();
        for raw_path in exclude_paths {
            let exclude_path = PathBuf::from(raw_path);
            let candidates: Vec<PathBuf> = if exclude_path.is_absolute() {
                vec![exclude_path]
            } else {
                roots.iter().map(|root| root.join(&exclude_path)).collect()
            };
            for candidate in candidates {
                let normalized = normalize_path(&candidate);
                if seen.insert(normalized.clone()) {
                    excluded_prefixes.push(normalized);
                }
            }
        }
        Self {
            roots,
            excluded_prefixes,
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn is_excluded(
        &self,
        path: &Path,
    ) -> bool {
        if self.excluded_prefixes.is_empty() {
            return false;
        }
        let normalized = normalize_path(path);
        self.excluded_prefixes.iter().any(|prefix| normalized.starts_with(prefix))
    }

    /// Every file below the roots (or below `fallback_root` when no roots are
    /// known) whose extension is in `extensions`, sorted.
    pub fn files_with_extensions(
        &self,
        extensions: &[&str],
        fallback_root: Option<&Path>,
    ) -> Vec<PathBuf> {
        let roots: Vec<&Path> = if self.roots.is_empty() {
            fallback_root.into_iter().collect()
        } else {
            self.roots.iter().map(PathBuf::as_path).collect()
        };

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for root in roots {
            for entry in WalkDir::new(root)
                .follow_links(true)
                .into_iter()
                .filter_entry(|entry| self.should_descend(entry))
                .filter_map(|entry| entry.ok())
            {
                if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
                    continue;
                }
                if seen.insert(entry.path().to_path_buf()) {
                    files.push(entry.into_path());
                }
            }
        }
        files.sort();
        files
    }

    fn should_descend(
        &self,
        entry: &DirEntry,
    ) -> bool {
        if self.is_excluded(entry.path()) {
            return false;
        }
        if !entry.file_type().is_dir() || entry.depth() == 0 {
            return true;
        }
        let Some(name) = entry.file_name().to_str() else {
            return false;
        };
        !name.starts_with('.') && !SKIPPED_DIRECTORIES.contains(&name)
    }
}

pub(crate) fn has_extension(
    path: &Path,
    extensions: &[&str],
) -> bool {
    path.extension().and_then(OsStr::to_str).is_some_and(|extension| extensions.contains(&extension))
}

fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
#[path = "../../tests/src/workspace/scope_tests.rs"]
mod tests;
