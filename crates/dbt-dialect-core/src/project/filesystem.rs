//! Filesystem walking helpers for dbt project trees.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Project subdirectories that hold hand-written SQL sources.
pub const SOURCE_DIRS: &[&str] = &["models", "macros", "analyses", "tests"];

pub const SQL_EXTENSION: &str = "sql";

/// A `.sql` file found under a project tree.
///
/// Content is read on demand and never cached, so every pass sees the
/// current on-disk state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileArtifact {
    /// Path relative to the walk base, `/`-separated.
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub extension: String,
}

impl FileArtifact {
    fn new(base: &Path, absolute_path: PathBuf) -> Self {
        let relative_path = relative_display(base, &absolute_path);
        let extension = absolute_path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            relative_path,
            absolute_path,
            extension,
        }
    }

    /// File name without its extension.
    pub fn stem(&self) -> String {
        self.absolute_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn read_content(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.absolute_path)
    }
}

/// Render `path` relative to `base` with forward slashes.
pub fn relative_display(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn is_sql_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == SQL_EXTENSION)
}

/// Every `.sql` file below `dir`, in file-name order at each level.
///
/// Relative paths are computed against `base`. A missing `dir` yields nothing.
pub fn iter_sql_files(base: &Path, dir: &Path) -> Vec<FileArtifact> {
    if !dir.is_dir() {
        return vec![];
    }
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_sql_file(e.path()))
        .map(|e| FileArtifact::new(base, e.into_path()))
        .collect()
}

/// `.sql` sources under `models/`, `macros/`, `analyses/` and `tests/`, in
/// that directory order.
pub fn iter_project_sources(project_root: &Path) -> Vec<FileArtifact> {
    SOURCE_DIRS
        .iter()
        .flat_map(|dir| iter_sql_files(project_root, &project_root.join(dir)))
        .collect()
}
