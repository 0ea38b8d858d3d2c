//! Resolve a loosely-specified model or macro name to project files.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::models::ResolutionResult;
use crate::project::filesystem::{iter_project_sources, FileArtifact};

/// Lower-case a search term and drop one trailing `.sql`.
fn normalize_term(term: &str) -> String {
    let lowered = term.trim().to_lowercase();
    match lowered.strip_suffix(".sql") {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

struct SearchTerm {
    /// The whole term, normalized.
    full: String,
    /// Final path component of the term, normalized.
    file_name: String,
}

impl SearchTerm {
    fn new(term: &str) -> Self {
        let full = normalize_term(term);
        let file_name = full
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(full.as_str())
            .to_string();
        Self { full, file_name }
    }

    fn matches(&self, file: &FileArtifact) -> bool {
        let stem = file.stem().to_lowercase();
        if stem == self.full || stem.contains(&self.full) {
            return true;
        }
        if !self.file_name.is_empty() && stem.contains(&self.file_name) {
            return true;
        }
        file.relative_path.to_lowercase().contains(&self.full)
    }
}

/// All source files whose stem or relative path could be `term`.
///
/// The result is deduplicated and sorted, and reflects the tree as it is on
/// disk at call time.
pub fn resolve(project_root: &Path, term: &str) -> Vec<String> {
    let search = SearchTerm::new(term);
    let matches: BTreeSet<String> = iter_project_sources(project_root)
        .into_iter()
        .filter(|file| search.matches(file))
        .map(|file| file.relative_path)
        .collect();
    debug!("Resolved {:?} to {} file(s)", term, matches.len());
    matches.into_iter().collect()
}

/// [`resolve`], classified into found / ambiguous / not found.
pub fn resolve_one(project_root: &Path, term: &str) -> ResolutionResult {
    ResolutionResult::from_matches(resolve(project_root, term))
}
