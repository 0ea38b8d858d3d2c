//! Resolve, read, translate and persist a single project file.
//!
//! The request moves through `Resolving → Found → Reading → Delegating →
//! Persisting`. Every exit, including ambiguity and I/O failures, is returned
//! as a [`TranslationOutcome`].

use std::path::{Component, Path};

use tracing::{debug, info, warn};

use crate::config::ProjectConfig;
use crate::models::{ResolutionResult, TranslationErrorKind, TranslationOutcome, Warehouse};
use crate::project::resolver::resolve_one;
use crate::translate::collaborator::Translator;

fn failure(kind: TranslationErrorKind, reason: String) -> TranslationOutcome {
    TranslationOutcome::Error {
        kind,
        reason,
        translated_content: None,
    }
}

pub struct TranslationRouter<'a, T: Translator> {
    config: &'a ProjectConfig,
    translator: T,
}

impl<'a, T: Translator> TranslationRouter<'a, T> {
    pub fn new(config: &'a ProjectConfig, translator: T) -> Self {
        Self { config, translator }
    }

    /// Project-relative form of a requested path, or `None` when the path
    /// could point outside the project.
    fn project_relative(&self, requested: &str) -> Option<String> {
        let path = Path::new(requested);
        let rel = if path.is_absolute() {
            path.strip_prefix(self.config.root()).ok()?
        } else {
            path
        };
        if rel.components().any(|c| matches!(c, Component::ParentDir)) {
            return None;
        }
        Some(rel.to_string_lossy().replace('\\', "/"))
    }

    /// Settle on one project-relative path, or stop with a terminal outcome.
    fn resolve(&self, requested: &str) -> Result<String, TranslationOutcome> {
        if let Some(rel) = self.project_relative(requested) {
            let exact = self.config.root().join(&rel);
            if exact.is_file() {
                debug!("File found: {}", exact.display());
                return Ok(rel);
            }
            info!("File not found at exact path: {}", exact.display());
        }

        match resolve_one(self.config.root(), requested) {
            ResolutionResult::Found(path) => {
                info!("Found matching file: {path}");
                Ok(path)
            }
            ResolutionResult::Ambiguous { candidates, total } => {
                Err(TranslationOutcome::ClarificationNeeded {
                    candidates,
                    total_matches: total,
                    original_path: requested.to_string(),
                })
            }
            ResolutionResult::NotFound => Err(failure(
                TranslationErrorKind::NotFound,
                format!(
                    "File not found at '{requested}'. No similar files found in the dbt project. \
                     Please provide the full path relative to the dbt project root."
                ),
            )),
        }
    }

    /// Translate `requested` from `source` to `target` and save the result
    /// under `translated/<target>/`.
    ///
    /// Warehouse tags are validated before the file system is touched. The
    /// output file is overwritten on every run.
    pub fn translate(&self, requested: &str, source: &str, target: &str) -> TranslationOutcome {
        let (source, target) = match (Warehouse::parse(source), Warehouse::parse(target)) {
            (Ok(s), Ok(t)) => (s, t),
            (Err(e), _) | (_, Err(e)) => {
                return failure(TranslationErrorKind::UnknownWarehouse, e.to_string())
            }
        };
        info!(
            "Translating {requested} in {} from {source} to {target}",
            self.config.root().display()
        );

        let resolved = match self.resolve(requested) {
            Ok(path) => path,
            Err(outcome) => return outcome,
        };
        let source_file = self.config.root().join(&resolved);

        let content = match std::fs::read_to_string(&source_file) {
            Ok(c) => c,
            Err(e) => {
                return failure(
                    TranslationErrorKind::Read,
                    format!("Error reading file: {e}"),
                )
            }
        };

        let translated = match self.translator.translate(&content, source, target) {
            Ok(t) => t,
            Err(e) => {
                return failure(
                    TranslationErrorKind::Translate,
                    format!("Error during translation: {e}"),
                )
            }
        };

        let saved_path = self.config.translated_dir(target).join(&resolved);
        if let Err(e) = write_output(&saved_path, &translated) {
            warn!("Could not write {}: {e}", saved_path.display());
            return TranslationOutcome::Error {
                kind: TranslationErrorKind::Write,
                reason: format!("Error writing translated file: {e}"),
                translated_content: Some(translated),
            };
        }
        info!("Saved translation to {}", saved_path.display());

        let original_path = (resolved != requested).then(|| requested.to_string());
        TranslationOutcome::Success {
            content: translated,
            saved_path,
            source_file,
            resolved_path: resolved,
            original_path,
            source,
            target,
        }
    }
}

fn write_output(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)
}
