//! dbt dialect core library: warehouse dialect detection, fuzzy file
//! resolution, data-modeling classification and translation routing for dbt
//! projects.
//!
//! The library is usable from Rust directly, from the `dbt-dialect` CLI, and,
//! with the `python` feature, as the `_dbt_dialect_core` Python extension
//! module that backs the conversational agent's tools.

pub mod compile;
pub mod config;
pub mod dialect;
pub mod errors;
pub mod modeling;
pub mod models;
pub mod project;
pub mod tools;
pub mod translate;

#[cfg(feature = "python")]
mod python;

pub use config::ProjectConfig;
pub use errors::{DialectError, DialectResult};
pub use models::{
    ResolutionResult, SchemaGuess, SchemaPattern, Status, TranslationCandidate,
    TranslationOutcome, Warehouse,
};
pub use translate::collaborator::{CommandTranslator, Translator};
pub use translate::router::TranslationRouter;
