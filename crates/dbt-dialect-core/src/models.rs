//! Shared typed models used across scanning, resolution, classification and
//! translation.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::{DialectError, DialectResult};

/// Maximum number of paths surfaced when a search term is ambiguous.
pub const MAX_SUGGESTIONS: usize = 10;

// ---------------------------------------------------------------------------
// Warehouse
// ---------------------------------------------------------------------------

/// SQL dialect of one analytical warehouse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Warehouse {
    Snowflake,
    Bigquery,
    Redshift,
    Postgres,
}

impl Warehouse {
    pub const ALL: [Warehouse; 4] = [
        Warehouse::Snowflake,
        Warehouse::Bigquery,
        Warehouse::Redshift,
        Warehouse::Postgres,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Warehouse::Snowflake => "snowflake",
            Warehouse::Bigquery => "bigquery",
            Warehouse::Redshift => "redshift",
            Warehouse::Postgres => "postgres",
        }
    }

    /// Parse a warehouse tag, ignoring case and surrounding whitespace.
    pub fn parse(tag: &str) -> DialectResult<Self> {
        let normalized = tag.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.as_str() == normalized)
            .ok_or_else(|| DialectError::UnknownWarehouse(tag.to_string()))
    }
}

impl FromStr for Warehouse {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Warehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Top-level `status` field of every payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
    ClarificationNeeded,
}

/// Build an error payload with no operation-specific fields.
pub fn error_payload(message: impl Into<String>) -> Value {
    json!({
        "status": Status::Error,
        "message": message.into(),
    })
}

// ---------------------------------------------------------------------------
// TranslationCandidate
// ---------------------------------------------------------------------------

/// A source file containing syntax specific to the scanned warehouse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationCandidate {
    /// Path relative to the project root, `/`-separated.
    pub file: String,
    pub full_path: PathBuf,
    /// Distinct labels of the rules that matched, in catalog order.
    pub detected_syntax: IndexSet<String>,
}

impl TranslationCandidate {
    pub fn pattern_count(&self) -> usize {
        self.detected_syntax.len()
    }

    pub fn to_json(&self) -> Value {
        json!({
            "file": self.file,
            "full_path": self.full_path.to_string_lossy(),
            "detected_syntax": self.detected_syntax.iter().collect::<Vec<_>>(),
            "pattern_count": self.pattern_count(),
        })
    }
}

/// Ranked candidates for one source warehouse.
#[derive(Clone, Debug)]
pub struct ScanReport {
    pub source: Warehouse,
    pub target: Option<Warehouse>,
    pub candidates: Vec<TranslationCandidate>,
}

impl ScanReport {
    pub fn message(&self) -> String {
        if self.candidates.is_empty() {
            return format!(
                "No {}-specific syntax detected in the dbt project. Your project may already be \
                 warehouse-agnostic or using a different warehouse syntax.",
                self.source
            );
        }
        let target_msg = self
            .target
            .map(|t| format!(" to {t}"))
            .unwrap_or_default();
        format!(
            "Found {} file(s) with {}-specific syntax that may need translation{}.",
            self.candidates.len(),
            self.source,
            target_msg
        )
    }

    pub fn to_json(&self) -> Value {
        json!({
            "status": Status::Success,
            "message": self.message(),
            "candidates": self.candidates.iter().map(TranslationCandidate::to_json).collect::<Vec<_>>(),
            "total_files": self.candidates.len(),
            "source_warehouse": self.source,
            "target_warehouse": self.target,
        })
    }
}

// ---------------------------------------------------------------------------
// ResolutionResult
// ---------------------------------------------------------------------------

/// Outcome of resolving a loosely-specified file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionResult {
    Found(String),
    /// At most [`MAX_SUGGESTIONS`] candidates; `total` is the full match count.
    Ambiguous {
        candidates: Vec<String>,
        total: usize,
    },
    NotFound,
}

impl ResolutionResult {
    /// Classify a sorted, deduplicated match set.
    pub fn from_matches(mut matches: Vec<String>) -> Self {
        match matches.len() {
            0 => ResolutionResult::NotFound,
            1 => ResolutionResult::Found(matches.remove(0)),
            total => {
                matches.truncate(MAX_SUGGESTIONS);
                ResolutionResult::Ambiguous {
                    candidates: matches,
                    total,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SchemaGuess
// ---------------------------------------------------------------------------

/// Data-modeling pattern recognized by the schema classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPattern {
    StarSchema,
    SnowflakeSchema,
    DataVault,
}

impl SchemaPattern {
    /// Declaration order, which is also the tie-break order.
    pub const ALL: [SchemaPattern; 3] = [
        SchemaPattern::StarSchema,
        SchemaPattern::SnowflakeSchema,
        SchemaPattern::DataVault,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaPattern::StarSchema => "star_schema",
            SchemaPattern::SnowflakeSchema => "snowflake_schema",
            SchemaPattern::DataVault => "data_vault",
        }
    }
}

impl fmt::Display for SchemaPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaGuess {
    pub scores: IndexMap<SchemaPattern, u32>,
    pub guess: SchemaPattern,
}

impl SchemaGuess {
    /// All scores zero; the guess falls back to the first declared pattern.
    pub fn empty() -> Self {
        Self::from_scores(SchemaPattern::ALL.iter().map(|p| (*p, 0)).collect())
    }

    /// Pick the highest score; the earliest pattern in declaration order wins ties.
    pub fn from_scores(scores: IndexMap<SchemaPattern, u32>) -> Self {
        let mut guess = SchemaPattern::StarSchema;
        let mut best: Option<u32> = None;
        for pattern in SchemaPattern::ALL {
            let score = scores.get(&pattern).copied().unwrap_or(0);
            if best.map_or(true, |b| score > b) {
                best = Some(score);
                guess = pattern;
            }
        }
        Self { scores, guess }
    }

    pub fn score(&self, pattern: SchemaPattern) -> u32 {
        self.scores.get(&pattern).copied().unwrap_or(0)
    }

    pub fn to_json(&self) -> Value {
        let analysis: serde_json::Map<String, Value> = SchemaPattern::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), json!(self.score(*p))))
            .collect();
        json!({
            "status": Status::Success,
            "message": format!("Likely modeling pattern: {}", self.guess),
            "analysis": analysis,
            "likely_modeling_pattern": self.guess,
        })
    }
}

// ---------------------------------------------------------------------------
// TranslationOutcome
// ---------------------------------------------------------------------------

/// Terminal error state of a translation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationErrorKind {
    UnknownWarehouse,
    NotFound,
    Read,
    Translate,
    Write,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranslationOutcome {
    Success {
        content: String,
        saved_path: PathBuf,
        source_file: PathBuf,
        resolved_path: String,
        /// The caller-supplied path, set only when the resolver substituted it.
        original_path: Option<String>,
        source: Warehouse,
        target: Warehouse,
    },
    ClarificationNeeded {
        candidates: Vec<String>,
        total_matches: usize,
        original_path: String,
    },
    Error {
        kind: TranslationErrorKind,
        reason: String,
        /// Present only for write failures, so the translated text is not lost.
        translated_content: Option<String>,
    },
}

impl TranslationOutcome {
    pub fn status(&self) -> Status {
        match self {
            TranslationOutcome::Success { .. } => Status::Success,
            TranslationOutcome::ClarificationNeeded { .. } => Status::ClarificationNeeded,
            TranslationOutcome::Error { .. } => Status::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            TranslationOutcome::Success {
                resolved_path,
                source,
                target,
                ..
            } => format!("Successfully translated {resolved_path} from {source} to {target}"),
            TranslationOutcome::ClarificationNeeded {
                candidates,
                total_matches,
                original_path,
            } => format!(
                "File not found at exact path '{original_path}'. Found {total_matches} possible \
                 matches:\n  - {}\n\nPlease specify which file you want to translate using the \
                 full path from the list above.",
                candidates.join("\n  - ")
            ),
            TranslationOutcome::Error { reason, .. } => reason.clone(),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut payload = json!({
            "status": self.status(),
            "message": self.message(),
        });
        let Some(map) = payload.as_object_mut() else {
            return payload;
        };
        match self {
            TranslationOutcome::Success {
                content,
                saved_path,
                source_file,
                original_path,
                ..
            } => {
                map.insert("translated_content".into(), json!(content));
                map.insert("saved_path".into(), json!(saved_path.to_string_lossy()));
                map.insert("source_file".into(), json!(source_file.to_string_lossy()));
                map.insert("original_path".into(), json!(original_path));
            }
            TranslationOutcome::ClarificationNeeded {
                candidates,
                original_path,
                ..
            } => {
                map.insert("translated_content".into(), Value::Null);
                map.insert("saved_path".into(), Value::Null);
                map.insert("suggestions".into(), json!(candidates));
                map.insert("original_path".into(), json!(original_path));
            }
            TranslationOutcome::Error {
                kind,
                translated_content,
                ..
            } => {
                map.insert("error_kind".into(), json!(kind));
                map.insert("translated_content".into(), json!(translated_content));
                map.insert("saved_path".into(), Value::Null);
                if *kind == TranslationErrorKind::NotFound {
                    map.insert("suggestions".into(), json!([]));
                }
            }
        }
        payload
    }
}
