//! Status payloads for the conversational layer.
//!
//! Each function performs one operation and folds every outcome, including
//! errors, into a JSON object with `status` and `message` fields.

use serde_json::{json, Value};

use crate::compile::compile;
use crate::config::ProjectConfig;
use crate::dialect::catalog::PatternCatalog;
use crate::dialect::scanner::identify_candidates;
use crate::modeling::classify;
use crate::models::{error_payload, ResolutionResult, Status, MAX_SUGGESTIONS};
use crate::project::resolver::resolve;
use crate::translate::collaborator::Translator;
use crate::translate::router::TranslationRouter;

pub fn identify_translation_candidates(
    config: &ProjectConfig,
    source_warehouse: &str,
    target_warehouse: Option<&str>,
) -> Value {
    match identify_candidates(config.root(), source_warehouse, target_warehouse) {
        Ok(report) => report.to_json(),
        Err(e) => {
            let mut payload = error_payload(e.to_string());
            payload["candidates"] = json!([]);
            payload
        }
    }
}

pub fn translate_file<T: Translator>(
    config: &ProjectConfig,
    translator: T,
    file_path: &str,
    source_warehouse: &str,
    target_warehouse: &str,
) -> Value {
    TranslationRouter::new(config, translator)
        .translate(file_path, source_warehouse, target_warehouse)
        .to_json()
}

pub fn analyze_schema(config: &ProjectConfig) -> Value {
    let mut payload = classify(&config.compiled_dir()).to_json();
    payload["compiled_dir"] = json!(config.compiled_dir().to_string_lossy());
    payload
}

pub fn compile_project(config: &ProjectConfig) -> Value {
    match compile(config) {
        Ok(report) => report.to_json(),
        Err(e) => {
            let mut payload = error_payload(e.to_string());
            payload["returncode"] = Value::Null;
            payload["logs"] = json!([]);
            payload["project_dir"] = json!(config.root().to_string_lossy());
            payload
        }
    }
}

/// Search the project's sources for `term`, reporting every match.
pub fn search_project_files(config: &ProjectConfig, term: &str) -> Value {
    let matches = resolve(config.root(), term);
    let total = matches.len();
    let (status, message) = match ResolutionResult::from_matches(matches.clone()) {
        ResolutionResult::Found(path) => (Status::Success, format!("Found {path}")),
        ResolutionResult::Ambiguous { .. } => (
            Status::ClarificationNeeded,
            format!("Found {total} possible matches for '{term}'. Please specify the full path."),
        ),
        ResolutionResult::NotFound => (
            Status::Error,
            format!("No files matching '{term}' found in the dbt project."),
        ),
    };
    json!({
        "status": status,
        "message": message,
        "matches": matches,
        "suggestions": matches.iter().take(MAX_SUGGESTIONS).collect::<Vec<_>>(),
        "total_matches": total,
    })
}

/// Rule labels per warehouse, for display.
pub fn warehouse_patterns(warehouse: &str) -> Value {
    match PatternCatalog::global().patterns_for(warehouse) {
        Ok(pattern) => json!({
            "status": Status::Success,
            "message": format!("{} fingerprint rules for {}", pattern.rules.len(), pattern.warehouse),
            "warehouse": pattern.warehouse,
            "patterns": pattern
                .rules
                .iter()
                .map(|r| json!({ "label": r.label, "regex": r.regex.as_str() }))
                .collect::<Vec<_>>(),
        }),
        Err(e) => error_payload(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Warehouse;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn unknown_source_warehouse_payload() {
        let tmp = TempDir::new().unwrap();
        let payload =
            identify_translation_candidates(&ProjectConfig::new(tmp.path()), "oracle", None);
        assert_eq!(payload["status"], "error");
        assert!(payload["message"].as_str().unwrap().contains("oracle"));
        assert_eq!(payload["candidates"], json!([]));
    }

    #[test]
    fn candidate_payload_shape() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "models/a.sql", "SELECT IFF(a,b,c), FLATTEN(x) FROM t");
        let payload = identify_translation_candidates(
            &ProjectConfig::new(tmp.path()),
            "snowflake",
            Some("bigquery"),
        );
        assert_eq!(payload["status"], "success");
        assert_eq!(payload["total_files"], 1);
        assert_eq!(payload["candidates"][0]["file"], "models/a.sql");
        assert_eq!(payload["candidates"][0]["pattern_count"], 2);
    }

    #[test]
    fn translate_payload_success() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "models/staging/stg_users.sql", "select 1");
        let payload = translate_file(
            &ProjectConfig::new(tmp.path()),
            |t: &str, _: Warehouse, _: Warehouse| -> Result<String, String> { Ok(t.to_string()) },
            "stg_users",
            "snowflake",
            "bigquery",
        );
        assert_eq!(payload["status"], "success");
        assert_eq!(payload["original_path"], "stg_users");
        assert!(payload["saved_path"]
            .as_str()
            .unwrap()
            .ends_with("translated/bigquery/models/staging/stg_users.sql"));
    }

    #[test]
    fn schema_payload_on_empty_project() {
        let tmp = TempDir::new().unwrap();
        let payload = analyze_schema(&ProjectConfig::new(tmp.path()));
        assert_eq!(payload["likely_modeling_pattern"], "star_schema");
        assert_eq!(payload["analysis"]["data_vault"], 0);
    }

    #[test]
    fn search_payload_reports_ambiguity() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "models/stg_users.sql", "");
        write(tmp.path(), "models/dim_users.sql", "");
        let payload = search_project_files(&ProjectConfig::new(tmp.path()), "users");
        assert_eq!(payload["status"], "clarification_needed");
        assert_eq!(payload["total_matches"], 2);
        assert_eq!(payload["matches"][0], "models/dim_users.sql");
    }

    #[test]
    fn patterns_payload() {
        assert_eq!(warehouse_patterns("bigquery")["patterns"].as_array().unwrap().len(), 8);
        assert_eq!(warehouse_patterns("nope")["status"], "error");
    }
}
