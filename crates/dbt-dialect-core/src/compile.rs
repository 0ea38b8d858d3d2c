//! Runs the dbt build tool in compile mode and collects its JSON log events.

use std::path::PathBuf;
use std::process::Command;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::config::ProjectConfig;
use crate::errors::{DialectError, DialectResult};
use crate::models::Status;

#[derive(Clone, Debug, Serialize)]
pub struct CompileReport {
    /// `None` when the process was terminated by a signal.
    pub returncode: Option<i32>,
    pub logs: Vec<Value>,
    pub project_dir: PathBuf,
}

impl CompileReport {
    pub fn to_json(&self) -> Value {
        let (status, message) = match self.returncode {
            Some(0) => (Status::Success, "dbt compile finished".to_string()),
            Some(code) => (Status::Error, format!("dbt compile exited with code {code}")),
            None => (Status::Error, "dbt compile was terminated".to_string()),
        };
        json!({
            "status": status,
            "message": message,
            "returncode": self.returncode,
            "logs": self.logs,
            "project_dir": self.project_dir.to_string_lossy(),
        })
    }
}

/// Parse newline-delimited JSON, silently dropping lines that do not parse.
pub fn parse_json_lines(stream: &str) -> Vec<Value> {
    stream
        .lines()
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .collect()
}

/// Run `<dbt> compile --log-format json` in the project root.
///
/// Events from stdout come before events from stderr. Only a failure to
/// start the executable is an error; a non-zero exit is reported in the
/// return code.
pub fn compile(config: &ProjectConfig) -> DialectResult<CompileReport> {
    info!(
        "Running dbt compile in {} with {}",
        config.root().display(),
        config.dbt_executable.display()
    );
    let output = Command::new(&config.dbt_executable)
        .args(["compile", "--log-format", "json"])
        .current_dir(config.root())
        .output()
        .map_err(|e| {
            DialectError::Compile(format!(
                "failed to run {}: {e}",
                config.dbt_executable.display()
            ))
        })?;

    let mut logs = parse_json_lines(&String::from_utf8_lossy(&output.stdout));
    logs.extend(parse_json_lines(&String::from_utf8_lossy(&output.stderr)));

    Ok(CompileReport {
        returncode: output.status.code(),
        logs,
        project_dir: config.root().to_path_buf(),
    })
}
