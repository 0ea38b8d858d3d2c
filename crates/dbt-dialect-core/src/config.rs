//! Project configuration shared by the scanner, resolver, classifier and router.

use std::path::{Path, PathBuf};

use crate::models::Warehouse;

pub const PROJECT_LOCATION_ENV: &str = "DBT_PROJECT_LOCATION";
pub const EXECUTABLE_ENV: &str = "DBT_EXECUTABLE";
pub const DEFAULT_EXECUTABLE: &str = "dbt";

/// Location of a dbt project and the build tool used to compile it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectConfig {
    pub project_root: PathBuf,
    pub dbt_executable: PathBuf,
}

impl ProjectConfig {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            dbt_executable: PathBuf::from(DEFAULT_EXECUTABLE),
        }
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.dbt_executable = executable.into();
        self
    }

    /// Build a config from `DBT_PROJECT_LOCATION` / `DBT_EXECUTABLE`, loading
    /// a `.env` file first if one is present.
    ///
    /// Blank values are treated as unset.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let project_root = env_value(PROJECT_LOCATION_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let dbt_executable = env_value(EXECUTABLE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE));

        Self {
            project_root,
            dbt_executable,
        }
    }

    pub fn root(&self) -> &Path {
        &self.project_root
    }

    /// `target/compiled`, where the build tool leaves rendered SQL.
    pub fn compiled_dir(&self) -> PathBuf {
        self.project_root.join("target").join("compiled")
    }

    /// `translated/<warehouse>`, the output subtree for one target dialect.
    pub fn translated_dir(&self, target: Warehouse) -> PathBuf {
        self.project_root.join("translated").join(target.as_str())
    }
}

fn env_value(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => Some(val.trim().to_string()),
        _ => None,
    }
}
