//! Python bindings: the `_dbt_dialect_core` extension module.
//!
//! Every function returns a plain `dict` built from the same JSON payload the
//! CLI prints. `project_dir` defaults to `DBT_PROJECT_LOCATION` (or the
//! current directory).

use pyo3::prelude::*;
use serde_json::Value;

use crate::config::ProjectConfig;
use crate::errors::{DialectError, DialectResult};
use crate::models::Warehouse;
use crate::tools;
use crate::translate::collaborator::Translator;

fn project_config(project_dir: Option<String>, executable: Option<String>) -> ProjectConfig {
    let mut config = ProjectConfig::from_env();
    if let Some(dir) = project_dir {
        config.project_root = dir.into();
    }
    if let Some(exe) = executable {
        config.dbt_executable = exe.into();
    }
    config
}

fn to_py(py: Python<'_>, payload: &Value) -> PyResult<PyObject> {
    let text = serde_json::to_string(payload).map_err(DialectError::from)?;
    let json_module = py.import("json")?;
    Ok(json_module.call_method1("loads", (text,))?.unbind())
}

/// Calls a Python `translate(text, source, target) -> str` callable.
struct PyTranslator<'py> {
    callable: Bound<'py, PyAny>,
}

impl Translator for PyTranslator<'_> {
    fn translate(&self, text: &str, source: Warehouse, target: Warehouse) -> DialectResult<String> {
        self.callable
            .call1((text, source.as_str(), target.as_str()))
            .and_then(|result| result.extract::<String>())
            .map_err(|e| DialectError::Translate(e.to_string()))
    }
}

#[pyfunction]
#[pyo3(signature = (source_warehouse, target_warehouse=None, project_dir=None))]
fn dbt_identify_translation_candidates(
    py: Python<'_>,
    source_warehouse: &str,
    target_warehouse: Option<&str>,
    project_dir: Option<String>,
) -> PyResult<PyObject> {
    let config = project_config(project_dir, None);
    let payload = tools::identify_translation_candidates(&config, source_warehouse, target_warehouse);
    to_py(py, &payload)
}

#[pyfunction]
#[pyo3(signature = (file_path, source_warehouse, target_warehouse, translator, project_dir=None))]
fn dbt_translate(
    py: Python<'_>,
    file_path: &str,
    source_warehouse: &str,
    target_warehouse: &str,
    translator: Bound<'_, PyAny>,
    project_dir: Option<String>,
) -> PyResult<PyObject> {
    let config = project_config(project_dir, None);
    let payload = tools::translate_file(
        &config,
        PyTranslator {
            callable: translator,
        },
        file_path,
        source_warehouse,
        target_warehouse,
    );
    to_py(py, &payload)
}

#[pyfunction]
#[pyo3(signature = (project_dir=None))]
fn analyze_dbt_schema(py: Python<'_>, project_dir: Option<String>) -> PyResult<PyObject> {
    let config = project_config(project_dir, None);
    to_py(py, &tools::analyze_schema(&config))
}

#[pyfunction]
#[pyo3(signature = (project_dir=None, executable=None))]
fn dbt_compile(
    py: Python<'_>,
    project_dir: Option<String>,
    executable: Option<String>,
) -> PyResult<PyObject> {
    let config = project_config(project_dir, executable);
    to_py(py, &tools::compile_project(&config))
}

#[pyfunction]
#[pyo3(signature = (search_term, project_dir=None))]
fn search_project_files(
    py: Python<'_>,
    search_term: &str,
    project_dir: Option<String>,
) -> PyResult<PyObject> {
    let config = project_config(project_dir, None);
    to_py(py, &tools::search_project_files(&config, search_term))
}

#[pyfunction]
fn warehouse_patterns(py: Python<'_>, warehouse: &str) -> PyResult<PyObject> {
    to_py(py, &tools::warehouse_patterns(warehouse))
}

#[pymodule]
fn _dbt_dialect_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let supported: Vec<&str> = Warehouse::ALL.iter().map(|w| w.as_str()).collect();
    m.add("SUPPORTED_WAREHOUSES", supported)?;
    m.add("MAX_SUGGESTIONS", crate::models::MAX_SUGGESTIONS)?;

    m.add_function(wrap_pyfunction!(dbt_identify_translation_candidates, m)?)?;
    m.add_function(wrap_pyfunction!(dbt_translate, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_dbt_schema, m)?)?;
    m.add_function(wrap_pyfunction!(dbt_compile, m)?)?;
    m.add_function(wrap_pyfunction!(search_project_files, m)?)?;
    m.add_function(wrap_pyfunction!(warehouse_patterns, m)?)?;
    Ok(())
}
