//! Error types for the dbt dialect core library.

/// Top-level error enum for the dbt dialect core library.
#[derive(Debug, thiserror::Error)]
pub enum DialectError {
    #[error("Unknown warehouse '{0}'. Supported: snowflake, bigquery, redshift, postgres")]
    UnknownWarehouse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Translation error: {0}")]
    Translate(String),

    #[error("Compile error: {0}")]
    Compile(String),
}

#[cfg(feature = "python")]
impl From<DialectError> for pyo3::PyErr {
    fn from(err: DialectError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};

        match &err {
            DialectError::UnknownWarehouse(_) => PyValueError::new_err(err.to_string()),
            DialectError::Io(_) => PyIOError::new_err(err.to_string()),
            DialectError::Json(_) => PyValueError::new_err(err.to_string()),
            DialectError::Translate(_) | DialectError::Compile(_) => {
                PyRuntimeError::new_err(err.to_string())
            }
        }
    }
}

pub type DialectResult<T> = Result<T, DialectError>;
