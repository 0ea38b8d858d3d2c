//! The external service that performs the actual SQL text translation.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use crate::errors::{DialectError, DialectResult};
use crate::models::Warehouse;

/// Translates SQL text from one warehouse dialect to another.
///
/// Implementations return only the translated text. Failures are reported
/// to the caller, never retried.
pub trait Translator {
    fn translate(&self, text: &str, source: Warehouse, target: Warehouse) -> DialectResult<String>;
}

impl<F> Translator for F
where
    F: Fn(&str, Warehouse, Warehouse) -> Result<String, String>,
{
    fn translate(&self, text: &str, source: Warehouse, target: Warehouse) -> DialectResult<String> {
        self(text, source, target).map_err(DialectError::Translate)
    }
}

/// Pipes the source text through an external program.
///
/// The program is invoked as `<program> <args...> <source> <target>` with the
/// SQL on stdin, and its stdout is taken as the translation. A non-zero exit
/// status is a failure carrying stderr.
#[derive(Clone, Debug)]
pub struct CommandTranslator {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandTranslator {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Translator for CommandTranslator {
    fn translate(&self, text: &str, source: Warehouse, target: Warehouse) -> DialectResult<String> {
        debug!(
            "Running translator {:?} for {source} -> {target}",
            self.program
        );
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(source.as_str())
            .arg(target.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DialectError::Translate(format!("failed to start {:?}: {e}", self.program))
            })?;

        // stdin is written from a scoped thread while wait_with_output drains
        // stdout and stderr
        let stdin = child.stdin.take();
        let (output, sent) = thread::scope(|s| {
            let writer = stdin.map(|mut stdin| s.spawn(move || stdin.write_all(text.as_bytes())));
            let output = child.wait_with_output();
            let sent = match writer {
                Some(handle) => handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked"))),
                None => Ok(()),
            };
            (output, sent)
        });

        let output = output.map_err(|e| DialectError::Translate(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DialectError::Translate(format!(
                "translator exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        sent.map_err(|e| DialectError::Translate(format!("failed to send source text: {e}")))?;
        String::from_utf8(output.stdout)
            .map_err(|e| DialectError::Translate(format!("translator output is not UTF-8: {e}")))
    }
}
