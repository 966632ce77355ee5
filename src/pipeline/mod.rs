//! Font conversion pipeline
//!
//! TTF/OTF → subset TTF → BDF (encoding repaired) → PCF, once per point
//! size. Each stage reports through a [`RunLog`]; the orchestrator in
//! [`generator`] decides what a failure means for the run.

pub mod coverage;
pub mod encoding;
pub mod generator;
pub mod intermediate;
pub mod manifest;
pub mod pack;
pub mod rasterize;
pub mod subset;

pub use generator::generate_font;

use crate::error::{GenError, Result};
use crate::logging::{LogEntry, RunLog, Status};
use crate::tools::{ToolOutcome, install_hint, tool_name};
use std::path::Path;

/// Captured streams of a successful tool run
#[derive(Debug, Default)]
pub(crate) struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Size of a file in KB with one decimal, as shown in logs
pub(crate) fn file_size_kb(path: &Path) -> Option<String> {
    std::fs::metadata(path)
        .ok()
        .map(|m| format!("{:.1}", m.len() as f64 / 1024.0))
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

/// Turn a finished tool run into a stage result
///
/// Failures are logged here (error message plus a failed execution-log
/// entry), so callers only record their own success entry.
pub(crate) fn finish_tool_step(
    step: &str,
    program: &Path,
    command: &str,
    outcome: std::io::Result<ToolOutcome>,
    log: &mut dyn RunLog,
) -> Result<ToolOutput> {
    let tool = tool_name(program);
    let debug = log.is_debug();
    let failed = LogEntry::new(step, command, Status::Failed).with("full_command", command);

    match outcome {
        Ok(ToolOutcome::Success { stdout, stderr }) => Ok(ToolOutput { stdout, stderr }),
        Ok(ToolOutcome::NotFound) => {
            let error = GenError::ToolMissing {
                hint: install_hint(&tool).to_string(),
                tool,
            };
            log.error(&error.to_string());
            log.record(failed.with("error", "Command not found"));
            Err(error)
        }
        Ok(ToolOutcome::Failed {
            code,
            stdout,
            stderr,
        }) => {
            let message = if stderr.is_empty() {
                "Unknown error".to_string()
            } else {
                stderr.clone()
            };
            let error = GenError::Conversion {
                tool,
                code,
                stderr: message.clone(),
            };
            log.error(&error.to_string());
            log.record(
                failed
                    .with("error", message)
                    .with_opt("exit_code", code.map(|c| c.to_string()))
                    .with_opt("stdout", debug.then(|| non_empty(&stdout)).flatten())
                    .with_opt("stderr", debug.then(|| non_empty(&stderr)).flatten()),
            );
            Err(error)
        }
        Err(e) => {
            log.error(&format!("Failed to run {tool}: {e}"));
            log.record(failed.with("error", e.to_string()));
            Err(GenError::Io(e))
        }
    }
}

/// Attach captured streams to a success entry in debug mode
pub(crate) fn with_streams(entry: LogEntry, output: &ToolOutput, debug: bool) -> LogEntry {
    if !debug {
        return entry;
    }
    entry
        .with_opt("stdout", non_empty(&output.stdout))
        .with_opt("stderr", non_empty(&output.stderr))
}
