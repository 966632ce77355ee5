//! Per-run execution log
//!
//! Pipeline stages report through the narrow [`RunLog`] capability. The
//! concrete [`GenerationLog`] is created when a run starts, passed down by
//! `&mut`, and read out once at the end for the summary and the manifest's
//! debug bundle.

use crate::config::Verbosity;
use serde::Serialize;
use serde_json::{Map, Value};

/// Outcome recorded for one pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Started,
    Success,
    Failed,
}

/// One entry of the execution log
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub step: String,
    pub command: String,
    pub status: Status,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl LogEntry {
    pub fn new(step: &str, command: impl Into<String>, status: Status) -> Self {
        Self {
            step: step.to_string(),
            command: command.into(),
            status,
            metadata: Map::new(),
        }
    }

    /// Attach a metadata value, builder style
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Attach a value only when there is one
    pub fn with_opt(self, key: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

/// Logging capability handed to every pipeline stage
pub trait RunLog {
    fn record(&mut self, entry: LogEntry);
    fn info(&mut self, message: &str);
    fn warn(&mut self, message: &str);
    fn error(&mut self, message: &str);

    /// Whether stages should capture extra diagnostics (tool stdout/stderr)
    fn is_debug(&self) -> bool {
        false
    }
}

/// Append-only log for one generation run
#[derive(Debug, Default)]
pub struct GenerationLog {
    verbosity: Verbosity,
    entries: Vec<LogEntry>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl GenerationLog {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            ..Default::default()
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Section header, shown in verbose mode only
    pub fn section(&mut self, title: &str) {
        tracing::info!("{}", title);
    }

    /// Success line, shown in verbose mode only
    pub fn success(&mut self, message: &str) {
        tracing::info!("✓ {}", message);
    }

    fn render(entry: &LogEntry) -> String {
        let mut line = match entry.status {
            Status::Started => format!("[{}] {}", entry.step, entry.command),
            Status::Success => format!("✓ [{}] {}", entry.step, entry.command),
            Status::Failed => format!("✗ [{}] {}", entry.step, entry.command),
        };
        if entry.status == Status::Success {
            if let Some(Value::String(output)) = entry.get("output") {
                line.push_str(&format!(" → {output}"));
            }
            if let Some(Value::String(size)) = entry.get("size_kb") {
                line.push_str(&format!(" ({size} KB)"));
            }
            if let Some(glyphs) = entry.get("glyphs_produced") {
                line.push_str(&format!(" ({glyphs} glyphs)"));
            }
        }
        line
    }
}

impl RunLog for GenerationLog {
    fn record(&mut self, entry: LogEntry) {
        match entry.status {
            Status::Started | Status::Success => tracing::info!("{}", Self::render(&entry)),
            Status::Failed => {
                tracing::error!("{}", Self::render(&entry));
                if let Some(Value::String(error)) = entry.get("error") {
                    tracing::error!("    Error: {}", error);
                }
            }
        }
        self.entries.push(entry);
    }

    fn info(&mut self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&mut self, message: &str) {
        tracing::warn!("{}", message);
        self.warnings.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        tracing::error!("{}", message);
        self.errors.push(message.to_string());
    }

    fn is_debug(&self) -> bool {
        self.verbosity.is_debug()
    }
}
