//! A small persistent log of user-facing failures.
//!
//! `ErrorLog` keeps the most recent errors and warnings, newest first, so
//! they can be listed, exported or cleared later. It is an ordinary value:
//! open it from an [`ErrorLogConfig`], log into it, and `close` it to write
//! the entries back to disk. Every entry is also emitted as a `tracing`
//! event at the matching level.

use crate::config::ErrorLogConfig;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Error,
  Warning,
  Info,
}

/// One logged failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
  pub timestamp: DateTime<Utc>,
  pub level: Level,
  pub message: String,
  /// Messages of the underlying errors, outermost first.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub causes: Vec<String>,
  /// Caller-supplied details such as the command or the search criteria.
  #[serde(default)]
  pub context: Map<String, Value>,
  #[serde(default)]
  pub environment: String,
}

/// Newest-first, capped store of [`LogEntry`]s.
#[derive(Debug)]
pub struct ErrorLog {
  entries: Vec<LogEntry>,
  max_entries: usize,
  environment: String,
  path: Option<PathBuf>,
  dirty: bool,
}

impl ErrorLog {
  /// Opens the log at `config.path`, loading any entries saved there.
  ///
  /// A missing file starts an empty log. A file that cannot be parsed is
  /// reported as a warning and also starts an empty log; it is overwritten
  /// on the next `close`.
  pub fn open(config: &ErrorLogConfig) -> Result<Self> {
    let mut log = Self {
      entries: Vec::new(),
      max_entries: config.max_entries.max(1),
      environment: config.environment.clone(),
      path: Some(config.path.clone()),
      dirty: false,
    };

    match fs::read_to_string(&config.path) {
      Ok(text) => match serde_json::from_str::<Vec<LogEntry>>(&text) {
        Ok(entries) => log.entries = entries,
        Err(err) => {
          warn!(path = %config.path.display(), error = %err, "ignoring unreadable error log");
        }
      },
      Err(err) if err.kind() == ErrorKind::NotFound => {}
      Err(err) => return Err(err.into()),
    }
    log.entries.truncate(log.max_entries);
    Ok(log)
  }

  /// A log that is never written to disk.
  pub fn in_memory(max_entries: usize) -> Self {
    Self {
      entries: Vec::new(),
      max_entries: max_entries.max(1),
      environment: String::new(),
      path: None,
      dirty: false,
    }
  }

  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  /// Entries, newest first.
  pub fn entries(&self) -> &[LogEntry] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Records an error.
  pub fn log_error(&mut self, message: impl Into<String>, context: Value) -> &LogEntry {
    let entry = self.entry(Level::Error, message.into(), Vec::new(), context);
    error!(context = %serde_json::Value::Object(entry.context.clone()), "{}", entry.message);
    self.push(entry)
  }

  /// Records an error together with its chain of causes.
  pub fn log_failure(&mut self, err: &(dyn std::error::Error + 'static), context: Value) -> &LogEntry {
    let mut causes = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
      causes.push(cause.to_string());
      source = cause.source();
    }
    let entry = self.entry(Level::Error, err.to_string(), causes, context);
    error!(causes = ?entry.causes, "{}", entry.message);
    self.push(entry)
  }

  /// Records a warning.
  pub fn log_warning(&mut self, message: impl Into<String>, context: Value) -> &LogEntry {
    let entry = self.entry(Level::Warning, message.into(), Vec::new(), context);
    warn!(context = %serde_json::Value::Object(entry.context.clone()), "{}", entry.message);
    self.push(entry)
  }

  /// Emits an informational event. Info messages are not stored.
  pub fn log_info(&self, message: &str, context: Value) {
    info!(context = %context, "{message}");
  }

  /// All entries as pretty-printed JSON.
  pub fn to_json_pretty(&self) -> Result<String> {
    Ok(serde_json::to_string_pretty(&self.entries)?)
  }

  /// Drops every entry and removes the backing file.
  pub fn clear(&mut self) -> Result<()> {
    self.entries.clear();
    self.dirty = false;
    if let Some(path) = &self.path {
      match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
      }
    }
    Ok(())
  }

  /// Writes the entries as pretty JSON to `path`.
  pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, self.to_json_pretty()?)?;
    Ok(())
  }

  /// Writes the entries to the backing file if anything was logged since
  /// the last flush.
  pub fn flush(&mut self) -> Result<()> {
    if let (true, Some(path)) = (self.dirty, &self.path) {
      self.export(path)?;
    }
    self.dirty = false;
    Ok(())
  }

  /// Flushes and consumes the log.
  pub fn close(mut self) -> Result<()> {
    self.flush()
  }

  fn entry(&self, level: Level, message: String, causes: Vec<String>, context: Value) -> LogEntry {
    LogEntry {
      timestamp: Utc::now(),
      level,
      message,
      causes,
      context: into_map(context),
      environment: self.environment.clone(),
    }
  }

  fn push(&mut self, entry: LogEntry) -> &LogEntry {
    self.entries.insert(0, entry);
    self.entries.truncate(self.max_entries);
    self.dirty = true;
    &self.entries[0]
  }
}

fn into_map(context: Value) -> Map<String, Value> {
  match context {
    Value::Object(map) => map,
    Value::Null => Map::new(),
    other => {
      let mut map = Map::new();
      map.insert("detail".to_string(), other);
      map
    }
  }
}
