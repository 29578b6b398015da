//! JSONL invocation log.
//!
//! One line per `dbbridgectl` run. Logging must never fail the command, so
//! every error here is swallowed after a debug trace.

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Log entry for each dbbridgectl invocation
#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 timestamp
    pub ts: String,

    /// Request ID (UUID)
    pub req_id: String,

    /// Subcommand name
    pub command: String,

    /// Command arguments
    #[serde(default)]
    pub args: Vec<String>,

    /// Detected OS class
    pub os_class: String,

    /// Exit code
    pub exit_code: i32,

    /// Success flag
    pub ok: bool,

    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl LogEntry {
    pub fn new(command: &str, args: Vec<String>, os_class: &str) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339(),
            req_id: uuid::Uuid::new_v4().to_string(),
            command: command.to_string(),
            args,
            os_class: os_class.to_string(),
            exit_code: 0,
            ok: true,
            duration_ms: 0,
        }
    }

    /// Append this entry to the invocation log. Best effort.
    pub fn write(&self) {
        let Some(path) = discover_log_path() else {
            return;
        };

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return;
            }
        }

        let line = match serde_json::to_string(self) {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!("failed to serialize log entry: {}", e);
                return;
            }
        };

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut f| writeln!(f, "{}", line));

        if let Err(e) = result {
            tracing::debug!(path = %path.display(), "failed to append invocation log: {}", e);
        }
    }
}

/// Discover log file path with fallback chain
///
/// Priority:
/// 1. $DBBRIDGECTL_LOG_FILE environment variable (explicit override)
/// 2. $XDG_STATE_HOME/dbbridge/ctl.jsonl (XDG standard)
/// 3. ~/.local/state/dbbridge/ctl.jsonl (XDG fallback)
fn discover_log_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("DBBRIDGECTL_LOG_FILE") {
        return Some(PathBuf::from(path));
    }

    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg_state).join("dbbridge/ctl.jsonl"));
    }

    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".local/state/dbbridge/ctl.jsonl"));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_to_single_line() {
        let mut entry = LogEntry::new("install", vec!["--all".to_string()], "debian_based");
        entry.exit_code = 0;
        entry.duration_ms = 42;

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"command\":\"install\""));
        assert!(json.contains("\"os_class\":\"debian_based\""));
    }

    #[test]
    fn test_write_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctl.jsonl");
        std::env::set_var("DBBRIDGECTL_LOG_FILE", &path);

        let entry = LogEntry::new("check", Vec::new(), "macos");
        entry.write();
        let entry = LogEntry::new("check", Vec::new(), "macos");
        entry.write();

        std::env::remove_var("DBBRIDGECTL_LOG_FILE");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        for line in content.lines() {
            let parsed: LogEntry = serde_json::from_str(line).unwrap();
            assert_eq!(parsed.command, "check");
        }
    }
}
