use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Append-only JSON-lines event log. The terminal belongs to the UI while a
/// session runs, so diagnostics go here instead of stderr.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn info(&self, event: &str, message: &str) {
        self.append(LogLevel::Info, event, message);
    }

    pub fn warn(&self, event: &str, message: &str) {
        self.append(LogLevel::Warn, event, message);
    }

    pub fn error(&self, event: &str, message: &str) {
        self.append(LogLevel::Error, event, message);
    }

    pub fn append(&self, level: LogLevel, event: &str, message: &str) {
        let Some(path) = &self.path else {
            return;
        };
        let payload = serde_json::json!({
            "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "level": level.as_str(),
            "event": event,
            "message": message,
        });
        let Ok(line) = serde_json::to_string(&payload) else {
            return;
        };

        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) else {
            return;
        };
        let _ = writeln!(file, "{line}");
    }
}
