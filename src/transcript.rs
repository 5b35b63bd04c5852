use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only JSONL session log.
///
/// This is the diagnostic channel: failed operations are recorded here and
/// nowhere else.
pub struct Transcript {
    pub path: PathBuf,
    session_id: String,
    file: File,
}

#[derive(Serialize)]
struct Event<'a> {
    ts: DateTime<Utc>,
    session_id: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    #[serde(flatten)]
    data: serde_json::Value,
}

impl Transcript {
    pub fn new(path: &Path, session_id: &str) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            session_id: session_id.to_string(),
            file,
        })
    }

    pub fn log(&mut self, event_type: &str, data: serde_json::Value) -> Result<()> {
        let event = Event {
            ts: Utc::now(),
            session_id: &self.session_id,
            event_type,
            data,
        };
        let line = serde_json::to_string(&event)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn command(&mut self, line: &str) -> Result<()> {
        self.log("command", serde_json::json!({ "line": line }))
    }

    /// Log a completed table refresh
    pub fn view_rendered(&mut self, rows: usize) -> Result<()> {
        self.log("view_rendered", serde_json::json!({ "rows": rows }))
    }

    /// Log a record fetched into the form for editing
    pub fn record_loaded(&mut self, id: u64) -> Result<()> {
        self.log("record_loaded", serde_json::json!({ "id": id }))
    }

    /// Log a delete the user declined at the confirmation prompt
    pub fn delete_declined(&mut self, id: u64) -> Result<()> {
        self.log("delete_declined", serde_json::json!({ "id": id }))
    }

    /// Log a failed operation; the failure is not surfaced anywhere else
    pub fn op_error(&mut self, op: &str, error: &str) -> Result<()> {
        self.log(
            "op_error",
            serde_json::json!({
                "op": op,
                "error": error,
            }),
        )
    }
}
