pub mod commits;
pub mod schema;
pub mod snapshots;

use crate::error::{Result, TaggerError};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use commits::CommitLog;

/// What happened to a commit's push to the label store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UpstreamStatus {
    Saved,
    Disabled,
    Placeholder,
    Failed,
}

impl UpstreamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamStatus::Saved => "saved",
            UpstreamStatus::Disabled => "disabled",
            UpstreamStatus::Placeholder => "placeholder",
            UpstreamStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "saved" => Ok(UpstreamStatus::Saved),
            "disabled" => Ok(UpstreamStatus::Disabled),
            "placeholder" => Ok(UpstreamStatus::Placeholder),
            "failed" => Ok(UpstreamStatus::Failed),
            _ => Err(TaggerError::Config(format!("Invalid upstream status: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitLogEntry {
    pub id: i64,
    pub committed_at: DateTime<Utc>,
    pub scheme: String,
    pub label: String,
    pub include_pattern: String,
    pub exclude_pattern: Option<String>,
    pub relevant: u64,
    pub selected: u64,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1score: Option<f64>,
    pub accuracy: Option<f64>,
    pub upstream: UpstreamStatus,
}

/// Local SQLite file holding working-table snapshots and the commit log.
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn initialize(&mut self) -> Result<()> {
        schema::initialize_schema(&self.conn)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
