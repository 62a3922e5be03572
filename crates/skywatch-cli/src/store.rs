//! Monthly JSON log files.
//!
//! Each month is one JSON array file; appending re-reads the whole array,
//! extends it and rewrites the file. That gives at-least-once semantics per
//! run, which is all the pollers need.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Store of per-month JSON array files under one directory.
pub struct MonthlyLog {
    dir: PathBuf,
}

impl MonthlyLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, prefix: &str, month: &str) -> PathBuf {
        self.dir.join(format!("{prefix}_{month}.json"))
    }

    /// The `YYYY-MM` key a timestamp files under.
    pub fn month_key(timestamp: DateTime<Utc>) -> String {
        timestamp.format("%Y-%m").to_string()
    }

    /// Load a month's records; a missing file is an empty month.
    pub fn load<T: DeserializeOwned>(&self, prefix: &str, month: &str) -> Result<Vec<T>> {
        read_array(&self.path(prefix, month))
    }

    /// Append records by read-modify-write of the whole array. Creates the
    /// directory and file as needed; an empty batch still writes the file,
    /// so a quiet poll cycle leaves a `[]` marker behind.
    pub fn append<T: Serialize>(&self, prefix: &str, month: &str, records: &[T]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;

        let path = self.path(prefix, month);
        let mut existing: Vec<serde_json::Value> = read_array(&path)?;
        for record in records {
            existing.push(serde_json::to_value(record)?);
        }

        let json = serde_json::to_string_pretty(&existing)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
