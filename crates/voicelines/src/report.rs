use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct ReportRow {
    path: String,
    duration: f64,
}

/// `path -> duration` manifest of converted clips.
///
/// Keys are unique. Merging overwrites matching keys and keeps every other key,
/// so the persisted report only ever grows or gets more recent durations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    entries: BTreeMap<String, f64>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, duration_secs: f64) {
        self.entries.insert(key.into(), duration_secs);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Overlay `other` onto `self`, last write wins per key.
    pub fn merge(&mut self, other: &Report) {
        for (key, duration) in other.iter() {
            self.insert(key, duration);
        }
    }

    /// Load a persisted report. A missing file is an empty report.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let mut reader = csv::Reader::from_path(path)?;
        let mut report = Self::new();
        for row in reader.deserialize::<ReportRow>() {
            let row = row?;
            report.insert(row.path, row.duration);
        }
        Ok(report)
    }

    /// Write the full report, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => std::path::PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let staged = tempfile::Builder::new()
            .prefix(".report-")
            .suffix(".csv")
            .tempfile_in(&parent)?;
        {
            let mut writer = csv::Writer::from_writer(staged.as_file());
            writer.write_record(["path", "duration"])?;
            for (key, duration) in self.iter() {
                let duration = format!("{duration:.3}");
                writer.write_record([key, duration.as_str()])?;
            }
            writer.flush()?;
        }
        staged.persist(path)?;
        Ok(())
    }

    /// Merge this run's entries into the report persisted at `path` and write it back.
    /// An existing file is left untouched when there is nothing to merge.
    pub fn merge_into_file(&self, path: &Path) -> Result<Report> {
        let mut persisted = Self::load(path)?;
        if self.is_empty() && path.exists() {
            log::info!("report {} unchanged", path.display());
            return Ok(persisted);
        }
        persisted.merge(self);
        persisted.save(path)?;
        log::info!(
            "report {} updated ({} new or changed, {} total)",
            path.display(),
            self.len(),
            persisted.len()
        );
        Ok(persisted)
    }
}
