//! Input readers turning a batch file into [`RawItem`]s.
//!
//! The shape is chosen by extension: `.json` for a voice document, `.csv` for
//! one line per row. Rows are resolved into [`WorkItem`](crate::WorkItem)s by the
//! runner so that a bad row fails on its own.

mod delimited;
mod document;

use crate::error::{BatchError, Result};
use crate::item::RawItem;
use std::path::Path;

pub use delimited::parse_csv_str;
pub use document::parse_json_str;

/// Input file shapes understood by [`read_input`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Json,
    Csv,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(InputKind::Json),
            "csv" => Ok(InputKind::Csv),
            _ => Err(BatchError::UnsupportedInput(path.to_path_buf())),
        }
    }
}

/// Read every row of a batch file in input order.
pub fn read_input<P: AsRef<Path>>(path: P) -> Result<Vec<RawItem>> {
    let path = path.as_ref();
    let kind = InputKind::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let items = match kind {
        InputKind::Json => parse_json_str(&content)?,
        InputKind::Csv => parse_csv_str(&content)?,
    };
    log::debug!("read {} rows from {}", items.len(), path.display());
    Ok(items)
}
