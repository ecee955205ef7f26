use crate::item::WorkItem;
use std::path::{Path, PathBuf};

/// Where the converted clip of a [`WorkItem`] lives and how it is keyed in the report.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path segments of the clip relative to the root. Key and path are both
    /// built from this list so one file always maps to one report row.
    fn segments(item: &WorkItem) -> Vec<String> {
        let mut segments: Vec<String> = item
            .output_directory
            .split(['/', '\\'])
            .filter(|part| !part.is_empty() && *part != ".")
            .map(str::to_string)
            .collect();
        segments.push(format!(
            "{}.{}",
            item.filename,
            item.convert_format.extension()
        ));
        segments
    }

    /// Report key: `<output_directory>/<filename>.<ext>` with forward slashes.
    pub fn report_key(&self, item: &WorkItem) -> String {
        Self::segments(item).join("/")
    }

    /// Final converted-output path under the output root.
    pub fn output_path(&self, item: &WorkItem) -> PathBuf {
        Self::segments(item)
            .iter()
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

/// What to do with an item given the current state of the output tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Output already exists and regeneration was not requested
    Skip { key: String, path: PathBuf },
    /// Generate and convert the item
    Proceed { key: String, path: PathBuf },
}

impl GateDecision {
    pub fn key(&self) -> &str {
        match self {
            GateDecision::Skip { key, .. } | GateDecision::Proceed { key, .. } => key,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            GateDecision::Skip { path, .. } | GateDecision::Proceed { path, .. } => path,
        }
    }
}

/// Decides whether an item must be produced. The only component that looks at
/// the output tree.
#[derive(Debug, Clone)]
pub struct ExistenceGate {
    layout: OutputLayout,
    regenerate: bool,
}

impl ExistenceGate {
    pub fn new(layout: OutputLayout, regenerate: bool) -> Self {
        Self { layout, regenerate }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn check(&self, item: &WorkItem) -> GateDecision {
        let key = self.layout.report_key(item);
        let path = self.layout.output_path(item);
        if !self.regenerate && path.exists() {
            GateDecision::Skip { key, path }
        } else {
            GateDecision::Proceed { key, path }
        }
    }
}
