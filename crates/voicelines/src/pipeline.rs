use crate::error::{BatchError, Result};
use crate::item::{RawItem, WorkItem};
use crate::layout::{ExistenceGate, GateDecision, OutputLayout};
use crate::report::Report;
use futures::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use voicelines_audio::{AudioConverter, SourceEncoding};
use voicelines_speech::{AudioCodec, OutputFormat, TTSError, TTSSpeechProvider};

/// What happens after an item fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Log the failure and continue with the next item
    #[default]
    Resilient,
    /// Stop at the first failure, after merging the report for completed items
    FailFast,
}

/// Result of one input row
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Generated {
        row: usize,
        key: String,
        duration_secs: f64,
    },
    Skipped {
        row: usize,
        key: String,
    },
    Failed {
        row: usize,
        key: Option<String>,
        error: String,
    },
}

impl ItemOutcome {
    pub fn row(&self) -> usize {
        match self {
            ItemOutcome::Generated { row, .. }
            | ItemOutcome::Skipped { row, .. }
            | ItemOutcome::Failed { row, .. } => *row,
        }
    }
}

/// Everything a run produced, one outcome per input row in input order
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<ItemOutcome>,
    /// Entries produced by this run
    pub report: Report,
}

impl RunSummary {
    pub fn generated(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Generated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o)).count()
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_root: PathBuf,
    pub scratch_dir: Option<PathBuf>,
    pub report_path: PathBuf,
    pub regenerate: bool,
    pub failure_mode: FailureMode,
}

impl RunOptions {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        let output_root = output_root.into();
        Self {
            report_path: output_root.join("report.csv"),
            output_root,
            scratch_dir: None,
            regenerate: false,
            failure_mode: FailureMode::Resilient,
        }
    }

    pub fn with_scratch_dir(mut self, scratch_dir: Option<PathBuf>) -> Self {
        self.scratch_dir = scratch_dir;
        self
    }

    pub fn with_report_path(mut self, report_path: impl Into<PathBuf>) -> Self {
        self.report_path = report_path.into();
        self
    }

    pub fn with_regenerate(mut self, regenerate: bool) -> Self {
        self.regenerate = regenerate;
        self
    }

    pub fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }
}

/// How the converter should read a payload in the given provider format, or
/// `None` when no decoder exists for the codec (opus).
pub fn source_encoding(format: &OutputFormat) -> Option<SourceEncoding> {
    let sample_rate = format.sample_rate;
    match format.codec {
        AudioCodec::Pcm => Some(SourceEncoding::Pcm16 { sample_rate }),
        AudioCodec::Ulaw => Some(SourceEncoding::MuLaw { sample_rate }),
        AudioCodec::Alaw => Some(SourceEncoding::ALaw { sample_rate }),
        AudioCodec::Mp3 | AudioCodec::Wav => Some(SourceEncoding::Container),
        AudioCodec::Opus => None,
    }
}

/// Drives rows through gate, generation, conversion and the report, one at a time.
pub struct BatchRunner<'a> {
    speech: &'a dyn TTSSpeechProvider,
    converter: &'a dyn AudioConverter,
    gate: ExistenceGate,
    options: RunOptions,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        speech: &'a dyn TTSSpeechProvider,
        converter: &'a dyn AudioConverter,
        options: RunOptions,
    ) -> Self {
        let gate = ExistenceGate::new(
            OutputLayout::new(options.output_root.clone()),
            options.regenerate,
        );
        Self {
            speech,
            converter,
            gate,
            options,
        }
    }

    /// Process every row in order and merge the produced entries into the report.
    ///
    /// In fail-fast mode the first failure is returned as [`BatchError::ItemFailed`]
    /// once the report holds every item completed before it.
    pub async fn run(&self, rows: &[RawItem]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for (index, raw) in rows.iter().enumerate() {
            let row = index + 1;
            match self.run_row(raw, row).await {
                Ok(outcome) => {
                    if let ItemOutcome::Generated {
                        key, duration_secs, ..
                    } = &outcome
                    {
                        summary.report.insert(key.clone(), *duration_secs);
                    }
                    summary.outcomes.push(outcome);
                }
                Err((key, err)) => {
                    summary.outcomes.push(ItemOutcome::Failed {
                        row,
                        key: key.clone(),
                        error: err.to_string(),
                    });

                    if self.options.failure_mode == FailureMode::FailFast {
                        log::error!("row {row} failed: {err}; row data: {raw:?}");
                        summary.report.merge_into_file(&self.options.report_path)?;
                        return Err(BatchError::ItemFailed {
                            row,
                            key: key.unwrap_or_default(),
                            source: Box::new(err),
                        });
                    }
                    log::warn!("row {row} failed: {err}; row data: {raw:?}");
                }
            }
        }

        summary.report.merge_into_file(&self.options.report_path)?;
        log::info!(
            "done: {} generated, {} skipped, {} failed",
            summary.generated(),
            summary.skipped(),
            summary.failed()
        );
        Ok(summary)
    }

    async fn run_row(
        &self,
        raw: &RawItem,
        row: usize,
    ) -> std::result::Result<ItemOutcome, (Option<String>, BatchError)> {
        let item = raw.resolve(row).map_err(|e| (None, e))?;

        match self.gate.check(&item) {
            GateDecision::Skip { key, path } => {
                log::info!(
                    "skipping {} as it already exists and regenerate is not set",
                    path.display()
                );
                Ok(ItemOutcome::Skipped { row, key })
            }
            GateDecision::Proceed { key, path } => match self.produce(&item, &path).await {
                Ok(duration_secs) => Ok(ItemOutcome::Generated {
                    row,
                    key,
                    duration_secs,
                }),
                Err(err) => Err((Some(key), err)),
            },
        }
    }

    /// Generate into scratch, convert to `destination` and return the clip duration.
    async fn produce(&self, item: &WorkItem, destination: &Path) -> Result<f64> {
        let settings = item.convert_settings();
        settings.validate()?;
        let encoding = self.payload_encoding(item)?;
        let scratch = self.generate_to_scratch(item).await?;

        let report = self.converter.convert(
            scratch.path(),
            encoding,
            &settings,
            destination,
        )?;
        log::info!(
            "converted to {} ({:.3}s)",
            destination.display(),
            report.duration_secs
        );
        Ok(report.duration_secs)
    }

    /// Encoding the converter will use, checked before any request is sent.
    fn payload_encoding(&self, item: &WorkItem) -> Result<SourceEncoding> {
        let format = &item.generate_format;
        if !self.speech.supported_codecs().contains(&format.codec) {
            return Err(BatchError::UnsupportedFormat {
                row: item.row,
                format: format.to_string(),
                reason: "the speech provider does not produce this codec",
            });
        }
        source_encoding(format).ok_or_else(|| BatchError::UnsupportedFormat {
            row: item.row,
            format: format.to_string(),
            reason: "no decoder is available for this codec",
        })
    }

    async fn generate_to_scratch(&self, item: &WorkItem) -> Result<NamedTempFile> {
        let mut file = {
            let suffix = format!(".{}", item.generate_format.extension());
            let mut builder = tempfile::Builder::new();
            builder.prefix("voicelines-").suffix(&suffix);
            match &self.options.scratch_dir {
                Some(dir) => {
                    std::fs::create_dir_all(dir)?;
                    builder.tempfile_in(dir)?
                }
                None => builder.tempfile()?,
            }
        };

        let mut stream = self
            .speech
            .generate_speech_stream(item.speech_request())
            .await?;
        let mut written = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)?;
            written += chunk.len();
        }
        file.flush()?;

        if written == 0 {
            return Err(TTSError::Other(
                "provider returned no audio".to_string(),
                format!("voice {}", item.voice_id),
            )
            .into());
        }

        log::info!(
            "generated {} bytes of {} for row {}",
            written,
            item.generate_format,
            item.row
        );
        Ok(file)
    }
}
