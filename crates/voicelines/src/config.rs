use crate::error::{BatchError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use voicelines_audio::TranscoderConfig;
use voicelines_speech::providers::elevenlabs::ElevenLabsConfig;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "voicelines.toml";

/// Settings for a batch run, layered from defaults, a TOML file and the environment.
/// Command line flags are applied on top by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub elevenlabs: ElevenLabsConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub audio: TranscoderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root of the converted output tree
    #[serde(default = "default_output_root")]
    pub root: PathBuf,

    /// Directory for per-item generator output, the system temp dir when unset
    #[serde(default)]
    pub scratch: Option<PathBuf>,

    /// Report file, `<root>/report.csv` when unset
    #[serde(default)]
    pub report: Option<PathBuf>,
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            scratch: None,
            report: None,
        }
    }
}

impl OutputConfig {
    pub fn report_path(&self) -> PathBuf {
        self.report
            .clone()
            .unwrap_or_else(|| self.root.join("report.csv"))
    }
}

pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

pub fn parse_config_str(toml: &str) -> Result<RunConfig> {
    let config: RunConfig = toml::from_str(toml)?;
    Ok(config)
}

impl RunConfig {
    /// Load `explicit` if given (it must exist), otherwise `voicelines.toml` when
    /// present, otherwise defaults. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(BatchError::ConfigError(format!(
                        "config file {} not found",
                        path.display()
                    )));
                }
                parse_config_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                log::debug!("using {DEFAULT_CONFIG_FILE}");
                parse_config_file(DEFAULT_CONFIG_FILE)?
            }
            None => RunConfig::default(),
        };
        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        self.elevenlabs = self.elevenlabs.with_env_overrides();
        self.audio = self.audio.with_env_overrides();
        self
    }
}
