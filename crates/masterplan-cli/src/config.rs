use anyhow::Context;
use masterplan_types::{RowSetId, ScalePresetId, ScenarioParameters, Tdi};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "MASTERPLAN_CONFIG_PATH";
/// File read when [`CONFIG_PATH_ENV`] is unset
pub const DEFAULT_CONFIG_PATH: &str = "masterplan.toml";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for the masterplan crates, e.g. `info` or `debug`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

/// Site parameters used by `template` for a fresh scenario
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DefaultsConfig {
    pub preset: ScalePresetId,
    pub row_set: RowSetId,
    pub tdi: Tdi,
    pub gsa: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let parameters = ScenarioParameters::default();
        Self {
            preset: parameters.preset_id,
            row_set: parameters.row_set_id,
            tdi: parameters.tdi,
            gsa: parameters.gsa,
        }
    }
}

impl DefaultsConfig {
    pub fn parameters(&self) -> ScenarioParameters {
        ScenarioParameters {
            gsa: self.gsa,
            tdi: self.tdi,
            preset_id: self.preset,
            row_set_id: self.row_set,
            ..ScenarioParameters::default()
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MasterplanConfig {
    pub logging: LoggingConfig,
    pub defaults: DefaultsConfig,
    pub output: OutputConfig,
    /// File the configuration was read from; `None` when the built-in defaults are in use
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl MasterplanConfig {
    /// Reads the file named by `MASTERPLAN_CONFIG_PATH`, or `masterplan.toml`.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&config_path))
    }

    /// A missing file yields the defaults. A file that cannot be read or does not
    /// parse is an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let config_str = match fs::read_to_string(path) {
            Ok(config_str) => config_str,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read configuration file '{}'", path.display()));
            }
        };
        let mut config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file '{}'", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml_str(config_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Applies `MASTERPLAN_*` environment overrides. Values that do not parse are ignored.
    pub fn apply_profile(mut self) -> Self {
        if let Ok(level) = std::env::var("MASTERPLAN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(preset) = std::env::var("MASTERPLAN_DEFAULT_PRESET") {
            if let Some(preset) = parse_preset(&preset) {
                self.defaults.preset = preset;
            }
        }
        if let Ok(pretty) = std::env::var("MASTERPLAN_PRETTY") {
            if let Ok(pretty) = pretty.parse::<bool>() {
                self.output.pretty = pretty;
            }
        }
        self
    }
}

fn parse_preset(value: &str) -> Option<ScalePresetId> {
    match value.trim().to_ascii_uppercase().as_str() {
        "S1" => Some(ScalePresetId::S1),
        "S2" => Some(ScalePresetId::S2),
        "S3" => Some(ScalePresetId::S3),
        "S4" => Some(ScalePresetId::S4),
        _ => None,
    }
}
