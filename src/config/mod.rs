//! Configuration system (layered: defaults < TOML file < environment).

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::audio::provider::DEFAULT_CHUNK_SIZE;
use crate::audio::types::{is_valid_speed, AudioFormat};
use crate::error::{MurmurError, Result};
use crate::util::text::DEFAULT_PREVIEW_CHARS;

/// Which synthesizer the pipeline is composed with.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SynthesisBackend {
    /// Speech-to-text only; synthesis requests are declined.
    #[default]
    Disabled,
    /// Synthesis delegated to a linked speech provider.
    Provider,
}

/// Settings for the synthesis side of the pipeline.
///
/// Resolution order:
/// 1. Built-in defaults
/// 2. TOML file (`MurmurConfig::from_file`)
/// 3. `MURMUR_*` environment variables (a `.env` file is honoured)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MurmurConfig {
    pub backend: SynthesisBackend,
    /// Characters of synthesis text echoed into diagnostics.
    pub log_preview_chars: usize,
    /// Bytes per audio chunk written to the sink.
    pub chunk_size: usize,
    pub voice: String,
    pub format: AudioFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl Default for MurmurConfig {
    fn default() -> Self {
        Self {
            backend: SynthesisBackend::Disabled,
            log_preview_chars: DEFAULT_PREVIEW_CHARS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            voice: "default".to_string(),
            format: AudioFormat::Pcm16,
            speed: None,
        }
    }
}

const ENV_BACKEND: &str = "MURMUR_SYNTHESIS_BACKEND";
const ENV_PREVIEW_CHARS: &str = "MURMUR_LOG_PREVIEW_CHARS";
const ENV_CHUNK_SIZE: &str = "MURMUR_CHUNK_SIZE";
const ENV_VOICE: &str = "MURMUR_VOICE";
const ENV_FORMAT: &str = "MURMUR_AUDIO_FORMAT";
const ENV_SPEED: &str = "MURMUR_SPEECH_SPEED";

impl MurmurConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Defaults (or `path`, if given) overridden by environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `MURMUR_*` overrides read through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_BACKEND) {
            self.backend = parse_env(ENV_BACKEND, &value)?;
        }
        if let Some(value) = lookup(ENV_PREVIEW_CHARS) {
            self.log_preview_chars = parse_env(ENV_PREVIEW_CHARS, &value)?;
        }
        if let Some(value) = lookup(ENV_CHUNK_SIZE) {
            self.chunk_size = parse_env(ENV_CHUNK_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_VOICE) {
            self.voice = value;
        }
        if let Some(value) = lookup(ENV_FORMAT) {
            self.format = parse_env(ENV_FORMAT, &value)?;
        }
        if let Some(value) = lookup(ENV_SPEED) {
            self.speed = Some(parse_env(ENV_SPEED, &value)?);
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(MurmurError::Configuration(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.voice.trim().is_empty() {
            return Err(MurmurError::Configuration(
                "voice cannot be empty".to_string(),
            ));
        }
        if let Some(speed) = self.speed {
            if !is_valid_speed(speed) {
                return Err(MurmurError::Configuration(
                    "speed must be between 0.25 and 4.0".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|e| MurmurError::Configuration(format!("Failed to render config: {e}")))
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| MurmurError::Configuration(format!("Invalid {key} value '{value}': {e}")))
}
