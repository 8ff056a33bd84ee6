use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub models: ModelsConfig,
    pub audio: AudioConfig,
    pub voice: VoiceConfig,
    pub speech: SpeechConfig,
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub device_index: u32,
}

/// Model artifact locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelsConfig {
    pub dir: PathBuf,
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub device: Option<String>,
    pub sample_rate: u32,
}

/// Voice command recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoiceConfig {
    /// Recognizer model file name, resolved inside the models dir.
    pub model_file: String,
    pub language: String,
    /// RMS threshold for detecting speech (0.0 to 1.0).
    pub speech_threshold: f32,
    /// Silence gap that ends a spoken command (milliseconds).
    pub silence_duration_ms: u32,
    /// Utterances shorter than this are discarded as noise (milliseconds).
    pub min_speech_ms: u32,
}

/// Spoken narration configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether narration starts enabled.
    pub enabled: bool,
    /// Speaking rate in words per minute.
    pub rate_wpm: u32,
    /// Synthesis tool override; autodetected when unset.
    pub tool: Option<String>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: defaults::CAMERA_DEVICE_INDEX,
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(defaults::MODELS_DIR),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: defaults::SAMPLE_RATE,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            model_file: defaults::VOICE_MODEL_FILE.to_string(),
            language: defaults::VOICE_LANGUAGE.to_string(),
            speech_threshold: defaults::VAD_THRESHOLD,
            silence_duration_ms: defaults::SILENCE_DURATION_MS,
            min_speech_ms: defaults::MIN_SPEECH_MS,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rate_wpm: defaults::SPEECH_RATE_WPM,
            tool: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file, or defaults if the file is missing.
    ///
    /// Invalid TOML is an error; only a missing file falls back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e.context(format!("failed to load config from {}", path.display())))
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - SIGHTLINE_MODELS_DIR → models.dir
    /// - SIGHTLINE_AUDIO_DEVICE → audio.device
    /// - SIGHTLINE_SPEECH_TOOL → speech.tool
    /// - SIGHTLINE_VOICE_MODEL → voice.model_file
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var("SIGHTLINE_MODELS_DIR")
            && !dir.is_empty()
        {
            self.models.dir = PathBuf::from(dir);
        }

        if let Ok(device) = std::env::var("SIGHTLINE_AUDIO_DEVICE")
            && !device.is_empty()
        {
            self.audio.device = Some(device);
        }

        if let Ok(tool) = std::env::var("SIGHTLINE_SPEECH_TOOL")
            && !tool.is_empty()
        {
            self.speech.tool = Some(tool);
        }

        if let Ok(model) = std::env::var("SIGHTLINE_VOICE_MODEL")
            && !model.is_empty()
        {
            self.voice.model_file = model;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/sightline/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sightline")
            .join("config.toml")
    }
}
