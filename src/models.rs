//! Model artifact layout.
//!
//! Sightline does not download models; the user provisions them into the
//! models directory. This module knows the expected file names and reports
//! what is present, for the startup warning and `sightline check`.

use crate::config::Config;
use std::path::{Path, PathBuf};

/// One expected artifact and whether it is present.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub name: &'static str,
    pub path: PathBuf,
    pub present: bool,
}

/// Resolves artifact paths inside the configured models directory.
#[derive(Debug, Clone)]
pub struct ModelsLayout {
    dir: PathBuf,
    voice_model_file: String,
}

impl ModelsLayout {
    pub fn new(dir: impl Into<PathBuf>, voice_model_file: &str) -> Self {
        Self {
            dir: dir.into(),
            voice_model_file: voice_model_file.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.models.dir.clone(), &config.voice.model_file)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Obstacle detector used by navigation.
    pub fn navigation_detector(&self) -> PathBuf {
        self.dir.join("yolov8m.onnx")
    }

    /// Monocular depth estimator used to flag very close obstacles.
    pub fn depth_estimator(&self) -> PathBuf {
        self.dir.join("midas_small.onnx")
    }

    /// Road sign detector.
    pub fn sign_detector(&self) -> PathBuf {
        self.dir.join("signs-yolov8.onnx")
    }

    /// Currency note classifier.
    pub fn currency_classifier(&self) -> PathBuf {
        self.dir.join("currency-cnn.onnx")
    }

    /// Speech recognition model for voice commands.
    pub fn voice_model(&self) -> PathBuf {
        self.dir.join(&self.voice_model_file)
    }

    /// Presence report over every expected artifact.
    pub fn report(&self) -> Vec<ModelArtifact> {
        let entries = [
            ("navigation detector", self.navigation_detector()),
            ("depth estimator", self.depth_estimator()),
            ("sign detector", self.sign_detector()),
            ("currency classifier", self.currency_classifier()),
            ("voice model", self.voice_model()),
        ];

        entries
            .into_iter()
            .map(|(name, path)| ModelArtifact {
                name,
                present: path.exists(),
                path,
            })
            .collect()
    }

    /// Names of the artifacts that are missing.
    pub fn missing(&self) -> Vec<&'static str> {
        self.report()
            .into_iter()
            .filter(|artifact| !artifact.present)
            .map(|artifact| artifact.name)
            .collect()
    }
}
