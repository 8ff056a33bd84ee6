//! Whisper-based utterance recognition.
//!
//! Combines the RMS segmenter with whisper-rs: chunks accumulate until a
//! silence gap closes an utterance, then the whole utterance is transcribed
//! in one inference call.
//!
//! # Feature Gate
//!
//! Requires the `whisper` feature (and cmake to build whisper.cpp).

use crate::error::{Result, SightlineError};
use crate::voice::recognizer::UtteranceRecognizer;
use crate::voice::segmenter::{SegmenterConfig, UtteranceSegmenter};
use std::path::PathBuf;
use std::sync::Once;
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for the whisper recognizer.
#[derive(Debug, Clone)]
pub struct WhisperRecognizerConfig {
    /// Path to the ggml model file.
    pub model_path: PathBuf,
    /// Language code (e.g., "en").
    pub language: String,
    /// Sample rate of the incoming audio in Hz.
    pub sample_rate: u32,
    /// RMS threshold for detecting speech (0.0 to 1.0).
    pub speech_threshold: f32,
    /// Silence gap that ends a spoken command (milliseconds).
    pub silence_duration_ms: u32,
    /// Utterances shorter than this are discarded as noise (milliseconds).
    pub min_speech_ms: u32,
}

/// Streaming recognizer backed by whisper.cpp.
pub struct WhisperRecognizer {
    context: WhisperContext,
    segmenter: UtteranceSegmenter,
    language: String,
}

impl std::fmt::Debug for WhisperRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperRecognizer")
            .field("language", &self.language)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}

impl WhisperRecognizer {
    /// Load the model and prepare the segmenter.
    ///
    /// # Errors
    /// Returns [`SightlineError::ModelNotFound`] if the model file doesn't
    /// exist, or [`SightlineError::Recognition`] if loading fails.
    pub fn new(config: WhisperRecognizerConfig) -> Result<Self> {
        // Suppress whisper.cpp's own logging (only once per process).
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        if !config.model_path.exists() {
            return Err(SightlineError::ModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let context = WhisperContext::new_with_params(
            config
                .model_path
                .to_str()
                .ok_or_else(|| SightlineError::Recognition {
                    message: "Invalid UTF-8 in model path".to_string(),
                })?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| SightlineError::Recognition {
            message: format!("Failed to load Whisper model: {}", e),
        })?;

        let segmenter = UtteranceSegmenter::new(SegmenterConfig {
            speech_threshold: config.speech_threshold,
            silence_duration_ms: config.silence_duration_ms,
            min_speech_ms: config.min_speech_ms,
            sample_rate: config.sample_rate,
        });

        Ok(Self {
            context,
            segmenter,
            language: config.language,
        })
    }

    /// Convert i16 audio samples to f32 normalized to [-1.0, 1.0],
    /// the format whisper expects.
    fn convert_audio(samples: &[i16]) -> Vec<f32> {
        samples
            .iter()
            .map(|&sample| sample as f32 / 32768.0)
            .collect()
    }

    fn transcribe(&self, audio: &[i16]) -> Result<String> {
        let audio_f32 = Self::convert_audio(audio);

        let mut state = self
            .context
            .create_state()
            .map_err(|e| SightlineError::Recognition {
                message: format!("Failed to create Whisper state: {}", e),
            })?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(&self.language));
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, &audio_f32)
            .map_err(|e| SightlineError::Recognition {
                message: format!("Whisper inference failed: {}", e),
            })?;

        let mut transcript = String::new();
        for segment in state.as_iter() {
            transcript.push_str(&segment.to_string());
        }

        Ok(transcript.trim().to_string())
    }
}

impl UtteranceRecognizer for WhisperRecognizer {
    fn accept_chunk(&mut self, samples: &[i16]) -> Result<Option<String>> {
        let Some(utterance) = self.segmenter.push(samples) else {
            return Ok(None);
        };

        let transcript = self.transcribe(&utterance)?;
        if transcript.is_empty() {
            return Ok(None);
        }
        Ok(Some(transcript))
    }
}
