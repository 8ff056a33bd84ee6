//! Production voice backend wiring.
//!
//! Builds the microphone source and whisper recognizer from config. When the
//! build lacks either backend feature, requests fail fast with
//! `VoiceUnsupported` before any listener state changes.

use crate::audio::source::AudioSource;
use crate::config::Config;
use crate::error::Result;
use crate::voice::recognizer::UtteranceRecognizer;

#[cfg(all(feature = "whisper", feature = "cpal-audio"))]
pub fn create_voice_backend(
    config: &Config,
) -> Result<(Box<dyn AudioSource>, Box<dyn UtteranceRecognizer>)> {
    use crate::audio::capture::CpalAudioSource;
    use crate::voice::whisper::{WhisperRecognizer, WhisperRecognizerConfig};

    let recognizer = WhisperRecognizer::new(WhisperRecognizerConfig {
        model_path: config.models.dir.join(&config.voice.model_file),
        language: config.voice.language.clone(),
        sample_rate: config.audio.sample_rate,
        speech_threshold: config.voice.speech_threshold,
        silence_duration_ms: config.voice.silence_duration_ms,
        min_speech_ms: config.voice.min_speech_ms,
    })?;
    let audio = CpalAudioSource::new(config.audio.device.as_deref())?;

    Ok((Box::new(audio), Box::new(recognizer)))
}

#[cfg(not(all(feature = "whisper", feature = "cpal-audio")))]
pub fn create_voice_backend(
    _config: &Config,
) -> Result<(Box<dyn AudioSource>, Box<dyn UtteranceRecognizer>)> {
    Err(crate::error::SightlineError::VoiceUnsupported {
        reason: "this build lacks the whisper and cpal-audio features".to_string(),
    })
}
