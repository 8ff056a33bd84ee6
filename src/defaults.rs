//! Default values used across the application.
//!
//! Centralized here so config, CLI help text, and tests stay in sync.

use std::time::Duration;

/// Camera device index opened by the stock binary.
pub const CAMERA_DEVICE_INDEX: u32 = 0;

/// Delay before retrying after a failed frame read.
pub const FRAME_RETRY: Duration = Duration::from_millis(500);

/// Pause between mode-loop iterations when no command arrived.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(30);

/// Window during which an identical narration is suppressed.
pub const SPEECH_DEBOUNCE: Duration = Duration::from_secs(3);

/// Maximum time shutdown waits for an in-flight narration.
pub const SPEECH_SHUTDOWN_WAIT: Duration = Duration::from_millis(500);

/// Speaking rate passed to the synthesis tool, in words per minute.
pub const SPEECH_RATE_WPM: u32 = 150;

/// Detections below this confidence are ignored by navigation.
pub const DETECTION_MIN_CONFIDENCE: f32 = 0.5;

/// Confidence gate for sign and currency announcements.
pub const ANNOUNCE_CONFIDENCE: f32 = 0.7;

/// Depth estimate below which navigation adds a proximity warning, in meters.
pub const CLOSE_RANGE_M: f32 = 1.0;

/// An unchanged observation is re-announced after this long.
pub const ANNOUNCE_REPEAT: Duration = Duration::from_secs(5);

/// A stale currency reading is forgotten after this long without detections.
pub const CURRENCY_RESET: Duration = Duration::from_secs(10);

/// Minimum time between scene caption generations.
pub const CAPTION_INTERVAL: Duration = Duration::from_secs(5);

/// Number of one-second waits on the voice queue before falling back
/// to the typed prompt.
pub const VOICE_PROMPT_TICKS: u32 = 5;

/// Pause between checks of the voice command queue at the menu.
pub const VOICE_PROMPT_TICK: Duration = Duration::from_secs(1);

/// Default audio sample rate in Hz (expected by the recognizer).
pub const SAMPLE_RATE: u32 = 16000;

/// Default RMS threshold for speech detection (0.0 to 1.0).
pub const VAD_THRESHOLD: f32 = 0.02;

/// Silence gap that ends a spoken command, in milliseconds.
pub const SILENCE_DURATION_MS: u32 = 800;

/// Utterances shorter than this are discarded as noise, in milliseconds.
pub const MIN_SPEECH_MS: u32 = 300;

/// Pause between audio reads in the voice listener loop.
pub const LISTENER_POLL: Duration = Duration::from_millis(30);

/// Default recognizer model file name, resolved inside the models dir.
pub const VOICE_MODEL_FILE: &str = "ggml-base.en.bin";

/// Default recognizer language.
pub const VOICE_LANGUAGE: &str = "en";

/// Default models directory, relative to the working directory.
pub const MODELS_DIR: &str = "models";
