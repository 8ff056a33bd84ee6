//! Voice commands: microphone transcripts classified into mode tokens.
//!
//! The channel owns a background listener thread that segments utterances
//! out of the audio stream, transcribes them, and queues any recognized
//! commands for the mode loops to poll.

pub mod backend;
pub mod channel;
pub mod intent;
pub mod recognizer;
pub mod segmenter;
#[cfg(feature = "whisper")]
pub mod whisper;

pub use backend::create_voice_backend;
pub use channel::{ChannelState, VoiceCommandChannel};
pub use recognizer::{MockRecognizer, UtteranceRecognizer};
pub use segmenter::{SegmenterConfig, UtteranceSegmenter, calculate_rms};
#[cfg(feature = "whisper")]
pub use whisper::{WhisperRecognizer, WhisperRecognizerConfig};
