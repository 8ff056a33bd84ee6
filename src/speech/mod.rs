//! Spoken narration: the synthesizer seam, the espeak backend, and the
//! narration engine with its single-flight and debounce policies.

pub mod espeak;
pub mod output;
pub mod synthesizer;

pub use espeak::{CommandExecutor, EspeakSynthesizer, SystemCommandExecutor, detect_speech_tool};
pub use output::{SpeakOutcome, SpeechOutput, SpeechOutputConfig};
pub use synthesizer::{MockSynthesizer, Synthesizer, SynthesizerFactory};
