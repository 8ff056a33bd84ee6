use crate::error::{Result, SightlineError};
use std::collections::VecDeque;

/// Trait for streaming speech recognizers.
///
/// The listener feeds every captured chunk through `accept_chunk`; the
/// recognizer buffers audio internally and emits a transcript when it decides
/// an utterance has ended. Most chunks produce `Ok(None)`.
pub trait UtteranceRecognizer: Send {
    /// Feed one chunk of 16-bit PCM mono audio.
    ///
    /// Returns `Ok(Some(transcript))` when a complete utterance was
    /// recognized, `Ok(None)` while listening.
    fn accept_chunk(&mut self, samples: &[i16]) -> Result<Option<String>>;
}

#[derive(Debug, Clone)]
enum MockStep {
    Transcript(String),
    Silence,
    Failure(String),
}

/// Mock recognizer for testing.
///
/// Serves a script of responses, one per chunk; once exhausted every chunk
/// is silence.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    script: VecDeque<MockStep>,
    chunks_seen: usize,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next chunk completes an utterance with this transcript.
    pub fn with_transcript(mut self, transcript: &str) -> Self {
        self.script
            .push_back(MockStep::Transcript(transcript.to_string()));
        self
    }

    /// The next chunk is heard but produces no transcript.
    pub fn with_silence(mut self) -> Self {
        self.script.push_back(MockStep::Silence);
        self
    }

    /// The next chunk fails recognition.
    pub fn with_failure(mut self, message: &str) -> Self {
        self.script.push_back(MockStep::Failure(message.to_string()));
        self
    }

    /// Number of chunks fed so far.
    pub fn chunks_seen(&self) -> usize {
        self.chunks_seen
    }
}

impl UtteranceRecognizer for MockRecognizer {
    fn accept_chunk(&mut self, _samples: &[i16]) -> Result<Option<String>> {
        self.chunks_seen += 1;
        match self.script.pop_front() {
            Some(MockStep::Transcript(text)) => Ok(Some(text)),
            Some(MockStep::Silence) | None => Ok(None),
            Some(MockStep::Failure(message)) => Err(SightlineError::Recognition { message }),
        }
    }
}
