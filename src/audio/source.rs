use crate::error::{Result, SightlineError};
use std::collections::VecDeque;

/// Trait for audio source devices.
///
/// This trait allows swapping implementations (real microphone vs mock).
/// `read_samples` drains whatever has been captured since the previous read
/// and never blocks waiting for more audio.
pub trait AudioSource: Send + Sync {
    /// Start capturing audio from the source.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing audio from the source.
    fn stop(&mut self) -> Result<()>;

    /// Read accumulated 16-bit PCM samples. May return an empty vector.
    fn read_samples(&mut self) -> Result<Vec<i16>>;
}

/// Mock audio source for testing.
///
/// Serves a script of sample chunks, one per read, then falls back to the
/// configured repeat chunk (empty by default).
#[derive(Debug, Clone)]
pub struct MockAudioSource {
    is_started: bool,
    chunks: VecDeque<Vec<i16>>,
    repeat: Vec<i16>,
    should_fail_start: bool,
    should_fail_read: bool,
    error_message: String,
}

impl MockAudioSource {
    pub fn new() -> Self {
        Self {
            is_started: false,
            chunks: VecDeque::new(),
            repeat: Vec::new(),
            should_fail_start: false,
            should_fail_read: false,
            error_message: "mock audio error".to_string(),
        }
    }

    /// Queue a chunk to be returned by the next unserved read.
    pub fn with_chunk(mut self, samples: Vec<i16>) -> Self {
        self.chunks.push_back(samples);
        self
    }

    /// Chunk returned once the script is exhausted.
    pub fn with_repeating(mut self, samples: Vec<i16>) -> Self {
        self.repeat = samples;
        self
    }

    /// Configure the mock to fail on start.
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on read.
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_read = true;
        self
    }

    /// Configure the error message for failures.
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl Default for MockAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for MockAudioSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            return Err(SightlineError::AudioCapture {
                message: self.error_message.clone(),
            });
        }
        self.is_started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<i16>> {
        if self.should_fail_read {
            return Err(SightlineError::AudioCapture {
                message: self.error_message.clone(),
            });
        }
        Ok(self.chunks.pop_front().unwrap_or_else(|| self.repeat.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_chunks_are_served_in_order_then_repeat() {
        let mut source = MockAudioSource::new()
            .with_chunk(vec![1, 2, 3])
            .with_chunk(vec![4, 5])
            .with_repeating(vec![0; 4]);

        assert_eq!(source.read_samples().unwrap(), vec![1, 2, 3]);
        assert_eq!(source.read_samples().unwrap(), vec![4, 5]);
        assert_eq!(source.read_samples().unwrap(), vec![0; 4]);
        assert_eq!(source.read_samples().unwrap(), vec![0; 4]);
    }

    #[test]
    fn exhausted_script_without_repeat_reads_empty() {
        let mut source = MockAudioSource::new();
        assert!(source.read_samples().unwrap().is_empty());
    }

    #[test]
    fn start_failure_reports_the_configured_message() {
        let mut source = MockAudioSource::new()
            .with_start_failure()
            .with_error_message("device unplugged");

        match source.start() {
            Err(SightlineError::AudioCapture { message }) => {
                assert_eq!(message, "device unplugged");
            }
            other => panic!("Expected AudioCapture error, got {:?}", other),
        }
        assert!(!source.is_started());
    }

    #[test]
    fn read_failure_is_reported() {
        let mut source = MockAudioSource::new().with_read_failure();
        assert!(source.read_samples().is_err());
    }

    #[test]
    fn start_stop_tracks_state() {
        let mut source = MockAudioSource::new();
        assert!(!source.is_started());
        source.start().unwrap();
        assert!(source.is_started());
        source.stop().unwrap();
        assert!(!source.is_started());
    }

    #[test]
    fn trait_is_object_safe() {
        let mut source: Box<dyn AudioSource> =
            Box::new(MockAudioSource::new().with_chunk(vec![7, 8, 9]));
        source.start().unwrap();
        assert_eq!(source.read_samples().unwrap(), vec![7, 8, 9]);
        source.stop().unwrap();
    }
}
