//! Utterance segmentation.
//!
//! Splits a continuous microphone stream into discrete utterances using
//! RMS-based thresholding: speech accumulates into a buffer, and a long
//! enough silence gap closes the utterance out.

use crate::defaults;

/// Tuning for [`UtteranceSegmenter`].
#[derive(Debug, Clone, Copy)]
pub struct SegmenterConfig {
    /// RMS threshold for detecting speech (0.0 to 1.0).
    pub speech_threshold: f32,
    /// Duration of silence that ends an utterance (milliseconds).
    pub silence_duration_ms: u32,
    /// Utterances with less speech than this are discarded as noise (milliseconds).
    pub min_speech_ms: u32,
    /// Sample rate of the incoming audio in Hz.
    pub sample_rate: u32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            speech_threshold: defaults::VAD_THRESHOLD,
            silence_duration_ms: defaults::SILENCE_DURATION_MS,
            min_speech_ms: defaults::MIN_SPEECH_MS,
            sample_rate: defaults::SAMPLE_RATE,
        }
    }
}

/// Accumulates chunks into utterances bounded by silence.
#[derive(Debug)]
pub struct UtteranceSegmenter {
    config: SegmenterConfig,
    buffer: Vec<i16>,
    speaking: bool,
    silence_ms: u32,
}

impl UtteranceSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self {
            config,
            buffer: Vec::new(),
            speaking: false,
            silence_ms: 0,
        }
    }

    /// Feed one chunk; returns a complete utterance when the silence gap
    /// closes one out.
    pub fn push(&mut self, samples: &[i16]) -> Option<Vec<i16>> {
        if samples.is_empty() {
            return None;
        }

        let rms = calculate_rms(samples);
        let chunk_ms =
            (samples.len() as u64 * 1000 / self.config.sample_rate.max(1) as u64) as u32;

        if rms > self.config.speech_threshold {
            self.speaking = true;
            self.silence_ms = 0;
            self.buffer.extend_from_slice(samples);
            return None;
        }

        if !self.speaking {
            return None;
        }

        // Trailing silence is kept in the buffer so the recognizer sees a
        // clean utterance end.
        self.buffer.extend_from_slice(samples);
        self.silence_ms += chunk_ms;

        if self.silence_ms < self.config.silence_duration_ms {
            return None;
        }

        let silence_ms = self.silence_ms;
        self.speaking = false;
        self.silence_ms = 0;
        let utterance = std::mem::take(&mut self.buffer);

        let total_ms =
            (utterance.len() as u64 * 1000 / self.config.sample_rate.max(1) as u64) as u32;
        if total_ms.saturating_sub(silence_ms) < self.config.min_speech_ms {
            return None;
        }
        Some(utterance)
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.speaking = false;
        self.silence_ms = 0;
    }
}

/// Calculates the Root Mean Square (RMS) of audio samples.
///
/// Returns a normalized value (0.0 to 1.0), where 0.0 is silence and
/// ~0.707 is a full-scale sine wave.
pub fn calculate_rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples
        .iter()
        .map(|&sample| {
            let normalized = sample as f64 / i16::MAX as f64;
            normalized * normalized
        })
        .sum();

    let mean_square = sum_squares / samples.len() as f64;
    mean_square.sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    // 100 ms of audio at 16 kHz.
    const CHUNK: usize = 1600;

    fn config() -> SegmenterConfig {
        SegmenterConfig {
            speech_threshold: 0.02,
            silence_duration_ms: 300,
            min_speech_ms: 150,
            sample_rate: 16000,
        }
    }

    fn speech_chunk() -> Vec<i16> {
        vec![3000; CHUNK]
    }

    fn silence_chunk() -> Vec<i16> {
        vec![0; CHUNK]
    }

    #[test]
    fn rms_of_silence_is_zero() {
        assert_eq!(calculate_rms(&silence_chunk()), 0.0);
        assert_eq!(calculate_rms(&[]), 0.0);
    }

    #[test]
    fn rms_scales_with_amplitude() {
        let quiet = calculate_rms(&vec![100i16; CHUNK]);
        let loud = calculate_rms(&vec![10000i16; CHUNK]);
        assert!(loud > quiet);
        assert!(loud <= 1.0);
    }

    #[test]
    fn silence_alone_never_emits() {
        let mut segmenter = UtteranceSegmenter::new(config());
        for _ in 0..20 {
            assert_eq!(segmenter.push(&silence_chunk()), None);
        }
        assert!(!segmenter.is_speaking());
    }

    #[test]
    fn speech_then_silence_gap_emits_the_utterance() {
        let mut segmenter = UtteranceSegmenter::new(config());

        // 300 ms of speech
        for _ in 0..3 {
            assert_eq!(segmenter.push(&speech_chunk()), None);
        }
        assert!(segmenter.is_speaking());

        // 200 ms of silence: not enough to close out
        assert_eq!(segmenter.push(&silence_chunk()), None);
        assert_eq!(segmenter.push(&silence_chunk()), None);

        // 300 ms total silence crosses the gap
        let utterance = segmenter.push(&silence_chunk()).expect("utterance");
        // 3 speech + 3 silence chunks
        assert_eq!(utterance.len(), 6 * CHUNK);
        assert!(!segmenter.is_speaking());
    }

    #[test]
    fn speech_resuming_mid_gap_keeps_accumulating() {
        let mut segmenter = UtteranceSegmenter::new(config());

        segmenter.push(&speech_chunk());
        segmenter.push(&speech_chunk());
        assert_eq!(segmenter.push(&silence_chunk()), None);
        // Speech resumes; the silence counter resets.
        assert_eq!(segmenter.push(&speech_chunk()), None);
        assert_eq!(segmenter.push(&silence_chunk()), None);
        assert_eq!(segmenter.push(&silence_chunk()), None);

        let utterance = segmenter.push(&silence_chunk()).expect("utterance");
        assert_eq!(utterance.len(), 7 * CHUNK);
    }

    #[test]
    fn too_short_utterances_are_discarded_as_noise() {
        let mut segmenter = UtteranceSegmenter::new(SegmenterConfig {
            min_speech_ms: 250,
            ..config()
        });

        // Only 100 ms of speech
        segmenter.push(&speech_chunk());
        segmenter.push(&silence_chunk());
        segmenter.push(&silence_chunk());
        assert_eq!(segmenter.push(&silence_chunk()), None);
        assert!(!segmenter.is_speaking());
    }

    #[test]
    fn reset_clears_mid_utterance_state() {
        let mut segmenter = UtteranceSegmenter::new(config());
        segmenter.push(&speech_chunk());
        assert!(segmenter.is_speaking());

        segmenter.reset();
        assert!(!segmenter.is_speaking());

        // After reset, the old speech is gone.
        for _ in 0..3 {
            assert_eq!(segmenter.push(&silence_chunk()), None);
        }
    }

    #[test]
    fn empty_chunks_are_ignored() {
        let mut segmenter = UtteranceSegmenter::new(config());
        segmenter.push(&speech_chunk());
        assert_eq!(segmenter.push(&[]), None);
        assert!(segmenter.is_speaking());
    }
}
