use crate::error::{Result, SightlineError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Trait for text-to-speech engines.
///
/// This trait allows swapping implementations (real synthesis tool vs mock).
/// `speak` blocks until playback completes; callers that need fire-and-forget
/// behavior wrap the synthesizer in [`crate::speech::SpeechOutput`].
pub trait Synthesizer: Send {
    /// Speak the given text, blocking until playback finishes.
    ///
    /// Returns [`SightlineError::SynthesizerBusy`] if the engine is stuck
    /// mid-utterance and needs to be rebuilt before it can speak again.
    fn speak(&mut self, text: &str) -> Result<()>;

    /// Interrupt any in-progress playback and release engine resources.
    fn stop(&mut self) -> Result<()>;
}

/// Factory used to (re)create the synthesizer lazily, on the narration thread.
pub type SynthesizerFactory = Box<dyn Fn() -> Result<Box<dyn Synthesizer>> + Send + Sync>;

/// Mock synthesizer for testing.
///
/// Clones share their recorded state, so a factory can hand out fresh
/// instances while the test keeps one handle for assertions.
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    spoken: Arc<Mutex<Vec<String>>>,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
    busy_failures: Arc<AtomicUsize>,
    stopped: Arc<AtomicBool>,
    speak_delay: Duration,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self {
            spoken: Arc::new(Mutex::new(Vec::new())),
            active: Arc::new(AtomicUsize::new(0)),
            max_active: Arc::new(AtomicUsize::new(0)),
            busy_failures: Arc::new(AtomicUsize::new(0)),
            stopped: Arc::new(AtomicBool::new(false)),
            speak_delay: Duration::ZERO,
        }
    }

    /// Configure each speak call to block for the given duration.
    pub fn with_speak_delay(mut self, delay: Duration) -> Self {
        self.speak_delay = delay;
        self
    }

    /// Configure the next `count` speak calls to fail with a busy error.
    ///
    /// The counter is shared across clones, so a rebuilt instance continues
    /// consuming the same failure budget.
    pub fn with_busy_failures(self, count: usize) -> Self {
        self.busy_failures.store(count, Ordering::SeqCst);
        self
    }

    /// All texts spoken so far, in completion order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn speak_count(&self) -> usize {
        self.spoken.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Highest number of speak calls observed in flight at once.
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn was_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer for MockSynthesizer {
    fn speak(&mut self, text: &str) -> Result<()> {
        if self
            .busy_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(SightlineError::SynthesizerBusy);
        }

        let in_flight = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(in_flight, Ordering::SeqCst);

        if !self.speak_delay.is_zero() {
            std::thread::sleep(self.speak_delay);
        }

        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(text.to_string());
        }
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }
}
