//! The narration engine.
//!
//! `SpeechOutput` sits between the modes and the synthesizer and enforces the
//! narration policies: at most one utterance in flight (later requests are
//! dropped, not queued), identical text suppressed for a debounce window
//! after the previous utterance *finished*, a global enable toggle, and a
//! bounded shutdown that never stalls process exit behind a long utterance.

use crate::clock::{Clock, SystemClock};
use crate::defaults;
use crate::error::{Result, SightlineError};
use crate::speech::synthesizer::{Synthesizer, SynthesizerFactory};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// What happened to a narration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Handed to the narration thread.
    Submitted,
    /// Narration is toggled off; the text was echoed to the log instead.
    Disabled,
    /// Identical to the previous utterance within the debounce window.
    DroppedDuplicate,
    /// Another utterance is still in flight.
    DroppedBusy,
}

/// Tuning for [`SpeechOutput`].
#[derive(Debug, Clone, Copy)]
pub struct SpeechOutputConfig {
    /// Whether narration starts enabled.
    pub enabled: bool,
    /// Window during which an identical narration is suppressed.
    pub debounce: Duration,
    /// Suppress the informational echo lines on stderr.
    pub quiet: bool,
}

impl Default for SpeechOutputConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce: defaults::SPEECH_DEBOUNCE,
            quiet: false,
        }
    }
}

struct Narration {
    last_text: String,
    last_done: Option<Instant>,
}

struct Inner {
    engine: Mutex<Option<Box<dyn Synthesizer>>>,
    factory: SynthesizerFactory,
    narration: Mutex<Narration>,
    speaking: AtomicBool,
    enabled: AtomicBool,
    clock: Box<dyn Clock>,
    debounce: Duration,
    quiet: bool,
}

/// Shared handle to the narration engine. Cheap to clone.
#[derive(Clone)]
pub struct SpeechOutput {
    inner: Arc<Inner>,
}

impl SpeechOutput {
    /// Create a narration engine with default tuning and the system clock.
    ///
    /// The synthesizer is not created here; the factory runs lazily on the
    /// first narration, so a missing speech tool degrades narration without
    /// failing startup.
    pub fn new(factory: SynthesizerFactory) -> Self {
        Self::with_clock(factory, SpeechOutputConfig::default(), SystemClock)
    }

    pub fn with_config(factory: SynthesizerFactory, config: SpeechOutputConfig) -> Self {
        Self::with_clock(factory, config, SystemClock)
    }

    pub fn with_clock(
        factory: SynthesizerFactory,
        config: SpeechOutputConfig,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                engine: Mutex::new(None),
                factory,
                narration: Mutex::new(Narration {
                    last_text: String::new(),
                    last_done: None,
                }),
                speaking: AtomicBool::new(false),
                enabled: AtomicBool::new(config.enabled),
                clock: Box::new(clock),
                debounce: config.debounce,
                quiet: config.quiet,
            }),
        }
    }

    /// Request that `text` be spoken. Never blocks on playback.
    ///
    /// The returned outcome says whether the request was handed to the
    /// narration thread or why it was dropped. Callers treat every outcome
    /// as success; narration is advisory.
    pub fn speak(&self, text: &str) -> SpeakOutcome {
        if !self.inner.enabled.load(Ordering::SeqCst) {
            if !self.inner.quiet {
                eprintln!("Speech (disabled): {text}");
            }
            return SpeakOutcome::Disabled;
        }

        let now = self.inner.clock.now();
        if let Ok(narration) = self.inner.narration.lock()
            && narration.last_text == text
            && narration
                .last_done
                .map(|done| now.saturating_duration_since(done) < self.inner.debounce)
                .unwrap_or(false)
        {
            return SpeakOutcome::DroppedDuplicate;
        }

        // Single-flight latch: exactly one request may transition false→true.
        if self
            .inner
            .speaking
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SpeakOutcome::DroppedBusy;
        }

        if !self.inner.quiet {
            eprintln!("Speaking: {text}");
        }

        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        std::thread::spawn(move || {
            match Inner::narrate(&inner, &text) {
                Ok(()) => {
                    // Debounce is measured from completion, so a long
                    // utterance suppresses its duplicate for the full window
                    // after playback ends.
                    let done = inner.clock.now();
                    if let Ok(mut narration) = inner.narration.lock() {
                        narration.last_text = text;
                        narration.last_done = Some(done);
                    }
                }
                Err(e) => eprintln!("sightline: narration failed: {e}"),
            }
            inner.speaking.store(false, Ordering::SeqCst);
        });

        SpeakOutcome::Submitted
    }

    /// Flip narration on or off. Returns the new state.
    pub fn toggle(&self) -> bool {
        !self.inner.enabled.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    pub fn is_speaking(&self) -> bool {
        self.inner.speaking.load(Ordering::SeqCst)
    }

    /// Wait for any in-flight utterance, up to `timeout`.
    ///
    /// Returns true if the engine went idle within the timeout.
    pub fn wait_until_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_speaking() {
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        true
    }

    /// Release the synthesizer, waiting briefly for an in-flight utterance.
    ///
    /// Bounded by [`defaults::SPEECH_SHUTDOWN_WAIT`]; if the utterance is
    /// still running after the wait, the engine is abandoned to its thread
    /// rather than joined. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.wait_until_idle(defaults::SPEECH_SHUTDOWN_WAIT);
        if let Ok(mut engine) = self.inner.engine.try_lock()
            && let Some(mut active) = engine.take()
        {
            if let Err(e) = active.stop() {
                eprintln!("sightline: synthesizer stop failed: {e}");
            }
        }
    }
}

impl Inner {
    /// Runs on the narration thread with the latch held.
    fn narrate(inner: &Inner, text: &str) -> Result<()> {
        let mut engine = inner.engine.lock().map_err(|_| SightlineError::Synthesis {
            message: "synthesizer lock poisoned".to_string(),
        })?;

        if engine.is_none() {
            *engine = Some((inner.factory)()?);
        }
        let Some(active) = engine.as_mut() else {
            return Err(SightlineError::Synthesis {
                message: "synthesizer unavailable".to_string(),
            });
        };

        match active.speak(text) {
            Err(SightlineError::SynthesizerBusy) => {
                // The engine wedged mid-utterance. Rebuild once and retry;
                // a second busy fault surfaces to the caller.
                *engine = Some((inner.factory)()?);
                match engine.as_mut() {
                    Some(fresh) => fresh.speak(text),
                    None => Err(SightlineError::Synthesis {
                        message: "synthesizer unavailable".to_string(),
                    }),
                }
            }
            other => other,
        }
    }
}
