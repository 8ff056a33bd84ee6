//! Currency recognition mode.

use crate::camera::Frame;
use crate::defaults;
use crate::error::Result;
use crate::modes::runner::ModeSession;
use crate::perception::CurrencyClassifier;
use std::time::Instant;

/// Narration policy for currency recognition.
///
/// A confident reading is announced when the denomination changes, or when
/// the same denomination has been held in view past the repeat window. Once
/// the note has been out of view long enough the remembered denomination is
/// dropped, so presenting the same note again announces it afresh.
pub struct CurrencySession {
    classifier: Box<dyn CurrencyClassifier>,
    last_label: Option<String>,
    last_announce: Option<Instant>,
    last_seen: Option<Instant>,
}

impl CurrencySession {
    pub fn new(classifier: Box<dyn CurrencyClassifier>) -> Self {
        Self {
            classifier,
            last_label: None,
            last_announce: None,
            last_seen: None,
        }
    }
}

impl ModeSession for CurrencySession {
    fn name(&self) -> &'static str {
        "currency detection"
    }

    fn observe(&mut self, frame: &Frame, now: Instant) -> Result<Vec<String>> {
        let reading = self.classifier.classify(frame)?;

        let Some((label, confidence)) = reading else {
            self.forget_if_stale(now);
            return Ok(Vec::new());
        };
        if confidence <= defaults::ANNOUNCE_CONFIDENCE || label.eq_ignore_ascii_case("unknown") {
            self.forget_if_stale(now);
            return Ok(Vec::new());
        }

        self.last_seen = Some(now);
        let changed = self.last_label.as_deref() != Some(label.as_str());
        let window_elapsed = self
            .last_announce
            .is_none_or(|at| now.saturating_duration_since(at) >= defaults::ANNOUNCE_REPEAT);
        if !changed && !window_elapsed {
            return Ok(Vec::new());
        }

        let text = format!("{label} rupees detected.");
        self.last_label = Some(label);
        self.last_announce = Some(now);
        Ok(vec![text])
    }
}

impl CurrencySession {
    fn forget_if_stale(&mut self, now: Instant) {
        if let Some(seen) = self.last_seen
            && now.saturating_duration_since(seen) >= defaults::CURRENCY_RESET
        {
            self.last_label = None;
            self.last_announce = None;
            self.last_seen = None;
        }
    }
}
