//! Scene captioning mode.

use crate::camera::Frame;
use crate::defaults;
use crate::error::Result;
use crate::modes::runner::ModeSession;
use crate::perception::SceneCaptioner;
use std::time::Instant;

/// Narration policy for scene captioning.
///
/// Captions are expensive, so one is generated at most every
/// [`defaults::CAPTION_INTERVAL`], and only a caption that differs from the
/// previous one is spoken.
pub struct CaptioningSession {
    captioner: Box<dyn SceneCaptioner>,
    last_caption: String,
    last_generated: Option<Instant>,
}

impl CaptioningSession {
    pub fn new(captioner: Box<dyn SceneCaptioner>) -> Self {
        Self {
            captioner,
            last_caption: String::new(),
            last_generated: None,
        }
    }
}

impl ModeSession for CaptioningSession {
    fn name(&self) -> &'static str {
        "captioning"
    }

    fn observe(&mut self, frame: &Frame, now: Instant) -> Result<Vec<String>> {
        if let Some(at) = self.last_generated
            && now.saturating_duration_since(at) < defaults::CAPTION_INTERVAL
        {
            return Ok(Vec::new());
        }

        let caption = self.captioner.caption(frame)?;
        self.last_generated = Some(now);

        let caption = caption.trim();
        if caption.is_empty() || caption == self.last_caption {
            return Ok(Vec::new());
        }

        self.last_caption = caption.to_string();
        Ok(vec![format!("Scene: {caption}")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::MockCaptioner;
    use std::time::Duration;

    #[test]
    fn first_caption_is_spoken() {
        let captioner = MockCaptioner::new().with_caption("a kitchen with a table");
        let mut session = CaptioningSession::new(Box::new(captioner));
        let frame = Frame::blank(640, 480);

        let lines = session.observe(&frame, Instant::now()).unwrap();
        assert_eq!(lines, vec!["Scene: a kitchen with a table".to_string()]);
    }

    #[test]
    fn no_caption_inside_the_interval() {
        let captioner = MockCaptioner::new()
            .with_caption("a kitchen")
            .with_caption("a hallway");
        let mut session = CaptioningSession::new(Box::new(captioner));
        let frame = Frame::blank(640, 480);
        let start = Instant::now();

        session.observe(&frame, start).unwrap();
        let early = session
            .observe(&frame, start + Duration::from_secs(2))
            .unwrap();
        assert!(early.is_empty());
    }

    #[test]
    fn changed_caption_is_spoken_after_the_interval() {
        let captioner = MockCaptioner::new()
            .with_caption("a kitchen")
            .with_caption("a hallway");
        let mut session = CaptioningSession::new(Box::new(captioner));
        let frame = Frame::blank(640, 480);
        let start = Instant::now();

        session.observe(&frame, start).unwrap();
        let changed = session
            .observe(&frame, start + defaults::CAPTION_INTERVAL)
            .unwrap();
        assert_eq!(changed, vec!["Scene: a hallway".to_string()]);
    }

    #[test]
    fn unchanged_caption_stays_silent() {
        let captioner = MockCaptioner::new().with_caption("a kitchen");
        let mut session = CaptioningSession::new(Box::new(captioner));
        let frame = Frame::blank(640, 480);
        let start = Instant::now();

        session.observe(&frame, start).unwrap();
        // The mock repeats its last caption once the script is exhausted.
        let repeat = session
            .observe(&frame, start + defaults::CAPTION_INTERVAL)
            .unwrap();
        assert!(repeat.is_empty());
    }

    #[test]
    fn empty_caption_says_nothing() {
        let captioner = MockCaptioner::new().with_caption("   ");
        let mut session = CaptioningSession::new(Box::new(captioner));
        let frame = Frame::blank(640, 480);

        let lines = session.observe(&frame, Instant::now()).unwrap();
        assert!(lines.is_empty());
    }
}
