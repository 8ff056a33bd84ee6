//! Road sign detection mode.

use crate::camera::Frame;
use crate::defaults;
use crate::error::Result;
use crate::modes::runner::ModeSession;
use crate::perception::ObjectDetector;
use std::collections::BTreeSet;
use std::time::Instant;

/// Spoken guidance for the sign classes the detector knows about.
const SIGN_MESSAGES: &[(&str, &str)] = &[
    ("stop", "Stop sign ahead. Please stop."),
    ("ped_crossing", "Pedestrian crossing ahead. Please slow down."),
    ("crosswalk", "Crosswalk ahead. Please slow down."),
    ("speed_limit", "Speed limit sign ahead."),
    ("traffic_light", "Traffic light ahead."),
    ("no_entry", "No entry. Please find another route."),
    ("one_way", "One way road ahead."),
    ("school_zone", "School zone ahead. Please be careful."),
    ("hospital", "Hospital zone ahead. Please keep quiet."),
    ("roundabout", "Roundabout ahead."),
    ("speed_breaker", "Speed breaker ahead. Please slow down."),
    ("railway_crossing", "Railway crossing ahead. Please be careful."),
    ("give_way", "Give way ahead."),
    ("u_turn", "U-turn allowed ahead."),
    ("no_parking", "No parking zone."),
];

fn context_message(label: &str) -> String {
    for (key, message) in SIGN_MESSAGES {
        if *key == label {
            return (*message).to_string();
        }
    }
    format!("{} detected.", label.replace('_', " "))
}

/// Narration policy for sign detection.
///
/// Only labels absent from the previous frame are announced, so a sign that
/// stays in view speaks once and goes quiet until it leaves and returns.
/// Frames with no confident detection keep the previous set, which stops a
/// flickering detector from re-announcing the same sign.
pub struct SignDetectionSession {
    detector: Box<dyn ObjectDetector>,
    previous: BTreeSet<String>,
}

impl SignDetectionSession {
    pub fn new(detector: Box<dyn ObjectDetector>) -> Self {
        Self {
            detector,
            previous: BTreeSet::new(),
        }
    }
}

impl ModeSession for SignDetectionSession {
    fn name(&self) -> &'static str {
        "sign detection"
    }

    fn observe(&mut self, frame: &Frame, _now: Instant) -> Result<Vec<String>> {
        let current: BTreeSet<String> = self
            .detector
            .detect(frame)?
            .into_iter()
            .filter(|d| d.confidence > defaults::ANNOUNCE_CONFIDENCE)
            .map(|d| d.label)
            .collect();

        if current.is_empty() {
            return Ok(Vec::new());
        }

        let lines = current
            .difference(&self.previous)
            .map(|label| context_message(label))
            .collect();
        self.previous = current;
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::{BoundingBox, Detection, MockDetector};

    fn sign(label: &str, confidence: f32) -> Detection {
        Detection::new(
            label,
            confidence,
            BoundingBox {
                x1: 10,
                y1: 10,
                x2: 60,
                y2: 60,
            },
        )
    }

    fn observe(session: &mut SignDetectionSession, frame: &Frame) -> Vec<String> {
        session.observe(frame, Instant::now()).unwrap()
    }

    #[test]
    fn known_signs_get_contextual_guidance() {
        assert_eq!(
            context_message("ped_crossing"),
            "Pedestrian crossing ahead. Please slow down."
        );
        assert_eq!(context_message("stop"), "Stop sign ahead. Please stop.");
    }

    #[test]
    fn unknown_signs_get_a_generic_message() {
        assert_eq!(context_message("left_curve"), "left curve detected.");
    }

    #[test]
    fn a_sign_is_announced_once_while_it_stays_in_view() {
        let detector = MockDetector::new()
            .with_detections(vec![sign("stop", 0.9)])
            .with_detections(vec![sign("stop", 0.9)]);
        let mut session = SignDetectionSession::new(Box::new(detector));
        let frame = Frame::blank(640, 480);

        assert_eq!(
            observe(&mut session, &frame),
            vec!["Stop sign ahead. Please stop.".to_string()]
        );
        assert!(observe(&mut session, &frame).is_empty());
    }

    #[test]
    fn only_new_labels_are_announced() {
        let detector = MockDetector::new()
            .with_detections(vec![sign("stop", 0.9)])
            .with_detections(vec![sign("stop", 0.9), sign("school_zone", 0.8)]);
        let mut session = SignDetectionSession::new(Box::new(detector));
        let frame = Frame::blank(640, 480);

        observe(&mut session, &frame);
        assert_eq!(
            observe(&mut session, &frame),
            vec!["School zone ahead. Please be careful.".to_string()]
        );
    }

    #[test]
    fn low_confidence_signs_are_ignored() {
        let detector = MockDetector::new().with_detections(vec![sign("stop", 0.5)]);
        let mut session = SignDetectionSession::new(Box::new(detector));
        let frame = Frame::blank(640, 480);

        assert!(observe(&mut session, &frame).is_empty());
    }

    #[test]
    fn an_empty_frame_does_not_reset_the_seen_set() {
        let detector = MockDetector::new()
            .with_detections(vec![sign("stop", 0.9)])
            .with_detections(Vec::new())
            .with_detections(vec![sign("stop", 0.9)]);
        let mut session = SignDetectionSession::new(Box::new(detector));
        let frame = Frame::blank(640, 480);

        observe(&mut session, &frame);
        assert!(observe(&mut session, &frame).is_empty());
        // Still the same set, so the returning detection stays quiet.
        assert!(observe(&mut session, &frame).is_empty());
    }

    #[test]
    fn a_sign_that_leaves_and_returns_is_announced_again() {
        let detector = MockDetector::new()
            .with_detections(vec![sign("stop", 0.9)])
            .with_detections(vec![sign("school_zone", 0.9)])
            .with_detections(vec![sign("stop", 0.9)]);
        let mut session = SignDetectionSession::new(Box::new(detector));
        let frame = Frame::blank(640, 480);

        observe(&mut session, &frame);
        observe(&mut session, &frame);
        assert_eq!(
            observe(&mut session, &frame),
            vec!["Stop sign ahead. Please stop.".to_string()]
        );
    }
}
