//! Navigation mode: obstacle detection with walking guidance.

use crate::camera::Frame;
use crate::defaults;
use crate::error::Result;
use crate::modes::runner::ModeSession;
use crate::perception::{Detection, ObjectDetector};
use std::collections::BTreeSet;
use std::time::Instant;

/// Walking guidance derived from where obstacles sit in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// An obstacle blocks the center of the path.
    Stop,
    /// More obstacles on the right flank; step left around them.
    MoveLeft,
    /// More obstacles on the left flank; step right around them.
    MoveRight,
    /// Nothing in the way.
    ClearPath,
}

impl Instruction {
    pub fn phrase(&self) -> &'static str {
        match self {
            Instruction::Stop => "Obstacle ahead. Please stop.",
            Instruction::MoveLeft => "Please move left.",
            Instruction::MoveRight => "Please move right.",
            Instruction::ClearPath => "Path is clear.",
        }
    }
}

/// Bucket obstacle centers into frame thirds and pick a direction.
///
/// A centered obstacle always wins: there is no safe side to offer. Otherwise
/// the crowded flank decides, and an even split reads as a passable path.
pub fn derive_instruction(detections: &[Detection], frame_width: u32) -> Instruction {
    let left_edge = frame_width as i32 / 3;
    let right_edge = 2 * frame_width as i32 / 3;

    let mut left = 0u32;
    let mut center = 0u32;
    let mut right = 0u32;
    for detection in detections {
        let center_x = detection.bbox.center_x();
        if center_x < left_edge {
            left += 1;
        } else if center_x >= right_edge {
            right += 1;
        } else {
            center += 1;
        }
    }

    if center > 0 {
        Instruction::Stop
    } else if left > right {
        Instruction::MoveRight
    } else if right > left {
        Instruction::MoveLeft
    } else {
        Instruction::ClearPath
    }
}

/// Narration policy for navigation.
///
/// Announces when the guidance changes, and re-announces unchanged guidance
/// once the repeat window passes. Low-confidence detections are discarded
/// before any bucketing happens.
pub struct NavigationSession {
    detector: Box<dyn ObjectDetector>,
    last_phrase: String,
    last_announce: Option<Instant>,
}

impl NavigationSession {
    pub fn new(detector: Box<dyn ObjectDetector>) -> Self {
        Self {
            detector,
            last_phrase: String::new(),
            last_announce: None,
        }
    }

    fn repeat_window_elapsed(&self, now: Instant) -> bool {
        self.last_announce
            .is_none_or(|at| now.saturating_duration_since(at) >= defaults::ANNOUNCE_REPEAT)
    }
}

impl ModeSession for NavigationSession {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn observe(&mut self, frame: &Frame, now: Instant) -> Result<Vec<String>> {
        let detections: Vec<Detection> = self
            .detector
            .detect(frame)?
            .into_iter()
            .filter(|d| d.confidence >= defaults::DETECTION_MIN_CONFIDENCE)
            .collect();

        if detections.is_empty() {
            if !self.last_phrase.is_empty() || self.repeat_window_elapsed(now) {
                self.last_phrase.clear();
                self.last_announce = Some(now);
                return Ok(vec!["No obstacles detected. Path is clear.".to_string()]);
            }
            return Ok(Vec::new());
        }

        let instruction = derive_instruction(&detections, frame.width);
        let phrase = instruction.phrase();
        if phrase == self.last_phrase && !self.repeat_window_elapsed(now) {
            return Ok(Vec::new());
        }

        let labels: BTreeSet<&str> = detections.iter().map(|d| d.label.as_str()).collect();
        let labels = labels.into_iter().collect::<Vec<_>>().join(", ");
        let mut text = format!("I see {labels}. {phrase}");
        if detections
            .iter()
            .any(|d| d.depth_m.is_some_and(|m| m < defaults::CLOSE_RANGE_M))
        {
            text.push_str(" It is very close.");
        }

        self.last_phrase = phrase.to_string();
        self.last_announce = Some(now);
        Ok(vec![text])
    }
}
