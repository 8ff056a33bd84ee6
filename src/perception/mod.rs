//! Perception seams.
//!
//! The mode policies only consume typed results: labeled detections with
//! boxes, scene captions, and currency classifications. How those results
//! are produced (which model, which runtime) is behind these traits.

pub mod provider;

use crate::camera::Frame;
use crate::error::{Result, SightlineError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub use provider::{ExternalModelProvider, MockPerceptionProvider, PerceptionProvider};

/// Axis-aligned box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn center_x(&self) -> i32 {
        (self.x1 + self.x2) / 2
    }
}

/// One detected object.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
    /// Estimated distance in meters, when a depth backend is wired.
    pub depth_m: Option<f32>,
}

impl Detection {
    /// Convenience constructor for tests and simple backends.
    pub fn new(label: &str, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            label: label.to_string(),
            confidence,
            bbox,
            depth_m: None,
        }
    }

    pub fn with_depth(mut self, meters: f32) -> Self {
        self.depth_m = Some(meters);
        self
    }
}

/// Trait for object detection backends (navigation obstacles, road signs).
pub trait ObjectDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>>;
}

/// Trait for scene captioning backends.
pub trait SceneCaptioner: Send {
    /// Produce a one-sentence description. An empty string means the
    /// backend had nothing to say about this frame.
    fn caption(&mut self, frame: &Frame) -> Result<String>;
}

/// Trait for currency classification backends.
pub trait CurrencyClassifier: Send {
    /// Classify the note in view, if any, with a confidence.
    fn classify(&mut self, frame: &Frame) -> Result<Option<(String, f32)>>;
}

#[derive(Debug, Clone)]
enum DetectStep {
    Detections(Vec<Detection>),
    Failure(String),
}

/// Mock detector for testing.
///
/// Serves one scripted result per frame; clones share the script, so a
/// provider can hand the detector away while the test keeps a handle.
#[derive(Debug, Clone, Default)]
pub struct MockDetector {
    script: Arc<Mutex<VecDeque<DetectStep>>>,
}

impl MockDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next frame produces these detections.
    pub fn with_detections(self, detections: Vec<Detection>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(DetectStep::Detections(detections));
        }
        self
    }

    /// The next frame fails inference.
    pub fn with_failure(self, message: &str) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(DetectStep::Failure(message.to_string()));
        }
        self
    }
}

impl ObjectDetector for MockDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>> {
        let step = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match step {
            Some(DetectStep::Detections(detections)) => Ok(detections),
            Some(DetectStep::Failure(message)) => Err(SightlineError::Perception { message }),
            None => Ok(Vec::new()),
        }
    }
}

/// Mock captioner for testing. Repeats the last caption once exhausted.
#[derive(Debug, Clone, Default)]
pub struct MockCaptioner {
    script: Arc<Mutex<VecDeque<String>>>,
    last: Arc<Mutex<String>>,
}

impl MockCaptioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caption(self, caption: &str) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(caption.to_string());
        }
        self
    }
}

impl SceneCaptioner for MockCaptioner {
    fn caption(&mut self, _frame: &Frame) -> Result<String> {
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match next {
            Some(caption) => {
                if let Ok(mut last) = self.last.lock() {
                    *last = caption.clone();
                }
                Ok(caption)
            }
            None => Ok(self.last.lock().map(|l| l.clone()).unwrap_or_default()),
        }
    }
}

/// Mock currency classifier for testing. Exhausted script reads as nothing
/// in view.
#[derive(Debug, Clone, Default)]
pub struct MockClassifier {
    script: Arc<Mutex<VecDeque<Option<(String, f32)>>>>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reading(self, label: &str, confidence: f32) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Some((label.to_string(), confidence)));
        }
        self
    }

    pub fn with_nothing(self) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(None);
        }
        self
    }
}

impl CurrencyClassifier for MockClassifier {
    fn classify(&mut self, _frame: &Frame) -> Result<Option<(String, f32)>> {
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        Ok(next.flatten())
    }
}
