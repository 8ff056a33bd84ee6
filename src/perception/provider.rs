//! Perception backend factories.
//!
//! The supervisor asks a provider for a fresh backend each time a mode
//! starts, so a failed load is reported per mode run instead of poisoning
//! the whole session.

use crate::error::{Result, SightlineError};
use crate::models::ModelsLayout;
use crate::perception::{
    CurrencyClassifier, MockCaptioner, MockClassifier, MockDetector, ObjectDetector,
    SceneCaptioner,
};

/// Factory trait the supervisor uses to build per-mode backends.
pub trait PerceptionProvider: Send {
    fn object_detector(&mut self) -> Result<Box<dyn ObjectDetector>>;
    fn scene_captioner(&mut self) -> Result<Box<dyn SceneCaptioner>>;
    fn sign_detector(&mut self) -> Result<Box<dyn ObjectDetector>>;
    fn currency_classifier(&mut self) -> Result<Box<dyn CurrencyClassifier>>;
}

/// Provider for the stock binary, backed by user-provisioned model files.
///
/// Checks that the artifact for the requested mode exists and reports a
/// missing file precisely; a present artifact still fails with
/// `PerceptionUnavailable` until an inference backend is wired in, which
/// keeps the narrated error honest about what to fix.
pub struct ExternalModelProvider {
    layout: ModelsLayout,
}

impl ExternalModelProvider {
    pub fn new(layout: ModelsLayout) -> Self {
        Self { layout }
    }

    fn unavailable(&self, mode: &str, path: std::path::PathBuf) -> SightlineError {
        if !path.exists() {
            return SightlineError::ModelNotFound {
                path: path.to_string_lossy().to_string(),
            };
        }
        SightlineError::PerceptionUnavailable {
            mode: mode.to_string(),
        }
    }
}

impl PerceptionProvider for ExternalModelProvider {
    fn object_detector(&mut self) -> Result<Box<dyn ObjectDetector>> {
        Err(self.unavailable("navigation", self.layout.navigation_detector()))
    }

    fn scene_captioner(&mut self) -> Result<Box<dyn SceneCaptioner>> {
        Err(SightlineError::PerceptionUnavailable {
            mode: "captioning".to_string(),
        })
    }

    fn sign_detector(&mut self) -> Result<Box<dyn ObjectDetector>> {
        Err(self.unavailable("sign detection", self.layout.sign_detector()))
    }

    fn currency_classifier(&mut self) -> Result<Box<dyn CurrencyClassifier>> {
        Err(self.unavailable("currency detection", self.layout.currency_classifier()))
    }
}

/// Provider handing out clones of preconfigured mocks, for tests.
#[derive(Debug, Clone, Default)]
pub struct MockPerceptionProvider {
    detector: Option<MockDetector>,
    captioner: Option<MockCaptioner>,
    sign_detector: Option<MockDetector>,
    classifier: Option<MockClassifier>,
}

impl MockPerceptionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object_detector(mut self, detector: MockDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn with_scene_captioner(mut self, captioner: MockCaptioner) -> Self {
        self.captioner = Some(captioner);
        self
    }

    pub fn with_sign_detector(mut self, detector: MockDetector) -> Self {
        self.sign_detector = Some(detector);
        self
    }

    pub fn with_currency_classifier(mut self, classifier: MockClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }
}

impl PerceptionProvider for MockPerceptionProvider {
    fn object_detector(&mut self) -> Result<Box<dyn ObjectDetector>> {
        match &self.detector {
            Some(detector) => Ok(Box::new(detector.clone())),
            None => Err(SightlineError::PerceptionUnavailable {
                mode: "navigation".to_string(),
            }),
        }
    }

    fn scene_captioner(&mut self) -> Result<Box<dyn SceneCaptioner>> {
        match &self.captioner {
            Some(captioner) => Ok(Box::new(captioner.clone())),
            None => Err(SightlineError::PerceptionUnavailable {
                mode: "captioning".to_string(),
            }),
        }
    }

    fn sign_detector(&mut self) -> Result<Box<dyn ObjectDetector>> {
        match &self.sign_detector {
            Some(detector) => Ok(Box::new(detector.clone())),
            None => Err(SightlineError::PerceptionUnavailable {
                mode: "sign detection".to_string(),
            }),
        }
    }

    fn currency_classifier(&mut self) -> Result<Box<dyn CurrencyClassifier>> {
        match &self.classifier {
            Some(classifier) => Ok(Box::new(classifier.clone())),
            None => Err(SightlineError::PerceptionUnavailable {
                mode: "currency detection".to_string(),
            }),
        }
    }
}
