use thiserror::Error;

/// All errors that can occur in sightline
#[derive(Error, Debug)]
pub enum SightlineError {
    #[error("Camera device {device} is not available")]
    CameraUnavailable { device: u32 },

    #[error("Frame acquisition failed: {message}")]
    FrameAcquisition { message: String },

    #[error("Model file not found: {path}")]
    ModelNotFound { path: String },

    #[error("No {mode} perception backend is linked into this build")]
    PerceptionUnavailable { mode: String },

    #[error("Perception failed: {message}")]
    Perception { message: String },

    #[error("Audio device not found: {device}")]
    AudioDeviceNotFound { device: String },

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    #[error("Speech recognition failed: {message}")]
    Recognition { message: String },

    #[error("Voice commands are not supported: {reason}")]
    VoiceUnsupported { reason: String },

    #[error("Speech synthesizer is busy")]
    SynthesizerBusy,

    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    #[error("No speech synthesis tool found (tried {tried})")]
    SpeechToolNotFound { tried: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with SightlineError
pub type Result<T> = std::result::Result<T, SightlineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_failing_resource() {
        let err = SightlineError::CameraUnavailable { device: 0 };
        assert_eq!(err.to_string(), "Camera device 0 is not available");

        let err = SightlineError::ModelNotFound {
            path: "models/yolov8m.pt".to_string(),
        };
        assert!(err.to_string().contains("models/yolov8m.pt"));

        let err = SightlineError::VoiceUnsupported {
            reason: "built without the whisper feature".to_string(),
        };
        assert!(err.to_string().contains("whisper"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SightlineError = io_err.into();
        assert!(matches!(err, SightlineError::Io(_)));
    }
}
