//! Camera seam.
//!
//! Frames are opaque pixel buffers; the perception backends know how to
//! interpret them. The binary is wired with whatever `Camera` implementation
//! the embedder provides, and the mode loops only see the trait.

use crate::error::{Result, SightlineError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One captured frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Packed pixel data; layout is a contract between camera and perception.
    pub data: Vec<u8>,
}

impl Frame {
    /// An all-zero frame of the given size, handy for tests.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height) as usize * 3],
        }
    }
}

/// Trait for camera devices.
///
/// This trait allows swapping implementations (real capture device vs mock).
pub trait Camera: Send {
    /// Acquire the next frame.
    ///
    /// A [`SightlineError::FrameAcquisition`] error is transient; callers
    /// retry after a short pause rather than abandoning the mode.
    fn acquire_frame(&mut self) -> Result<Frame>;

    /// Release the device. Called once when a mode loop ends.
    fn release(&mut self);
}

/// Factory the supervisor uses to open the camera per mode run.
pub type CameraFactory = Box<dyn Fn() -> Result<Box<dyn Camera>> + Send>;

/// Mock camera for testing.
///
/// Serves blank frames, optionally failing the first few reads. The frame
/// counter is shared, so tests keep a handle after the factory gives the
/// camera away.
#[derive(Debug, Clone)]
pub struct MockCamera {
    width: u32,
    height: u32,
    failures_remaining: Arc<AtomicUsize>,
    frames_served: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl MockCamera {
    pub fn new() -> Self {
        Self {
            width: 640,
            height: 480,
            failures_remaining: Arc::new(AtomicUsize::new(0)),
            frames_served: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail the first `count` reads with a transient acquisition error.
    pub fn with_initial_failures(self, count: usize) -> Self {
        self.failures_remaining.store(count, Ordering::SeqCst);
        self
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn frames_served(&self) -> usize {
        self.frames_served.load(Ordering::SeqCst)
    }

    pub fn release_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera for MockCamera {
    fn acquire_frame(&mut self) -> Result<Frame> {
        if self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(SightlineError::FrameAcquisition {
                message: "mock frame failure".to_string(),
            });
        }
        self.frames_served.fetch_add(1, Ordering::SeqCst);
        Ok(Frame::blank(self.width, self.height))
    }

    fn release(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_frames_have_the_requested_geometry() {
        let frame = Frame::blank(4, 2);
        assert_eq!(frame.width, 4);
        assert_eq!(frame.height, 2);
        assert_eq!(frame.data.len(), 24);
    }

    #[test]
    fn mock_counts_served_frames() {
        let camera = MockCamera::new();
        let mut boxed: Box<dyn Camera> = Box::new(camera.clone());

        boxed.acquire_frame().unwrap();
        boxed.acquire_frame().unwrap();
        boxed.release();

        assert_eq!(camera.frames_served(), 2);
        assert_eq!(camera.release_count(), 1);
    }

    #[test]
    fn initial_failures_are_transient() {
        let camera = MockCamera::new().with_initial_failures(2);
        let mut boxed: Box<dyn Camera> = Box::new(camera.clone());

        assert!(matches!(
            boxed.acquire_frame(),
            Err(SightlineError::FrameAcquisition { .. })
        ));
        assert!(boxed.acquire_frame().is_err());
        assert!(boxed.acquire_frame().is_ok());
        assert_eq!(camera.frames_served(), 1);
    }

    #[test]
    fn resolution_is_configurable() {
        let mut camera = MockCamera::new().with_resolution(300, 200);
        let frame = camera.acquire_frame().unwrap();
        assert_eq!(frame.width, 300);
        assert_eq!(frame.height, 200);
    }
}
