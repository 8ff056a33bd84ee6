//! Sightline: a camera narration assistant for blind and low-vision users.
//!
//! Four camera modes (navigation, scene captioning, road sign detection,
//! currency recognition) narrate what the camera sees through a local speech
//! synthesizer. Modes are switched by single keys or by spoken commands
//! recognized on-device.
//!
//! The crate is a library plus a thin binary: every hardware seam (camera,
//! microphone, perception models, speech tool) is a trait, so embedders can
//! wire their own backends and the whole control flow is testable with mocks.

#![warn(clippy::unwrap_used, clippy::expect_used)]

pub mod app;
pub mod audio;
pub mod camera;
pub mod cli;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod error;
pub mod input;
pub mod models;
pub mod modes;
pub mod perception;
pub mod speech;
pub mod sys;
pub mod token;
pub mod voice;

pub use error::{Result, SightlineError};

/// Version string including the git hash when built from a checkout.
pub fn version_string() -> String {
    match option_env!("GIT_HASH") {
        Some(hash) => format!("{} ({hash})", env!("CARGO_PKG_VERSION")),
        None => env!("CARGO_PKG_VERSION").to_string(),
    }
}
