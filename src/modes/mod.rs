//! Camera modes.
//!
//! Every mode follows the same loop (frame, perceive, narrate, poll for
//! commands); what differs is the narration policy. The policies live in one
//! session type per mode, and `ModeRunner` drives whichever session is
//! active.

pub mod captioning;
pub mod currency;
pub mod navigation;
pub mod runner;
pub mod sign_detection;

pub use captioning::CaptioningSession;
pub use currency::CurrencySession;
pub use navigation::{Instruction, NavigationSession, derive_instruction};
pub use runner::{ModeRunner, ModeSession, RunnerConfig};
pub use sign_detection::SignDetectionSession;
