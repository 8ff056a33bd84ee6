//! The shared mode loop.

use crate::camera::{Camera, Frame};
use crate::defaults;
use crate::error::Result;
use crate::input::keys::KeySource;
use crate::speech::output::SpeechOutput;
use crate::token::{self, ModeToken};
use crate::voice::channel::VoiceCommandChannel;
use std::time::{Duration, Instant};

/// One mode's perception-to-narration policy.
///
/// `observe` sees one frame and decides what, if anything, to say about it.
/// Sessions keep their own announcement state; time arrives as a parameter
/// so policies are testable without sleeping.
pub trait ModeSession {
    fn name(&self) -> &'static str;

    /// Process one frame and return the narration lines it warrants.
    fn observe(&mut self, frame: &Frame, now: Instant) -> Result<Vec<String>>;
}

/// Pacing for the mode loop.
#[derive(Debug, Clone, Copy)]
pub struct RunnerConfig {
    /// Pause between iterations when no command arrived.
    pub frame_interval: Duration,
    /// Delay before retrying a failed frame read.
    pub frame_retry: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            frame_interval: defaults::FRAME_INTERVAL,
            frame_retry: defaults::FRAME_RETRY,
        }
    }
}

/// Drives a session: frame, observe, narrate, then poll keys and the voice
/// queue for a command. Runs until a command token arrives.
pub struct ModeRunner<'a> {
    camera: Box<dyn Camera>,
    keys: &'a mut dyn KeySource,
    voice: &'a VoiceCommandChannel,
    narrator: &'a SpeechOutput,
    config: RunnerConfig,
}

impl<'a> ModeRunner<'a> {
    pub fn new(
        camera: Box<dyn Camera>,
        keys: &'a mut dyn KeySource,
        voice: &'a VoiceCommandChannel,
        narrator: &'a SpeechOutput,
    ) -> Self {
        Self::with_config(camera, keys, voice, narrator, RunnerConfig::default())
    }

    pub fn with_config(
        camera: Box<dyn Camera>,
        keys: &'a mut dyn KeySource,
        voice: &'a VoiceCommandChannel,
        narrator: &'a SpeechOutput,
        config: RunnerConfig,
    ) -> Self {
        Self {
            camera,
            keys,
            voice,
            narrator,
            config,
        }
    }

    /// Run the session until a command arrives. The camera is released on
    /// the way out; the returned token is the caller's to dispatch.
    pub fn run(mut self, session: &mut dyn ModeSession) -> ModeToken {
        loop {
            // Frame read failures are transient: wait and retry, never abort.
            let frame = match self.camera.acquire_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    eprintln!("[{}] frame acquisition failed: {e}", session.name());
                    std::thread::sleep(self.config.frame_retry);
                    continue;
                }
            };

            match session.observe(&frame, Instant::now()) {
                Ok(lines) => {
                    for line in lines {
                        // Dropped narrations are fine; the policy will
                        // re-announce on its own schedule.
                        let _ = self.narrator.speak(&line);
                    }
                }
                Err(e) => eprintln!("[{}] perception error: {e}", session.name()),
            }

            // Keyboard first, then the voice queue.
            let token = match self.keys.poll_key() {
                Ok(Some(key)) => token::key_to_token(key),
                Ok(None) => None,
                Err(e) => {
                    eprintln!("[{}] key poll failed: {e}", session.name());
                    None
                }
            };
            let token = token.or_else(|| self.voice.poll());

            if let Some(token) = token {
                self.announce_transition(token);
                self.camera.release();
                return token;
            }

            std::thread::sleep(self.config.frame_interval);
        }
    }

    fn announce_transition(&self, token: ModeToken) {
        // Transition messages should land even when a narration line is
        // still in flight, so wait out the latch (bounded).
        self.narrator.wait_until_idle(Duration::from_secs(2));
        match token {
            ModeToken::Exit => {
                let _ = self.narrator.speak("Returning to main menu.");
            }
            token if token.is_mode() => {
                let _ = self
                    .narrator
                    .speak(&format!("Switching to {} mode.", token.display_name()));
            }
            // Toggles announce their new state at the dispatch site.
            _ => {}
        }
    }
}
