//! The supervisor: menu, dispatch, and session lifecycle.
//!
//! Owns the narration engine, the voice channel, and the input sources, and
//! runs the menu loop: greet, offer voice control, wait for a command, run
//! the requested mode, and repeat until the user exits. Modes chain directly
//! into each other; the menu is only revisited when a mode returns `Exit`.

use crate::audio::source::AudioSource;
use crate::camera::CameraFactory;
use crate::defaults;
use crate::error::{Result, SightlineError};
use crate::input::keys::KeySource;
use crate::input::prompt::PromptSource;
use crate::models::ModelsLayout;
use crate::modes::captioning::CaptioningSession;
use crate::modes::currency::CurrencySession;
use crate::modes::navigation::NavigationSession;
use crate::modes::runner::{ModeRunner, ModeSession, RunnerConfig};
use crate::modes::sign_detection::SignDetectionSession;
use crate::perception::PerceptionProvider;
use crate::speech::output::SpeechOutput;
use crate::token::{self, ModeToken};
use crate::voice::channel::VoiceCommandChannel;
use crate::voice::recognizer::UtteranceRecognizer;
use owo_colors::OwoColorize;
use std::time::Duration;

/// Factory the supervisor calls when the user enables voice commands.
///
/// Building the backend is deferred until opt-in, so a machine without a
/// microphone or a recognizer model still reaches the keyboard menu.
pub type VoiceBackendFactory =
    Box<dyn Fn() -> Result<(Box<dyn AudioSource>, Box<dyn UtteranceRecognizer>)> + Send>;

const MENU_PROMPT: &str = "Enter mode (nav/cap/sign/curr/voice/speech/exit): ";

pub struct Supervisor {
    narrator: SpeechOutput,
    channel: VoiceCommandChannel,
    perception: Box<dyn PerceptionProvider>,
    camera_factory: CameraFactory,
    voice_backend: VoiceBackendFactory,
    keys: Box<dyn KeySource>,
    prompt: Box<dyn PromptSource>,
    models: ModelsLayout,
    voice_enabled: bool,
    quiet: bool,
    voice_tick: Duration,
    runner_config: RunnerConfig,
}

impl Supervisor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        narrator: SpeechOutput,
        channel: VoiceCommandChannel,
        perception: Box<dyn PerceptionProvider>,
        camera_factory: CameraFactory,
        voice_backend: VoiceBackendFactory,
        keys: Box<dyn KeySource>,
        prompt: Box<dyn PromptSource>,
        models: ModelsLayout,
    ) -> Self {
        Self {
            narrator,
            channel,
            perception,
            camera_factory,
            voice_backend,
            keys,
            prompt,
            models,
            voice_enabled: false,
            quiet: false,
            voice_tick: defaults::VOICE_PROMPT_TICK,
            runner_config: RunnerConfig::default(),
        }
    }

    /// Suppress the banner and informational stderr lines.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Shorten the menu's voice-queue wait, for tests.
    pub fn with_voice_tick(mut self, tick: Duration) -> Self {
        self.voice_tick = tick;
        self
    }

    pub fn with_runner_config(mut self, config: RunnerConfig) -> Self {
        self.runner_config = config;
        self
    }

    /// Run the menu loop until the user exits.
    pub fn run(&mut self) -> Result<()> {
        self.print_banner();
        self.warn_missing_models();

        self.announce("Welcome to Sightline, your navigation assistant.");

        let answer = self.prompt.read_command("Enable voice commands? (yes/no): ")?;
        let answer = answer.trim();
        if answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y") {
            self.enable_voice();
        }

        loop {
            match self.next_command()? {
                None => self.announce("I didn't understand that command."),
                Some(ModeToken::Exit) => {
                    self.announce("Exiting assistant. Goodbye.");
                    break;
                }
                Some(ModeToken::VoiceToggle) => self.toggle_voice(),
                Some(ModeToken::SpeechToggle) => self.toggle_speech(),
                Some(mode) => self.run_mode_chain(mode),
            }
        }

        self.teardown();
        Ok(())
    }

    /// Stop the voice listener and release the synthesizer.
    pub fn teardown(&self) {
        self.channel.stop();
        self.narrator.shutdown();
    }

    /// Wait for the next menu command.
    ///
    /// With voice enabled the queue is polled for a few seconds first; when
    /// nothing arrives the typed prompt takes over, so the keyboard always
    /// stays available. `None` means the typed input was not understood.
    fn next_command(&mut self) -> Result<Option<ModeToken>> {
        if self.voice_enabled {
            if !self.quiet {
                eprintln!("Listening for a voice command...");
            }
            for _ in 0..defaults::VOICE_PROMPT_TICKS {
                if let Some(token) = self.channel.poll() {
                    return Ok(Some(token));
                }
                std::thread::sleep(self.voice_tick);
            }
        }

        let line = self.prompt.read_command(MENU_PROMPT)?;
        Ok(token::parse_typed_command(&line))
    }

    /// Run a mode and follow its switch tokens until one returns to the menu.
    fn run_mode_chain(&mut self, first: ModeToken) {
        let mut current = first;
        loop {
            let next = self.run_mode(current);
            match next {
                token if token.is_mode() => current = token,
                ModeToken::VoiceToggle => {
                    self.toggle_voice();
                    break;
                }
                ModeToken::SpeechToggle => {
                    self.toggle_speech();
                    break;
                }
                _ => break,
            }
        }
    }

    /// Run one mode to completion and return the token that ended it.
    ///
    /// A backend or camera failure is narrated and folds into `Exit`, so the
    /// menu loop keeps going no matter which piece is missing.
    fn run_mode(&mut self, mode: ModeToken) -> ModeToken {
        let mut session = match self.build_session(mode) {
            Ok(session) => session,
            Err(e) => {
                eprintln!("sightline: cannot start {} mode: {e}", mode.display_name());
                self.announce(&format!(
                    "{} is not available right now.",
                    capitalized(mode.display_name())
                ));
                return ModeToken::Exit;
            }
        };

        let camera = match (self.camera_factory)() {
            Ok(camera) => camera,
            Err(e) => {
                eprintln!("sightline: camera open failed: {e}");
                self.announce(&format!(
                    "Camera is not available for {} mode.",
                    mode.display_name()
                ));
                return ModeToken::Exit;
            }
        };

        self.announce(&format!(
            "Starting {} mode. Press q to return to the menu.",
            mode.display_name()
        ));

        let runner = ModeRunner::with_config(
            camera,
            self.keys.as_mut(),
            &self.channel,
            &self.narrator,
            self.runner_config,
        );
        runner.run(session.as_mut())
    }

    fn build_session(&mut self, mode: ModeToken) -> Result<Box<dyn ModeSession>> {
        Ok(match mode {
            ModeToken::Navigation => {
                Box::new(NavigationSession::new(self.perception.object_detector()?))
            }
            ModeToken::Captioning => {
                Box::new(CaptioningSession::new(self.perception.scene_captioner()?))
            }
            ModeToken::SignDetection => {
                Box::new(SignDetectionSession::new(self.perception.sign_detector()?))
            }
            ModeToken::CurrencyDetection => {
                Box::new(CurrencySession::new(self.perception.currency_classifier()?))
            }
            other => {
                return Err(SightlineError::PerceptionUnavailable {
                    mode: other.display_name().to_string(),
                });
            }
        })
    }

    fn enable_voice(&mut self) {
        let backend = (self.voice_backend)().and_then(|(audio, recognizer)| {
            self.channel.start(audio, recognizer)
        });
        match backend {
            Ok(()) => {
                self.voice_enabled = true;
                self.announce("Voice commands activated. Say navigation, captioning, signs, currency, or exit.");
            }
            Err(e) => {
                eprintln!("sightline: voice commands unavailable: {e}");
                self.voice_enabled = false;
                self.announce("Voice command system is not available. Using keyboard input only.");
            }
        }
    }

    fn toggle_voice(&mut self) {
        if self.voice_enabled {
            self.channel.stop();
            self.voice_enabled = false;
            self.announce("Voice commands deactivated.");
        } else {
            self.enable_voice();
        }
    }

    fn toggle_speech(&mut self) {
        if self.narrator.toggle() {
            self.announce("Speech narration enabled.");
        } else if !self.quiet {
            eprintln!("Speech narration disabled.");
        }
    }

    /// Menu announcements each need to land and finish before the next step
    /// runs, so this blocks on the latch around the submit (bounded). Inside
    /// modes the drop policy applies instead.
    fn announce(&self, text: &str) {
        self.narrator.wait_until_idle(Duration::from_secs(10));
        let _ = self.narrator.speak(text);
        self.narrator.wait_until_idle(Duration::from_secs(10));
    }

    fn print_banner(&self) {
        if self.quiet {
            return;
        }
        eprintln!("{}", "Sightline".bold());
        eprintln!(
            "Keys inside a mode: q menu, n navigation, c captioning, s signs, m currency, v voice"
        );
    }

    fn warn_missing_models(&self) {
        let missing = self.models.missing();
        if !missing.is_empty() && !self.quiet {
            eprintln!(
                "{} missing model files: {}",
                "warning:".yellow(),
                missing.join(", ")
            );
        }
    }
}

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
