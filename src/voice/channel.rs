//! The voice command channel.
//!
//! A state machine around one background listener thread: audio chunks are
//! read from the source, fed to the recognizer, and any transcript that
//! classifies to a command token is queued. Mode loops poll the queue without
//! blocking; tokens are consumed in arrival order.

use crate::audio::source::AudioSource;
use crate::defaults;
use crate::error::Result;
use crate::token::ModeToken;
use crate::voice::intent;
use crate::voice::recognizer::UtteranceRecognizer;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// Lifecycle of the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No listener thread; polls return whatever is already queued.
    Stopped,
    /// `start` is initializing the audio source.
    Starting,
    /// The listener thread is consuming audio.
    Running,
    /// `stop` was requested; the listener exits at its next loop turn.
    Stopping,
}

/// Shared handle to the voice command queue. Cheap to clone.
#[derive(Clone)]
pub struct VoiceCommandChannel {
    state: Arc<Mutex<ChannelState>>,
    tx: Sender<ModeToken>,
    rx: Receiver<ModeToken>,
    listener: Arc<Mutex<Option<JoinHandle<()>>>>,
    quiet: bool,
}

impl VoiceCommandChannel {
    pub fn new(quiet: bool) -> Self {
        let (tx, rx) = unbounded();
        Self {
            state: Arc::new(Mutex::new(ChannelState::Stopped)),
            tx,
            rx,
            listener: Arc::new(Mutex::new(None)),
            quiet,
        }
    }

    /// Start the listener on the given audio source and recognizer.
    ///
    /// Initialization is synchronous: a failure to start the audio source is
    /// returned to the caller and the channel stays stopped. Calling `start`
    /// while already running is a no-op.
    pub fn start(
        &self,
        mut audio: Box<dyn AudioSource>,
        recognizer: Box<dyn UtteranceRecognizer>,
    ) -> Result<()> {
        {
            let Ok(mut state) = self.state.lock() else {
                return Ok(());
            };
            match *state {
                ChannelState::Running | ChannelState::Starting => return Ok(()),
                ChannelState::Stopping | ChannelState::Stopped => {}
            }
            *state = ChannelState::Starting;
        }
        // A previous listener may still be winding down.
        self.join_listener();

        if let Err(e) = audio.start() {
            if let Ok(mut state) = self.state.lock() {
                *state = ChannelState::Stopped;
            }
            return Err(e);
        }

        if let Ok(mut state) = self.state.lock() {
            *state = ChannelState::Running;
        }

        let state = Arc::clone(&self.state);
        let tx = self.tx.clone();
        let quiet = self.quiet;
        let handle = std::thread::spawn(move || listen(state, tx, audio, recognizer, quiet));

        if let Ok(mut listener) = self.listener.lock() {
            *listener = Some(handle);
        }
        Ok(())
    }

    /// Ask the listener to stop and wait for it.
    ///
    /// The request is advisory; the listener notices at its next loop turn,
    /// which is bounded by one audio read. No-op when already stopped.
    pub fn stop(&self) {
        if let Ok(mut state) = self.state.lock()
            && *state == ChannelState::Running
        {
            *state = ChannelState::Stopping;
        }
        self.join_listener();
    }

    /// Take the oldest queued token, if any. Never blocks.
    pub fn poll(&self) -> Option<ModeToken> {
        self.rx.try_recv().ok()
    }

    pub fn state(&self) -> ChannelState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(ChannelState::Stopped)
    }

    pub fn is_running(&self) -> bool {
        self.state() == ChannelState::Running
    }

    fn join_listener(&self) {
        if let Ok(mut listener) = self.listener.lock()
            && let Some(handle) = listener.take()
        {
            let _ = handle.join();
        }
    }
}

/// Listener thread body.
fn listen(
    state: Arc<Mutex<ChannelState>>,
    tx: Sender<ModeToken>,
    mut audio: Box<dyn AudioSource>,
    mut recognizer: Box<dyn UtteranceRecognizer>,
    quiet: bool,
) {
    loop {
        match state.lock() {
            Ok(state) if *state == ChannelState::Running => {}
            _ => break,
        }

        let samples = match audio.read_samples() {
            Ok(samples) => samples,
            Err(e) => {
                eprintln!("sightline: audio read failed: {e}");
                std::thread::sleep(Duration::from_millis(100));
                continue;
            }
        };

        if samples.is_empty() {
            std::thread::sleep(defaults::LISTENER_POLL);
            continue;
        }

        match recognizer.accept_chunk(&samples) {
            Ok(Some(transcript)) => {
                if !quiet {
                    eprintln!("Heard: {transcript}");
                }
                match intent::classify(&transcript) {
                    // Send only fails when the channel is gone, which means
                    // nobody is left to poll anyway.
                    Some(token) => {
                        let _ = tx.send(token);
                    }
                    None if !quiet => eprintln!("No command recognized"),
                    None => {}
                }
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("sightline: recognition failed: {e}");
                std::thread::sleep(Duration::from_millis(100));
            }
        }

        std::thread::sleep(defaults::LISTENER_POLL);
    }

    if let Err(e) = audio.stop() {
        eprintln!("sightline: audio stop failed: {e}");
    }
    if let Ok(mut state) = state.lock() {
        *state = ChannelState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::source::MockAudioSource;
    use crate::voice::recognizer::MockRecognizer;
    use std::time::Instant;

    fn poll_until_some(channel: &VoiceCommandChannel, timeout: Duration) -> Option<ModeToken> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(token) = channel.poll() {
                return Some(token);
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        None
    }

    const TIMEOUT: Duration = Duration::from_secs(3);

    #[test]
    fn starts_and_stops_cleanly() {
        let channel = VoiceCommandChannel::new(true);
        assert_eq!(channel.state(), ChannelState::Stopped);

        channel
            .start(
                Box::new(MockAudioSource::new()),
                Box::new(MockRecognizer::new()),
            )
            .unwrap();
        assert!(channel.is_running());

        channel.stop();
        assert_eq!(channel.state(), ChannelState::Stopped);
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let channel = VoiceCommandChannel::new(true);
        channel
            .start(
                Box::new(MockAudioSource::new()),
                Box::new(MockRecognizer::new()),
            )
            .unwrap();

        assert!(
            channel
                .start(
                    Box::new(MockAudioSource::new()),
                    Box::new(MockRecognizer::new()),
                )
                .is_ok()
        );
        assert!(channel.is_running());
        channel.stop();
    }

    #[test]
    fn audio_start_failure_leaves_the_channel_stopped() {
        let channel = VoiceCommandChannel::new(true);
        let result = channel.start(
            Box::new(MockAudioSource::new().with_start_failure()),
            Box::new(MockRecognizer::new()),
        );

        assert!(result.is_err());
        assert_eq!(channel.state(), ChannelState::Stopped);
    }

    #[test]
    fn recognized_command_is_queued() {
        let channel = VoiceCommandChannel::new(true);
        channel
            .start(
                Box::new(MockAudioSource::new().with_chunk(vec![3000; 1600])),
                Box::new(MockRecognizer::new().with_transcript("please start navigation")),
            )
            .unwrap();

        assert_eq!(
            poll_until_some(&channel, TIMEOUT),
            Some(ModeToken::Navigation)
        );
        channel.stop();
    }

    #[test]
    fn unrelated_transcripts_queue_nothing() {
        let channel = VoiceCommandChannel::new(true);
        channel
            .start(
                Box::new(MockAudioSource::new().with_chunk(vec![3000; 1600])),
                Box::new(MockRecognizer::new().with_transcript("what a lovely day")),
            )
            .unwrap();

        // Give the listener time to consume the chunk.
        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(channel.poll(), None);
        channel.stop();
    }

    #[test]
    fn tokens_arrive_in_fifo_order() {
        let channel = VoiceCommandChannel::new(true);
        channel
            .start(
                Box::new(
                    MockAudioSource::new()
                        .with_chunk(vec![3000; 1600])
                        .with_chunk(vec![3000; 1600]),
                ),
                Box::new(
                    MockRecognizer::new()
                        .with_transcript("navigation please")
                        .with_transcript("exit now"),
                ),
            )
            .unwrap();

        assert_eq!(
            poll_until_some(&channel, TIMEOUT),
            Some(ModeToken::Navigation)
        );
        assert_eq!(poll_until_some(&channel, TIMEOUT), Some(ModeToken::Exit));
        channel.stop();
    }

    #[test]
    fn poll_on_an_empty_channel_returns_immediately() {
        let channel = VoiceCommandChannel::new(true);
        let start = Instant::now();
        assert_eq!(channel.poll(), None);
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn recognition_failures_do_not_kill_the_listener() {
        let channel = VoiceCommandChannel::new(true);
        channel
            .start(
                Box::new(
                    MockAudioSource::new()
                        .with_chunk(vec![3000; 1600])
                        .with_chunk(vec![3000; 1600]),
                ),
                Box::new(
                    MockRecognizer::new()
                        .with_failure("transient glitch")
                        .with_transcript("exit"),
                ),
            )
            .unwrap();

        assert_eq!(poll_until_some(&channel, TIMEOUT), Some(ModeToken::Exit));
        channel.stop();
    }

    #[test]
    fn stop_when_never_started_is_a_no_op() {
        let channel = VoiceCommandChannel::new(true);
        channel.stop();
        assert_eq!(channel.state(), ChannelState::Stopped);
    }

    #[test]
    fn restart_after_stop_works() {
        let channel = VoiceCommandChannel::new(true);
        channel
            .start(
                Box::new(MockAudioSource::new()),
                Box::new(MockRecognizer::new()),
            )
            .unwrap();
        channel.stop();

        channel
            .start(
                Box::new(MockAudioSource::new().with_chunk(vec![3000; 1600])),
                Box::new(MockRecognizer::new().with_transcript("currency")),
            )
            .unwrap();
        assert_eq!(
            poll_until_some(&channel, TIMEOUT),
            Some(ModeToken::CurrencyDetection)
        );
        channel.stop();
    }
}
