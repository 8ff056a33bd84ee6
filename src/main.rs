use anyhow::Context;
use clap::Parser;
use sightline::app::{Supervisor, VoiceBackendFactory};
use sightline::camera::CameraFactory;
use sightline::cli::{Cli, Commands};
use sightline::config::Config;
use sightline::error::SightlineError;
use sightline::input::{StdinPromptSource, TerminalKeySource};
use sightline::models::ModelsLayout;
use sightline::perception::ExternalModelProvider;
use sightline::speech::output::{SpeechOutput, SpeechOutputConfig};
use sightline::speech::synthesizer::{Synthesizer, SynthesizerFactory};
use sightline::speech::{EspeakSynthesizer, SystemCommandExecutor, detect_speech_tool};
use sightline::voice::backend::create_voice_backend;
use sightline::voice::channel::VoiceCommandChannel;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Must run before any thread is spawned.
    sightline::sys::suppress_audio_warnings();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_default(&config_path)?.with_env_overrides();
    if let Some(dir) = cli.models_dir {
        config.models.dir = dir;
    }
    if let Some(device) = cli.device {
        config.audio.device = Some(device);
    }
    if cli.no_speech {
        config.speech.enabled = false;
    }

    match cli.command {
        Some(Commands::Devices) => list_devices(),
        Some(Commands::Check) => check(&config),
        None => run(config, cli.quiet).await,
    }
}

#[cfg(feature = "cpal-audio")]
fn list_devices() -> anyhow::Result<()> {
    let devices =
        sightline::audio::capture::list_devices().context("failed to enumerate audio devices")?;
    if devices.is_empty() {
        println!("No audio input devices found.");
    }
    for name in devices {
        println!("{name}");
    }
    Ok(())
}

#[cfg(not(feature = "cpal-audio"))]
fn list_devices() -> anyhow::Result<()> {
    anyhow::bail!("this build lacks the cpal-audio feature")
}

fn check(config: &Config) -> anyhow::Result<()> {
    let layout = ModelsLayout::from_config(config);
    println!("models directory: {}", layout.dir().display());
    for artifact in layout.report() {
        let status = if artifact.present { "present" } else { "missing" };
        println!(
            "  {:<20} {:<8} {}",
            artifact.name,
            status,
            artifact.path.display()
        );
    }

    match detect_speech_tool(&SystemCommandExecutor, config.speech.tool.as_deref()) {
        Ok(tool) => println!("speech tool: {tool}"),
        Err(e) => println!("speech tool: unavailable ({e})"),
    }
    Ok(())
}

async fn run(config: Config, quiet: bool) -> anyhow::Result<()> {
    let narrator = build_narrator(&config, quiet);
    let channel = VoiceCommandChannel::new(quiet);

    let layout = ModelsLayout::from_config(&config);
    let provider = ExternalModelProvider::new(layout.clone());

    // The stock binary ships no capture backend; embedders wire a real
    // Camera implementation through the library API.
    let device_index = config.camera.device_index;
    let camera_factory: CameraFactory = Box::new(move || {
        Err(SightlineError::CameraUnavailable {
            device: device_index,
        })
    });

    let voice_config = config.clone();
    let voice_backend: VoiceBackendFactory =
        Box::new(move || create_voice_backend(&voice_config));

    let mut supervisor = Supervisor::new(
        narrator.clone(),
        channel.clone(),
        Box::new(provider),
        camera_factory,
        voice_backend,
        Box::new(TerminalKeySource::new()),
        Box::new(StdinPromptSource::new()),
        layout,
    )
    .with_quiet(quiet);

    let app = tokio::task::spawn_blocking(move || supervisor.run());

    tokio::select! {
        result = app => {
            result.context("supervisor task panicked")??;
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nsightline: interrupted, shutting down");
            channel.stop();
            narrator.shutdown();
            // The supervisor thread may be blocked on a stdin read; exit
            // directly rather than waiting for it.
            std::process::exit(0);
        }
    }
}

/// Build the narration engine from config.
///
/// The synthesizer factory re-detects the speech tool on every (re)build, so
/// a tool installed after startup is picked up without a restart. A missing
/// tool is warned about once here; narration then degrades to log echoes.
fn build_narrator(config: &Config, quiet: bool) -> SpeechOutput {
    if let Err(e) = detect_speech_tool(&SystemCommandExecutor, config.speech.tool.as_deref()) {
        eprintln!("sightline: narration unavailable: {e}");
    }

    let tool_override = config.speech.tool.clone();
    let rate_wpm = config.speech.rate_wpm;
    let factory: SynthesizerFactory = Box::new(move || {
        let tool = detect_speech_tool(&SystemCommandExecutor, tool_override.as_deref())?;
        Ok(Box::new(EspeakSynthesizer::new(&tool, rate_wpm)) as Box<dyn Synthesizer>)
    });

    SpeechOutput::with_config(
        factory,
        SpeechOutputConfig {
            enabled: config.speech.enabled,
            quiet,
            ..SpeechOutputConfig::default()
        },
    )
}
