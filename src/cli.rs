//! Command-line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sightline",
    version = crate::version_string(),
    about = "Camera narration assistant with voice control"
)]
pub struct Cli {
    /// Path to the configuration file (default: ~/.config/sightline/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the model files
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,

    /// Audio input device name (see `sightline devices`)
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Start with spoken narration disabled
    #[arg(long)]
    pub no_speech: bool,

    /// Suppress the banner and informational output
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List audio input devices
    Devices,
    /// Report model and speech tool availability
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_cleanly() {
        let cli = Cli::parse_from(["sightline"]);
        assert!(cli.config.is_none());
        assert!(cli.models_dir.is_none());
        assert!(!cli.no_speech);
        assert!(!cli.quiet);
        assert!(cli.command.is_none());
    }

    #[test]
    fn overrides_parse() {
        let cli = Cli::parse_from([
            "sightline",
            "--models-dir",
            "/data/models",
            "--device",
            "hw:1,0",
            "--no-speech",
            "-q",
        ]);
        assert_eq!(cli.models_dir, Some(PathBuf::from("/data/models")));
        assert_eq!(cli.device, Some("hw:1,0".to_string()));
        assert!(cli.no_speech);
        assert!(cli.quiet);
    }

    #[test]
    fn subcommands_parse() {
        assert!(matches!(
            Cli::parse_from(["sightline", "devices"]).command,
            Some(Commands::Devices)
        ));
        assert!(matches!(
            Cli::parse_from(["sightline", "check"]).command,
            Some(Commands::Check)
        ));
    }
}
