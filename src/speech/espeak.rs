//! Speech synthesis via external command-line tools.
//!
//! Narration shells out to one of the common Linux speech tools
//! (espeak-ng, espeak, or spd-say), one process per utterance. The
//! `CommandExecutor` trait enables full testability without external
//! dependencies.

use crate::error::{Result, SightlineError};
use crate::speech::synthesizer::Synthesizer;
use std::process::Command;

/// Tools probed, in order, when no override is configured.
const TOOL_CANDIDATES: [&str; 3] = ["espeak-ng", "espeak", "spd-say"];

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync for use in concurrent contexts.
/// Enables testability by allowing mock implementations.
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments.
    ///
    /// Returns the stdout of the command on success.
    /// Returns an error if the command fails or is not found.
    fn execute(&self, command: &str, args: &[&str]) -> Result<String>;
}

/// Production command executor using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SightlineError::SpeechToolNotFound {
                    tried: command.to_string(),
                }
            } else {
                SightlineError::Synthesis {
                    message: format!("Failed to execute {}: {}", command, e),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SightlineError::Synthesis {
                message: format!(
                    "{} failed with status {:?}: {}",
                    command, output.status, stderr
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Probe for an available speech tool.
///
/// An explicit override is trusted as-is after a single `--version` probe;
/// otherwise the candidates are tried in order. The returned name is suitable
/// for [`EspeakSynthesizer::new`].
pub fn detect_speech_tool<E: CommandExecutor>(
    executor: &E,
    override_tool: Option<&str>,
) -> Result<String> {
    let candidates: Vec<&str> = match override_tool {
        Some(tool) => vec![tool],
        None => TOOL_CANDIDATES.to_vec(),
    };

    for candidate in &candidates {
        if executor.execute(candidate, &["--version"]).is_ok() {
            return Ok(candidate.to_string());
        }
    }

    Err(SightlineError::SpeechToolNotFound {
        tried: candidates.join(", "),
    })
}

/// Synthesizer backed by a command-line speech tool.
///
/// Each utterance is a separate blocking subprocess, so playback completes
/// before `speak` returns and there is no persistent engine state to corrupt.
pub struct EspeakSynthesizer<E: CommandExecutor = SystemCommandExecutor> {
    executor: E,
    program: String,
    rate_wpm: u32,
}

impl EspeakSynthesizer<SystemCommandExecutor> {
    /// Create a synthesizer using the system command executor.
    pub fn new(program: &str, rate_wpm: u32) -> Self {
        Self::with_executor(SystemCommandExecutor::new(), program, rate_wpm)
    }
}

impl<E: CommandExecutor> EspeakSynthesizer<E> {
    /// Create a synthesizer with the given executor.
    pub fn with_executor(executor: E, program: &str, rate_wpm: u32) -> Self {
        Self {
            executor,
            program: program.to_string(),
            rate_wpm,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl<E: CommandExecutor> Synthesizer for EspeakSynthesizer<E> {
    fn speak(&mut self, text: &str) -> Result<()> {
        let rate = self.rate_wpm.to_string();
        // spd-say returns immediately unless told to wait; -w preserves the
        // blocking contract of Synthesizer::speak.
        let args: Vec<&str> = match self.program.as_str() {
            "spd-say" => vec!["-w", text],
            _ => vec!["-s", &rate, text],
        };
        self.executor.execute(&self.program, &args)?;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        // One process per utterance; once speak returns there is nothing
        // left to tear down.
        Ok(())
    }
}
