//! The command vocabulary shared by keyboard, voice, and the typed prompt.

/// A command produced by one of the input channels.
///
/// Every input path (single keys inside a mode, transcripts from the voice
/// listener, typed words at the menu prompt) normalizes to one of these
/// tokens before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeToken {
    Navigation,
    Captioning,
    SignDetection,
    CurrencyDetection,
    /// Toggle the voice command listener on or off.
    VoiceToggle,
    /// Toggle spoken narration on or off.
    SpeechToggle,
    /// Leave the current mode, or leave the application from the menu.
    Exit,
}

impl ModeToken {
    /// Human-readable mode name used in announcements.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModeToken::Navigation => "navigation",
            ModeToken::Captioning => "captioning",
            ModeToken::SignDetection => "sign detection",
            ModeToken::CurrencyDetection => "currency detection",
            ModeToken::VoiceToggle => "voice toggle",
            ModeToken::SpeechToggle => "speech toggle",
            ModeToken::Exit => "exit",
        }
    }

    /// True for tokens that start a camera mode.
    pub fn is_mode(&self) -> bool {
        matches!(
            self,
            ModeToken::Navigation
                | ModeToken::Captioning
                | ModeToken::SignDetection
                | ModeToken::CurrencyDetection
        )
    }
}

/// Maps a single key pressed inside a mode to a command token.
///
/// `q` leaves the mode; the letter keys jump straight to another mode
/// without passing through the menu.
pub fn key_to_token(key: char) -> Option<ModeToken> {
    match key.to_ascii_lowercase() {
        'q' => Some(ModeToken::Exit),
        'n' => Some(ModeToken::Navigation),
        'c' => Some(ModeToken::Captioning),
        's' => Some(ModeToken::SignDetection),
        'm' => Some(ModeToken::CurrencyDetection),
        'v' => Some(ModeToken::VoiceToggle),
        _ => None,
    }
}

/// Parses a word typed at the menu prompt.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
/// Returns `None` for anything outside the menu vocabulary.
pub fn parse_typed_command(input: &str) -> Option<ModeToken> {
    match input.trim().to_lowercase().as_str() {
        "nav" | "navigation" => Some(ModeToken::Navigation),
        "cap" | "caption" | "captioning" => Some(ModeToken::Captioning),
        "sign" | "signs" => Some(ModeToken::SignDetection),
        "curr" | "currency" => Some(ModeToken::CurrencyDetection),
        "voice" => Some(ModeToken::VoiceToggle),
        "speech" => Some(ModeToken::SpeechToggle),
        "exit" | "quit" => Some(ModeToken::Exit),
        _ => None,
    }
}
