//! Transcript classification.
//!
//! Maps free-form transcripts to command tokens by substring keyword match.
//! Exit phrases are checked first so "quit navigation" leaves rather than
//! re-entering navigation.

use crate::token::ModeToken;

/// Keyword table, in priority order.
const INTENTS: &[(&[&str], ModeToken)] = &[
    (&["exit", "quit", "menu"], ModeToken::Exit),
    (
        &["nav", "navi", "navigate", "navigation"],
        ModeToken::Navigation,
    ),
    (
        &["cap", "scene", "describe", "caption"],
        ModeToken::Captioning,
    ),
    (&["sign", "road"], ModeToken::SignDetection),
    (
        &["currency", "money", "cash"],
        ModeToken::CurrencyDetection,
    ),
];

/// Classify a transcript into a command token.
///
/// Case-insensitive substring match; returns `None` when no keyword appears,
/// and the caller simply ignores the utterance.
pub fn classify(transcript: &str) -> Option<ModeToken> {
    let lowered = transcript.to_lowercase();
    for (keywords, token) in INTENTS {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return Some(*token);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_match_inside_sentences() {
        assert_eq!(
            classify("please start navigation now"),
            Some(ModeToken::Navigation)
        );
        assert_eq!(
            classify("can you describe the scene"),
            Some(ModeToken::Captioning)
        );
        assert_eq!(classify("check for road signs"), Some(ModeToken::SignDetection));
        assert_eq!(
            classify("how much money is this"),
            Some(ModeToken::CurrencyDetection)
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("NAVIGATION"), Some(ModeToken::Navigation));
        assert_eq!(classify("Exit Please"), Some(ModeToken::Exit));
    }

    #[test]
    fn exit_outranks_mode_keywords() {
        assert_eq!(classify("quit navigation"), Some(ModeToken::Exit));
        assert_eq!(classify("back to the menu"), Some(ModeToken::Exit));
    }

    #[test]
    fn unrelated_speech_is_ignored() {
        assert_eq!(classify("what a lovely day"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn partial_words_still_trigger() {
        // Recognizers often truncate; the short stems are accepted alone.
        assert_eq!(classify("nav"), Some(ModeToken::Navigation));
        assert_eq!(classify("cap"), Some(ModeToken::Captioning));
        assert_eq!(classify("capture this"), Some(ModeToken::Captioning));
    }
}
