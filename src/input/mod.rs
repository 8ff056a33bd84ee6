//! Keyboard input: single-key polling inside modes, line prompts at the menu.

pub mod keys;
pub mod prompt;

pub use keys::{KeySource, MockKeySource, TerminalKeySource};
pub use prompt::{MockPromptSource, PromptSource, StdinPromptSource};
