use crate::error::Result;
use std::collections::VecDeque;
use std::io::Write;

/// Trait for line-based prompts at the menu.
pub trait PromptSource: Send {
    /// Print the prompt and read one line (untrimmed).
    fn read_command(&mut self, prompt: &str) -> Result<String>;
}

/// Prompt reading stdin in canonical mode.
#[derive(Debug, Default)]
pub struct StdinPromptSource;

impl StdinPromptSource {
    pub fn new() -> Self {
        Self
    }
}

impl PromptSource for StdinPromptSource {
    fn read_command(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        std::io::stdout().flush()?;

        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line)
    }
}

/// Mock prompt for testing.
///
/// Serves scripted lines; once exhausted every read returns "exit" so a
/// supervisor under test always terminates.
#[derive(Debug, Clone, Default)]
pub struct MockPromptSource {
    lines: VecDeque<String>,
    prompts_seen: Vec<String>,
}

impl MockPromptSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line(mut self, line: &str) -> Self {
        self.lines.push_back(line.to_string());
        self
    }

    pub fn prompts_seen(&self) -> &[String] {
        &self.prompts_seen
    }
}

impl PromptSource for MockPromptSource {
    fn read_command(&mut self, prompt: &str) -> Result<String> {
        self.prompts_seen.push(prompt.to_string());
        Ok(self
            .lines
            .pop_front()
            .unwrap_or_else(|| "exit".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_lines_then_exit() {
        let mut prompt = MockPromptSource::new().with_line("yes").with_line("nav");

        assert_eq!(prompt.read_command("> ").unwrap(), "yes");
        assert_eq!(prompt.read_command("> ").unwrap(), "nav");
        assert_eq!(prompt.read_command("> ").unwrap(), "exit");
        assert_eq!(prompt.prompts_seen().len(), 3);
    }
}
