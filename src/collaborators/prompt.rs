use super::ChatPromptProvider;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Built-in chat system instructions
pub const DEFAULT_CHAT_PROMPT: &str = "\
You are an assistant helping a researcher work with a single interview.

You have access to:
1. The complete, timestamped transcript of the interview
2. Any additional context documents the researcher supplied
3. The initial summary of the interview

Guidelines:
- Answer questions using only what the transcript and context support; say so when they do not
- Cite timestamps (e.g., [00:15:30]) for every quote or specific claim
- Keep answers concise and use markdown where it helps readability
- Do not invent names, dates or statements that are not in the transcript";

/// Chat prompt that never changes for the lifetime of the process
#[derive(Debug, Clone)]
pub struct StaticChatPrompt {
    prompt: String,
}

impl StaticChatPrompt {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    /// Load the prompt from a file, expanding a leading `~`
    pub fn from_file(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        let prompt = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chat prompt: {}", path.display()))?;

        info!("Loaded chat prompt from {} ({} chars)", path.display(), prompt.len());

        Ok(Self::new(prompt.trim()))
    }
}

impl Default for StaticChatPrompt {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_PROMPT)
    }
}

impl ChatPromptProvider for StaticChatPrompt {
    fn chat_prompt(&self) -> String {
        self.prompt.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_prompt() {
        let prompt = StaticChatPrompt::default();
        assert_eq!(prompt.chat_prompt(), DEFAULT_CHAT_PROMPT);
    }

    #[test]
    fn test_prompt_from_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "  Custom instructions  ")?;

        let path = file.path().to_string_lossy().to_string();
        let prompt = StaticChatPrompt::from_file(&path)?;
        assert_eq!(prompt.chat_prompt(), "Custom instructions");
        Ok(())
    }

    #[test]
    fn test_missing_prompt_file() {
        assert!(StaticChatPrompt::from_file("/nonexistent/prompt.txt").is_err());
    }
}
