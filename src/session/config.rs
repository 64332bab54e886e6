use serde::{Deserialize, Serialize};

/// Configuration for an interview session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "interview-2025-10-28-jane-doe")
    /// Also scopes the NATS subjects used for transcription
    pub session_id: String,

    /// Display label for the session
    /// Default: "Untitled"
    pub name: String,

    /// Optional file holding the chat system instructions (supports `~`)
    /// Default: built-in interview assistant prompt
    pub chat_prompt_path: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("interview-{}", uuid::Uuid::new_v4()),
            name: "Untitled".to_string(),
            chat_prompt_path: None,
        }
    }
}
