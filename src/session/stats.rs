use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about an interview session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session identifier
    pub session_id: String,

    /// Display label
    pub name: String,

    /// Whether the fixed context has been established
    pub summarized: bool,

    /// Total number of log entries
    pub message_count: usize,

    /// Completed user/assistant exchanges
    pub chat_turns: usize,

    /// Completed revisions
    pub revision_count: usize,

    /// Length of the current summary in characters
    pub summary_chars: usize,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When summarization committed, if it has
    pub summarized_at: Option<DateTime<Utc>>,

    /// When the most recent revision committed, if any
    pub last_revised_at: Option<DateTime<Utc>>,
}
