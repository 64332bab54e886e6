use crate::error::SessionError;
use serde::{Deserialize, Serialize};

/// Author of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged entry in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// The four entries summarization establishes at positions 0-3
///
/// Read-only once installed in a [`MessageLog`]; every revision rebuilds its
/// context from these, never from later log entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedContext {
    /// Position 0: chat system instructions
    pub instructions: Message,
    /// Position 1: aligned transcript
    pub transcript: Message,
    /// Position 2: additional context or the "no additional context" marker
    pub additional_context: Message,
    /// Position 3: initial summary, wrapped as a system note
    pub initial_summary: Message,
}

impl FixedContext {
    pub const LEN: usize = 4;

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        [
            &self.instructions,
            &self.transcript,
            &self.additional_context,
            &self.initial_summary,
        ]
        .into_iter()
    }

    /// Independent copy of the four entries, in position order
    pub fn to_vec(&self) -> Vec<Message> {
        self.iter().cloned().collect()
    }
}

/// Append-only, ordered conversation log
///
/// Split into a fixed-context segment (set once by summarization) and a
/// conversational segment (greeting followed by chat turns). Nothing can be
/// appended until the fixed segment exists, so positions 0-3 always hold it.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    fixed: Option<FixedContext>,
    conversation: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the fixed segment and the greeting at position 4
    pub(crate) fn establish(
        &mut self,
        fixed: FixedContext,
        greeting: Message,
    ) -> Result<(), SessionError> {
        if self.fixed.is_some() {
            return Err(SessionError::AlreadySummarized);
        }

        self.fixed = Some(fixed);
        self.conversation.push(greeting);
        Ok(())
    }

    /// Append one entry to the end of the conversational segment
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> Result<(), SessionError> {
        if self.fixed.is_none() {
            return Err(SessionError::NotSummarized);
        }

        self.conversation.push(Message::new(role, content));
        Ok(())
    }

    /// First `n` entries as an independent copy
    pub fn prefix(&self, n: usize) -> Vec<Message> {
        self.iter().take(n).cloned().collect()
    }

    /// Every entry, in order, as an independent copy
    pub fn all(&self) -> Vec<Message> {
        self.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.fixed
            .iter()
            .flat_map(|fixed| fixed.iter())
            .chain(self.conversation.iter())
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.iter().nth(index)
    }

    pub fn len(&self) -> usize {
        let fixed = if self.fixed.is_some() {
            FixedContext::LEN
        } else {
            0
        };
        fixed + self.conversation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn fixed(&self) -> Option<&FixedContext> {
        self.fixed.as_ref()
    }

    /// Entries from position 4 onward (greeting, then chat turns)
    pub fn conversation(&self) -> &[Message] {
        &self.conversation
    }
}
