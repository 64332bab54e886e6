use super::chat;
use super::config::SessionConfig;
use super::message::{FixedContext, Message, MessageLog, Role};
use super::revise;
use super::stats::SessionStats;
use super::stream::FragmentStream;
use super::summarize::{self, StagedSummary, SummarizeRequest};
use crate::collaborators::Collaborators;
use crate::error::SessionError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;

/// Content of position 2 when no additional context was supplied
pub const NO_ADDITIONAL_CONTEXT: &str = "No additional context provided.";

/// State of a single interview conversation
///
/// Mutated only by the summarize, chat and revise phases, and only at their
/// commit points.
#[derive(Debug)]
pub struct Session {
    id: String,
    name: String,
    summary: String,
    transcript: String,
    messages: MessageLog,
    revision_count: usize,
    created_at: DateTime<Utc>,
    summarized_at: Option<DateTime<Utc>>,
    last_revised_at: Option<DateTime<Utc>>,
}

/// Point-in-time copy of a session's authoritative state
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub transcript: String,
    pub messages: Vec<Message>,
}

impl Session {
    /// Create an empty session: no transcript, no summary, empty log
    pub fn new(config: &SessionConfig) -> Self {
        info!("Creating interview session: {} ({})", config.session_id, config.name);

        Self {
            id: config.session_id.clone(),
            name: config.name.clone(),
            summary: String::new(),
            transcript: String::new(),
            messages: MessageLog::new(),
            revision_count: 0,
            created_at: Utc::now(),
            summarized_at: None,
            last_revised_at: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Current best-known summary (initial or latest revision)
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Aligned transcript, empty until summarization commits
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn is_summarized(&self) -> bool {
        self.messages.fixed().is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            summary: self.summary.clone(),
            transcript: self.transcript.clone(),
            messages: self.messages.all(),
        }
    }

    pub fn stats(&self) -> SessionStats {
        // Conversation starts with the greeting; every exchange after it is a pair
        let chat_turns = self.messages.conversation().len().saturating_sub(1) / 2;

        SessionStats {
            session_id: self.id.clone(),
            name: self.name.clone(),
            summarized: self.is_summarized(),
            message_count: self.messages.len(),
            chat_turns,
            revision_count: self.revision_count,
            summary_chars: self.summary.chars().count(),
            created_at: self.created_at,
            summarized_at: self.summarized_at,
            last_revised_at: self.last_revised_at,
        }
    }

    pub(crate) fn fixed_context(&self) -> Result<&FixedContext, SessionError> {
        self.messages.fixed().ok_or(SessionError::NotSummarized)
    }

    pub(crate) fn commit_summarization(
        &mut self,
        staged: StagedSummary,
        greeting: String,
    ) -> Result<(), SessionError> {
        let additional_context = match &staged.additional_context {
            Some(text) => format!("Additional Context: {}", text),
            None => NO_ADDITIONAL_CONTEXT.to_string(),
        };

        let fixed = FixedContext {
            instructions: Message::system(staged.chat_prompt),
            transcript: Message::system(staged.transcript.clone()),
            additional_context: Message::system(additional_context),
            initial_summary: Message::system(format!("Initial Summary: {}", staged.summary)),
        };

        self.messages.establish(fixed, Message::assistant(greeting))?;
        self.transcript = staged.transcript;
        self.summary = staged.summary;
        self.summarized_at = Some(Utc::now());

        info!(
            "Session {} summarized: {} chars of transcript, {} chars of summary",
            self.id,
            self.transcript.len(),
            self.summary.len()
        );

        Ok(())
    }

    pub(crate) fn commit_chat_turn(
        &mut self,
        user: Message,
        response: String,
    ) -> Result<(), SessionError> {
        self.messages.append(user.role, user.content)?;
        self.messages.append(Role::Assistant, response)?;

        info!("Session {} chat turn committed ({} messages)", self.id, self.messages.len());

        Ok(())
    }

    pub(crate) fn commit_revision(&mut self, summary: String) -> Result<(), SessionError> {
        self.summary = summary;
        self.revision_count += 1;
        self.last_revised_at = Some(Utc::now());

        info!(
            "Session {} revision {} committed ({} chars)",
            self.id,
            self.revision_count,
            self.summary.len()
        );

        Ok(())
    }
}

/// Shared entry point to a session and its collaborators
///
/// Phases are serialized per session: each entry point takes the session lock
/// without waiting and fails with [`SessionError::ConcurrentAccess`] if another
/// phase still holds it. The returned stream owns the lock until it finishes,
/// fails, or is dropped.
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<Session>>,
    collaborators: Arc<Collaborators>,
}

impl SessionHandle {
    pub fn new(session: Session, collaborators: Collaborators) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            collaborators: Arc::new(collaborators),
        }
    }

    /// Run the summarization phase
    ///
    /// Input validation happens before the lock is taken and before any
    /// collaborator is called.
    pub fn summarize(&self, request: SummarizeRequest) -> Result<FragmentStream, SessionError> {
        request.validate()?;

        let session = self.acquire()?;
        if session.is_summarized() {
            return Err(SessionError::AlreadySummarized);
        }

        Ok(Box::pin(summarize::run(
            session,
            Arc::clone(&self.collaborators),
            request,
        )))
    }

    /// Run one chat exchange
    pub fn chat(&self, prompt: impl Into<String>) -> Result<FragmentStream, SessionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(SessionError::Validation("Chat message must not be empty".to_string()));
        }

        let session = self.acquire()?;
        session.fixed_context()?;

        Ok(Box::pin(chat::run(
            session,
            Arc::clone(&self.collaborators),
            prompt,
        )))
    }

    /// Run one revision of the current summary
    pub fn revise(&self, request: impl Into<String>) -> Result<FragmentStream, SessionError> {
        let request = request.into();
        if request.trim().is_empty() {
            return Err(SessionError::Validation(
                "Revision request must not be empty".to_string(),
            ));
        }

        let session = self.acquire()?;
        session.fixed_context()?;

        Ok(Box::pin(revise::run(
            session,
            Arc::clone(&self.collaborators),
            request,
        )))
    }

    /// Snapshot once no phase is running
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Snapshot now, or fail if a phase is running
    pub fn try_snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.session
            .try_lock()
            .map(|session| session.snapshot())
            .map_err(|_| SessionError::ConcurrentAccess)
    }

    pub async fn stats(&self) -> SessionStats {
        self.session.lock().await.stats()
    }

    /// Whether a phase currently holds the session
    pub fn is_busy(&self) -> bool {
        self.session.try_lock().is_err()
    }

    fn acquire(&self) -> Result<OwnedMutexGuard<Session>, SessionError> {
        Arc::clone(&self.session)
            .try_lock_owned()
            .map_err(|_| SessionError::ConcurrentAccess)
    }
}
