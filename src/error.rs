//! Error taxonomy for session phases

use thiserror::Error;

/// Errors surfaced by the summarize, chat and revise phases
///
/// Collaborator failures keep their original `anyhow` chain as the source.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Caller supplied an input that fails identification (e.g. wrong file type)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Transcript or additional-context document could not be parsed
    #[error("Failed to parse document: {0:#}")]
    Parse(#[source] anyhow::Error),

    /// Recording could not be transcribed
    #[error("Failed to transcribe recording: {0:#}")]
    Transcription(#[source] anyhow::Error),

    /// Transcript and transcription could not be aligned
    #[error("Failed to align transcripts: {0:#}")]
    Alignment(#[source] anyhow::Error),

    /// Streaming or one-shot model generation failed
    #[error("Generation failed: {0:#}")]
    Generation(#[source] anyhow::Error),

    /// Another phase currently holds the session
    #[error("Another phase is already in progress on this session")]
    ConcurrentAccess,

    /// Chat or revision requested before summarization completed
    #[error("Session has not been summarized yet")]
    NotSummarized,

    /// Summarization requested on a session that already has its fixed context
    #[error("Session has already been summarized")]
    AlreadySummarized,
}

impl SessionError {
    /// Whether the error was caused by the caller rather than a collaborator
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            SessionError::Validation(_)
                | SessionError::ConcurrentAccess
                | SessionError::NotSummarized
                | SessionError::AlreadySummarized
        )
    }
}
