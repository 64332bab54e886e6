use super::session::Session;
use super::stream::accumulate;
use crate::collaborators::Collaborators;
use crate::error::SessionError;
use async_stream::try_stream;
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::info;

/// Accepted transcript document extensions
pub const TRANSCRIPT_EXTENSIONS: &[&str] = &["docx"];

/// Accepted recording extensions (video or audio containers)
pub const RECORDING_EXTENSIONS: &[&str] = &["mp4", "m4a", "mov", "wav", "mp3"];

/// Accepted additional-context extensions
pub const CONTEXT_EXTENSIONS: &[&str] = &["pdf"];

/// Inputs to the summarization phase
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    /// Interview transcript (.docx)
    pub transcript: PathBuf,

    /// Interview recording (.mp4, .m4a, .mov, .wav, .mp3)
    pub recording: PathBuf,

    /// Supporting documents (.pdf), in order
    #[serde(default)]
    pub additional_context: Vec<PathBuf>,
}

impl SummarizeRequest {
    pub fn new(transcript: impl Into<PathBuf>, recording: impl Into<PathBuf>) -> Self {
        Self {
            transcript: transcript.into(),
            recording: recording.into(),
            additional_context: Vec::new(),
        }
    }

    pub fn with_context(mut self, source: impl Into<PathBuf>) -> Self {
        self.additional_context.push(source.into());
        self
    }

    /// Check that every source is identified as the expected kind of file
    pub fn validate(&self) -> Result<(), SessionError> {
        if !has_extension(&self.transcript, TRANSCRIPT_EXTENSIONS) {
            return Err(SessionError::Validation(format!(
                "Transcript file must be a .docx file: {}",
                self.transcript.display()
            )));
        }

        if !has_extension(&self.recording, RECORDING_EXTENSIONS) {
            return Err(SessionError::Validation(format!(
                "Recording file must be a video or audio recording ({}): {}",
                RECORDING_EXTENSIONS.join(", "),
                self.recording.display()
            )));
        }

        if let Some(bad) = self
            .additional_context
            .iter()
            .find(|source| !has_extension(source, CONTEXT_EXTENSIONS))
        {
            return Err(SessionError::Validation(format!(
                "Additional context files must be .pdf files: {}",
                bad.display()
            )));
        }

        Ok(())
    }
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Everything summarization produces, held back until the greeting arrives
#[derive(Debug)]
pub(crate) struct StagedSummary {
    pub chat_prompt: String,
    pub transcript: String,
    pub additional_context: Option<String>,
    pub summary: String,
}

pub(crate) fn run(
    mut session: OwnedMutexGuard<Session>,
    collaborators: Arc<Collaborators>,
    request: SummarizeRequest,
) -> impl Stream<Item = Result<String, SessionError>> + Send {
    try_stream! {
        info!("Parsing transcript...");
        let original = collaborators
            .transcript_parser
            .parse_transcript(&request.transcript)
            .await
            .map_err(SessionError::Parse)?;

        info!("Transcribing recording...");
        let transcribed = collaborators
            .transcriber
            .transcribe(&request.recording)
            .await
            .map_err(SessionError::Transcription)?;

        info!("Aligning transcripts...");
        let aligned = collaborators
            .aligner
            .align(&original, &transcribed)
            .await
            .map_err(SessionError::Alignment)?;

        let additional_context = if request.additional_context.is_empty() {
            None
        } else {
            info!("Parsing additional context ({} files)...", request.additional_context.len());
            let text = collaborators
                .context_parser
                .parse_context(&request.additional_context)
                .await
                .map_err(SessionError::Parse)?;
            Some(text)
        };

        let mut staged = StagedSummary {
            chat_prompt: collaborators.chat_prompt.chat_prompt(),
            transcript: aligned,
            additional_context,
            summary: String::new(),
        };

        info!("Generating summary...");
        let source = collaborators
            .summary_generator
            .generate_summary(
                &staged.transcript,
                staged.additional_context.as_deref().unwrap_or(""),
            )
            .await
            .map_err(SessionError::Generation)?;

        {
            let fragments = accumulate(source, &mut staged, |staged, summary| {
                staged.summary = summary;
                Ok(())
            });
            futures::pin_mut!(fragments);

            while let Some(fragment) = fragments.next().await {
                yield fragment?;
            }
        }

        let greeting = collaborators
            .greeting_generator
            .initial_greeting()
            .await
            .map_err(SessionError::Generation)?;

        session.commit_summarization(staged, greeting)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_expected_types() {
        let request = SummarizeRequest::new("interview.DOCX", "recording.mp4")
            .with_context("brief.pdf")
            .with_context("notes.PDF");
        assert!(request.validate().is_ok());

        for recording in ["call.m4a", "call.mov", "call.wav", "call.mp3"] {
            assert!(SummarizeRequest::new("t.docx", recording).validate().is_ok());
        }
    }

    #[test]
    fn test_validate_rejects_wrong_transcript() {
        let request = SummarizeRequest::new("interview.pdf", "recording.mp4");
        assert!(matches!(request.validate(), Err(SessionError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_wrong_recording() {
        for recording in ["recording.docx", "recording", "recording.mp4.txt"] {
            let request = SummarizeRequest::new("interview.docx", recording);
            assert!(matches!(request.validate(), Err(SessionError::Validation(_))));
        }
    }

    #[test]
    fn test_validate_rejects_any_bad_context() {
        let request = SummarizeRequest::new("interview.docx", "recording.mp4")
            .with_context("ok.pdf")
            .with_context("notes.txt");

        match request.validate() {
            Err(SessionError::Validation(message)) => assert!(message.contains("notes.txt")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_request_deserialization_defaults_context() {
        let json = r#"{"transcript": "a.docx", "recording": "b.mp4"}"#;
        let request: SummarizeRequest = serde_json::from_str(json).unwrap();
        assert!(request.additional_context.is_empty());
    }
}
