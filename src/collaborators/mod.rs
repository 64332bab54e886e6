//! Narrow interfaces to the services a session depends on
//!
//! Document parsing, speech-to-text, alignment and every language-model call
//! live behind these traits. Implementations in this crate:
//! - `documents`: `.docx` transcripts and `.pdf` additional context
//! - `nats`: STT transcription and the model gateway (summary, greeting,
//!   chat, revision, alignment)
//! - [`StaticChatPrompt`]: chat system instructions

mod prompt;

pub use prompt::{StaticChatPrompt, DEFAULT_CHAT_PROMPT};

use crate::session::{Message, TextStream};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Turns the interview transcript document into plain text
#[async_trait::async_trait]
pub trait TranscriptParser: Send + Sync {
    async fn parse_transcript(&self, source: &Path) -> Result<String>;
}

/// Speech-to-text over the interview recording
#[async_trait::async_trait]
pub trait RecordingTranscriber: Send + Sync {
    async fn transcribe(&self, recording: &Path) -> Result<String>;
}

/// Merges the original transcript with the machine transcription
#[async_trait::async_trait]
pub trait TranscriptAligner: Send + Sync {
    async fn align(&self, original: &str, transcribed: &str) -> Result<String>;
}

/// Parses and concatenates supporting documents into one text blob
#[async_trait::async_trait]
pub trait AdditionalContextParser: Send + Sync {
    async fn parse_context(&self, sources: &[PathBuf]) -> Result<String>;
}

/// Static chat system instructions
pub trait ChatPromptProvider: Send + Sync {
    fn chat_prompt(&self) -> String;
}

/// Streams the initial summary
#[async_trait::async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate_summary(&self, transcript: &str, additional_context: &str)
        -> Result<TextStream>;
}

/// Produces the assistant's opening message
#[async_trait::async_trait]
pub trait GreetingGenerator: Send + Sync {
    async fn initial_greeting(&self) -> Result<String>;
}

/// Streams a chat reply over the ordered conversation
#[async_trait::async_trait]
pub trait ChatResponder: Send + Sync {
    async fn respond(&self, messages: &[Message]) -> Result<TextStream>;
}

/// Streams a revised summary from an augmented revision context
#[async_trait::async_trait]
pub trait RevisionGenerator: Send + Sync {
    async fn revise(&self, messages: &[Message]) -> Result<TextStream>;
}

/// Everything a session needs, injected at construction
#[derive(Clone)]
pub struct Collaborators {
    pub transcript_parser: Arc<dyn TranscriptParser>,
    pub transcriber: Arc<dyn RecordingTranscriber>,
    pub aligner: Arc<dyn TranscriptAligner>,
    pub context_parser: Arc<dyn AdditionalContextParser>,
    pub chat_prompt: Arc<dyn ChatPromptProvider>,
    pub summary_generator: Arc<dyn SummaryGenerator>,
    pub greeting_generator: Arc<dyn GreetingGenerator>,
    pub chat_responder: Arc<dyn ChatResponder>,
    pub revision_generator: Arc<dyn RevisionGenerator>,
}

impl Collaborators {
    /// Wire every model-backed role to a single implementation
    pub fn with_model<M>(
        transcript_parser: Arc<dyn TranscriptParser>,
        transcriber: Arc<dyn RecordingTranscriber>,
        context_parser: Arc<dyn AdditionalContextParser>,
        chat_prompt: Arc<dyn ChatPromptProvider>,
        model: Arc<M>,
    ) -> Self
    where
        M: TranscriptAligner
            + SummaryGenerator
            + GreetingGenerator
            + ChatResponder
            + RevisionGenerator
            + 'static,
    {
        Self {
            transcript_parser,
            transcriber,
            aligner: model.clone(),
            context_parser,
            chat_prompt,
            summary_generator: model.clone(),
            greeting_generator: model.clone(),
            chat_responder: model.clone(),
            revision_generator: model,
        }
    }
}
