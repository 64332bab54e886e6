// Shared test doubles for session and HTTP integration tests
//
// `MockModel` stands in for every collaborator at once. Responses are
// scripted up front, each call is counted, and the contexts handed to the
// chat and revision roles are recorded for inspection.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use futures::stream;
use interview_summarizer::{
    AdditionalContextParser, ChatPromptProvider, ChatResponder, Collaborators, GreetingGenerator,
    Message, RecordingTranscriber, RevisionGenerator, Session, SessionConfig, SessionHandle,
    SummaryGenerator, TextStream, TranscriptAligner, TranscriptParser,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const CHAT_PROMPT: &str = "You are an interview assistant.";
pub const ALIGNED_TRANSCRIPT: &str = "[00:00:01] Interviewer: Welcome.\n[00:00:04] Candidate: Thanks.";

/// Where a scripted failure is injected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Failure {
    Parse,
    Transcribe,
    Align,
    Context,
    /// Summary stream errors after this many fragments
    SummaryAfter(usize),
    Greeting,
    /// Chat stream errors after this many fragments
    ChatAfter(usize),
    /// Revision stream errors after this many fragments
    RevisionAfter(usize),
}

#[derive(Debug, Clone)]
pub struct Script {
    pub summary: Vec<String>,
    pub greeting: String,
    pub chat: Vec<String>,
    pub revision: Vec<String>,
    pub context_text: String,
    pub failure: Option<Failure>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            summary: fragments(&["Hello", " world"]),
            greeting: "Hi, I'm ready.".to_string(),
            chat: fragments(&["The candidate", " seemed strong."]),
            revision: fragments(&["# Interview", " (revised)"]),
            context_text: "Role: Staff Engineer".to_string(),
            failure: None,
        }
    }
}

pub fn fragments(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

/// Number of times each collaborator was called
#[derive(Debug, Default)]
pub struct Calls {
    pub parse: AtomicUsize,
    pub transcribe: AtomicUsize,
    pub align: AtomicUsize,
    pub context: AtomicUsize,
    pub chat_prompt: AtomicUsize,
    pub summary: AtomicUsize,
    pub greeting: AtomicUsize,
    pub chat: AtomicUsize,
    pub revision: AtomicUsize,
}

impl Calls {
    pub fn total(&self) -> usize {
        [
            &self.parse,
            &self.transcribe,
            &self.align,
            &self.context,
            &self.chat_prompt,
            &self.summary,
            &self.greeting,
            &self.chat,
            &self.revision,
        ]
        .iter()
        .map(|c| c.load(Ordering::SeqCst))
        .sum()
    }
}

#[derive(Default)]
pub struct MockModel {
    pub script: Mutex<Script>,
    pub calls: Calls,
    pub summary_inputs: Mutex<Vec<(String, String)>>,
    pub chat_contexts: Mutex<Vec<Vec<Message>>>,
    pub revision_contexts: Mutex<Vec<Vec<Message>>>,
}

impl MockModel {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            ..Default::default()
        })
    }

    pub fn set_failure(&self, failure: Option<Failure>) {
        self.script.lock().unwrap().failure = failure;
    }

    pub fn set_chat(&self, parts: &[&str]) {
        self.script.lock().unwrap().chat = fragments(parts);
    }

    pub fn set_revision(&self, parts: &[&str]) {
        self.script.lock().unwrap().revision = fragments(parts);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn failure(&self) -> Option<Failure> {
        self.script.lock().unwrap().failure
    }

    fn fail_if(&self, failure: Failure, what: &str) -> Result<()> {
        if self.failure() == Some(failure) {
            return Err(anyhow!("{} failed", what));
        }
        Ok(())
    }
}

/// Yield `parts`, or the first `fail_after` of them followed by an error
fn scripted(parts: Vec<String>, fail_after: Option<usize>) -> TextStream {
    let items: Vec<Result<String>> = match fail_after {
        Some(k) => parts
            .into_iter()
            .take(k)
            .map(Ok)
            .chain(std::iter::once(Err(anyhow!("stream interrupted"))))
            .collect(),
        None => parts.into_iter().map(Ok).collect(),
    };
    Box::pin(stream::iter(items))
}

#[async_trait::async_trait]
impl TranscriptParser for MockModel {
    async fn parse_transcript(&self, _source: &Path) -> Result<String> {
        self.calls.parse.fetch_add(1, Ordering::SeqCst);
        self.fail_if(Failure::Parse, "parse")?;
        Ok("Interviewer: Welcome.\nCandidate: Thanks.".to_string())
    }
}

#[async_trait::async_trait]
impl RecordingTranscriber for MockModel {
    async fn transcribe(&self, _recording: &Path) -> Result<String> {
        self.calls.transcribe.fetch_add(1, Ordering::SeqCst);
        self.fail_if(Failure::Transcribe, "transcribe")?;
        Ok("[00:00:01] welcome\n[00:00:04] thanks".to_string())
    }
}

#[async_trait::async_trait]
impl TranscriptAligner for MockModel {
    async fn align(&self, _original: &str, _transcribed: &str) -> Result<String> {
        self.calls.align.fetch_add(1, Ordering::SeqCst);
        self.fail_if(Failure::Align, "align")?;
        Ok(ALIGNED_TRANSCRIPT.to_string())
    }
}

#[async_trait::async_trait]
impl AdditionalContextParser for MockModel {
    async fn parse_context(&self, _sources: &[PathBuf]) -> Result<String> {
        self.calls.context.fetch_add(1, Ordering::SeqCst);
        self.fail_if(Failure::Context, "context")?;
        Ok(self.script.lock().unwrap().context_text.clone())
    }
}

impl ChatPromptProvider for MockModel {
    fn chat_prompt(&self) -> String {
        self.calls.chat_prompt.fetch_add(1, Ordering::SeqCst);
        CHAT_PROMPT.to_string()
    }
}

#[async_trait::async_trait]
impl SummaryGenerator for MockModel {
    async fn generate_summary(
        &self,
        transcript: &str,
        additional_context: &str,
    ) -> Result<TextStream> {
        self.calls.summary.fetch_add(1, Ordering::SeqCst);
        self.summary_inputs
            .lock()
            .unwrap()
            .push((transcript.to_string(), additional_context.to_string()));

        let fail_after = match self.failure() {
            Some(Failure::SummaryAfter(k)) => Some(k),
            _ => None,
        };
        Ok(scripted(self.script.lock().unwrap().summary.clone(), fail_after))
    }
}

#[async_trait::async_trait]
impl GreetingGenerator for MockModel {
    async fn initial_greeting(&self) -> Result<String> {
        self.calls.greeting.fetch_add(1, Ordering::SeqCst);
        self.fail_if(Failure::Greeting, "greeting")?;
        Ok(self.script.lock().unwrap().greeting.clone())
    }
}

#[async_trait::async_trait]
impl ChatResponder for MockModel {
    async fn respond(&self, messages: &[Message]) -> Result<TextStream> {
        self.calls.chat.fetch_add(1, Ordering::SeqCst);
        self.chat_contexts.lock().unwrap().push(messages.to_vec());

        let fail_after = match self.failure() {
            Some(Failure::ChatAfter(k)) => Some(k),
            _ => None,
        };
        Ok(scripted(self.script.lock().unwrap().chat.clone(), fail_after))
    }
}

#[async_trait::async_trait]
impl RevisionGenerator for MockModel {
    async fn revise(&self, messages: &[Message]) -> Result<TextStream> {
        self.calls.revision.fetch_add(1, Ordering::SeqCst);
        self.revision_contexts.lock().unwrap().push(messages.to_vec());

        let fail_after = match self.failure() {
            Some(Failure::RevisionAfter(k)) => Some(k),
            _ => None,
        };
        Ok(scripted(self.script.lock().unwrap().revision.clone(), fail_after))
    }
}

pub fn collaborators(model: &Arc<MockModel>) -> Collaborators {
    Collaborators::with_model(
        model.clone(),
        model.clone(),
        model.clone(),
        model.clone(),
        model.clone(),
    )
}

pub fn session_config() -> SessionConfig {
    SessionConfig {
        session_id: "interview-test".to_string(),
        name: "Test Interview".to_string(),
        chat_prompt_path: None,
    }
}

/// A fresh session wired to `model`
pub fn session_with(model: &Arc<MockModel>) -> SessionHandle {
    SessionHandle::new(Session::new(&session_config()), collaborators(model))
}
