//! Interview session state machine
//!
//! This module provides the `Session` abstraction that manages:
//! - The ordered message log (fixed context + conversation)
//! - Summarization: parse, transcribe, align, stream the initial summary
//! - Follow-up chat over the full conversation
//! - Guided revision over a bounded context
//! - Streaming accumulation with commit-on-success semantics

mod chat;
mod config;
mod message;
mod revise;
mod session;
mod stats;
mod stream;
mod summarize;

pub use config::SessionConfig;
pub use message::{FixedContext, Message, MessageLog, Role};
pub use revise::{revision_context, REVISION_INSTRUCTIONS};
pub use session::{Session, SessionHandle, SessionSnapshot, NO_ADDITIONAL_CONTEXT};
pub use stats::SessionStats;
pub use stream::{accumulate, FragmentStream, StreamingAccumulator, TextStream};
pub use summarize::{
    SummarizeRequest, CONTEXT_EXTENSIONS, RECORDING_EXTENSIONS, TRANSCRIPT_EXTENSIONS,
};
