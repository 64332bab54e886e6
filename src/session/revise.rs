use super::message::{FixedContext, Message};
use super::session::Session;
use super::stream::accumulate;
use crate::collaborators::Collaborators;
use crate::error::SessionError;
use async_stream::try_stream;
use futures::stream::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::info;

/// Formatting rules every revision must follow
pub const REVISION_INSTRUCTIONS: &str = "\
Your task is to revise an interview summary based on the user's request and the most recent summary.

You have access to:
1. The original summary guidelines (use these as a reference for the structure and tone of the summary)
2. The complete transcript of the interview (use this to add new content to the summary and follow the timestamps, DO NOT HALLUCINATE TIMES)
3. The original version of the summary
4. The most recent version of the summary
5. The user's specific revision request

Guidelines for revision:
- Always begin with the title \"# Interview with [interviewee's name]\" as heading level 1
- Use heading level 2 (##) for all section headers within the summary
- CRITICAL: Preserve all timestamp citations (e.g., [00:15:30]) regardless of revision requests - these references are essential for locating information in the original interview
- Include timestamps for all key statements, quotes, and important points
- If adding new content from the transcript, always include the corresponding timestamp
- Format the entire summary using proper markdown syntax
- Maintain the professional tone and factual accuracy of the original
- Implement the user's requested changes while ensuring the summary remains coherent and comprehensive
- Focus on capturing the most important information from the interview
- Organize content logically with clear section breaks
- Make sure the summary remains an accurate reflection of the interview content

Do not include any leading text, explanatory notes, or metadata. Provide only the revised summary starting with the title.";

/// Build the augmented context for one revision
///
/// Always derived from the original fixed entries plus the summary as it
/// stands now; chat turns and earlier revision requests never appear.
pub fn revision_context(
    fixed: &FixedContext,
    current_summary: &str,
    request: &str,
) -> Vec<Message> {
    let mut context = fixed.to_vec();
    context.push(Message::system(format!("Most Recent Summary: {}", current_summary)));
    context.push(Message::system(REVISION_INSTRUCTIONS));
    context.push(Message::user(format!(
        "Can you make these revisions to the summary: {}",
        request
    )));
    context
}

pub(crate) fn run(
    mut session: OwnedMutexGuard<Session>,
    collaborators: Arc<Collaborators>,
    request: String,
) -> impl Stream<Item = Result<String, SessionError>> + Send {
    try_stream! {
        let context = revision_context(session.fixed_context()?, session.summary(), &request);

        info!("Streaming revision ({} context messages)...", context.len());
        let source = collaborators
            .revision_generator
            .revise(&context)
            .await
            .map_err(SessionError::Generation)?;

        let fragments = accumulate(source, &mut *session, |session, summary| {
            session.commit_revision(summary)
        });
        futures::pin_mut!(fragments);

        while let Some(fragment) = fragments.next().await {
            yield fragment?;
        }
    }
}
