use super::message::Message;
use super::session::Session;
use super::stream::accumulate;
use crate::collaborators::Collaborators;
use crate::error::SessionError;
use async_stream::try_stream;
use futures::stream::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::info;

/// One user/assistant exchange over the full conversation
///
/// The user message is part of the responder's context immediately but only
/// enters the log together with the reply, so a failed exchange leaves the
/// log as it was.
pub(crate) fn run(
    mut session: OwnedMutexGuard<Session>,
    collaborators: Arc<Collaborators>,
    prompt: String,
) -> impl Stream<Item = Result<String, SessionError>> + Send {
    try_stream! {
        let user = Message::user(prompt);

        let mut context = session.messages().all();
        context.push(user.clone());

        info!("Streaming chat response over {} messages...", context.len());
        let source = collaborators
            .chat_responder
            .respond(&context)
            .await
            .map_err(SessionError::Generation)?;

        let fragments = accumulate(source, &mut *session, move |session, response| {
            session.commit_chat_turn(user, response)
        });
        futures::pin_mut!(fragments);

        while let Some(fragment) = fragments.next().await {
            yield fragment?;
        }
    }
}
