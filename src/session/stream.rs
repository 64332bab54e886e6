//! Fragment streams and the accumulate-then-commit contract
//!
//! Collaborators hand back a [`TextStream`] of raw fragments. Phases pass each
//! fragment through to their caller untouched while building up the final
//! text, and only write it into the session once the source has been drained
//! without error. An upstream failure, or the caller dropping the stream
//! early, leaves the commit target untouched.

use crate::error::SessionError;
use async_stream::try_stream;
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use tracing::debug;

/// Fragments produced by an external generation call
pub type TextStream = Pin<Box<dyn Stream<Item = anyhow::Result<String>> + Send>>;

/// Fragments re-emitted by a session phase to its caller
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, SessionError>> + Send>>;

/// Concatenates streamed fragments in arrival order
#[derive(Debug, Default)]
pub struct StreamingAccumulator {
    buffer: String,
    fragments: usize,
}

impl StreamingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: &str) {
        self.buffer.push_str(fragment);
        self.fragments += 1;
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.fragments = 0;
    }

    /// Text accumulated so far (provisional until committed)
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

/// Pass `source` through while accumulating it, then `commit` into `target`
///
/// `commit` runs at most once, after the last fragment, and only if every
/// fragment arrived successfully.
pub fn accumulate<'a, T, F>(
    mut source: TextStream,
    target: &'a mut T,
    commit: F,
) -> impl Stream<Item = Result<String, SessionError>> + Send + 'a
where
    T: Send + 'a,
    F: FnOnce(&mut T, String) -> Result<(), SessionError> + Send + 'a,
{
    try_stream! {
        let mut accumulator = StreamingAccumulator::new();

        while let Some(fragment) = source.next().await {
            let fragment = fragment.map_err(SessionError::Generation)?;
            accumulator.push(&fragment);
            yield fragment;
        }

        debug!(
            "Stream exhausted after {} fragments ({} chars), committing",
            accumulator.fragment_count(),
            accumulator.text().len()
        );

        commit(target, accumulator.finish())?;
    }
}
