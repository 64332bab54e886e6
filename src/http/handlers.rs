use super::state::AppState;
use crate::error::SessionError;
use crate::session::{FragmentStream, SummarizeRequest};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Free-form user message
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviseRequest {
    /// Free-form revision request
    pub request: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /session/summarize
/// Summarize the interview, streaming the summary as it is generated
pub async fn summarize(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Response {
    info!(
        "Summarize requested: transcript={}, recording={}, context files={}",
        req.transcript.display(),
        req.recording.display(),
        req.additional_context.len()
    );

    match state.session.summarize(req) {
        Ok(fragments) => stream_response("summarize", fragments),
        Err(e) => error_response(e),
    }
}

/// POST /session/chat
/// Ask a follow-up question, streaming the reply
pub async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    info!("Chat requested ({} chars)", req.message.len());

    match state.session.chat(req.message) {
        Ok(fragments) => stream_response("chat", fragments),
        Err(e) => error_response(e),
    }
}

/// POST /session/revise
/// Revise the current summary, streaming the new version
pub async fn revise(State(state): State<AppState>, Json(req): Json<ReviseRequest>) -> Response {
    info!("Revision requested ({} chars)", req.request.len());

    match state.session.revise(req.request) {
        Ok(fragments) => stream_response("revise", fragments),
        Err(e) => error_response(e),
    }
}

/// GET /session
/// Current summary, transcript and message log
pub async fn get_session(State(state): State<AppState>) -> Response {
    match state.session.try_snapshot() {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /session/stats
/// Session statistics
pub async fn get_stats(State(state): State<AppState>) -> Response {
    let stats = state.session.stats().await;
    (StatusCode::OK, Json(stats)).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// ============================================================================
// Helpers
// ============================================================================

/// Forward phase fragments as Server-Sent Events
///
/// Each fragment becomes a `fragment` event carrying the fragment as a JSON
/// string, so line breaks survive intact. The stream ends with `done` on
/// success or a single `error` event (an `ErrorResponse`) on failure.
fn stream_response(phase: &'static str, fragments: FragmentStream) -> Response {
    Sse::new(sse_events(phase, fragments))
        .keep_alive(KeepAlive::default())
        .into_response()
}

fn sse_events(
    phase: &'static str,
    mut fragments: FragmentStream,
) -> impl Stream<Item = Result<Event, Infallible>> + Send {
    async_stream::stream! {
        while let Some(item) = fragments.next().await {
            match item {
                Ok(fragment) => yield Ok(json_event("fragment", &fragment)),
                Err(e) => {
                    error!("{} failed: {}", phase, e);
                    yield Ok(json_event("error", &ErrorResponse { error: e.to_string() }));
                    return;
                }
            }
        }

        info!("{} stream complete", phase);
        yield Ok(Event::default().event("done").data(""));
    }
}

/// SSE event with a JSON-encoded payload
fn json_event<T: Serialize>(name: &'static str, payload: &T) -> Event {
    Event::default()
        .event(name)
        .json_data(payload)
        .unwrap_or_else(|e| {
            error!("Failed to encode {} event: {}", name, e);
            Event::default().event("error").data("Failed to encode event")
        })
}

fn error_response(err: SessionError) -> Response {
    let status = match &err {
        SessionError::Validation(_) => StatusCode::BAD_REQUEST,
        SessionError::ConcurrentAccess | SessionError::AlreadySummarized => StatusCode::CONFLICT,
        SessionError::NotSummarized => StatusCode::PRECONDITION_FAILED,
        _ => StatusCode::BAD_GATEWAY,
    };

    warn!("Request rejected ({}): {}", status, err);

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}
