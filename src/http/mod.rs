//! HTTP API server for driving the interview session
//!
//! This module provides a REST + Server-Sent Events API over one session:
//! - POST /session/summarize - Summarize transcript + recording (SSE)
//! - POST /session/chat - Follow-up question (SSE)
//! - POST /session/revise - Revise the current summary (SSE)
//! - GET /session - Snapshot of summary, transcript and messages
//! - GET /session/stats - Session statistics
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ChatRequest, ErrorResponse, ReviseRequest};
pub use routes::create_router;
pub use state::AppState;
