use crate::session::Message;
use serde::{Deserialize, Serialize};

/// Audio frame message published to NATS
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioFrameMessage {
    pub session_id: String,
    pub sequence: u32,
    pub pcm: String,  // Base64-encoded PCM bytes
    pub sample_rate: u32,
    pub channels: u16,
    pub timestamp: String,  // RFC3339 timestamp
    /// Offset of this frame from the start of the recording
    #[serde(default)]
    pub offset_ms: u64,
    #[serde(rename = "final")]
    pub final_frame: bool,
}

/// Transcript message received from STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub session_id: String,
    pub text: String,
    pub partial: bool,
    pub timestamp: String,
    #[serde(default)]
    pub confidence: Option<f32>,
    /// Recording offset of the segment start, when the STT service reports it
    #[serde(default)]
    pub offset_ms: Option<u64>,
}

/// Work the model gateway can perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum ModelTask {
    Summary {
        transcript: String,
        additional_context: String,
    },
    Greeting,
    Chat {
        messages: Vec<Message>,
    },
    Revision {
        messages: Vec<Message>,
    },
    Align {
        original: String,
        transcribed: String,
    },
}

impl ModelTask {
    /// Subject suffix for this task
    pub fn name(&self) -> &'static str {
        match self {
            ModelTask::Summary { .. } => "summary",
            ModelTask::Greeting => "greeting",
            ModelTask::Chat { .. } => "chat",
            ModelTask::Revision { .. } => "revision",
            ModelTask::Align { .. } => "align",
        }
    }
}

/// Request published to the model gateway
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelRequest {
    pub request_id: String,
    pub session_id: String,
    pub timestamp: String,  // RFC3339 timestamp
    #[serde(flatten)]
    pub task: ModelTask,
}

/// One streamed piece of a model response
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelChunk {
    pub request_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "final", default)]
    pub final_chunk: bool,
    #[serde(default)]
    pub error: Option<String>,
}
