pub mod client;
pub mod messages;
pub mod model;
pub mod transcriber;

pub use client::NatsClient;
pub use messages::{AudioFrameMessage, ModelChunk, ModelRequest, ModelTask, TranscriptMessage};
pub use model::{ModelConfig, NatsModel};
pub use transcriber::{NatsTranscriber, TranscriptSegment, TranscriptionConfig};
