use super::client::NatsClient;
use super::messages::TranscriptMessage;
use crate::audio::{AudioFrame, RecordingFile};
use crate::collaborators::RecordingTranscriber;
use anyhow::{Context, Result};
use futures::stream::StreamExt;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Settings for recording transcription
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Sample rate expected by the STT service (Whisper expects 16kHz)
    pub sample_rate: u32,

    /// Duration of each published frame
    pub frame_ms: u64,

    /// Stop collecting once no transcript has arrived for this long
    pub idle_timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // Whisper expects 16kHz
            frame_ms: 100,      // 100ms frames
            idle_timeout_secs: 10,
        }
    }
}

/// A single final transcript segment from the STT service
#[derive(Debug, Clone)]
pub struct TranscriptSegment {
    /// Transcribed text
    pub text: String,

    /// Offset into the recording, if reported
    pub offset_ms: Option<u64>,
}

impl TranscriptSegment {
    /// `[HH:MM:SS] text` when the offset is known, plain text otherwise
    pub fn render(&self) -> String {
        match self.offset_ms {
            Some(offset_ms) => format!("[{}] {}", format_offset(offset_ms), self.text.trim()),
            None => self.text.trim().to_string(),
        }
    }
}

fn format_offset(offset_ms: u64) -> String {
    let total = offset_ms / 1000;
    format!("{:02}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

/// Transcribes recordings by streaming them through the STT service over NATS
pub struct NatsTranscriber {
    client: Arc<NatsClient>,
    config: TranscriptionConfig,
}

impl NatsTranscriber {
    pub fn new(client: Arc<NatsClient>, config: TranscriptionConfig) -> Self {
        Self { client, config }
    }

    async fn publish_frames(&self, frames: &[AudioFrame]) -> Result<()> {
        for (sequence, frame) in frames.iter().enumerate() {
            self.client
                .publish_audio_frame(frame, sequence as u32, false)
                .await?;
        }

        // Final marker tells the STT service to flush
        let last = AudioFrame {
            samples: Vec::new(),
            sample_rate: self.config.sample_rate,
            channels: 1,
            timestamp_ms: frames.last().map_or(0, |f| f.timestamp_ms + f.duration_ms()),
        };
        self.client
            .publish_audio_frame(&last, frames.len() as u32, true)
            .await?;

        info!("Published {} audio frames for transcription", frames.len());

        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordingTranscriber for NatsTranscriber {
    async fn transcribe(&self, recording: &Path) -> Result<String> {
        let path = recording.to_path_buf();
        let sample_rate = self.config.sample_rate;
        let recording = tokio::task::spawn_blocking(move || RecordingFile::open(path, sample_rate))
            .await
            .context("Recording decoder task panicked")??;

        let frames = recording.frames(self.config.frame_ms);

        // Subscribe before publishing so no transcript is missed
        let mut subscriber = self.client.subscribe_transcripts().await?;

        self.publish_frames(&frames).await?;

        let idle = Duration::from_secs(self.config.idle_timeout_secs);
        let mut segments = Vec::new();

        loop {
            let msg = match timeout(idle, subscriber.next()).await {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    warn!("Transcript subscription closed");
                    break;
                }
                Err(_) => break,
            };

            match serde_json::from_slice::<TranscriptMessage>(&msg.payload) {
                Ok(transcript) => {
                    // Filter by session_id
                    if transcript.session_id != self.client.session_id() || transcript.partial {
                        continue;
                    }

                    segments.push(TranscriptSegment {
                        text: transcript.text,
                        offset_ms: transcript.offset_ms,
                    });
                }
                Err(e) => {
                    warn!("Failed to parse transcript message: {}", e);
                }
            }
        }

        if segments.is_empty() {
            anyhow::bail!(
                "No transcript received within {}s of sending {:.1}s of audio",
                self.config.idle_timeout_secs,
                recording.duration_seconds
            );
        }

        info!("Transcription complete: {} segments", segments.len());

        Ok(segments
            .iter()
            .map(TranscriptSegment::render)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_offset() {
        let segment = TranscriptSegment {
            text: " So tell me about yourself. ".to_string(),
            offset_ms: Some(3_725_400),
        };
        assert_eq!(segment.render(), "[01:02:05] So tell me about yourself.");
    }

    #[test]
    fn test_render_without_offset() {
        let segment = TranscriptSegment {
            text: "Hello".to_string(),
            offset_ms: None,
        };
        assert_eq!(segment.render(), "Hello");
    }

    #[test]
    fn test_default_config_targets_whisper() {
        let config = TranscriptionConfig::default();
        assert_eq!(config.sample_rate, 16000, "Default should be 16kHz for Whisper");
        assert_eq!(config.frame_ms, 100);
    }
}
