use super::messages::{AudioFrameMessage, ModelRequest};
use crate::audio::AudioFrame;
use anyhow::{Context, Result};
use async_nats::Client;
use base64::Engine;
use tracing::{debug, info};

pub struct NatsClient {
    client: Client,
    session_id: String,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, session_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client, session_id })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Publish audio frame to NATS
    pub async fn publish_audio_frame(
        &self,
        frame: &AudioFrame,
        sequence: u32,
        is_final: bool,
    ) -> Result<()> {
        let subject = format!("audio.frame.meeting-{}", self.session_id);
        let pcm_bytes = frame.pcm_bytes();

        let message = AudioFrameMessage {
            session_id: self.session_id.clone(),
            sequence,
            pcm: base64::engine::general_purpose::STANDARD.encode(&pcm_bytes),
            sample_rate: frame.sample_rate,
            channels: frame.channels,
            timestamp: chrono::Utc::now().to_rfc3339(),
            offset_ms: frame.timestamp_ms,
            final_frame: is_final,
        };

        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish audio frame")?;

        debug!(
            "Published audio frame to {} (sequence={}, bytes={}, final={})",
            subject,
            sequence,
            pcm_bytes.len(),
            is_final
        );

        Ok(())
    }

    /// Subscribe to transcript messages
    pub async fn subscribe_transcripts(&self) -> Result<async_nats::Subscriber> {
        // The STT service publishes to stt.text.partial and stt.text.final;
        // session_id in the payload tells sessions apart
        let subject = "stt.text.>";

        info!("Subscribing to transcripts on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject)
            .await
            .context("Failed to subscribe to transcripts")?;

        Ok(subscriber)
    }

    /// Subscribe to the response subject for one model request
    pub async fn subscribe_model_response(
        &self,
        prefix: &str,
        request_id: &str,
    ) -> Result<async_nats::Subscriber> {
        let subject = format!("{}.response.{}", prefix, request_id);

        debug!("Subscribing to model response on {}", subject);

        self.client
            .subscribe(subject)
            .await
            .context("Failed to subscribe to model response")
    }

    /// Publish a model request
    pub async fn publish_model_request(&self, prefix: &str, request: &ModelRequest) -> Result<()> {
        let subject = format!("{}.request.{}", prefix, request.task.name());
        let payload = serde_json::to_vec(request)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish model request")?;

        // Make sure the request is on the wire before we start waiting on the reply
        self.client
            .flush()
            .await
            .context("Failed to flush model request")?;

        info!("Published {} request {} to {}", request.task.name(), request.request_id, subject);

        Ok(())
    }
}
