use super::client::NatsClient;
use super::messages::{ModelChunk, ModelRequest, ModelTask};
use crate::collaborators::{
    ChatResponder, GreetingGenerator, RevisionGenerator, SummaryGenerator, TranscriptAligner,
};
use crate::session::{Message, TextStream};
use anyhow::{anyhow, Context, Result};
use async_stream::try_stream;
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// Settings for the NATS model gateway
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Subject prefix: requests go to `<prefix>.request.<task>`,
    /// responses come back on `<prefix>.response.<request_id>`
    pub subject_prefix: String,

    /// Maximum wait for the next response chunk
    pub response_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            subject_prefix: "llm".to_string(),
            response_timeout_secs: 120,
        }
    }
}

/// Language-model collaborator backed by a model service on NATS
pub struct NatsModel {
    client: Arc<NatsClient>,
    config: ModelConfig,
}

impl NatsModel {
    pub fn new(client: Arc<NatsClient>, config: ModelConfig) -> Self {
        Self { client, config }
    }

    /// Send a task and stream back the response text
    pub async fn stream(&self, task: ModelTask) -> Result<TextStream> {
        let request = ModelRequest {
            request_id: uuid::Uuid::new_v4().to_string(),
            session_id: self.client.session_id().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            task,
        };

        // Subscribe before publishing so the first chunk cannot be missed
        let subscriber = self
            .client
            .subscribe_model_response(&self.config.subject_prefix, &request.request_id)
            .await?;

        self.client
            .publish_model_request(&self.config.subject_prefix, &request)
            .await?;

        let chunk_timeout = Duration::from_secs(self.config.response_timeout_secs);

        Ok(Box::pin(response_text(subscriber, request.request_id, chunk_timeout)))
    }

    /// Send a task and wait for the full response text
    pub async fn complete(&self, task: ModelTask) -> Result<String> {
        let name = task.name();
        let mut stream = self.stream(task).await?;

        let mut text = String::new();
        while let Some(fragment) = stream.next().await {
            text.push_str(&fragment?);
        }

        info!("Model {} response complete ({} chars)", name, text.len());

        Ok(text)
    }
}

/// Decode response chunks until the final one arrives
fn response_text(
    mut subscriber: async_nats::Subscriber,
    request_id: String,
    chunk_timeout: Duration,
) -> impl Stream<Item = Result<String>> + Send {
    try_stream! {
        loop {
            let msg = timeout(chunk_timeout, subscriber.next())
                .await
                .map_err(|_| anyhow!("Timed out waiting for model response {}", request_id))?
                .ok_or_else(|| anyhow!("Model response subscription closed for {}", request_id))?;

            let chunk: ModelChunk = serde_json::from_slice(&msg.payload)
                .context("Failed to parse model response chunk")?;

            if chunk.request_id != request_id {
                debug!("Ignoring chunk for request {}", chunk.request_id);
                continue;
            }

            if let Some(error) = chunk.error {
                Err::<(), _>(anyhow!("Model service error: {}", error))?;
            }

            if !chunk.text.is_empty() {
                yield chunk.text;
            }

            if chunk.final_chunk {
                break;
            }
        }
    }
}

#[async_trait::async_trait]
impl SummaryGenerator for NatsModel {
    async fn generate_summary(
        &self,
        transcript: &str,
        additional_context: &str,
    ) -> Result<TextStream> {
        self.stream(ModelTask::Summary {
            transcript: transcript.to_string(),
            additional_context: additional_context.to_string(),
        })
        .await
    }
}

#[async_trait::async_trait]
impl GreetingGenerator for NatsModel {
    async fn initial_greeting(&self) -> Result<String> {
        self.complete(ModelTask::Greeting).await
    }
}

#[async_trait::async_trait]
impl ChatResponder for NatsModel {
    async fn respond(&self, messages: &[Message]) -> Result<TextStream> {
        self.stream(ModelTask::Chat {
            messages: messages.to_vec(),
        })
        .await
    }
}

#[async_trait::async_trait]
impl RevisionGenerator for NatsModel {
    async fn revise(&self, messages: &[Message]) -> Result<TextStream> {
        self.stream(ModelTask::Revision {
            messages: messages.to_vec(),
        })
        .await
    }
}

#[async_trait::async_trait]
impl TranscriptAligner for NatsModel {
    async fn align(&self, original: &str, transcribed: &str) -> Result<String> {
        self.complete(ModelTask::Align {
            original: original.to_string(),
            transcribed: transcribed.to_string(),
        })
        .await
    }
}
