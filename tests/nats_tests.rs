use base64::Engine;
use interview_summarizer::nats::messages::{
    AudioFrameMessage, ModelChunk, ModelRequest, ModelTask, TranscriptMessage,
};
use interview_summarizer::{AudioFrame, Message};

#[test]
fn test_audio_frame_serialization() {
    let msg = AudioFrameMessage {
        session_id: "interview-test".to_string(),
        sequence: 0,
        pcm: base64::engine::general_purpose::STANDARD.encode([0u8; 100]),
        sample_rate: 16000,
        channels: 1,
        timestamp: "2025-10-27T14:30:00Z".to_string(),
        offset_ms: 0,
        final_frame: false,
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("interview-test"));
    assert!(json.contains("16000"));
    assert!(json.contains("\"final\":false"));
    assert!(json.contains("\"sequence\":0"));

    let deserialized: AudioFrameMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.session_id, "interview-test");
    assert_eq!(deserialized.sample_rate, 16000);
    assert_eq!(deserialized.sequence, 0);
    assert!(!deserialized.final_frame);
}

#[test]
fn test_audio_frame_pcm_decodes_to_samples() {
    let frame = AudioFrame {
        samples: vec![100, -200, 300, -400],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms: 2500,
    };

    let msg = AudioFrameMessage {
        session_id: "interview-test".to_string(),
        sequence: 25,
        pcm: base64::engine::general_purpose::STANDARD.encode(frame.pcm_bytes()),
        sample_rate: frame.sample_rate,
        channels: frame.channels,
        timestamp: "2025-10-27T14:30:00Z".to_string(),
        offset_ms: frame.timestamp_ms,
        final_frame: false,
    };

    let json = serde_json::to_string(&msg).unwrap();
    let deserialized: AudioFrameMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.offset_ms, 2500);

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&deserialized.pcm)
        .unwrap();
    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();

    assert_eq!(samples, frame.samples);
}

#[test]
fn test_transcript_with_offset() {
    let json = r#"{
        "session_id": "interview-test",
        "text": "Tell me about your last role.",
        "partial": false,
        "timestamp": "2025-10-27T14:30:05Z",
        "confidence": 0.95,
        "offset_ms": 65000
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.text, "Tell me about your last role.");
    assert!(!msg.partial);
    assert_eq!(msg.confidence, Some(0.95));
    assert_eq!(msg.offset_ms, Some(65000));
}

#[test]
fn test_transcript_optional_fields() {
    let json = r#"{
        "session_id": "interview-test",
        "text": "No confidence score",
        "partial": true,
        "timestamp": "2025-10-27T14:30:05Z"
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert!(msg.partial);
    assert_eq!(msg.confidence, None);
    assert_eq!(msg.offset_ms, None);
}

#[test]
fn test_model_request_is_tagged_by_task() {
    let request = ModelRequest {
        request_id: "req-1".to_string(),
        session_id: "interview-test".to_string(),
        timestamp: "2025-10-27T14:30:00Z".to_string(),
        task: ModelTask::Chat {
            messages: vec![Message::system("Be brief."), Message::user("Strengths?")],
        },
    };

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["task"], "chat");
    assert_eq!(value["request_id"], "req-1");
    assert_eq!(value["messages"][0]["role"], "system");
    assert_eq!(value["messages"][1]["content"], "Strengths?");

    let deserialized: ModelRequest = serde_json::from_value(value).unwrap();
    assert_eq!(deserialized.task, request.task);
}

#[test]
fn test_model_task_names() {
    let summary = ModelTask::Summary {
        transcript: "t".to_string(),
        additional_context: String::new(),
    };
    assert_eq!(summary.name(), "summary");
    assert_eq!(ModelTask::Greeting.name(), "greeting");

    let value = serde_json::to_value(&ModelTask::Greeting).unwrap();
    assert_eq!(value["task"], "greeting");
}

#[test]
fn test_model_chunk_defaults() {
    let chunk: ModelChunk =
        serde_json::from_str(r#"{"request_id": "req-1", "text": "Hel"}"#).unwrap();
    assert_eq!(chunk.text, "Hel");
    assert!(!chunk.final_chunk);
    assert!(chunk.error.is_none());

    let last: ModelChunk =
        serde_json::from_str(r#"{"request_id": "req-1", "final": true}"#).unwrap();
    assert!(last.final_chunk);
    assert!(last.text.is_empty());

    let failed: ModelChunk =
        serde_json::from_str(r#"{"request_id": "req-1", "final": true, "error": "overloaded"}"#)
            .unwrap();
    assert_eq!(failed.error.as_deref(), Some("overloaded"));
}
