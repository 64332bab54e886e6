pub mod audio;
pub mod collaborators;
pub mod config;
pub mod documents;
pub mod error;
pub mod http;
pub mod nats;
pub mod session;

pub use audio::{AudioFrame, RecordingFile};
pub use collaborators::{
    AdditionalContextParser, ChatPromptProvider, ChatResponder, Collaborators, GreetingGenerator,
    RecordingTranscriber, RevisionGenerator, StaticChatPrompt, SummaryGenerator, TranscriptAligner,
    TranscriptParser,
};
pub use config::Config;
pub use documents::{DocxTranscriptParser, PdfContextParser};
pub use error::SessionError;
pub use http::{create_router, AppState};
pub use nats::{ModelTask, NatsClient, NatsModel, NatsTranscriber, TranscriptMessage};
pub use session::{
    FragmentStream, Message, MessageLog, Role, Session, SessionConfig, SessionHandle,
    SessionSnapshot, SessionStats, SummarizeRequest, TextStream,
};
