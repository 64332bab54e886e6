use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::stream::StreamExt;
use interview_summarizer::{
    create_router, AppState, Collaborators, Config, DocxTranscriptParser, NatsClient, NatsModel,
    NatsTranscriber, PdfContextParser, Session, SessionHandle, StaticChatPrompt, SummarizeRequest,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "interview-summarizer", version, about = "Summarize and discuss recorded interviews")]
struct Cli {
    /// Configuration file (extension optional)
    #[arg(long, default_value = "config/interview-summarizer")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the session over HTTP (default)
    Serve,
    /// Summarize once and print the summary as it streams
    Summarize {
        /// Interview transcript (.docx)
        #[arg(long)]
        transcript: PathBuf,
        /// Interview recording (.mp4, .m4a, .mov, .wav, .mp3)
        #[arg(long)]
        recording: PathBuf,
        /// Additional context document (.pdf), repeatable
        #[arg(long = "context")]
        context: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Interview Summarizer v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    info!("Session: {} ({})", cfg.session.name, cfg.session.session_id);

    let session = build_session(&cfg).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&cfg, session).await,
        Command::Summarize {
            transcript,
            recording,
            context,
        } => {
            let mut request = SummarizeRequest::new(transcript, recording);
            request.additional_context = context;
            summarize_once(session, request).await
        }
    }
}

async fn build_session(cfg: &Config) -> Result<SessionHandle> {
    let nats = Arc::new(NatsClient::connect(&cfg.nats.url, cfg.session.session_id.clone()).await?);

    let chat_prompt = match &cfg.session.chat_prompt_path {
        Some(path) => StaticChatPrompt::from_file(path)?,
        None => StaticChatPrompt::default(),
    };

    let collaborators = Collaborators::with_model(
        Arc::new(DocxTranscriptParser::new()),
        Arc::new(NatsTranscriber::new(Arc::clone(&nats), cfg.transcription.clone())),
        Arc::new(PdfContextParser::new(&cfg.documents.pdftotext_path)),
        Arc::new(chat_prompt),
        Arc::new(NatsModel::new(nats, cfg.nats.model.clone())),
    );

    Ok(SessionHandle::new(Session::new(&cfg.session), collaborators))
}

async fn serve(cfg: &Config, session: SessionHandle) -> Result<()> {
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(AppState::new(session)))
        .await
        .context("HTTP server failed")?;

    Ok(())
}

async fn summarize_once(session: SessionHandle, request: SummarizeRequest) -> Result<()> {
    let mut fragments = session.summarize(request)?;

    let mut stdout = std::io::stdout();
    while let Some(fragment) = fragments.next().await {
        write!(stdout, "{}", fragment?)?;
        stdout.flush()?;
    }
    drop(fragments);

    let snapshot = session.snapshot().await;
    if let Some(greeting) = snapshot.messages.last() {
        println!("\n\n{}", greeting.content);
    }

    Ok(())
}
