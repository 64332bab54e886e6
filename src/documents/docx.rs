use crate::collaborators::TranscriptParser;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;
use zip::ZipArchive;

/// Main body of a word-processor document inside its zip container
const DOCUMENT_PART: &str = "word/document.xml";

/// Reads interview transcripts from `.docx` files
#[derive(Debug, Clone, Default)]
pub struct DocxTranscriptParser;

impl DocxTranscriptParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract paragraph text from a `.docx` file (blocking)
    pub fn extract_text(path: &Path) -> Result<String> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open transcript: {}", path.display()))?;
        let mut archive = ZipArchive::new(file)
            .with_context(|| format!("Not a valid .docx container: {}", path.display()))?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .with_context(|| format!("Missing {} in {}", DOCUMENT_PART, path.display()))?
            .read_to_string(&mut xml)
            .context("Failed to read document XML")?;

        Ok(xml_to_text(&xml))
    }
}

#[async_trait::async_trait]
impl TranscriptParser for DocxTranscriptParser {
    async fn parse_transcript(&self, source: &Path) -> Result<String> {
        info!("Parsing transcript document: {}", source.display());

        let path = source.to_path_buf();
        let text = tokio::task::spawn_blocking(move || Self::extract_text(&path))
            .await
            .context("Transcript parser task panicked")??;

        if text.is_empty() {
            anyhow::bail!("Transcript document has no text: {}", source.display());
        }

        info!("Transcript parsed: {} lines", text.lines().count());

        Ok(text)
    }
}

/// Convert WordprocessingML to plain text, one paragraph per line
pub(crate) fn xml_to_text(xml: &str) -> String {
    let with_breaks = xml
        .replace("</w:p>", "\n")
        .replace("<w:tab/>", "\t")
        .replace("<w:br/>", "\n")
        .replace("<w:cr/>", "\n");

    let mut text = String::with_capacity(with_breaks.len());
    let mut in_tag = false;

    for ch in with_breaks.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    decode_entities(&text)
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
