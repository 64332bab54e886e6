use crate::collaborators::AdditionalContextParser;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::info;

/// Extracts supporting-document text with poppler's `pdftotext`
#[derive(Debug, Clone)]
pub struct PdfContextParser {
    pdftotext: PathBuf,
}

impl PdfContextParser {
    pub fn new(pdftotext: impl Into<PathBuf>) -> Self {
        Self {
            pdftotext: pdftotext.into(),
        }
    }

    async fn extract(&self, source: &Path) -> Result<String> {
        let output = Command::new(&self.pdftotext)
            .arg("-layout")
            .arg("-enc")
            .arg("UTF-8")
            .arg(source)
            .arg("-")
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.pdftotext.display()))?;

        if !output.status.success() {
            anyhow::bail!(
                "pdftotext failed for {} ({}): {}",
                source.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for PdfContextParser {
    fn default() -> Self {
        Self::new("pdftotext")
    }
}

#[async_trait::async_trait]
impl AdditionalContextParser for PdfContextParser {
    async fn parse_context(&self, sources: &[PathBuf]) -> Result<String> {
        let mut sections = Vec::with_capacity(sources.len());

        for source in sources {
            info!("Extracting additional context: {}", source.display());
            let text = self.extract(source).await?;
            sections.push(format!("--- {} ---\n{}", display_name(source), text));
        }

        info!("Additional context parsed: {} documents", sections.len());

        Ok(sections.join("\n\n"))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
