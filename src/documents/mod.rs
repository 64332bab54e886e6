//! Document parsers for transcripts and supporting material

pub mod docx;
pub mod pdf;

pub use docx::DocxTranscriptParser;
pub use pdf::PdfContextParser;
