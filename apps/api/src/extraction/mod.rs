// Text extraction: one handler per document format.
// Pure functions over the uploaded bytes; nothing is cached between calls.

pub mod docx;
pub mod pdf;

use tracing::debug;

use crate::errors::AnalysisError;
use crate::models::document::{Document, DocumentFormat, ExtractedText};

/// Converts a document into plain text, segments joined with `\n`.
///
/// Reports what was found. A document with no text yields an empty string;
/// deciding whether that is acceptable is the caller's job.
pub fn extract(document: &Document) -> Result<ExtractedText, AnalysisError> {
    let extracted = match &document.format {
        DocumentFormat::Pdf => ExtractedText::from_segments(pdf::extract_pages(&document.bytes)?),
        DocumentFormat::Docx => {
            ExtractedText::from_segments(docx::extract_paragraphs(&document.bytes)?)
        }
        DocumentFormat::PlainText => decode_plain_text(&document.bytes)?,
        DocumentFormat::Unsupported(tag) => {
            return Err(AnalysisError::UnsupportedFormat {
                format: tag.clone(),
                operation: "text extraction",
            })
        }
    };

    debug!(
        format = document.format.as_str(),
        chars = extracted.text.chars().count(),
        segments = extracted.segments,
        empty_segments = extracted.empty_segments,
        "Text extracted"
    );
    Ok(extracted)
}

fn decode_plain_text(bytes: &[u8]) -> Result<ExtractedText, AnalysisError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| AnalysisError::DecodingFailure(e.to_string()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Ok(ExtractedText {
        text: text.to_string(),
        segments: 1,
        empty_segments: usize::from(text.trim().is_empty()),
    })
}
