//! DOCX text extraction via `docx-rs`.
//!
//! Only body-level paragraphs are read. Tables, headers and footers are skipped.

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use tracing::{debug, warn};

use crate::errors::AnalysisError;

/// Returns one string per body paragraph, in document order. Empty
/// paragraphs are kept so line structure survives the join.
pub fn extract_paragraphs(bytes: &[u8]) -> Result<Vec<String>, AnalysisError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| {
        warn!(error = %e, "Failed to read DOCX");
        AnalysisError::MalformedDocument {
            format: "docx",
            reason: e.to_string(),
        }
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    debug!(paragraphs = paragraphs.len(), "Extracted DOCX paragraphs");
    Ok(paragraphs)
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        push_paragraph_child(&mut text, child);
    }
    text
}

fn push_paragraph_child(text: &mut String, child: &ParagraphChild) {
    match child {
        ParagraphChild::Run(run) => {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
        ParagraphChild::Hyperlink(link) => {
            for nested in &link.children {
                push_paragraph_child(text, nested);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;

    use docx_rs::{Docx, Paragraph, Run};

    /// Builds a minimal DOCX with one paragraph per entry.
    pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).expect("pack docx fixture");
        cursor.into_inner()
    }
}
