//! PDF text extraction. Layout-based via `pdf-extract`; no OCR.

use std::panic;

use tracing::{debug, warn};

use crate::errors::AnalysisError;

/// Returns one string per page, in page order.
///
/// Page text is normalized: trailing whitespace is trimmed from every line
/// and whitespace-only lines are removed, so paragraph gaps inside a page do
/// not survive. Leading indentation is kept. Image-only pages come back as
/// empty strings rather than failing the whole document. A PDF with no pages
/// yields an empty list.
///
/// `pdf-extract` panics on some malformed inputs, so the call is isolated and
/// a panic is reported as a malformed document.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, AnalysisError> {
    let outcome = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes));

    let pages = match outcome {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            warn!(error = %e, "Failed to extract PDF text");
            return Err(AnalysisError::MalformedDocument {
                format: "pdf",
                reason: e.to_string(),
            });
        }
        Err(_) => {
            warn!("PDF extractor panicked");
            return Err(AnalysisError::MalformedDocument {
                format: "pdf",
                reason: "the PDF structure could not be interpreted".to_string(),
            });
        }
    };

    let pages: Vec<String> = pages.into_iter().map(|page| normalize_page(&page)).collect();
    debug!(
        pages = pages.len(),
        empty_pages = pages.iter().filter(|p| p.is_empty()).count(),
        "Extracted PDF pages"
    );
    Ok(pages)
}

/// Trims each line and drops blank lines; `pdf-extract` pads pages with them.
fn normalize_page(page: &str) -> String {
    page.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a PDF with one page per entry; `None` produces a page with no text.
    pub fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let operations = match page {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 14.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content stream"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize pdf");
        bytes
    }
}
