//! Document Augmenter: appends a "Skills" section to a DOCX resume.
//!
//! Works on the package directly: every part is copied through unchanged
//! except `word/document.xml` (new paragraphs inserted before the body-level
//! `sectPr`) and, when it lacks a `Heading1` style, `word/styles.xml`.
//! Original paragraphs are never touched, so the result strictly extends the input.

mod ooxml;
pub mod skills;

use std::io::{Cursor, Read, Write};

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::AnalysisError;
use crate::models::document::{AugmentedDocument, Document, DocumentFormat};

pub use skills::SkillList;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

/// Largest decompressed part accepted from an uploaded package.
pub const MAX_PART_BYTES: u64 = 64 * 1024 * 1024;

/// Returns a new DOCX: the original content, then a `Heading1` "Skills"
/// paragraph, then one paragraph per skill in order.
pub fn augment(document: &Document, skills: &SkillList) -> Result<AugmentedDocument, AnalysisError> {
    match &document.format {
        DocumentFormat::Docx => {}
        other => {
            return Err(AnalysisError::UnsupportedFormat {
                format: other.as_str().to_string(),
                operation: "resume augmentation",
            })
        }
    }

    let mut archive = ZipArchive::new(Cursor::new(document.bytes.as_ref())).map_err(malformed)?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut body_patched = false;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(malformed)?;
        let name = entry.name().to_string();
        let options = SimpleFileOptions::default().compression_method(
            match entry.compression() {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            },
        );

        if entry.is_dir() {
            writer.add_directory(name, options).map_err(malformed)?;
            continue;
        }

        if entry.size() > MAX_PART_BYTES {
            return Err(malformed_reason(format!(
                "part {name} declares {} bytes, over the {MAX_PART_BYTES} byte limit",
                entry.size()
            )));
        }
        // the declared size is untrusted; cap what is actually inflated too
        let mut content = Vec::new();
        entry
            .by_ref()
            .take(MAX_PART_BYTES + 1)
            .read_to_end(&mut content)
            .map_err(|e| malformed_reason(e.to_string()))?;
        if content.len() as u64 > MAX_PART_BYTES {
            return Err(malformed_reason(format!(
                "part {name} inflates past the {MAX_PART_BYTES} byte limit"
            )));
        }

        let content = match name.as_str() {
            DOCUMENT_PART => {
                body_patched = true;
                ooxml::insert_skills_section(as_xml(&content)?, skills.as_slice())?
            }
            STYLES_PART => match ooxml::ensure_heading_style(as_xml(&content)?)? {
                Some(styles) => styles,
                None => content,
            },
            _ => content,
        };

        writer.start_file(name, options).map_err(malformed)?;
        writer
            .write_all(&content)
            .map_err(|e| malformed_reason(e.to_string()))?;
    }

    if !body_patched {
        return Err(malformed_reason(format!("package has no {DOCUMENT_PART}")));
    }

    let bytes = writer.finish().map_err(malformed)?.into_inner();
    info!(
        skills = skills.len(),
        heading_only = skills.is_empty(),
        input_bytes = document.bytes.len(),
        output_bytes = bytes.len(),
        "Resume augmented with skills section"
    );

    Ok(AugmentedDocument {
        bytes: bytes.into(),
    })
}

fn as_xml(content: &[u8]) -> Result<&str, AnalysisError> {
    std::str::from_utf8(content).map_err(|e| malformed_reason(format!("part is not UTF-8: {e}")))
}

fn malformed(e: zip::result::ZipError) -> AnalysisError {
    malformed_reason(e.to_string())
}

fn malformed_reason(reason: String) -> AnalysisError {
    AnalysisError::MalformedDocument {
        format: "docx",
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::docx::{extract_paragraphs, fixtures::docx_with_paragraphs};

    fn resume() -> Document {
        Document::new(
            docx_with_paragraphs(&["Jane Doe", "Work Experience", "Education"]),
            DocumentFormat::Docx,
        )
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_appends_heading_then_skills_in_order() {
        let skills: SkillList = ["Go", "Rust"].into_iter().collect();
        let augmented = augment(&resume(), &skills).unwrap();

        let paragraphs = extract_paragraphs(&augmented.bytes).unwrap();
        assert_eq!(
            paragraphs,
            vec!["Jane Doe", "Work Experience", "Education", "Skills", "Go", "Rust"]
        );
    }

    #[test]
    fn test_empty_skill_list_adds_only_heading() {
        let augmented = augment(&resume(), &SkillList::default()).unwrap();

        let paragraphs = extract_paragraphs(&augmented.bytes).unwrap();
        assert_eq!(
            paragraphs,
            vec!["Jane Doe", "Work Experience", "Education", "Skills"]
        );
        let xml = read_part(&augmented.bytes, DOCUMENT_PART);
        assert_eq!(xml.matches(r#"<w:pStyle w:val="Heading1"/>"#).count(), 1);
    }

    #[test]
    fn test_duplicate_skills_are_not_merged() {
        let skills: SkillList = ["Go", "Go"].into_iter().collect();
        let augmented = augment(&resume(), &skills).unwrap();
        let paragraphs = extract_paragraphs(&augmented.bytes).unwrap();
        assert_eq!(paragraphs[paragraphs.len() - 2..], ["Go", "Go"]);
    }

    #[test]
    fn test_skill_text_is_escaped() {
        let skills: SkillList = ["R&D <Ops>"].into_iter().collect();
        let augmented = augment(&resume(), &skills).unwrap();
        let xml = read_part(&augmented.bytes, DOCUMENT_PART);
        assert!(xml.contains("R&amp;D &lt;Ops&gt;"));
        let paragraphs = extract_paragraphs(&augmented.bytes).unwrap();
        assert_eq!(paragraphs.last().unwrap(), "R&D <Ops>");
    }

    #[test]
    fn test_heading_style_is_available() {
        let augmented = augment(&resume(), &SkillList::default()).unwrap();
        let styles = read_part(&augmented.bytes, STYLES_PART);
        assert!(styles.contains(r#"w:styleId="Heading1""#));
    }

    #[test]
    fn test_input_is_not_mutated_and_calls_are_independent() {
        let original = resume();
        let before = original.bytes.clone();
        let skills = SkillList::parse("Python");

        let first = augment(&original, &skills).unwrap();
        let second = augment(&original, &skills).unwrap();

        assert_eq!(original.bytes, before);
        assert_eq!(
            extract_paragraphs(&first.bytes).unwrap(),
            extract_paragraphs(&second.bytes).unwrap()
        );
    }

    #[test]
    fn test_non_docx_is_unsupported() {
        let pdf = Document::new(b"%PDF-1.5".to_vec(), DocumentFormat::Pdf);
        let err = augment(&pdf, &SkillList::parse("Go")).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat { .. }));

        let text = Document::new(b"resume".to_vec(), DocumentFormat::PlainText);
        assert!(matches!(
            augment(&text, &SkillList::default()).unwrap_err(),
            AnalysisError::UnsupportedFormat { .. }
        ));
    }

    #[test]
    fn test_corrupt_package_is_malformed() {
        let doc = Document::new(b"PK broken".to_vec(), DocumentFormat::Docx);
        assert!(matches!(
            augment(&doc, &SkillList::default()).unwrap_err(),
            AnalysisError::MalformedDocument { .. }
        ));
    }

    #[test]
    fn test_untouched_parts_are_copied_byte_for_byte() {
        let original = resume();
        let skills: SkillList = ["Go"].into_iter().collect();
        let augmented = augment(&original, &skills).unwrap();

        for part in ["[Content_Types].xml", "word/_rels/document.xml.rels"] {
            assert_eq!(read_part(&augmented.bytes, part), read_part(&original.bytes, part));
        }
    }

    #[test]
    fn test_original_paragraph_xml_is_preserved() {
        let original = resume();
        let skills: SkillList = ["Go"].into_iter().collect();
        let augmented = augment(&original, &skills).unwrap();

        let before = read_part(&original.bytes, DOCUMENT_PART);
        let after = read_part(&augmented.bytes, DOCUMENT_PART);
        let last_paragraph_end = before.rfind("</w:p>").unwrap() + "</w:p>".len();
        let tail = before
            .rfind("<w:sectPr")
            .or_else(|| before.rfind("</w:body>"))
            .unwrap();

        assert!(after.starts_with(&before[..last_paragraph_end]));
        assert!(after.ends_with(&before[tail..]));
        assert!(after.len() > before.len());
    }

    /// Rewrites the uncompressed size recorded for `part` in both its local
    /// header and its central directory entry.
    fn forge_declared_size(zip: &mut [u8], part: &str, size: u32) {
        let name = part.as_bytes();
        // (signature, offset of file name, offset of uncompressed size)
        let headers: [(&[u8], usize, usize); 2] =
            [(b"PK\x03\x04", 30, 22), (b"PK\x01\x02", 46, 24)];
        for (signature, name_at, size_at) in headers {
            let mut from = 0;
            while let Some(found) = zip[from..].windows(4).position(|w| w == signature) {
                let start = from + found;
                if zip[start + name_at..].starts_with(name) {
                    zip[start + size_at..start + size_at + 4].copy_from_slice(&size.to_le_bytes());
                }
                from = start + 4;
            }
        }
    }

    #[test]
    fn test_forged_part_size_is_rejected_without_allocating() {
        let mut bytes = docx_with_paragraphs(&["Jane Doe"]);
        forge_declared_size(&mut bytes, DOCUMENT_PART, 0xFFFF_FF00);
        let doc = Document::new(bytes, DocumentFormat::Docx);

        assert!(matches!(
            augment(&doc, &SkillList::parse("Go")).unwrap_err(),
            AnalysisError::MalformedDocument { format: "docx", .. }
        ));
    }

    #[test]
    fn test_package_without_document_part_is_malformed() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<Types/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let doc = Document::new(bytes, DocumentFormat::Docx);
        assert!(matches!(
            augment(&doc, &SkillList::default()).unwrap_err(),
            AnalysisError::MalformedDocument { .. }
        ));
    }
}
