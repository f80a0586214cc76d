//! Pipeline Orchestrator: sequences extraction, structure check, keyword
//! matching and augmentation for the two user actions.
//!
//! Both actions are synchronous call chains over owned inputs; handlers run
//! them inside `tokio::task::spawn_blocking`. An action either completes or
//! returns exactly one `AnalysisError`.

pub mod handlers;

use chrono::Utc;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::analysis::{check_structure, match_keywords, Lexicon};
use crate::augment::{self, SkillList};
use crate::errors::AnalysisError;
use crate::extraction;
use crate::models::document::{AugmentedDocument, Document, DocumentFormat, ExtractedText};
use crate::models::report::CheckReport;

/// "Check" action: extract the resume, report missing sections and, when a job
/// description is supplied, its keyword overlap with the resume.
pub fn check(
    lexicon: &Lexicon,
    resume: &Document,
    job_description: Option<&Document>,
) -> Result<CheckReport, AnalysisError> {
    let analysis_id = Uuid::new_v4();
    let span = info_span!("check", %analysis_id);
    let _guard = span.enter();

    match &resume.format {
        DocumentFormat::Pdf | DocumentFormat::Docx => {}
        other => {
            return Err(AnalysisError::UnsupportedFormat {
                format: other.as_str().to_string(),
                operation: "resume analysis",
            })
        }
    }

    let resume_text = extract_with_content(resume, "resume")?;
    let structure_issues = check_structure(&resume_text.text);

    let keyword_match = match job_description {
        Some(job) => {
            let job_text = extract_with_content(job, "job description")?;
            Some(match_keywords(lexicon, &resume_text.text, &job_text.text)?)
        }
        None => None,
    };

    info!(
        format = resume.format.as_str(),
        structure_issues = structure_issues.len(),
        match_ratio = keyword_match.as_ref().map(|m| m.ratio),
        "Resume check complete"
    );

    Ok(CheckReport {
        analysis_id,
        analyzed_at: Utc::now(),
        extracted_text: resume_text.text,
        structure_issues,
        keyword_match,
    })
}

/// "Improve" action: only defined for DOCX resumes.
pub fn improve(resume: &Document, skills: &SkillList) -> Result<AugmentedDocument, AnalysisError> {
    augment::augment(resume, skills)
}

/// Extracts text and rejects PDF/DOCX documents that produced none (scanned
/// images, empty files). Plain text passes through as is: an empty job
/// description is the matcher's to reject.
fn extract_with_content(
    document: &Document,
    role: &'static str,
) -> Result<ExtractedText, AnalysisError> {
    let extracted = extraction::extract(document)?;

    if extracted.empty_segments > 0 && !extracted.is_blank() {
        warn!(
            document = role,
            segments = extracted.segments,
            empty_segments = extracted.empty_segments,
            "Some pages or paragraphs yielded no text"
        );
    }

    let layout_format = matches!(document.format, DocumentFormat::Pdf | DocumentFormat::Docx);
    if layout_format && extracted.is_blank() {
        warn!(
            document = role,
            file_name = document.file_name.as_deref().unwrap_or("<unnamed>"),
            segments = extracted.segments,
            "No text extracted"
        );
        return Err(AnalysisError::ExtractionFailure { document: role });
    }

    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::docx::fixtures::docx_with_paragraphs;
    use crate::extraction::pdf::fixtures::pdf_with_pages;

    fn lexicon() -> Lexicon {
        Lexicon::builtin().unwrap()
    }

    fn docx(paragraphs: &[&str]) -> Document {
        Document::new(docx_with_paragraphs(paragraphs), DocumentFormat::Docx)
    }

    fn text(body: &str) -> Document {
        Document::new(body.as_bytes().to_vec(), DocumentFormat::PlainText)
    }

    #[test]
    fn test_check_without_job_description_skips_matching() {
        let resume = docx(&["Work Experience", "Education", "Skills: Python"]);
        let report = check(&lexicon(), &resume, None).unwrap();

        assert_eq!(report.extracted_text, "Work Experience\nEducation\nSkills: Python");
        assert!(report.structure_issues.is_empty());
        assert!(report.keyword_match.is_none());
    }

    #[test]
    fn test_check_reports_missing_sections_and_match() {
        let resume = docx(&["Education", "I managed projects using Python and Revit"]);
        let job = text("Seeking a project manager with Python skills");

        let report = check(&lexicon(), &resume, Some(&job)).unwrap();
        assert_eq!(
            report.structure_issues,
            vec!["Missing section: Work Experience", "Missing section: Skills"]
        );
        let matched = report.keyword_match.unwrap();
        assert!(matched.matched_keywords.contains(&"python".to_string()));
        assert!(matched.matched_keywords.contains(&"project".to_string()));
    }

    #[test]
    fn test_check_pdf_resume() {
        let resume = Document::new(
            pdf_with_pages(&[Some("Work Experience"), Some("Education Skills")]),
            DocumentFormat::Pdf,
        );
        let report = check(&lexicon(), &resume, None).unwrap();
        assert!(report.structure_issues.is_empty());
    }

    #[test]
    fn test_blank_resume_is_extraction_failure() {
        let resume = docx(&[]);
        let err = check(&lexicon(), &resume, None).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::ExtractionFailure { document: "resume" }
        ));
    }

    #[test]
    fn test_image_only_pdf_resume_is_extraction_failure() {
        let resume = Document::new(pdf_with_pages(&[None]), DocumentFormat::Pdf);
        assert!(matches!(
            check(&lexicon(), &resume, None).unwrap_err(),
            AnalysisError::ExtractionFailure { .. }
        ));
    }

    #[test]
    fn test_blank_docx_job_description_is_extraction_failure() {
        let resume = docx(&["Work Experience"]);
        let job = docx(&[]);
        assert!(matches!(
            check(&lexicon(), &resume, Some(&job)).unwrap_err(),
            AnalysisError::ExtractionFailure {
                document: "job description"
            }
        ));
    }

    #[test]
    fn test_empty_text_job_description_is_division_by_empty_set() {
        let resume = docx(&["Work Experience"]);
        let job = text("");
        assert!(matches!(
            check(&lexicon(), &resume, Some(&job)).unwrap_err(),
            AnalysisError::DivisionByEmptySet
        ));
    }

    #[test]
    fn test_plain_text_resume_is_unsupported() {
        let resume = text("Work Experience, Education, Skills");
        assert!(matches!(
            check(&lexicon(), &resume, None).unwrap_err(),
            AnalysisError::UnsupportedFormat { .. }
        ));
    }

    #[test]
    fn test_invalid_utf8_job_description_is_decoding_failure() {
        let resume = docx(&["Work Experience"]);
        let job = Document::new(vec![0xc3, 0x28], DocumentFormat::PlainText);
        assert!(matches!(
            check(&lexicon(), &resume, Some(&job)).unwrap_err(),
            AnalysisError::DecodingFailure(_)
        ));
    }

    #[test]
    fn test_improve_requires_docx() {
        let resume = Document::new(pdf_with_pages(&[Some("Skills")]), DocumentFormat::Pdf);
        assert!(matches!(
            improve(&resume, &SkillList::parse("Go")).unwrap_err(),
            AnalysisError::UnsupportedFormat { .. }
        ));
    }

    #[test]
    fn test_improve_then_check_finds_skills_section() {
        let resume = docx(&["Work Experience", "Education"]);
        let improved = improve(&resume, &SkillList::parse("Go, Rust")).unwrap();

        let improved = Document::new(improved.bytes, DocumentFormat::Docx);
        let report = check(&lexicon(), &improved, None).unwrap();
        assert!(report.structure_issues.is_empty());
        assert!(report.extracted_text.ends_with("Skills\nGo\nRust"));
    }
}
