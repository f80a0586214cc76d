//! Lexical Matcher: keyword overlap between a resume and a job description.
//!
//! Both texts are reduced to keyword sets by the shared `Lexicon`; the ratio is
//! measured against the job description's set.

use tracing::debug;

use crate::analysis::lexicon::Lexicon;
use crate::errors::AnalysisError;
use crate::models::report::{KeywordSet, MatchResult};

/// Intersects resume and job keywords.
///
/// Fails with `DivisionByEmptySet` when the job description has no keywords
/// left after normalization; that is reported, never shown as 0%.
pub fn match_keywords(
    lexicon: &Lexicon,
    resume_text: &str,
    job_text: &str,
) -> Result<MatchResult, AnalysisError> {
    let resume_keywords = lexicon.keywords(resume_text);
    let job_keywords = lexicon.keywords(job_text);
    compare_keyword_sets(&resume_keywords, &job_keywords)
}

pub fn compare_keyword_sets(
    resume_keywords: &KeywordSet,
    job_keywords: &KeywordSet,
) -> Result<MatchResult, AnalysisError> {
    if job_keywords.is_empty() {
        return Err(AnalysisError::DivisionByEmptySet);
    }

    let matched_keywords: Vec<String> = resume_keywords
        .intersection(job_keywords)
        .cloned()
        .collect();
    let ratio = matched_keywords.len() as f64 / job_keywords.len() as f64;

    debug!(
        resume_keywords = resume_keywords.len(),
        job_keywords = job_keywords.len(),
        matched = matched_keywords.len(),
        ratio,
        "Keyword match computed"
    );

    Ok(MatchResult {
        matched_keywords,
        ratio,
        match_percentage: (ratio * 10_000.0).round() / 100.0,
        resume_keyword_count: resume_keywords.len(),
        job_keyword_count: job_keywords.len(),
    })
}
