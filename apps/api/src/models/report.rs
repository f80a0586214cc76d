use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered "Missing section: ..." entries. Empty means compliant.
pub type StructureReport = Vec<String>;

/// Lowercase lemmas of a text with stop words removed.
pub type KeywordSet = BTreeSet<String>;

/// Overlap between resume and job-description keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// resume ∩ job, sorted.
    pub matched_keywords: Vec<String>,
    /// |matched| / |job keywords|, 0.0 – 1.0
    pub ratio: f64,
    /// ratio × 100, rounded to two decimals for display.
    pub match_percentage: f64,
    pub resume_keyword_count: usize,
    pub job_keyword_count: usize,
}

/// Result record of the "check" action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub extracted_text: String,
    pub structure_issues: StructureReport,
    /// Absent when no job description was supplied.
    pub keyword_match: Option<MatchResult>,
}
