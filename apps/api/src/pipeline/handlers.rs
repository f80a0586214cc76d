//! Axum route handlers for the resume check / improve actions.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::debug;

use crate::augment::skills::{SkillList, DEFAULT_SKILLS};
use crate::errors::AppError;
use crate::models::document::{AugmentedDocument, Document, DocumentFormat};
use crate::models::report::CheckReport;
use crate::pipeline;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Multipart upload
// ────────────────────────────────────────────────────────────────────────────

/// Fields of a check/improve form. Unknown fields are ignored.
#[derive(Debug, Default)]
struct Upload {
    resume: Option<Document>,
    job_description: Option<Document>,
    skills: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" | "job_description" => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|n| !n.is_empty());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))?;

                // browsers submit an empty, unnamed part for an untouched file input
                if bytes.is_empty() && file_name.is_none() {
                    continue;
                }

                let format = DocumentFormat::detect(content_type.as_deref(), file_name.as_deref());
                debug!(field = %name, format = format.as_str(), bytes = bytes.len(), "Received upload");

                let mut document = Document::new(bytes, format);
                if let Some(file_name) = file_name {
                    document = document.with_file_name(file_name);
                }
                if name == "resume" {
                    upload.resume = Some(document);
                } else {
                    upload.job_description = Some(document);
                }
            }
            "skills" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read 'skills': {e}")))?;
                upload.skills = Some(text);
            }
            _ => {}
        }
    }

    Ok(upload)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/check
///
/// Multipart: `resume` (pdf/docx, required), `job_description` (pdf/docx/txt, optional).
/// Returns extracted text, missing sections and, with a job description, the keyword match.
pub async fn handle_check(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CheckReport>, AppError> {
    let upload = read_upload(multipart).await?;
    let resume = upload
        .resume
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let job_description = upload.job_description;
    let lexicon = state.lexicon.clone();

    let report = tokio::task::spawn_blocking(move || {
        pipeline::check(&lexicon, &resume, job_description.as_ref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in resume check: {e}")))??;

    Ok(Json(report))
}

/// POST /api/v1/resume/improve
///
/// Multipart: `resume` (docx, required), `skills` (comma-separated, optional).
/// Returns the augmented document as a download.
pub async fn handle_improve(multipart: Multipart) -> Result<impl IntoResponse, AppError> {
    let upload = read_upload(multipart).await?;
    let resume = upload
        .resume
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let skills = SkillList::parse(upload.skills.as_deref().unwrap_or(DEFAULT_SKILLS));

    let augmented = tokio::task::spawn_blocking(move || pipeline::improve(&resume, &skills))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in resume improve: {e}"))
        })??;

    let headers = [
        (header::CONTENT_TYPE, AugmentedDocument::MIME.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", AugmentedDocument::FILE_NAME),
        ),
    ];
    Ok((headers, augmented.bytes))
}
