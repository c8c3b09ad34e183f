//! Axum route handlers for the Assessment API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assessment::catalog::{Category, FieldDefinition};
use crate::assessment::runner::{run_assessment, AssessmentOptions, ScanReport};
use crate::errors::AppError;
use crate::models::context::{JobContext, ResumeContext, ResumeDocument};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub job: JobContext,
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct FieldsQuery {
    pub category: Option<Category>,
}

#[derive(Debug, Serialize)]
pub struct FieldsResponse {
    pub fields: Vec<FieldDefinition>,
}

/// Multipart form collected field by field.
#[derive(Default)]
struct UploadForm {
    job_title: Option<String>,
    company: Option<String>,
    job_description: Option<String>,
    resume: Option<UploadedFile>,
}

struct UploadedFile {
    content_type: Option<String>,
    file_name: Option<String>,
    data: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/fields
///
/// Lists the field catalog, optionally filtered with `?category=`.
pub async fn handle_list_fields(
    State(state): State<AppState>,
    Query(query): Query<FieldsQuery>,
) -> Json<FieldsResponse> {
    let fields = match query.category {
        Some(category) => state
            .catalog
            .fields_by_category(category)
            .into_iter()
            .cloned()
            .collect(),
        None => state.catalog.list_fields().to_vec(),
    };

    Json(FieldsResponse { fields })
}

/// POST /api/v1/scans
///
/// Scans plain resume text against a job posting.
pub async fn handle_create_scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanReport>, AppError> {
    validate_job(&request.job)?;
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    let resume = ResumeContext::from_text(request.resume_text);
    Ok(Json(scan(&state, &request.job, &resume).await))
}

/// POST /api/v1/scans/upload
///
/// Multipart form: `job_title`, `company` (optional), `job_description`, `resume` (PDF).
/// The PDF is both text-extracted and attached to every provider call.
pub async fn handle_upload_scan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScanReport>, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_title" => form.job_title = Some(field.text().await.map_err(multipart_error)?),
            "company" => form.company = Some(field.text().await.map_err(multipart_error)?),
            "job_description" => {
                form.job_description = Some(field.text().await.map_err(multipart_error)?)
            }
            "resume" => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                form.resume = Some(UploadedFile {
                    content_type,
                    file_name,
                    data,
                });
            }
            other => debug!("Ignoring unknown multipart field '{other}'"),
        }
    }

    let job = JobContext {
        title: form.job_title.unwrap_or_default(),
        company: form.company.filter(|c| !c.trim().is_empty()),
        description: form.job_description.unwrap_or_default(),
    };
    validate_job(&job)?;

    let file = form
        .resume
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    validate_pdf(&file, state.config.max_resume_bytes)?;

    let text = extract_pdf_text(file.data.clone()).await?;
    info!(
        "Extracted {} characters from uploaded resume {:?}",
        text.len(),
        file.file_name
    );

    let resume = ResumeContext {
        text,
        document: Some(ResumeDocument::pdf(file.data)),
    };
    Ok(Json(scan(&state, &job, &resume).await))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn scan(state: &AppState, job: &JobContext, resume: &ResumeContext) -> ScanReport {
    let options = AssessmentOptions {
        provider_timeout: state.config.provider_timeout,
    };
    run_assessment(state.provider.as_ref(), &state.catalog, job, resume, &options).await
}

fn validate_job(job: &JobContext) -> Result<(), AppError> {
    if job.title.trim().is_empty() {
        return Err(AppError::Validation("job title cannot be empty".to_string()));
    }
    if job.description.trim().is_empty() {
        return Err(AppError::Validation(
            "job description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_pdf(file: &UploadedFile, max_bytes: usize) -> Result<(), AppError> {
    if file.data.is_empty() {
        return Err(AppError::Validation("resume file is empty".to_string()));
    }
    if file.data.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "resume file exceeds the {max_bytes} byte limit"
        )));
    }

    let declared_pdf = file.content_type.as_deref() == Some("application/pdf")
        || file
            .file_name
            .as_deref()
            .is_some_and(|n| n.to_ascii_lowercase().ends_with(".pdf"));
    if !declared_pdf || !file.data.starts_with(b"%PDF") {
        return Err(AppError::Validation("resume must be a PDF file".to_string()));
    }
    Ok(())
}

/// PDF parsing is CPU-bound, so it runs off the async executor.
/// pdf-extract panics on some malformed files; that is reported like a parse error.
async fn extract_pdf_text(data: Bytes) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| {
            if e.is_panic() {
                AppError::UnprocessableEntity("Could not read resume PDF".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
            }
        })?
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read resume PDF: {e}")))
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {e}"))
}
