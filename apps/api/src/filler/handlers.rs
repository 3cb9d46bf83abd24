//! Axum route handlers for the fill API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::error::Category;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::filler::fill_template_bytes;
use crate::models::cv::{validate_record, CvRecord};
use crate::state::AppState;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOWNLOAD_DISPOSITION: &str = "attachment; filename=\"filled_cv.docx\"";

// ────────────────────────────────────────────────────────────────────────────
// Upload parsing
// ────────────────────────────────────────────────────────────────────────────

/// Multipart fields recognised by the fill endpoints. Unknown fields are skipped.
#[derive(Debug, Default)]
struct FillUpload {
    template: Option<Bytes>,
    cv_data_json: Option<Bytes>,
    cv_data: Option<String>,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", err.body_text()))
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<FillUpload, AppError> {
    let mut upload = FillUpload::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "template" => upload.template = Some(field.bytes().await.map_err(multipart_error)?),
            "cv_data_json" => {
                upload.cv_data_json = Some(field.bytes().await.map_err(multipart_error)?)
            }
            "cv_data" => upload.cv_data = Some(field.text().await.map_err(multipart_error)?),
            other => debug!("Ignoring unexpected multipart field '{other}'"),
        }
    }
    Ok(upload)
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("Missing multipart field '{field}'")))
}

/// Parses and validates the CV payload.
///
/// Broken JSON is a 400; well-formed JSON that does not match the schema is a 422.
pub fn parse_record(raw: &[u8]) -> Result<CvRecord, AppError> {
    let record: CvRecord = serde_json::from_slice(raw).map_err(|e| match e.classify() {
        Category::Data => AppError::UnprocessableEntity(format!("Invalid CV data: {e}")),
        Category::Io | Category::Syntax | Category::Eof => {
            AppError::Validation(format!("Invalid JSON format: {e}"))
        }
    })?;
    validate_record(&record).map_err(AppError::UnprocessableEntity)?;
    Ok(record)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /fill-cv/
///
/// Multipart upload of `template` (DOCX) and `cv_data_json` (JSON file).
/// Responds with the filled DOCX as a download.
pub async fn handle_fill_from_files(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload = read_upload(multipart).await?;
    let template = require(upload.template, "template")?;
    let record = parse_record(&require(upload.cv_data_json, "cv_data_json")?)?;
    fill_and_respond(&state, template, record).await
}

/// POST /fill-cv-from-data/
///
/// Multipart upload of `template` (DOCX) and `cv_data` (JSON string form field).
pub async fn handle_fill_from_data(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload = read_upload(multipart).await?;
    let template = require(upload.template, "template")?;
    let record = parse_record(require(upload.cv_data, "cv_data")?.as_bytes())?;
    fill_and_respond(&state, template, record).await
}

async fn fill_and_respond(
    state: &AppState,
    template: Bytes,
    record: CvRecord,
) -> Result<Response, AppError> {
    let fill_id = Uuid::new_v4();
    info!(
        "Fill {fill_id}: template {} bytes, {} projects, {} education entries",
        template.len(),
        record.projects.len(),
        record.education.len()
    );

    // DOCX unzip/rezip is CPU-bound; keep it off the async executor.
    let layout = state.layout.clone();
    let filled = tokio::task::spawn_blocking(move || {
        fill_template_bytes(&template, &record, &layout)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in fill: {e}")))??;

    info!("Fill {fill_id}: produced {} bytes", filled.len());

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME),
            (header::CONTENT_DISPOSITION, DOWNLOAD_DISPOSITION),
        ],
        filled,
    )
        .into_response())
}
