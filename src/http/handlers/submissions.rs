use super::super::error::{ApiError, ApiResult};
use super::super::extract::ApiMultipart;
use super::super::state::AppState;
use crate::intake::{SubmissionForm, UploadedFile};
use axum::{
    extract::{multipart::Field, Multipart, State},
    response::Json,
};
use serde_json::{json, Value};

const DEFAULT_FILE_NAME: &str = "document.pdf";

async fn read_text(field: Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid form field: {}", e)))
}

async fn read_file(field: Field<'_>) -> ApiResult<UploadedFile> {
    let file_name = field
        .file_name()
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME)
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid file upload: {}", e)))?;

    Ok(UploadedFile {
        file_name,
        bytes: bytes.to_vec(),
    })
}

async fn next_field(multipart: &mut Multipart) -> ApiResult<Option<Field<'_>>> {
    multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))
}

/// POST /submissions
/// Multipart form: `teamName`, `meetingId`, `pdf`
pub async fn create_submission(
    State(state): State<AppState>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> ApiResult<Json<Value>> {
    let mut form = SubmissionForm::default();

    while let Some(field) = next_field(&mut multipart).await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "teamName" => form.team_name = Some(read_text(field).await?),
            "meetingId" => form.meeting_id = Some(read_text(field).await?),
            "pdf" => form.file = Some(read_file(field).await?),
            _ => {}
        }
    }

    // The enrichment job runs on its own; its outcome lands on the submission
    let (submission, _job) = state.intake.submit(form).await?;

    Ok(Json(json!({
        "success": true,
        "submissionId": submission.id,
        "submissionInfo": submission.submission_info,
        "enrichment": submission.enrichment,
    })))
}

/// POST /parse
/// Multipart form with a `file` field; runs OCR and summarization inline
pub async fn parse_document(
    State(state): State<AppState>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> ApiResult<Json<Value>> {
    let mut file = None;

    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() == Some("file") {
            file = Some(read_file(field).await?);
        }
    }

    let file = file
        .filter(|f| !f.bytes.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    let summary = state.summarizer.summarize(&file.file_name, file.bytes).await?;

    Ok(Json(json!({
        "success": true,
        "title": summary.project_title(),
        "summary": summary,
    })))
}
