//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::lifecycle::{CallError, OperationView, RequestState, View};
use crate::resume::analysis::{AnalysisRequest, ResumeFeedback};
use crate::resume::upload::validate_upload;
use crate::state::AppState;

/// Request body cap for uploads. Above the 5MB file limit so that oversized
/// files reach `validate_upload` and get its message.
pub const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

pub type AnalysisView = OperationView<ResumeFeedback>;

fn render(id: Uuid, state: &RequestState<ResumeFeedback>) -> AnalysisView {
    OperationView {
        id,
        view: View::from_state(state),
    }
}

#[derive(Default)]
struct UploadForm {
    file: Option<(String, String, Bytes)>,
    user_id: Option<Uuid>,
    confirm: bool,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart field: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                form.file = Some((file_name, content_type, data));
            }
            "user_id" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read user_id: {e}")))?;
                let user_id = Uuid::parse_str(value.trim())
                    .map_err(|_| AppError::Validation("user_id must be a UUID".to_string()))?;
                form.user_id = Some(user_id);
            }
            "confirm" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read confirm: {e}")))?;
                form.confirm = value == "true" || value == "1";
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/v1/resume/analyses
///
/// Multipart upload (`file`, optional `user_id`, optional `confirm`). The file
/// is validated before anything is sent out; the analysis then runs in the
/// background and is polled by id.
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AnalysisView>), AppError> {
    let form = read_form(multipart).await?;
    let (file_name, content_type, data) = form
        .file
        .ok_or_else(|| AppError::Validation("Please upload a resume first".to_string()))?;

    let upload = validate_upload(&file_name, &content_type, &data, form.confirm)
        .map_err(CallError::validation)?;

    let (id, snapshot) = state
        .resume
        .create(AnalysisRequest::new(upload, form.user_id))?;
    info!(%id, %file_name, "resume analysis started");

    Ok((StatusCode::ACCEPTED, Json(render(id, &snapshot))))
}

/// GET /api/v1/resume/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisView>, AppError> {
    let snapshot = state.resume.get(id)?;
    Ok(Json(render(id, &snapshot)))
}

/// POST /api/v1/resume/analyses/:id/retry
pub async fn handle_retry_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<AnalysisView>), AppError> {
    let snapshot = state.resume.retry(id)?;
    Ok((StatusCode::ACCEPTED, Json(render(id, &snapshot))))
}

/// DELETE /api/v1/resume/analyses/:id
pub async fn handle_delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.resume.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}
