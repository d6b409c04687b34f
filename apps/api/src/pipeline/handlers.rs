//! Axum route handlers for the prediction API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::{info, info_span};
use uuid::Uuid;

use crate::decode::decode_document;
use crate::errors::AppError;
use crate::pipeline::Prediction;
use crate::state::AppState;

/// Multipart field carrying the uploaded résumé.
const RESUME_FIELD: &str = "resume";

/// POST /predict
///
/// Accepts a multipart upload in the `resume` field, decodes it, and returns
/// sections, personal info, skills and ranked role matches.
pub async fn handle_predict(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Prediction>, AppError> {
    let (filename, bytes) = read_resume_field(multipart).await?;

    let request_id = Uuid::new_v4();
    let span = info_span!("predict", %request_id, %filename);
    let pipeline = state.pipeline.clone();

    let prediction = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        let document = decode_document(&bytes, &filename)?;
        let prediction = pipeline.run(&document)?;
        info!(
            skills = prediction.skills.all.len(),
            matches = prediction.matches.len(),
            "Resume processed"
        );
        Ok::<_, AppError>(prediction)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("prediction task failed: {e}")))??;

    Ok(Json(prediction))
}

async fn read_resume_field(mut multipart: Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(AppError::Validation("Empty filename".to_string()));
        }
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok((filename, bytes));
    }

    Err(AppError::Validation(format!("No file part '{RESUME_FIELD}'")))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", e.body_text()))
    }
}
