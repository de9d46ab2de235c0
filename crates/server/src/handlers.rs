use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use scrivener_core::{ExtractionError, ExtractionResult, PostDraft, validate_url};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{ApiError, AppState};

/// Request body shared by the extraction routes.
///
/// A missing or null `url` reads as empty and is rejected by URL validation.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Unwraps the request body, reporting unreadable JSON as an invalid URL.
fn requested_url(payload: Result<Json<ExtractRequest>, JsonRejection>) -> Result<String, ApiError> {
    match payload {
        Ok(Json(request)) => Ok(request.url.unwrap_or_default()),
        Err(rejection) => Err(ExtractionError::InvalidUrl(format!(
            "request body must be JSON with a `url` field ({})",
            rejection.body_text()
        ))
        .into()),
    }
}

/// `POST /api/extract`
pub async fn extract(
    State(state): State<AppState>, payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let url = requested_url(payload)?;
    let result = state.extractor.extract(&url).await?;
    Ok(Json(result))
}

/// `POST /api/drafts/import`
pub async fn import_draft(
    State(state): State<AppState>, payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<PostDraft>, ApiError> {
    let source = validate_url(&requested_url(payload)?)?;
    let result = state.extractor.extract(source.as_str()).await?;
    let draft = PostDraft::from_extraction(result, &source);

    tracing::info!(id = %draft.id, slug = %draft.slug, "draft imported");
    Ok(Json(draft))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
