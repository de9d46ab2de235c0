use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scrivener_core::{ErrorKind, ExtractionError};
use serde::Serialize;

/// An extraction failure rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ExtractionError);

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.0.kind();

        if status.is_server_error() {
            tracing::warn!(%kind, status = status.as_u16(), error = %self.0, "extraction failed");
        } else {
            tracing::info!(%kind, status = status.as_u16(), error = %self.0, "extraction rejected");
        }

        let body = ErrorBody { error: self.0.to_string(), kind, details: self.0.details() };
        (status, Json(body)).into_response()
    }
}
