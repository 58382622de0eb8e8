use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::template::RenderError;

/// Failures while answering a request.
///
/// The client only gets a generic message, the cause goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("failed to render template: {0}")]
    Render(#[from] RenderError),
    #[error("failed to encode data to JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        let message = match self {
            PageError::Render(RenderError::Load(_)) => "Failed to load template",
            PageError::Render(_) => "Failed to render template",
            PageError::Encode(_) => "Failed to encode data to JSON",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
