use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

use crate::{app::AppState, error::PageError};

/// Handle data requests.
///
/// Returns the cached schedule as JSON, empty strings before the first successful update.
pub async fn handler(State(state): State<AppState>) -> Result<Response, PageError> {
    let api = state.cache.read_api().await;
    let body = serde_json::to_vec(&api)?;
    let response = ([(CONTENT_TYPE, "application/json")], body).into_response();
    Ok(response)
}
