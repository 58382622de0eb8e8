use axum::{extract::State, response::Html};

use crate::{app::AppState, error::PageError, template, template::RenderError};

/// Handle page requests.
///
/// The template is read from disk on every request, so it can be edited while the server runs.
pub async fn handler(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let source = tokio::fs::read_to_string(state.template_path.as_path())
        .await
        .map_err(RenderError::Load)?;
    let display = state.cache.read_display().await;
    let page = template::render(&source, &display)?;
    Ok(Html(page))
}
