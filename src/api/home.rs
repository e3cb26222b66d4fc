//! Home page endpoint

use axum::{extract::State, response::Html};

use crate::{views, AppState};

/// Recently added books
#[utoipa::path(
    get,
    path = "/",
    tag = "pages",
    responses(
        (status = 200, description = "Home page", body = String, content_type = "text/html")
    )
)]
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let books = state.services.books.recent().await.unwrap_or_else(|e| {
        tracing::warn!("Loading recent books failed: {}", e);
        Vec::new()
    });
    Html(views::home::index(&books, &state.config.uploads.cover_subdir))
}
