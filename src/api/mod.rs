//! HTTP handlers and routing for the catalog pages

pub mod authors;
pub mod books;
pub mod health;
pub mod home;
pub mod method_override;
pub mod openapi;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::{error::AppError, AppState};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let public_dir = state.config.uploads.public_dir.clone();
    let max_body_bytes = state.config.uploads.max_body_bytes;

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Home
        .route("/", get(home::index))
        // Authors
        .route("/authors", get(authors::list_authors).post(authors::create_author))
        .route("/authors/new", get(authors::new_author))
        .route(
            "/authors/:id",
            get(authors::show_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        .route("/authors/:id/edit", get(authors::edit_author))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/new", get(books::new_book))
        .route(
            "/books/:id",
            get(books::show_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:id/edit", get(books::edit_book))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
        // OpenAPI documentation
        .merge(openapi::create_openapi_router())
        // Stored covers and other static files
        .fallback_service(ServeDir::new(public_dir));

    method_override::wrap(routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Log a failure the UI answers with a redirect, then redirect
fn redirect_on_error(error: &AppError, context: &str, to: &str) -> Response {
    tracing::warn!("{} failed: {}", context, error);
    Redirect::to(to).into_response()
}

/// Message shown on a re-rendered form: upload problems are reported as-is,
/// anything else gets the page's generic message.
fn form_error_message(error: &AppError, generic: &str) -> String {
    match error {
        AppError::Upload(msg) => msg.clone(),
        _ => generic.to_string(),
    }
}
