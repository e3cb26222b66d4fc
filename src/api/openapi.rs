//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health, home};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf",
        version = "0.1.0",
        description = "Library catalog pages and form endpoints"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Pages
        home::index,
        // Authors
        authors::list_authors,
        authors::new_author,
        authors::create_author,
        authors::show_author,
        authors::edit_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::new_book,
        books::create_book,
        books::show_book,
        books::edit_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            crate::models::author::Author,
            crate::models::author::AuthorForm,
            crate::models::book::Book,
            crate::models::book::BookForm,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "pages", description = "Catalog home page"),
        (name = "authors", description = "Author pages and forms"),
        (name = "books", description = "Book pages and forms")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
