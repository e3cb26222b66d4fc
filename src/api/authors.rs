//! Author pages and form handlers

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::{
    models::{AuthorForm, AuthorQuery},
    views, AppState,
};

use super::redirect_on_error;

/// List authors, optionally searching by name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "Authors index", body = String, content_type = "text/html"),
        (status = 303, description = "Search failed, redirect home")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<AuthorQuery>,
) -> Response {
    match state.services.authors.list(&query).await {
        Ok(authors) => Html(views::authors::index(&authors, &query)).into_response(),
        Err(e) => redirect_on_error(&e, "Listing authors", "/"),
    }
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/authors/new",
    tag = "authors",
    responses(
        (status = 200, description = "New author form", body = String, content_type = "text/html")
    )
)]
pub async fn new_author() -> Html<String> {
    Html(views::authors::new(&AuthorForm::default(), None))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Author created, redirect to its page"),
        (status = 200, description = "Form re-rendered with an error", body = String, content_type = "text/html")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> Response {
    match state.services.authors.create(&form).await {
        Ok(author) => Redirect::to(&format!("/authors/{}", author.id)).into_response(),
        Err(e) => {
            tracing::warn!("Creating author failed: {}", e);
            Html(views::authors::new(&form, Some("Error creating author"))).into_response()
        }
    }
}

/// Author page with some of their books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author id")),
    responses(
        (status = 200, description = "Author page", body = String, content_type = "text/html"),
        (status = 303, description = "Unknown author, redirect home")
    )
)]
pub async fn show_author(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.services.authors.get_with_books(&id).await {
        Ok((author, books)) => Html(views::authors::show(
            &author,
            &books,
            &state.config.uploads.cover_subdir,
        ))
        .into_response(),
        Err(e) => redirect_on_error(&e, "Showing author", "/"),
    }
}

/// Edit form for an author
#[utoipa::path(
    get,
    path = "/authors/{id}/edit",
    tag = "authors",
    params(("id" = String, Path, description = "Author id")),
    responses(
        (status = 200, description = "Edit author form", body = String, content_type = "text/html"),
        (status = 303, description = "Unknown author, redirect to the authors index")
    )
)]
pub async fn edit_author(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.services.authors.get(&id).await {
        Ok(author) => {
            Html(views::authors::edit(&id, &AuthorForm::from(&author), None)).into_response()
        }
        Err(e) => redirect_on_error(&e, "Editing author", "/authors"),
    }
}

/// Update an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author id")),
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Author updated, redirect to its page"),
        (status = 200, description = "Form re-rendered with an error", body = String, content_type = "text/html")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<AuthorForm>,
) -> Response {
    let author = match state.services.authors.get(&id).await {
        Ok(author) => author,
        Err(e) => return redirect_on_error(&e, "Updating author", "/"),
    };

    match state.services.authors.update(&author, &form).await {
        Ok(author) => Redirect::to(&format!("/authors/{}", author.id)).into_response(),
        Err(e) if e.is_not_found() => redirect_on_error(&e, "Updating author", "/"),
        Err(e) => {
            tracing::warn!("Updating author {} failed: {}", id, e);
            Html(views::authors::edit(&id, &form, Some("Error updating author"))).into_response()
        }
    }
}

/// Delete an author who has no books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author id")),
    responses(
        (status = 303, description = "Redirect to the authors index, or back to the author when it cannot be removed")
    )
)]
pub async fn delete_author(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let author = match state.services.authors.get(&id).await {
        Ok(author) => author,
        Err(e) => return redirect_on_error(&e, "Deleting author", "/"),
    };

    match state.services.authors.delete(&author).await {
        Ok(()) => Redirect::to("/authors").into_response(),
        Err(e) if e.is_not_found() => redirect_on_error(&e, "Deleting author", "/"),
        Err(e) => redirect_on_error(&e, "Deleting author", &format!("/authors/{}", id)),
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use uuid::Uuid;

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn new_form_needs_no_database() {
        let response = send(Request::get("/authors/new").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("New Author"));
    }

    #[tokio::test]
    async fn failed_search_redirects_home() {
        let response = send(Request::get("/authors?name=le").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/"));
    }

    #[tokio::test]
    async fn malformed_id_redirects_home() {
        let response = send(Request::get("/authors/42").body(Body::empty()).unwrap()).await;
        assert_eq!(location(&response), Some("/"));

        let response = send(Request::get("/authors/42/edit").body(Body::empty()).unwrap()).await;
        assert_eq!(location(&response), Some("/authors"));
    }

    #[tokio::test]
    async fn blank_name_rerenders_form() {
        let response = send(form_post("/authors", "name=+")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Error creating author"));
    }

    #[tokio::test]
    async fn overridden_update_of_unknown_id_redirects_home() {
        let response = send(form_post("/authors/nope", "_method=PUT&name=X")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/"));
    }

    #[tokio::test]
    async fn unreadable_author_sends_update_and_delete_home() {
        let uri = format!("/authors/{}", Uuid::new_v4());

        let response = send(form_post(&uri, "_method=PUT&name=X")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/"));

        let response = send(form_post(&uri, "_method=DELETE")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/"));
    }
}
