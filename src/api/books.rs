//! Book pages and form handlers
//!
//! Book forms are multipart: besides the text fields they carry a `cover`
//! part, either an image file or a JSON `{"type", "data"}` text value with a
//! base64-encoded image.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{multipart::MultipartError, Multipart};

use crate::{
    error::{AppError, AppResult},
    models::{BookForm, BookQuery},
    services::covers::{CoverUpload, UploadedFile},
    views, AppState,
};

use super::{form_error_message, redirect_on_error};

const COVER_FIELD: &str = "cover";
const NO_FILE_SELECTED: &str = "Error: No file selected";

/// Text fields and cover read from a book form
#[derive(Debug, Default)]
struct BookSubmission {
    form: BookForm,
    cover: Option<CoverUpload>,
}

fn upload_error(e: MultipartError) -> AppError {
    AppError::Upload(format!("Error: {}", e.body_text()))
}

async fn read_submission(mut multipart: Multipart) -> AppResult<BookSubmission> {
    let mut submission = BookSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name != COVER_FIELD {
            let value = field.text().await.map_err(upload_error)?;
            if !submission.form.set_field(&name, value) {
                tracing::debug!("Ignoring book form field {}", name);
            }
            continue;
        }

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(upload_error)?;
                // file input left empty
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                submission.cover = Some(CoverUpload::File(UploadedFile {
                    field_name: name,
                    file_name,
                    content_type,
                    data: data.to_vec(),
                }));
            }
            None => {
                let text = field.text().await.map_err(upload_error)?;
                if !text.trim().is_empty() {
                    submission.cover = Some(CoverUpload::Encoded(text));
                }
            }
        }
    }

    Ok(submission)
}

async fn render_new_page(state: &AppState, form: &BookForm, error_message: Option<&str>) -> Response {
    match state.services.authors.list_all().await {
        Ok(authors) => Html(views::books::new(form, &authors, error_message)).into_response(),
        Err(e) => redirect_on_error(&e, "Rendering new book form", "/books"),
    }
}

async fn render_edit_page(
    state: &AppState,
    id: &str,
    form: &BookForm,
    error_message: Option<&str>,
) -> Response {
    match state.services.authors.list_all().await {
        Ok(authors) => Html(views::books::edit(id, form, &authors, error_message)).into_response(),
        Err(e) => redirect_on_error(&e, "Rendering edit book form", "/"),
    }
}

/// List books, optionally filtered by title and publication date
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Books index", body = String, content_type = "text/html"),
        (status = 303, description = "Search failed, redirect home")
    )
)]
pub async fn list_books(State(state): State<AppState>, Query(query): Query<BookQuery>) -> Response {
    match state.services.books.search(&query).await {
        Ok(books) => Html(views::books::index(
            &books,
            &query,
            &state.config.uploads.cover_subdir,
        ))
        .into_response(),
        Err(e) => redirect_on_error(&e, "Searching books", "/"),
    }
}

/// Empty book form
#[utoipa::path(
    get,
    path = "/books/new",
    tag = "books",
    responses(
        (status = 200, description = "New book form", body = String, content_type = "text/html"),
        (status = 303, description = "Authors could not be loaded, redirect to the books index")
    )
)]
pub async fn new_book(State(state): State<AppState>) -> Response {
    render_new_page(&state, &BookForm::default(), None).await
}

/// Create a book from a multipart form with a cover
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    responses(
        (status = 303, description = "Book created, redirect to the books index"),
        (status = 200, description = "Form re-rendered with an error", body = String, content_type = "text/html")
    )
)]
pub async fn create_book(State(state): State<AppState>, multipart: Multipart) -> Response {
    let submission = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!("Reading book form failed: {}", e);
            return render_new_page(&state, &BookForm::default(), Some(&e.to_string())).await;
        }
    };
    let form = submission.form;

    let cover = match submission.cover {
        Some(upload) => state.services.covers.accept(upload).await,
        None => Ok(None),
    };
    let cover = match cover {
        Ok(Some(cover)) => cover,
        Ok(None) => return render_new_page(&state, &form, Some(NO_FILE_SELECTED)).await,
        Err(e) => {
            tracing::warn!("Rejected book cover: {}", e);
            let message = form_error_message(&e, "Error creating book");
            return render_new_page(&state, &form, Some(&message)).await;
        }
    };

    match state.services.books.create(&form, cover).await {
        Ok(_) => Redirect::to("/books").into_response(),
        Err(e) => {
            tracing::warn!("Creating book failed: {}", e);
            render_new_page(&state, &form, Some("Error creating book")).await
        }
    }
}

/// Book page
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book page", body = String, content_type = "text/html"),
        (status = 303, description = "Unknown book, redirect home")
    )
)]
pub async fn show_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.services.books.get_with_author(&id).await {
        Ok((book, author)) => Html(views::books::show(
            &book,
            &author,
            &state.config.uploads.cover_subdir,
            None,
        ))
        .into_response(),
        Err(e) => redirect_on_error(&e, "Showing book", "/"),
    }
}

/// Edit form for a book
#[utoipa::path(
    get,
    path = "/books/{id}/edit",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Edit book form", body = String, content_type = "text/html"),
        (status = 303, description = "Unknown book, redirect home")
    )
)]
pub async fn edit_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.services.books.get(&id).await {
        Ok(book) => render_edit_page(&state, &id, &BookForm::from(&book), None).await,
        Err(e) => redirect_on_error(&e, "Editing book", "/"),
    }
}

/// Update a book; the cover is replaced only when a new one is sent
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 303, description = "Book updated, redirect to its page"),
        (status = 200, description = "Form re-rendered with an error", body = String, content_type = "text/html")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    let existing = match state.services.books.get(&id).await {
        Ok(book) => book,
        Err(e) => return redirect_on_error(&e, "Updating book", "/"),
    };

    let submission = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!("Reading book form failed: {}", e);
            let form = BookForm::from(&existing);
            return render_edit_page(&state, &id, &form, Some(&e.to_string())).await;
        }
    };
    let form = submission.form;

    let cover = match submission.cover {
        Some(upload) => match state.services.covers.accept(upload).await {
            Ok(cover) => cover,
            Err(e) => {
                tracing::warn!("Rejected book cover: {}", e);
                let message = form_error_message(&e, "Error updating book");
                return render_edit_page(&state, &id, &form, Some(&message)).await;
            }
        },
        None => None,
    };

    match state.services.books.update(&existing, &form, cover).await {
        Ok(book) => Redirect::to(&format!("/books/{}", book.id)).into_response(),
        Err(e) if e.is_not_found() => redirect_on_error(&e, "Updating book", "/"),
        Err(e) => {
            tracing::warn!("Updating book {} failed: {}", id, e);
            render_edit_page(&state, &id, &form, Some("Error updating book")).await
        }
    }
}

/// Delete a book and its stored cover
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 303, description = "Book deleted, redirect to the books index"),
        (status = 200, description = "Book page re-rendered with an error", body = String, content_type = "text/html")
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let book = match state.services.books.get(&id).await {
        Ok(book) => book,
        Err(e) => return redirect_on_error(&e, "Deleting book", "/"),
    };

    let error = match state.services.books.delete(&book).await {
        Ok(()) => return Redirect::to("/books").into_response(),
        Err(e) if e.is_not_found() => return redirect_on_error(&e, "Deleting book", "/"),
        Err(e) => e,
    };

    tracing::warn!("Deleting book {} failed: {}", id, error);
    match state.services.books.get_with_author(&id).await {
        Ok((book, author)) => Html(views::books::show(
            &book,
            &author,
            &state.config.uploads.cover_subdir,
            Some("Could not remove book"),
        ))
        .into_response(),
        Err(e) => redirect_on_error(&e, "Deleting book", "/"),
    }
}
