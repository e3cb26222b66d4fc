//! Author pages

use crate::models::{Author, AuthorForm, AuthorQuery, Book};

use super::{book_grid, delete_button, html_escape, layout};

pub fn index(authors: &[Author], query: &AuthorQuery) -> String {
    let rows = if authors.is_empty() {
        "<p>No authors found.</p>".to_string()
    } else {
        authors
            .iter()
            .map(|author| {
                format!(
                    r#"<div class="author-row">
                <span>{name}</span>
                <div class="actions">
                    <a href="/authors/{id}">View</a>
                    <a href="/authors/{id}/edit">Edit</a>
                    {delete}
                </div>
            </div>"#,
                    name = html_escape(&author.name),
                    id = author.id,
                    delete = delete_button(&format!("/authors/{}", author.id)),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = format!(
        r#"<h2>Search Authors</h2>
        <form action="/authors" method="GET">
            <div class="form-row">
                <label for="name">Name</label>
                <input type="text" id="name" name="name" value="{name}">
            </div>
            <button type="submit">Search</button>
        </form>
        <br>
        {rows}"#,
        name = html_escape(query.name.as_deref().unwrap_or("")),
        rows = rows,
    );
    layout("Authors", &body, None)
}

fn form_fields(form: &AuthorForm) -> String {
    format!(
        r#"<div class="form-row">
            <label for="name">Name</label>
            <input type="text" id="name" name="name" value="{}" required>
        </div>"#,
        html_escape(&form.name)
    )
}

pub fn new(form: &AuthorForm, error_message: Option<&str>) -> String {
    let body = format!(
        r#"<h2>New Author</h2>
        <form action="/authors" method="POST">
            {fields}
            <div class="actions">
                <a href="/authors">Cancel</a>
                <button type="submit">Create</button>
            </div>
        </form>"#,
        fields = form_fields(form),
    );
    layout("New Author", &body, error_message)
}

pub fn edit(id: &str, form: &AuthorForm, error_message: Option<&str>) -> String {
    let body = format!(
        r#"<h2>Edit Author</h2>
        <form action="/authors/{id}" method="POST">
            <input type="hidden" name="_method" value="PUT">
            {fields}
            <div class="actions">
                <a href="/authors/{id}">Cancel</a>
                <button type="submit">Update</button>
            </div>
        </form>"#,
        id = html_escape(id),
        fields = form_fields(form),
    );
    layout("Edit Author", &body, error_message)
}

pub fn show(author: &Author, books: &[Book], cover_subdir: &str) -> String {
    let body = format!(
        r#"<h2>{name}</h2>
        <div class="actions">
            <a href="/authors/{id}/edit">Edit</a>
            {delete}
        </div>
        <h3>Books by Author</h3>
        {books}"#,
        name = html_escape(&author.name),
        id = author.id,
        delete = delete_button(&format!("/authors/{}", author.id)),
        books = book_grid(books, cover_subdir),
    );
    layout(&author.name, &body, None)
}
