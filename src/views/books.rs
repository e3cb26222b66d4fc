//! Book pages

use crate::models::{Author, Book, BookForm, BookQuery};

use super::{book_grid, delete_button, html_escape, layout};

pub fn index(books: &[Book], query: &BookQuery, cover_subdir: &str) -> String {
    let body = format!(
        r#"<h2>Search Books</h2>
        <form action="/books" method="GET">
            <div class="form-row">
                <label for="title">Title</label>
                <input type="text" id="title" name="title" value="{title}">
            </div>
            <div class="form-row">
                <label for="publishedAfter">Published After</label>
                <input type="date" id="publishedAfter" name="publishedAfter" value="{after}">
            </div>
            <div class="form-row">
                <label for="publishedBefore">Published Before</label>
                <input type="date" id="publishedBefore" name="publishedBefore" value="{before}">
            </div>
            <button type="submit">Search</button>
        </form>
        <br>
        {grid}"#,
        title = html_escape(query.title.as_deref().unwrap_or("")),
        after = html_escape(query.published_after.as_deref().unwrap_or("")),
        before = html_escape(query.published_before.as_deref().unwrap_or("")),
        grid = book_grid(books, cover_subdir),
    );
    layout("Books", &body, None)
}

fn author_options(authors: &[Author], selected: &str) -> String {
    authors
        .iter()
        .map(|author| {
            let id = author.id.to_string();
            format!(
                r#"<option value="{id}"{selected}>{name}</option>"#,
                selected = if id == selected { " selected" } else { "" },
                id = id,
                name = html_escape(&author.name),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn form_fields(form: &BookForm, authors: &[Author], cover_required: bool) -> String {
    format!(
        r#"<div class="form-row">
            <label for="title">Title</label>
            <input type="text" id="title" name="title" value="{title}" required>
        </div>
        <div class="form-row">
            <label for="author">Author</label>
            <select id="author" name="author" required>
                <option value="">Select an author</option>
                {authors}
            </select>
        </div>
        <div class="form-row">
            <label for="publishedDate">Publish Date</label>
            <input type="date" id="publishedDate" name="publishedDate" value="{published_date}" required>
        </div>
        <div class="form-row">
            <label for="pageCount">Page Count</label>
            <input type="number" id="pageCount" name="pageCount" min="1" value="{page_count}" required>
        </div>
        <div class="form-row">
            <label for="cover">Cover</label>
            <input type="file" id="cover" name="cover" accept="image/jpeg,image/png"{cover_required}>
        </div>
        <div class="form-row">
            <label for="description">Description</label>
            <textarea id="description" name="description" rows="4">{description}</textarea>
        </div>"#,
        title = html_escape(&form.title),
        authors = author_options(authors, form.author.trim()),
        published_date = html_escape(&form.published_date),
        page_count = html_escape(&form.page_count),
        cover_required = if cover_required { " required" } else { "" },
        description = html_escape(&form.description),
    )
}

pub fn new(form: &BookForm, authors: &[Author], error_message: Option<&str>) -> String {
    let body = format!(
        r#"<h2>New Book</h2>
        <form action="/books" method="POST" enctype="multipart/form-data">
            {fields}
            <div class="actions">
                <a href="/books">Cancel</a>
                <button type="submit">Create</button>
            </div>
        </form>"#,
        fields = form_fields(form, authors, true),
    );
    layout("New Book", &body, error_message)
}

/// Edit form. Multipart bodies cannot carry `_method` to the override
/// middleware, so it travels in the query string.
pub fn edit(id: &str, form: &BookForm, authors: &[Author], error_message: Option<&str>) -> String {
    let body = format!(
        r#"<h2>Edit Book</h2>
        <form action="/books/{id}?_method=PUT" method="POST" enctype="multipart/form-data">
            {fields}
            <div class="actions">
                <a href="/books/{id}">Cancel</a>
                <button type="submit">Update</button>
            </div>
        </form>"#,
        id = html_escape(id),
        fields = form_fields(form, authors, false),
    );
    layout("Edit Book", &body, error_message)
}

pub fn show(book: &Book, author: &Author, cover_subdir: &str, error_message: Option<&str>) -> String {
    let cover = book
        .cover_image_path(cover_subdir)
        .map(|src| {
            format!(
                r#"<img class="book-cover" src="{}" alt="{}">"#,
                html_escape(&src),
                html_escape(&book.title)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<h2>{title}</h2>
        {cover}
        <dl>
            <dt>Author</dt>
            <dd><a href="/authors/{author_id}">{author_name}</a></dd>
            <dt>Publish Date</dt>
            <dd>{published_date}</dd>
            <dt>Page Count</dt>
            <dd>{page_count}</dd>
            <dt>Description</dt>
            <dd>{description}</dd>
        </dl>
        <div class="actions">
            <a href="/books/{id}/edit">Edit</a>
            {delete}
            <a href="/authors/{author_id}">View Author</a>
        </div>"#,
        title = html_escape(&book.title),
        cover = cover,
        author_id = author.id,
        author_name = html_escape(&author.name),
        published_date = book.published_date.format("%B %-d, %Y"),
        page_count = book.page_count,
        description = html_escape(book.description.as_deref().unwrap_or("")),
        id = book.id,
        delete = delete_button(&format!("/books/{}", book.id)),
    );
    layout(&book.title, &body, error_message)
}
