//! Server-rendered HTML pages
//!
//! Pages are assembled with `format!`; every value that comes from a user or
//! the database goes through [`html_escape`].

pub mod authors;
pub mod books;
pub mod home;

use axum::http::StatusCode;

use crate::models::Book;

/// Simple HTML escaping for text and attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap a page body in the shared layout
pub fn layout(title: &str, body: &str, error_message: Option<&str>) -> String {
    let error_banner = error_message
        .map(|msg| format!(r#"<div class="error-message">{}</div>"#, html_escape(msg)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Bookshelf</title>
    <style>
        * {{ box-sizing: border-box; }}
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #f4f4f8; color: #222; }}
        header {{ background: #1a1a2e; padding: 12px 24px; display: flex; gap: 20px; align-items: center; }}
        header a {{ color: #eee; text-decoration: none; }}
        header .brand {{ font-weight: 600; font-size: 1.2em; margin-right: auto; }}
        main {{ max-width: 960px; margin: 24px auto; padding: 0 16px; }}
        .error-message {{ background: #fde8e8; color: #9b1c1c; border: 1px solid #f8b4b4; padding: 10px 14px; border-radius: 6px; margin-bottom: 16px; }}
        .form-row {{ margin-bottom: 12px; display: flex; flex-direction: column; gap: 4px; }}
        .actions {{ display: flex; gap: 8px; align-items: center; }}
        .actions form {{ display: inline; }}
        .book-grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(150px, 1fr)); gap: 16px; }}
        .book-cover {{ width: 150px; height: 225px; object-fit: cover; background: #ddd; display: block; }}
        .author-row {{ display: flex; justify-content: space-between; padding: 8px 0; border-bottom: 1px solid #ddd; }}
    </style>
</head>
<body>
    <header>
        <a class="brand" href="/">Bookshelf</a>
        <a href="/authors">Authors</a>
        <a href="/authors/new">Add Author</a>
        <a href="/books">Books</a>
        <a href="/books/new">Add Book</a>
    </header>
    <main>
        {error_banner}
        {body}
    </main>
</body>
</html>"#,
        title = html_escape(title),
        error_banner = error_banner,
        body = body,
    )
}

/// Page rendered for errors that are not turned into redirects
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<h2>{status}</h2>
        <p>{message}</p>
        <p><a href="/">Back to the catalog</a></p>"#,
        status = html_escape(&status.to_string()),
        message = html_escape(message),
    );
    layout("Error", &body, None)
}

/// Button posting `_method=DELETE` to `action`
pub fn delete_button(action: &str) -> String {
    format!(
        r#"<form method="POST" action="{}">
            <input type="hidden" name="_method" value="DELETE">
            <button type="submit">Delete</button>
        </form>"#,
        html_escape(action)
    )
}

/// Grid of book covers linking to each book
pub fn book_grid(books: &[Book], cover_subdir: &str) -> String {
    if books.is_empty() {
        return "<p>No books found.</p>".to_string();
    }

    let cards = books
        .iter()
        .map(|book| {
            let cover = match book.cover_image_path(cover_subdir) {
                Some(src) => format!(
                    r#"<img class="book-cover" src="{}" alt="{}">"#,
                    html_escape(&src),
                    html_escape(&book.title)
                ),
                None => r#"<div class="book-cover"></div>"#.to_string(),
            };
            format!(
                r#"<a href="/books/{id}">{cover}<div>{title}</div></a>"#,
                id = book.id,
                cover = cover,
                title = html_escape(&book.title),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(r#"<div class="book-grid">{}</div>"#, cards)
}
