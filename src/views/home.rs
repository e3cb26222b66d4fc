//! Home page

use crate::models::Book;

use super::{book_grid, layout};

pub fn index(books: &[Book], cover_subdir: &str) -> String {
    let body = format!(
        r#"<h2>Recently Added</h2>
        {}"#,
        book_grid(books, cover_subdir)
    );
    layout("Home", &body, None)
}
