//! Books repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, CoverImage, NewBook},
};

const BOOK_COLUMNS: &str = "id, title, description, published_date, page_count, created_at, \
     cover_image_name, cover_image, cover_image_type, author_id";

/// Column values for a cover: (file name, bytes, MIME type)
fn cover_columns(cover: Option<&CoverImage>) -> (Option<&str>, Option<&[u8]>, Option<&str>) {
    match cover {
        Some(CoverImage::File { name }) => (Some(name.as_str()), None, None),
        Some(CoverImage::Encoded { data, mime_type }) => {
            (None, Some(data.as_slice()), Some(mime_type.as_str()))
        }
        None => (None, None, None),
    }
}

/// WHERE clause for a search filter, with numbered placeholders in bind order
/// (title, before, after).
fn search_conditions(filter: &BookFilter) -> String {
    let mut conditions = Vec::new();
    let mut idx = 1;

    if filter.title_pattern.is_some() {
        conditions.push(format!("title ~* ${}", idx));
        idx += 1;
    }
    if filter.published_before.is_some() {
        conditions.push(format!("published_date <= ${}", idx));
        idx += 1;
    }
    if filter.published_after.is_some() {
        conditions.push(format!("published_date >= ${}", idx));
    }

    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Search books by title pattern and publication date range
    pub async fn search(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books {} ORDER BY created_at",
            BOOK_COLUMNS,
            search_conditions(filter)
        );

        let mut builder = sqlx::query_as::<_, Book>(&query);
        if let Some(ref title) = filter.title_pattern {
            builder = builder.bind(title);
        }
        if let Some(before) = filter.published_before {
            builder = builder.bind(before);
        }
        if let Some(after) = filter.published_after {
            builder = builder.bind(after);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Most recently added books
    pub async fn recent(&self, limit: i64) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books ORDER BY created_at DESC LIMIT $1",
            BOOK_COLUMNS
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Books written by an author
    pub async fn by_author(&self, author_id: Uuid, limit: i64) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books WHERE author_id = $1 ORDER BY created_at LIMIT $2",
            BOOK_COLUMNS
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(author_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn count_by_author(&self, author_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        let query = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Create a book
    pub async fn create(&self, book: &NewBook, cover: &CoverImage) -> AppResult<Book> {
        let (cover_name, cover_data, cover_type) = cover_columns(Some(cover));
        let query = format!(
            r#"
            INSERT INTO books (
                id, title, description, published_date, page_count,
                cover_image_name, cover_image, cover_image_type, author_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );

        let row = sqlx::query_as::<_, Book>(&query)
            .bind(Uuid::new_v4())
            .bind(&book.title)
            .bind(&book.description)
            .bind(book.published_date)
            .bind(book.page_count)
            .bind(cover_name)
            .bind(cover_data)
            .bind(cover_type)
            .bind(book.author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Update a book. The stored cover is replaced only when `cover` is given.
    pub async fn update(&self, id: Uuid, book: &NewBook, cover: Option<&CoverImage>) -> AppResult<Book> {
        let mut sets = vec![
            "title = $2".to_string(),
            "description = $3".to_string(),
            "published_date = $4".to_string(),
            "page_count = $5".to_string(),
            "author_id = $6".to_string(),
        ];
        if cover.is_some() {
            sets.push("cover_image_name = $7".to_string());
            sets.push("cover_image = $8".to_string());
            sets.push("cover_image_type = $9".to_string());
        }

        let query = format!(
            "UPDATE books SET {} WHERE id = $1 RETURNING {}",
            sets.join(", "),
            BOOK_COLUMNS
        );

        let mut builder = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&book.title)
            .bind(&book.description)
            .bind(book.published_date)
            .bind(book.page_count)
            .bind(book.author_id);
        if cover.is_some() {
            let (cover_name, cover_data, cover_type) = cover_columns(cover);
            builder = builder.bind(cover_name).bind(cover_data).bind(cover_type);
        }

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Delete a book
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}
