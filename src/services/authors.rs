//! Authors service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{parse_id, Author, AuthorForm, AuthorQuery, Book},
    repository::Repository,
};

/// Books listed on an author's page
pub const AUTHOR_BOOKS_LIMIT: i64 = 6;

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &AuthorQuery) -> AppResult<Vec<Author>> {
        self.repository.authors.list(query.name.as_deref()).await
    }

    /// Authors for book form select boxes
    pub async fn list_all(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list_all().await
    }

    pub async fn get(&self, id: &str) -> AppResult<Author> {
        self.repository.authors.get_by_id(parse_id(id)?).await
    }

    /// Author with the first few of their books
    pub async fn get_with_books(&self, id: &str) -> AppResult<(Author, Vec<Book>)> {
        let author = self.get(id).await?;
        let books = self
            .repository
            .books
            .by_author(author.id, AUTHOR_BOOKS_LIMIT)
            .await?;
        Ok((author, books))
    }

    pub async fn create(&self, form: &AuthorForm) -> AppResult<Author> {
        let form = form.normalized();
        form.validate()?;
        let author = self.repository.authors.create(&form.name).await?;
        tracing::info!("Created author {} ({})", author.name, author.id);
        Ok(author)
    }

    /// Rename a fetched author; concurrent edits are last-write-wins
    pub async fn update(&self, author: &Author, form: &AuthorForm) -> AppResult<Author> {
        let form = form.normalized();
        form.validate()?;
        self.repository.authors.update_name(author.id, &form.name).await
    }

    /// Delete a fetched author who has no books left
    pub async fn delete(&self, author: &Author) -> AppResult<()> {
        let books = self.repository.books.count_by_author(author.id).await?;
        if books > 0 {
            return Err(AppError::Conflict(format!(
                "Author {} still has {} book(s)",
                author.name, books
            )));
        }
        self.repository.authors.delete(author.id).await?;
        tracing::info!("Deleted author {} ({})", author.name, author.id);
        Ok(())
    }
}
