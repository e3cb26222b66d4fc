//! Books service

use crate::{
    error::{AppError, AppResult},
    models::{parse_id, Author, Book, BookForm, BookQuery, CoverImage, NewBook},
    repository::Repository,
};

use super::covers::CoverStore;

/// Books shown on the home page
pub const RECENT_BOOKS_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    covers: CoverStore,
}

impl BooksService {
    pub fn new(repository: Repository, covers: CoverStore) -> Self {
        Self { repository, covers }
    }

    /// Search books from optional query parameters
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let filter = query.to_filter()?;
        self.repository.books.search(&filter).await
    }

    pub async fn recent(&self) -> AppResult<Vec<Book>> {
        self.repository.books.recent(RECENT_BOOKS_LIMIT).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Book> {
        self.repository.books.get_by_id(parse_id(id)?).await
    }

    pub async fn get_with_author(&self, id: &str) -> AppResult<(Book, Author)> {
        let book = self.get(id).await?;
        let author = self.repository.authors.get_by_id(book.author_id).await?;
        Ok((book, author))
    }

    /// Create a book. A cover file already written for this book is removed
    /// when the book cannot be saved.
    pub async fn create(&self, form: &BookForm, cover: CoverImage) -> AppResult<Book> {
        let result = match self.validated(form).await {
            Ok(book) => self.repository.books.create(&book, &cover).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(book) => {
                tracing::info!("Created book {} ({})", book.title, book.id);
                Ok(book)
            }
            Err(e) => {
                self.discard(Some(&cover)).await;
                Err(e)
            }
        }
    }

    /// Write a fetched book; concurrent edits are last-write-wins. A new cover
    /// replaces the previous one, whose file is then removed.
    pub async fn update(
        &self,
        existing: &Book,
        form: &BookForm,
        cover: Option<CoverImage>,
    ) -> AppResult<Book> {
        let result = match self.validated(form).await {
            Ok(book) => self.repository.books.update(existing.id, &book, cover.as_ref()).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(book) => {
                if cover.is_some() {
                    if let Some(ref old) = existing.cover_image_name {
                        self.covers.remove(old).await;
                    }
                }
                Ok(book)
            }
            Err(e) => {
                self.discard(cover.as_ref()).await;
                Err(e)
            }
        }
    }

    /// Delete a fetched book and its cover file
    pub async fn delete(&self, book: &Book) -> AppResult<()> {
        self.repository.books.delete(book.id).await?;
        if let Some(ref name) = book.cover_image_name {
            self.covers.remove(name).await;
        }
        tracing::info!("Deleted book {} ({})", book.title, book.id);
        Ok(())
    }

    async fn validated(&self, form: &BookForm) -> AppResult<NewBook> {
        let book = form.parse()?;
        match self.repository.authors.get_by_id(book.author_id).await {
            Ok(_) => Ok(book),
            Err(AppError::NotFound(_)) => Err(AppError::Validation("Unknown author".to_string())),
            Err(e) => Err(e),
        }
    }

    async fn discard(&self, cover: Option<&CoverImage>) {
        if let Some(name) = cover.and_then(CoverImage::file_name) {
            self.covers.remove(name).await;
        }
    }
}
