//! Business logic services

pub mod authors;
pub mod books;
pub mod covers;

use crate::{config::UploadsConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub covers: covers::CoverStore,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, uploads: &UploadsConfig) -> Self {
        let covers = covers::CoverStore::new(uploads);
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone(), covers.clone()),
            covers,
            repository,
        }
    }
}
