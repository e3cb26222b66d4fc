//! Data models for Bookshelf

pub mod author;
pub mod book;

use uuid::Uuid;

use crate::error::{AppError, AppResult};

// Re-export commonly used types
pub use author::{Author, AuthorForm, AuthorQuery};
pub use book::{Book, BookFilter, BookForm, BookQuery, CoverImage, NewBook};

/// Parse a record id taken from a URL. Ids that are not UUIDs cannot name a
/// stored record, so they are reported as missing.
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("No record with id {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_is_not_found() {
        assert!(parse_id("42").unwrap_err().is_not_found());
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}
