//! Book model, search filters and form handling

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Date format used by HTML date inputs and search parameters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Book record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub published_date: NaiveDate,
    pub page_count: i32,
    pub created_at: DateTime<Utc>,
    /// File name of a cover stored on disk
    pub cover_image_name: Option<String>,
    /// Cover bytes stored in the row
    #[serde(skip)]
    pub cover_image: Option<Vec<u8>>,
    /// MIME type of `cover_image`
    pub cover_image_type: Option<String>,
    pub author_id: Uuid,
}

impl Book {
    /// Source usable in an `<img src>`: a data URI for stored bytes, or the
    /// public path of a cover file.
    pub fn cover_image_path(&self, cover_subdir: &str) -> Option<String> {
        if let (Some(data), Some(mime_type)) = (&self.cover_image, &self.cover_image_type) {
            return Some(format!(
                "data:{};charset=utf-8;base64,{}",
                mime_type,
                STANDARD.encode(data)
            ));
        }
        self.cover_image_name
            .as_ref()
            .map(|name| format!("/{}/{}", cover_subdir.trim_matches('/'), name))
    }
}

/// Cover attached to a book on create or update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverImage {
    /// File written under the cover directory
    File { name: String },
    /// Decoded bytes kept in the database
    Encoded { data: Vec<u8>, mime_type: String },
}

impl CoverImage {
    pub fn file_name(&self) -> Option<&str> {
        match self {
            CoverImage::File { name } => Some(name),
            CoverImage::Encoded { .. } => None,
        }
    }
}

/// Query parameters for the books index
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive pattern matched against the title
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub title: Option<String>,
    /// Latest publication date (YYYY-MM-DD), inclusive
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub published_before: Option<String>,
    /// Earliest publication date (YYYY-MM-DD), inclusive
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub published_after: Option<String>,
}

/// Parsed search filter handed to the repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub title_pattern: Option<String>,
    pub published_before: Option<NaiveDate>,
    pub published_after: Option<NaiveDate>,
}

impl BookQuery {
    pub fn to_filter(&self) -> AppResult<BookFilter> {
        Ok(BookFilter {
            title_pattern: self.title.clone(),
            published_before: self.published_before.as_deref().map(parse_date).transpose()?,
            published_after: self.published_after.as_deref().map(parse_date).transpose()?,
        })
    }
}

/// Book form fields, as submitted. Values are kept as text so the form can be
/// re-rendered exactly as typed.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Author id
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "Publish date is required"))]
    pub published_date: String,
    #[validate(length(min = 1, message = "Page count is required"))]
    pub page_count: String,
    pub description: String,
}

/// Validated book values ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub description: Option<String>,
    pub published_date: NaiveDate,
    pub page_count: i32,
    pub author_id: Uuid,
}

impl BookForm {
    /// Assign a text field by its form name. Returns false for unknown names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        match name {
            "title" => self.title = value,
            "author" => self.author = value,
            "publishedDate" => self.published_date = value,
            "pageCount" => self.page_count = value,
            "description" => self.description = value,
            _ => return false,
        }
        true
    }

    /// Validate and convert into storable values
    pub fn parse(&self) -> AppResult<NewBook> {
        self.validate()?;

        let author_id = Uuid::parse_str(self.author.trim())
            .map_err(|_| AppError::Validation("Invalid author".to_string()))?;
        let published_date = parse_date(&self.published_date)?;
        let page_count = self
            .page_count
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| AppError::Validation("Page count must be a positive number".to_string()))?;

        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        let description = Some(self.description.trim().to_string()).filter(|d| !d.is_empty());

        Ok(NewBook {
            title,
            description,
            published_date,
            page_count,
            author_id,
        })
    }
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author_id.to_string(),
            published_date: book.published_date.format(DATE_FORMAT).to_string(),
            page_count: book.page_count.to_string(),
            description: book.description.clone().unwrap_or_default(),
        }
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("Invalid date: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        Book {
            id: Uuid::new_v4(),
            title: "The Dispossessed".into(),
            description: None,
            published_date: NaiveDate::from_ymd_opt(1974, 5, 1).unwrap(),
            page_count: 387,
            created_at: Utc::now(),
            cover_image_name: None,
            cover_image: None,
            cover_image_type: None,
            author_id: Uuid::new_v4(),
        }
    }

    fn valid_form() -> BookForm {
        BookForm {
            title: "Solaris".into(),
            author: Uuid::new_v4().to_string(),
            published_date: "1961-06-01".into(),
            page_count: "204".into(),
            description: "  ".into(),
        }
    }

    #[test]
    fn cover_path_prefers_stored_bytes() {
        let mut book = sample_book();
        assert_eq!(book.cover_image_path("uploads/bookCovers"), None);

        book.cover_image_name = Some("cover-1-.png".into());
        assert_eq!(
            book.cover_image_path("uploads/bookCovers").as_deref(),
            Some("/uploads/bookCovers/cover-1-.png")
        );

        book.cover_image = Some(vec![1, 2, 3]);
        book.cover_image_type = Some("image/png".into());
        assert_eq!(
            book.cover_image_path("uploads/bookCovers").as_deref(),
            Some("data:image/png;charset=utf-8;base64,AQID")
        );
    }

    #[test]
    fn form_parses_into_new_book() {
        let form = valid_form();
        let book = form.parse().unwrap();
        assert_eq!(book.title, "Solaris");
        assert_eq!(book.page_count, 204);
        assert_eq!(book.description, None);
        assert_eq!(book.published_date, NaiveDate::from_ymd_opt(1961, 6, 1).unwrap());
    }

    #[test]
    fn form_rejects_missing_or_malformed_values() {
        let mut form = valid_form();
        form.title.clear();
        assert!(matches!(form.parse(), Err(AppError::Validation(_))));

        let mut form = valid_form();
        form.page_count = "-3".into();
        assert!(matches!(form.parse(), Err(AppError::Validation(_))));

        let mut form = valid_form();
        form.author = "not-an-id".into();
        assert!(matches!(form.parse(), Err(AppError::Validation(_))));

        let mut form = valid_form();
        form.published_date = "01/06/1961".into();
        assert!(matches!(form.parse(), Err(AppError::Validation(_))));
    }

    #[test]
    fn form_fields_are_set_by_html_name() {
        let mut form = BookForm::default();
        assert!(form.set_field("publishedDate", "2001-01-01".into()));
        assert!(form.set_field("pageCount", "12".into()));
        assert!(!form.set_field("_method", "PUT".into()));
        assert_eq!(form.published_date, "2001-01-01");
        assert_eq!(form.page_count, "12");
    }

    #[test]
    fn query_builds_filter() {
        let query: BookQuery = serde_json::from_str(
            r#"{"title": "dune", "publishedBefore": "1990-01-01", "publishedAfter": ""}"#,
        )
        .unwrap();
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.title_pattern.as_deref(), Some("dune"));
        assert_eq!(filter.published_before, NaiveDate::from_ymd_opt(1990, 1, 1));
        assert_eq!(filter.published_after, None);

        let query = BookQuery {
            published_after: Some("yesterday".into()),
            ..Default::default()
        };
        assert!(query.to_filter().is_err());
    }

    #[test]
    fn form_round_trips_book_values() {
        let book = sample_book();
        let form = BookForm::from(&book);
        assert_eq!(form.published_date, "1974-05-01");
        assert_eq!(form.page_count, "387");
        assert_eq!(form.author, book.author_id.to_string());
    }
}
