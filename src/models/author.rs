//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Author record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for the authors index
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AuthorQuery {
    /// Case-insensitive pattern matched against the name
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub name: Option<String>,
}

/// Author form submission (create and update)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AuthorForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

impl AuthorForm {
    /// Trimmed copy of the submitted values
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }
}

impl From<&Author> for AuthorForm {
    fn from(author: &Author) -> Self {
        Self {
            name: author.name.clone(),
        }
    }
}
