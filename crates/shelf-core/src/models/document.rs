//! Document model

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the remote store when a document is created
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// A document as the editor and the remote store see it
///
/// `id`, `created_at` and `updated_at` are owned by the store and stay `None`
/// until the document has been persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default)]
    pub title: String,
    /// URL-safe slug, either user supplied or derived from the title
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Create an unpersisted document
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Whether the store has assigned an id yet
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Copy of this document with the store-owned fields removed, as sent on create
    #[must_use]
    pub fn without_store_fields(&self) -> Self {
        Self {
            id: None,
            created_at: None,
            updated_at: None,
            ..self.clone()
        }
    }
}

/// Derive a path slug from a title
///
/// Lower-cases the title, splits on every whitespace character and joins the
/// pieces with `-`. Runs of whitespace keep their empty pieces, so `"a  b"`
/// becomes `"a--b"`.
///
/// # Examples
///
/// ```
/// use shelf_core::models::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("A  B"), "a--b");
/// ```
#[must_use]
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split(char::is_whitespace)
        .collect::<Vec<_>>()
        .join("-")
}
