//! Document Identity and Traits
//!
//! Shared vocabulary for everything stored in a collection:
//!
//! - `DocumentId` - opaque, store-assigned identifier
//! - `Document` - a persisted entity that can be written back to its collection
//! - `NewDocument` - a draft that only the store can turn into a `Document`
//! - `Linked` - a document holding an identifier list that points at another kind
//!
//! Cross-kind references are always held as `DocumentId` values and resolved
//! through the store on demand, so there is no ownership cycle between kinds.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Validation errors raised before a document is written
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field {field} exceeds {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Field {field} contains forbidden character {character:?}")]
    ForbiddenCharacter {
        field: &'static str,
        character: char,
    },

    #[error("Invalid reference in {field}: {reason}")]
    InvalidReference { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn too_long(field: &'static str, max: usize, actual: usize) -> Self {
        Self::TooLong { field, max, actual }
    }

    pub fn forbidden_character(field: &'static str, character: char) -> Self {
        Self::ForbiddenCharacter { field, character }
    }

    pub fn invalid_reference(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            field,
            reason: reason.into(),
        }
    }
}

/// Store-assigned document identifier
///
/// Serialized as the hyphenated UUID string. Never constructed by callers for
/// new documents; `DocumentStore::insert` hands one out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Allocate a fresh identifier (store implementations only)
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for DocumentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// The two document kinds and their collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Post,
    Attachment,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [DocumentKind::Post, DocumentKind::Attachment];

    /// Collection (table) name backing this kind
    pub fn collection(self) -> &'static str {
        match self {
            Self::Post => "posts",
            Self::Attachment => "attachments",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => f.write_str("post"),
            Self::Attachment => f.write_str("attachment"),
        }
    }
}

/// A persisted entity
///
/// The serialized form must carry the identifier under `uuid`, which is the
/// field the store keys lookups on.
pub trait Document:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    const KIND: DocumentKind;

    fn id(&self) -> DocumentId;

    /// Store-side constraints, checked before every write
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A draft entity without an identifier
pub trait NewDocument: Serialize + Send + Sync {
    type Output: Document;

    fn validate(&self) -> Result<(), ValidationError>;

    /// Bind the identifier the store assigned on insert
    fn into_document(self, id: DocumentId) -> Self::Output;
}

/// A document that references documents of another kind by identifier
pub trait Linked: Document {
    type Target: Linked;

    /// Reference list in insertion (link) order, duplicates preserved
    fn references(&self) -> &[DocumentId];
}

pub(crate) fn check_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::too_long(field, max, actual));
    }
    Ok(())
}

pub(crate) fn check_references(
    field: &'static str,
    ids: &[DocumentId],
) -> Result<(), ValidationError> {
    if ids.iter().any(DocumentId::is_nil) {
        return Err(ValidationError::invalid_reference(
            field,
            "nil identifier is never a valid reference",
        ));
    }
    Ok(())
}
