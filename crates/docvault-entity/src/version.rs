//! Document version entity and auxiliary annotations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use docvault_core::error::AppError;

/// How a version came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "upload_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UploadType {
    /// First version of a document.
    Initial,
    /// Routine content update.
    Update,
    /// Deliberate revision of an existing document.
    Revision,
    /// New version created by rolling back to an older one.
    Rollback,
}

impl UploadType {
    /// Return the upload type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Update => "update",
            Self::Revision => "revision",
            Self::Rollback => "rollback",
        }
    }
}

impl fmt::Display for UploadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UploadType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(Self::Initial),
            "update" => Ok(Self::Update),
            "revision" => Ok(Self::Revision),
            "rollback" => Ok(Self::Rollback),
            other => Err(AppError::validation(format!(
                "Unknown upload type '{other}'"
            ))),
        }
    }
}

/// An immutable, numbered snapshot of a document's full content.
///
/// Versions are append-only: rows are never mutated after creation except
/// for the `is_current` flag, which flips to `false` when a newer version
/// supersedes this one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentVersion {
    /// Unique version identifier.
    pub id: Uuid,
    /// The document this version belongs to.
    pub document_id: Uuid,
    /// Sequential version number, starting at 1.
    pub version_number: i32,
    /// Logical document path (used for MIME detection).
    pub path: String,
    /// Full document content.
    pub content: String,
    /// SHA-256 hex digest of the content.
    pub content_hash: String,
    /// Content size in bytes.
    pub file_size: i64,
    /// MIME type derived from the path extension.
    pub mime_type: String,
    /// How this version was created.
    pub upload_type: UploadType,
    /// Actor who created this version.
    pub uploaded_by: String,
    /// Optional free-text reason for the upload.
    pub upload_reason: Option<String>,
    /// Whether this is the document's authoritative version.
    pub is_current: bool,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
}

/// Payload for persisting a new version.
///
/// The store assigns `id`, `is_current`, and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVersion {
    /// The document to version.
    pub document_id: Uuid,
    /// Sequential version number assigned by the orchestrator.
    pub version_number: i32,
    /// Logical document path.
    pub path: String,
    /// Full document content.
    pub content: String,
    /// SHA-256 hex digest of the content.
    pub content_hash: String,
    /// Content size in bytes.
    pub file_size: i64,
    /// MIME type derived from the path extension.
    pub mime_type: String,
    /// How this version was created.
    pub upload_type: UploadType,
    /// Actor who created this version.
    pub uploaded_by: String,
    /// Optional free-text reason for the upload.
    pub upload_reason: Option<String>,
}

/// A free-text annotation attached to a version.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VersionComment {
    /// Unique comment identifier.
    pub id: Uuid,
    /// The version this comment is attached to.
    pub version_id: Uuid,
    /// Optional change record this comment refers to.
    pub change_id: Option<Uuid>,
    /// Actor who wrote the comment.
    pub commenter: String,
    /// Comment category (e.g. "general", "approval").
    pub comment_type: String,
    /// Comment body.
    pub comment_text: String,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a version comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    /// The version to comment on.
    pub version_id: Uuid,
    /// Optional change record the comment refers to.
    pub change_id: Option<Uuid>,
    /// Actor who wrote the comment.
    pub commenter: String,
    /// Comment category.
    pub comment_type: String,
    /// Comment body.
    pub comment_text: String,
}

/// A key-value tag attached to a version.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VersionTag {
    /// Unique tag identifier.
    pub id: Uuid,
    /// The version this tag is attached to.
    pub version_id: Uuid,
    /// Tag name.
    pub tag_name: String,
    /// Tag value.
    pub tag_value: String,
    /// Tag category (e.g. "custom", "release").
    pub tag_type: String,
    /// Actor who created the tag.
    pub created_by: String,
    /// When the tag was created.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a version tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTag {
    /// The version to tag.
    pub version_id: Uuid,
    /// Tag name.
    pub tag_name: String,
    /// Tag value.
    pub tag_value: String,
    /// Tag category.
    pub tag_type: String,
    /// Actor who created the tag.
    pub created_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_type_round_trip() {
        for s in ["initial", "update", "revision", "rollback"] {
            let parsed: UploadType = s.parse().unwrap();
            assert_eq!(parsed.as_str(), s);
        }
    }

    #[test]
    fn test_upload_type_rejects_unknown() {
        assert!("archive".parse::<UploadType>().is_err());
    }
}
