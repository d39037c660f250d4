//! The version store persistence seam.

use async_trait::async_trait;
use uuid::Uuid;

use docvault_core::result::AppResult;
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_entity::{
    ChangeDraft, CreateComment, CreateTag, CreateVersion, DocumentChange, DocumentVersion,
    VersionComment, VersionTag,
};

/// Durable, append-only storage of document versions and their diffs.
///
/// Implementations must uphold two invariants: version numbers are unique
/// per document (a duplicate insert fails with a conflict, never a silent
/// overwrite), and the demote-old/insert-new pair in [`persist_version`]
/// is atomic, so callers never observe zero or two current versions.
///
/// [`persist_version`]: VersionStore::persist_version
#[async_trait]
pub trait VersionStore: Send + Sync + 'static {
    /// Highest version number for a document, or 0 if none exist.
    ///
    /// Always derived from the stored maximum, never a separate counter,
    /// so numbers are not reused after data loss.
    async fn latest_version_number(&self, document_id: Uuid) -> AppResult<i32>;

    /// Exact lookup by document and version number.
    async fn find_version(
        &self,
        document_id: Uuid,
        version_number: i32,
    ) -> AppResult<Option<DocumentVersion>>;

    /// Lookup by version identifier.
    async fn find_version_by_id(&self, version_id: Uuid) -> AppResult<Option<DocumentVersion>>;

    /// The document's current version, if any.
    async fn find_current(&self, document_id: Uuid) -> AppResult<Option<DocumentVersion>>;

    /// Version history, most recent first.
    async fn list_versions(
        &self,
        document_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DocumentVersion>>;

    /// Persist a new version and its change records in one atomic unit.
    ///
    /// Demotes the previously-current version, inserts the new row with
    /// `is_current = true`, and inserts one change record per draft keyed
    /// to (previous current version, new version). Any failure rolls the
    /// whole unit back. A `(document_id, version_number)` collision from a
    /// concurrent writer surfaces as a conflict error.
    async fn persist_version(
        &self,
        version: &CreateVersion,
        changes: &[ChangeDraft],
    ) -> AppResult<DocumentVersion>;

    /// Change records between two versions, ordered by `line_start`.
    async fn find_changes(
        &self,
        from_version_id: Uuid,
        to_version_id: Uuid,
    ) -> AppResult<Vec<DocumentChange>>;

    /// Attach a comment to a version.
    async fn add_comment(&self, comment: &CreateComment) -> AppResult<VersionComment>;

    /// Comments on a version, oldest first.
    async fn list_comments(&self, version_id: Uuid) -> AppResult<Vec<VersionComment>>;

    /// Attach a tag to a version.
    async fn add_tag(&self, tag: &CreateTag) -> AppResult<VersionTag>;

    /// Tags on a version, oldest first.
    async fn list_tags(&self, version_id: Uuid) -> AppResult<Vec<VersionTag>>;
}
