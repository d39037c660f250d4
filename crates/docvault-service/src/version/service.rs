//! The version orchestrator.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use docvault_analysis::ChangeAnalyzer;
use docvault_core::config::VersioningConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_database::store::VersionStore;
use docvault_entity::{
    CreateComment, CreateTag, CreateVersion, DocumentChange, DocumentVersion, UploadType,
    VersionComment, VersionTag,
};

use crate::version::compare::{ChangeStatistics, VersionComparison};
use crate::version::content;

/// Request to create a new document version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVersionRequest {
    /// The document to version.
    pub document_id: Uuid,
    /// Logical document path (drives MIME detection).
    pub path: String,
    /// Full new content.
    pub content: String,
    /// Actor submitting the content.
    pub uploaded_by: String,
    /// How this version came to exist.
    pub upload_type: UploadType,
    /// Optional free-text reason.
    pub upload_reason: Option<String>,
}

/// Coordinates the version store and the change analyzer.
///
/// Creates new versions (rejecting no-op duplicates), triggers change
/// analysis between consecutive versions, supports rollback, and answers
/// comparison queries between arbitrary version pairs.
#[derive(Clone)]
pub struct VersionService {
    store: Arc<dyn VersionStore>,
    analyzer: ChangeAnalyzer,
    /// Per-document cache of the current version, invalidated on every
    /// successful version creation.
    current_cache: Cache<Uuid, DocumentVersion>,
}

impl VersionService {
    /// Create a new version service.
    pub fn new(store: Arc<dyn VersionStore>, config: &VersioningConfig) -> Self {
        let current_cache = Cache::builder()
            .max_capacity(config.current_cache_capacity)
            .time_to_live(Duration::from_secs(config.current_cache_ttl_seconds))
            .build();

        Self {
            store,
            analyzer: ChangeAnalyzer::new(),
            current_cache,
        }
    }

    /// Create a new version of a document.
    ///
    /// Fails with a duplicate-content error when the submitted content is
    /// byte-identical to the current version. When a prior version exists,
    /// the diff against it is computed and persisted atomically with the
    /// new version row: either both are recorded or neither is.
    pub async fn create_version(&self, req: CreateVersionRequest) -> AppResult<DocumentVersion> {
        let content_hash = content::sha256_hex(&req.content);

        let current = self.store.find_current(req.document_id).await?;
        if let Some(cur) = &current {
            if cur.content_hash == content_hash {
                return Err(AppError::duplicate_content(
                    "No changes detected - content is identical to current version",
                ));
            }
        }

        let latest = self.store.latest_version_number(req.document_id).await?;
        let version_number = latest + 1;

        let drafts = match &current {
            Some(cur) => self.analyzer.analyze(&cur.content, &req.content),
            None => Vec::new(),
        };

        let create = CreateVersion {
            document_id: req.document_id,
            version_number,
            mime_type: content::detect_mime_type(&req.path).to_string(),
            file_size: req.content.len() as i64,
            path: req.path,
            content: req.content,
            content_hash,
            upload_type: req.upload_type,
            uploaded_by: req.uploaded_by,
            upload_reason: req.upload_reason,
        };

        let version = self.store.persist_version(&create, &drafts).await?;
        self.current_cache.invalidate(&version.document_id).await;

        info!(
            document_id = %version.document_id,
            version_number = version.version_number,
            changes = drafts.len(),
            "Document version created"
        );
        Ok(version)
    }

    /// Roll a document back to an older version's content.
    ///
    /// Always appends a new version mirroring the target; history is never
    /// rewritten. Duplicate detection compares only against the current
    /// version, so rolling back to the immediately-preceding version is
    /// rejected as a no-op while rollback to any older version succeeds.
    pub async fn rollback_to_version(
        &self,
        document_id: Uuid,
        target_version: i32,
        rolled_back_by: &str,
        reason: &str,
    ) -> AppResult<DocumentVersion> {
        let target = self
            .store
            .find_version(document_id, target_version)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Version {target_version} not found for document {document_id}"
                ))
            })?;

        let version = self
            .create_version(CreateVersionRequest {
                document_id,
                path: target.path,
                content: target.content,
                uploaded_by: rolled_back_by.to_string(),
                upload_type: UploadType::Rollback,
                upload_reason: Some(format!("Rollback to version {target_version}: {reason}")),
            })
            .await?;

        info!(
            document_id = %document_id,
            target_version,
            new_version = version.version_number,
            "Document rolled back"
        );
        Ok(version)
    }

    /// Compare any two versions of a document.
    ///
    /// Persisted change records between the pair are returned directly;
    /// otherwise the diff is computed on demand and not stored, keeping
    /// the persisted change history limited to the consecutive-version
    /// lineage. The diff direction follows the order the caller gave.
    pub async fn compare_versions(
        &self,
        document_id: Uuid,
        version_1: i32,
        version_2: i32,
    ) -> AppResult<VersionComparison> {
        let v1 = self.require_version(document_id, version_1).await?;
        let v2 = self.require_version(document_id, version_2).await?;

        let mut changes = self.store.find_changes(v1.id, v2.id).await?;
        if changes.is_empty() {
            changes = self
                .analyzer
                .analyze(&v1.content, &v2.content)
                .into_iter()
                .map(|draft| DocumentChange::from_draft(v1.id, v2.id, draft))
                .collect();
        }

        let statistics = ChangeStatistics::from_changes(&changes);
        Ok(VersionComparison {
            version1: v1,
            version2: v2,
            changes,
            statistics,
        })
    }

    /// Version history for a document, most recent first.
    pub async fn get_versions(
        &self,
        document_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DocumentVersion>> {
        let versions = self.store.list_versions(document_id, page).await?;
        if versions.total_items == 0 {
            return Err(AppError::not_found(format!(
                "No versions found for document {document_id}"
            )));
        }
        Ok(versions)
    }

    /// A specific version, including full content.
    pub async fn get_version(
        &self,
        document_id: Uuid,
        version_number: i32,
    ) -> AppResult<DocumentVersion> {
        self.require_version(document_id, version_number).await
    }

    /// The document's current version, served through the cache.
    pub async fn get_current_version(&self, document_id: Uuid) -> AppResult<DocumentVersion> {
        if let Some(version) = self.current_cache.get(&document_id).await {
            return Ok(version);
        }

        let version = self
            .store
            .find_current(document_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No current version for document {document_id}"))
            })?;

        self.current_cache
            .insert(document_id, version.clone())
            .await;
        Ok(version)
    }

    /// Change records between two version ids. An empty list is not an
    /// error: identical or unanalyzed pairs simply have no records.
    pub async fn get_changes(
        &self,
        from_version_id: Uuid,
        to_version_id: Uuid,
    ) -> AppResult<Vec<DocumentChange>> {
        self.store.find_changes(from_version_id, to_version_id).await
    }

    /// Attach a comment to a version.
    pub async fn add_comment(&self, comment: CreateComment) -> AppResult<VersionComment> {
        self.require_version_by_id(comment.version_id).await?;
        let created = self.store.add_comment(&comment).await?;
        info!(version_id = %created.version_id, "Version comment added");
        Ok(created)
    }

    /// Comments on a version.
    pub async fn list_comments(&self, version_id: Uuid) -> AppResult<Vec<VersionComment>> {
        self.require_version_by_id(version_id).await?;
        self.store.list_comments(version_id).await
    }

    /// Attach a tag to a version.
    pub async fn add_tag(&self, tag: CreateTag) -> AppResult<VersionTag> {
        self.require_version_by_id(tag.version_id).await?;
        let created = self.store.add_tag(&tag).await?;
        info!(version_id = %created.version_id, tag_name = %created.tag_name, "Version tag added");
        Ok(created)
    }

    /// Tags on a version.
    pub async fn list_tags(&self, version_id: Uuid) -> AppResult<Vec<VersionTag>> {
        self.require_version_by_id(version_id).await?;
        self.store.list_tags(version_id).await
    }

    async fn require_version(
        &self,
        document_id: Uuid,
        version_number: i32,
    ) -> AppResult<DocumentVersion> {
        self.store
            .find_version(document_id, version_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Version {version_number} not found for document {document_id}"
                ))
            })
    }

    async fn require_version_by_id(&self, version_id: Uuid) -> AppResult<DocumentVersion> {
        self.store
            .find_version_by_id(version_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Version {version_id} not found")))
    }
}
