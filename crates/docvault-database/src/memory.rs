//! In-memory version store for tests and local development.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_entity::{
    ChangeDraft, CreateComment, CreateTag, CreateVersion, DocumentChange, DocumentVersion,
    VersionComment, VersionTag,
};

use crate::store::VersionStore;

#[derive(Debug, Default)]
struct MemoryState {
    versions: Vec<DocumentVersion>,
    changes: Vec<DocumentChange>,
    comments: Vec<VersionComment>,
    tags: Vec<VersionTag>,
}

/// A [`VersionStore`] holding everything in process memory.
///
/// A single `RwLock` over the whole state gives `persist_version` the same
/// atomicity the Postgres repository gets from a transaction: validation
/// happens before any mutation, and the write lock spans the demote-old /
/// insert-new pair.
#[derive(Debug, Default)]
pub struct MemoryVersionStore {
    state: RwLock<MemoryState>,
}

impl MemoryVersionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VersionStore for MemoryVersionStore {
    async fn latest_version_number(&self, document_id: Uuid) -> AppResult<i32> {
        let state = self.state.read().await;
        Ok(state
            .versions
            .iter()
            .filter(|v| v.document_id == document_id)
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0))
    }

    async fn find_version(
        &self,
        document_id: Uuid,
        version_number: i32,
    ) -> AppResult<Option<DocumentVersion>> {
        let state = self.state.read().await;
        Ok(state
            .versions
            .iter()
            .find(|v| v.document_id == document_id && v.version_number == version_number)
            .cloned())
    }

    async fn find_version_by_id(&self, version_id: Uuid) -> AppResult<Option<DocumentVersion>> {
        let state = self.state.read().await;
        Ok(state.versions.iter().find(|v| v.id == version_id).cloned())
    }

    async fn find_current(&self, document_id: Uuid) -> AppResult<Option<DocumentVersion>> {
        let state = self.state.read().await;
        Ok(state
            .versions
            .iter()
            .find(|v| v.document_id == document_id && v.is_current)
            .cloned())
    }

    async fn list_versions(
        &self,
        document_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DocumentVersion>> {
        let state = self.state.read().await;
        let mut versions: Vec<DocumentVersion> = state
            .versions
            .iter()
            .filter(|v| v.document_id == document_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));

        let total = versions.len() as u64;
        let items: Vec<DocumentVersion> = versions
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn persist_version(
        &self,
        version: &CreateVersion,
        changes: &[ChangeDraft],
    ) -> AppResult<DocumentVersion> {
        let mut state = self.state.write().await;

        let collision = state.versions.iter().any(|v| {
            v.document_id == version.document_id && v.version_number == version.version_number
        });
        if collision {
            return Err(AppError::conflict("Concurrent version creation detected"));
        }

        let prior_id = state
            .versions
            .iter()
            .find(|v| v.document_id == version.document_id && v.is_current)
            .map(|v| v.id);

        let from_version_id = if changes.is_empty() {
            None
        } else {
            Some(prior_id.ok_or_else(|| {
                AppError::internal("Change records supplied without a prior current version")
            })?)
        };

        for v in state
            .versions
            .iter_mut()
            .filter(|v| v.document_id == version.document_id)
        {
            v.is_current = false;
        }

        let created = DocumentVersion {
            id: Uuid::new_v4(),
            document_id: version.document_id,
            version_number: version.version_number,
            path: version.path.clone(),
            content: version.content.clone(),
            content_hash: version.content_hash.clone(),
            file_size: version.file_size,
            mime_type: version.mime_type.clone(),
            upload_type: version.upload_type,
            uploaded_by: version.uploaded_by.clone(),
            upload_reason: version.upload_reason.clone(),
            is_current: true,
            created_at: Utc::now(),
        };
        state.versions.push(created.clone());

        if let Some(from_id) = from_version_id {
            for draft in changes {
                state
                    .changes
                    .push(DocumentChange::from_draft(from_id, created.id, draft.clone()));
            }
        }

        Ok(created)
    }

    async fn find_changes(
        &self,
        from_version_id: Uuid,
        to_version_id: Uuid,
    ) -> AppResult<Vec<DocumentChange>> {
        let state = self.state.read().await;
        let mut changes: Vec<DocumentChange> = state
            .changes
            .iter()
            .filter(|c| c.from_version_id == from_version_id && c.to_version_id == to_version_id)
            .cloned()
            .collect();
        changes.sort_by_key(|c| c.line_start);
        Ok(changes)
    }

    async fn add_comment(&self, comment: &CreateComment) -> AppResult<VersionComment> {
        let mut state = self.state.write().await;
        let created = VersionComment {
            id: Uuid::new_v4(),
            version_id: comment.version_id,
            change_id: comment.change_id,
            commenter: comment.commenter.clone(),
            comment_type: comment.comment_type.clone(),
            comment_text: comment.comment_text.clone(),
            created_at: Utc::now(),
        };
        state.comments.push(created.clone());
        Ok(created)
    }

    async fn list_comments(&self, version_id: Uuid) -> AppResult<Vec<VersionComment>> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.version_id == version_id)
            .cloned()
            .collect())
    }

    async fn add_tag(&self, tag: &CreateTag) -> AppResult<VersionTag> {
        let mut state = self.state.write().await;
        let created = VersionTag {
            id: Uuid::new_v4(),
            version_id: tag.version_id,
            tag_name: tag.tag_name.clone(),
            tag_value: tag.tag_value.clone(),
            tag_type: tag.tag_type.clone(),
            created_by: tag.created_by.clone(),
            created_at: Utc::now(),
        };
        state.tags.push(created.clone());
        Ok(created)
    }

    async fn list_tags(&self, version_id: Uuid) -> AppResult<Vec<VersionTag>> {
        let state = self.state.read().await;
        Ok(state
            .tags
            .iter()
            .filter(|t| t.version_id == version_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::error::ErrorKind;
    use docvault_entity::UploadType;

    fn create(document_id: Uuid, version_number: i32, content: &str) -> CreateVersion {
        CreateVersion {
            document_id,
            version_number,
            path: "policy.txt".to_string(),
            content: content.to_string(),
            content_hash: format!("hash-{content}"),
            file_size: content.len() as i64,
            mime_type: "text/plain".to_string(),
            upload_type: UploadType::Update,
            uploaded_by: "tester".to_string(),
            upload_reason: None,
        }
    }

    #[tokio::test]
    async fn test_persist_flips_current_flag() {
        let store = MemoryVersionStore::new();
        let doc = Uuid::new_v4();

        let v1 = store.persist_version(&create(doc, 1, "one"), &[]).await.unwrap();
        assert!(v1.is_current);

        let v2 = store.persist_version(&create(doc, 2, "two"), &[]).await.unwrap();
        assert!(v2.is_current);

        let current = store.find_current(doc).await.unwrap().unwrap();
        assert_eq!(current.id, v2.id);

        let old = store.find_version(doc, 1).await.unwrap().unwrap();
        assert!(!old.is_current);
    }

    #[tokio::test]
    async fn test_duplicate_version_number_conflicts() {
        let store = MemoryVersionStore::new();
        let doc = Uuid::new_v4();

        store.persist_version(&create(doc, 1, "one"), &[]).await.unwrap();
        let err = store
            .persist_version(&create(doc, 1, "other"), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        // The failed insert must not have demoted the current version.
        let current = store.find_current(doc).await.unwrap().unwrap();
        assert_eq!(current.version_number, 1);
        assert!(current.is_current);
    }

    #[tokio::test]
    async fn test_latest_version_number_derives_from_max() {
        let store = MemoryVersionStore::new();
        let doc = Uuid::new_v4();
        assert_eq!(store.latest_version_number(doc).await.unwrap(), 0);

        store.persist_version(&create(doc, 1, "one"), &[]).await.unwrap();
        store.persist_version(&create(doc, 2, "two"), &[]).await.unwrap();
        assert_eq!(store.latest_version_number(doc).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_documents_are_isolated() {
        let store = MemoryVersionStore::new();
        let doc_a = Uuid::new_v4();
        let doc_b = Uuid::new_v4();

        store.persist_version(&create(doc_a, 1, "a"), &[]).await.unwrap();
        store.persist_version(&create(doc_b, 1, "b"), &[]).await.unwrap();

        let current_a = store.find_current(doc_a).await.unwrap().unwrap();
        let current_b = store.find_current(doc_b).await.unwrap().unwrap();
        assert!(current_a.is_current);
        assert!(current_b.is_current);
        assert_eq!(current_a.content, "a");
        assert_eq!(current_b.content, "b");
    }

    #[tokio::test]
    async fn test_list_versions_most_recent_first() {
        let store = MemoryVersionStore::new();
        let doc = Uuid::new_v4();
        for n in 1..=5 {
            store
                .persist_version(&create(doc, n, &format!("v{n}")), &[])
                .await
                .unwrap();
        }

        let page = store
            .list_versions(doc, &PageRequest::new(1, 3))
            .await
            .unwrap();
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 2);
        let numbers: Vec<i32> = page.items.iter().map(|v| v.version_number).collect();
        assert_eq!(numbers, vec![5, 4, 3]);
    }

    #[tokio::test]
    async fn test_drafts_without_prior_version_are_rejected() {
        let store = MemoryVersionStore::new();
        let doc = Uuid::new_v4();
        let draft = ChangeDraft {
            change_type: docvault_entity::ChangeType::Added,
            old_content: String::new(),
            new_content: "text".to_string(),
            line_start: 1,
            line_end: 0,
            confidence_score: 0.95,
            change_summary: "Added 1 words of new content".to_string(),
            impact_assessment: docvault_entity::ImpactLevel::Medium,
            compliance_impact: docvault_entity::ComplianceImpact {
                affected_frameworks: Vec::new(),
                requires_review: false,
                analyzed_at: Utc::now(),
            },
        };

        let err = store
            .persist_version(&create(doc, 1, "one"), &[draft])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        // Nothing was applied.
        assert_eq!(store.latest_version_number(doc).await.unwrap(), 0);
    }
}
