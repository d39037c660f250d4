//! PostgreSQL-backed version store.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_entity::{
    ChangeDraft, CreateComment, CreateTag, CreateVersion, DocumentChange, DocumentVersion,
    VersionComment, VersionTag,
};

use crate::store::VersionStore;

/// Repository for document versions, change records, and annotations.
#[derive(Debug, Clone)]
pub struct VersionRepository {
    pool: PgPool,
}

impl VersionRepository {
    /// Create a new version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map an insert failure, turning a uniqueness violation on
/// `(document_id, version_number)` into a loud conflict.
fn map_insert_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AppError::with_source(
                ErrorKind::Conflict,
                "Concurrent version creation detected",
                e,
            );
        }
    }
    AppError::with_source(ErrorKind::Database, "Failed to insert version", e)
}

#[async_trait]
impl VersionStore for VersionRepository {
    async fn latest_version_number(&self, document_id: Uuid) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(version_number), 0) FROM document_versions WHERE document_id = $1",
        )
        .bind(document_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read latest version number", e)
        })
    }

    async fn find_version(
        &self,
        document_id: Uuid,
        version_number: i32,
    ) -> AppResult<Option<DocumentVersion>> {
        sqlx::query_as::<_, DocumentVersion>(
            "SELECT * FROM document_versions WHERE document_id = $1 AND version_number = $2",
        )
        .bind(document_id)
        .bind(version_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    async fn find_version_by_id(&self, version_id: Uuid) -> AppResult<Option<DocumentVersion>> {
        sqlx::query_as::<_, DocumentVersion>("SELECT * FROM document_versions WHERE id = $1")
            .bind(version_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find version by id", e)
            })
    }

    async fn find_current(&self, document_id: Uuid) -> AppResult<Option<DocumentVersion>> {
        sqlx::query_as::<_, DocumentVersion>(
            "SELECT * FROM document_versions WHERE document_id = $1 AND is_current = TRUE",
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find current version", e)
        })
    }

    async fn list_versions(
        &self,
        document_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DocumentVersion>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM document_versions WHERE document_id = $1")
                .bind(document_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count versions", e)
                })?;

        let versions = sqlx::query_as::<_, DocumentVersion>(
            "SELECT * FROM document_versions WHERE document_id = $1 \
             ORDER BY version_number DESC LIMIT $2 OFFSET $3",
        )
        .bind(document_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))?;

        Ok(PageResponse::new(
            versions,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn persist_version(
        &self,
        version: &CreateVersion,
        changes: &[ChangeDraft],
    ) -> AppResult<DocumentVersion> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Demote first: the partial unique index on is_current would
        // otherwise reject the insert below.
        let prior_id: Option<Uuid> = sqlx::query_scalar(
            "UPDATE document_versions SET is_current = FALSE \
             WHERE document_id = $1 AND is_current = TRUE RETURNING id",
        )
        .bind(version.document_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to demote current version", e)
        })?;

        let created = sqlx::query_as::<_, DocumentVersion>(
            "INSERT INTO document_versions \
             (id, document_id, version_number, path, content, content_hash, file_size, \
              mime_type, upload_type, uploaded_by, upload_reason, is_current) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(version.document_id)
        .bind(version.version_number)
        .bind(&version.path)
        .bind(&version.content)
        .bind(&version.content_hash)
        .bind(version.file_size)
        .bind(&version.mime_type)
        .bind(version.upload_type)
        .bind(&version.uploaded_by)
        .bind(&version.upload_reason)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        if !changes.is_empty() {
            let from_version_id = prior_id.ok_or_else(|| {
                AppError::internal("Change records supplied without a prior current version")
            })?;

            for draft in changes {
                sqlx::query(
                    "INSERT INTO document_changes \
                     (id, from_version_id, to_version_id, change_type, old_content, new_content, \
                      line_start, line_end, confidence_score, change_summary, impact_assessment, \
                      compliance_impact) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
                )
                .bind(Uuid::new_v4())
                .bind(from_version_id)
                .bind(created.id)
                .bind(draft.change_type)
                .bind(&draft.old_content)
                .bind(&draft.new_content)
                .bind(draft.line_start)
                .bind(draft.line_end)
                .bind(draft.confidence_score)
                .bind(&draft.change_summary)
                .bind(draft.impact_assessment)
                .bind(Json(&draft.compliance_impact))
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to insert change record", e)
                })?;
            }
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit version", e)
        })?;

        Ok(created)
    }

    async fn find_changes(
        &self,
        from_version_id: Uuid,
        to_version_id: Uuid,
    ) -> AppResult<Vec<DocumentChange>> {
        sqlx::query_as::<_, DocumentChange>(
            "SELECT * FROM document_changes \
             WHERE from_version_id = $1 AND to_version_id = $2 ORDER BY line_start ASC",
        )
        .bind(from_version_id)
        .bind(to_version_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list changes", e))
    }

    async fn add_comment(&self, comment: &CreateComment) -> AppResult<VersionComment> {
        sqlx::query_as::<_, VersionComment>(
            "INSERT INTO document_version_comments \
             (id, version_id, change_id, commenter, comment_type, comment_text) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(comment.version_id)
        .bind(comment.change_id)
        .bind(&comment.commenter)
        .bind(&comment.comment_type)
        .bind(&comment.comment_text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add comment", e))
    }

    async fn list_comments(&self, version_id: Uuid) -> AppResult<Vec<VersionComment>> {
        sqlx::query_as::<_, VersionComment>(
            "SELECT * FROM document_version_comments WHERE version_id = $1 ORDER BY created_at ASC",
        )
        .bind(version_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list comments", e))
    }

    async fn add_tag(&self, tag: &CreateTag) -> AppResult<VersionTag> {
        sqlx::query_as::<_, VersionTag>(
            "INSERT INTO document_version_tags \
             (id, version_id, tag_name, tag_value, tag_type, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(tag.version_id)
        .bind(&tag.tag_name)
        .bind(&tag.tag_value)
        .bind(&tag.tag_type)
        .bind(&tag.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add tag", e))
    }

    async fn list_tags(&self, version_id: Uuid) -> AppResult<Vec<VersionTag>> {
        sqlx::query_as::<_, VersionTag>(
            "SELECT * FROM document_version_tags WHERE version_id = $1 ORDER BY created_at ASC",
        )
        .bind(version_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tags", e))
    }
}
