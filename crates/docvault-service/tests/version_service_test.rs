//! End-to-end tests for the version orchestrator against the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use docvault_core::config::VersioningConfig;
use docvault_core::error::ErrorKind;
use docvault_core::types::pagination::PageRequest;
use docvault_database::MemoryVersionStore;
use docvault_entity::{ChangeType, ImpactLevel, UploadType};
use docvault_service::{CreateVersionRequest, VersionService};

fn service() -> VersionService {
    VersionService::new(
        Arc::new(MemoryVersionStore::new()),
        &VersioningConfig::default(),
    )
}

fn request(document_id: Uuid, content: &str, upload_type: UploadType) -> CreateVersionRequest {
    CreateVersionRequest {
        document_id,
        path: "policies/retention.md".to_string(),
        content: content.to_string(),
        uploaded_by: "alice".to_string(),
        upload_type,
        upload_reason: None,
    }
}

#[tokio::test]
async fn test_monotonic_versioning() {
    let service = service();
    let doc = Uuid::new_v4();

    for n in 1..=4 {
        let version = service
            .create_version(request(doc, &format!("body {n}"), UploadType::Update))
            .await
            .unwrap();
        assert_eq!(version.version_number, n);
        assert!(version.is_current);
    }

    let page = service
        .get_versions(doc, &PageRequest::new(1, 10))
        .await
        .unwrap();
    let numbers: Vec<i32> = page.items.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, vec![4, 3, 2, 1]);
    let current: Vec<i32> = page
        .items
        .iter()
        .filter(|v| v.is_current)
        .map(|v| v.version_number)
        .collect();
    assert_eq!(current, vec![4]);
}

#[tokio::test]
async fn test_duplicate_content_is_rejected() {
    let service = service();
    let doc = Uuid::new_v4();

    service
        .create_version(request(doc, "identical body", UploadType::Initial))
        .await
        .unwrap();

    let err = service
        .create_version(request(doc, "identical body", UploadType::Update))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateContent);

    // No new version row was created.
    let page = service
        .get_versions(doc, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
}

#[tokio::test]
async fn test_first_version_has_no_change_records() {
    let service = service();
    let doc = Uuid::new_v4();

    let v1 = service
        .create_version(request(doc, "first body", UploadType::Initial))
        .await
        .unwrap();
    assert_eq!(v1.version_number, 1);

    let changes = service.get_changes(v1.id, v1.id).await.unwrap();
    assert!(changes.is_empty());
}

#[tokio::test]
async fn test_consecutive_versions_persist_changes() {
    let service = service();
    let doc = Uuid::new_v4();

    let v1 = service
        .create_version(request(doc, "alpha\nbeta\n", UploadType::Initial))
        .await
        .unwrap();
    let v2 = service
        .create_version(request(doc, "alpha\ngamma\n", UploadType::Update))
        .await
        .unwrap();

    let changes = service.get_changes(v1.id, v2.id).await.unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].change_type, ChangeType::Modified);
    assert_eq!(changes[0].from_version_id, v1.id);
    assert_eq!(changes[0].to_version_id, v2.id);
}

#[tokio::test]
async fn test_version_metadata_is_derived() {
    let service = service();
    let doc = Uuid::new_v4();

    let version = service
        .create_version(request(doc, "hello world", UploadType::Initial))
        .await
        .unwrap();
    assert_eq!(version.mime_type, "text/markdown");
    assert_eq!(version.file_size, 11);
    assert_eq!(version.content_hash.len(), 64);
}

#[tokio::test]
async fn test_rollback_to_older_version() {
    let service = service();
    let doc = Uuid::new_v4();

    service
        .create_version(request(doc, "version one body", UploadType::Initial))
        .await
        .unwrap();
    service
        .create_version(request(doc, "version two body", UploadType::Update))
        .await
        .unwrap();
    service
        .create_version(request(doc, "version three body", UploadType::Update))
        .await
        .unwrap();

    let rolled = service
        .rollback_to_version(doc, 1, "bob", "bad edits")
        .await
        .unwrap();
    assert_eq!(rolled.version_number, 4);
    assert_eq!(rolled.upload_type, UploadType::Rollback);
    assert_eq!(rolled.content, "version one body");
    assert_eq!(
        rolled.upload_reason.as_deref(),
        Some("Rollback to version 1: bad edits")
    );
    assert!(rolled.is_current);
}

#[tokio::test]
async fn test_rollback_to_current_content_is_a_noop() {
    let service = service();
    let doc = Uuid::new_v4();

    service
        .create_version(request(doc, "old body", UploadType::Initial))
        .await
        .unwrap();
    service
        .create_version(request(doc, "new body", UploadType::Update))
        .await
        .unwrap();

    // Version 2 is current; rolling back to it changes nothing.
    let err = service
        .rollback_to_version(doc, 2, "bob", "pointless")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateContent);
}

#[tokio::test]
async fn test_rollback_to_missing_version_is_not_found() {
    let service = service();
    let doc = Uuid::new_v4();

    service
        .create_version(request(doc, "body", UploadType::Initial))
        .await
        .unwrap();

    let err = service
        .rollback_to_version(doc, 9, "bob", "missing")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_compare_adjacent_uses_persisted_records() {
    let service = service();
    let doc = Uuid::new_v4();

    let v1 = service
        .create_version(request(doc, "a\nb\nc\n", UploadType::Initial))
        .await
        .unwrap();
    let v2 = service
        .create_version(request(doc, "a\nB\nc\nd\n", UploadType::Update))
        .await
        .unwrap();

    let persisted = service.get_changes(v1.id, v2.id).await.unwrap();
    assert!(!persisted.is_empty());

    let comparison = service.compare_versions(doc, 1, 2).await.unwrap();
    let persisted_ids: Vec<Uuid> = persisted.iter().map(|c| c.id).collect();
    let compared_ids: Vec<Uuid> = comparison.changes.iter().map(|c| c.id).collect();
    assert_eq!(compared_ids, persisted_ids);
}

#[tokio::test]
async fn test_compare_non_adjacent_computes_on_demand() {
    let service = service();
    let doc = Uuid::new_v4();

    let v1 = service
        .create_version(request(doc, "one\ntwo\n", UploadType::Initial))
        .await
        .unwrap();
    service
        .create_version(request(doc, "one\ntwo\nthree\n", UploadType::Update))
        .await
        .unwrap();
    let v3 = service
        .create_version(request(doc, "one\nTWO\nthree\n", UploadType::Update))
        .await
        .unwrap();

    let comparison = service.compare_versions(doc, 1, 3).await.unwrap();
    assert!(comparison.statistics.total_changes > 0);

    // Ad hoc comparisons are not retroactively stored.
    let stored = service.get_changes(v1.id, v3.id).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_compare_statistics_are_symmetric() {
    let service = service();
    let doc = Uuid::new_v4();

    service
        .create_version(request(doc, "keep\nremove me\nkeep too\n", UploadType::Initial))
        .await
        .unwrap();
    service
        .create_version(
            request(doc, "keep\nkeep too\nbrand new line\n", UploadType::Update),
        )
        .await
        .unwrap();

    let forward = service.compare_versions(doc, 1, 2).await.unwrap();
    let backward = service.compare_versions(doc, 2, 1).await.unwrap();

    assert_eq!(
        forward.statistics.total_changes,
        backward.statistics.total_changes
    );
    assert_eq!(forward.statistics.additions, backward.statistics.deletions);
    assert_eq!(forward.statistics.deletions, backward.statistics.additions);
    assert_eq!(
        forward.statistics.modifications,
        backward.statistics.modifications
    );
}

#[tokio::test]
async fn test_compare_missing_version_is_not_found() {
    let service = service();
    let doc = Uuid::new_v4();

    service
        .create_version(request(doc, "body", UploadType::Initial))
        .await
        .unwrap();

    let err = service.compare_versions(doc, 1, 7).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_current_version_cache_sees_new_versions() {
    let service = service();
    let doc = Uuid::new_v4();

    service
        .create_version(request(doc, "first", UploadType::Initial))
        .await
        .unwrap();
    let cached = service.get_current_version(doc).await.unwrap();
    assert_eq!(cached.version_number, 1);

    service
        .create_version(request(doc, "second", UploadType::Update))
        .await
        .unwrap();
    let refreshed = service.get_current_version(doc).await.unwrap();
    assert_eq!(refreshed.version_number, 2);
}

#[tokio::test]
async fn test_get_versions_unknown_document_is_not_found() {
    let service = service();
    let err = service
        .get_versions(Uuid::new_v4(), &PageRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_comments_and_tags_round_trip() {
    let service = service();
    let doc = Uuid::new_v4();

    let version = service
        .create_version(request(doc, "annotated body", UploadType::Initial))
        .await
        .unwrap();

    service
        .add_comment(docvault_entity::CreateComment {
            version_id: version.id,
            change_id: None,
            commenter: "carol".to_string(),
            comment_type: "general".to_string(),
            comment_text: "looks good".to_string(),
        })
        .await
        .unwrap();
    service
        .add_tag(docvault_entity::CreateTag {
            version_id: version.id,
            tag_name: "release".to_string(),
            tag_value: "2026-q3".to_string(),
            tag_type: "custom".to_string(),
            created_by: "carol".to_string(),
        })
        .await
        .unwrap();

    let comments = service.list_comments(version.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment_text, "looks good");

    let tags = service.list_tags(version.id).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].tag_name, "release");

    let err = service.list_comments(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_end_to_end_compliance_scenario() {
    let service = service();
    let doc = Uuid::new_v4();

    let v1 = service
        .create_version(request(
            doc,
            "Section A: must comply.\nSection B: optional.\n",
            UploadType::Initial,
        ))
        .await
        .unwrap();
    let v2 = service
        .create_version(request(
            doc,
            "Section A: must comply.\nSection B: now mandatory.\n",
            UploadType::Update,
        ))
        .await
        .unwrap();

    assert_eq!(v2.version_number, 2);
    assert!(v2.is_current);
    let v1_reloaded = service.get_version(doc, 1).await.unwrap();
    assert!(!v1_reloaded.is_current);

    let changes = service.get_changes(v1.id, v2.id).await.unwrap();
    assert_eq!(changes.len(), 1);
    let change = &changes[0];
    assert_eq!(change.change_type, ChangeType::Modified);
    assert_eq!(change.line_start, 2);
    assert_eq!(change.impact_assessment, ImpactLevel::Critical);
    assert!(change.compliance_impact.requires_review);
}
