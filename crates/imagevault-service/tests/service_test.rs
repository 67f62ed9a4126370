//! End-to-end tests for the file storage service over a temporary root.

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use imagevault_core::config::storage::StorageConfig;
use imagevault_core::error::ErrorKind;
use imagevault_core::types::pagination::PageRequest;
use imagevault_core::types::sorting::SortField;
use imagevault_entity::{FileCategory, FileStatus, VersionKind};
use imagevault_metadata::{ListQuery, MemoryMetadataRepository, MetadataRepository};
use imagevault_service::{FileService, Reconciler, StoreOptions};

fn config_for(root: &tempfile::TempDir) -> StorageConfig {
    StorageConfig {
        root_path: root.path().to_string_lossy().to_string(),
        ..StorageConfig::default()
    }
}

async fn service(root: &tempfile::TempDir) -> (FileService, Arc<MemoryMetadataRepository>) {
    let repo = Arc::new(MemoryMetadataRepository::new());
    let service = FileService::new(config_for(root), repo.clone())
        .await
        .unwrap();
    (service, repo)
}

fn png_options(name: &str) -> StoreOptions {
    StoreOptions {
        original_name: name.to_string(),
        owner_id: Some("alice".to_string()),
        category: FileCategory::Uploads,
        tags: vec!["test".to_string()],
    }
}

#[tokio::test]
async fn test_store_places_file_under_root() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    let descriptor = service
        .store(Bytes::from_static(b"payload"), "image/png", png_options("photo.png"))
        .await
        .unwrap();

    assert!(descriptor.absolute_path.starts_with(root.path()));
    assert!(descriptor.absolute_path.exists());
    assert_eq!(descriptor.size_bytes, 7);
    assert!(descriptor.relative_path.starts_with("images/uploads/"));
    assert_eq!(
        descriptor.public_reference,
        format!("/storage/{}", descriptor.relative_path)
    );
}

#[tokio::test]
async fn test_store_hash_is_deterministic() {
    let root_a = tempfile::tempdir().unwrap();
    let root_b = tempfile::tempdir().unwrap();
    let (service_a, _) = service(&root_a).await;
    let (service_b, _) = service(&root_b).await;

    let first = service_a
        .store(Bytes::from_static(b"same bytes"), "image/png", png_options("a.png"))
        .await
        .unwrap();
    let second = service_b
        .store(Bytes::from_static(b"same bytes"), "image/png", png_options("b.png"))
        .await
        .unwrap();

    assert_eq!(first.hash, second.hash);
    assert_ne!(first.storage_name, second.storage_name);
}

#[tokio::test]
async fn test_validation_failure_performs_no_writes() {
    let root = tempfile::tempdir().unwrap();
    let (service, repo) = service(&root).await;

    let oversize = StorageConfig::default().max_file_size_bytes as usize + 1;
    let err = service
        .store(
            Bytes::from(vec![0u8; oversize]),
            "image/png",
            png_options("big.png"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = service
        .store(Bytes::from_static(b"x"), "application/pdf", png_options("doc.png"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Nothing reached the filesystem or the repository.
    let entries: Vec<_> = std::fs::read_dir(root.path()).unwrap().collect();
    assert!(entries.is_empty());
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_hostile_original_name_stays_under_root() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    let descriptor = service
        .store(
            Bytes::from_static(b"attack"),
            "image/png",
            png_options("../../../evil.png"),
        )
        .await
        .unwrap();

    assert!(descriptor.absolute_path.starts_with(root.path()));
    assert!(!descriptor.storage_name.contains(".."));
    assert!(!descriptor.relative_path.contains(".."));
    assert!(descriptor.absolute_path.exists());
}

#[tokio::test]
async fn test_duplicate_content_conflicts_and_leaves_orphan() {
    let root = tempfile::tempdir().unwrap();
    let (service, repo) = service(&root).await;

    service
        .store(Bytes::from_static(b"identical"), "image/png", png_options("a.png"))
        .await
        .unwrap();
    let err = service
        .store(Bytes::from_static(b"identical"), "image/png", png_options("b.png"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // The second writer's physical file is an orphan the sweep can find.
    let reconciler = Reconciler::new(
        repo.clone(),
        service.local_store().clone(),
        service.planner().clone(),
    );
    let orphans = reconciler.scan().await.unwrap();
    assert_eq!(orphans.len(), 1);

    assert_eq!(reconciler.remove_orphans().await.unwrap(), 1);
    assert!(reconciler.scan().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_permanent_delete_round_trip() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    let descriptor = service
        .store(
            Bytes::from_static(&[0x01, 0x02, 0x03]),
            "image/png",
            png_options("tiny.png"),
        )
        .await
        .unwrap();
    assert!(descriptor.absolute_path.exists());

    service.delete(descriptor.id, true).await.unwrap();

    assert!(!descriptor.absolute_path.exists());
    let err = service.get(descriptor.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_unknown_id_is_not_found() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    let err = service.delete(Uuid::new_v4(), true).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_soft_delete_keeps_bytes_but_hides_record() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    let descriptor = service
        .store(Bytes::from_static(b"keep me"), "image/png", png_options("a.png"))
        .await
        .unwrap();

    service.delete(descriptor.id, false).await.unwrap();

    // Bytes remain; record exists but is excluded from listings and stats.
    assert!(descriptor.absolute_path.exists());
    let record = service.get(descriptor.id).await.unwrap();
    assert_eq!(record.status, FileStatus::Deleted);

    let page = service
        .list(
            &ListQuery::default(),
            &PageRequest::default(),
            &SortField::desc("created_at"),
        )
        .await
        .unwrap();
    assert_eq!(page.total_items, 0);

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.total_files, 0);
}

#[tokio::test]
async fn test_soft_delete_rejected_while_processing() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    let descriptor = service
        .store(Bytes::from_static(b"busy"), "image/png", png_options("a.png"))
        .await
        .unwrap();
    service.begin_processing(descriptor.id).await.unwrap();

    let err = service.delete(descriptor.id, false).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);

    // The record is untouched and still in flight.
    let record = service.get(descriptor.id).await.unwrap();
    assert_eq!(record.status, FileStatus::Processing);
}

#[tokio::test]
async fn test_failed_record_allows_only_permanent_delete() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    let descriptor = service
        .store(Bytes::from_static(b"doomed"), "image/png", png_options("a.png"))
        .await
        .unwrap();
    service.begin_processing(descriptor.id).await.unwrap();
    service.fail_processing(descriptor.id).await.unwrap();

    let err = service.delete(descriptor.id, false).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);

    service.delete(descriptor.id, true).await.unwrap();
    assert!(!descriptor.absolute_path.exists());
}

#[tokio::test]
async fn test_permanent_delete_unlinks_late_appended_version() {
    let root = tempfile::tempdir().unwrap();
    let (service, repo) = service(&root).await;

    let descriptor = service
        .store(Bytes::from_static(b"primary"), "image/png", png_options("a.png"))
        .await
        .unwrap();

    // A version attached through the repository directly, as a concurrent
    // pipeline worker would after the service last read the record.
    let artifact_relative = "images/thumbnails/2026/08/late_thumb.png";
    service
        .local_store()
        .write(artifact_relative, Bytes::from_static(b"thumb"))
        .await
        .unwrap();
    repo.append_version(
        descriptor.id,
        imagevault_entity::FileVersion::new(
            VersionKind::Thumbnail,
            "late_thumb.png",
            format!("/storage/{artifact_relative}"),
            5,
        ),
    )
    .await
    .unwrap();

    service.delete(descriptor.id, true).await.unwrap();

    assert!(!root.path().join(artifact_relative).exists());
    assert!(!descriptor.absolute_path.exists());
}

#[tokio::test]
async fn test_stats_example() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    for (name, size) in [("a.png", 100usize), ("b.png", 200), ("c.png", 300)] {
        // Distinct sizes guarantee distinct hashes.
        service
            .store(Bytes::from(vec![0xAB; size]), "image/png", png_options(name))
            .await
            .unwrap();
    }

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.total_size, 600);
    assert_eq!(stats.avg_size, 200);
    assert_eq!(stats.max_size, 300);
    assert_eq!(stats.min_size, 100);
    assert_eq!(stats.by_status["uploaded"].count, 3);
    assert_eq!(stats.by_category["uploads"].count, 3);
    assert_eq!(stats.by_type[".png"].count, 3);
}

#[tokio::test]
async fn test_processing_lifecycle_with_artifact() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    let descriptor = service
        .store(Bytes::from_static(b"source image"), "image/png", png_options("src.png"))
        .await
        .unwrap();

    let record = service.begin_processing(descriptor.id).await.unwrap();
    assert_eq!(record.status, FileStatus::Processing);

    let record = service
        .complete_processing(descriptor.id, VersionKind::Styled, Bytes::from_static(b"styled"))
        .await
        .unwrap();
    assert_eq!(record.status, FileStatus::Processed);
    assert_eq!(record.versions.len(), 1);
    assert_eq!(record.versions[0].kind, VersionKind::Styled);
    assert!(record.versions[0]
        .public_reference
        .contains("/images/processed/"));

    // The artifact landed on disk.
    let artifact_relative = record.versions[0]
        .public_reference
        .strip_prefix("/storage/")
        .unwrap();
    assert!(root.path().join(artifact_relative).exists());

    // Permanent delete removes the artifact along with the primary file.
    service.delete(descriptor.id, true).await.unwrap();
    assert!(!root.path().join(artifact_relative).exists());
    assert!(!descriptor.absolute_path.exists());
}

#[tokio::test]
async fn test_complete_without_begin_is_invalid() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    let descriptor = service
        .store(Bytes::from_static(b"img"), "image/png", png_options("a.png"))
        .await
        .unwrap();

    let err = service
        .complete_processing(descriptor.id, VersionKind::Styled, Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);
}

#[tokio::test]
async fn test_failed_processing_is_terminal_except_delete() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    let descriptor = service
        .store(Bytes::from_static(b"img"), "image/png", png_options("a.png"))
        .await
        .unwrap();
    service.begin_processing(descriptor.id).await.unwrap();
    let record = service.fail_processing(descriptor.id).await.unwrap();
    assert_eq!(record.status, FileStatus::Failed);

    let err = service.begin_processing(descriptor.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);

    // Deletion is still allowed.
    service.delete(descriptor.id, true).await.unwrap();
}

#[tokio::test]
async fn test_track_access() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    let descriptor = service
        .store(Bytes::from_static(b"img"), "image/png", png_options("a.png"))
        .await
        .unwrap();

    service.track_access(descriptor.id).await.unwrap();
    let record = service.track_access(descriptor.id).await.unwrap();
    assert_eq!(record.access_count, 2);
    assert!(record.last_accessed_at.is_some());
}

#[tokio::test]
async fn test_list_filters_and_sorts() {
    let root = tempfile::tempdir().unwrap();
    let (service, _repo) = service(&root).await;

    for (name, size, owner) in [("a.png", 30usize, "alice"), ("b.png", 10, "bob"), ("c.png", 20, "alice")] {
        let options = StoreOptions {
            original_name: name.to_string(),
            owner_id: Some(owner.to_string()),
            category: FileCategory::Uploads,
            tags: vec![],
        };
        service
            .store(Bytes::from(vec![0xCD; size]), "image/png", options)
            .await
            .unwrap();
    }

    let alice = ListQuery {
        owner_id: Some("alice".to_string()),
        ..ListQuery::default()
    };
    let page = service
        .list(&alice, &PageRequest::default(), &SortField::asc("size"))
        .await
        .unwrap();
    assert_eq!(page.total_items, 2);
    assert_eq!(page.items[0].size_bytes, 20);
    assert_eq!(page.items[1].size_bytes, 30);
}
