use crate::candidate::{Candidate, CandidateError, DEFAULT_IMAGE};
use crate::config::Config;
use crate::directory::{CandidateDirectory, DirectoryError, DEFAULT_PRESIGN_EXPIRY};
use crate::dynamo::{FakeTable, Table, TableError};
use crate::s3::{FakeStorage, Storage, StorageError};
use crate::test_utils::{
    fake_directory, is_aws_enabled, load_test_config, sample_candidates, write_temp_image,
    FakeDirectory,
};
use bytes::Bytes;
use serde_json::json;
use std::path::Path;
use std::time::Duration;

type Directory = CandidateDirectory<FakeTable, FakeStorage>;

fn sorted_by_uin(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by_key(|c| c.uin);
    candidates
}

#[test]
fn image_key_is_uin_with_jpg_extension() {
    assert_eq!(Directory::image_key(1), "1.jpg");
    assert_eq!(Directory::image_key(123456), "123456.jpg");
    assert_eq!(Directory::image_key(-4), "-4.jpg");
}

#[test]
fn from_config_without_table_fails_before_building_clients() {
    let mut config = Config::default();
    config.aws.s3_bucket = Some("test-bucket".to_string());

    let result = CandidateDirectory::from_config(&config);
    match result {
        Err(DirectoryError::Configuration(msg)) => assert!(msg.contains("AWS_DYNAMODB_TABLE")),
        Err(other) => panic!("Expected Configuration error, got {:?}", other),
        Ok(_) => panic!("Expected Configuration error, got a directory"),
    }
}

#[tokio::test]
async fn from_config_without_bucket_defers_the_failure() {
    let mut config = load_test_config();
    config.aws.s3_bucket = None;

    let directory = CandidateDirectory::from_config(&config).expect("table is configured");

    let result = directory.presigned_image_url_default(1).await;
    assert!(matches!(
        result,
        Err(DirectoryError::Storage(StorageError::BucketNotConfigured))
    ));

    let image = write_temp_image(b"img");
    let result = directory.upload_candidate_image(1, image.path()).await;
    assert!(matches!(
        result,
        Err(DirectoryError::Storage(StorageError::BucketNotConfigured))
    ));
}

#[tokio::test]
async fn create_then_list_returns_every_candidate() {
    let (directory, _, storage) = fake_directory();
    let candidates = sample_candidates();

    for candidate in &candidates {
        directory.create_candidate(candidate).await.unwrap();
    }

    let listed = directory.list_candidates().await.unwrap();
    assert_eq!(sorted_by_uin(listed), candidates);
    assert_eq!(storage.fake_object_count().await, 0);
}

#[tokio::test]
async fn create_returns_the_written_mapping() {
    let (directory, table, _) = fake_directory();
    let candidate = Candidate::new(1, "Bob", "bob@example.com");

    let mapping = directory.create_candidate(&candidate).await.unwrap();

    assert_eq!(mapping, candidate.to_mapping());
    assert_eq!(mapping["image_url"], json!(DEFAULT_IMAGE));
    assert_eq!(table.get_item(1).await.unwrap(), Some(mapping));
}

#[tokio::test]
async fn create_with_same_uin_keeps_last_write() {
    let (directory, table, _) = fake_directory();

    directory
        .create_candidate(&Candidate::new(5, "Old", "old@example.com"))
        .await
        .unwrap();
    let newer = Candidate::new(5, "New", "new@example.com").with_major("Mathematics");
    directory.create_candidate(&newer).await.unwrap();

    assert_eq!(table.fake_item_count().await, 1);
    assert_eq!(directory.list_candidates().await.unwrap(), vec![newer]);
}

#[tokio::test]
async fn create_with_image_path_uploads_under_derived_key() {
    let (directory, _, storage) = fake_directory();
    let image = write_temp_image(b"profile photo");
    let path = image.path().to_str().unwrap().to_string();
    let candidate = Candidate::new(9, "Ivy", "ivy@example.com").with_image_url(path.clone());

    let mapping = directory.create_candidate(&candidate).await.unwrap();

    assert_eq!(mapping["image_url"], json!(path));
    let stored = storage.get_object(&Directory::image_key(9)).await.unwrap();
    assert_eq!(stored, Bytes::from_static(b"profile photo"));
}

#[tokio::test]
async fn failed_image_upload_leaves_the_record_in_place() {
    let (directory, table, _) = fake_directory();
    let candidate =
        Candidate::new(11, "Kim", "kim@example.com").with_image_url("/nonexistent/kim.jpg");

    let result = directory.create_candidate(&candidate).await;

    match result {
        Err(DirectoryError::ImageUpload { uin, source }) => {
            assert_eq!(uin, 11);
            assert!(matches!(source, StorageError::Io(_)));
        }
        other => panic!("Expected ImageUpload error, got {:?}", other),
    }
    assert_eq!(table.fake_item_count().await, 1);
    assert_eq!(directory.list_candidates().await.unwrap(), vec![candidate]);
}

#[tokio::test]
async fn failed_store_write_skips_the_upload() {
    let (directory, table, storage) = fake_directory();
    let image = write_temp_image(b"bytes");
    let candidate = Candidate::new(12, "Lee", "lee@example.com")
        .with_image_url(image.path().to_str().unwrap());

    table.fake_fail_writes(true);
    let result = directory.create_candidate(&candidate).await;

    assert!(matches!(
        result,
        Err(DirectoryError::Table(TableError::QueryError(_)))
    ));
    assert_eq!(storage.fake_object_count().await, 0);
}

#[tokio::test]
async fn upload_then_fetch_returns_the_same_bytes() {
    let (directory, _, storage) = fake_directory();
    let image = write_temp_image(b"test image");

    let upload = directory
        .upload_candidate_image(1, image.path())
        .await
        .unwrap();

    assert_eq!(upload.message, "Image uploaded successfully");
    assert_eq!(upload.image_url, "s3://test-bucket/1.jpg");
    let stored = storage.get_object("1.jpg").await.unwrap();
    assert_eq!(stored, Bytes::from_static(b"test image"));
}

#[tokio::test]
async fn upload_overwrites_the_previous_image() {
    let (directory, _, storage) = fake_directory();

    let first = write_temp_image(b"first");
    let second = write_temp_image(b"second");
    directory.upload_candidate_image(3, first.path()).await.unwrap();
    directory.upload_candidate_image(3, second.path()).await.unwrap();

    assert_eq!(storage.fake_object_count().await, 1);
    assert_eq!(storage.get_object("3.jpg").await.unwrap(), Bytes::from("second"));
}

#[tokio::test]
async fn upload_of_missing_file_propagates_io_error() {
    let (directory, _, _) = fake_directory();

    let result = directory
        .upload_candidate_image(1, Path::new("/nonexistent/image.jpg"))
        .await;

    assert!(matches!(
        result,
        Err(DirectoryError::Storage(StorageError::Io(_)))
    ));
}

#[tokio::test]
async fn upload_create_and_presign_agree_on_the_key() {
    let (directory, _, storage) = fake_directory();
    let image = write_temp_image(b"x");

    let upload = directory.upload_candidate_image(77, image.path()).await.unwrap();
    assert!(upload.image_url.ends_with("/77.jpg"));

    storage.remove_object("77.jpg").await.unwrap();
    let candidate = Candidate::new(77, "Max", "max@example.com")
        .with_image_url(image.path().to_str().unwrap());
    directory.create_candidate(&candidate).await.unwrap();
    assert!(storage.get_object("77.jpg").await.is_ok());

    let url = directory.presigned_image_url_default(77).await.unwrap().unwrap();
    assert!(url.contains("/77.jpg?"), "got {}", url);
}

#[tokio::test]
async fn presigned_url_has_bucket_host_and_key() {
    let (directory, _, _) = fake_directory();

    let url = directory.presigned_image_url_default(1).await.unwrap();

    let url = url.expect("credentials are configured");
    assert!(url.contains("test-bucket.s3.amazonaws.com/1.jpg"), "got {}", url);
    assert!(url.contains("X-Amz-Expires=3600"), "got {}", url);
    assert_eq!(DEFAULT_PRESIGN_EXPIRY, Duration::from_secs(3600));
}

#[tokio::test]
async fn presigned_url_honours_custom_expiry_and_missing_objects() {
    let (directory, _, storage) = fake_directory();
    assert_eq!(storage.fake_object_count().await, 0);

    let url = directory
        .presigned_image_url(404, Duration::from_secs(60))
        .await
        .unwrap()
        .unwrap();

    assert!(url.contains("/404.jpg"));
    assert!(url.contains("X-Amz-Expires=60"));
}

#[tokio::test]
async fn presign_without_credentials_returns_none() {
    let (directory, _, storage) = fake_directory();
    storage.fake_clear_credentials();

    let url = directory.presigned_image_url_default(1).await.unwrap();

    assert_eq!(url, None);
}

#[tokio::test]
async fn presign_without_bucket_is_a_hard_failure() {
    let directory = CandidateDirectory::new(FakeTable::new("candidates"), FakeStorage::without_bucket());

    let result = directory.presigned_image_url_default(1).await;

    assert!(matches!(
        result,
        Err(DirectoryError::Storage(StorageError::BucketNotConfigured))
    ));
}

#[tokio::test]
async fn list_reports_malformed_items() {
    let (directory, table, _) = fake_directory();
    directory
        .create_candidate(&Candidate::new(1, "Bob", "bob@example.com"))
        .await
        .unwrap();

    let mut broken = Candidate::new(2, "Broken", "x@example.com").to_mapping();
    broken.remove("email");
    table.fake_add_raw_item(2, broken).await;

    let result = directory.list_candidates().await;
    assert!(matches!(
        result,
        Err(DirectoryError::MalformedRecord(CandidateError::MissingField("email")))
    ));
}

#[tokio::test]
async fn list_propagates_scan_failures() {
    let (directory, table, _) = fake_directory();
    table.fake_fail_scans(true);

    assert!(matches!(
        directory.list_candidates().await,
        Err(DirectoryError::Table(_))
    ));
}

#[tokio::test]
async fn cloned_directories_share_the_same_stores() {
    let (directory, _, _): (FakeDirectory, _, _) = fake_directory();
    let clone = directory.clone();

    clone
        .create_candidate(&Candidate::new(21, "Uma", "uma@example.com"))
        .await
        .unwrap();

    assert_eq!(directory.list_candidates().await.unwrap().len(), 1);
}

#[tokio::test]
async fn aws_backed_directory_round_trips_candidates_and_images() {
    if !is_aws_enabled() {
        return;
    }

    let mut config = load_test_config();
    config.aws.dynamodb_table = Some(format!("candidates-{}", uuid::Uuid::new_v4().simple()));
    let directory = CandidateDirectory::from_config(&config).unwrap();

    let table = crate::dynamo::DynamoTable::new(
        &config.aws,
        config.aws.dynamodb_table.as_deref().unwrap(),
    );
    table.create_table().await.unwrap();
    let storage = crate::s3::S3Storage::new(&config.aws);
    let bucket = storage.bucket().unwrap().to_string();
    if !storage.has_bucket(&bucket).await.unwrap_or(false) {
        storage.create_bucket(&bucket).await.unwrap();
    }

    let image = write_temp_image(b"aws image");
    let candidate = Candidate::new(1, "Bob", "bob@example.com")
        .with_image_url(image.path().to_str().unwrap());
    directory.create_candidate(&candidate).await.unwrap();

    let listed = directory.list_candidates().await.unwrap();
    assert_eq!(listed, vec![candidate]);
    assert_eq!(
        storage.get_object("1.jpg").await.unwrap(),
        Bytes::from_static(b"aws image")
    );
    assert!(directory.presigned_image_url_default(1).await.unwrap().is_some());
}
