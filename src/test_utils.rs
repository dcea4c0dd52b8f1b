use crate::candidate::Candidate;
use crate::config::Config;
use crate::directory::CandidateDirectory;
use crate::dynamo::FakeTable;
use crate::s3::FakeStorage;
use std::io::Write;
use tempfile::NamedTempFile;

/// Check if a test is enabled via environment variable
fn is_test_enabled(env_var: &str) -> bool {
    std::env::var(env_var)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Check if tests against real AWS-compatible services are enabled
///
/// Point `AWS_ENDPOINT_URL` at LocalStack (or similar) when turning these on.
pub fn is_aws_enabled() -> bool {
    is_test_enabled("ENABLE_AWS_TESTS")
}

/// Load test configuration from the environment, with test defaults for anything unset
pub fn load_test_config() -> Config {
    let mut config = Config::default();
    config.aws.access_key_id = Some("testing".to_string());
    config.aws.secret_access_key = Some("testing".to_string());
    config.aws.region = Some("us-east-1".to_string());
    config.aws.s3_bucket = Some("test-bucket".to_string());
    config.aws.dynamodb_table = Some("candidates".to_string());

    if let Err(e) = config.apply_env_from(|name| std::env::var(name).ok()) {
        panic!("Invalid test environment: {}", e);
    }
    config
}

pub type FakeDirectory = CandidateDirectory<FakeTable, FakeStorage>;

/// Directory over fresh fakes, returning the fakes for inspection
pub fn fake_directory() -> (FakeDirectory, FakeTable, FakeStorage) {
    let table = FakeTable::new("candidates");
    let storage = FakeStorage::new();
    let directory = CandidateDirectory::new(table.clone(), storage.clone());
    (directory, table, storage)
}

/// Write `bytes` to a temporary file that lives as long as the returned handle
pub fn write_temp_image(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp image");
    file.write_all(bytes).expect("Failed to write temp image");
    file.flush().expect("Failed to flush temp image");
    file
}

/// A handful of candidates with distinct `uin` values
pub fn sample_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new(1, "Bob", "bob@example.com"),
        Candidate::new(2, "Alice", "alice@example.com").with_major("Computer Science"),
        Candidate::new(3, "Chen", "chen@example.com").with_major("Aerospace Engineering"),
    ]
}
