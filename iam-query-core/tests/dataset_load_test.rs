//! Dataset loading against on-disk fixtures.
//!
//! Every file under `tests/resources/invalid` must be rejected as a whole with
//! `DatasetUnavailable`, even when it sits next to valid documents.

use std::path::{Path, PathBuf};

use iam_query_core::{Dataset, DatasetSource, QueryEngine, QueryError};
use tempfile::TempDir;

fn invalid_fixtures() -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/resources/invalid");
    let mut fixtures: Vec<PathBuf> = std::fs::read_dir(&dir)
        .expect("fixture directory should exist")
        .map(|entry| entry.expect("readable entry").path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
        .collect();
    fixtures.sort();
    fixtures
}

fn embedded_document(service: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("resources/service-reference")
        .join(format!("{}.json", service));
    std::fs::read_to_string(path).expect("embedded corpus file should exist")
}

#[test]
fn test_invalid_fixtures_directory_populated() {
    assert!(
        invalid_fixtures().len() >= 5,
        "expected the invalid fixtures to be present"
    );
}

#[test]
fn test_each_invalid_fixture_rejected() {
    for fixture in invalid_fixtures() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("s3.json"), embedded_document("s3")).unwrap();
        std::fs::copy(&fixture, temp_dir.path().join("broken.json")).unwrap();

        let result = Dataset::load_from_dir(temp_dir.path());

        match result {
            Err(QueryError::DatasetUnavailable(message)) => {
                println!("✓ {}: {}", fixture.display(), message);
            }
            other => panic!(
                "{}: expected DatasetUnavailable, got {:?}",
                fixture.display(),
                other.map(|d| d.services().count())
            ),
        }
    }
}

#[test]
fn test_directory_dataset_matches_embedded() {
    let temp_dir = TempDir::new().unwrap();
    for service in ["cloud9", "s3"] {
        std::fs::write(
            temp_dir.path().join(format!("{}.json", service)),
            embedded_document(service),
        )
        .unwrap();
    }

    let from_dir = Dataset::load(&DatasetSource::Directory(temp_dir.path().to_path_buf())).unwrap();
    let embedded = Dataset::embedded().unwrap();

    for service in ["cloud9", "s3"] {
        let a = from_dir.for_service(service).unwrap();
        let b = embedded.for_service(service).unwrap();
        assert_eq!(a.actions(), b.actions());
        assert_eq!(a.arn_types(), b.arn_types());
        assert_eq!(a.condition_keys(), b.condition_keys());
        assert_eq!(a.version(), b.version());
    }
}

#[test]
fn test_missing_directory_is_dataset_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let err = Dataset::load_from_dir(temp_dir.path().join("nowhere")).unwrap_err();
    assert!(!err.is_user_error());
}

#[test]
fn test_document_without_entries_is_unknown_service() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("s3.json"), embedded_document("s3")).unwrap();
    std::fs::write(temp_dir.path().join("empty.json"), r#"{"Name": "empty"}"#).unwrap();

    let dataset = Dataset::load_from_dir(temp_dir.path()).unwrap();
    let engine = QueryEngine::new(&dataset);

    assert_eq!(engine.list_services(), vec!["s3"]);
    let err = engine.list_actions("empty").unwrap_err();
    assert!(matches!(&err, QueryError::UnknownService(s) if s == "empty"), "{:?}", err);
    assert!(err.is_user_error());
}

#[cfg(unix)]
#[test]
fn test_symlinked_document_is_loaded() {
    let store = TempDir::new().unwrap();
    let real = store.path().join("real-cloud9.json");
    std::fs::write(&real, embedded_document("cloud9")).unwrap();

    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("s3.json"), embedded_document("s3")).unwrap();
    std::os::unix::fs::symlink(&real, temp_dir.path().join("cloud9.json")).unwrap();

    let dataset = Dataset::load_from_dir(temp_dir.path()).unwrap();
    assert_eq!(dataset.services().collect::<Vec<_>>(), vec!["cloud9", "s3"]);
    assert!(dataset.for_service("cloud9").unwrap().arn_type("environment").is_ok());
}
