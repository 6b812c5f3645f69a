use std::io::Write;
use std::sync::Arc;

use readly_core::time::fixed_clock;
use services::{
    AppServices, BackendClient, BackendConfig, KnowledgeMapService, KnowledgeMapServiceError,
    StoredMap,
};
use storage::repository::{KeyValueRepository, StorageError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OLD_MAP: &str = r#"{"topic":"Old","subtopics":[]}"#;
const NEW_MAP: &str = r#"{"topic":"Cells","subtopics":[
    {"title":"Membranes","description":"d","key_concepts":["lipids"],"status":"unmastered","quiz":[]}
]}"#;

fn pdf_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .expect("temp file");
    file.write_all(b"%PDF-1.4 sample").expect("write pdf");
    file
}

#[tokio::test]
async fn import_replaces_stored_maps() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "maps": [NEW_MAP, "{broken"],
            "message": "Successfully processed 2 knowledge maps",
            "chunks_processed": 2
        })))
        .mount(&server)
        .await;

    let services = AppServices::in_memory(
        fixed_clock(),
        BackendConfig::default().with_base_url(server.uri()),
    )
    .unwrap();
    let maps = services.knowledge_maps();
    maps.replace_all(vec![OLD_MAP.to_string()]).await.unwrap();

    let file = pdf_file();
    let summary = maps.import_pdf(file.path()).await.unwrap();
    assert_eq!(summary.chunks_processed, 2);
    assert_eq!(summary.maps.len(), 2);
    assert!(matches!(summary.maps[1], StoredMap::Malformed { .. }));

    let loaded = maps.maps().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].topic, "Cells");
}

#[tokio::test]
async fn failed_upload_keeps_existing_maps() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let services = AppServices::in_memory(
        fixed_clock(),
        BackendConfig::default().with_base_url(server.uri()),
    )
    .unwrap();
    let maps = services.knowledge_maps();
    maps.replace_all(vec![OLD_MAP.to_string()]).await.unwrap();

    let file = pdf_file();
    let err = maps.import_pdf(file.path()).await.unwrap_err();
    assert!(matches!(err, KnowledgeMapServiceError::Backend(_)));

    let loaded = maps.maps().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].topic, "Old");
}

#[tokio::test]
async fn missing_file_is_reported() {
    let services = AppServices::in_memory(fixed_clock(), BackendConfig::default()).unwrap();
    let err = services
        .knowledge_maps()
        .import_pdf(std::path::Path::new("/definitely/missing.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, KnowledgeMapServiceError::ReadFile { .. }));
}

struct ReadOnlyKv;

#[async_trait::async_trait]
impl KeyValueRepository for ReadOnlyKv {
    async fn get_value(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn put_value(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("read only".to_string()))
    }

    async fn delete_value(&self, _key: &str) -> Result<bool, StorageError> {
        Ok(false)
    }

    async fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn storage_failure_after_upload_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "maps": [NEW_MAP],
            "message": "Successfully processed 1 knowledge maps",
            "chunks_processed": 1
        })))
        .mount(&server)
        .await;

    let backend = BackendClient::new(BackendConfig::default().with_base_url(server.uri())).unwrap();
    let maps = KnowledgeMapService::new(Arc::new(ReadOnlyKv), Arc::new(backend));

    let file = pdf_file();
    let err = maps.import_pdf(file.path()).await.unwrap_err();
    assert!(matches!(
        err,
        KnowledgeMapServiceError::Storage(StorageError::Connection(_))
    ));
}
