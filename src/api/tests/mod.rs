use super::*;
use crate::config::OverpassConfig;
use crate::error::{ApiError, StoreError};
use crate::overpass::OverpassClient;
use crate::store::{ArtifactStore, MemoryObjectStore, ObjectStore};
use crate::types::{JobState, JobStatus, OsmId};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to build a service over a mock Overpass endpoint and a memory store
fn create_test_service(
    server: &MockServer,
    memory: Arc<MemoryObjectStore>,
) -> Arc<ExtractionService> {
    let overpass = OverpassClient::new(OverpassConfig {
        endpoint: format!("{}/api/interpreter", server.uri()),
        http_timeout_secs: 5,
        ..Default::default()
    })
    .expect("client builds");
    let store = ArtifactStore::new(memory, "cdn.example.com");
    Arc::new(ExtractionService::with_parts(overpass, store, 30))
}

fn test_router(service: Arc<ExtractionService>) -> Router {
    create_router(service, Arc::new(Config::default()))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn wait_for_terminal(service: &Arc<ExtractionService>, id: OsmId) -> JobStatus {
    for _ in 0..200 {
        if let Some(status) = service.status_table().get(id).await
            && status.status.is_terminal()
        {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job for {id} did not settle in time");
}

#[tokio::test]
async fn non_numeric_id_is_rejected_with_400() {
    let server = MockServer::start().await;
    let service = create_test_service(&server, Arc::new(MemoryObjectStore::new()));
    let app = test_router(service);

    let (status, body) = get(&app, "/osm/not-a-number/relation").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let api_error: ApiError = serde_json::from_value(body).unwrap();
    assert_eq!(api_error.error.code, "validation_error");
    assert!(api_error.error.message.contains("not-a-number"));
}

#[tokio::test]
async fn unknown_element_type_is_rejected_with_400() {
    let server = MockServer::start().await;
    let service = create_test_service(&server, Arc::new(MemoryObjectStore::new()));
    let app = test_router(service);

    let (status, body) = get(&app, "/osm/42/area").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let api_error: ApiError = serde_json::from_value(body).unwrap();
    assert_eq!(api_error.error.code, "validation_error");
}

#[tokio::test]
async fn stored_artifact_answers_200_with_its_url() {
    let server = MockServer::start().await;
    let memory = Arc::new(MemoryObjectStore::new());
    memory.insert("42.ndjson", b"{}\n".to_vec());
    let service = create_test_service(&server, memory);
    let app = test_router(service.clone());

    let (status, body) = get(&app, "/osm/42/relation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["url"], "https://cdn.example.com/42.ndjson");
    assert_eq!(body["id"], 42);
    assert!(body.get("timestamp").is_some());
    assert!(
        service.status_table().is_empty().await,
        "the exists fast path must not record a job"
    );
}

#[tokio::test]
async fn fresh_feature_is_accepted_then_served_from_the_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 44.97, "lon": -93.26},
                {"type": "way", "id": 10, "nodes": [1]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let service = create_test_service(&server, Arc::new(MemoryObjectStore::new()));
    let app = test_router(service.clone());
    let id = OsmId::new(62422);

    let (status, body) = get(&app, "/osm/62422/relation").await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "processing");
    assert_eq!(body["id"], 62422);

    wait_for_terminal(&service, id).await;

    // Once the artifact is stored, the same request short-circuits to 200.
    let (status, body) = get(&app, "/osm/62422/relation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["url"], "https://cdn.example.com/62422.ndjson");
}

#[tokio::test]
async fn settled_failure_is_replayed_on_202_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;
    let service = create_test_service(&server, Arc::new(MemoryObjectStore::new()));
    let app = test_router(service.clone());
    let id = OsmId::new(99);

    let (status, _) = get(&app, "/osm/99/way").await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let settled = wait_for_terminal(&service, id).await;
    assert_eq!(settled.status, JobState::Failure);

    let (status, body) = get(&app, "/osm/99/way").await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "failure");
    assert!(body["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn probe_failure_answers_500() {
    struct BrokenStore;

    #[async_trait]
    impl ObjectStore for BrokenStore {
        async fn head(&self, _key: &str) -> std::result::Result<bool, StoreError> {
            Err(StoreError::ProbeFailed {
                reason: "dns failure".to_string(),
            })
        }

        async fn put(
            &self,
            _key: &str,
            _body: Vec<u8>,
            _content_type: &str,
        ) -> std::result::Result<(), StoreError> {
            Ok(())
        }
    }

    let server = MockServer::start().await;
    let overpass = OverpassClient::new(OverpassConfig {
        endpoint: format!("{}/api/interpreter", server.uri()),
        ..Default::default()
    })
    .unwrap();
    let store = ArtifactStore::new(Arc::new(BrokenStore), "cdn.example.com");
    let service = Arc::new(ExtractionService::with_parts(overpass, store, 30));
    let app = test_router(service);

    let (status, body) = get(&app, "/osm/42/relation").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let api_error: ApiError = serde_json::from_value(body).unwrap();
    assert_eq!(api_error.error.code, "store_error");
}

#[tokio::test]
async fn health_endpoint_answers_ok() {
    let server = MockServer::start().await;
    let service = create_test_service(&server, Arc::new(MemoryObjectStore::new()));
    let app = test_router(service);

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn openapi_spec_is_served() {
    let server = MockServer::start().await;
    let service = create_test_service(&server, Arc::new(MemoryObjectStore::new()));
    let app = test_router(service);

    let (status, body) = get(&app, "/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/osm/{id}/{type}").is_some());
}

#[tokio::test]
async fn cors_headers_are_present_when_enabled() {
    let server = MockServer::start().await;
    let service = create_test_service(&server, Arc::new(MemoryObjectStore::new()));

    let config = Config {
        api: crate::config::ApiConfig {
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
            ..Default::default()
        },
        ..Default::default()
    };
    let app = create_router(service, Arc::new(config));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}
