//! Blob storage client tests against a local PUT endpoint

mod helpers;

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::put;
use axum::Router;

use feedgen::services::{remote_destination, BlobStore, BunnyStorage, SinkWriter, StorageError};
use feedgen_common::config::StorageConfig;
use helpers::spawn_server;

#[derive(Debug, Clone)]
struct Upload {
    path: String,
    content_type: String,
    body: Vec<u8>,
}

type Uploads = Arc<Mutex<Vec<Upload>>>;

async fn accept_put(
    State(uploads): State<Uploads>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let access_key = headers.get("AccessKey").and_then(|v| v.to_str().ok());
    if access_key != Some("secret") {
        return StatusCode::UNAUTHORIZED;
    }
    uploads.lock().unwrap().push(Upload {
        path: uri.path().to_string(),
        content_type: headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string(),
        body: body.to_vec(),
    });
    StatusCode::CREATED
}

async fn storage(api_key: &str) -> (BunnyStorage, Uploads) {
    let uploads: Uploads = Arc::default();
    let router = Router::new()
        .route("/*path", put(accept_put))
        .with_state(uploads.clone());
    let addr = spawn_server(router).await;

    let store = BunnyStorage::new(&StorageConfig {
        endpoint: Some(format!("http://{}", addr)),
        zone: Some("castify-feeds".to_string()),
        api_key: Some(api_key.to_string()),
        cdn_base: Some("https://feeds.example-cdn.net".to_string()),
        ..Default::default()
    })
    .unwrap();
    (store, uploads)
}

#[tokio::test]
async fn test_put_returns_public_url() {
    let (store, uploads) = storage("secret").await;

    let url = store
        .put("roku/b1_roku_feed.json", b"{\"version\":\"1\"}".to_vec(), "application/json")
        .await
        .unwrap();
    assert_eq!(url, "https://feeds.example-cdn.net/roku/b1_roku_feed.json");

    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].path, "/castify-feeds/roku/b1_roku_feed.json");
    assert_eq!(uploads[0].content_type, "application/json");
    assert_eq!(uploads[0].body, b"{\"version\":\"1\"}");
}

#[tokio::test]
async fn test_put_overwrites_same_key() {
    let (store, uploads) = storage("secret").await;
    for body in [b"first".to_vec(), b"second".to_vec()] {
        store.put("a.json", body, "application/json").await.unwrap();
    }
    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].path, uploads[1].path);
}

#[tokio::test]
async fn test_rejected_put_carries_status() {
    let (store, uploads) = storage("wrong-key").await;

    let err = store.put("a.json", b"{}".to_vec(), "application/json").await.unwrap_err();
    assert!(matches!(err, StorageError::Rejected { status: 401, .. }));
    assert!(uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_sink_writes_remote_feed() {
    let (store, uploads) = storage("secret").await;
    let sink = SinkWriter::new(Some(Arc::new(store)));

    let destination = remote_destination("/roku/", "685b8e", false);
    let location = sink.write(b"{}".to_vec(), &destination).await.unwrap();

    assert_eq!(location, "https://feeds.example-cdn.net/roku/685b8e_roku_feed.json");
    assert_eq!(
        uploads.lock().unwrap()[0].path,
        "/castify-feeds/roku/685b8e_roku_feed.json"
    );
}
