//! Test Helper Utilities
//!
//! In-memory collaborators and local HTTP stand-ins for feedgen tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use serde_json::{json, Value};

use feedgen::models::{decode_records, FetchedRecords};
use feedgen::services::{BlobStore, RecordSource, SourceError, StorageError};

/// Source serving fixed JSON payload entries
pub struct MemorySource {
    entries: Vec<Value>,
}

impl MemorySource {
    pub fn new(entries: Vec<Value>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_records(&self, _brand_id: &str) -> Result<FetchedRecords, SourceError> {
        Ok(decode_records(self.entries.clone()))
    }
}

/// Source that always fails like an unreachable API
pub struct FailingSource;

#[async_trait]
impl RecordSource for FailingSource {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn fetch_records(&self, _brand_id: &str) -> Result<FetchedRecords, SourceError> {
        Err(SourceError::Api(503, "upstream unavailable".to_string()))
    }
}

/// Stored object
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Blob store keeping objects in memory
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    reject_with: Option<u16>,
}

pub const MEMORY_CDN: &str = "https://cdn.test";

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects every upload with `status`
    pub fn rejecting(status: u16) -> Self {
        Self {
            reject_with: Some(status),
            ..Default::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        if let Some(status) = self.reject_with {
            return Err(StorageError::Rejected {
                status,
                body: "denied".to_string(),
            });
        }
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("{}/{}", MEMORY_CDN, key))
    }
}

/// Serve `router` on an ephemeral local port
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Content API record in the wire shape
pub fn api_record(id: &str, title: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "shortDescription": "",
        "longDescription": "",
        "createdAt": "2024-05-01T12:30:00.000Z",
        "ageRating": "G",
        "duration": 1800,
        "isLiveStream": false,
        "genres": [],
        "type": "movie"
    })
}

/// The "Zoo Safari" record: PG-13, too-short duration, no descriptions
pub fn zoo_safari() -> Value {
    json!({
        "_id": "zoo-1",
        "title": "Zoo Safari",
        "shortDescription": "",
        "longDescription": "",
        "ageRating": "PG-13",
        "duration": 45,
        "isLiveStream": false
    })
}

/// Encoded solid-color PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([200, 80, 40]),
    ));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}
