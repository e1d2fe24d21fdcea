//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p jsdrop-api --test upload_test`.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use jsdrop_api::setup::routes;
use jsdrop_api::state::AppState;
use jsdrop_core::Config;
use jsdrop_storage::{LocalStorage, Storage};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

use storage::RecordingStorage;

pub const UPLOAD_PATH: &str = "/api/bundle/js-upload";
pub const BASE_URL: &str = "http://localhost:5000/bundles";

/// Test application: server plus the storage it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<RecordingStorage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of writes that reached the storage backend
    pub fn put_count(&self) -> usize {
        self.storage.put_count()
    }
}

/// Config over a local backend rooted at `dir`, with `overrides` applied.
pub fn test_config(dir: &TempDir, overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("STORAGE_BACKEND".to_string(), "local".to_string()),
        (
            "LOCAL_STORAGE_PATH".to_string(),
            dir.path().to_string_lossy().to_string(),
        ),
        ("LOCAL_STORAGE_BASE_URL".to_string(), BASE_URL.to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_vars(|key| vars.get(key).cloned()).expect("Invalid test configuration")
}

/// Build a test server around the given config and storage.
pub fn build_server(config: &Config, storage: Arc<dyn Storage>) -> TestServer {
    let state = AppState::new(config.clone(), storage);
    let app = routes::setup_routes(config, state).expect("Failed to build routes");
    TestServer::new(app.into_make_service()).expect("Failed to create test server")
}

/// Serve the real router over TCP on an ephemeral port; returns its base URL.
///
/// Unlike `TestServer`, requests sent here carry the client's own headers,
/// including `Content-Length`.
pub async fn spawn_tcp_server(config: &Config, storage: Arc<dyn Storage>) -> String {
    let state = AppState::new(config.clone(), storage);
    let app = routes::setup_routes(config, state).expect("Failed to build routes");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    format!("http://{}", addr)
}

/// Recording local storage rooted at `dir`.
pub async fn recording_storage(dir: &TempDir) -> Arc<RecordingStorage> {
    let local = LocalStorage::new(dir.path(), BASE_URL.to_string())
        .await
        .expect("Failed to create local storage");
    Arc::new(RecordingStorage::new(local))
}

/// Setup test app with default upload settings and recording local storage.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Setup test app with configuration overrides.
pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = test_config(&temp_dir, overrides);

    let storage = recording_storage(&temp_dir).await;

    let server = build_server(&config, storage.clone());

    TestApp {
        server,
        storage,
        _temp_dir: temp_dir,
    }
}
