//! HTTP Boundary
//!
//! axum router exposing the pipeline:
//! - `POST /analyze/`: multipart upload (field `file`), returns the report
//! - `GET /health`: liveness probe
//!
//! Upload size is bounded here, not inside the pipeline.

pub mod dto;
pub mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::config::ForensicsConfig;
use crate::core::pipeline::AnalysisCoordinator;
use crate::core::tools::{configured_tools, detect_tool};

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Pipeline coordinator (immutable, shared between requests)
    pub coordinator: Arc<AnalysisCoordinator>,
}

impl AppState {
    pub fn new(coordinator: AnalysisCoordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }
}

/// Build the application router
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/analyze/", post(handlers::analyze_media))
        .route("/analyze", post(handlers::analyze_media))
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Log whether the configured tools are usable (best effort)
pub async fn log_tool_availability(config: &ForensicsConfig) {
    for tool in configured_tools(config) {
        match detect_tool(&tool.runner, tool.version_arg).await {
            Ok(info) => tracing::info!(tool = %info.name, version = %info.version, "Tool detected"),
            Err(e) => tracing::warn!("{}; analyses will report this stage as failed", e),
        }
    }
}

/// Serve the pipeline over HTTP until Ctrl+C
pub async fn serve(config: ForensicsConfig) -> std::io::Result<()> {
    log_tool_availability(&config).await;

    let state = AppState::new(AnalysisCoordinator::new(&config));
    let app = router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Forensic Lab listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keyframes::{KeyframeSampler, KeyframeSet};
    use crate::core::matching::SimulatedMatcher;
    use crate::core::metadata::{MetadataExtractor, MetadataResult};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "forensic-lab-boundary";

    struct StaticExtractor;

    #[async_trait]
    impl MetadataExtractor for StaticExtractor {
        async fn extract(&self, _file_path: &Path) -> MetadataResult {
            MetadataResult::Tags(json!({"FileType": "MP4"}).as_object().unwrap().clone())
        }
    }

    struct CountingSampler(usize);

    #[async_trait]
    impl KeyframeSampler for CountingSampler {
        async fn sample(&self, _file_path: &Path, output_dir: &Path, _interval: u32) -> KeyframeSet {
            for i in 1..=self.0 {
                std::fs::write(output_dir.join(format!("keyframe-{:03}.jpg", i)), b"").unwrap();
            }
            KeyframeSet::from_dir(output_dir).unwrap()
        }
    }

    fn test_app(config: &ForensicsConfig, frames: usize) -> Router {
        let coordinator = AnalysisCoordinator::with_components(
            config,
            Arc::new(StaticExtractor),
            Arc::new(CountingSampler(frames)),
            Arc::new(SimulatedMatcher::from_config(config)),
        );
        router(AppState::new(coordinator), config.max_upload_bytes)
    }

    fn multipart_body(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload(path: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn test_config(temp_dir: &TempDir) -> ForensicsConfig {
        ForensicsConfig {
            scratch_root: temp_dir.path().join("scratch"),
            ..ForensicsConfig::default()
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&test_config(&temp_dir), 0);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], json!("ok"));
    }

    #[tokio::test]
    async fn test_upload_returns_report() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let app = test_app(&config, 7);

        let response = app
            .oneshot(upload("/analyze/", multipart_body("file", "clip.mp4", b"video")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let report = json_body(response).await;
        assert_eq!(report["filename"], json!("clip.mp4"));
        assert_eq!(report["metadata"], json!({"FileType": "MP4"}));
        assert_eq!(report["keyframes_extracted"], json!(7));
        assert_eq!(
            report["reverse_image_search_simulation"].as_array().unwrap().len(),
            3
        );
        assert_eq!(std::fs::read_dir(&config.scratch_root).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_path_without_trailing_slash() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&test_config(&temp_dir), 0);

        let response = app
            .oneshot(upload("/analyze", multipart_body("file", "a.jpg", b"jpg")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_file_field_is_bad_request() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&test_config(&temp_dir), 0);

        let response = app
            .oneshot(upload("/analyze/", multipart_body("other", "a.jpg", b"jpg")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["detail"]
            .as_str()
            .unwrap()
            .contains("file"));
    }

    #[tokio::test]
    async fn test_pipeline_failure_is_server_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        std::fs::write(&config.scratch_root, b"blocks workspace creation").unwrap();
        let app = test_app(&config, 0);

        let response = app
            .oneshot(upload("/analyze/", multipart_body("file", "clip.mp4", b"video")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.contains("workspace"));
        assert!(!detail.contains(&temp_dir.path().to_string_lossy().to_string()));
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config = ForensicsConfig {
            max_upload_bytes: 64,
            ..test_config(&temp_dir)
        };
        let app = test_app(&config, 0);

        let response = app
            .oneshot(upload("/analyze/", multipart_body("file", "big.mp4", &[0u8; 4096])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
