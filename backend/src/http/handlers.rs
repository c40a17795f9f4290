//! HTTP handlers for the upload and report boundary.

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use super::dto::{ApiError, HealthResponse};
use super::AppState;
use crate::core::pipeline::AnalysisRequest;
use crate::core::report::AnalysisReport;

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// Filename used when the upload does not carry one
const UNNAMED_UPLOAD: &str = "upload";

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Analyze one uploaded media file
///
/// Reads the `file` field of a multipart body, runs the pipeline and returns
/// the report, or `{"detail": ...}` on failure.
pub async fn analyze_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, ApiError> {
    let mut request = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNNAMED_UPLOAD)
            .to_string();
        let data = field.bytes().await?;
        request = Some(AnalysisRequest::new(filename, data.to_vec()));
        break;
    }

    let request = request.ok_or_else(|| {
        ApiError::bad_request(format!("Missing multipart field '{}'", UPLOAD_FIELD))
    })?;

    info!(
        filename = %request.filename(),
        bytes = request.data().len(),
        "Received upload"
    );

    let report = state.coordinator.analyze(&request).await?;
    Ok(Json(report))
}
