//! Forensic Lab Core Library
//!
//! Media forensics pipeline: an uploaded file is stored in a per-request
//! scratch workspace, run through metadata extraction (exiftool), keyframe
//! sampling (ffmpeg) and a simulated reverse-image search, and summarized in
//! a single report.
//!
//! The HTTP upload boundary lives behind the `http` feature; the pipeline
//! itself has no HTTP dependency and is also driven by the CLI crate.

pub mod core;
#[cfg(feature = "http")]
pub mod http;

use std::path::Path;
use std::sync::OnceLock;

pub use crate::core::config::ForensicsConfig;
pub use crate::core::pipeline::{AnalysisCoordinator, AnalysisRequest};
pub use crate::core::report::AnalysisReport;
pub use crate::core::{ErrorKind, ForensicsError, ForensicsResult};

// =============================================================================
// Logging
// =============================================================================

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Install the global tracing subscriber.
///
/// Logs go to stdout and, when `log_dir` is given, to a daily-rolling file.
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_logging(log_dir: Option<&Path>) {
    use tracing_subscriber::prelude::*;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(cfg!(debug_assertions));

    // Best effort: an unusable log dir falls back to stdout only.
    let file_layer = log_dir.and_then(|dir| {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Failed to create log directory {}: {}", dir.display(), e);
            return None;
        }
        let file_appender = tracing_appender::rolling::daily(dir, "forensic-lab.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let _ = LOG_GUARD.set(guard);

        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer);

    // Avoid panics if already initialized (tests, repeated CLI setup).
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_logging_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        init_logging(Some(temp_dir.path()));
        init_logging(None);
        tracing::info!("logging initialized twice without panicking");
    }
}
