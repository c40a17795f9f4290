//! Forensic Lab HTTP server.
//!
//! Config is read from `FORENSIC_LAB_CONFIG` when set, otherwise from the
//! platform config directory; a missing file means defaults.

use std::path::PathBuf;

use forensic_lab_lib::{init_logging, ForensicsConfig};

/// Environment variable overriding the config file location
const CONFIG_ENV: &str = "FORENSIC_LAB_CONFIG";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config_path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .or_else(ForensicsConfig::default_path);

    let config = match &config_path {
        Some(path) => ForensicsConfig::load(path),
        None => ForensicsConfig::default(),
    };

    init_logging(config.log_dir.as_deref());
    tracing::info!(
        config = ?config_path,
        scratch_root = %config.scratch_root.display(),
        "Starting Forensic Lab v{}",
        env!("CARGO_PKG_VERSION")
    );

    forensic_lab_lib::http::serve(config).await
}
