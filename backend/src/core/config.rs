//! Pipeline Configuration
//!
//! Provides the explicit configuration value handed to the analysis
//! coordinator:
//! - Tool paths and per-invocation deadline
//! - Sampling interval, match limit and match URL template
//! - Scratch root and server settings
//!
//! Storage location: {config_dir}/forensic-lab/config.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::core::keyframes::DEFAULT_INTERVAL_SECS;

/// Config file name
pub const CONFIG_FILE: &str = "config.json";

/// Placeholder substituted with the keyframe filename in the match template
pub const FRAME_PLACEHOLDER: &str = "{frame}";

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForensicsConfig {
    /// Metadata tool binary
    #[serde(default = "default_exiftool_path")]
    pub exiftool_path: PathBuf,

    /// Transcoding tool binary
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Directory under which per-request workspaces are created
    #[serde(default = "default_scratch_root")]
    pub scratch_root: PathBuf,

    /// Seconds of source duration between sampled keyframes
    #[serde(default = "default_keyframe_interval")]
    pub keyframe_interval_secs: u32,

    /// Number of leading keyframes passed to the match search
    #[serde(default = "default_match_limit")]
    pub match_limit: usize,

    /// Candidate URL template; `{frame}` is replaced by the keyframe filename
    #[serde(default = "default_match_url_template")]
    pub match_url_template: String,

    /// Deadline per tool invocation in seconds (0 disables the deadline)
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,

    /// HTTP listen address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Directory for rolling log files (stdout only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_exiftool_path() -> PathBuf {
    PathBuf::from("exiftool")
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_scratch_root() -> PathBuf {
    std::env::temp_dir()
}

fn default_keyframe_interval() -> u32 {
    DEFAULT_INTERVAL_SECS
}

fn default_match_limit() -> usize {
    3
}

fn default_match_url_template() -> String {
    "https://www.google.com/searchbyimage?image_url=SIMULATED_URL_FOR_{frame}".to_string()
}

fn default_tool_timeout() -> u64 {
    300
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_max_upload_bytes() -> usize {
    512 * 1024 * 1024
}

impl Default for ForensicsConfig {
    fn default() -> Self {
        Self {
            exiftool_path: default_exiftool_path(),
            ffmpeg_path: default_ffmpeg_path(),
            scratch_root: default_scratch_root(),
            keyframe_interval_secs: default_keyframe_interval(),
            match_limit: default_match_limit(),
            match_url_template: default_match_url_template(),
            tool_timeout_secs: default_tool_timeout(),
            bind_address: default_bind_address(),
            max_upload_bytes: default_max_upload_bytes(),
            log_dir: None,
        }
    }
}

impl ForensicsConfig {
    /// Default config file path under the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("forensic-lab").join(CONFIG_FILE))
    }

    /// Normalizes values so the pipeline never sees an unusable config.
    ///
    /// Corrects bad values instead of failing.
    pub fn normalize(&mut self) {
        self.keyframe_interval_secs = self.keyframe_interval_secs.max(1);

        if !self.match_url_template.contains(FRAME_PLACEHOLDER) {
            warn!(
                template = %self.match_url_template,
                "Match URL template has no {} placeholder, using default",
                FRAME_PLACEHOLDER
            );
            self.match_url_template = default_match_url_template();
        }

        if self.exiftool_path.as_os_str().is_empty() {
            self.exiftool_path = default_exiftool_path();
        }
        if self.ffmpeg_path.as_os_str().is_empty() {
            self.ffmpeg_path = default_ffmpeg_path();
        }
        if self.scratch_root.as_os_str().is_empty() {
            self.scratch_root = default_scratch_root();
        }
        if self.max_upload_bytes == 0 {
            self.max_upload_bytes = default_max_upload_bytes();
        }
    }

    /// Per-invocation tool deadline, `None` when disabled
    pub fn tool_timeout(&self) -> Option<Duration> {
        (self.tool_timeout_secs > 0).then(|| Duration::from_secs(self.tool_timeout_secs))
    }

    /// Read and normalize a config file, failing on unreadable or invalid JSON
    pub fn try_load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let mut config = serde_json::from_str::<ForensicsConfig>(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        config.normalize();
        Ok(config)
    }

    /// Load a config file, falling back to defaults when missing or invalid
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Self::default();
        }

        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }
}
