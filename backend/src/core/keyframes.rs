//! Keyframe Sampling Module
//!
//! Samples one still image per fixed interval of source duration using
//! ffmpeg, then lists the produced files. Success is defined by the files
//! that exist afterwards, not by the tool's exit status: a source without a
//! usable video stream legitimately yields zero keyframes.

use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;

use crate::core::config::ForensicsConfig;
use crate::core::tools::{ToolError, ToolRunner};

/// Output naming pattern; zero padding makes lexicographic order temporal
pub const KEYFRAME_PATTERN: &str = "keyframe-%03d.jpg";

/// Default seconds between sampled keyframes
pub const DEFAULT_INTERVAL_SECS: u32 = 5;

// =============================================================================
// Keyframe Set
// =============================================================================

/// Ordered filenames of every extracted keyframe
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyframeSet {
    frames: Vec<String>,
}

impl KeyframeSet {
    /// Build a set from filenames, sorting them lexicographically
    pub fn new(mut frames: Vec<String>) -> Self {
        frames.sort();
        Self { frames }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// List the regular files in `dir`
    pub fn from_dir(dir: &Path) -> std::io::Result<Self> {
        let mut frames = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                frames.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(Self::new(frames))
    }

    /// Total number of extracted keyframes
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }
}

// =============================================================================
// Sampler
// =============================================================================

/// Samples keyframes from a stored file into a directory
#[async_trait]
pub trait KeyframeSampler: Send + Sync {
    /// Sample one frame per `interval_secs` into `output_dir`. Never fails;
    /// tool failures yield whatever frames exist, possibly none.
    async fn sample(&self, file_path: &Path, output_dir: &Path, interval_secs: u32)
        -> KeyframeSet;
}

/// Keyframe sampler backed by the `ffmpeg` binary
#[derive(Debug, Clone)]
pub struct FfmpegSampler {
    runner: ToolRunner,
}

impl FfmpegSampler {
    pub fn new(runner: ToolRunner) -> Self {
        Self { runner }
    }

    pub fn from_config(config: &ForensicsConfig) -> Self {
        Self::new(
            ToolRunner::new("ffmpeg", config.ffmpeg_path.clone())
                .with_timeout(config.tool_timeout()),
        )
    }
}

/// Build the ffmpeg arguments for interval sampling
fn sampling_args(file_path: &Path, output_dir: &Path, interval_secs: u32) -> Vec<OsString> {
    vec![
        "-i".into(),
        file_path.as_os_str().to_owned(),
        "-vf".into(),
        format!("fps=1/{}", interval_secs.max(1)).into(),
        output_dir.join(KEYFRAME_PATTERN).into_os_string(),
    ]
}

#[async_trait]
impl KeyframeSampler for FfmpegSampler {
    async fn sample(
        &self,
        file_path: &Path,
        output_dir: &Path,
        interval_secs: u32,
    ) -> KeyframeSet {
        match self
            .runner
            .run(sampling_args(file_path, output_dir, interval_secs))
            .await
        {
            Ok(output) if !output.success() => {
                tracing::info!(
                    status = %output.status,
                    "Keyframe sampler exited unsuccessfully; counting produced frames only"
                );
            }
            Ok(_) => {}
            Err(e @ ToolError::TimedOut { .. }) => {
                tracing::warn!("{}; discarding partial keyframes", e);
                return KeyframeSet::empty();
            }
            Err(e) => {
                tracing::warn!("Keyframe sampler could not run: {}", e);
            }
        }

        match KeyframeSet::from_dir(output_dir) {
            Ok(set) => {
                tracing::debug!(count = set.len(), "Keyframes sampled");
                set
            }
            Err(e) => {
                tracing::warn!("Failed to list keyframe directory: {}", e);
                KeyframeSet::empty()
            }
        }
    }
}
