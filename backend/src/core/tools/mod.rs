//! External Tool Integration
//!
//! Runs the command-line tools the pipeline depends on:
//! - `exiftool` for metadata extraction
//! - `ffmpeg` for keyframe sampling
//!
//! Both are invoked through [`ToolRunner`], which captures output and applies
//! an optional per-invocation deadline.

mod detection;
mod runner;

use std::time::Duration;

use crate::core::config::ForensicsConfig;

pub use detection::{detect_tool, ToolInfo};
pub use runner::{ToolOutput, ToolRunner};

/// A configured tool together with the flag that prints its version
#[derive(Debug, Clone)]
pub struct ConfiguredTool {
    pub runner: ToolRunner,
    pub version_arg: &'static str,
}

/// The external tools the pipeline needs, as configured
pub fn configured_tools(config: &ForensicsConfig) -> [ConfiguredTool; 2] {
    let timeout = config.tool_timeout();
    [
        ConfiguredTool {
            runner: ToolRunner::new("exiftool", config.exiftool_path.clone()).with_timeout(timeout),
            version_arg: "-ver",
        },
        ConfiguredTool {
            runner: ToolRunner::new("ffmpeg", config.ffmpeg_path.clone()).with_timeout(timeout),
            version_arg: "-version",
        },
    ]
}

/// Tool invocation error types
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} timed out after {}s", .timeout.as_secs())]
    TimedOut { tool: String, timeout: Duration },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },
}

impl ToolError {
    /// Display name of the tool the error refers to
    pub fn tool(&self) -> &str {
        match self {
            ToolError::Spawn { tool, .. }
            | ToolError::TimedOut { tool, .. }
            | ToolError::Failed { tool, .. } => tool,
        }
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::TimedOut {
            tool: "ffmpeg".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "ffmpeg timed out after 30s");
        assert_eq!(err.tool(), "ffmpeg");

        let err = ToolError::Failed {
            tool: "exiftool".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "File not found".to_string(),
        };
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_configured_tools_follow_config_paths() {
        let config = ForensicsConfig {
            exiftool_path: "/opt/exiftool/bin/exiftool".into(),
            ffmpeg_path: "/opt/ffmpeg/bin/ffmpeg".into(),
            ..ForensicsConfig::default()
        };

        let [exiftool, ffmpeg] = configured_tools(&config);

        assert_eq!(exiftool.runner.name(), "exiftool");
        assert_eq!(exiftool.runner.program(), std::path::Path::new("/opt/exiftool/bin/exiftool"));
        assert_eq!(exiftool.version_arg, "-ver");
        assert_eq!(ffmpeg.runner.name(), "ffmpeg");
        assert_eq!(ffmpeg.runner.program(), std::path::Path::new("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(ffmpeg.version_arg, "-version");
    }
}
