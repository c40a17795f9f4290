//! Tool Detection Module
//!
//! Verifies that a configured tool binary runs and reports its version.

use std::path::PathBuf;

use serde::Serialize;

use super::{ToolResult, ToolRunner};

/// Information about a detected tool installation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    /// Display name
    pub name: String,
    /// Program path as configured
    pub program: PathBuf,
    /// Version string reported by the tool
    pub version: String,
}

/// Run the tool with its version flag and parse the reported version
pub async fn detect_tool(runner: &ToolRunner, version_arg: &str) -> ToolResult<ToolInfo> {
    let output = runner.run_checked([version_arg]).await?;

    Ok(ToolInfo {
        name: runner.name().to_string(),
        program: runner.program().to_path_buf(),
        version: parse_version(runner.name(), &output.stdout),
    })
}

/// Parse the version from the first output line.
///
/// Handles both "ffmpeg version 6.1.1 Copyright ..." and exiftool's bare
/// "12.76". Falls back to the whole first line.
fn parse_version(name: &str, stdout: &str) -> String {
    let Some(first_line) = stdout.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return "unknown".to_string();
    };

    let prefix = format!("{} version ", name);
    if let Some(version_part) = first_line.strip_prefix(prefix.as_str()) {
        if let Some(version) = version_part.split_whitespace().next() {
            return version.to_string();
        }
    }

    first_line.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ffmpeg_version_line() {
        let out = "ffmpeg version 6.1.1-3ubuntu5 Copyright (c) 2000-2023 the FFmpeg developers\nbuilt with gcc";
        assert_eq!(parse_version("ffmpeg", out), "6.1.1-3ubuntu5");
    }

    #[test]
    fn test_parse_bare_version() {
        assert_eq!(parse_version("exiftool", "12.76\n"), "12.76");
        assert_eq!(parse_version("exiftool", "\n\n"), "unknown");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_detect_tool_reports_missing_binary() {
        let runner = ToolRunner::new("exiftool", "/nonexistent/exiftool");
        assert!(detect_tool(&runner, "-ver").await.is_err());
    }
}
