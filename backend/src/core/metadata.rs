//! Metadata Extraction Module
//!
//! Runs the metadata tool (exiftool) against a stored upload and folds every
//! outcome into a [`MetadataResult`]. Extraction never fails the pipeline:
//! a malformed or protected file yields an error marker in the report.

use std::ffi::OsStr;
use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::config::ForensicsConfig;
use crate::core::tools::ToolRunner;
use crate::core::{ForensicsError, ForensicsResult};

/// Marker recorded when the tool's output cannot be interpreted
pub const PARSE_FAILURE_MESSAGE: &str = "Could not parse exiftool output.";

// =============================================================================
// Types
// =============================================================================

/// Error marker serialized as `{"Error": "<cause>"}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MetadataFailure {
    #[serde(rename = "Error")]
    pub error: String,
}

/// Outcome of metadata extraction: extracted tags or an error marker
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataResult {
    /// Tag name to value mapping for the file
    Tags(Map<String, Value>),
    /// Human-readable cause of the failure
    Failed(MetadataFailure),
}

impl MetadataResult {
    pub fn failed(cause: impl Into<String>) -> Self {
        MetadataResult::Failed(MetadataFailure {
            error: cause.into(),
        })
    }

    pub fn tags(&self) -> Option<&Map<String, Value>> {
        match self {
            MetadataResult::Tags(tags) => Some(tags),
            MetadataResult::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MetadataResult::Tags(_) => None,
            MetadataResult::Failed(failure) => Some(&failure.error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MetadataResult::Failed(_))
    }

    /// Rewrite every string in the result (tag values and error causes)
    pub fn map_strings(self, f: &impl Fn(&str) -> String) -> Self {
        match self {
            MetadataResult::Tags(tags) => MetadataResult::Tags(
                tags.into_iter()
                    .map(|(key, value)| (key, map_value_strings(value, f)))
                    .collect(),
            ),
            MetadataResult::Failed(failure) => MetadataResult::failed(f(&failure.error)),
        }
    }
}

fn map_value_strings(value: Value, f: &impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| map_value_strings(v, f)).collect())
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, map_value_strings(v, f)))
                .collect(),
        ),
        other => other,
    }
}

// =============================================================================
// Extractor
// =============================================================================

/// Extracts metadata from a stored file
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Extract metadata. Never fails; failures become an error marker.
    async fn extract(&self, file_path: &Path) -> MetadataResult;
}

/// Metadata extractor backed by the `exiftool` binary
#[derive(Debug, Clone)]
pub struct ExifToolExtractor {
    runner: ToolRunner,
}

impl ExifToolExtractor {
    pub fn new(runner: ToolRunner) -> Self {
        Self { runner }
    }

    pub fn from_config(config: &ForensicsConfig) -> Self {
        Self::new(
            ToolRunner::new("exiftool", config.exiftool_path.clone())
                .with_timeout(config.tool_timeout()),
        )
    }
}

#[async_trait]
impl MetadataExtractor for ExifToolExtractor {
    async fn extract(&self, file_path: &Path) -> MetadataResult {
        let output = match self
            .runner
            .run([OsStr::new("-json"), file_path.as_os_str()])
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Metadata extraction could not run: {}", e);
                return MetadataResult::failed(format!("Exiftool failed: {}", e));
            }
        };

        interpret_output(output.success(), &output.stdout, &output.stderr)
    }
}

/// Fold a completed exiftool invocation into a [`MetadataResult`]
fn interpret_output(success: bool, stdout: &str, stderr: &str) -> MetadataResult {
    if !success || stdout.trim().is_empty() {
        let diagnostic = stderr.trim();
        let diagnostic = if diagnostic.is_empty() {
            "No output"
        } else {
            diagnostic
        };
        tracing::warn!(success, "Exiftool failed: {}", diagnostic);
        return MetadataResult::failed(format!("Exiftool failed: {}", diagnostic));
    }

    match parse_first_entry(stdout) {
        Ok(tags) => MetadataResult::Tags(tags),
        Err(e) => {
            tracing::warn!("{}", e);
            MetadataResult::failed(PARSE_FAILURE_MESSAGE)
        }
    }
}

/// Parse exiftool `-json` output: an array with one object per input file
fn parse_first_entry(stdout: &str) -> ForensicsResult<Map<String, Value>> {
    let entries: Vec<Map<String, Value>> =
        serde_json::from_str(stdout).map_err(|e| ForensicsError::ToolOutput {
            tool: "exiftool".to_string(),
            cause: e.to_string(),
        })?;

    entries
        .into_iter()
        .next()
        .ok_or_else(|| ForensicsError::ToolOutput {
            tool: "exiftool".to_string(),
            cause: "empty result array".to_string(),
        })
}
