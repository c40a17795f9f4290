//! Forensic Lab Error Definitions
//!
//! Defines the error taxonomy used by the analysis pipeline.

use std::fmt;

use thiserror::Error;

use super::tools::ToolError;

/// Pipeline stage in which an unexpected fault occurred
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    /// Writing the uploaded bytes into the workspace
    Persist,
    /// Match search over the sampled keyframes
    Matching,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Persist => "persist",
            PipelineStage::Matching => "matching",
        };
        f.write_str(name)
    }
}

/// Workspace lifecycle action that failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkspaceAction {
    Create,
    Remove,
}

impl fmt::Display for WorkspaceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceAction::Create => f.write_str("create"),
            WorkspaceAction::Remove => f.write_str("remove"),
        }
    }
}

/// Discriminant of [`ForensicsError`], for callers that branch on the kind only
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    ToolOutput,
    ToolExecution,
    Workspace,
    Pipeline,
}

/// Pipeline error types
#[derive(Error, Debug)]
pub enum ForensicsError {
    // =========================================================================
    // Stage-local errors (recovered into report data)
    // =========================================================================
    /// The tool ran but its output could not be used
    #[error("{tool} produced unusable output: {cause}")]
    ToolOutput { tool: String, cause: String },

    /// The tool could not be run, failed or exceeded its deadline
    #[error("{tool} execution failed: {cause}")]
    ToolExecution { tool: String, cause: String },

    // =========================================================================
    // Request-level errors
    // =========================================================================
    #[error("Failed to {action} workspace: {cause}")]
    Workspace {
        action: WorkspaceAction,
        cause: String,
    },

    #[error("Analysis failed during {stage} stage: {cause}")]
    Pipeline { stage: PipelineStage, cause: String },
}

/// Pipeline result type
pub type ForensicsResult<T> = Result<T, ForensicsError>;

impl ForensicsError {
    pub fn pipeline(stage: PipelineStage, cause: impl Into<String>) -> Self {
        ForensicsError::Pipeline {
            stage,
            cause: cause.into(),
        }
    }

    pub fn workspace(action: WorkspaceAction, cause: impl Into<String>) -> Self {
        ForensicsError::Workspace {
            action,
            cause: cause.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ForensicsError::ToolOutput { .. } => ErrorKind::ToolOutput,
            ForensicsError::ToolExecution { .. } => ErrorKind::ToolExecution,
            ForensicsError::Workspace { .. } => ErrorKind::Workspace,
            ForensicsError::Pipeline { .. } => ErrorKind::Pipeline,
        }
    }

    /// Whether this error aborts the request as a server-side fault.
    ///
    /// Tool errors never escape their stage, so only workspace and pipeline
    /// faults reach a caller.
    pub fn is_server_fault(&self) -> bool {
        matches!(self.kind(), ErrorKind::Workspace | ErrorKind::Pipeline)
    }
}

impl From<ToolError> for ForensicsError {
    fn from(err: ToolError) -> Self {
        ForensicsError::ToolExecution {
            tool: err.tool().to_string(),
            cause: err.to_string(),
        }
    }
}
