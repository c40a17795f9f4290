//! Workspace Management Module
//!
//! Allocates an isolated scratch directory per analysis request and
//! guarantees its removal. A [`Workspace`] is released explicitly on the
//! normal path and by its `Drop` guard on every other path (early return,
//! panic, cancelled request future), so failed analyses never leak files.

mod naming;

use std::path::{Path, PathBuf};

use crate::core::{ForensicsError, ForensicsResult, WorkspaceAction};

pub use naming::safe_file_component;

/// Name of the sub-directory holding the stored upload
pub const SOURCE_DIR: &str = "source";

/// Name of the keyframe sub-directory inside each workspace
pub const KEYFRAMES_DIR: &str = "keyframes";

/// Allocates per-request workspaces under a scratch root
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    scratch_root: PathBuf,
}

impl WorkspaceManager {
    pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
        }
    }

    /// Create a uniquely named workspace for `filename`.
    ///
    /// The directory and its sub-directories are created eagerly.
    /// Creation never reuses an existing directory.
    pub fn acquire(&self, filename: &str) -> ForensicsResult<Workspace> {
        let component = safe_file_component(filename);

        std::fs::create_dir_all(&self.scratch_root)
            .map_err(|e| ForensicsError::workspace(WorkspaceAction::Create, e.to_string()))?;

        let root = self
            .scratch_root
            .join(format!("{}-{}", component, naming::random_token()));

        std::fs::create_dir(&root)
            .map_err(|e| ForensicsError::workspace(WorkspaceAction::Create, e.to_string()))?;

        // From here on the guard owns the directory and removes it on failure.
        let mut workspace = Workspace {
            input_path: root.join(SOURCE_DIR).join(&component),
            keyframes_dir: root.join(KEYFRAMES_DIR),
            root,
            released: false,
        };

        let created = std::fs::create_dir(workspace.root.join(SOURCE_DIR))
            .and_then(|_| std::fs::create_dir(&workspace.keyframes_dir));
        if let Err(e) = created {
            let _ = workspace.release();
            return Err(ForensicsError::workspace(
                WorkspaceAction::Create,
                e.to_string(),
            ));
        }

        tracing::debug!(workspace = %workspace.root.display(), "Workspace acquired");
        Ok(workspace)
    }
}

/// A per-request scratch directory, removed when released or dropped
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    input_path: PathBuf,
    keyframes_dir: PathBuf,
    released: bool,
}

impl Workspace {
    /// Workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the uploaded bytes are stored at
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Directory the keyframe sampler writes into
    pub fn keyframes_dir(&self) -> &Path {
        &self.keyframes_dir
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Recursively remove the workspace.
    ///
    /// Idempotent: a directory that is already gone counts as success, and
    /// only the first call touches the filesystem.
    pub fn release(&mut self) -> ForensicsResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => {
                tracing::debug!(workspace = %self.root.display(), "Workspace released");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ForensicsError::workspace(
                WorkspaceAction::Remove,
                e.to_string(),
            )),
        }
    }

    /// Strip the absolute workspace root from tool-produced text
    pub fn scrub(&self, text: &str) -> String {
        naming::scrub_root(text, &self.root.to_string_lossy())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(workspace = %self.root.display(), "Failed to release workspace: {}", e);
        }
    }
}
