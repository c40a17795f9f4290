//! Analysis Coordinator
//!
//! Sequences one analysis run:
//! 1. Acquire a workspace and store the upload in it
//! 2. Extract metadata
//! 3. Sample keyframes into the workspace
//! 4. Search a bounded prefix of the keyframes for matches
//! 5. Assemble the report and release the workspace
//!
//! Stages run strictly in order because each consumes the files of the
//! previous one. Stage-local failures become report data; anything else
//! aborts the run as [`ForensicsError::Pipeline`]. The workspace is released
//! on every path.

use std::sync::Arc;

use crate::core::config::ForensicsConfig;
use crate::core::keyframes::{FfmpegSampler, KeyframeSampler};
use crate::core::matching::{ImageMatcher, SimulatedMatcher};
use crate::core::metadata::{ExifToolExtractor, MetadataExtractor};
use crate::core::report::AnalysisReport;
use crate::core::workspace::{Workspace, WorkspaceManager};
use crate::core::{ForensicsError, ForensicsResult, PipelineStage};

/// One uploaded file awaiting analysis
#[derive(Clone, Debug)]
pub struct AnalysisRequest {
    filename: String,
    data: Vec<u8>,
}

impl AnalysisRequest {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }

    /// Original filename; untrusted, used for display and extension hints
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Runs uploads through the analysis pipeline
///
/// Immutable after construction; share it between concurrent requests with
/// an `Arc`.
pub struct AnalysisCoordinator {
    workspaces: WorkspaceManager,
    extractor: Arc<dyn MetadataExtractor>,
    sampler: Arc<dyn KeyframeSampler>,
    matcher: Arc<dyn ImageMatcher>,
    keyframe_interval_secs: u32,
    match_limit: usize,
}

impl AnalysisCoordinator {
    /// Create a coordinator backed by exiftool, ffmpeg and the simulated matcher
    pub fn new(config: &ForensicsConfig) -> Self {
        Self::with_components(
            config,
            Arc::new(ExifToolExtractor::from_config(config)),
            Arc::new(FfmpegSampler::from_config(config)),
            Arc::new(SimulatedMatcher::from_config(config)),
        )
    }

    /// Create a coordinator with explicit stage implementations
    pub fn with_components(
        config: &ForensicsConfig,
        extractor: Arc<dyn MetadataExtractor>,
        sampler: Arc<dyn KeyframeSampler>,
        matcher: Arc<dyn ImageMatcher>,
    ) -> Self {
        Self {
            workspaces: WorkspaceManager::new(config.scratch_root.clone()),
            extractor,
            sampler,
            matcher,
            keyframe_interval_secs: config.keyframe_interval_secs.max(1),
            match_limit: config.match_limit,
        }
    }

    /// Analyze one upload and return its report.
    ///
    /// The workspace never outlives this call, whatever the outcome.
    #[tracing::instrument(skip_all, fields(filename = %request.filename(), bytes = request.data().len()))]
    pub async fn analyze(&self, request: &AnalysisRequest) -> ForensicsResult<AnalysisReport> {
        let workspace = self.workspaces.acquire(request.filename())?;
        self.analyze_in(workspace, request).await
    }

    /// Run the stages inside an acquired workspace, then release it
    async fn analyze_in(
        &self,
        mut workspace: Workspace,
        request: &AnalysisRequest,
    ) -> ForensicsResult<AnalysisReport> {
        let outcome = self.run_stages(&workspace, request).await;

        // A removal failure is logged only; it must not replace the outcome.
        if let Err(e) = workspace.release() {
            tracing::warn!("{}", e);
        }

        match &outcome {
            Ok(report) => tracing::info!(
                keyframes = report.keyframes_extracted(),
                matches = report.matches().len(),
                metadata_ok = !report.metadata().is_error(),
                "Analysis complete"
            ),
            Err(e) => tracing::error!("Analysis failed: {}", e),
        }

        outcome
    }

    async fn run_stages(
        &self,
        workspace: &Workspace,
        request: &AnalysisRequest,
    ) -> ForensicsResult<AnalysisReport> {
        tokio::fs::write(workspace.input_path(), request.data())
            .await
            .map_err(|e| {
                ForensicsError::pipeline(PipelineStage::Persist, workspace.scrub(&e.to_string()))
            })?;

        let metadata = self
            .extractor
            .extract(workspace.input_path())
            .await
            .map_strings(&|s| workspace.scrub(s));

        let keyframes = self
            .sampler
            .sample(
                workspace.input_path(),
                workspace.keyframes_dir(),
                self.keyframe_interval_secs,
            )
            .await;

        let matches = self
            .matcher
            .find_matches(keyframes.frames(), self.match_limit)
            .await
            .map_err(|e| match e {
                ForensicsError::Pipeline { .. } => e,
                other => ForensicsError::pipeline(
                    PipelineStage::Matching,
                    workspace.scrub(&other.to_string()),
                ),
            })?;

        Ok(AnalysisReport::assemble(
            request.filename(),
            metadata,
            &keyframes,
            matches,
        ))
    }
}
