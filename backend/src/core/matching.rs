//! Match Search Module
//!
//! Produces candidate-match records for a bounded prefix of the sampled
//! keyframes. [`SimulatedMatcher`] fabricates placeholder URLs; a real
//! reverse-image-search backend implements [`ImageMatcher`] the same way.

use async_trait::async_trait;
use serde::Serialize;

use crate::core::config::{ForensicsConfig, FRAME_PLACEHOLDER};
use crate::core::ForensicsResult;

/// Candidate matches found for one keyframe
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MatchRecord {
    /// Keyframe filename
    pub frame: String,
    /// Candidate match identifiers
    pub potential_matches: Vec<String>,
}

/// Searches ordered keyframes for candidate matches
#[async_trait]
pub trait ImageMatcher: Send + Sync {
    /// Search the first `limit` keyframes, returning one record per searched
    /// frame in input order.
    async fn find_matches(
        &self,
        keyframes: &[String],
        limit: usize,
    ) -> ForensicsResult<Vec<MatchRecord>>;
}

/// Placeholder matcher substituting each filename into a URL template
#[derive(Debug, Clone)]
pub struct SimulatedMatcher {
    url_template: String,
}

impl SimulatedMatcher {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
        }
    }

    pub fn from_config(config: &ForensicsConfig) -> Self {
        Self::new(config.match_url_template.clone())
    }

    /// Build the match records without any I/O
    pub fn simulate(&self, keyframes: &[String], limit: usize) -> Vec<MatchRecord> {
        keyframes
            .iter()
            .take(limit)
            .map(|frame| MatchRecord {
                frame: frame.clone(),
                potential_matches: vec![self.url_template.replace(FRAME_PLACEHOLDER, frame)],
            })
            .collect()
    }
}

impl Default for SimulatedMatcher {
    fn default() -> Self {
        Self::from_config(&ForensicsConfig::default())
    }
}

#[async_trait]
impl ImageMatcher for SimulatedMatcher {
    async fn find_matches(
        &self,
        keyframes: &[String],
        limit: usize,
    ) -> ForensicsResult<Vec<MatchRecord>> {
        Ok(self.simulate(keyframes, limit))
    }
}
