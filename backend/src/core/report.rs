//! Analysis Report
//!
//! The single value returned by the pipeline. `keyframes_extracted` is the
//! total number of sampled keyframes; only a bounded prefix of them appears
//! in `reverse_image_search_simulation`.

use serde::Serialize;

use crate::core::keyframes::KeyframeSet;
use crate::core::matching::MatchRecord;
use crate::core::metadata::MetadataResult;

/// Immutable forensic report for one upload
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisReport {
    filename: String,
    metadata: MetadataResult,
    keyframes_extracted: usize,
    reverse_image_search_simulation: Vec<MatchRecord>,
}

impl AnalysisReport {
    /// Combine the stage outcomes into a report
    pub fn assemble(
        filename: impl Into<String>,
        metadata: MetadataResult,
        keyframes: &KeyframeSet,
        matches: Vec<MatchRecord>,
    ) -> Self {
        Self {
            filename: filename.into(),
            metadata,
            keyframes_extracted: keyframes.len(),
            reverse_image_search_simulation: matches,
        }
    }

    /// Original upload filename, as supplied by the caller
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn metadata(&self) -> &MetadataResult {
        &self.metadata
    }

    /// Total keyframes sampled, independent of how many were searched
    pub fn keyframes_extracted(&self) -> usize {
        self.keyframes_extracted
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.reverse_image_search_simulation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matching::SimulatedMatcher;
    use serde_json::json;

    #[test]
    fn test_total_count_is_independent_of_matches() {
        let keyframes = KeyframeSet::new(
            (1..=7).map(|i| format!("keyframe-{:03}.jpg", i)).collect(),
        );
        let matches = SimulatedMatcher::default().simulate(keyframes.frames(), 3);

        let report = AnalysisReport::assemble(
            "clip.mp4",
            MetadataResult::failed("Exiftool failed: No output"),
            &keyframes,
            matches,
        );

        assert_eq!(report.filename(), "clip.mp4");
        assert_eq!(report.keyframes_extracted(), 7);
        assert_eq!(report.matches().len(), 3);
        assert!(report.metadata().is_error());
    }

    #[test]
    fn test_report_json_shape() {
        let report = AnalysisReport::assemble(
            "clip.mp4",
            MetadataResult::Tags(json!({"FileType": "MP4"}).as_object().unwrap().clone()),
            &KeyframeSet::new(vec!["keyframe-001.jpg".to_string()]),
            SimulatedMatcher::new("u:{frame}").simulate(&["keyframe-001.jpg".to_string()], 3),
        );

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "filename": "clip.mp4",
                "metadata": {"FileType": "MP4"},
                "keyframes_extracted": 1,
                "reverse_image_search_simulation": [
                    {"frame": "keyframe-001.jpg", "potential_matches": ["u:keyframe-001.jpg"]}
                ]
            })
        );
    }

    #[test]
    fn test_empty_report() {
        let report = AnalysisReport::assemble(
            "audio.wav",
            MetadataResult::failed("Could not parse exiftool output."),
            &KeyframeSet::empty(),
            Vec::new(),
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["keyframes_extracted"], json!(0));
        assert_eq!(value["reverse_image_search_simulation"], json!([]));
        assert_eq!(value["metadata"], json!({"Error": "Could not parse exiftool output."}));
    }
}
