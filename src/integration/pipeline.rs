//! TrackingPipeline for combining detection with tracking.

use crate::error::Result;
use crate::tracker::{Frame, MultiObjectTracker, TrackerConfig};

use super::DetectionSource;

/// Detections of one frame together with their track tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    /// Normalized `[x1, y1, x2, y2]` boxes as returned by the detector.
    pub bboxes: Vec<[f32; 4]>,
    /// One tag per box: the track id, or empty for an unlabeled duplicate.
    pub obj_tags: Vec<String>,
}

/// A combined tracker that bundles detection inference with tracking.
///
/// This struct provides a convenient way to run end-to-end tracking
/// by combining any `DetectionSource` with the `MultiObjectTracker`.
pub struct TrackingPipeline<D: DetectionSource> {
    detector: D,
    tracker: MultiObjectTracker,
}

impl<D: DetectionSource> TrackingPipeline<D> {
    /// Create a new tracking pipeline with the given detector and tracker config.
    pub fn new(detector: D, config: TrackerConfig) -> Result<Self> {
        Ok(Self::with_tracker(detector, MultiObjectTracker::new(config)?))
    }

    /// Create a new tracking pipeline with default tracker configuration.
    pub fn with_default_config(detector: D) -> Result<Self> {
        Self::new(detector, TrackerConfig::default())
    }

    pub fn with_tracker(detector: D, tracker: MultiObjectTracker) -> Self {
        Self { detector, tracker }
    }

    /// Detect objects on `frame` and tag them with track ids.
    pub fn process_frame(&mut self, frame: &Frame) -> std::result::Result<FrameOutput, D::Error> {
        let bboxes = self.detector.detect(frame)?;
        let obj_tags = self.tracker.track(frame, &bboxes);
        Ok(FrameOutput { bboxes, obj_tags })
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &MultiObjectTracker {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut MultiObjectTracker {
        &mut self.tracker
    }
}
