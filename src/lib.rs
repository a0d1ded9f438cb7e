//! Multi-object tracking core for a node-based vision pipeline.
//!
//! Detections arrive per frame as normalized boxes. Each object is followed by
//! its own single-object visual tracker, and new detections are associated to
//! existing objects by IoU against the previous frame's tracked boxes.

pub mod error;
pub mod integration;
pub mod tracker;

#[cfg(test)]
mod test_stuff;

pub use error::{Result, TrackingError};
pub use integration::{DetectionBuilder, DetectionSource, FrameOutput, TrackingPipeline};
pub use tracker::{
    Frame, MosseParams, MosseTracker, MultiObjectTracker, Rect, SessionState, Track,
    TrackRegistry, TrackerConfig, TrackerFactory, TrackerKind, VisualTracker,
};
