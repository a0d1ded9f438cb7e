//! Integration module for connecting object detectors with the tracker.
//!
//! This module provides the trait a detector implements to feed boxes into
//! tracking, a builder for normalized boxes and a pipeline that runs both on
//! every frame.

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::DetectionSource;
pub use pipeline::{FrameOutput, TrackingPipeline};
