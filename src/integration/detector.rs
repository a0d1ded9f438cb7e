//! Trait for upstream object detectors.

use crate::tracker::Frame;

/// Trait for object detection backends feeding the tracker.
///
/// Implement this trait to connect any detection model to tracking. Boxes
/// are normalized `[x1, y1, x2, y2]` fractions of the frame size and must
/// already be filtered by confidence.
///
/// # Example
///
/// ```
/// use peekingduck_tracking::{DetectionSource, Frame};
///
/// struct FixedDetector;
///
/// impl DetectionSource for FixedDetector {
///     type Error = std::convert::Infallible;
///
///     fn detect(&mut self, _frame: &Frame) -> Result<Vec<[f32; 4]>, Self::Error> {
///         Ok(vec![[0.1, 0.1, 0.4, 0.5]])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on `frame` and return its detections.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<[f32; 4]>, Self::Error>;
}
