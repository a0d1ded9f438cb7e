//! Greedy IoU association of new detections with existing tracks.

use log::{debug, warn};

use crate::tracker::frame::Frame;
use crate::tracker::rect::{Rect, iou};
use crate::tracker::registry::TrackRegistry;

/// Round to one decimal place.
///
/// Rounds the exact binary value, ties to even, so `0.15` (stored just below
/// 0.15) becomes `0.1` and `0.25` becomes `0.2`. Matching compares the
/// rounded IoU so that scores hovering around the threshold do not flip
/// between frames.
#[inline]
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Position of the best candidate whose rounded IoU reaches `threshold`.
/// Ties resolve to the earliest candidate.
pub fn best_match(scores: &[f64], threshold: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if best.is_none_or(|(_, b)| score > b) {
            best = Some((idx, score));
        }
    }
    best.filter(|&(_, score)| round1(score) >= threshold)
        .map(|(idx, _)| idx)
}

/// Assign an id to every detection of a frame.
///
/// Detections are matched against the registry as it stood before this call:
/// tracks started for earlier detections of the same frame are not
/// candidates. An unmatched detection starts a new track right away, so new
/// ids follow detection order. A detection whose tracker cannot be started
/// yields `None`.
pub fn associate(
    registry: &mut TrackRegistry,
    detections: &[Rect],
    frame: &Frame,
    iou_threshold: f64,
) -> Vec<Option<u64>> {
    let (prev_ids, prev_boxes): (Vec<u64>, Vec<Rect>) = registry.snapshot().into_iter().unzip();

    detections
        .iter()
        .map(|det| {
            let scores = iou(det, &prev_boxes);
            if let Some(idx) = best_match(&scores, iou_threshold) {
                return Some(prev_ids[idx]);
            }
            match registry.initialize_tracker(*det, frame) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("Skipping detection {:?}: {}", det.to_tlwh(), e);
                    None
                }
            }
        })
        .collect()
}

/// Render ids as tags. Repeats of an id already emitted, and detections
/// without an id, become empty tags.
pub fn dedup_tags(ids: &[Option<u64>]) -> Vec<String> {
    let mut seen = Vec::with_capacity(ids.len());
    ids.iter()
        .map(|id| match id {
            Some(id) if !seen.contains(id) => {
                seen.push(*id);
                id.to_string()
            }
            Some(id) => {
                debug!("Track {} matched more than one detection", id);
                String::new()
            }
            None => String::new(),
        })
        .collect()
}
