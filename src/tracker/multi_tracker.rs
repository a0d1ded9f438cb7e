//! Per-frame entry point tying the registry and association together.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackingError};
use crate::tracker::association::{associate, dedup_tags};
use crate::tracker::frame::Frame;
use crate::tracker::mosse::MosseParams;
use crate::tracker::rect::{Rect, format_boxes};
use crate::tracker::registry::TrackRegistry;
use crate::tracker::track_state::SessionState;
use crate::tracker::visual::{TrackerFactory, TrackerKind, VisualTracker};

/// Configuration for the MultiObjectTracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Minimum IoU, after rounding to one decimal, for a detection to keep
    /// the id of a tracked box.
    pub iou_threshold: f64,
    pub tracker_kind: TrackerKind,
    pub mosse: MosseParams,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.1,
            tracker_kind: TrackerKind::Mosse,
            mosse: MosseParams::default(),
        }
    }
}

impl TrackerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file. Missing fields take their default.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}

impl TrackerFactory for TrackerConfig {
    fn create(&self) -> Result<Box<dyn VisualTracker>> {
        self.tracker_kind.create(self.mosse)
    }
}

/// Multi-object tracker for one video stream.
///
/// The first frame starts a track for every detection. Later frames first
/// match detections to the boxes tracked up to the previous frame, then move
/// every tracker onto the current frame and drop the ones that lost their
/// object.
pub struct MultiObjectTracker {
    config: TrackerConfig,
    registry: TrackRegistry,
    state: SessionState,
}

impl MultiObjectTracker {
    /// Tracker using the built-in algorithm named by `config.tracker_kind`.
    pub fn new(config: TrackerConfig) -> Result<Self> {
        if !config.tracker_kind.is_builtin() {
            return Err(TrackingError::UnsupportedTracker(
                config.tracker_kind.to_string(),
            ));
        }
        let factory = Box::new(config.clone());
        Ok(Self::with_factory(config, factory))
    }

    /// Tracker building its per-object trackers with `factory`.
    pub fn with_factory(config: TrackerConfig, factory: Box<dyn TrackerFactory>) -> Self {
        Self {
            config,
            registry: TrackRegistry::new(factory),
            state: SessionState::Uninitialized,
        }
    }

    /// Process one frame of normalized `[x1, y1, x2, y2]` detections.
    ///
    /// Returns one tag per detection, in input order: the track id, or an
    /// empty string when the id was already given to an earlier detection of
    /// this frame or no tracker could be started for it.
    pub fn track(&mut self, frame: &Frame, bboxes: &[[f32; 4]]) -> Vec<String> {
        let boxes = format_boxes(bboxes, frame.height(), frame.width());

        let ids = match self.state {
            SessionState::Uninitialized => {
                // nothing to match against yet, every detection starts a track
                let ids = associate(&mut self.registry, &boxes, frame, f64::INFINITY);
                self.state = SessionState::Running;
                ids
            }
            SessionState::Running => {
                associate(&mut self.registry, &boxes, frame, self.config.iou_threshold)
            }
        };
        let tags = dedup_tags(&ids);

        let evicted = self.registry.update_all(frame);
        if !evicted.is_empty() {
            debug!("Evicted tracks {:?}", evicted);
        }
        tags
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    /// Ids of live tracks, oldest first.
    pub fn track_ids(&self) -> Vec<u64> {
        self.registry.ids()
    }

    pub fn last_bbox(&self, id: u64) -> Option<Rect> {
        self.registry.get(id).map(|t| t.last_bbox())
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Forget all tracks and treat the next frame as the first one.
    /// Ids keep counting from where they were.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.state = SessionState::Uninitialized;
    }
}
