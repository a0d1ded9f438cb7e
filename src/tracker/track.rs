//! Single tracked object: identity, visual tracker and last known box.

use std::fmt;

use crate::error::Result;
use crate::tracker::frame::Frame;
use crate::tracker::rect::Rect;
use crate::tracker::visual::VisualTracker;

/// One object followed by its own visual tracker.
pub struct Track {
    id: u64,
    tracker: Box<dyn VisualTracker>,
    last_bbox: Rect,
}

impl Track {
    /// Initialize `tracker` on `frame` and wrap it under `id`.
    pub fn start(
        id: u64,
        mut tracker: Box<dyn VisualTracker>,
        frame: &Frame,
        bbox: Rect,
    ) -> Result<Self> {
        tracker.init(frame, bbox)?;
        Ok(Self {
            id,
            tracker,
            last_bbox: bbox,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Pixel box (TLWH) from the most recent successful update.
    pub fn last_bbox(&self) -> Rect {
        self.last_bbox
    }

    /// Predict the object on `frame`. Returns `false` once the object is lost,
    /// leaving `last_bbox` untouched.
    pub fn predict(&mut self, frame: &Frame) -> Result<bool> {
        match self.tracker.update(frame)? {
            Some(bbox) => {
                self.last_bbox = bbox;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("id", &self.id)
            .field("last_bbox", &self.last_bbox)
            .finish_non_exhaustive()
    }
}
