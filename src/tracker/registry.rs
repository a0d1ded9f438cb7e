//! Insertion-ordered store of live tracks.

use log::{debug, warn};

use crate::error::Result;
use crate::tracker::frame::Frame;
use crate::tracker::rect::Rect;
use crate::tracker::track::Track;
use crate::tracker::visual::TrackerFactory;

/// Live tracks of one session, keyed by id and kept in creation order.
///
/// Ids start at 1 and are handed out sequentially; an evicted id is never
/// given to another track.
pub struct TrackRegistry {
    tracks: Vec<Track>,
    last_id: u64,
    factory: Box<dyn TrackerFactory>,
}

impl TrackRegistry {
    pub fn new(factory: Box<dyn TrackerFactory>) -> Self {
        Self {
            tracks: Vec::new(),
            last_id: 0,
            factory,
        }
    }

    /// Start a new track for `bbox` (pixel TLWH) on `frame` and return its id.
    ///
    /// On failure nothing is inserted and no id is consumed.
    pub fn initialize_tracker(&mut self, bbox: Rect, frame: &Frame) -> Result<u64> {
        let tracker = self.factory.create()?;
        let id = self.last_id + 1;
        let track = Track::start(id, tracker, frame, bbox)?;
        self.last_id = id;
        self.tracks.push(track);
        debug!("Started track {} at {:?}", id, bbox.to_tlwh());
        Ok(id)
    }

    /// Advance every tracker to `frame`, evicting the ones that lost their
    /// object. Returns the evicted ids in registry order.
    pub fn update_all(&mut self, frame: &Frame) -> Vec<u64> {
        let mut evicted = Vec::new();
        self.tracks.retain_mut(|track| match track.predict(frame) {
            Ok(true) => true,
            Ok(false) => {
                debug!("Track {} lost, evicting", track.id());
                evicted.push(track.id());
                false
            }
            Err(e) => {
                warn!("Track {} failed to update, evicting: {}", track.id(), e);
                evicted.push(track.id());
                false
            }
        });
        evicted
    }

    /// `(id, last_bbox)` of every live track, in registry order.
    pub fn snapshot(&self) -> Vec<(u64, Rect)> {
        self.tracks
            .iter()
            .map(|t| (t.id(), t.last_bbox()))
            .collect()
    }

    pub fn get(&self, id: u64) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    pub fn ids(&self) -> Vec<u64> {
        self.tracks.iter().map(Track::id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Highest id handed out so far, 0 before the first track.
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Drop every track. The id sequence continues where it was.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}
