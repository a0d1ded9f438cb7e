//! Single-object visual tracker capability and algorithm selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackingError};
use crate::tracker::frame::Frame;
use crate::tracker::mosse::{MosseParams, MosseTracker};
use crate::tracker::rect::Rect;

/// A tracker that follows one object from frame to frame on its own.
///
/// `init` is given the object's pixel box (TLWH) on the first frame it is
/// seen. Every later `update` returns the predicted box, or `None` once the
/// object can no longer be followed.
pub trait VisualTracker: Send {
    fn init(&mut self, frame: &Frame, bbox: Rect) -> Result<()>;

    fn update(&mut self, frame: &Frame) -> Result<Option<Rect>>;
}

/// Creates a fresh, uninitialized visual tracker for every new object.
pub trait TrackerFactory: Send {
    fn create(&self) -> Result<Box<dyn VisualTracker>>;
}

/// Single-object tracking algorithms known by name.
///
/// Only [`TrackerKind::Mosse`] ships with this crate; the others are accepted
/// in configuration so that custom factories can dispatch on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrackerKind {
    Boosting,
    Mil,
    Kcf,
    Tld,
    MedianFlow,
    Goturn,
    #[default]
    Mosse,
    Csrt,
}

impl TrackerKind {
    pub const ALL: [TrackerKind; 8] = [
        TrackerKind::Boosting,
        TrackerKind::Mil,
        TrackerKind::Kcf,
        TrackerKind::Tld,
        TrackerKind::MedianFlow,
        TrackerKind::Goturn,
        TrackerKind::Mosse,
        TrackerKind::Csrt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TrackerKind::Boosting => "BOOSTING",
            TrackerKind::Mil => "MIL",
            TrackerKind::Kcf => "KCF",
            TrackerKind::Tld => "TLD",
            TrackerKind::MedianFlow => "MEDIANFLOW",
            TrackerKind::Goturn => "GOTURN",
            TrackerKind::Mosse => "MOSSE",
            TrackerKind::Csrt => "CSRT",
        }
    }

    /// Whether [`TrackerKind::create`] can build this algorithm.
    pub fn is_builtin(&self) -> bool {
        matches!(self, TrackerKind::Mosse)
    }

    /// Build a tracker of this kind.
    pub fn create(&self, mosse: MosseParams) -> Result<Box<dyn VisualTracker>> {
        match self {
            TrackerKind::Mosse => Ok(Box::new(MosseTracker::new(mosse))),
            other => Err(TrackingError::UnsupportedTracker(other.name().to_string())),
        }
    }
}

impl fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TrackerKind {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        TrackerKind::ALL
            .into_iter()
            .find(|kind| kind.name() == upper)
            .ok_or_else(|| TrackingError::UnknownTracker(s.to_string()))
    }
}
