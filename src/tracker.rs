pub mod association;
mod frame;
mod mosse;
mod multi_tracker;
pub mod rect;
mod registry;
mod track;
mod track_state;
mod visual;

pub use frame::Frame;
pub use mosse::{MIN_PATCH_SIZE, MosseParams, MosseTracker};
pub use multi_tracker::{MultiObjectTracker, TrackerConfig};
pub use rect::{Rect, format_boxes, iou};
pub use registry::TrackRegistry;
pub use track::Track;
pub use track_state::SessionState;
pub use visual::{TrackerFactory, TrackerKind, VisualTracker};
