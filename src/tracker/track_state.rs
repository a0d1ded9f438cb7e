/// Lifecycle of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No frame processed yet; the next detections all start new tracks
    #[default]
    Uninitialized,
    /// Detections are associated against the tracks of the previous frame
    Running,
}
