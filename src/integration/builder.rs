//! Builder for normalized detection boxes from various input formats.

/// Builder producing a normalized `[x1, y1, x2, y2]` detection box.
///
/// Coordinates are fractions of the frame size unless set through
/// [`DetectionBuilder::pixels`], which normalizes them by the frame size.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionBuilder {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    clamp: bool,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Reinterpret the coordinates set so far as pixels of a
    /// `frame_width` x `frame_height` frame.
    pub fn pixels(mut self, frame_width: usize, frame_height: usize) -> Self {
        let (w, h) = (frame_width.max(1) as f32, frame_height.max(1) as f32);
        self.x1 /= w;
        self.x2 /= w;
        self.y1 /= h;
        self.y2 /= h;
        self
    }

    /// Clip the final box to the unit square.
    pub fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    /// Build the final normalized box.
    pub fn build(self) -> [f32; 4] {
        let bbox = [self.x1, self.y1, self.x2, self.y2];
        if self.clamp {
            bbox.map(|v| v.clamp(0.0, 1.0))
        } else {
            bbox
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_detection_builder() {
        let det = DetectionBuilder::new().tlbr(0.1, 0.2, 0.5, 0.8).build();
        assert_eq!(det, [0.1, 0.2, 0.5, 0.8]);
    }

    #[test]
    fn test_xywh_and_tlwh_agree() {
        let a = DetectionBuilder::new().xywh(0.5, 0.5, 0.2, 0.4).build();
        let b = DetectionBuilder::new().tlwh(0.4, 0.3, 0.2, 0.4).build();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_pixels_and_clamp() {
        let det = DetectionBuilder::new()
            .tlbr(-10.0, 50.0, 320.0, 600.0)
            .pixels(640, 480)
            .clamped()
            .build();
        assert_eq!(det[0], 0.0);
        assert_relative_eq!(det[1], 50.0 / 480.0);
        assert_relative_eq!(det[2], 0.5);
        assert_eq!(det[3], 1.0);
    }
}
