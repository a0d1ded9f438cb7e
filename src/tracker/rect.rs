/// Bounding box representation with format conversion utilities.
///
/// Supports two common bounding box formats:
/// - TLWH: Top-Left X, Top-Left Y, Width, Height
/// - TLBR: Top-Left X, Top-Left Y, Bottom-Right X, Bottom-Right Y
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Create a Rect centered on `(cx, cy)`.
    #[inline]
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Get the area of the bounding box. Degenerate boxes have no area.
    #[inline]
    pub fn area(&self) -> f32 {
        if self.is_degenerate() {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// True when either side is zero, negative or not a number.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Calculate Intersection over Union (IoU) with another bounding box.
    ///
    /// Computed in `f64` so threshold rounding behaves the same for every caller.
    pub fn iou(&self, other: &Rect) -> f64 {
        if self.is_degenerate() || other.is_degenerate() {
            return 0.0;
        }
        let [ax1, ay1, ax2, ay2] = self.to_tlbr().map(f64::from);
        let [bx1, by1, bx2, by2] = other.to_tlbr().map(f64::from);

        let inter_width = (ax2.min(bx2) - ax1.max(bx1)).max(0.0);
        let inter_height = (ay2.min(by2) - ay1.max(by1)).max(0.0);
        let inter_area = inter_width * inter_height;

        let union_area = (ax2 - ax1) * (ay2 - ay1) + (bx2 - bx1) * (by2 - by1) - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}

/// Convert normalized `[x1, y1, x2, y2]` boxes to pixel coordinates of a
/// `frame_height` x `frame_width` frame.
pub fn format_boxes(boxes: &[[f32; 4]], frame_height: usize, frame_width: usize) -> Vec<Rect> {
    let (h, w) = (frame_height as f32, frame_width as f32);
    boxes
        .iter()
        .map(|&[x1, y1, x2, y2]| Rect::from_tlbr(x1 * w, y1 * h, x2 * w, y2 * h))
        .collect()
}

/// IoU of `bbox` against every candidate, in candidate order.
pub fn iou(bbox: &Rect, candidates: &[Rect]) -> Vec<f64> {
    candidates.iter().map(|c| bbox.iou(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_conversions() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);

        assert_eq!(rect.to_tlwh(), [10.0, 20.0, 30.0, 40.0]);
        assert_eq!(rect.to_tlbr(), [10.0, 20.0, 40.0, 60.0]);
        assert_eq!(rect.center(), (25.0, 40.0));
        assert_eq!(rect.area(), 1200.0);
    }

    #[test]
    fn test_from_tlbr() {
        let rect = Rect::from_tlbr(10.0, 20.0, 40.0, 60.0);
        assert_eq!(rect.to_tlwh(), [10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_from_center() {
        let rect = Rect::from_center(25.0, 40.0, 30.0, 40.0);
        assert_eq!(rect.to_tlwh(), [10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_format_boxes() {
        let boxes = [[0.1, 0.2, 0.5, 0.6], [0.0, 0.0, 1.0, 1.0]];
        let px = format_boxes(&boxes, 100, 200);
        assert_eq!(px.len(), 2);
        assert_relative_eq!(px[0].x, 20.0);
        assert_relative_eq!(px[0].y, 20.0);
        assert_relative_eq!(px[0].width, 80.0);
        assert_relative_eq!(px[0].height, 40.0);
        assert_eq!(px[1].to_tlbr(), [0.0, 0.0, 200.0, 100.0]);
    }

    #[test]
    fn test_format_boxes_empty() {
        assert!(format_boxes(&[], 480, 640).is_empty());
    }

    #[test]
    fn test_iou() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);

        // Intersection: 5x5 = 25, union: 100 + 100 - 25 = 175
        assert_relative_eq!(a.iou(&b), 25.0 / 175.0, epsilon = 1e-12);
    }

    #[test]
    fn test_iou_no_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 10.0, 10.0);
        assert_eq!(a.iou(&b), 0.0);

        // touching edges share no area
        let c = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(a.iou(&c), 0.0);
    }

    #[test]
    fn test_iou_same_box() {
        let a = Rect::new(3.5, 7.25, 12.0, 9.0);
        assert_eq!(iou(&a, &[a]), vec![1.0]);
    }

    #[test]
    fn test_iou_degenerate() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let flat = Rect::new(0.0, 0.0, 10.0, 0.0);
        let inverted = Rect::from_tlbr(10.0, 10.0, 0.0, 0.0);
        assert_eq!(a.iou(&flat), 0.0);
        assert_eq!(flat.iou(&flat), 0.0);
        assert_eq!(a.iou(&inverted), 0.0);
    }

    #[test]
    fn test_iou_empty_candidates() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(iou(&a, &[]).is_empty());
    }
}
