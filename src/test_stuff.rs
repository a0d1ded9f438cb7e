use crate::error::Result;
use crate::tracker::{Frame, Rect, TrackerFactory, VisualTracker};

/// Holds its initial box for as long as the pixel under the box center is lit.
pub struct LitPixelTracker {
    bbox: Option<Rect>,
}

impl VisualTracker for LitPixelTracker {
    fn init(&mut self, _frame: &Frame, bbox: Rect) -> Result<()> {
        self.bbox = Some(bbox);
        Ok(())
    }

    fn update(&mut self, frame: &Frame) -> Result<Option<Rect>> {
        Ok(self.bbox.filter(|b| {
            let (cx, cy) = b.center();
            frame.gray_clamped(cy as isize, cx as isize) > 0.0
        }))
    }
}

pub struct LitPixelFactory;

impl TrackerFactory for LitPixelFactory {
    fn create(&self) -> Result<Box<dyn VisualTracker>> {
        Ok(Box::new(LitPixelTracker { bbox: None }))
    }
}

/// A 100x100 frame, lit everywhere except inside `dark` (pixel TLBR boxes).
pub fn frame_with_dark(dark: &[[usize; 4]]) -> Frame {
    let mut pixels = vec![255u8; 100 * 100];
    for &[x1, y1, x2, y2] in dark {
        for r in y1..y2 {
            for c in x1..x2 {
                pixels[r * 100 + c] = 0;
            }
        }
    }
    Frame::new(100, 100, 1, pixels).unwrap()
}

pub fn lit_frame() -> Frame {
    frame_with_dark(&[])
}
