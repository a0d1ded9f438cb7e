//! Owned image frame handed to the visual trackers.

use ndarray::{Array3, ArrayView3};

use crate::error::{Result, TrackingError};

/// An 8-bit image in height x width x channels layout.
///
/// One channel is treated as grayscale, three channels as BGR (the order
/// camera and video decoders usually hand frames over in).
#[derive(Debug, Clone)]
pub struct Frame {
    data: Array3<u8>,
}

impl Frame {
    /// Wrap a raw interleaved buffer.
    pub fn new(height: usize, width: usize, channels: usize, pixels: Vec<u8>) -> Result<Self> {
        let data = Array3::from_shape_vec((height, width, channels), pixels)
            .map_err(|e| TrackingError::InvalidFrame(e.to_string()))?;
        Self::from_array(data)
    }

    /// Wrap an existing HWC array.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = data.dim();
        if height == 0 || width == 0 {
            return Err(TrackingError::InvalidFrame(format!(
                "empty frame {}x{}",
                width, height
            )));
        }
        if channels != 1 && channels != 3 {
            return Err(TrackingError::InvalidFrame(format!(
                "expected 1 or 3 channels, got {}",
                channels
            )));
        }
        Ok(Self { data })
    }

    /// A single-channel frame filled with `value`.
    pub fn filled(height: usize, width: usize, value: u8) -> Self {
        Self {
            data: Array3::from_elem((height.max(1), width.max(1), 1), value),
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    /// Grayscale intensity at `(row, col)` with coordinates clamped to the
    /// frame, so reads past the border replicate the edge pixel.
    #[inline]
    pub fn gray_clamped(&self, row: isize, col: isize) -> f32 {
        let r = row.clamp(0, self.height() as isize - 1) as usize;
        let c = col.clamp(0, self.width() as isize - 1) as usize;
        if self.channels() == 1 {
            self.data[[r, c, 0]] as f32
        } else {
            let b = self.data[[r, c, 0]] as f32;
            let g = self.data[[r, c, 1]] as f32;
            let rr = self.data[[r, c, 2]] as f32;
            0.114 * b + 0.587 * g + 0.299 * rr
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_dims() {
        let frame = Frame::new(2, 3, 3, vec![0; 18]).unwrap();
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.channels(), 3);
    }

    #[test]
    fn test_frame_rejects_bad_buffer() {
        assert!(matches!(
            Frame::new(2, 3, 3, vec![0; 17]),
            Err(TrackingError::InvalidFrame(_))
        ));
        assert!(Frame::new(2, 2, 4, vec![0; 16]).is_err());
        assert!(Frame::new(0, 2, 1, vec![]).is_err());
    }

    #[test]
    fn test_gray_clamped() {
        let frame = Frame::new(1, 2, 1, vec![10, 200]).unwrap();
        assert_eq!(frame.gray_clamped(0, 0), 10.0);
        assert_eq!(frame.gray_clamped(-5, -5), 10.0);
        assert_eq!(frame.gray_clamped(3, 9), 200.0);

        let bgr = Frame::new(1, 1, 3, vec![100, 100, 100]).unwrap();
        assert_relative_eq!(bgr.gray_clamped(0, 0), 100.0, epsilon = 1e-3);
    }
}
