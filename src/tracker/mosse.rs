//! MOSSE (Minimum Output Sum of Squared Error) correlation-filter tracker.
//!
//! The filter is learned in the frequency domain from a grayscale patch around
//! the object. Each update correlates the filter with the patch at the previous
//! location, moves to the response peak and folds the new appearance into the
//! filter with a running average. A weak peak means the object was lost.

use std::sync::Arc;

use ndarray::{Array2, Zip};
use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackingError};
use crate::tracker::frame::Frame;
use crate::tracker::rect::Rect;
use crate::tracker::visual::VisualTracker;

/// Patches smaller than this on either side cannot hold a usable filter.
pub const MIN_PATCH_SIZE: usize = 4;

const EPS: f32 = 1e-5;

/// Log-intensity spread under which a patch is treated as featureless.
const FLAT_STD: f32 = 1e-4;

/// Rotation (radians) and scale of the extra training samples used at init.
const PERTURBATIONS: [(f32, f32); 8] = [
    (-0.05, 1.0),
    (0.05, 1.0),
    (0.0, 0.97),
    (0.0, 1.03),
    (-0.03, 0.98),
    (0.03, 1.02),
    (-0.03, 1.02),
    (0.03, 0.98),
];

/// Tuning knobs of the MOSSE filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosseParams {
    /// Weight of the newest appearance in the running filter average.
    pub learning_rate: f32,
    /// Peak-to-sidelobe ratio below which the object counts as lost.
    pub psr_threshold: f32,
    /// Standard deviation of the desired Gaussian response, in pixels.
    pub gaussian_sigma: f32,
}

impl Default for MosseParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            psr_threshold: 5.7,
            gaussian_sigma: 2.0,
        }
    }
}

/// Forward and inverse 2-D transforms for one patch size.
struct Fft2 {
    height: usize,
    width: usize,
    row_forward: Arc<dyn Fft<f32>>,
    row_inverse: Arc<dyn Fft<f32>>,
    col_forward: Arc<dyn Fft<f32>>,
    col_inverse: Arc<dyn Fft<f32>>,
}

impl Fft2 {
    fn new(height: usize, width: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            height,
            width,
            row_forward: planner.plan_fft_forward(width),
            row_inverse: planner.plan_fft_inverse(width),
            col_forward: planner.plan_fft_forward(height),
            col_inverse: planner.plan_fft_inverse(height),
        }
    }

    fn forward(&self, patch: &Array2<f32>) -> Array2<Complex32> {
        let buffer = patch.iter().map(|&v| Complex32::new(v, 0.0)).collect();
        self.transform(buffer, false)
    }

    /// Inverse transform keeping only the real part, scaled by 1/N.
    fn inverse_real(&self, spectrum: &Array2<Complex32>) -> Array2<f32> {
        let scale = (self.height * self.width) as f32;
        self.transform(spectrum.iter().copied().collect(), true)
            .mapv(|v| v.re / scale)
    }

    fn transform(&self, mut buffer: Vec<Complex32>, inverse: bool) -> Array2<Complex32> {
        let (h, w) = (self.height, self.width);
        let (rows, cols) = if inverse {
            (&self.row_inverse, &self.col_inverse)
        } else {
            (&self.row_forward, &self.col_forward)
        };
        // buffer holds h rows of w samples each
        rows.process(&mut buffer);
        let mut transposed: Vec<Complex32> = (0..w * h).map(|i| buffer[(i % h) * w + i / h]).collect();
        cols.process(&mut transposed);
        Array2::from_shape_fn((h, w), |(r, c)| transposed[c * h + r])
    }
}

struct FilterState {
    center: (f32, f32),
    width: usize,
    height: usize,
    fft: Fft2,
    window: Array2<f32>,
    target: Array2<Complex32>,
    numerator: Array2<Complex32>,
    denominator: Array2<f32>,
    filter: Array2<Complex32>,
}

impl FilterState {
    fn refresh_filter(&mut self) {
        Zip::from(&mut self.filter)
            .and(&self.numerator)
            .and(&self.denominator)
            .for_each(|h, &a, &b| *h = a / (b + EPS));
    }

    fn spectrum(&self, patch: &Array2<f32>) -> Array2<Complex32> {
        self.fft.forward(&preprocess(patch, &self.window))
    }

    /// `G * conj(F)` and `|F|^2` for one training sample.
    fn sample_terms(&self, spectrum: &Array2<Complex32>) -> (Array2<Complex32>, Array2<f32>) {
        let numerator = Zip::from(&self.target)
            .and(spectrum)
            .map_collect(|&g, &f| g * f.conj());
        let denominator = spectrum.mapv(|f| f.norm_sqr());
        (numerator, denominator)
    }

    fn bbox(&self) -> Rect {
        Rect::from_center(
            self.center.0,
            self.center.1,
            self.width as f32,
            self.height as f32,
        )
    }
}

/// Single-object tracker built on a MOSSE correlation filter.
pub struct MosseTracker {
    params: MosseParams,
    state: Option<FilterState>,
}

impl MosseTracker {
    pub fn new(params: MosseParams) -> Self {
        Self {
            params,
            state: None,
        }
    }

    pub fn params(&self) -> &MosseParams {
        &self.params
    }

    /// Current estimate of the tracked box, if initialized.
    pub fn bbox(&self) -> Option<Rect> {
        self.state.as_ref().map(FilterState::bbox)
    }
}

impl Default for MosseTracker {
    fn default() -> Self {
        Self::new(MosseParams::default())
    }
}

impl VisualTracker for MosseTracker {
    fn init(&mut self, frame: &Frame, bbox: Rect) -> Result<()> {
        let width = bbox.width.round();
        let height = bbox.height.round();
        if !(width >= MIN_PATCH_SIZE as f32 && height >= MIN_PATCH_SIZE as f32) {
            return Err(TrackingError::InvalidBox {
                bbox: bbox.to_tlwh(),
                reason: "box is too small for a correlation filter",
            });
        }
        if width > frame.width() as f32 || height > frame.height() as f32 {
            return Err(TrackingError::InvalidBox {
                bbox: bbox.to_tlwh(),
                reason: "box is larger than the frame",
            });
        }
        let center = bbox.center();
        if !inside(frame, center) {
            return Err(TrackingError::InvalidBox {
                bbox: bbox.to_tlwh(),
                reason: "box center lies outside the frame",
            });
        }
        let (width, height) = (width as usize, height as usize);

        let window = hann_window(height, width);
        let fft = Fft2::new(height, width);
        let target = fft.forward(&gaussian_response(height, width, self.params.gaussian_sigma));
        let mut state = FilterState {
            center,
            width,
            height,
            fft,
            window,
            target,
            numerator: Array2::zeros((height, width)),
            denominator: Array2::zeros((height, width)),
            filter: Array2::zeros((height, width)),
        };

        let patch = crop(frame, center, width, height);
        let samples = std::iter::once(patch.clone())
            .chain(PERTURBATIONS.iter().map(|&(angle, scale)| warp(&patch, angle, scale)));
        for sample in samples {
            let spectrum = state.spectrum(&sample);
            let (a, b) = state.sample_terms(&spectrum);
            state.numerator += &a;
            state.denominator += &b;
        }
        state.refresh_filter();

        self.state = Some(state);
        Ok(())
    }

    fn update(&mut self, frame: &Frame) -> Result<Option<Rect>> {
        let state = self.state.as_mut().ok_or(TrackingError::UninitializedTracker)?;
        let (width, height) = (state.width, state.height);

        let patch = crop(frame, state.center, width, height);
        let spectrum = state.spectrum(&patch);
        let product = Zip::from(&spectrum)
            .and(&state.filter)
            .map_collect(|&f, &h| f * h);
        let response = state.fft.inverse_real(&product);

        let Some((peak, (row, col))) = peak(&response) else {
            return Ok(None);
        };
        let n = response.len() as f32;
        let mean = response.sum() / n;
        let std = (response.mapv(|v| (v - mean) * (v - mean)).sum() / n).sqrt();
        let psr = (peak - mean) / (std + EPS);
        if !psr.is_finite() || psr < self.params.psr_threshold {
            return Ok(None);
        }

        let dx = col as f32 - (width / 2) as f32;
        let dy = row as f32 - (height / 2) as f32;
        let center = (state.center.0 + dx, state.center.1 + dy);
        if !inside(frame, center) {
            return Ok(None);
        }
        state.center = center;

        let patch = crop(frame, center, width, height);
        let spectrum = state.spectrum(&patch);
        let (a, b) = state.sample_terms(&spectrum);
        let rate = self.params.learning_rate;
        Zip::from(&mut state.numerator)
            .and(&a)
            .for_each(|n, &s| *n = *n * (1.0 - rate) + s * rate);
        Zip::from(&mut state.denominator)
            .and(&b)
            .for_each(|d, &s| *d = *d * (1.0 - rate) + s * rate);
        state.refresh_filter();

        Ok(Some(state.bbox()))
    }
}

fn inside(frame: &Frame, (cx, cy): (f32, f32)) -> bool {
    cx >= 0.0 && cy >= 0.0 && cx < frame.width() as f32 && cy < frame.height() as f32
}

/// Grayscale patch of `width` x `height` centered on `center`.
fn crop(frame: &Frame, (cx, cy): (f32, f32), width: usize, height: usize) -> Array2<f32> {
    let x0 = (cx - width as f32 / 2.0).round() as isize;
    let y0 = (cy - height as f32 / 2.0).round() as isize;
    Array2::from_shape_fn((height, width), |(r, c)| {
        frame.gray_clamped(y0 + r as isize, x0 + c as isize)
    })
}

/// Rotate and scale `patch` about its center, nearest-neighbour sampled.
fn warp(patch: &Array2<f32>, angle: f32, scale: f32) -> Array2<f32> {
    let (h, w) = patch.dim();
    let (cy, cx) = ((h as f32 - 1.0) / 2.0, (w as f32 - 1.0) / 2.0);
    let (sin, cos) = angle.sin_cos();
    Array2::from_shape_fn((h, w), |(r, c)| {
        let (dx, dy) = (c as f32 - cx, r as f32 - cy);
        let sx = (cos * dx + sin * dy) / scale + cx;
        let sy = (-sin * dx + cos * dy) / scale + cy;
        let sr = (sy.round() as isize).clamp(0, h as isize - 1) as usize;
        let sc = (sx.round() as isize).clamp(0, w as isize - 1) as usize;
        patch[[sr, sc]]
    })
}

/// Log transform, zero mean / unit variance, then the cosine window.
fn preprocess(patch: &Array2<f32>, window: &Array2<f32>) -> Array2<f32> {
    let logged = patch.mapv(|v| (v + 1.0).ln());
    let n = logged.len() as f32;
    let mean = logged.sum() / n;
    let std = (logged.mapv(|v| (v - mean) * (v - mean)).sum() / n).sqrt();
    if std < FLAT_STD {
        return Array2::zeros(patch.dim());
    }
    (logged - mean) / (std + EPS) * window
}

fn hann_window(height: usize, width: usize) -> Array2<f32> {
    let hann = |i: usize, n: usize| {
        0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (n as f32 - 1.0)).cos())
    };
    Array2::from_shape_fn((height, width), |(r, c)| hann(r, height) * hann(c, width))
}

/// Desired correlation output: a Gaussian peaked at the patch center.
fn gaussian_response(height: usize, width: usize, sigma: f32) -> Array2<f32> {
    let (cy, cx) = ((height / 2) as f32, (width / 2) as f32);
    let denom = 2.0 * sigma * sigma;
    Array2::from_shape_fn((height, width), |(r, c)| {
        let (dy, dx) = (r as f32 - cy, c as f32 - cx);
        (-(dx * dx + dy * dy) / denom).exp()
    })
}

/// Maximum value and its `(row, col)`; first occurrence wins.
fn peak(response: &Array2<f32>) -> Option<(f32, (usize, usize))> {
    let mut best: Option<(f32, (usize, usize))> = None;
    for (idx, &v) in response.indexed_iter() {
        if best.is_none_or(|(b, _)| v > b) {
            best = Some((v, idx));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// A few smooth blobs on a dark background, shifted by `(dx, dy)`.
    fn blob_frame(dx: f32, dy: f32) -> Frame {
        const BLOBS: [(f32, f32, f32); 6] = [
            (70.0, 72.0, 180.0),
            (84.0, 66.0, 120.0),
            (76.0, 88.0, 200.0),
            (92.0, 84.0, 90.0),
            (66.0, 94.0, 150.0),
            (90.0, 98.0, 170.0),
        ];
        let (h, w) = (160, 160);
        let mut pixels = Vec::with_capacity(h * w);
        for r in 0..h {
            for c in 0..w {
                let mut v = 20.0;
                for &(bx, by, amp) in &BLOBS {
                    let ddx = c as f32 - (bx + dx);
                    let ddy = r as f32 - (by + dy);
                    v += amp * (-(ddx * ddx + ddy * ddy) / 32.0).exp();
                }
                pixels.push(v.min(255.0) as u8);
            }
        }
        Frame::new(h, w, 1, pixels).unwrap()
    }

    #[test]
    fn test_hann_window_edges() {
        let win = hann_window(8, 8);
        assert_abs_diff_eq!(win[[0, 0]], 0.0, epsilon = 1e-6);
        assert!(win[[4, 4]] > 0.8);
    }

    #[test]
    fn test_gaussian_peak_at_center() {
        let g = gaussian_response(9, 12, 2.0);
        assert_eq!(peak(&g).map(|(_, idx)| idx), Some((4, 6)));
        assert_abs_diff_eq!(g[[4, 6]], 1.0);
    }

    #[test]
    fn test_fft_round_trip() {
        let fft = Fft2::new(6, 5);
        let patch = Array2::from_shape_fn((6, 5), |(r, c)| (r * 5 + c) as f32);
        let back = fft.inverse_real(&fft.forward(&patch));
        for (a, b) in patch.iter().zip(back.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_rejects_tiny_box() {
        let frame = blob_frame(0.0, 0.0);
        let mut tracker = MosseTracker::default();
        let err = tracker.init(&frame, Rect::new(10.0, 10.0, 2.0, 30.0));
        assert!(matches!(err, Err(TrackingError::InvalidBox { .. })));
    }

    #[test]
    fn test_rejects_box_outside_frame() {
        let frame = blob_frame(0.0, 0.0);
        let mut tracker = MosseTracker::default();
        assert!(tracker.init(&frame, Rect::new(500.0, 10.0, 20.0, 20.0)).is_err());
    }

    #[test]
    fn test_rejects_box_larger_than_frame() {
        let frame = Frame::filled(40, 60, 100);
        let mut tracker = MosseTracker::default();
        let err = tracker.init(&frame, Rect::new(0.0, 0.0, 1920.0, 1080.0));
        assert!(matches!(err, Err(TrackingError::InvalidBox { .. })));
        assert!(tracker.bbox().is_none());
        assert!(tracker.init(&frame, Rect::new(0.0, 0.0, 60.0, 40.0)).is_ok());
    }

    #[test]
    fn test_update_before_init() {
        let frame = blob_frame(0.0, 0.0);
        let mut tracker = MosseTracker::default();
        assert!(matches!(
            tracker.update(&frame),
            Err(TrackingError::UninitializedTracker)
        ));
    }

    #[test]
    fn test_follows_static_object() {
        let frame = blob_frame(0.0, 0.0);
        let bbox = Rect::new(56.0, 56.0, 48.0, 48.0);
        let mut tracker = MosseTracker::default();
        tracker.init(&frame, bbox).unwrap();

        let next = tracker.update(&frame).unwrap().expect("object should be found");
        assert_abs_diff_eq!(next.x, bbox.x, epsilon = 1.0);
        assert_abs_diff_eq!(next.y, bbox.y, epsilon = 1.0);
        assert_eq!(next.width, bbox.width);
        assert_eq!(next.height, bbox.height);
    }

    #[test]
    fn test_follows_translation() {
        let bbox = Rect::new(56.0, 56.0, 48.0, 48.0);
        let mut tracker = MosseTracker::default();
        tracker.init(&blob_frame(0.0, 0.0), bbox).unwrap();

        let next = tracker
            .update(&blob_frame(3.0, 2.0))
            .unwrap()
            .expect("object should be found");
        assert_abs_diff_eq!(next.x, bbox.x + 3.0, epsilon = 1.0);
        assert_abs_diff_eq!(next.y, bbox.y + 2.0, epsilon = 1.0);
    }

    #[test]
    fn test_loses_object_on_blank_frame() {
        let bbox = Rect::new(56.0, 56.0, 48.0, 48.0);
        let mut tracker = MosseTracker::default();
        tracker.init(&blob_frame(0.0, 0.0), bbox).unwrap();

        assert_eq!(tracker.update(&Frame::filled(160, 160, 20)).unwrap(), None);
    }

    #[test]
    fn test_deterministic() {
        let bbox = Rect::new(56.0, 56.0, 48.0, 48.0);
        let run = || {
            let mut tracker = MosseTracker::default();
            tracker.init(&blob_frame(0.0, 0.0), bbox).unwrap();
            tracker.update(&blob_frame(2.0, -2.0)).unwrap()
        };
        assert_eq!(run(), run());
    }
}
