//! Pixel-level comparison of RGBA8 buffers.
//!
//! The comparator is a pure function: given two raw pixel buffers and a
//! tolerance it produces a third buffer in which every differing pixel is
//! painted opaque red, leaving similar pixels as they were in the base
//! buffer.

/// Bytes per RGBA8 pixel.
const PIXEL_STRIDE: usize = 4;

/// The highlight written over differing pixels.
const HIGHLIGHT: [u8; PIXEL_STRIDE] = [255, 0, 0, 255];

/// Fractional threshold used when no percent value is configured (4%).
const DEFAULT_THRESHOLD_FRACTION: f64 = 0.04;

/// Maximum allowed per-channel absolute difference before a pixel counts
/// as different.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Build a tolerance from a percent value in the 0-100 range.
    ///
    /// `None` falls back to the 4% default, the same fallback applied when
    /// the threshold control does not hold a number.
    pub fn from_percent(percent: Option<f64>) -> Self {
        let fraction = percent
            .filter(|p| p.is_finite())
            .map(|p| p / 100.0)
            .unwrap_or(DEFAULT_THRESHOLD_FRACTION);
        Self(255.0 * fraction)
    }

    /// The raw per-channel tolerance in the 0-255 range.
    pub fn per_channel(&self) -> f64 {
        self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::from_percent(None)
    }
}

/// Compare two RGBA8 buffers, painting differing pixels opaque red.
///
/// The output is a copy of whichever input is longer (ties favor
/// `buffer_a`). Only pixels within the shorter buffer's extent are compared;
/// the longer tail is carried over untouched, neither flagged nor examined.
/// When the buffers come from images of different dimensions, the shared
/// byte-index space does not correspond to the same x/y positions, so the
/// comparison is lenient rather than spatially aligned.
pub fn compare(buffer_a: &[u8], buffer_b: &[u8], tolerance: Tolerance) -> Vec<u8> {
    let mut result = if buffer_a.len() >= buffer_b.len() {
        buffer_a.to_vec()
    } else {
        buffer_b.to_vec()
    };
    let shared = buffer_a.len().min(buffer_b.len());

    let mut offset = 0;
    while offset < shared {
        if !pixels_similar(buffer_a, buffer_b, offset, tolerance) {
            for (i, value) in HIGHLIGHT.iter().enumerate() {
                if let Some(slot) = result.get_mut(offset + i) {
                    *slot = *value;
                }
            }
        }
        offset += PIXEL_STRIDE;
    }
    result
}

/// Read a channel, treating indices past the end as zero.
fn channel(buffer: &[u8], index: usize) -> u8 {
    buffer.get(index).copied().unwrap_or(0)
}

fn pixels_similar(buffer_a: &[u8], buffer_b: &[u8], offset: usize, tolerance: Tolerance) -> bool {
    (0..PIXEL_STRIDE).all(|i| {
        let delta = (i16::from(channel(buffer_a, offset + i))
            - i16::from(channel(buffer_b, offset + i)))
        .abs();
        f64::from(delta) <= tolerance.per_channel()
    })
}
