//! Intensity profile sampling along a site normal.
//!
//! A [`ProfileSampler`] turns a site's predicted position and normal angle into
//! a 1D sequence of edge likelihoods over offsets `-half_range..=half_range`.
//! Samples whose pixel would violate the frame margin (see [`out_of_image`])
//! carry no response, so callers never read outside the buffer.
//!
//! The default implementation, [`OrientedMaskSampler`], correlates the frame
//! with precomputed oriented step masks. [`sobel_at`] is the point gradient
//! used when sites re-estimate their orientation.

mod gradient;
mod mask;

pub use gradient::sobel_at;
pub use mask::{OrientedMask, OrientedMaskSampler};

use crate::error::SampleError;
use crate::image::ImageU8;
use crate::tracker::TrackingParams;

/// One profile query: where to look and how far along the normal.
#[derive(Clone, Copy, Debug)]
pub struct ProfileRequest {
    /// Centre of the search, `[x, y]` in pixels.
    pub center: [f32; 2],
    /// Normal angle (radians); offsets move along `(cos, sin)`.
    pub angle: f32,
    /// Number of offsets probed on each side of the centre.
    pub half_range: usize,
    /// Margin implied by the caller's parameters.
    pub half_window: usize,
}

/// A single probe along the normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileSample {
    pub offset: i32,
    pub position: [f32; 2],
    /// Signed edge response; `None` when the probe fell out of frame.
    pub response: Option<f32>,
}

/// Likelihood profile ordered from `-half_range` to `+half_range`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Profile {
    pub samples: Vec<ProfileSample>,
}

impl Profile {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Response recorded at `offset`, if that probe was in frame.
    pub fn response_at(&self, offset: i32) -> Option<f32> {
        self.samples
            .iter()
            .find(|s| s.offset == offset)
            .and_then(|s| s.response)
    }
}

/// Source of edge-likelihood profiles.
pub trait ProfileSampler {
    /// Half side of the sampling window (pixels).
    fn half_window(&self) -> usize;

    fn sample(&self, image: &ImageU8<'_>, request: &ProfileRequest)
        -> Result<Profile, SampleError>;

    /// Adapt to new tracking parameters; called by `Tracker::set_params`.
    fn reconfigure(&mut self, _params: &TrackingParams) {}
}

/// True when `(row, col)` lies within `half + 2` pixels of any image border.
#[inline]
pub fn out_of_image(row: isize, col: isize, half: usize, rows: usize, cols: usize) -> bool {
    let margin = half as isize + 2;
    !(row > margin && row < rows as isize - margin && col > margin && col < cols as isize - margin)
}

/// Rounded pixel of a sub-pixel `[x, y]` position.
#[inline]
pub fn pixel_of(p: &[f32; 2]) -> (isize, isize) {
    (p[0].round() as isize, p[1].round() as isize)
}

/// Bound check for a sub-pixel `[x, y]` position against a frame.
#[inline]
pub fn position_out_of_image(p: &[f32; 2], half: usize, image: &ImageU8<'_>) -> bool {
    if !p[0].is_finite() || !p[1].is_finite() {
        return true;
    }
    let (x, y) = pixel_of(p);
    out_of_image(y, x, half, image.h, image.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_uses_strict_inequalities() {
        // half = 3 -> margin 5: rows/cols 6..=94 are inside a 100x100 frame.
        assert!(out_of_image(50, 5, 3, 100, 100));
        assert!(!out_of_image(50, 6, 3, 100, 100));
        assert!(!out_of_image(50, 94, 3, 100, 100));
        assert!(out_of_image(50, 95, 3, 100, 100));
        assert!(out_of_image(-4, 50, 3, 100, 100));
        assert!(out_of_image(50, 1, 3, 100, 100));
    }

    #[test]
    fn non_finite_positions_are_out_of_frame() {
        let data = vec![0u8; 64 * 64];
        let img = ImageU8::packed(64, 64, &data);
        assert!(position_out_of_image(&[f32::NAN, 10.0], 1, &img));
        assert!(!position_out_of_image(&[32.0, 32.0], 1, &img));
    }

    #[test]
    fn profile_lookup_by_offset() {
        let profile = Profile {
            samples: vec![
                ProfileSample {
                    offset: -1,
                    position: [9.0, 5.0],
                    response: None,
                },
                ProfileSample {
                    offset: 0,
                    position: [10.0, 5.0],
                    response: Some(4.0),
                },
            ],
        };
        assert_eq!(profile.response_at(0), Some(4.0));
        assert_eq!(profile.response_at(-1), None);
        assert_eq!(profile.response_at(7), None);
        assert_eq!(profile.len(), 2);
        assert!(!profile.is_empty());
        assert!(Profile::default().is_empty());
    }
}
