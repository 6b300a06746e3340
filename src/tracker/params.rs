//! Parameters shared by every site during a tracking pass.
//!
//! Defaults suit 8-bit frames at common video resolutions: a ±4 pixel search,
//! a 7×7 oriented window and a response threshold of ten grey levels.

use crate::error::TrackingError;
use serde::{Deserialize, Serialize};

/// Knobs for the per-site search and the pass policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingParams {
    /// Offsets probed on each side of the predicted position (>= 1).
    pub search_half_range: usize,
    /// Side of the oriented sampling window; odd and >= 3.
    pub profile_width: usize,
    /// Accepted drift of `response / reference` around 1 in the association phase.
    pub contrast_tolerance: f32,
    /// Minimum absolute response (grey levels) for a candidate to count.
    pub signal_threshold: f32,
    /// Number of mask orientations precomputed over [0, π).
    pub mask_count: usize,
    /// Refine the selected offset with a parabola through its neighbours.
    pub subpixel: bool,
    /// Replace the site normal by the local Sobel direction after a match.
    pub reestimate_orientation: bool,
    /// Weight under which `reject_low_weights` suppresses a site.
    pub min_robust_weight: f32,
    /// Drop non-valid sites at the end of every `track` pass.
    pub prune_rejected: bool,
}

impl Default for TrackingParams {
    fn default() -> Self {
        Self {
            search_half_range: 4,
            profile_width: 7,
            contrast_tolerance: 0.5,
            signal_threshold: 10.0,
            mask_count: 180,
            subpixel: false,
            reestimate_orientation: false,
            min_robust_weight: 0.5,
            prune_rejected: false,
        }
    }
}

impl TrackingParams {
    /// Half side of the sampling window; also sets the frame margin.
    #[inline]
    pub fn half_window(&self) -> usize {
        self.profile_width / 2
    }

    /// Copy with a different search range.
    pub fn with_search_half_range(&self, half_range: usize) -> Self {
        Self {
            search_half_range: half_range,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), TrackingError> {
        if self.search_half_range < 1 {
            return Err(TrackingError::invalid("search_half_range must be >= 1"));
        }
        if self.profile_width < 3 || self.profile_width % 2 == 0 {
            return Err(TrackingError::invalid(format!(
                "profile_width must be odd and >= 3 (got {})",
                self.profile_width
            )));
        }
        if !self.contrast_tolerance.is_finite() || self.contrast_tolerance < 0.0 {
            return Err(TrackingError::invalid("contrast_tolerance must be finite and >= 0"));
        }
        if !self.signal_threshold.is_finite() || self.signal_threshold <= 0.0 {
            return Err(TrackingError::invalid("signal_threshold must be finite and > 0"));
        }
        if self.mask_count == 0 {
            return Err(TrackingError::invalid("mask_count must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.min_robust_weight) {
            return Err(TrackingError::invalid("min_robust_weight must lie in [0, 1]"));
        }
        Ok(())
    }
}
