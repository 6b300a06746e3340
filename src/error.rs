//! Error types for pass-level and call-level failures.
//!
//! Per-site detection failures (no edge, contrast drift, out of frame) are not
//! errors; they are recorded as [`SuppressionState`](crate::site::SuppressionState).

use crate::site::SiteId;

/// Failures reported by a [`ProfileSampler`](crate::sampler::ProfileSampler).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleError {
    /// The sampler was built for a different window than the request implies.
    WindowMismatch { expected: usize, actual: usize },
    /// The frame has no pixels or its buffer is shorter than declared.
    EmptyImage,
    /// Centre or direction of the request is not finite.
    NonFinite,
}

impl std::fmt::Display for SampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleError::WindowMismatch { expected, actual } => write!(
                f,
                "sampler half window is {expected} but parameters imply {actual}"
            ),
            SampleError::EmptyImage => write!(f, "image is empty or truncated"),
            SampleError::NonFinite => write!(f, "non-finite profile request"),
        }
    }
}

impl std::error::Error for SampleError {}

/// Errors surfaced by sites, the contour model and the tracker.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackingError {
    /// `track` was called on a contour with no sites.
    NotEnoughSamples { found: usize },
    /// Tracking parameters or primitive geometry are out of range.
    InvalidParameters { reason: String },
    /// The profile sampler failed for one site.
    Sampling(SampleError),
    /// Positional weights do not line up with the valid sites.
    WeightCountMismatch { expected: usize, supplied: usize },
    /// A weight is not finite or lies outside [0, 1].
    InvalidWeight { index: usize, value: f32 },
    UnknownSite(SiteId),
    SiteNotValid(SiteId),
    DuplicateSite(SiteId),
}

impl TrackingError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        TrackingError::InvalidParameters {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for TrackingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingError::NotEnoughSamples { found } => {
                write!(f, "too few sites to track ({found})")
            }
            TrackingError::InvalidParameters { reason } => {
                write!(f, "invalid tracking parameters: {reason}")
            }
            TrackingError::Sampling(err) => write!(f, "profile sampling failed: {err}"),
            TrackingError::WeightCountMismatch { expected, supplied } => write!(
                f,
                "weight count mismatch ({supplied} supplied, {expected} valid sites)"
            ),
            TrackingError::InvalidWeight { index, value } => {
                write!(f, "weight #{index} = {value} is outside [0, 1]")
            }
            TrackingError::UnknownSite(id) => write!(f, "no site with id {}", id.0),
            TrackingError::SiteNotValid(id) => write!(f, "site {} is not valid", id.0),
            TrackingError::DuplicateSite(id) => write!(f, "site {} weighted twice", id.0),
        }
    }
}

impl std::error::Error for TrackingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackingError::Sampling(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SampleError> for TrackingError {
    fn from(err: SampleError) -> Self {
        TrackingError::Sampling(err)
    }
}
