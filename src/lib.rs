#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod contour;
pub mod error;
pub mod image;
pub mod site;
pub mod tracker;

// Collaborators and helpers around the core.
pub mod angle;
pub mod config;
pub mod display;
pub mod estimator;
pub mod sampler;

// --- High-level re-exports -------------------------------------------------

pub use crate::contour::{ContourModel, StateCounts, ValidSite};
pub use crate::error::{SampleError, TrackingError};
pub use crate::site::{SearchPhase, Site, SiteId, SuppressionState};
pub use crate::tracker::{PassReport, Tracker, TrackingParams};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use moving_edges::prelude::*;
///
/// # fn main() -> Result<(), TrackingError> {
/// let (w, h) = (320usize, 240usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8::packed(w, h, &gray);
///
/// let model = ContourModel::from_line([100.0, 40.0], [100.0, 200.0], 5.0)?;
/// let mut tracker = Tracker::new(TrackingParams::default(), model)?;
/// tracker.initialize_tracking(&img)?;
/// let report = tracker.track(&img)?;
/// println!("good={} total={}", report.good, report.total);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{ContourModel, SuppressionState, Tracker, TrackingError, TrackingParams};
}
