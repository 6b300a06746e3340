//! The tracked sample point and its local search.
//!
//! A [`Site`] carries a sub-pixel position, the angle of the contour normal,
//! a [`SuppressionState`] and a robust weight. [`Site::localize`] probes the
//! frame along the normal and moves the site onto the strongest admissible
//! edge response, or records why it could not.
//!
//! Coordinates are `[x, y]` = `[column, row]` in pixels.

mod localize;
mod state;

pub use state::SuppressionState;

use serde::{Deserialize, Serialize};

/// Stable handle of a site within one contour model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SiteId(pub u32);

/// Which kind of search a pass performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// Tight search right after (re)sampling; no contrast test.
    Initialization,
    /// Per-frame search with the contrast consistency test.
    Association,
}

/// One sampled point of the tracked contour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub(crate) id: SiteId,
    pub position: [f32; 2],
    /// Position on entry of the latest search.
    pub previous_position: [f32; 2],
    /// Normal angle in radians.
    pub angle: f32,
    pub state: SuppressionState,
    /// Robust weight in [0, 1] fed back by the external estimator.
    pub weight: f32,
    /// Signed response at the last accepted search.
    pub reference_contrast: Option<f32>,
}

impl Site {
    /// A valid site with unit weight; the id is assigned on insertion.
    pub fn new(position: [f32; 2], angle: f32) -> Self {
        Self {
            id: SiteId(0),
            position,
            previous_position: position,
            angle,
            state: SuppressionState::Valid,
            weight: 1.0,
            reference_contrast: None,
        }
    }

    pub fn id(&self) -> SiteId {
        self.id
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.state.is_valid()
    }

    /// Distance moved by the latest search.
    pub fn displacement(&self) -> f32 {
        let dx = self.position[0] - self.previous_position[0];
        let dy = self.position[1] - self.previous_position[1];
        (dx * dx + dy * dy).sqrt()
    }

    /// Rounded pixel `(x, y)`.
    pub fn pixel(&self) -> (isize, isize) {
        crate::sampler::pixel_of(&self.position)
    }

    /// Return the site to `Valid` so the next pass searches it again.
    ///
    /// The reference contrast is dropped: the first search after a
    /// revalidation records a fresh one.
    pub fn revalidate(&mut self) {
        self.state = SuppressionState::Valid;
        self.weight = 1.0;
        self.reference_contrast = None;
    }
}
