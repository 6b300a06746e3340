//! Ordered collection of sites representing one tracked contour.
//!
//! The model is an indexable `Vec<Site>`: passes iterate by index and write
//! back in place, and every site keeps a stable [`SiteId`] so external
//! estimators can address sites without relying on positional order.
//!
//! Sites are added only while building the model (see the `from_*`
//! constructors); passes never grow it, and removal is explicit.

mod sampling;
mod weights;

pub use weights::ValidSite;

use crate::site::{Site, SiteId, SuppressionState};
use serde::Serialize;
use std::collections::HashSet;

/// Per-state site counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCounts {
    pub valid: usize,
    pub contrast: usize,
    pub threshold: usize,
    pub robust: usize,
}

impl StateCounts {
    pub fn get(&self, state: SuppressionState) -> usize {
        match state {
            SuppressionState::Valid => self.valid,
            SuppressionState::ContrastRejected => self.contrast,
            SuppressionState::ThresholdRejected => self.threshold,
            SuppressionState::RobustRejected => self.robust,
        }
    }

    pub fn total(&self) -> usize {
        self.valid + self.contrast + self.threshold + self.robust
    }

    pub(crate) fn bump(&mut self, state: SuppressionState) {
        match state {
            SuppressionState::Valid => self.valid += 1,
            SuppressionState::ContrastRejected => self.contrast += 1,
            SuppressionState::ThresholdRejected => self.threshold += 1,
            SuppressionState::RobustRejected => self.robust += 1,
        }
    }
}

/// The discretized contour.
#[derive(Clone, Debug, Default)]
pub struct ContourModel {
    sites: Vec<Site>,
    occupied: HashSet<(isize, isize)>,
    next_id: u32,
}

impl ContourModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a site, assigning it a fresh id.
    ///
    /// Returns `None` (and drops the site) when another site already occupies
    /// the same rounded pixel.
    pub fn insert(&mut self, mut site: Site) -> Option<SiteId> {
        if !self.occupied.insert(site.pixel()) {
            return None;
        }
        let id = SiteId(self.next_id);
        self.next_id += 1;
        site.id = id;
        self.sites.push(site);
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Site> {
        self.sites.iter()
    }

    pub(crate) fn sites_mut(&mut self) -> &mut [Site] {
        &mut self.sites
    }

    pub fn get(&self, id: SiteId) -> Option<&Site> {
        self.index_of(id).map(|i| &self.sites[i])
    }

    pub(crate) fn index_of(&self, id: SiteId) -> Option<usize> {
        // Ids are assigned in increasing order and removal keeps order.
        self.sites.binary_search_by_key(&id, |s| s.id).ok()
    }

    /// Number of `Valid` sites.
    pub fn valid_count(&self) -> usize {
        self.sites.iter().filter(|s| s.is_valid()).count()
    }

    pub fn state_counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for site in &self.sites {
            counts.bump(site.state);
        }
        counts
    }

    /// Drop every non-valid site; returns how many were removed.
    pub fn remove_rejected(&mut self) -> usize {
        let before = self.sites.len();
        self.sites.retain(|s| s.is_valid());
        self.rebuild_occupancy();
        before - self.sites.len()
    }

    /// Mark every site `Valid` again (re-initialization path).
    pub fn revalidate_all(&mut self) {
        for site in &mut self.sites {
            site.revalidate();
        }
    }

    /// Re-orient every site, e.g. from a fitted line normal.
    pub fn set_uniform_angle(&mut self, angle: f32) {
        for site in &mut self.sites {
            site.angle = angle;
        }
    }

    /// Refresh the duplicate index after sites moved during a pass.
    pub(crate) fn rebuild_occupancy(&mut self) {
        self.occupied = self.sites.iter().map(Site::pixel).collect();
    }
}

impl<'a> IntoIterator for &'a ContourModel {
    type Item = &'a Site;
    type IntoIter = std::slice::Iter<'a, Site>;

    fn into_iter(self) -> Self::IntoIter {
        self.sites.iter()
    }
}
