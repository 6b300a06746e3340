//! Injected observers for per-site pass events.
//!
//! Passes also log through the `log` facade; an observer is the structured
//! channel for callers that want per-site detail without parsing logs.

use super::PassReport;
use crate::contour::StateCounts;
use crate::error::TrackingError;
use crate::site::{Site, SiteId};

/// Sink for events emitted while a pass runs.
pub trait PassObserver {
    /// Called after `site` (at `index` in the model) was searched.
    fn on_site(&mut self, _index: usize, _site: &Site) {}
    /// Called when a site's search failed with an error.
    fn on_fault(&mut self, _id: SiteId, _error: &TrackingError) {}
    /// Called once the pass report is final.
    fn on_pass(&mut self, _report: &PassReport) {}
}

/// Default observer used by the plain pass methods.
#[derive(Default)]
pub struct NoopObserver;

impl PassObserver for NoopObserver {}

/// Observer that tallies outcomes; handy in tests and demos.
#[derive(Clone, Debug, Default)]
pub struct CountingObserver {
    pub searched: usize,
    pub outcomes: StateCounts,
    pub faults: Vec<SiteId>,
    pub passes: usize,
}

impl PassObserver for CountingObserver {
    fn on_site(&mut self, _index: usize, site: &Site) {
        self.searched += 1;
        self.outcomes.bump(site.state);
    }

    fn on_fault(&mut self, id: SiteId, _error: &TrackingError) {
        self.faults.push(id);
    }

    fn on_pass(&mut self, _report: &PassReport) {
        self.passes += 1;
    }
}
