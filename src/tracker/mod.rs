//! Pass orchestration over a contour model.
//!
//! Overview
//! - [`Tracker::initialize_tracking`] runs a tight pass (search range forced
//!   to 1, no contrast test) right after the model was sampled from geometry.
//!   Any site error aborts the pass and is returned to the caller.
//! - [`Tracker::track`] runs the per-frame association pass. A site whose
//!   search faults is isolated as `RobustRejected` and the pass continues;
//!   only an empty model, invalid parameters or a malformed frame fail the
//!   call, and those are checked before any site moves.
//! - After a pass, the valid sites are exposed with their ids to an external
//!   estimator, whose weights flow back through the `apply_*_weights` calls.
//!
//! Modules
//! - [`params`] – the shared [`TrackingParams`].
//! - `observer` – injected [`PassObserver`] sinks.
//! - `report` – the serializable [`PassReport`].

mod observer;
pub mod params;
mod report;

pub use observer::{CountingObserver, NoopObserver, PassObserver};
pub use params::TrackingParams;
pub use report::PassReport;

use crate::contour::{ContourModel, ValidSite};
use crate::display::render_overlay;
use crate::error::{SampleError, TrackingError};
use crate::image::{ImageU8, ImageView};
use crate::sampler::{OrientedMaskSampler, ProfileSampler};
use crate::site::{SearchPhase, SiteId, SuppressionState};
use image::RgbImage;
use log::{debug, warn};
use std::time::Instant;

/// Moving-edges tracker owning one contour model.
pub struct Tracker<S: ProfileSampler = OrientedMaskSampler> {
    params: TrackingParams,
    sampler: S,
    model: ContourModel,
    good: usize,
    total: usize,
    last_report: Option<PassReport>,
}

impl Tracker<OrientedMaskSampler> {
    /// Tracker with the default oriented-mask sampler.
    pub fn new(params: TrackingParams, model: ContourModel) -> Result<Self, TrackingError> {
        let sampler = OrientedMaskSampler::from_params(&params);
        Self::with_sampler(params, model, sampler)
    }
}

impl<S: ProfileSampler> Tracker<S> {
    pub fn with_sampler(
        params: TrackingParams,
        model: ContourModel,
        sampler: S,
    ) -> Result<Self, TrackingError> {
        params.validate()?;
        let total = model.len();
        let good = model.valid_count();
        Ok(Self {
            params,
            sampler,
            model,
            good,
            total,
            last_report: None,
        })
    }

    pub fn params(&self) -> &TrackingParams {
        &self.params
    }

    /// Replace the parameters between passes.
    pub fn set_params(&mut self, params: TrackingParams) -> Result<(), TrackingError> {
        params.validate()?;
        self.sampler.reconfigure(&params);
        self.params = params;
        Ok(())
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    pub fn model(&self) -> &ContourModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut ContourModel {
        &mut self.model
    }

    /// Swap in a freshly sampled model; counts reset to the new model.
    pub fn replace_model(&mut self, model: ContourModel) -> ContourModel {
        self.total = model.len();
        self.good = model.valid_count();
        self.last_report = None;
        std::mem::replace(&mut self.model, model)
    }

    /// Valid sites after the latest pass.
    pub fn good_site_count(&self) -> usize {
        self.good
    }

    /// Model size after the latest pass.
    pub fn total_site_count(&self) -> usize {
        self.total
    }

    pub fn last_report(&self) -> Option<&PassReport> {
        self.last_report.as_ref()
    }

    pub fn initialize_tracking(&mut self, image: &ImageU8<'_>) -> Result<PassReport, TrackingError> {
        self.initialize_tracking_observed(image, &mut NoopObserver)
    }

    /// Tight localization pass after (re)sampling the model.
    ///
    /// The search range is forced to 1 for this pass only; the configured
    /// parameters are not modified. The first site error aborts the pass.
    pub fn initialize_tracking_observed(
        &mut self,
        image: &ImageU8<'_>,
        observer: &mut dyn PassObserver,
    ) -> Result<PassReport, TrackingError> {
        self.params.validate()?;
        check_frame(image)?;
        let init_params = self.params.with_search_half_range(1);
        let report = match run_pass(
            &mut self.model,
            &self.sampler,
            &init_params,
            image,
            SearchPhase::Initialization,
            observer,
        ) {
            Ok(report) => report,
            Err(err) => {
                // Sites visited before the fault have moved.
                self.model.rebuild_occupancy();
                self.total = self.model.len();
                self.good = self.model.valid_count();
                return Err(err);
            }
        };
        Ok(self.finish(report, observer))
    }

    pub fn track(&mut self, image: &ImageU8<'_>) -> Result<PassReport, TrackingError> {
        self.track_observed(image, &mut NoopObserver)
    }

    /// Per-frame association pass over every valid site.
    pub fn track_observed(
        &mut self,
        image: &ImageU8<'_>,
        observer: &mut dyn PassObserver,
    ) -> Result<PassReport, TrackingError> {
        if self.model.is_empty() {
            warn!("Tracker::track called on an empty contour");
            return Err(TrackingError::NotEnoughSamples { found: 0 });
        }
        self.params.validate()?;
        check_frame(image)?;
        let report = run_pass(
            &mut self.model,
            &self.sampler,
            &self.params,
            image,
            SearchPhase::Association,
            observer,
        )?;
        Ok(self.finish(report, observer))
    }

    fn finish(&mut self, mut report: PassReport, observer: &mut dyn PassObserver) -> PassReport {
        if report.phase == SearchPhase::Association && self.params.prune_rejected {
            report.pruned = self.model.remove_rejected();
        } else {
            self.model.rebuild_occupancy();
        }
        report.total = self.model.len();
        report.good = self.model.valid_count();
        self.total = report.total;
        self.good = report.good;
        debug!(
            "Tracker pass {:?}: good={} total={} faulted={} pruned={} ({:.3} ms)",
            report.phase, report.good, report.total, report.faulted, report.pruned, report.elapsed_ms
        );
        observer.on_pass(&report);
        self.last_report = Some(report.clone());
        report
    }

    /// Valid sites with their ids, in iteration order.
    pub fn valid_snapshot(&self) -> Vec<ValidSite> {
        self.model.valid_snapshot()
    }

    pub fn apply_robust_weights(&mut self, weights: &[f32]) -> Result<(), TrackingError> {
        self.model.apply_robust_weights(weights)
    }

    pub fn apply_site_weights(&mut self, weights: &[(SiteId, f32)]) -> Result<(), TrackingError> {
        self.model.apply_site_weights(weights)
    }

    /// Suppress valid sites below `min_robust_weight`; updates the good count.
    pub fn reject_low_weights(&mut self) -> usize {
        let rejected = self.model.reject_low_weights(self.params.min_robust_weight);
        self.good = self.model.valid_count();
        rejected
    }

    /// Apply positional weights, then render the contour over `image`.
    pub fn display_with_weights(
        &mut self,
        image: &ImageU8<'_>,
        weights: &[f32],
    ) -> Result<RgbImage, TrackingError> {
        check_frame(image)?;
        self.model.apply_robust_weights(weights)?;
        Ok(render_overlay(image, &self.model)?)
    }
}

/// Frame precondition shared by every pass: pixels present and a buffer
/// covering the declared geometry.
fn check_frame(image: &ImageU8<'_>) -> Result<(), TrackingError> {
    if image.is_empty() || !image.is_consistent() {
        warn!(
            "rejecting {}x{} frame (stride {}, {} bytes)",
            image.w,
            image.h,
            image.stride,
            image.data.len()
        );
        return Err(TrackingError::Sampling(SampleError::EmptyImage));
    }
    Ok(())
}

/// One pass over the valid sites of `model`.
///
/// Initialization propagates the first site error; association converts it
/// into a `RobustRejected` state for that site alone.
fn run_pass<S: ProfileSampler + ?Sized>(
    model: &mut ContourModel,
    sampler: &S,
    params: &TrackingParams,
    image: &ImageU8<'_>,
    phase: SearchPhase,
    observer: &mut dyn PassObserver,
) -> Result<PassReport, TrackingError> {
    let start = Instant::now();
    let mut faulted = 0usize;
    for (index, site) in model.sites_mut().iter_mut().enumerate() {
        if !site.is_valid() {
            continue;
        }
        match site.localize(image, sampler, params, phase) {
            Ok(_) => observer.on_site(index, site),
            Err(err) => {
                observer.on_fault(site.id(), &err);
                if phase == SearchPhase::Initialization {
                    warn!("initialize_tracking aborted at site {}: {err}", site.id().0);
                    return Err(err);
                }
                warn!("site {} isolated after search fault: {err}", site.id().0);
                site.state = SuppressionState::RobustRejected;
                faulted += 1;
                observer.on_site(index, site);
            }
        }
    }

    let mut sum = 0.0f32;
    let mut max = 0.0f32;
    let mut valid = 0usize;
    for site in model.iter().filter(|s| s.is_valid()) {
        let d = site.displacement();
        sum += d;
        max = max.max(d);
        valid += 1;
    }

    Ok(PassReport {
        phase,
        total: model.len(),
        good: valid,
        counts: model.state_counts(),
        faulted,
        pruned: 0,
        mean_displacement: if valid > 0 { sum / valid as f32 } else { 0.0 },
        max_displacement: max,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}
