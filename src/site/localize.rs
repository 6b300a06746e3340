//! Per-site search along the normal and the resulting state transition.

use super::{SearchPhase, Site, SuppressionState};
use crate::angle::{angle_between, angle_of, normal_from_angle, wrap_pi};
use crate::error::TrackingError;
use crate::image::ImageU8;
use crate::sampler::{position_out_of_image, sobel_at, Profile, ProfileRequest, ProfileSample, ProfileSampler};
use crate::tracker::TrackingParams;
use log::trace;
use std::f32::consts::{FRAC_PI_2, PI};

const EPS: f32 = 1e-6;
/// Sobel magnitude below which the local orientation is not trusted.
const MIN_GRADIENT_FOR_ORIENTATION: f32 = 1.0;

enum Selection {
    Accepted { sample: ProfileSample, response: f32 },
    Rejected(SuppressionState),
}

impl Site {
    /// Re-localize this site on `image`.
    ///
    /// Returns the resulting state. A site that is not `Valid` is left
    /// untouched; a site outside the frame margin is rejected without
    /// sampling. Only malformed parameters and sampler faults are errors.
    pub fn localize<S: ProfileSampler + ?Sized>(
        &mut self,
        image: &ImageU8<'_>,
        sampler: &S,
        params: &TrackingParams,
        phase: SearchPhase,
    ) -> Result<SuppressionState, TrackingError> {
        params.validate()?;
        if !self.state.is_valid() {
            return Ok(self.state);
        }

        self.previous_position = self.position;
        let half_window = params.half_window();
        if position_out_of_image(&self.position, half_window, image) {
            trace!("site {} out of frame at {:?}", self.id.0, self.position);
            self.state = SuppressionState::ThresholdRejected;
            return Ok(self.state);
        }

        let request = ProfileRequest {
            center: self.position,
            angle: self.angle,
            half_range: params.search_half_range,
            half_window,
        };
        let profile = sampler.sample(image, &request)?;

        match select_candidate(&profile, params, phase, self.reference_contrast) {
            Selection::Rejected(state) => {
                trace!("site {} rejected: {}", self.id.0, state.label());
                self.state = state;
            }
            Selection::Accepted { sample, response } => {
                self.accept(image, &profile, &sample, response, params);
            }
        }
        Ok(self.state)
    }

    fn accept(
        &mut self,
        image: &ImageU8<'_>,
        profile: &Profile,
        sample: &ProfileSample,
        response: f32,
        params: &TrackingParams,
    ) {
        let mut position = sample.position;
        if params.subpixel {
            let shift = parabolic_shift(profile, sample.offset);
            let n = normal_from_angle(self.angle);
            let refined = [position[0] + shift * n[0], position[1] + shift * n[1]];
            if !position_out_of_image(&refined, params.half_window(), image) {
                position = refined;
            }
        }
        self.position = position;
        self.reference_contrast = Some(response);

        if params.reestimate_orientation {
            let (x, y) = self.pixel();
            if let Some(g) = sobel_at(image, x, y) {
                let mag = (g[0] * g[0] + g[1] * g[1]).sqrt();
                if mag >= MIN_GRADIENT_FOR_ORIENTATION {
                    let mut angle = angle_of(&g);
                    // Keep the search direction continuous with the previous normal.
                    if angle_between(&normal_from_angle(angle), &normal_from_angle(self.angle))
                        > FRAC_PI_2
                    {
                        angle += PI;
                    }
                    self.angle = wrap_pi(angle);
                }
            }
        }
        self.state = SuppressionState::Valid;
    }
}

/// Threshold test, then the contrast test, then arg-max of |response|.
///
/// Ties prefer the offset closest to the prediction, then the lower offset.
fn select_candidate(
    profile: &Profile,
    params: &TrackingParams,
    phase: SearchPhase,
    reference: Option<f32>,
) -> Selection {
    let reference = match phase {
        SearchPhase::Association => reference.filter(|r| r.abs() > EPS),
        SearchPhase::Initialization => None,
    };

    let mut any_above_threshold = false;
    let mut best: Option<(ProfileSample, f32)> = None;
    for sample in &profile.samples {
        let Some(response) = sample.response else {
            continue;
        };
        if response.abs() < params.signal_threshold {
            continue;
        }
        any_above_threshold = true;
        if let Some(reference) = reference {
            let ratio = response / reference;
            if (ratio - 1.0).abs() > params.contrast_tolerance {
                continue;
            }
        }
        let better = match &best {
            None => true,
            Some((current, current_response)) => {
                let (a, b) = (response.abs(), current_response.abs());
                a > b || (a == b && sample.offset.abs() < current.offset.abs())
            }
        };
        if better {
            best = Some((*sample, response));
        }
    }

    match best {
        Some((sample, response)) => Selection::Accepted { sample, response },
        None if any_above_threshold => Selection::Rejected(SuppressionState::ContrastRejected),
        None => Selection::Rejected(SuppressionState::ThresholdRejected),
    }
}

/// Vertex of the parabola through |response| at `offset - 1..=offset + 1`,
/// clamped to half a sample.
fn parabolic_shift(profile: &Profile, offset: i32) -> f32 {
    let Some(f1) = profile.response_at(offset).map(f32::abs) else {
        return 0.0;
    };
    let f0 = profile.response_at(offset - 1).map_or(f1, f32::abs);
    let f2 = profile.response_at(offset + 1).map_or(f1, f32::abs);
    let denom = f0 - 2.0 * f1 + f2;
    if denom > -EPS {
        return 0.0;
    }
    (0.5 * (f0 - f2) / denom).clamp(-0.5, 0.5)
}
