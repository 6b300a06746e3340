//! Oriented step masks and the correlation-based profile sampler.

use super::{pixel_of, out_of_image, Profile, ProfileRequest, ProfileSample, ProfileSampler};
use crate::angle::{normal_from_angle, normalize_half_pi};
use crate::error::SampleError;
use crate::image::{ImageU8, ImageView};
use crate::tracker::TrackingParams;
use std::f32::consts::PI;

/// Square step-edge mask oriented along one normal direction.
///
/// Weights are the signed distance to the edge line through the centre,
/// clamped to [-1, 1], restricted to a disc of radius `half`.
#[derive(Clone, Debug)]
pub struct OrientedMask {
    half: usize,
    weights: Vec<f32>,
    positive_sum: f32,
}

impl OrientedMask {
    pub fn new(half: usize, theta: f32) -> Self {
        let side = 2 * half + 1;
        let h = half as isize;
        let radius_sq = (half as f32 + 0.5) * (half as f32 + 0.5);
        let n = normal_from_angle(theta);
        let mut weights = vec![0.0f32; side * side];
        let mut positive_sum = 0.0f32;
        for dy in -h..=h {
            for dx in -h..=h {
                let (fx, fy) = (dx as f32, dy as f32);
                if fx * fx + fy * fy > radius_sq {
                    continue;
                }
                let w = (fx * n[0] + fy * n[1]).clamp(-1.0, 1.0);
                // Snap near-zero weights so axis-aligned masks stay exactly antisymmetric.
                let w = if w.abs() < 1e-6 { 0.0 } else { w };
                weights[(dy + h) as usize * side + (dx + h) as usize] = w;
                if w > 0.0 {
                    positive_sum += w;
                }
            }
        }
        Self {
            half,
            weights,
            positive_sum,
        }
    }

    /// Normalized correlation at pixel `(x, y)`; the caller guarantees the
    /// window lies inside the frame.
    fn correlate(&self, image: &ImageU8<'_>, x: usize, y: usize) -> f32 {
        if self.positive_sum <= 0.0 {
            return 0.0;
        }
        let side = 2 * self.half + 1;
        let mut acc = 0.0f32;
        for (ky, mask_row) in self.weights.chunks_exact(side).enumerate() {
            let row = image.row(y + ky - self.half);
            let start = x - self.half;
            for (w, &px) in mask_row.iter().zip(&row[start..start + side]) {
                if *w != 0.0 {
                    acc += w * px as f32;
                }
            }
        }
        acc / self.positive_sum
    }
}

/// Profile sampler backed by a bank of `mask_count` masks over [0, π).
///
/// A step of height `A` crossing the centre perpendicular to the site normal
/// responds with `±A`; a uniform patch responds with zero.
#[derive(Clone, Debug)]
pub struct OrientedMaskSampler {
    half_window: usize,
    masks: Vec<OrientedMask>,
}

impl OrientedMaskSampler {
    pub fn new(profile_width: usize, mask_count: usize) -> Self {
        let half_window = (profile_width / 2).max(1);
        let count = mask_count.max(1);
        let masks = (0..count)
            .map(|k| OrientedMask::new(half_window, k as f32 * PI / count as f32))
            .collect();
        Self { half_window, masks }
    }

    pub fn from_params(params: &TrackingParams) -> Self {
        Self::new(params.profile_width, params.mask_count)
    }

    pub fn mask_count(&self) -> usize {
        self.masks.len()
    }

    /// Mask whose orientation is closest to `angle` modulo π.
    pub fn mask_for(&self, angle: f32) -> &OrientedMask {
        let n = self.masks.len();
        let idx = ((normalize_half_pi(angle) / PI) * n as f32).round() as usize % n;
        &self.masks[idx]
    }
}

impl ProfileSampler for OrientedMaskSampler {
    fn half_window(&self) -> usize {
        self.half_window
    }

    fn sample(
        &self,
        image: &ImageU8<'_>,
        request: &ProfileRequest,
    ) -> Result<Profile, SampleError> {
        if request.half_window != self.half_window {
            return Err(SampleError::WindowMismatch {
                expected: self.half_window,
                actual: request.half_window,
            });
        }
        if image.is_empty() || !image.is_consistent() {
            return Err(SampleError::EmptyImage);
        }
        if !request.center[0].is_finite()
            || !request.center[1].is_finite()
            || !request.angle.is_finite()
        {
            return Err(SampleError::NonFinite);
        }

        let mask = self.mask_for(request.angle);
        let n = normal_from_angle(request.angle);
        let r = request.half_range as i32;
        let mut samples = Vec::with_capacity(2 * request.half_range + 1);
        for offset in -r..=r {
            let t = offset as f32;
            let position = [request.center[0] + t * n[0], request.center[1] + t * n[1]];
            let (x, y) = pixel_of(&position);
            let response = if out_of_image(y, x, self.half_window, image.h, image.w) {
                None
            } else {
                Some(mask.correlate(image, x as usize, y as usize))
            };
            samples.push(ProfileSample {
                offset,
                position,
                response,
            });
        }
        Ok(Profile { samples })
    }

    fn reconfigure(&mut self, params: &TrackingParams) {
        if params.half_window() != self.half_window || params.mask_count != self.masks.len() {
            *self = Self::from_params(params);
        }
    }
}
