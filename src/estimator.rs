//! Reference robust line fit over the valid sites.
//!
//! This plays the part of the external geometric collaborator in tests and
//! demos: it consumes [`ValidSite`]s, runs a Huber-weighted IRLS orthogonal
//! line fit and returns one weight per site, keyed by [`SiteId`], ready for
//! [`ContourModel::apply_site_weights`](crate::contour::ContourModel::apply_site_weights).

use crate::angle::{angle_of, normal_from_angle};
use crate::contour::ValidSite;
use crate::site::SiteId;
use log::debug;
use nalgebra::{Matrix2, SymmetricEigen, Vector2};
use serde::{Deserialize, Serialize};

const EPS: f32 = 1e-6;

/// IRLS settings for [`fit_line_irls`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineFitParams {
    /// Huber transition (pixels of orthogonal residual).
    pub huber_delta: f32,
    pub max_iters: usize,
    /// Stop once the normal and offset move less than this.
    pub tolerance: f32,
}

impl Default for LineFitParams {
    fn default() -> Self {
        Self {
            huber_delta: 1.0,
            max_iters: 10,
            tolerance: 1e-4,
        }
    }
}

/// Line `normal · p = rho` with per-site robust weights.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFit {
    /// Unit normal, oriented like the mean site normal.
    pub normal: [f32; 2],
    pub rho: f32,
    /// Weighted RMS of the orthogonal residuals.
    pub rms: f32,
    pub weights: Vec<(SiteId, f32)>,
    pub iterations: usize,
}

impl LineFit {
    pub fn normal_angle(&self) -> f32 {
        angle_of(&self.normal)
    }

    /// Signed orthogonal distance of `p` to the line.
    pub fn distance(&self, p: &[f32; 2]) -> f32 {
        self.normal[0] * p[0] + self.normal[1] * p[1] - self.rho
    }
}

fn huber_weight(residual: f32, delta: f32) -> f32 {
    let abs = residual.abs();
    if abs <= delta {
        1.0
    } else {
        delta / abs
    }
}

/// Weighted orthogonal fit: returns `(normal, rho)` or `None` when the
/// weighted scatter has no dominant direction.
fn weighted_orthogonal_fit(sites: &[ValidSite], weights: &[f32]) -> Option<(Vector2<f32>, f32)> {
    let mut sum_w = 0.0f32;
    let mut mu = Vector2::zeros();
    for (s, &w) in sites.iter().zip(weights) {
        sum_w += w;
        mu += Vector2::new(s.position[0], s.position[1]) * w;
    }
    if sum_w <= EPS {
        return None;
    }
    mu /= sum_w;

    let mut scatter = Matrix2::zeros();
    for (s, &w) in sites.iter().zip(weights) {
        let d = Vector2::new(s.position[0], s.position[1]) - mu;
        scatter += d * d.transpose() * w;
    }
    scatter /= sum_w;

    let eig = SymmetricEigen::new(scatter);
    let (lo, hi) = if eig.eigenvalues[0] <= eig.eigenvalues[1] {
        (0, 1)
    } else {
        (1, 0)
    };
    if eig.eigenvalues[hi] <= EPS {
        return None;
    }
    let normal = eig.eigenvectors.column(lo).into_owned().normalize();
    let rho = normal.dot(&mu);
    Some((normal, rho))
}

/// Huber-weighted IRLS line fit over `sites`.
///
/// Needs at least two distinct points. Weights lie in [0, 1]; sites within
/// `huber_delta` of the line get weight 1.
pub fn fit_line_irls(sites: &[ValidSite], params: &LineFitParams) -> Option<LineFit> {
    if sites.len() < 2 {
        return None;
    }
    let delta = params.huber_delta.max(EPS);
    let mut weights = vec![1.0f32; sites.len()];
    let mut current: Option<(Vector2<f32>, f32)> = None;
    let mut iterations = 0;

    for _ in 0..params.max_iters.max(1) {
        iterations += 1;
        let (mut normal, mut rho) = weighted_orthogonal_fit(sites, &weights)?;
        if let Some((prev_n, _)) = current {
            // Keep a consistent sign so the convergence test is meaningful.
            if normal.dot(&prev_n) < 0.0 {
                normal = -normal;
                rho = -rho;
            }
        }
        for (w, s) in weights.iter_mut().zip(sites) {
            let r = normal.x * s.position[0] + normal.y * s.position[1] - rho;
            *w = huber_weight(r, delta);
        }
        let converged = current.is_some_and(|(prev_n, prev_rho)| {
            (normal - prev_n).norm() < params.tolerance
                && (rho - prev_rho).abs() < params.tolerance
        });
        current = Some((normal, rho));
        if converged {
            break;
        }
    }

    let (mut normal, mut rho) = current?;
    let mean_normal = sites.iter().fold(Vector2::zeros(), |acc: Vector2<f32>, s| {
        let n = normal_from_angle(s.angle);
        acc + Vector2::new(n[0], n[1])
    });
    if normal.dot(&mean_normal) < 0.0 {
        normal = -normal;
        rho = -rho;
    }

    let mut sum_w = 0.0f32;
    let mut sum_r2 = 0.0f32;
    for (s, &w) in sites.iter().zip(&weights) {
        let r = normal.x * s.position[0] + normal.y * s.position[1] - rho;
        sum_w += w;
        sum_r2 += w * r * r;
    }
    let rms = if sum_w > EPS { (sum_r2 / sum_w).sqrt() } else { 0.0 };
    debug!(
        "fit_line_irls: n={} iterations={} rms={:.3}",
        sites.len(),
        iterations,
        rms
    );

    Some(LineFit {
        normal: [normal.x, normal.y],
        rho,
        rms,
        weights: sites.iter().map(|s| s.id).zip(weights).collect(),
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(id: u32, x: f32, y: f32) -> ValidSite {
        ValidSite {
            id: SiteId(id),
            position: [x, y],
            angle: 0.0,
        }
    }

    #[test]
    fn vertical_line_with_one_outlier() {
        let mut sites: Vec<ValidSite> = (0..10).map(|i| site(i, 40.0, 10.0 + 3.0 * i as f32)).collect();
        sites.push(site(10, 48.0, 25.0));
        let fit = fit_line_irls(&sites, &LineFitParams::default()).unwrap();
        assert!((fit.normal[0] - 1.0).abs() < 1e-2, "normal={:?}", fit.normal);
        assert!((fit.rho - 40.0).abs() < 0.5, "rho={}", fit.rho);
        let (outlier_id, outlier_w) = fit.weights[10];
        assert_eq!(outlier_id, SiteId(10));
        assert!(outlier_w < 0.3, "outlier weight {outlier_w}");
        for &(_, w) in &fit.weights[..10] {
            assert!(w > 0.9);
        }
        assert!(fit.distance(&[40.0, 100.0]).abs() < 0.5);
        assert!(fit.normal_angle().abs() < 1e-2);
    }

    #[test]
    fn degenerate_inputs_return_none() {
        assert!(fit_line_irls(&[site(0, 1.0, 1.0)], &LineFitParams::default()).is_none());
        let same = [site(0, 5.0, 5.0), site(1, 5.0, 5.0)];
        assert!(fit_line_irls(&same, &LineFitParams::default()).is_none());
    }

    #[test]
    fn huber_weight_basic() {
        assert!((huber_weight(0.5, 1.0) - 1.0).abs() < 1e-6);
        assert!((huber_weight(-4.0, 1.0) - 0.25).abs() < 1e-6);
    }
}
