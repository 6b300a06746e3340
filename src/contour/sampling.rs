//! Building a contour model by sampling geometric primitives.

use super::ContourModel;
use crate::angle::{angle_of, wrap_pi};
use crate::error::TrackingError;
use crate::site::Site;
use std::f32::consts::{FRAC_PI_2, PI};

const EPS: f32 = 1e-6;

fn check_spacing(spacing: f32) -> Result<(), TrackingError> {
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(TrackingError::invalid(format!(
            "sample spacing must be positive (got {spacing})"
        )));
    }
    Ok(())
}

fn check_point(p: &[f32; 2]) -> Result<(), TrackingError> {
    if !p[0].is_finite() || !p[1].is_finite() {
        return Err(TrackingError::invalid("non-finite contour point"));
    }
    Ok(())
}

impl ContourModel {
    /// Sites evenly spaced along the segment `p0 → p1`, endpoints included.
    ///
    /// Every site's normal is the segment normal (tangent rotated by +π/2).
    pub fn from_line(p0: [f32; 2], p1: [f32; 2], spacing: f32) -> Result<Self, TrackingError> {
        check_spacing(spacing)?;
        let mut model = ContourModel::new();
        if !model.push_segment(p0, p1, spacing, true)? {
            return Err(TrackingError::invalid("degenerate line segment"));
        }
        Ok(model)
    }

    /// Sites around a circle at an arc step close to `spacing`.
    ///
    /// Normals point radially outwards.
    pub fn from_circle(center: [f32; 2], radius: f32, spacing: f32) -> Result<Self, TrackingError> {
        check_spacing(spacing)?;
        check_point(&center)?;
        if !radius.is_finite() || radius <= EPS {
            return Err(TrackingError::invalid(format!(
                "circle radius must be positive (got {radius})"
            )));
        }
        let count = ((2.0 * PI * radius) / spacing).round().max(3.0) as usize;
        let mut model = ContourModel::new();
        for i in 0..count {
            let theta = 2.0 * PI * i as f32 / count as f32;
            let position = [
                center[0] + radius * theta.cos(),
                center[1] + radius * theta.sin(),
            ];
            model.insert(Site::new(position, wrap_pi(theta)));
        }
        Ok(model)
    }

    /// Sites along consecutive edges of an open polyline.
    pub fn from_polyline(points: &[[f32; 2]], spacing: f32) -> Result<Self, TrackingError> {
        check_spacing(spacing)?;
        if points.len() < 2 {
            return Err(TrackingError::invalid("polyline needs at least two points"));
        }
        let mut model = ContourModel::new();
        let mut any = false;
        for (i, edge) in points.windows(2).enumerate() {
            any |= model.push_segment(edge[0], edge[1], spacing, i == 0 || !any)?;
        }
        if !any {
            return Err(TrackingError::invalid("degenerate polyline"));
        }
        Ok(model)
    }

    /// Arbitrary edge chain from `(position, normal angle)` pairs, in order.
    pub fn from_points<I>(points: I) -> Result<Self, TrackingError>
    where
        I: IntoIterator<Item = ([f32; 2], f32)>,
    {
        let mut model = ContourModel::new();
        for (position, angle) in points {
            check_point(&position)?;
            if !angle.is_finite() {
                return Err(TrackingError::invalid("non-finite normal angle"));
            }
            model.insert(Site::new(position, angle));
        }
        Ok(model)
    }

    /// Returns false when the segment is too short to sample.
    fn push_segment(
        &mut self,
        p0: [f32; 2],
        p1: [f32; 2],
        spacing: f32,
        include_start: bool,
    ) -> Result<bool, TrackingError> {
        check_point(&p0)?;
        check_point(&p1)?;
        let d = [p1[0] - p0[0], p1[1] - p0[1]];
        let length = (d[0] * d[0] + d[1] * d[1]).sqrt();
        if length < EPS {
            return Ok(false);
        }
        let dir = [d[0] / length, d[1] / length];
        let normal = wrap_pi(angle_of(&dir) + FRAC_PI_2);
        let count = (length / spacing).round().max(1.0) as usize;
        let step = length / count as f32;
        let first = if include_start { 0 } else { 1 };
        for i in first..=count {
            let t = step * i as f32;
            self.insert(Site::new([p0[0] + t * dir[0], p0[1] + t * dir[1]], normal));
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_sites_are_evenly_spaced_with_segment_normal() {
        let model = ContourModel::from_line([10.0, 20.0], [10.0, 60.0], 5.0).unwrap();
        assert_eq!(model.len(), 9);
        let sites = model.sites();
        assert_eq!(sites[0].position, [10.0, 20.0]);
        assert!((sites[8].position[1] - 60.0).abs() < 1e-4);
        for pair in sites.windows(2) {
            let dy = pair[1].position[1] - pair[0].position[1];
            assert!((dy - 5.0).abs() < 1e-4);
        }
        // Tangent points down (+y), so the normal points towards -x.
        for site in sites {
            assert!((site.angle.abs() - PI).abs() < 1e-4, "angle={}", site.angle);
        }
    }

    #[test]
    fn short_line_keeps_both_endpoints() {
        let model = ContourModel::from_line([10.0, 10.0], [12.0, 10.0], 5.0).unwrap();
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn circle_normals_are_radial() {
        let center = [50.0, 50.0];
        let model = ContourModel::from_circle(center, 20.0, 4.0).unwrap();
        assert!(model.len() >= 30);
        for site in model.iter() {
            let dx = site.position[0] - center[0];
            let dy = site.position[1] - center[1];
            let r = (dx * dx + dy * dy).sqrt();
            assert!((r - 20.0).abs() < 1e-3);
            let expected = dy.atan2(dx);
            assert!(crate::angle::wrap_pi(site.angle - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn polyline_shares_corner_site() {
        let pts = [[10.0, 10.0], [30.0, 10.0], [30.0, 30.0]];
        let model = ContourModel::from_polyline(&pts, 10.0).unwrap();
        // 3 sites on the first edge, 2 more on the second (corner shared).
        assert_eq!(model.len(), 5);
        assert!((model.sites()[2].angle - FRAC_PI_2).abs() < 1e-4);
        assert!(model.sites()[4].angle.abs() < 1e-4 || (model.sites()[4].angle.abs() - PI).abs() < 1e-4);
    }

    #[test]
    fn degenerate_geometry_is_rejected() {
        assert!(ContourModel::from_line([1.0, 1.0], [1.0, 1.0], 2.0).is_err());
        assert!(ContourModel::from_line([1.0, 1.0], [9.0, 1.0], 0.0).is_err());
        assert!(ContourModel::from_circle([0.0, 0.0], -1.0, 2.0).is_err());
        assert!(ContourModel::from_polyline(&[[0.0, 0.0]], 2.0).is_err());
        assert!(ContourModel::from_points([([f32::NAN, 0.0], 0.0)]).is_err());
    }
}
