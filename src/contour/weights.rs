//! Exchange with the external robust estimator.
//!
//! After a pass, [`ContourModel::valid_snapshot`] hands out the valid sites
//! together with their ids. The estimator answers either with `(id, weight)`
//! pairs ([`ContourModel::apply_site_weights`]) or with one weight per valid
//! site in snapshot order ([`ContourModel::apply_robust_weights`]). Both
//! validate everything before writing anything.

use super::ContourModel;
use crate::error::TrackingError;
use crate::site::{SiteId, SuppressionState};
use serde::Serialize;
use std::collections::HashSet;

/// Read-only view of one valid site for the estimator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidSite {
    pub id: SiteId,
    pub position: [f32; 2],
    pub angle: f32,
}

fn check_weight(index: usize, value: f32) -> Result<(), TrackingError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TrackingError::InvalidWeight { index, value })
    }
}

impl ContourModel {
    /// Valid sites in iteration order.
    pub fn valid_snapshot(&self) -> Vec<ValidSite> {
        self.sites
            .iter()
            .filter(|s| s.is_valid())
            .map(|s| ValidSite {
                id: s.id,
                position: s.position,
                angle: s.angle,
            })
            .collect()
    }

    /// Assign `weights[k]` to the k-th valid site.
    ///
    /// The length must equal the number of valid sites; on any mismatch or
    /// out-of-range weight nothing is written.
    pub fn apply_robust_weights(&mut self, weights: &[f32]) -> Result<(), TrackingError> {
        let expected = self.valid_count();
        if weights.len() != expected {
            return Err(TrackingError::WeightCountMismatch {
                expected,
                supplied: weights.len(),
            });
        }
        for (index, &w) in weights.iter().enumerate() {
            check_weight(index, w)?;
        }
        for (site, &w) in self
            .sites
            .iter_mut()
            .filter(|s| s.is_valid())
            .zip(weights)
        {
            site.weight = w;
        }
        Ok(())
    }

    /// Assign weights by site id. Ids must name distinct, currently valid
    /// sites; sites not mentioned keep their weight.
    pub fn apply_site_weights(&mut self, weights: &[(SiteId, f32)]) -> Result<(), TrackingError> {
        let mut seen = HashSet::with_capacity(weights.len());
        let mut targets = Vec::with_capacity(weights.len());
        for (index, &(id, w)) in weights.iter().enumerate() {
            check_weight(index, w)?;
            let i = self.index_of(id).ok_or(TrackingError::UnknownSite(id))?;
            if !self.sites[i].is_valid() {
                return Err(TrackingError::SiteNotValid(id));
            }
            if !seen.insert(id) {
                return Err(TrackingError::DuplicateSite(id));
            }
            targets.push((i, w));
        }
        for (i, w) in targets {
            self.sites[i].weight = w;
        }
        Ok(())
    }

    /// Suppress valid sites whose weight fell below `threshold`.
    pub fn reject_low_weights(&mut self, threshold: f32) -> usize {
        let mut rejected = 0;
        for site in self.sites.iter_mut().filter(|s| s.is_valid()) {
            if site.weight < threshold {
                site.state = SuppressionState::RobustRejected;
                rejected += 1;
            }
        }
        rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::Site;

    fn model_with_states(states: &[SuppressionState]) -> ContourModel {
        let mut model = ContourModel::new();
        for (i, &state) in states.iter().enumerate() {
            let mut site = Site::new([10.0 + 4.0 * i as f32, 10.0], 0.0);
            site.state = state;
            site.weight = 0.7;
            model.insert(site);
        }
        model
    }

    use crate::site::SuppressionState::{ContrastRejected, ThresholdRejected, Valid};

    #[test]
    fn positional_weights_skip_rejected_sites() {
        let mut model = model_with_states(&[Valid, ThresholdRejected, Valid, ContrastRejected, Valid]);
        model.apply_robust_weights(&[0.1, 0.2, 0.3]).unwrap();
        let weights: Vec<f32> = model.iter().map(|s| s.weight).collect();
        assert_eq!(weights, vec![0.1, 0.7, 0.2, 0.7, 0.3]);
    }

    #[test]
    fn positional_mismatch_applies_nothing() {
        let mut model = model_with_states(&[Valid, Valid, ThresholdRejected]);
        let err = model.apply_robust_weights(&[0.5]).unwrap_err();
        assert_eq!(
            err,
            TrackingError::WeightCountMismatch {
                expected: 2,
                supplied: 1
            }
        );
        let err = model.apply_robust_weights(&[0.5, 1.5]).unwrap_err();
        assert!(matches!(err, TrackingError::InvalidWeight { index: 1, .. }));
        assert!(model.iter().all(|s| s.weight == 0.7));
    }

    #[test]
    fn handle_weights_follow_ids_not_order() {
        let mut model = model_with_states(&[Valid, Valid, Valid]);
        let snap = model.valid_snapshot();
        model
            .apply_site_weights(&[(snap[2].id, 0.2), (snap[0].id, 0.9)])
            .unwrap();
        let weights: Vec<f32> = model.iter().map(|s| s.weight).collect();
        assert_eq!(weights, vec![0.9, 0.7, 0.2]);
    }

    #[test]
    fn handle_weights_are_all_or_nothing() {
        let mut model = model_with_states(&[Valid, ThresholdRejected, Valid]);
        let snap = model.valid_snapshot();
        let rejected_id = model.sites()[1].id();

        let err = model
            .apply_site_weights(&[(snap[0].id, 0.1), (rejected_id, 0.1)])
            .unwrap_err();
        assert_eq!(err, TrackingError::SiteNotValid(rejected_id));

        let err = model
            .apply_site_weights(&[(snap[0].id, 0.1), (SiteId(99), 0.1)])
            .unwrap_err();
        assert_eq!(err, TrackingError::UnknownSite(SiteId(99)));

        let err = model
            .apply_site_weights(&[(snap[1].id, 0.1), (snap[1].id, 0.3)])
            .unwrap_err();
        assert_eq!(err, TrackingError::DuplicateSite(snap[1].id));

        assert!(model.iter().all(|s| s.weight == 0.7));
    }

    #[test]
    fn low_weights_become_robust_rejections() {
        let mut model = model_with_states(&[Valid, Valid, ThresholdRejected]);
        model.apply_robust_weights(&[0.1, 0.9]).unwrap();
        assert_eq!(model.reject_low_weights(0.5), 1);
        assert_eq!(model.sites()[0].state, SuppressionState::RobustRejected);
        assert_eq!(model.sites()[1].state, Valid);
        assert_eq!(model.sites()[2].state, ThresholdRejected);
        assert_eq!(model.valid_snapshot().len(), 1);
    }
}
