mod common;

use common::synthetic_image::vertical_ramp_edge;
use moving_edges::estimator::{fit_line_irls, LineFitParams};
use moving_edges::image::ImageU8;
use moving_edges::{
    ContourModel, Site, SiteId, SuppressionState, Tracker, TrackingError, TrackingParams,
};

fn mixed_model() -> ContourModel {
    let states = [
        SuppressionState::Valid,
        SuppressionState::ContrastRejected,
        SuppressionState::Valid,
        SuppressionState::ThresholdRejected,
        SuppressionState::Valid,
    ];
    let mut model = ContourModel::new();
    for (i, state) in states.into_iter().enumerate() {
        let mut site = Site::new([30.0, 10.0 + 6.0 * i as f32], 0.0);
        site.state = state;
        site.weight = 0.9;
        model.insert(site).unwrap();
    }
    model
}

fn weights(model: &ContourModel) -> Vec<f32> {
    model.iter().map(|s| s.weight).collect()
}

#[test]
fn positional_weights_follow_valid_order() {
    let mut model = mixed_model();
    model.apply_robust_weights(&[0.25, 0.5, 0.75]).unwrap();
    assert_eq!(weights(&model), vec![0.25, 0.9, 0.5, 0.9, 0.75]);
}

#[test]
fn positional_weights_of_wrong_length_change_nothing() {
    let mut model = mixed_model();
    for bad in [&[0.1f32, 0.2][..], &[0.1, 0.2, 0.3, 0.4, 0.5][..]] {
        let err = model.apply_robust_weights(bad).unwrap_err();
        assert_eq!(
            err,
            TrackingError::WeightCountMismatch {
                expected: 3,
                supplied: bad.len()
            }
        );
        assert_eq!(weights(&model), vec![0.9; 5]);
    }
    let err = model.apply_robust_weights(&[0.1, 1.5, 0.3]).unwrap_err();
    assert_eq!(err, TrackingError::InvalidWeight { index: 1, value: 1.5 });
    assert_eq!(weights(&model), vec![0.9; 5]);
}

#[test]
fn handle_weights_are_all_or_nothing() {
    let mut model = mixed_model();
    let snapshot = model.valid_snapshot();
    let ids: Vec<SiteId> = snapshot.iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), 3);

    let rejected = model.sites()[1].id();
    let err = model
        .apply_site_weights(&[(ids[0], 0.1), (rejected, 0.2)])
        .unwrap_err();
    assert_eq!(err, TrackingError::SiteNotValid(rejected));
    assert_eq!(weights(&model), vec![0.9; 5]);

    let err = model
        .apply_site_weights(&[(ids[0], 0.1), (SiteId(99), 0.2)])
        .unwrap_err();
    assert_eq!(err, TrackingError::UnknownSite(SiteId(99)));

    let err = model
        .apply_site_weights(&[(ids[2], 0.1), (ids[2], 0.2)])
        .unwrap_err();
    assert_eq!(err, TrackingError::DuplicateSite(ids[2]));
    assert_eq!(weights(&model), vec![0.9; 5]);

    // Order of the pairs does not matter.
    model.apply_site_weights(&[(ids[2], 0.3), (ids[0], 0.6)]).unwrap();
    assert_eq!(weights(&model), vec![0.6, 0.9, 0.9, 0.9, 0.3]);
}

#[test]
fn line_fit_feedback_suppresses_outlier() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut points: Vec<([f32; 2], f32)> =
        (0..9).map(|i| ([40.0, 8.0 + 5.0 * i as f32], 0.0)).collect();
    points[4].0 = [47.0, 28.0];
    let model = ContourModel::from_points(points).unwrap();
    let outlier = model.sites()[4].id();

    let data = vertical_ramp_edge(80, 60, 40);
    let img = ImageU8::packed(80, 60, &data);
    let mut tracker = Tracker::new(TrackingParams::default(), model).unwrap();
    let snapshot = tracker.valid_snapshot();
    assert_eq!(snapshot.len(), 9);

    let fit = fit_line_irls(&snapshot, &LineFitParams::default()).unwrap();
    assert!((fit.rho - 40.0).abs() < 0.5, "rho={}", fit.rho);
    tracker.apply_site_weights(&fit.weights).unwrap();
    assert_eq!(tracker.reject_low_weights(), 1);
    assert_eq!(tracker.good_site_count(), 8);
    assert_eq!(
        tracker.model().get(outlier).map(|s| s.state),
        Some(SuppressionState::RobustRejected)
    );

    // The suppressed site is skipped by the next pass; the rest stay on the edge.
    let report = tracker.track(&img).unwrap();
    assert_eq!((report.good, report.total), (8, 9));
    assert_eq!(tracker.model().get(outlier).unwrap().position, [47.0, 28.0]);
    assert_eq!(tracker.valid_snapshot().len(), 8);
}
