use std::collections::HashMap;

use approx::assert_abs_diff_eq;

use sigvival::config::SurvivalConfig;
use sigvival::error::SigvivalError;
use sigvival::strata::{CutPoint, assign_groups};
use sigvival::survival::{
    HazardRatio, KmFigure, SurvivalRecord, compare_groups, fit_cox, kaplan_meier, log_rank,
};

fn rec(time: f64, event: bool) -> SurvivalRecord {
    SurvivalRecord { time, event }
}

#[test]
fn kaplan_meier_steps_at_event_times() {
    let km = kaplan_meier(&[rec(1.0, true), rec(2.0, false), rec(3.0, true), rec(4.0, true)]);
    let times: Vec<f64> = km.points.iter().map(|p| p.time).collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_abs_diff_eq!(km.points[1].survival, 0.75, epsilon = 1e-12);
    assert_abs_diff_eq!(km.points[2].survival, 0.75, epsilon = 1e-12);
    assert_eq!(km.points[2].censored, 1);
    assert_abs_diff_eq!(km.points[3].survival, 0.375, epsilon = 1e-12);
    assert_eq!(km.points[3].at_risk, 2);
    assert_abs_diff_eq!(km.points[4].survival, 0.0, epsilon = 1e-12);
    assert_eq!(km.median, Some(3.0));
    assert_abs_diff_eq!(km.survival_at(2.5), 0.75, epsilon = 1e-12);
}

#[test]
fn all_censored_group_is_flat_at_one() {
    let km = kaplan_meier(&[rec(5.0, false), rec(9.0, false), rec(12.0, false)]);
    assert!(km.points.iter().all(|p| p.survival == 1.0));
    assert_eq!(km.median, None);
}

#[test]
fn log_rank_two_groups_matches_hand_computation() {
    let a = vec![rec(1.0, true), rec(2.0, true), rec(3.0, true)];
    let b = vec![rec(4.0, true), rec(5.0, true), rec(6.0, true)];
    let result = log_rank(&[a, b]);
    assert_eq!(result.df, 1);
    assert_abs_diff_eq!(result.observed[0], 3.0);
    assert_abs_diff_eq!(result.expected[0], 1.15, epsilon = 1e-12);
    assert_abs_diff_eq!(result.chi_square.unwrap(), 1.85f64.powi(2) / 0.6775, epsilon = 1e-9);
    let p = result.p_value.unwrap();
    assert!(p > 0.0 && p < 0.05, "p = {p}");
}

#[test]
fn log_rank_identical_groups_is_not_significant() {
    let g = vec![rec(1.0, true), rec(3.0, false), rec(5.0, true), rec(7.0, true)];
    let result = log_rank(&[g.clone(), g.clone(), g]);
    assert_eq!(result.df, 2);
    assert_abs_diff_eq!(result.chi_square.unwrap(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.p_value.unwrap(), 1.0, epsilon = 1e-9);
}

#[test]
fn log_rank_without_events_has_no_p_value() {
    let a = vec![rec(1.0, false), rec(2.0, false)];
    let b = vec![rec(3.0, false), rec(4.0, false)];
    assert!(log_rank(&[a, b]).p_value.is_none());
}

#[test]
fn cox_hazard_ratio_above_one_when_higher_group_dies_sooner() {
    let time = [2.0, 3.0, 5.0, 6.0, 8.0, 4.0, 7.0, 9.0, 11.0, 12.0, 14.0, 10.0];
    let event = [true, true, true, false, true, true, true, true, false, true, true, true];
    let x = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let fit = fit_cox(&time, &event, &x, 50, 1e-9).unwrap();
    assert!(fit.hazard_ratio > 1.0, "{fit:?}");
    assert!(fit.ci_lower < fit.hazard_ratio && fit.hazard_ratio < fit.ci_upper);
    assert!(fit.p_value > 0.0 && fit.p_value <= 1.0);
    assert_abs_diff_eq!(fit.hazard_ratio, fit.coef.exp(), epsilon = 1e-12);
}

#[test]
fn cox_without_events_does_not_converge() {
    let err = fit_cox(&[1.0, 2.0], &[false, false], &[0.0, 1.0], 50, 1e-9).unwrap_err();
    assert!(matches!(err, SigvivalError::RegressionDidNotConverge { .. }));
}

#[test]
fn cox_with_perfect_separation_does_not_converge() {
    let time = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let event = [true; 6];
    let x = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
    let err = fit_cox(&time, &event, &x, 50, 1e-9).unwrap_err();
    assert_eq!(err.kind(), "RegressionDidNotConverge");
}

fn scenario() -> (Vec<String>, Vec<f64>, HashMap<String, SurvivalRecord>) {
    let n = 16;
    let samples: Vec<String> = (0..n).map(|i| format!("S{:02}", i)).collect();
    let scores: Vec<f64> = (0..n).map(|i| i as f64 / n as f64).collect();
    let survival = samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let time = 100.0 - 5.0 * i as f64 + if i % 3 == 0 { 12.0 } else { 0.0 };
            (s.clone(), rec(time, i % 5 != 4))
        })
        .collect();
    (samples, scores, survival)
}

#[test]
fn comparison_reports_curves_p_value_and_hazard_ratio() {
    let (samples, scores, survival) = scenario();
    let names: Vec<&str> = samples.iter().map(String::as_str).collect();
    let groups = assign_groups(&names, &scores, CutPoint::Quartile).unwrap();
    let result = compare_groups(
        "sig",
        &groups,
        |s| survival.get(s).copied(),
        &SurvivalConfig::default(),
    )
    .unwrap();

    assert_eq!(result.groups.len(), 4);
    assert_eq!(result.samples, 16);
    assert_eq!(result.excluded, 0);
    assert_eq!(
        result.groups.iter().map(|g| g.position).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
    assert!(result.p_value().is_some());
    let hr = result.hazard_ratio.value().unwrap();
    assert!(hr > 1.0, "hr = {hr}");

    let figure = KmFigure::from_comparison(&result);
    assert_eq!(figure.curves.len(), 4);
    assert_eq!(figure.legend_title, "NES");
    assert!(figure.title.starts_with("sig  P="));
    assert!(figure.title.contains(", HR="));
    assert_eq!(figure.curves[0].label, "Low: bottom quartile");
    assert_eq!(figure.curves[0].path[0], (0.0, 1.0));
}

#[test]
fn extremes_covariate_uses_full_scheme_positions() {
    let (samples, scores, survival) = scenario();
    let names: Vec<&str> = samples.iter().map(String::as_str).collect();
    let groups = assign_groups(&names, &scores, CutPoint::QuartileExtremes).unwrap();
    let result = compare_groups(
        "sig",
        &groups,
        |s| survival.get(s).copied(),
        &SurvivalConfig::default(),
    )
    .unwrap();
    assert_eq!(result.samples, 8);
    assert_eq!(
        result.groups.iter().map(|g| g.position).collect::<Vec<_>>(),
        vec![0, 3]
    );
}

#[test]
fn samples_without_survival_are_excluded_and_counted() {
    let (samples, scores, mut survival) = scenario();
    survival.remove("S00");
    survival.remove("S15");
    let names: Vec<&str> = samples.iter().map(String::as_str).collect();
    let groups = assign_groups(&names, &scores, CutPoint::Median).unwrap();
    let result = compare_groups(
        "sig",
        &groups,
        |s| survival.get(s).copied(),
        &SurvivalConfig::default(),
    )
    .unwrap();
    assert_eq!(result.excluded, 2);
    assert_eq!(result.samples, 14);
}

#[test]
fn zero_event_group_is_not_fatal() {
    let names = ["a", "b", "c", "d", "e", "f"];
    let scores = [0.1, 0.2, 0.3, 0.7, 0.8, 0.9];
    let survival: HashMap<&str, SurvivalRecord> = [
        ("a", rec(10.0, false)),
        ("b", rec(12.0, false)),
        ("c", rec(15.0, false)),
        ("d", rec(3.0, true)),
        ("e", rec(5.0, true)),
        ("f", rec(20.0, false)),
    ]
    .into_iter()
    .collect();
    let groups = assign_groups(&names, &scores, CutPoint::Median).unwrap();
    let result = compare_groups(
        "sig",
        &groups,
        |s| survival.get(s).copied(),
        &SurvivalConfig::default(),
    )
    .unwrap();

    let low = &result.groups[0];
    assert_eq!(low.events, 0);
    assert!(low.estimate.points.iter().all(|p| p.survival == 1.0));
    assert!(result.p_value().is_some());
    // the covariate separates events perfectly; the fit is reported as unavailable
    assert!(matches!(result.hazard_ratio, HazardRatio::Unavailable { .. }));
}

#[test]
fn all_censored_group_still_allows_hazards_fit() {
    let names = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
    let scores = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
    let survival: HashMap<&str, SurvivalRecord> = [
        ("a", rec(30.0, false)),
        ("b", rec(28.0, false)),
        ("c", rec(26.0, false)),
        ("d", rec(12.0, true)),
        ("e", rec(20.0, true)),
        ("f", rec(8.0, false)),
        ("g", rec(10.0, true)),
        ("h", rec(4.0, true)),
        ("i", rec(15.0, true)),
    ]
    .into_iter()
    .collect();
    let groups = assign_groups(&names, &scores, CutPoint::Tertile).unwrap();
    let result = compare_groups(
        "sig",
        &groups,
        |s| survival.get(s).copied(),
        &SurvivalConfig::default(),
    )
    .unwrap();

    let events: Vec<usize> = result.groups.iter().map(|g| g.events).collect();
    assert_eq!(events, vec![0, 2, 3]);
    assert!(result.groups[0].estimate.points.iter().all(|p| p.survival == 1.0));
    assert!(result.p_value().is_some());
    match &result.hazard_ratio {
        HazardRatio::Estimated(fit) => {
            assert!(fit.hazard_ratio.is_finite());
            assert!(fit.hazard_ratio > 1.0);
        }
        other => panic!("expected an estimated hazard ratio, got {other:?}"),
    }
}

#[test]
fn undersized_group_is_insufficient_group_size() {
    let (samples, scores, survival) = scenario();
    let names: Vec<&str> = samples.iter().map(String::as_str).collect();
    let groups = assign_groups(&names, &scores, CutPoint::Quartile).unwrap();
    let cfg = SurvivalConfig {
        min_group_size: 5,
        ..SurvivalConfig::default()
    };
    let err = compare_groups("sig", &groups, |s| survival.get(s).copied(), &cfg).unwrap_err();
    match err {
        SigvivalError::InsufficientGroupSize { size, min_size, .. } => {
            assert_eq!(size, 4);
            assert_eq!(min_size, 5);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn single_surviving_group_is_insufficient_group_size() {
    let (samples, scores, survival) = scenario();
    let names: Vec<&str> = samples.iter().map(String::as_str).collect();
    let groups = assign_groups(&names, &scores, CutPoint::Median).unwrap();
    // only the High half has survival data
    let err = compare_groups(
        "sig",
        &groups,
        |s| survival.get(s).copied().filter(|_| s >= "S08"),
        &SurvivalConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "InsufficientGroupSize");
}
