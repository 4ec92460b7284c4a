use sigvival::error::SigvivalError;
use sigvival::scores::{ScoreRow, ScoreTable};
use sigvival::strata::{CutPoint, GroupLabel, assign_groups, bin_edges, bin_of, stratify};

fn table(scores: &[f64]) -> ScoreTable {
    ScoreTable {
        signature: "sig".to_string(),
        rows: scores
            .iter()
            .enumerate()
            .map(|(i, &nes)| ScoreRow {
                sample: format!("S{:03}", i),
                signature: "sig".to_string(),
                es: nes * 10.0,
                nes,
            })
            .collect(),
    }
}

/// Evenly spread scores in [0, 1), shuffled deterministically.
fn uniform(n: usize) -> Vec<f64> {
    (0..n).map(|i| ((i * 37) % n) as f64 / n as f64).collect()
}

#[test]
fn median_split_of_hundred_samples_is_fifty_fifty() {
    let scores = uniform(100);
    let groups = stratify(&table(&scores), CutPoint::Median).unwrap();
    let sizes = groups.group_sizes();
    assert_eq!(sizes.len(), 2);
    assert_eq!(sizes[0].label, GroupLabel::Low);
    assert_eq!(sizes[0].size, 50);
    assert_eq!(sizes[1].label, GroupLabel::High);
    assert_eq!(sizes[1].size, 50);

    let max_low = groups
        .samples
        .iter()
        .filter(|s| s.label == GroupLabel::Low)
        .map(|s| s.score)
        .fold(f64::MIN, f64::max);
    let min_high = groups
        .samples
        .iter()
        .filter(|s| s.label == GroupLabel::High)
        .map(|s| s.score)
        .fold(f64::MAX, f64::min);
    assert!(max_low < min_high);
}

#[test]
fn quartile_extremes_keeps_top_and_bottom_quarters() {
    let scores = uniform(200);
    let groups = stratify(&table(&scores), CutPoint::QuartileExtremes).unwrap();
    assert_eq!(groups.len(), 100);
    assert_eq!(groups.discarded, 100);
    assert!(groups.samples.iter().all(|s| s.position == 0 || s.position == 3));

    let sizes = groups.group_sizes();
    assert_eq!(sizes.len(), 2);
    assert_eq!((sizes[0].label, sizes[0].size), (GroupLabel::Low, 50));
    assert_eq!((sizes[1].label, sizes[1].size), (GroupLabel::High, 50));
}

#[test]
fn full_schemes_produce_every_group_in_score_order() {
    let scores = uniform(120);
    for cut in [CutPoint::Median, CutPoint::Tertile, CutPoint::Quartile] {
        let groups = stratify(&table(&scores), cut).unwrap();
        let sizes = groups.group_sizes();
        assert_eq!(sizes.len(), cut.bins());
        assert!(sizes.iter().all(|g| g.size > 0));
        let means: Vec<f64> = sizes.iter().map(|g| g.mean_score.unwrap()).collect();
        assert!(means.windows(2).all(|w| w[0] < w[1]), "{cut}: {means:?}");
    }
}

#[test]
fn tertile_extremes_drops_medium_by_position() {
    let scores = uniform(30);
    let groups = stratify(&table(&scores), CutPoint::TertileExtremes).unwrap();
    assert!(groups.samples.iter().all(|s| s.label != GroupLabel::Medium));
    let positions: Vec<usize> = groups.group_sizes().iter().map(|g| g.position).collect();
    assert_eq!(positions, vec![0, 2]);
}

#[test]
fn non_finite_scores_are_dropped_not_imputed() {
    let mut scores = uniform(10);
    scores[3] = f64::NAN;
    scores[7] = f64::INFINITY;
    let groups = stratify(&table(&scores), CutPoint::Median).unwrap();
    assert_eq!(groups.dropped_invalid, 2);
    assert_eq!(groups.len(), 8);
    assert!(groups.label_of("S003").is_none());
}

#[test]
fn too_few_valid_scores_is_insufficient_samples() {
    let err = stratify(&table(&[0.1, 0.2, 0.3, 0.4, 0.5]), CutPoint::Tertile).unwrap_err();
    assert_eq!(
        err,
        SigvivalError::InsufficientSamples {
            valid: 5,
            required: 6,
            groups: 3
        }
    );
    assert!(err.to_string().contains("choose fewer groups or more cohorts"));
}

#[test]
fn ties_share_a_bin() {
    let scores = [1.0, 1.0, 1.0, 1.0, 1.0, 2.0];
    let groups = assign_groups(
        &["a", "b", "c", "d", "e", "f"],
        &scores,
        CutPoint::Median,
    )
    .unwrap();
    let sizes = groups.group_sizes();
    assert_eq!(sizes[0].size, 5);
    assert_eq!(sizes[1].size, 1);
}

#[test]
fn edges_interpolate_and_lowest_edge_is_inclusive() {
    let edges = bin_edges(&[4.0, 1.0, 3.0, 2.0], 2).unwrap();
    assert_eq!(edges, vec![1.0, 2.5, 4.0]);
    assert_eq!(bin_of(1.0, &edges), Some(0));
    assert_eq!(bin_of(2.5, &edges), Some(0));
    assert_eq!(bin_of(2.6, &edges), Some(1));
    assert_eq!(bin_of(4.5, &edges), None);
}

#[test]
fn cut_point_names_round_trip() {
    for cut in CutPoint::ALL {
        let parsed: CutPoint = cut.as_str().parse().unwrap();
        assert_eq!(parsed, cut);
    }
    assert_eq!("Quartile_Extremes".parse::<CutPoint>(), Ok(CutPoint::QuartileExtremes));
    assert!("decile".parse::<CutPoint>().is_err());
    assert_eq!(CutPoint::Tertile.display_label(2), "High: top tertile");
    assert_eq!(CutPoint::QuartileExtremes.retained_positions(), vec![0, 3]);
}
