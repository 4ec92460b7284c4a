use tracing::debug;

use crate::error::{Result, SigvivalError};
use crate::math::stats::{quantile_sorted, sorted_finite};
use crate::strata::{AssignedSample, CutPoint, GroupAssignment};

/// Quantile edges `e0 ..= e_bins` over the finite values.
pub fn bin_edges(values: &[f64], bins: usize) -> Option<Vec<f64>> {
    let sorted = sorted_finite(values);
    if sorted.is_empty() || bins == 0 {
        return None;
    }
    (0..=bins)
        .map(|i| quantile_sorted(&sorted, i as f64 / bins as f64))
        .collect()
}

/// Bin index for `value`: `[e0, e1]` then `(e_i, e_{i+1}]`.
pub fn bin_of(value: f64, edges: &[f64]) -> Option<usize> {
    if !value.is_finite() || edges.len() < 2 {
        return None;
    }
    let first = edges[0];
    let last = edges[edges.len() - 1];
    if value < first || value > last {
        return None;
    }
    edges[1..].iter().position(|&upper| value <= upper)
}

pub fn assign_groups(
    samples: &[&str],
    scores: &[f64],
    cut_point: CutPoint,
) -> Result<GroupAssignment> {
    debug_assert_eq!(samples.len(), scores.len());
    let bins = cut_point.bins();
    let valid = scores.iter().filter(|v| v.is_finite()).count();
    let required = 2 * bins;
    if valid < required {
        return Err(SigvivalError::InsufficientSamples {
            valid,
            required,
            groups: bins,
        });
    }
    let edges = bin_edges(scores, bins).ok_or(SigvivalError::InsufficientSamples {
        valid,
        required,
        groups: bins,
    })?;

    let scheme = cut_point.scheme();
    let mut assigned = Vec::with_capacity(valid);
    let mut dropped_invalid = 0usize;
    let mut discarded = 0usize;
    for (sample, &score) in samples.iter().zip(scores) {
        let Some(position) = bin_of(score, &edges) else {
            dropped_invalid += 1;
            continue;
        };
        if !cut_point.retains(position) {
            discarded += 1;
            continue;
        }
        assigned.push(AssignedSample {
            sample: (*sample).to_string(),
            score,
            position,
            label: scheme[position],
        });
    }

    debug!(
        cut_point = %cut_point,
        retained = assigned.len(),
        dropped = dropped_invalid,
        discarded,
        "groups_assigned"
    );

    Ok(GroupAssignment {
        cut_point,
        edges,
        samples: assigned,
        dropped_invalid,
        discarded,
    })
}
