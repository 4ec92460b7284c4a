//! Order-statistic primitives shared by scoring and stratification.

use std::cmp::Ordering;

/// Linear-interpolation quantile over an ascending slice (`q = (n-1)·p`).
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * p;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Sorts finite values ascending; non-finite values are discarded.
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    out
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// 1-based average ranks, ascending. Missing values (NaN) are ranked as
/// zero expression, so they tie with genes measured at 0.
pub fn average_ranks(values: &[f32], out: &mut [f64], order: &mut Vec<usize>) {
    debug_assert_eq!(values.len(), out.len());
    order.clear();
    order.extend(0..values.len());
    order.sort_by(|&a, &b| cmp_filled(values[a], values[b]).then(a.cmp(&b)));

    let n = order.len();
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && cmp_filled(values[order[i]], values[order[j]]) == Ordering::Equal {
            j += 1;
        }
        // positions i..j are 0-based, ranks are i+1..=j
        let rank = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            out[idx] = rank;
        }
        i = j;
    }
}

fn fill_missing(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v }
}

fn cmp_filled(a: f32, b: f32) -> Ordering {
    fill_missing(a)
        .partial_cmp(&fill_missing(b))
        .unwrap_or(Ordering::Equal)
}
