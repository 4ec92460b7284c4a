use std::cmp::Ordering;

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::math::linalg::quadratic_form_inv;
use crate::survival::SurvivalRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRankResult {
    pub observed: Vec<f64>,
    pub expected: Vec<f64>,
    pub chi_square: Option<f64>,
    pub df: usize,
    pub p_value: Option<f64>,
}

/// k-sample log-rank test. The statistic uses the first k-1 groups'
/// observed-minus-expected vector against its hypergeometric covariance.
/// `p_value` is `None` when no events occur or the covariance is singular.
pub fn log_rank(groups: &[Vec<SurvivalRecord>]) -> LogRankResult {
    let k = groups.len();
    let mut observed = vec![0.0; k];
    let mut expected = vec![0.0; k];
    let df = k.saturating_sub(1);

    let mut event_times: Vec<f64> = groups
        .iter()
        .flatten()
        .filter(|r| r.event)
        .map(|r| r.time)
        .collect();
    event_times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    event_times.dedup();

    let mut cov = vec![0.0; df * df];
    for &t in &event_times {
        let at_risk: Vec<f64> = groups
            .iter()
            .map(|g| g.iter().filter(|r| r.time >= t).count() as f64)
            .collect();
        let deaths: Vec<f64> = groups
            .iter()
            .map(|g| g.iter().filter(|r| r.event && r.time == t).count() as f64)
            .collect();
        let n: f64 = at_risk.iter().sum();
        let d: f64 = deaths.iter().sum();
        if n <= 0.0 || d <= 0.0 {
            continue;
        }
        for j in 0..k {
            observed[j] += deaths[j];
            expected[j] += at_risk[j] * d / n;
        }
        if n <= 1.0 {
            continue;
        }
        let factor = d * (n - d) / (n * n * (n - 1.0));
        for a in 0..df {
            for b in 0..df {
                let term = if a == b {
                    at_risk[a] * (n - at_risk[a])
                } else {
                    -at_risk[a] * at_risk[b]
                };
                cov[a * df + b] += term * factor;
            }
        }
    }

    let total_events: f64 = observed.iter().sum();
    let chi_square = if df == 0 || total_events == 0.0 {
        None
    } else {
        let diff: Vec<f64> = (0..df).map(|j| observed[j] - expected[j]).collect();
        quadratic_form_inv(&cov, &diff, df)
            .filter(|s| s.is_finite() && *s > -1e-9)
            .map(|s| s.max(0.0))
    };
    let p_value = chi_square.and_then(|stat| {
        ChiSquared::new(df as f64)
            .ok()
            .map(|dist| dist.sf(stat).clamp(0.0, 1.0))
    });

    LogRankResult {
        observed,
        expected,
        chi_square,
        df,
        p_value,
    }
}
