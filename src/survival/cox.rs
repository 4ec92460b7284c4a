//! Univariate Cox proportional hazards, Breslow handling of ties,
//! fitted by Newton-Raphson with step halving.

use std::cmp::Ordering;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use crate::error::{Result, SigvivalError};

const MAX_ABS_BETA: f64 = 20.0;
const MAX_HALVINGS: usize = 30;
const Z_95: f64 = 1.959963984540054;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoxFit {
    pub coef: f64,
    pub se: f64,
    pub hazard_ratio: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub z: f64,
    pub p_value: f64,
    pub log_likelihood: f64,
    pub iterations: usize,
}

struct Derivatives {
    loglik: f64,
    score: f64,
    information: f64,
}

/// Subjects sorted by descending time so risk sets accumulate in one pass.
struct Prepared {
    time: Vec<f64>,
    event: Vec<bool>,
    x: Vec<f64>,
}

fn prepare(time: &[f64], event: &[bool], x: &[f64]) -> Prepared {
    let mut idx: Vec<usize> = (0..time.len()).collect();
    idx.sort_by(|&a, &b| time[b].partial_cmp(&time[a]).unwrap_or(Ordering::Equal));
    let mean = x.iter().sum::<f64>() / x.len().max(1) as f64;
    Prepared {
        time: idx.iter().map(|&i| time[i]).collect(),
        event: idx.iter().map(|&i| event[i]).collect(),
        x: idx.iter().map(|&i| x[i] - mean).collect(),
    }
}

fn derivatives(p: &Prepared, beta: f64) -> Derivatives {
    let n = p.time.len();
    let (mut s0, mut s1, mut s2) = (0.0f64, 0.0f64, 0.0f64);
    let mut out = Derivatives {
        loglik: 0.0,
        score: 0.0,
        information: 0.0,
    };
    let mut i = 0;
    while i < n {
        let t = p.time[i];
        let mut d = 0.0;
        let mut x_events = 0.0;
        // everyone tied at t joins the risk set before the events at t are scored
        let mut j = i;
        while j < n && p.time[j] == t {
            let w = (p.x[j] * beta).exp();
            s0 += w;
            s1 += w * p.x[j];
            s2 += w * p.x[j] * p.x[j];
            if p.event[j] {
                d += 1.0;
                x_events += p.x[j];
            }
            j += 1;
        }
        if d > 0.0 {
            let mean = s1 / s0;
            out.loglik += beta * x_events - d * s0.ln();
            out.score += x_events - d * mean;
            out.information += d * (s2 / s0 - mean * mean);
        }
        i = j;
    }
    out
}

pub fn fit_cox(
    time: &[f64],
    event: &[bool],
    x: &[f64],
    max_iter: usize,
    tol: f64,
) -> Result<CoxFit> {
    if time.len() != event.len() || time.len() != x.len() {
        return Err(SigvivalError::not_converged("input lengths differ"));
    }
    if !event.iter().any(|&e| e) {
        return Err(SigvivalError::not_converged("no events observed"));
    }
    let p = prepare(time, event, x);

    let mut beta = 0.0f64;
    let mut current = derivatives(&p, beta);
    if !(current.information > 0.0) {
        return Err(SigvivalError::not_converged(
            "zero information: covariate does not vary within risk sets",
        ));
    }

    for iteration in 1..=max_iter {
        let mut step = current.score / current.information;
        let mut candidate = beta + step;
        let mut next = derivatives(&p, candidate);
        let mut halvings = 0;
        while (!next.loglik.is_finite() || next.loglik < current.loglik)
            && halvings < MAX_HALVINGS
        {
            step /= 2.0;
            candidate = beta + step;
            next = derivatives(&p, candidate);
            halvings += 1;
        }
        if !candidate.is_finite() || candidate.abs() > MAX_ABS_BETA {
            return Err(SigvivalError::not_converged(format!(
                "coefficient diverged (|beta| > {})",
                MAX_ABS_BETA
            )));
        }
        if !(next.information > 0.0) || !next.loglik.is_finite() {
            return Err(SigvivalError::not_converged("information vanished during iteration"));
        }

        let done = step.abs() < tol;
        beta = candidate;
        current = next;
        if done {
            debug!(beta, iterations = iteration, "cox_converged");
            return Ok(summarize(beta, &current, iteration));
        }
    }

    Err(SigvivalError::not_converged(format!(
        "no convergence after {} iterations",
        max_iter
    )))
}

fn summarize(beta: f64, d: &Derivatives, iterations: usize) -> CoxFit {
    let se = (1.0 / d.information).sqrt();
    let z = beta / se;
    let p_value = Normal::new(0.0, 1.0)
        .map(|n| 2.0 * n.sf(z.abs()))
        .unwrap_or(f64::NAN);
    CoxFit {
        coef: beta,
        se,
        hazard_ratio: beta.exp(),
        ci_lower: (beta - Z_95 * se).exp(),
        ci_upper: (beta + Z_95 * se).exp(),
        z,
        p_value,
        log_likelihood: d.loglik,
        iterations,
    }
}
