//! Single-sample GSEA with rank normalisation.
//!
//! Each sample is scored independently: genes are ranked by expression,
//! the ranks are rescaled to `rank_scale * rank / n`, and a weighted running
//! sum walks the genes from highest to lowest rank. The raw enrichment score
//! is the sum of that running sum; normalisation divides by the score range
//! observed across the request's samples.

use anyhow::Result;
use tracing::{debug, info};

#[cfg(feature = "mt")]
use rayon::prelude::*;

use crate::config::ScoringConfig;
use crate::error::SigvivalError;
use crate::expr::ExpressionMatrix;
use crate::geneset::ResolvedSignature;
use crate::math::stats::average_ranks;
use crate::scores::{CancelToken, ScoreRow, ScoreTable};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SsgseaParams {
    pub weight: f64,
    pub rank_scale: f64,
    pub min_size: usize,
}

impl Default for SsgseaParams {
    fn default() -> Self {
        Self::from(&ScoringConfig::default())
    }
}

impl From<&ScoringConfig> for SsgseaParams {
    fn from(cfg: &ScoringConfig) -> Self {
        Self {
            weight: cfg.weight,
            rank_scale: cfg.rank_scale,
            min_size: cfg.min_size.max(1),
        }
    }
}

struct Scratch {
    ranks: Vec<f64>,
    order: Vec<usize>,
}

impl Scratch {
    fn new(n_genes: usize) -> Self {
        Self {
            ranks: vec![0.0; n_genes],
            order: Vec::with_capacity(n_genes),
        }
    }
}

/// Raw enrichment score of one expression profile. `is_hit[g]` marks the
/// signature genes; `n_hits` is their count.
pub fn sample_enrichment(
    profile: &[f32],
    is_hit: &[bool],
    n_hits: usize,
    params: &SsgseaParams,
) -> f64 {
    let mut scratch = Scratch::new(profile.len());
    enrichment_with(profile, is_hit, n_hits, params, &mut scratch)
}

fn enrichment_with(
    profile: &[f32],
    is_hit: &[bool],
    n_hits: usize,
    params: &SsgseaParams,
    scratch: &mut Scratch,
) -> f64 {
    let n = profile.len();
    if n == 0 || n_hits == 0 {
        return 0.0;
    }
    let Scratch { ranks, order } = scratch;
    average_ranks(profile, ranks, order);
    let scale = params.rank_scale / n as f64;
    for r in ranks.iter_mut() {
        *r *= scale;
    }

    // descending scaled rank, ties by gene row
    order.sort_by(|&a, &b| {
        ranks[b]
            .partial_cmp(&ranks[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let hit_norm: f64 = is_hit
        .iter()
        .zip(ranks.iter())
        .filter(|(hit, _)| **hit)
        .map(|(_, r)| r.abs().powf(params.weight))
        .sum();
    let n_miss = n - n_hits;
    let miss_step = if n_miss > 0 { 1.0 / n_miss as f64 } else { 0.0 };

    let mut running = 0.0f64;
    let mut es = 0.0f64;
    for &g in order.iter() {
        if is_hit[g] {
            if hit_norm > 0.0 {
                running += ranks[g].abs().powf(params.weight) / hit_norm;
            }
        } else {
            running -= miss_step;
        }
        es += running;
    }
    es
}

/// NES = ES / (max ES - min ES); a zero or non-finite range leaves ES as is.
pub fn normalize_scores(es: &[f64]) -> Vec<f64> {
    let (min, max) = es
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if !range.is_finite() || range == 0.0 {
        return es.to_vec();
    }
    es.iter().map(|v| v / range).collect()
}

pub fn score_signature(
    matrix: &ExpressionMatrix,
    signature: &ResolvedSignature,
    params: &SsgseaParams,
    threads: usize,
    cancel: &CancelToken,
) -> Result<ScoreTable> {
    let found = signature.found();
    if found == 0 {
        return Err(SigvivalError::GeneNotFound {
            signature: signature.name.clone(),
            requested: signature.total,
        }
        .into());
    }
    if found < params.min_size {
        return Err(SigvivalError::InsufficientSignatureCoverage {
            signature: signature.name.clone(),
            found,
            min_size: params.min_size,
        }
        .into());
    }

    let n_genes = matrix.n_genes();
    let n_samples = matrix.n_samples();
    let mut is_hit = vec![false; n_genes];
    for &gid in &signature.gene_ids {
        is_hit[gid] = true;
    }

    let mut es = vec![f64::NAN; n_samples];

    #[cfg(feature = "mt")]
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
        pool.install(|| {
            es.par_iter_mut().enumerate().for_each_init(
                || Scratch::new(n_genes),
                |scratch, (col, slot)| {
                    if cancel.is_cancelled() {
                        return;
                    }
                    *slot = enrichment_with(
                        matrix.sample_profile(col),
                        &is_hit,
                        found,
                        params,
                        scratch,
                    );
                },
            );
        });
    }

    #[cfg(not(feature = "mt"))]
    {
        let _ = threads;
        let mut scratch = Scratch::new(n_genes);
        for (col, slot) in es.iter_mut().enumerate() {
            if cancel.is_cancelled() {
                break;
            }
            *slot = enrichment_with(
                matrix.sample_profile(col),
                &is_hit,
                found,
                params,
                &mut scratch,
            );
        }
    }

    if cancel.is_cancelled() {
        debug!(signature = %signature.name, "scoring cancelled");
        return Err(SigvivalError::Cancelled.into());
    }

    let nes = normalize_scores(&es);
    let rows = matrix
        .samples()
        .iter()
        .zip(es.iter().zip(&nes))
        .map(|(sample, (&es, &nes))| ScoreRow {
            sample: sample.clone(),
            signature: signature.name.clone(),
            es,
            nes,
        })
        .collect();

    info!(
        signature = %signature.name,
        genes = found,
        samples = n_samples,
        threads,
        "ssgsea_scored"
    );

    Ok(ScoreTable {
        signature: signature.name.clone(),
        rows,
    })
}
