pub mod ssgsea;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

pub use ssgsea::{SsgseaParams, normalize_scores, sample_enrichment, score_signature};

/// One sample's score for the request's signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub sample: String,
    pub signature: String,
    pub es: f64,
    pub nes: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    pub signature: String,
    pub rows: Vec<ScoreRow>,
}

impl ScoreTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, sample: &str) -> Option<&ScoreRow> {
        self.rows.iter().find(|r| r.sample == sample)
    }

    pub fn nes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.nes).collect()
    }
}

/// Cooperative cancellation flag shared between the caller and the scorer.
/// Workers check it before starting a sample; in-flight samples finish.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
