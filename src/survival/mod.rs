//! Survival comparison across score groups: Kaplan-Meier curves, a k-group
//! log-rank test and a univariate proportional hazards fit on the group's
//! ordinal position.

pub mod cox;
pub mod figure;
pub mod kaplan_meier;
pub mod logrank;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SurvivalConfig;
use crate::error::{Result, SigvivalError};
use crate::strata::{CutPoint, GroupAssignment, GroupLabel};

pub use cox::{CoxFit, fit_cox};
pub use figure::{FigureCurve, KmFigure};
pub use kaplan_meier::{KmEstimate, KmPoint, kaplan_meier};
pub use logrank::{LogRankResult, log_rank};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivalRecord {
    pub time: f64,
    pub event: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HazardRatio {
    Estimated(CoxFit),
    Unavailable { reason: String },
}

impl HazardRatio {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Estimated(fit) => Some(fit.hazard_ratio),
            Self::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCurve {
    pub label: GroupLabel,
    /// Ordinal position in the full scheme, used as the hazards covariate.
    pub position: usize,
    pub display: String,
    pub size: usize,
    pub events: usize,
    pub estimate: KmEstimate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub signature: String,
    pub cut_point: CutPoint,
    pub samples: usize,
    /// Assigned samples without a survival record.
    pub excluded: usize,
    pub groups: Vec<GroupCurve>,
    pub log_rank: LogRankResult,
    pub hazard_ratio: HazardRatio,
}

impl ComparisonResult {
    pub fn p_value(&self) -> Option<f64> {
        self.log_rank.p_value
    }
}

/// Joins `assignment` with survival data (inner join on sample id) and runs
/// the comparison. `survival_of` is the lookup into the survival table.
pub fn compare_groups<F>(
    signature: &str,
    assignment: &GroupAssignment,
    survival_of: F,
    cfg: &SurvivalConfig,
) -> Result<ComparisonResult>
where
    F: Fn(&str) -> Option<SurvivalRecord>,
{
    let cut_point = assignment.cut_point;
    let scheme = cut_point.scheme();
    let positions = cut_point.retained_positions();

    let mut by_group: Vec<Vec<SurvivalRecord>> = vec![Vec::new(); positions.len()];
    let mut excluded = 0usize;
    for sample in &assignment.samples {
        let Some(record) = survival_of(&sample.sample) else {
            excluded += 1;
            continue;
        };
        if let Some(slot) = positions.iter().position(|&p| p == sample.position) {
            by_group[slot].push(record);
        }
    }
    if excluded > 0 {
        warn!(excluded, "assigned samples without survival record excluded");
    }

    let mut groups = Vec::new();
    let mut records = Vec::new();
    for (slot, recs) in by_group.into_iter().enumerate() {
        if recs.is_empty() {
            continue;
        }
        let position = positions[slot];
        if recs.len() < cfg.min_group_size {
            return Err(SigvivalError::InsufficientGroupSize {
                group: scheme[position].to_string(),
                size: recs.len(),
                min_size: cfg.min_group_size,
            });
        }
        groups.push(GroupCurve {
            label: scheme[position],
            position,
            display: cut_point.display_label(position).to_string(),
            size: recs.len(),
            events: recs.iter().filter(|r| r.event).count(),
            estimate: kaplan_meier(&recs),
        });
        records.push((position, recs));
    }
    if groups.len() < 2 {
        let (group, size) = groups
            .first()
            .map_or(("all".to_string(), 0), |g| (g.label.to_string(), g.size));
        return Err(SigvivalError::InsufficientGroupSize {
            group,
            size,
            min_size: cfg.min_group_size,
        });
    }

    let grouped: Vec<Vec<SurvivalRecord>> = records.iter().map(|(_, r)| r.clone()).collect();
    let log_rank = log_rank(&grouped);

    let mut time = Vec::new();
    let mut event = Vec::new();
    let mut covariate = Vec::new();
    for (position, recs) in &records {
        for r in recs {
            time.push(r.time);
            event.push(r.event);
            covariate.push(*position as f64);
        }
    }
    let hazard_ratio = match fit_cox(&time, &event, &covariate, cfg.max_iter, cfg.tol) {
        Ok(fit) => HazardRatio::Estimated(fit),
        Err(err) => {
            warn!(error = %err, "hazard ratio unavailable");
            HazardRatio::Unavailable {
                reason: err.to_string(),
            }
        }
    };

    let samples = time.len();
    info!(
        signature,
        samples,
        groups = groups.len(),
        excluded,
        p_value = log_rank.p_value.unwrap_or(f64::NAN),
        hazard_ratio = hazard_ratio.value().unwrap_or(f64::NAN),
        "survival_compared"
    );

    Ok(ComparisonResult {
        signature: signature.to_string(),
        cut_point,
        samples,
        excluded,
        groups,
        log_rank,
        hazard_ratio,
    })
}
