//! Cut-point schemes and the ordinal group assignment built from them.

mod quantile;

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scores::ScoreTable;

pub use quantile::{assign_groups, bin_edges, bin_of};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GroupLabel {
    Low,
    Medium,
    Medium1,
    Medium2,
    High,
}

impl GroupLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::Medium1 => "Medium1",
            Self::Medium2 => "Medium2",
            Self::High => "High",
        }
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TWO: [GroupLabel; 2] = [GroupLabel::Low, GroupLabel::High];
const THREE: [GroupLabel; 3] = [GroupLabel::Low, GroupLabel::Medium, GroupLabel::High];
const FOUR: [GroupLabel; 4] = [
    GroupLabel::Low,
    GroupLabel::Medium1,
    GroupLabel::Medium2,
    GroupLabel::High,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CutPoint {
    Median,
    Tertile,
    TertileExtremes,
    Quartile,
    QuartileExtremes,
}

impl CutPoint {
    pub const ALL: [CutPoint; 5] = [
        CutPoint::Median,
        CutPoint::Tertile,
        CutPoint::TertileExtremes,
        CutPoint::Quartile,
        CutPoint::QuartileExtremes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Median => "median",
            Self::Tertile => "tertile",
            Self::TertileExtremes => "tertile-extremes",
            Self::Quartile => "quartile",
            Self::QuartileExtremes => "quartile-extremes",
        }
    }

    /// Labels of the full scheme, lowest score first.
    pub fn scheme(&self) -> &'static [GroupLabel] {
        match self {
            Self::Median => &TWO,
            Self::Tertile | Self::TertileExtremes => &THREE,
            Self::Quartile | Self::QuartileExtremes => &FOUR,
        }
    }

    pub fn bins(&self) -> usize {
        self.scheme().len()
    }

    pub fn is_extremes(&self) -> bool {
        matches!(self, Self::TertileExtremes | Self::QuartileExtremes)
    }

    /// Ordinal positions kept for downstream analysis.
    pub fn retains(&self, position: usize) -> bool {
        let bins = self.bins();
        position < bins && (!self.is_extremes() || position == 0 || position == bins - 1)
    }

    pub fn retained_positions(&self) -> Vec<usize> {
        (0..self.bins()).filter(|&p| self.retains(p)).collect()
    }

    pub fn display_label(&self, position: usize) -> &'static str {
        match (self.bins(), position) {
            (2, 0) => "Low: below median",
            (2, 1) => "High: above median",
            (3, 0) => "Low: bottom tertile",
            (3, 1) => "Medium: middle tertile",
            (3, 2) => "High: top tertile",
            (4, 0) => "Low: bottom quartile",
            (4, 1) => "Medium1: second quartile",
            (4, 2) => "Medium2: third quartile",
            (4, 3) => "High: top quartile",
            _ => "",
        }
    }
}

impl fmt::Display for CutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CutPoint {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        CutPoint::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown cut point '{}' (expected one of: {})",
                    s,
                    CutPoint::ALL.map(|c| c.as_str()).join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignedSample {
    pub sample: String,
    pub score: f64,
    /// Ordinal position in the full scheme.
    pub position: usize,
    pub label: GroupLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSize {
    pub label: GroupLabel,
    pub position: usize,
    pub display: &'static str,
    pub size: usize,
    pub mean_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupAssignment {
    pub cut_point: CutPoint,
    pub edges: Vec<f64>,
    /// Retained samples in score-table order.
    pub samples: Vec<AssignedSample>,
    /// Samples without a usable score.
    pub dropped_invalid: usize,
    /// Samples binned into a position the scheme discards.
    pub discarded: usize,
}

impl GroupAssignment {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn label_of(&self, sample: &str) -> Option<GroupLabel> {
        self.samples
            .iter()
            .find(|s| s.sample == sample)
            .map(|s| s.label)
    }

    /// One entry per retained position, including empty ones, in label order.
    pub fn group_sizes(&self) -> Vec<GroupSize> {
        let scheme = self.cut_point.scheme();
        self.cut_point
            .retained_positions()
            .into_iter()
            .map(|position| {
                let scores: Vec<f64> = self
                    .samples
                    .iter()
                    .filter(|s| s.position == position)
                    .map(|s| s.score)
                    .collect();
                GroupSize {
                    label: scheme[position],
                    position,
                    display: self.cut_point.display_label(position),
                    size: scores.len(),
                    mean_score: crate::math::stats::mean(&scores),
                }
            })
            .collect()
    }
}

/// Bins the normalised scores of `table` according to `cut_point`.
pub fn stratify(table: &ScoreTable, cut_point: CutPoint) -> Result<GroupAssignment> {
    let samples: Vec<&str> = table.rows.iter().map(|r| r.sample.as_str()).collect();
    let scores: Vec<f64> = table.rows.iter().map(|r| r.nes).collect();
    assign_groups(&samples, &scores, cut_point)
}
