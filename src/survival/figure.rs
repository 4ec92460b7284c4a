use serde::Serialize;

use crate::survival::ComparisonResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureCurve {
    pub label: String,
    /// Staircase vertices, ready to draw as a polyline.
    pub path: Vec<(f64, f64)>,
    /// Censoring times with the survival level at which they occur.
    pub censor_marks: Vec<(f64, f64)>,
}

/// Owned survival plot description. Rendering to an image happens in the
/// exporter; the figure itself holds no drawing context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KmFigure {
    pub title: String,
    pub legend_title: String,
    pub x_label: String,
    pub y_label: String,
    pub max_time: f64,
    pub curves: Vec<FigureCurve>,
}

pub fn format_title(signature: &str, p_value: Option<f64>, hazard_ratio: Option<f64>) -> String {
    let fmt = |v: Option<f64>| v.map_or_else(|| "NA".to_string(), |x| format!("{:.4}", x));
    format!("{}  P={}, HR={}", signature, fmt(p_value), fmt(hazard_ratio))
}

impl KmFigure {
    pub fn from_comparison(result: &ComparisonResult) -> Self {
        let mut max_time = 0.0f64;
        let curves = result
            .groups
            .iter()
            .map(|group| {
                let mut path = Vec::with_capacity(group.estimate.points.len() * 2);
                let mut censor_marks = Vec::new();
                let mut level = 1.0;
                for point in &group.estimate.points {
                    path.push((point.time, level));
                    if point.survival != level {
                        path.push((point.time, point.survival));
                    }
                    level = point.survival;
                    if point.censored > 0 {
                        censor_marks.push((point.time, point.survival));
                    }
                    max_time = max_time.max(point.time);
                }
                FigureCurve {
                    label: group.display.clone(),
                    path,
                    censor_marks,
                }
            })
            .collect();

        Self {
            title: format_title(
                &result.signature,
                result.p_value(),
                result.hazard_ratio.value(),
            ),
            legend_title: "NES".to_string(),
            x_label: "Time (days)".to_string(),
            y_label: "Survival probability".to_string(),
            max_time,
            curves,
        }
    }
}
