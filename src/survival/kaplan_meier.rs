use std::cmp::Ordering;

use serde::Serialize;

use crate::survival::SurvivalRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KmPoint {
    pub time: f64,
    pub at_risk: usize,
    pub events: usize,
    pub censored: usize,
    pub survival: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KmEstimate {
    /// Step points in increasing time, starting at `(0, 1.0)`.
    pub points: Vec<KmPoint>,
    pub median: Option<f64>,
}

impl KmEstimate {
    /// Survival probability just after `time`.
    pub fn survival_at(&self, time: f64) -> f64 {
        self.points
            .iter()
            .take_while(|p| p.time <= time)
            .last()
            .map_or(1.0, |p| p.survival)
    }
}

pub fn kaplan_meier(records: &[SurvivalRecord]) -> KmEstimate {
    let mut sorted: Vec<SurvivalRecord> = records.to_vec();
    sorted.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));

    let mut points = Vec::new();
    let starts_at_zero = sorted.first().is_some_and(|r| r.time <= 0.0);
    if !starts_at_zero {
        points.push(KmPoint {
            time: 0.0,
            at_risk: sorted.len(),
            events: 0,
            censored: 0,
            survival: 1.0,
        });
    }

    let mut at_risk = sorted.len();
    let mut survival = 1.0f64;
    let mut median = None;
    let mut i = 0;
    while i < sorted.len() {
        let time = sorted[i].time;
        let mut events = 0;
        let mut censored = 0;
        while i < sorted.len() && sorted[i].time == time {
            if sorted[i].event {
                events += 1;
            } else {
                censored += 1;
            }
            i += 1;
        }
        if events > 0 {
            survival *= 1.0 - events as f64 / at_risk as f64;
        }
        points.push(KmPoint {
            time,
            at_risk,
            events,
            censored,
            survival,
        });
        if median.is_none() && survival <= 0.5 {
            median = Some(time);
        }
        at_risk -= events + censored;
    }

    KmEstimate { points, median }
}
