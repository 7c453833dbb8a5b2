use serde::{Deserialize, Serialize};

use super::decay::exponential_retention;

const TICK_COUNT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    pub day: u32,
    pub retention_percent: f64,
}

impl CurvePoint {
    pub fn at(rate: f64, day: u32) -> Self {
        Self {
            day,
            retention_percent: exponential_retention(rate, f64::from(day)) * 100.0,
        }
    }

    /// Forgetting percentage as shown next to a rounded retention label.
    pub fn forgetting_percent(&self) -> f64 {
        100.0 - self.retention_percent.round()
    }
}

/// Lazily evaluated forgetting curve over `0..=max_days`.
///
/// The sequence is finite and cheap to clone; clone it (or call [`CurveSamples::rewind`])
/// to walk it again.
#[derive(Debug, Clone)]
pub struct CurveSamples {
    rate: f64,
    max_days: u32,
    step_days: u32,
    next_day: Option<u32>,
}

impl CurveSamples {
    pub fn new(rate: f64, max_days: u32, step_days: u32) -> Self {
        Self {
            rate,
            max_days,
            step_days: step_days.max(1),
            next_day: Some(0),
        }
    }

    pub fn max_days(&self) -> u32 {
        self.max_days
    }

    pub fn step_days(&self) -> u32 {
        self.step_days
    }

    pub fn rewind(&mut self) {
        self.next_day = Some(0);
    }

    fn remaining(&self) -> usize {
        match self.next_day {
            Some(day) if day <= self.max_days => ((self.max_days - day) / self.step_days) as usize + 1,
            _ => 0,
        }
    }
}

impl Iterator for CurveSamples {
    type Item = CurvePoint;

    fn next(&mut self) -> Option<Self::Item> {
        let day = self.next_day.filter(|day| *day <= self.max_days)?;
        self.next_day = day.checked_add(self.step_days);
        Some(CurvePoint::at(self.rate, day))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CurveSamples {}

impl std::iter::FusedIterator for CurveSamples {}

pub fn sample_curve(rate: f64, max_days: u32, step_days: u32) -> CurveSamples {
    CurveSamples::new(rate, max_days, step_days)
}

/// Places a study count on the day axis of the curve. Counts past the drawn range
/// extrapolate along the same law.
pub fn current_point(rate: f64, study_count: u32) -> CurvePoint {
    CurvePoint::at(rate, study_count)
}

/// Gridline positions for a chart of the curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTicks {
    pub days: Vec<f64>,
    pub percents: Vec<f64>,
}

impl AxisTicks {
    pub fn for_range(max_days: u32) -> Self {
        let days = (0..=TICK_COUNT)
            .map(|i| f64::from(max_days) * f64::from(i) / f64::from(TICK_COUNT))
            .collect();
        let percents = (0..=TICK_COUNT)
            .map(|i| 100.0 - 100.0 * f64::from(i) / f64::from(TICK_COUNT))
            .collect();
        Self { days, percents }
    }
}
