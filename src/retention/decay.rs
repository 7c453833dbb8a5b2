use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const HOURS_PER_DAY: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayLaw {
    /// `1 / (1 + k * hours)`, continuous in elapsed hours.
    #[default]
    Hyperbolic,
    /// `exp(-rate * day)` evaluated at whole days elapsed.
    Exponential,
}

impl DecayLaw {
    pub const fn as_str(self) -> &'static str {
        match self {
            DecayLaw::Hyperbolic => "hyperbolic",
            DecayLaw::Exponential => "exponential",
        }
    }
}

impl fmt::Display for DecayLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecayLaw {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hyperbolic" => Ok(DecayLaw::Hyperbolic),
            "exponential" | "exp" => Ok(DecayLaw::Exponential),
            other => Err(format!("unknown decay law: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionUnit {
    /// Fraction in `[0, 1]`.
    #[default]
    Unit,
    /// Percentage in `[0, 100]`.
    Percent,
}

impl RetentionUnit {
    pub fn scale(self, retention: f64) -> f64 {
        match self {
            RetentionUnit::Unit => retention,
            RetentionUnit::Percent => retention * 100.0,
        }
    }
}

impl FromStr for RetentionUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unit" | "fraction" => Ok(RetentionUnit::Unit),
            "percent" | "%" => Ok(RetentionUnit::Percent),
            other => Err(format!("unknown retention unit: {other}")),
        }
    }
}

/// Negative and NaN elapsed time collapse to zero; `+inf` is kept so the law can take its limit.
pub(crate) fn sanitize_elapsed(value: f64) -> f64 {
    if value.is_nan() || value <= 0.0 {
        0.0
    } else {
        value
    }
}

pub(crate) fn whole_days(elapsed_hours: f64) -> f64 {
    (sanitize_elapsed(elapsed_hours) / HOURS_PER_DAY).floor()
}

pub fn hyperbolic_retention(k: f64, elapsed_hours: f64) -> f64 {
    let hours = sanitize_elapsed(elapsed_hours);
    if k <= 0.0 || hours == 0.0 {
        return 1.0;
    }
    let forgetting = 1.0 - 1.0 / (1.0 + k * hours);
    (1.0 - forgetting).clamp(0.0, 1.0)
}

pub fn exponential_retention(rate: f64, day: f64) -> f64 {
    let day = sanitize_elapsed(day);
    if rate <= 0.0 || day == 0.0 {
        return 1.0;
    }
    (-rate * day).exp().clamp(0.0, 1.0)
}

pub fn forgetting_rate(retention: f64) -> f64 {
    if retention.is_nan() {
        return 1.0;
    }
    (1.0 - retention).clamp(0.0, 1.0)
}
