use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::retention::DecayLaw;

pub const DEFAULT_HYPERBOLIC_K: f64 = 0.1;
pub const DEFAULT_DECAY_RATE: f64 = 0.1;
pub const DEFAULT_CURVE_MAX_DAYS: u32 = 28;
/// Upper bound for any sampled curve range, ten years of days.
pub const MAX_CURVE_DAYS: u32 = 3650;
pub const DEFAULT_CURVE_STEP_DAYS: u32 = 1;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// Set when `ENABLE_FILE_LOGS` is on; daily-rolled files are written here.
    pub log_dir: Option<PathBuf>,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let file_logs = std::env::var("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let log_dir = file_logs.then(|| {
            std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./logs"))
        });

        Self {
            log_level,
            log_dir,
            engine: EngineConfig::from_env(),
        }
    }
}

/// Tunable constants of the retention model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// `k` in `1 - 1 / (1 + k * hours)`.
    pub hyperbolic_k: f64,
    /// Per-day rate of the discrete exponential curve, `exp(-rate * day)`.
    pub decay_rate: f64,
    pub curve_max_days: u32,
    pub curve_step_days: u32,
    pub default_law: DecayLaw,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hyperbolic_k: DEFAULT_HYPERBOLIC_K,
            decay_rate: DEFAULT_DECAY_RATE,
            curve_max_days: DEFAULT_CURVE_MAX_DAYS,
            curve_step_days: DEFAULT_CURVE_STEP_DAYS,
            default_law: DecayLaw::Hyperbolic,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            hyperbolic_k: env_f64("RETENTION_HYPERBOLIC_K")
                .filter(|v| *v >= 0.0)
                .unwrap_or(defaults.hyperbolic_k),
            decay_rate: env_f64("RETENTION_DECAY_RATE")
                .filter(|v| *v >= 0.0)
                .unwrap_or(defaults.decay_rate),
            curve_max_days: env_u32("RETENTION_CURVE_MAX_DAYS")
                .filter(|v| *v <= MAX_CURVE_DAYS)
                .unwrap_or(defaults.curve_max_days),
            curve_step_days: env_u32("RETENTION_CURVE_STEP_DAYS")
                .filter(|v| *v > 0)
                .unwrap_or(defaults.curve_step_days),
            default_law: std::env::var("RETENTION_DEFAULT_LAW")
                .ok()
                .and_then(|value| value.parse::<DecayLaw>().ok())
                .unwrap_or(defaults.default_law),
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

fn env_u32(key: &str) -> Option<u32> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
}
