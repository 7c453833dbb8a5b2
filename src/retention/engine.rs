use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::LearningItem;

use super::curve::{self, AxisTicks, CurvePoint, CurveSamples};
use super::decay::{
    exponential_retention, forgetting_rate, hyperbolic_retention, whole_days, DecayLaw,
    RetentionUnit,
};

/// Retention added by one study event.
pub const STUDY_BOOST: f64 = 0.2;
/// Ceiling for boosted retention.
pub const RETENTION_CAP: f64 = 1.0;

/// Derived retention values for displaying one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionSnapshot {
    pub study_count: u32,
    /// Value held by the store, as last set by a study event.
    pub stored_retention: f64,
    /// Stored retention aged along the exponential law since the last study.
    pub projected_retention: f64,
    /// Hyperbolic forgetting since creation, percent with one decimal.
    pub forgetting_percent_since_created: f64,
    pub current_point: CurvePoint,
    pub current_forgetting_percent: f64,
    pub ticks: AxisTicks,
}

/// Stateless retention calculator. Holds nothing but its constants, so one instance
/// can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct RetentionEngine {
    config: EngineConfig,
}

impl RetentionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Retention after `elapsed_hours` under `law`.
    ///
    /// The exponential law is evaluated at whole days. `study_count` is part of the
    /// call contract but neither law weights by it; see [`Self::current_point`] for
    /// the curve position keyed on study count.
    pub fn project_retention(
        &self,
        elapsed_hours: f64,
        study_count: u32,
        law: DecayLaw,
        unit: RetentionUnit,
    ) -> f64 {
        let retention = match law {
            DecayLaw::Hyperbolic => hyperbolic_retention(self.config.hyperbolic_k, elapsed_hours),
            DecayLaw::Exponential => {
                exponential_retention(self.config.decay_rate, whole_days(elapsed_hours))
            }
        };
        trace!(elapsed_hours, study_count, law = %law, retention, "projected retention");
        unit.scale(retention)
    }

    /// [`Self::project_retention`] with the configured default law, as a fraction.
    pub fn project(&self, elapsed_hours: f64, study_count: u32) -> f64 {
        self.project_retention(
            elapsed_hours,
            study_count,
            self.config.default_law,
            RetentionUnit::Unit,
        )
    }

    /// `1 - retention` for the hyperbolic law, the list-view reading of an item's age.
    pub fn forgetting_rate(&self, elapsed_hours: f64) -> f64 {
        forgetting_rate(hyperbolic_retention(self.config.hyperbolic_k, elapsed_hours))
    }

    /// Stored retention decayed from the last study event to `now`.
    pub fn project_item(&self, item: &LearningItem, now: DateTime<Utc>) -> Result<f64, EngineError> {
        item.validate()?;
        let days = whole_days(item.hours_since_studied(now));
        Ok((item.retention * exponential_retention(self.config.decay_rate, days)).clamp(0.0, 1.0))
    }

    /// Post-study state: one more study, boosted retention capped at full, decay clock reset.
    pub fn apply_study_event(
        &self,
        item: &LearningItem,
        now: DateTime<Utc>,
    ) -> Result<LearningItem, EngineError> {
        item.validate()?;
        let study_count = item
            .study_count
            .checked_add(1)
            .ok_or(EngineError::StudyCountOverflow(item.study_count))?;
        let retention = (item.retention + STUDY_BOOST).min(RETENTION_CAP);

        debug!(
            study_count,
            previous_retention = item.retention,
            retention,
            "applied study event"
        );

        Ok(LearningItem {
            study_count,
            retention,
            created_at: item.created_at,
            last_studied_at: now,
        })
    }

    pub fn sample_curve(&self, max_days: u32, step_days: u32) -> CurveSamples {
        curve::sample_curve(self.config.decay_rate, max_days, step_days)
    }

    /// Curve over the configured range, 28 days in steps of one by default.
    pub fn default_curve(&self) -> CurveSamples {
        self.sample_curve(self.config.curve_max_days, self.config.curve_step_days)
    }

    pub fn current_point(&self, study_count: u32) -> CurvePoint {
        curve::current_point(self.config.decay_rate, study_count)
    }

    pub fn snapshot(
        &self,
        item: &LearningItem,
        now: DateTime<Utc>,
    ) -> Result<RetentionSnapshot, EngineError> {
        let projected_retention = self.project_item(item, now)?;
        let current_point = self.current_point(item.study_count);
        let forgetting = self.forgetting_rate(item.hours_since_created(now)) * 100.0;

        Ok(RetentionSnapshot {
            study_count: item.study_count,
            stored_retention: item.retention,
            projected_retention,
            forgetting_percent_since_created: (forgetting * 10.0).round() / 10.0,
            current_forgetting_percent: current_point.forgetting_percent(),
            current_point,
            ticks: AxisTicks::for_range(self.config.curve_max_days),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const EPSILON: f64 = 1e-9;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn item(study_count: u32, retention: f64) -> LearningItem {
        LearningItem {
            study_count,
            retention,
            ..LearningItem::new(ts())
        }
    }

    #[test]
    fn study_caps_at_full_retention() {
        let engine = RetentionEngine::default();
        let next = engine.apply_study_event(&item(4, 0.9), ts()).unwrap();
        assert_eq!(next.retention, 1.0);
        assert_eq!(next.study_count, 5);
    }

    #[test]
    fn study_resets_decay_clock() {
        let engine = RetentionEngine::default();
        let later = ts() + Duration::days(3);
        let next = engine.apply_study_event(&item(1, 0.3), later).unwrap();
        assert_eq!(next.last_studied_at, later);
        assert_eq!(next.created_at, ts());
        assert!((engine.project_item(&next, later).unwrap() - 0.5).abs() < EPSILON);
    }

    #[test]
    fn study_rejects_malformed_retention() {
        let engine = RetentionEngine::default();
        assert_eq!(
            engine.apply_study_event(&item(0, 1.2), ts()),
            Err(EngineError::RetentionOutOfRange(1.2))
        );
        assert!(engine.apply_study_event(&item(0, f64::NAN), ts()).is_err());
        assert!(engine.apply_study_event(&item(0, -0.1), ts()).is_err());
    }

    #[test]
    fn study_count_overflow_is_reported() {
        let engine = RetentionEngine::default();
        assert_eq!(
            engine.apply_study_event(&item(u32::MAX, 0.5), ts()),
            Err(EngineError::StudyCountOverflow(u32::MAX))
        );
    }

    #[test]
    fn exponential_projection_steps_by_day() {
        let engine = RetentionEngine::default();
        let same_day = engine.project_retention(23.0, 0, DecayLaw::Exponential, RetentionUnit::Unit);
        let one_day = engine.project_retention(24.0, 0, DecayLaw::Exponential, RetentionUnit::Unit);
        assert_eq!(same_day, 1.0);
        assert!((one_day - (-0.1f64).exp()).abs() < EPSILON);

        let percent =
            engine.project_retention(7.0 * 24.0, 0, DecayLaw::Exponential, RetentionUnit::Percent);
        assert!((percent - 49.658530379140951).abs() < 1e-9);
    }

    #[test]
    fn project_uses_configured_law() {
        let engine = RetentionEngine::new(EngineConfig {
            default_law: DecayLaw::Exponential,
            ..EngineConfig::default()
        });
        assert_eq!(engine.project(10.0, 0), 1.0);
        assert!((RetentionEngine::default().project(10.0, 0) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn project_item_decays_from_last_study() {
        let engine = RetentionEngine::default();
        let studied = item(2, 0.8);
        let week_later = ts() + Duration::days(7);
        let expected = 0.8 * (-0.7f64).exp();
        assert!((engine.project_item(&studied, week_later).unwrap() - expected).abs() < EPSILON);
        assert_eq!(engine.project_item(&studied, ts() - Duration::days(1)), Ok(0.8));
    }

    #[test]
    fn projection_rejects_malformed_retention() {
        let engine = RetentionEngine::default();
        let later = ts() + Duration::days(2);

        assert!(matches!(
            engine.project_item(&item(1, f64::NAN), later),
            Err(EngineError::RetentionOutOfRange(r)) if r.is_nan()
        ));
        assert_eq!(
            engine.project_item(&item(1, 1.5), later),
            Err(EngineError::RetentionOutOfRange(1.5))
        );
        assert!(engine.snapshot(&item(1, f64::NAN), later).is_err());
        assert_eq!(
            engine.snapshot(&item(1, -0.2), later),
            Err(EngineError::RetentionOutOfRange(-0.2))
        );
    }

    #[test]
    fn snapshot_reports_list_and_chart_values() {
        let engine = RetentionEngine::default();
        let snapshot = engine.snapshot(&item(7, 0.6), ts() + Duration::hours(10)).unwrap();

        assert_eq!(snapshot.study_count, 7);
        assert_eq!(snapshot.stored_retention, 0.6);
        assert_eq!(snapshot.projected_retention, 0.6);
        assert_eq!(snapshot.forgetting_percent_since_created, 50.0);
        assert_eq!(snapshot.current_point.day, 7);
        assert_eq!(snapshot.current_forgetting_percent, 50.0);
        assert_eq!(snapshot.ticks.days.len(), 5);
    }

    #[test]
    fn forgetting_rate_rounds_like_list_view() {
        let engine = RetentionEngine::default();
        let snapshot = engine.snapshot(&item(0, 1.0), ts() + Duration::hours(1)).unwrap();
        // 1 - 1/1.1 = 0.0909..
        assert_eq!(snapshot.forgetting_percent_since_created, 9.1);
    }
}
