//! Retention model - forgetting laws, curve sampling and study boosts
//!
//! Contains:
//! - Decay laws (hyperbolic over hours, discrete exponential over days)
//! - Forgetting curve samples and the "current point" marker
//! - Clock - injectable time source
//! - RetentionEngine - unified entry point for retention computations

pub mod clock;
pub mod curve;
pub mod decay;

mod engine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use curve::{current_point, sample_curve, AxisTicks, CurvePoint, CurveSamples};
pub use decay::{exponential_retention, forgetting_rate, hyperbolic_retention, DecayLaw, RetentionUnit};
pub use engine::{RetentionEngine, RetentionSnapshot, RETENTION_CAP, STUDY_BOOST};
