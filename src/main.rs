use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use retention_engine::config::{Config, MAX_CURVE_DAYS};
use retention_engine::logging::init_tracing;
use retention_engine::{CurvePoint, DecayLaw, RetentionEngine, RetentionUnit};

#[derive(Parser, Debug)]
#[command(name = "retention-curve")]
#[command(about = "Print forgetting-curve samples and retention projections as JSON", long_about = None)]
struct Args {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample the exponential forgetting curve
    Curve {
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=MAX_CURVE_DAYS as i64))]
        max_days: Option<u32>,
        #[arg(long)]
        step_days: Option<u32>,
    },
    /// Place a study count on the curve
    Point { study_count: u32 },
    /// Project retention after a number of elapsed hours
    Project {
        #[arg(allow_negative_numbers = true)]
        elapsed_hours: f64,
        #[arg(long, default_value_t = 0)]
        study_count: u32,
        /// hyperbolic or exponential; defaults to RETENTION_DEFAULT_LAW
        #[arg(long)]
        law: Option<DecayLaw>,
        #[arg(long, default_value = "unit")]
        unit: RetentionUnit,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CurveOutput {
    max_days: u32,
    step_days: u32,
    points: Vec<CurvePoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionOutput {
    elapsed_hours: f64,
    study_count: u32,
    law: DecayLaw,
    unit: RetentionUnit,
    retention: f64,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config);

    let engine = RetentionEngine::new(config.engine.clone());
    tracing::debug!(config = ?engine.config(), "retention engine ready");

    let output = match args.command {
        Command::Curve {
            max_days,
            step_days,
        } => {
            let samples = engine.sample_curve(
                max_days
                    .unwrap_or(engine.config().curve_max_days)
                    .min(MAX_CURVE_DAYS),
                step_days.unwrap_or(engine.config().curve_step_days),
            );
            render(
                &CurveOutput {
                    max_days: samples.max_days(),
                    step_days: samples.step_days(),
                    points: samples.collect(),
                },
                args.pretty,
            )
        }
        Command::Point { study_count } => render(&engine.current_point(study_count), args.pretty),
        Command::Project {
            elapsed_hours,
            study_count,
            law,
            unit,
        } => {
            let law = law.unwrap_or(engine.config().default_law);
            let retention = engine.project_retention(elapsed_hours, study_count, law, unit);
            render(
                &ProjectionOutput {
                    elapsed_hours,
                    study_count,
                    law,
                    unit,
                    retention,
                },
                args.pretty,
            )
        }
    };

    match output {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to render output");
            ExitCode::FAILURE
        }
    }
}

fn render<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
