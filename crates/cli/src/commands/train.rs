//! `triage train`

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tracing::info;
use triage_lib::{MetricsRecord, ModelMetadata, TrainConfig};

use crate::output::{format_score, print_metrics, print_success, OutputFormat};

/// Machine-readable training summary
#[derive(Serialize)]
struct TrainSummary<'a> {
    model_path: String,
    train_rows: usize,
    validation_rows: usize,
    finished_at: String,
    metadata: &'a ModelMetadata,
    metrics: &'a MetricsRecord,
}

/// Train a model and report where it was saved
pub fn run_training(config: &TrainConfig, format: OutputFormat) -> Result<()> {
    info!(kind = %config.kind, version = %config.version, "Training requested");
    let report = triage_lib::train(config).with_context(|| {
        format!(
            "Training {} model version {} failed",
            config.kind, config.version
        )
    })?;

    match format {
        OutputFormat::Json => {
            let summary = TrainSummary {
                model_path: report.paths.model.display().to_string(),
                train_rows: report.train_rows,
                validation_rows: report.validation_rows,
                finished_at: report.finished_at.to_rfc3339(),
                metadata: &report.metadata,
                metrics: &report.metrics,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            print_success(&format!(
                "Saved model to {}",
                report.paths.model.display().to_string().cyan()
            ));
            println!(
                "Trained {} on {} rows, validated on {} rows (RMSE {})",
                report.metadata.type_or_unknown().bold(),
                report.train_rows,
                report.validation_rows,
                format_score(Some(report.metrics.rmse))
            );
            println!();
            print_metrics(&report.metrics);
        }
    }

    Ok(())
}
