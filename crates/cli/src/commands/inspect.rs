//! `triage inspect`

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use triage_lib::artifact::{self, ArtifactPaths, UNKNOWN};
use triage_lib::{load_model, MetricsRecord, ModelMetadata};

use crate::output::{print_metrics, print_warning, OutputFormat};

#[derive(Serialize)]
struct InspectSummary {
    model_path: String,
    checksum: String,
    metadata_source: &'static str,
    metadata: ModelMetadata,
    metrics: Option<MetricsRecord>,
}

/// Load an artifact through the serving loader and print what it reports
pub fn show_artifact(out_dir: &Path, version: &str, format: OutputFormat) -> Result<()> {
    let paths = ArtifactPaths::for_version(out_dir, version);
    let model = load_model(&paths.model)
        .with_context(|| format!("Failed to load model version {}", version))?;

    // metrics.json is informational; its absence is reported, not fatal
    let metrics = artifact::read_metrics(&paths).ok();
    let metadata = model.metadata.record();

    match format {
        OutputFormat::Json => {
            let summary = InspectSummary {
                model_path: paths.model.display().to_string(),
                checksum: model.checksum.clone(),
                metadata_source: model.metadata.label(),
                metadata,
                metrics,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            println!("{}", "Model Artifact".bold());
            println!("{}", "=".repeat(50));
            println!("Path:                   {}", paths.model.display().to_string().cyan());
            println!("Checksum (sha256):      {}", model.checksum);
            println!("Metadata source:        {}", model.metadata.label());
            println!("Model version:          {}", metadata.version_or_unknown());
            println!("Model type:             {}", metadata.type_or_unknown());
            println!(
                "Model kind:             {}",
                metadata.model_kind.as_deref().unwrap_or(UNKNOWN)
            );
            println!(
                "Random seed:            {}",
                metadata
                    .random_seed
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| UNKNOWN.to_string())
            );
            println!();

            match metrics {
                Some(metrics) => print_metrics(&metrics),
                None => print_warning("No readable metrics.json for this version"),
            }
        }
    }

    Ok(())
}
