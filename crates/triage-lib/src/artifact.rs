//! Model artifact persistence and loading
//!
//! Layout per version `V` under an output root:
//!
//! ```text
//! <root>/<V>/model.bin             bincode-encoded ModelPipeline
//! <root>/<V>/model_metadata.json   ModelMetadata
//! <root>/<V>/metrics.json          MetricsRecord
//! ```
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! reader never observes a half-written file. Re-training a version
//! overwrites its files.

use crate::error::ArtifactError;
use crate::predictor::ModelPipeline;
use crate::training::{Evaluation, TrainConfig};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const MODEL_FILE_NAME: &str = "model.bin";
pub const METADATA_FILE_NAME: &str = "model_metadata.json";
pub const METRICS_FILE_NAME: &str = "metrics.json";

/// Reported for any metadata field that could not be resolved
pub const UNKNOWN: &str = "unknown";

/// Description of which model variant and seed produced an artifact.
///
/// Every field is optional so partial or foreign sidecars still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMetadata {
    pub model_version: Option<String>,
    pub model_type: Option<String>,
    pub random_seed: Option<u64>,
    pub model_kind: Option<String>,
    pub rmse: Option<f64>,
}

impl ModelMetadata {
    pub fn for_run(config: &TrainConfig, rmse: f64) -> Self {
        Self {
            model_version: Some(config.version.clone()),
            model_type: Some(config.kind.model_type().to_string()),
            random_seed: Some(config.seed),
            model_kind: Some(config.kind.as_str().to_string()),
            rmse: Some(rmse),
        }
    }

    pub fn version_or_unknown(&self) -> &str {
        self.model_version.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn type_or_unknown(&self) -> &str {
        self.model_type.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Validation scores written next to the model for offline inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub rmse: f64,
    pub threshold_top10_percent: f64,
    pub precision_at_top10: Option<f64>,
    pub recall_at_top10: Option<f64>,
}

impl From<Evaluation> for MetricsRecord {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            rmse: evaluation.rmse,
            threshold_top10_percent: evaluation.threshold,
            precision_at_top10: evaluation.precision,
            recall_at_top10: evaluation.recall,
        }
    }
}

/// File locations of one artifact version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub model: PathBuf,
    pub metadata: PathBuf,
    pub metrics: PathBuf,
}

impl ArtifactPaths {
    pub fn for_version(root: &Path, version: &str) -> Self {
        let dir = root.join(version);
        Self {
            model: dir.join(MODEL_FILE_NAME),
            metadata: dir.join(METADATA_FILE_NAME),
            metrics: dir.join(METRICS_FILE_NAME),
            dir,
        }
    }
}

/// Write model, metadata and metrics for one version
pub fn write_artifacts(
    paths: &ArtifactPaths,
    pipeline: &ModelPipeline,
    metadata: &ModelMetadata,
    metrics: &MetricsRecord,
) -> Result<(), ArtifactError> {
    fs::create_dir_all(&paths.dir).map_err(io_error(&paths.dir))?;

    let model_bytes =
        bincode::serialize(pipeline).map_err(|e| ArtifactError::Encode(e.to_string()))?;
    write_atomic(&paths.model, &model_bytes)?;
    write_atomic(&paths.metadata, &to_pretty_json(&paths.metadata, metadata)?)?;
    write_atomic(&paths.metrics, &to_pretty_json(&paths.metrics, metrics)?)?;

    info!(
        dir = %paths.dir.display(),
        size = model_bytes.len(),
        checksum = %compute_checksum(&model_bytes),
        "Artifacts written"
    );
    Ok(())
}

/// Read the metrics record of an artifact version
pub fn read_metrics(paths: &ArtifactPaths) -> Result<MetricsRecord, ArtifactError> {
    read_json(&paths.metrics)
}

fn to_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<Vec<u8>, ArtifactError> {
    serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ArtifactError {
    let path = path.to_path_buf();
    move |source| ArtifactError::Io { path, source }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = File::create(&temp_path).map_err(io_error(&temp_path))?;
    file.write_all(bytes).map_err(io_error(&temp_path))?;
    file.sync_all().map_err(io_error(&temp_path))?;

    fs::rename(&temp_path, path).map_err(io_error(path))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Wrote artifact file");
    Ok(())
}

/// Compute SHA256 checksum of data
fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Sidecar location for a model file: `<dir>/<stem>_metadata.json`
pub fn metadata_sidecar_path(model_path: &Path) -> PathBuf {
    let stem = model_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    model_path.with_file_name(format!("{}_metadata.json", stem))
}

/// Where the metadata of a loaded model came from
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataSource {
    /// Parsed from the sidecar JSON file
    Sidecar(ModelMetadata),
    /// Carried inside the model artifact
    Embedded(ModelMetadata),
    /// Neither was available
    Absent,
}

impl MetadataSource {
    pub fn label(&self) -> &'static str {
        match self {
            MetadataSource::Sidecar(_) => "sidecar",
            MetadataSource::Embedded(_) => "embedded",
            MetadataSource::Absent => "absent",
        }
    }

    /// The resolved record; empty when absent
    pub fn record(&self) -> ModelMetadata {
        match self {
            MetadataSource::Sidecar(metadata) | MetadataSource::Embedded(metadata) => {
                metadata.clone()
            }
            MetadataSource::Absent => ModelMetadata::default(),
        }
    }
}

/// Resolve metadata: sidecar file first, then the embedded copy, then none.
///
/// A sidecar that exists but does not parse is an error.
pub fn resolve_metadata(
    model_path: &Path,
    pipeline: &ModelPipeline,
) -> Result<MetadataSource, ArtifactError> {
    let sidecar = metadata_sidecar_path(model_path);
    if sidecar.exists() {
        return read_json(&sidecar).map(MetadataSource::Sidecar);
    }
    match pipeline.embedded_metadata() {
        Some(metadata) => Ok(MetadataSource::Embedded(metadata.clone())),
        None => Ok(MetadataSource::Absent),
    }
}

/// A deserialized model ready to serve predictions
pub struct LoadedModel {
    pub path: PathBuf,
    pub pipeline: ModelPipeline,
    pub metadata: MetadataSource,
    pub checksum: String,
}

/// Load a model artifact and resolve its metadata
pub fn load_model(path: &Path) -> Result<LoadedModel, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::ModelNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path).map_err(io_error(path))?;
    let checksum = compute_checksum(&bytes);

    let pipeline: ModelPipeline =
        bincode::deserialize(&bytes).map_err(|e| ArtifactError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let metadata = resolve_metadata(path, &pipeline)?;
    if matches!(metadata, MetadataSource::Absent) {
        warn!(path = %path.display(), "No metadata found for model; reporting as unknown");
    }

    info!(
        path = %path.display(),
        kind = %pipeline.kind(),
        checksum = %checksum,
        metadata_source = metadata.label(),
        "Loaded model"
    );

    Ok(LoadedModel {
        path: path.to_path_buf(),
        pipeline,
        metadata,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum(b"test model weights");
        assert_eq!(checksum.len(), 64);
        assert_eq!(checksum, compute_checksum(b"test model weights"));
        assert_ne!(checksum, compute_checksum(b"other weights"));
    }

    #[test]
    fn test_artifact_paths_layout() {
        let paths = ArtifactPaths::for_version(Path::new("/tmp/models"), "v0.1");
        assert_eq!(paths.dir, PathBuf::from("/tmp/models/v0.1"));
        assert_eq!(paths.model, PathBuf::from("/tmp/models/v0.1/model.bin"));
        assert_eq!(
            paths.metadata,
            PathBuf::from("/tmp/models/v0.1/model_metadata.json")
        );
        assert_eq!(paths.metrics, PathBuf::from("/tmp/models/v0.1/metrics.json"));
    }

    #[test]
    fn test_sidecar_path_matches_written_metadata_file() {
        let paths = ArtifactPaths::for_version(Path::new("models"), "v2");
        assert_eq!(metadata_sidecar_path(&paths.model), paths.metadata);
    }

    #[test]
    fn test_partial_metadata_parses() {
        let metadata: ModelMetadata = serde_json::from_str(r#"{"model_version": "v7"}"#).unwrap();
        assert_eq!(metadata.version_or_unknown(), "v7");
        assert_eq!(metadata.type_or_unknown(), UNKNOWN);
        assert!(!metadata.is_empty());
    }

    #[test]
    fn test_empty_metadata_reports_unknown() {
        let metadata = MetadataSource::Absent.record();
        assert!(metadata.is_empty());
        assert_eq!(metadata.version_or_unknown(), "unknown");
        assert_eq!(metadata.type_or_unknown(), "unknown");
    }

    #[test]
    fn test_metrics_record_serializes_absent_scores_as_null() {
        let record = MetricsRecord {
            rmse: 1.5,
            threshold_top10_percent: 200.0,
            precision_at_top10: None,
            recall_at_top10: Some(0.25),
        };
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert!(json["precision_at_top10"].is_null());
        assert_eq!(json["recall_at_top10"], 0.25);
    }

    #[test]
    fn test_write_atomic_replaces_existing_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("metrics.json");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!temp_dir.path().join("metrics.json.tmp").exists());
    }
}
