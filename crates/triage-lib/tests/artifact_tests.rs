//! Loading artifacts and resolving their metadata

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use triage_lib::artifact::{self, ArtifactPaths, MetadataSource, ModelMetadata};
use triage_lib::training::{train, train_on, Dataset, TrainConfig};
use triage_lib::{load_model, ArtifactError, FeatureVector, ModelKind, ModelPipeline, Predictor};

fn sample_features() -> FeatureVector {
    FeatureVector {
        age: 0.02,
        sex: -0.044,
        bmi: 0.06,
        bp: -0.03,
        s1: -0.02,
        s2: 0.03,
        s3: -0.02,
        s4: 0.02,
        s5: 0.02,
        s6: -0.001,
    }
}

fn train_into(root: &Path, version: &str) -> ArtifactPaths {
    let config = TrainConfig {
        version: version.to_string(),
        seed: 0,
        out_dir: root.to_path_buf(),
        ..Default::default()
    };
    train(&config).unwrap().paths
}

#[test]
fn test_missing_model_is_distinct_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("v9").join("model.bin");
    match load_model(&path) {
        Err(ArtifactError::ModelNotFound { path: missing }) => assert_eq!(missing, path),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected ModelNotFound"),
    }
}

#[test]
fn test_corrupt_model_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.bin");
    fs::write(&path, b"definitely not a model").unwrap();
    assert!(matches!(
        load_model(&path),
        Err(ArtifactError::Corrupt { .. })
    ));
}

#[test]
fn test_metadata_from_sidecar() {
    let dir = TempDir::new().unwrap();
    let paths = train_into(dir.path(), "v0.1");

    let loaded = load_model(&paths.model).unwrap();
    assert!(matches!(loaded.metadata, MetadataSource::Sidecar(_)));
    let metadata = loaded.metadata.record();
    assert_eq!(metadata.version_or_unknown(), "v0.1");
    assert_eq!(metadata.type_or_unknown(), "LinearRegression");
    assert_eq!(loaded.checksum.len(), 64);
}

#[test]
fn test_sidecar_takes_priority_over_embedded() {
    let dir = TempDir::new().unwrap();
    let paths = train_into(dir.path(), "v0.1");
    fs::write(&paths.metadata, r#"{"model_version": "edited"}"#).unwrap();

    let loaded = load_model(&paths.model).unwrap();
    let metadata = loaded.metadata.record();
    assert_eq!(metadata.version_or_unknown(), "edited");
    assert_eq!(metadata.type_or_unknown(), "unknown");
}

#[test]
fn test_metadata_falls_back_to_embedded_copy() {
    let dir = TempDir::new().unwrap();
    let paths = train_into(dir.path(), "v0.2");
    fs::remove_file(&paths.metadata).unwrap();

    let loaded = load_model(&paths.model).unwrap();
    match &loaded.metadata {
        MetadataSource::Embedded(metadata) => {
            assert_eq!(metadata.version_or_unknown(), "v0.2");
            assert_eq!(metadata.random_seed, Some(0));
        }
        other => panic!("expected embedded metadata, got {:?}", other),
    }
}

#[test]
fn test_missing_metadata_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let dataset = Dataset::diabetes().unwrap();
    let (train_set, _) = dataset.split(0.2, 0).unwrap();
    let pipeline = ModelPipeline::fit(ModelKind::Linear, &train_set, 0).unwrap();

    let model_path = dir.path().join("model.bin");
    fs::write(&model_path, bincode::serialize(&pipeline).unwrap()).unwrap();

    let loaded = load_model(&model_path).unwrap();
    assert_eq!(loaded.metadata, MetadataSource::Absent);
    assert_eq!(loaded.metadata.record(), ModelMetadata::default());
    assert!(loaded.pipeline.predict(&sample_features()).is_ok());
}

#[test]
fn test_malformed_sidecar_is_an_error() {
    let dir = TempDir::new().unwrap();
    let paths = train_into(dir.path(), "v0.3");
    fs::write(&paths.metadata, b"{not json").unwrap();
    assert!(matches!(
        load_model(&paths.model),
        Err(ArtifactError::Json { .. })
    ));
}

#[test]
fn test_loaded_model_matches_trained_predictions() {
    let dir = TempDir::new().unwrap();
    let config = TrainConfig {
        kind: ModelKind::RandomForest,
        seed: 5,
        version: "rf".to_string(),
        out_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let dataset = Dataset::diabetes().unwrap();
    let report = train_on(&config, &dataset).unwrap();

    let loaded = load_model(&report.paths.model).unwrap();
    assert_eq!(loaded.pipeline.kind(), ModelKind::RandomForest);

    // re-score the validation partition with the reloaded model
    let (train_set, validation) = dataset.split(config.test_size, config.seed).unwrap();
    let predictions = loaded.pipeline.predict_rows(validation.rows()).unwrap();
    let evaluation =
        triage_lib::training::evaluate(train_set.targets(), validation.targets(), &predictions);
    assert_eq!(evaluation.rmse, report.metrics.rmse);

    let stored = artifact::read_metrics(&report.paths).unwrap();
    assert_eq!(stored, report.metrics);
}

#[test]
fn test_sample_payload_prediction_is_finite() {
    let dir = TempDir::new().unwrap();
    let paths = train_into(dir.path(), "v0.1");
    let loaded = load_model(&paths.model).unwrap();

    let prediction = loaded.pipeline.predict(&sample_features()).unwrap();
    assert!(prediction.is_finite());
}
