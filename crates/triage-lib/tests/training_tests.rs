//! End-to-end training runs against the bundled dataset

use std::fs;
use tempfile::TempDir;
use triage_lib::training::{rmse, train, Dataset, TrainConfig};
use triage_lib::{ModelKind, TrainError};

fn config_in(dir: &TempDir, kind: ModelKind, seed: u64, version: &str) -> TrainConfig {
    TrainConfig {
        kind,
        seed,
        version: version.to_string(),
        test_size: 0.2,
        out_dir: dir.path().to_path_buf(),
    }
}

#[test]
fn test_train_creates_files() {
    let out = TempDir::new().unwrap();
    let report = train(&config_in(&out, ModelKind::Linear, 0, "test")).unwrap();

    let model_path = out.path().join("test").join("model.bin");
    let metrics_path = out.path().join("test").join("metrics.json");
    let metadata_path = out.path().join("test").join("model_metadata.json");
    assert!(model_path.exists());
    assert!(metrics_path.exists());
    assert!(metadata_path.exists());
    assert_eq!(report.paths.model, model_path);

    let metrics: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&metrics_path).unwrap()).unwrap();
    assert!(metrics.get("rmse").is_some());
    assert!(metrics.get("threshold_top10_percent").is_some());
    assert!(metrics.get("precision_at_top10").is_some());
    assert!(metrics.get("recall_at_top10").is_some());
}

#[test]
fn test_metadata_sidecar_contents() {
    let out = TempDir::new().unwrap();
    let report = train(&config_in(&out, ModelKind::Ridge, 7, "v-ridge")).unwrap();

    let metadata: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report.paths.metadata).unwrap()).unwrap();
    assert_eq!(metadata["model_version"], "v-ridge");
    assert_eq!(metadata["model_type"], "Ridge");
    assert_eq!(metadata["random_seed"], 7);
    assert_eq!(metadata["model_kind"], "ridge");
    assert_eq!(metadata["rmse"].as_f64().unwrap(), report.metrics.rmse);
}

#[test]
fn test_training_is_deterministic_for_fixed_seed() {
    for kind in [ModelKind::Linear, ModelKind::RandomForest] {
        let first_dir = TempDir::new().unwrap();
        let second_dir = TempDir::new().unwrap();
        let first = train(&config_in(&first_dir, kind, 3, "det")).unwrap();
        let second = train(&config_in(&second_dir, kind, 3, "det")).unwrap();
        assert_eq!(first.metrics.rmse, second.metrics.rmse, "{} not deterministic", kind);
        assert_eq!(first.metrics, second.metrics);
    }
}

/// RMSE of always predicting the training mean on the same split `train` uses
fn mean_predictor_rmse(seed: u64) -> f64 {
    let (train_part, validation) = Dataset::diabetes().unwrap().split(0.2, seed).unwrap();
    let mean = train_part.targets().iter().sum::<f64>() / train_part.len() as f64;
    let constant = vec![mean; validation.len()];
    rmse(validation.targets(), &constant)
}

#[test]
fn test_metrics_are_well_formed_for_every_kind() {
    let out = TempDir::new().unwrap();
    let baseline = mean_predictor_rmse(42);
    for kind in ModelKind::ALL {
        let report = train(&config_in(&out, kind, 42, kind.as_str())).unwrap();
        let metrics = &report.metrics;

        assert!(metrics.rmse.is_finite() && metrics.rmse >= 0.0);
        // disease progression targets span roughly 25..346
        assert!(metrics.rmse < 100.0, "{} rmse {}", kind, metrics.rmse);
        assert!(
            metrics.rmse < baseline,
            "{} rmse {} does not beat mean predictor {}",
            kind,
            metrics.rmse,
            baseline
        );
        for score in [metrics.precision_at_top10, metrics.recall_at_top10] {
            let score = score.expect("score present");
            assert!((0.0..=1.0).contains(&score));
        }
        assert_eq!(report.train_rows + report.validation_rows, 442);
        assert_eq!(report.validation_rows, 89);
    }
}

#[test]
fn test_same_version_overwrites_previous_artifacts() {
    let out = TempDir::new().unwrap();
    train(&config_in(&out, ModelKind::Linear, 1, "shared")).unwrap();
    let second = train(&config_in(&out, ModelKind::Ridge, 1, "shared")).unwrap();

    let metadata: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&second.paths.metadata).unwrap()).unwrap();
    assert_eq!(metadata["model_kind"], "ridge");

    let entries: Vec<_> = fs::read_dir(&second.paths.dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries.len(), 3, "unexpected files: {:?}", entries);
}

#[test]
fn test_existing_version_directory_is_not_an_error() {
    let out = TempDir::new().unwrap();
    fs::create_dir_all(out.path().join("pre")).unwrap();
    assert!(train(&config_in(&out, ModelKind::Linear, 0, "pre")).is_ok());
}

#[test]
fn test_unwritable_output_root_fails() {
    let out = TempDir::new().unwrap();
    let blocker = out.path().join("not-a-dir");
    fs::write(&blocker, b"file").unwrap();

    let config = TrainConfig {
        out_dir: blocker,
        ..config_in(&out, ModelKind::Linear, 0, "v")
    };
    assert!(matches!(train(&config), Err(TrainError::Artifact(_))));
}
