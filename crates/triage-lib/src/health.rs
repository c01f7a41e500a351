//! Health/introspection payload for the prediction service

use crate::artifact::ModelMetadata;
use serde::{Deserialize, Serialize};

/// Overall service status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Startup completed and a model is resident
    Ok,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub model_version: String,
    pub model_type: String,
}

impl HealthResponse {
    /// Report the loaded model's identity; missing fields read "unknown"
    pub fn from_metadata(metadata: &ModelMetadata) -> Self {
        Self {
            status: ServiceStatus::Ok,
            model_version: metadata.version_or_unknown().to_string(),
            model_type: metadata.type_or_unknown().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_from_full_metadata() {
        let metadata = ModelMetadata {
            model_version: Some("v0.1".to_string()),
            model_type: Some("Ridge".to_string()),
            random_seed: Some(42),
            model_kind: Some("ridge".to_string()),
            rmse: Some(53.1),
        };
        let health = HealthResponse::from_metadata(&metadata);
        assert_eq!(health.status, ServiceStatus::Ok);
        assert_eq!(health.model_version, "v0.1");
        assert_eq!(health.model_type, "Ridge");
    }

    #[test]
    fn test_health_from_empty_metadata() {
        let health = HealthResponse::from_metadata(&ModelMetadata::default());
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "ok",
                "model_version": "unknown",
                "model_type": "unknown"
            })
        );
    }
}
