use crate::scoring::artifact::{LinearRegressor, LogisticClassifier};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

pub const REGRESSOR_FILE: &str = "calorie_regressor.json";
pub const CLASSIFIER_FILE: &str = "health_classifier.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub regressor: PathBuf,
    pub classifier: PathBuf,
}

impl ModelPaths {
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            regressor: dir.join(REGRESSOR_FILE),
            classifier: dir.join(CLASSIFIER_FILE),
        }
    }
}

/// Both scoring models, loaded together. Either both load or neither is
/// usable.
#[derive(Debug)]
pub struct ScoringModels {
    pub regressor: LinearRegressor,
    pub classifier: LogisticClassifier,
}

impl ScoringModels {
    pub fn load(paths: &ModelPaths) -> Result<Self> {
        let regressor = LinearRegressor::from_file(&paths.regressor)?;
        let classifier = LogisticClassifier::from_file(&paths.classifier)?;
        tracing::info!(
            "✅ Scoring models loaded ({}, {})",
            paths.regressor.display(),
            paths.classifier.display()
        );
        Ok(Self {
            regressor,
            classifier,
        })
    }
}

static MODELS: OnceLock<Arc<ScoringModels>> = OnceLock::new();

/// Loads the process-wide models on first call. Later calls return the
/// already loaded instance and ignore `paths`. A failed load leaves the
/// slot empty.
pub fn init_global_models(paths: &ModelPaths) -> Result<Arc<ScoringModels>> {
    if let Some(models) = MODELS.get() {
        tracing::debug!("Scoring models already initialized, reusing");
        return Ok(Arc::clone(models));
    }

    let loaded = Arc::new(ScoringModels::load(paths)?);
    Ok(Arc::clone(MODELS.get_or_init(|| loaded)))
}

/// The process-wide models, if `init_global_models` has succeeded.
pub fn global_models() -> Option<Arc<ScoringModels>> {
    MODELS.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REGRESSOR_JSON: &str = r#"{
        "kind": "linear_regression",
        "feature_names": ["Fat", "Protein", "Carbohydrate", "Fiber"],
        "coefficients": [9.0, 4.0, 4.0, -2.0],
        "intercept": 0.0
    }"#;

    const CLASSIFIER_JSON: &str = r#"{
        "kind": "logistic_regression",
        "feature_names": [
            "Calorie_Density", "Fat_Density", "Sugar_Density", "Protein_Density",
            "Fiber_Density", "Saturated_Fat_Density", "Cholesterol_Density",
            "Water_Density", "Sugar_Fiber_Ratio", "Sodium_Density"
        ],
        "coefficients": [-0.8, -3.0, -9.0, 2.0, 6.0, -10.0, -0.2, 1.5, -0.1, -0.05],
        "intercept": 1.0
    }"#;

    #[test]
    fn test_model_paths_from_dir() {
        let paths = ModelPaths::from_dir("models");
        assert_eq!(paths.regressor, PathBuf::from("models/calorie_regressor.json"));
        assert_eq!(paths.classifier, PathBuf::from("models/health_classifier.json"));
    }

    #[test]
    fn test_load_requires_both_artifacts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(REGRESSOR_FILE), REGRESSOR_JSON).unwrap();

        let paths = ModelPaths::from_dir(dir.path());
        assert!(ScoringModels::load(&paths).is_err());

        std::fs::write(dir.path().join(CLASSIFIER_FILE), CLASSIFIER_JSON).unwrap();
        assert!(ScoringModels::load(&paths).is_ok());
    }

    #[test]
    fn test_global_models_initialize_once() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(REGRESSOR_FILE), REGRESSOR_JSON).unwrap();
        std::fs::write(dir.path().join(CLASSIFIER_FILE), CLASSIFIER_JSON).unwrap();
        let paths = ModelPaths::from_dir(dir.path());

        let first = init_global_models(&paths).unwrap();
        // Second call must not reload, even from a path that no longer exists.
        let second = init_global_models(&ModelPaths::from_dir("/nonexistent")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &global_models().unwrap()));
    }
}
