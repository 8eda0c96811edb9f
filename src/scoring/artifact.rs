use crate::domain::model::{CalorieFeatures, FeatureRecord, HealthFeatures, HealthLabel};
use crate::domain::ports::{CalorieRegressor, HealthScorer};
use crate::utils::error::{InsightError, Result};
use serde::Deserialize;
use std::path::Path;

/// On-disk model description. Training happens elsewhere; the exporter
/// writes the fitted parameters together with the column order it used.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LinearRegression(LinearParams),
    LogisticRegression(LogisticParams),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearParams {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticParams {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

impl ModelArtifact {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| InsightError::ModelLoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| InsightError::ModelLoadError {
            path: path.display().to_string(),
            reason: format!("invalid artifact: {}", e),
        })
    }

    fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::LinearRegression(_) => "linear_regression",
            ModelArtifact::LogisticRegression(_) => "logistic_regression",
        }
    }
}

/// Rejects artifacts whose columns differ from `F` in name or order; a
/// silently reordered column would otherwise be scored as another feature.
fn check_schema<F: FeatureRecord>(
    model: &str,
    path: &Path,
    feature_names: &[String],
    coefficients: &[f64],
) -> Result<()> {
    if feature_names.iter().map(String::as_str).ne(F::NAMES.iter().copied()) {
        return Err(InsightError::FeatureMismatchError {
            model: model.to_string(),
            expected: F::NAMES.iter().map(|s| s.to_string()).collect(),
            found: feature_names.to_vec(),
        });
    }

    if coefficients.len() != feature_names.len() {
        return Err(InsightError::ModelLoadError {
            path: path.display().to_string(),
            reason: format!(
                "{} coefficients for {} features",
                coefficients.len(),
                feature_names.len()
            ),
        });
    }

    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(InsightError::ModelLoadError {
            path: path.display().to_string(),
            reason: "coefficients must be finite numbers".to_string(),
        });
    }

    Ok(())
}

fn linear_score(coefficients: &[f64], intercept: f64, values: &[f64]) -> f64 {
    coefficients
        .iter()
        .zip(values)
        .map(|(c, v)| c * v)
        .sum::<f64>()
        + intercept
}

#[derive(Debug, Clone)]
pub struct LinearRegressor {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub const NAME: &'static str = "calorie_regressor";

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match ModelArtifact::from_file(path)? {
            ModelArtifact::LinearRegression(params) => {
                check_schema::<CalorieFeatures>(
                    Self::NAME,
                    path,
                    &params.feature_names,
                    &params.coefficients,
                )?;
                tracing::debug!("Loaded {} from {}", Self::NAME, path.display());
                Ok(Self {
                    coefficients: params.coefficients,
                    intercept: params.intercept,
                })
            }
            other => Err(InsightError::ModelLoadError {
                path: path.display().to_string(),
                reason: format!("expected linear_regression, found {}", other.kind()),
            }),
        }
    }
}

impl CalorieRegressor for LinearRegressor {
    fn predict(&self, features: &CalorieFeatures) -> Result<f64> {
        let score = linear_score(&self.coefficients, self.intercept, &features.values());
        if !score.is_finite() {
            return Err(InsightError::ScoringError {
                model: Self::NAME.to_string(),
                message: "prediction is not a finite number".to_string(),
            });
        }
        Ok(score)
    }
}

#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    coefficients: Vec<f64>,
    intercept: f64,
    threshold: f64,
}

impl LogisticClassifier {
    pub const NAME: &'static str = "health_classifier";

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match ModelArtifact::from_file(path)? {
            ModelArtifact::LogisticRegression(params) => {
                check_schema::<HealthFeatures>(
                    Self::NAME,
                    path,
                    &params.feature_names,
                    &params.coefficients,
                )?;
                if !(0.0..=1.0).contains(&params.threshold) {
                    return Err(InsightError::ModelLoadError {
                        path: path.display().to_string(),
                        reason: format!("threshold {} outside [0, 1]", params.threshold),
                    });
                }
                tracing::debug!("Loaded {} from {}", Self::NAME, path.display());
                Ok(Self {
                    coefficients: params.coefficients,
                    intercept: params.intercept,
                    threshold: params.threshold,
                })
            }
            other => Err(InsightError::ModelLoadError {
                path: path.display().to_string(),
                reason: format!("expected logistic_regression, found {}", other.kind()),
            }),
        }
    }

    fn healthy_probability(&self, features: &HealthFeatures) -> Result<f64> {
        let z = linear_score(&self.coefficients, self.intercept, &features.values());
        let p = 1.0 / (1.0 + (-z).exp());
        if p.is_nan() {
            return Err(InsightError::ScoringError {
                model: Self::NAME.to_string(),
                message: "probability is not a number".to_string(),
            });
        }
        Ok(p)
    }
}

impl HealthScorer for LogisticClassifier {
    fn predict(&self, features: &HealthFeatures) -> Result<HealthLabel> {
        let p = self.healthy_probability(features)?;
        Ok(if p >= self.threshold {
            HealthLabel::Healthy
        } else {
            HealthLabel::Unhealthy
        })
    }

    fn predict_proba(&self, features: &HealthFeatures) -> Result<Vec<f64>> {
        let p = self.healthy_probability(features)?;
        Ok(vec![1.0 - p, p])
    }
}
