// Scoring layer: persisted model artifacts and the process-wide handles to them.

pub mod artifact;
pub mod registry;

pub use artifact::{LinearRegressor, LogisticClassifier, ModelArtifact};
pub use registry::{global_models, init_global_models, ModelPaths, ScoringModels};
