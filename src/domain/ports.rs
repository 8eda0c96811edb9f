use crate::domain::model::{
    CalorieFeatures, FetchedPage, HealthFeatures, HealthLabel, TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Pre-trained calorie regressor.
pub trait CalorieRegressor: Send + Sync {
    fn predict(&self, features: &CalorieFeatures) -> Result<f64>;
}

/// Pre-trained healthy/unhealthy classifier.
pub trait HealthScorer: Send + Sync {
    fn predict(&self, features: &HealthFeatures) -> Result<HealthLabel>;

    /// Class probabilities indexed by class (0 = unhealthy, 1 = healthy).
    fn predict_proba(&self, features: &HealthFeatures) -> Result<Vec<f64>>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn start_urls(&self) -> &[String];
    fn allowed_domains(&self) -> &[String];
    fn user_agent(&self) -> &str;
    fn download_delay(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn concurrent_requests(&self) -> usize;
    fn max_pages_per_category(&self) -> Option<usize>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn output_filename(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<FetchedPage>>;
    async fn transform(&self, pages: Vec<FetchedPage>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
