use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Drives a crawl through extract, transform and load.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Starting crawl");

        tracing::info!("📥 Fetching listing and detail pages...");
        let pages = self.pipeline.extract().await?;
        tracing::info!("📥 Fetched {} detail pages", pages.len());

        tracing::info!("🔄 Extracting nutrient records...");
        let result = self.pipeline.transform(pages).await?;
        tracing::info!("🔄 Extracted {} food records", result.records.len());

        tracing::info!("💾 Writing dataset...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "💾 Dataset saved to {} in {:.1}s",
            output_path,
            started.elapsed().as_secs_f64()
        );

        Ok(output_path)
    }
}
