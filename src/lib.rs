pub mod app;
pub mod config;
pub mod core;
pub mod crawler;
pub mod domain;
pub mod scoring;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::AnalyzerCli;
pub use config::{cli::LocalStorage, toml_config::CrawlConfig};

pub use app::pipelines::CrawlPipeline;
pub use core::analysis::{AnalysisOutcome, AnalysisReport, FoodAnalyzer, FoodSubmission};
pub use core::etl::EtlEngine;
pub use core::goal::calculate_protein_goal;
pub use crawler::HttpFetcher;
pub use scoring::{init_global_models, ModelPaths, ScoringModels};
pub use utils::error::{InsightError, Result};
