pub mod crawl_pipeline;

pub use crawl_pipeline::CrawlPipeline;
