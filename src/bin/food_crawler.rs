use clap::Parser;
use food_insight::core::ConfigProvider;
use food_insight::crawler::ExtractionRules;
use food_insight::utils::error::ErrorSeverity;
use food_insight::utils::{logger, validation::Validate};
use food_insight::{CrawlConfig, CrawlPipeline, EtlEngine, HttpFetcher, LocalStorage};

#[derive(Parser)]
#[command(name = "food-crawler")]
#[command(about = "Crawl nutrition category listings into a flat food dataset")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "crawl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Override the page limit per category from config
    #[arg(long)]
    max_pages: Option<usize>,

    /// Show what would be crawled without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting food crawler");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match CrawlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(max_pages) = args.max_pages {
        config.crawler.max_pages_per_category = Some(max_pages);
        tracing::info!("🔧 Page limit overridden to: {}", max_pages);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    let rules = config.extraction_rules()?;

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No pages will be fetched");
        perform_dry_run(&config, &rules);
        return Ok(());
    }

    let fetcher = HttpFetcher::from_config(&config)?;
    let storage = LocalStorage::new(config.output_path());
    let pipeline = CrawlPipeline::new(storage, config, fetcher, rules);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Crawl completed successfully!");
            println!("✅ Crawl completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Crawl failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &CrawlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Crawler: {}", config.crawler.name);
    println!("  Categories: {}", config.start_urls().len());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  Concurrent Requests: {}", config.concurrent_requests());
    println!("  Download Delay: {:?}", config.download_delay());

    if let Some(max_pages) = config.max_pages_per_category() {
        println!("  Max Pages per Category: {}", max_pages);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &CrawlConfig, rules: &ExtractionRules) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Start URLs:");
    for url in config.start_urls() {
        println!("  {}", url);
    }

    if !config.allowed_domains().is_empty() {
        println!();
        println!("🛡️ Allowed Domains: {}", config.allowed_domains().join(", "));
    }

    println!();
    println!("🔄 Extraction Rules:");
    for rule in rules.iter() {
        println!(
            "  {} <- row label {:?} ({:?})",
            rule.field.column(),
            rule.label,
            rule.matching
        );
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
