use crate::core::{
    ConfigProvider, FetchedPage, FoodRecord, PageFetcher, Pipeline, Result, Storage,
    TransformResult,
};
use crate::crawler::extract::ExtractionRules;
use crate::crawler::fetch::is_allowed;
use crate::crawler::parse::{parse_food_page, parse_listing, ListingItem};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// Walks category listings page by page, then fetches every linked food
/// detail page and turns it into a [`FoodRecord`].
pub struct CrawlPipeline<S: Storage, C: ConfigProvider, F: PageFetcher> {
    storage: S,
    config: C,
    fetcher: Arc<F>,
    rules: ExtractionRules,
}

impl<S, C, F> CrawlPipeline<S, C, F>
where
    S: Storage,
    C: ConfigProvider,
    F: PageFetcher + 'static,
{
    pub fn new(storage: S, config: C, fetcher: F, rules: ExtractionRules) -> Self {
        Self {
            storage,
            config,
            fetcher: Arc::new(fetcher),
            rules,
        }
    }

    /// Detail links of one category, following "Next" until it runs out or
    /// the page limit is hit. A listing page that fails to load ends the
    /// category.
    async fn collect_category(&self, start: Url, seen: &mut HashSet<Url>) -> Vec<ListingItem> {
        let mut items = Vec::new();
        let mut next = Some(start);
        let mut pages = 0usize;

        while let Some(page_url) = next.take() {
            if let Some(limit) = self.config.max_pages_per_category() {
                if pages >= limit {
                    tracing::info!("Page limit {} reached at {}", limit, page_url);
                    break;
                }
            }
            if !seen.insert(page_url.clone()) {
                tracing::debug!("Listing page {} already visited", page_url);
                break;
            }

            let html = match self.fetcher.fetch(&page_url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("⚠️ Skipping listing page {}: {}", page_url, e);
                    break;
                }
            };
            pages += 1;

            let listing = parse_listing(&html, &page_url);
            tracing::debug!("{}: {} foods", page_url, listing.items.len());
            items.extend(listing.items);

            next = listing
                .next_page
                .filter(|url| is_allowed(url, self.config.allowed_domains()));
        }

        items
    }
}

#[async_trait::async_trait]
impl<S, C, F> Pipeline for CrawlPipeline<S, C, F>
where
    S: Storage,
    C: ConfigProvider,
    F: PageFetcher + 'static,
{
    async fn extract(&self) -> Result<Vec<FetchedPage>> {
        let mut seen = HashSet::new();
        let mut items = Vec::new();

        for start in self.config.start_urls() {
            let start = match Url::parse(start) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("⚠️ Skipping start URL {}: {}", start, e);
                    continue;
                }
            };
            tracing::info!("📂 Crawling category {}", start);
            items.extend(self.collect_category(start, &mut seen).await);
        }

        let mut tasks = JoinSet::new();
        for item in items {
            if !is_allowed(&item.url, self.config.allowed_domains()) {
                tracing::debug!("Offsite link skipped: {}", item.url);
                continue;
            }
            if !seen.insert(item.url.clone()) {
                continue;
            }

            let fetcher = Arc::clone(&self.fetcher);
            tasks.spawn(async move {
                let result = fetcher.fetch(&item.url).await;
                (item, result)
            });
        }

        let mut pages = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (item, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    tracing::warn!("⚠️ Detail fetch task failed: {}", e);
                    continue;
                }
            };
            match result {
                Ok(html) => pages.push(FetchedPage {
                    url: item.url.to_string(),
                    food_name: item.name,
                    html,
                }),
                Err(e) => tracing::warn!("⚠️ Skipping {}: {}", item.url, e),
            }
        }

        // 並發抓取完成順序不固定
        pages.sort_by(|a, b| a.url.cmp(&b.url));
        Ok(pages)
    }

    async fn transform(&self, pages: Vec<FetchedPage>) -> Result<TransformResult> {
        let records: Vec<FoodRecord> = pages
            .iter()
            .map(|page| parse_food_page(&page.html, page.food_name.clone(), &self.rules))
            .collect();

        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in &records {
            writer.serialize(record)?;
        }
        let csv_bytes = writer.into_inner().map_err(|e| e.into_error())?;
        let csv_output = String::from_utf8(csv_bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let json_output = serde_json::to_string_pretty(&records)?;

        Ok(TransformResult {
            records,
            csv_output,
            json_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let base_name = self
            .config
            .output_filename()
            .replace("{timestamp}", &chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string());

        let mut written = Vec::new();
        for format in self.config.output_formats() {
            let (file_name, data) = match format.as_str() {
                "csv" => (format!("{}.csv", base_name), result.csv_output.as_bytes()),
                "json" => (format!("{}.json", base_name), result.json_output.as_bytes()),
                other => {
                    tracing::warn!("Unsupported output format '{}' ignored", other);
                    continue;
                }
            };
            tracing::debug!("Writing {} ({} bytes)", file_name, data.len());
            self.storage.write_file(&file_name, data).await?;
            written.push(format!("{}/{}", self.config.output_path(), file_name));
        }

        Ok(written.join(", "))
    }
}
