use crate::domain::ports::{ConfigProvider, PageFetcher};
use crate::utils::error::{InsightError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;
use url::Url;

/// HTTP fetcher with a bounded number of in-flight requests. Request starts
/// are spaced at least `delay` apart across all clones of the fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    permits: Arc<Semaphore>,
    delay: Duration,
    next_start: Arc<Mutex<Instant>>,
}

impl HttpFetcher {
    pub fn new(
        user_agent: &str,
        concurrent_requests: usize,
        delay: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(concurrent_requests.max(1))),
            delay,
            next_start: Arc::new(Mutex::new(Instant::now())),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(
            config.user_agent(),
            config.concurrent_requests(),
            config.download_delay(),
            config.request_timeout(),
        )
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(std::io::Error::other)?;

        if !self.delay.is_zero() {
            // 預約下一個發送時段
            let start_at = {
                let mut next_start = self.next_start.lock().await;
                let slot = (*next_start).max(Instant::now());
                *next_start = slot + self.delay;
                slot
            };
            tokio::time::sleep_until(start_at).await;
        }

        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InsightError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// True when `url`'s host is one of `allowed_domains` or a subdomain of one.
/// An empty list allows every host.
pub fn is_allowed(url: &Url, allowed_domains: &[String]) -> bool {
    if allowed_domains.is_empty() {
        return true;
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    allowed_domains.iter().any(|domain| {
        let domain = domain.trim().trim_start_matches('.');
        host.eq_ignore_ascii_case(domain)
            || host
                .to_ascii_lowercase()
                .ends_with(&format!(".{}", domain.to_ascii_lowercase()))
    })
}
