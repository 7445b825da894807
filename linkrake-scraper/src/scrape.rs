use crate::extract::{SelectorSet, extract_links};
use crate::fetch::{FetchOutcome, HttpGetter, dispatch};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Fetches a batch of pages concurrently and extracts the links matching an
/// ordered selector set.
///
/// Built around an injected [`HttpGetter`] transport; the default is a pooled
/// `reqwest` client with request and connect timeouts. One batch is one call
/// to [`LinkScraper::scrape`]: all fetches are dispatched up front and exactly
/// one outcome per URL is drained back, so a slow or failing host delays but
/// never wedges the batch.
pub struct LinkScraper {
    transport: Arc<dyn HttpGetter>,
    selectors: SelectorSet,
    concurrency: Option<usize>,
    cancel: CancellationToken,
}

impl LinkScraper {
    pub fn new() -> Self {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("linkrake/0.1 (https://github.com/joja5627/linkrake)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            transport: Arc::new(client),
            selectors: SelectorSet::default(),
            concurrency: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpGetter>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_selectors(mut self, selectors: SelectorSet) -> Self {
        self.selectors = selectors;
        self
    }

    /// Bounds the number of in-flight fetches. Unset means one task per URL
    /// with no admission control, which is fine for small batches.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit);
        self
    }

    /// Token for abandoning the batch early. Pending fetches resolve as
    /// failures, so [`LinkScraper::scrape`] still returns promptly with
    /// whatever was gathered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fetches every URL concurrently and returns the `href` values matched
    /// by the selector set, in discovery order.
    ///
    /// Failed fetches and undecodable bodies are logged and skipped; partial
    /// results are normal. Duplicates are preserved. Blocks (asynchronously)
    /// until the whole batch has resolved.
    pub async fn scrape(&self, urls: &[String]) -> Vec<String> {
        if urls.is_empty() {
            return Vec::new();
        }

        info!("Fetching {} page(s)", urls.len());
        let mut outcomes = dispatch(
            urls,
            self.transport.clone(),
            self.concurrency,
            self.cancel.clone(),
        );

        let mut links = Vec::new();
        // one receive per dispatched URL, in whatever order fetches resolve
        for _ in 0..urls.len() {
            let Some(outcome) = outcomes.recv().await else {
                warn!("Outcome channel closed before the batch drained");
                break;
            };
            match outcome {
                FetchOutcome::Success { url, body } => {
                    match extract_links(&body, &url, &self.selectors) {
                        Ok(found) => {
                            debug!(url = url.as_str(), links = found.len(), "page scanned");
                            links.extend(found);
                        }
                        Err(error) => {
                            warn!("Error loading response body from {}: {}", url, error);
                        }
                    }
                }
                FetchOutcome::Failure { url, error } => {
                    warn!(url = url.as_str(), "Error received: {}", error);
                }
            }
        }

        info!("Batch complete, {} link(s) found", links.len());
        links
    }
}

impl Default for LinkScraper {
    fn default() -> Self {
        Self::new()
    }
}

/// Scrapes a batch with the default transport and selector set. The one-call
/// entry point for callers that don't need to configure anything.
pub async fn scrape_urls(urls: &[String]) -> Vec<String> {
    LinkScraper::new().scrape(urls).await
}
