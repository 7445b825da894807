use crate::error::ScrapeError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The minimal GET capability the dispatcher fetches through.
///
/// Implemented for `reqwest::Client`; any other transport can be substituted
/// via [`crate::LinkScraper::with_transport`]. Implementations must be safe
/// for concurrent calls, one per in-flight fetch.
#[async_trait]
pub trait HttpGetter: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ScrapeError>;
}

#[async_trait]
impl HttpGetter for reqwest::Client {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        // Transport-level failures only. Non-2xx responses still carry a body
        // worth scanning, so the status code is not treated as an error here.
        let response = reqwest::Client::get(self, url).send().await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// One resolved fetch, success or failure. Exactly one outcome is produced
/// per dispatched URL; arrival order is whatever order the fetches resolve in.
#[derive(Debug)]
pub enum FetchOutcome {
    Success { url: String, body: Vec<u8> },
    Failure { url: String, error: ScrapeError },
}

impl FetchOutcome {
    pub fn url(&self) -> &str {
        match self {
            FetchOutcome::Success { url, .. } | FetchOutcome::Failure { url, .. } => url,
        }
    }
}

/// Launches one fetch task per URL and returns the outcome channel.
///
/// Returns immediately after spawning; it never blocks on completion. The
/// channel holds one slot per URL, so every task's single send completes even
/// if the receiver is dropped early. The caller is responsible for draining
/// exactly `urls.len()` outcomes.
///
/// With `concurrency` unset every fetch starts at once; when set, a semaphore
/// bounds the number in flight. Cancelling `cancel` resolves all remaining
/// fetches as `Failure(Cancelled)`, so the outcome count still adds up.
pub fn dispatch(
    urls: &[String],
    transport: Arc<dyn HttpGetter>,
    concurrency: Option<usize>,
    cancel: CancellationToken,
) -> mpsc::Receiver<FetchOutcome> {
    let (tx, rx) = mpsc::channel(urls.len().max(1));
    let limiter = concurrency.map(|n| Arc::new(Semaphore::new(n.max(1))));

    for url in urls {
        let url = url.clone();
        let tx = tx.clone();
        let transport = transport.clone();
        let cancel = cancel.clone();
        let limiter = limiter.clone();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => FetchOutcome::Failure {
                    url,
                    error: ScrapeError::Cancelled,
                },
                outcome = fetch_one(transport.as_ref(), url.clone(), limiter) => outcome,
            };
            debug!(url = outcome.url(), "fetch resolved");
            let _ = tx.send(outcome).await;
        });
    }

    rx
}

async fn fetch_one(
    transport: &dyn HttpGetter,
    url: String,
    limiter: Option<Arc<Semaphore>>,
) -> FetchOutcome {
    let _permit = match limiter {
        // the semaphore is never closed, so acquire only fails if it is
        Some(semaphore) => semaphore.acquire_owned().await.ok(),
        None => None,
    };

    match transport.get(&url).await {
        Ok(body) => FetchOutcome::Success { url, body },
        Err(error) => FetchOutcome::Failure { url, error },
    }
}
