use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use super::{endpoint::Endpoint, response::ClientResponse};

/// One remembered response per endpoint, used both to answer
/// NOT_MODIFIED replies and to stamp If-Modified-Since on requests.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub fetched_at: chrono::DateTime<chrono::Utc>,
    pub response: ClientResponse,
}

enum CacheRequest {
    Get(Endpoint, oneshot::Sender<Option<CachedEntry>>),
    Put(Endpoint, ClientResponse),
}

/// Response cache owned by a dedicated task; clones of the handle share
/// the same state without locking.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    requests: mpsc::Sender<CacheRequest>,
}

impl ResponseCache {
    const CLEANUP_EVERY: u64 = 100;
    const MAX_AGE_S: i64 = 60 * 60;

    pub fn new() -> Self {
        let (tx, mut rx) = mpsc::channel::<CacheRequest>(100);
        tokio::spawn(async move {
            let mut entries: HashMap<Endpoint, CachedEntry> = HashMap::new();
            let mut served: u64 = 0;
            while let Some(request) = rx.recv().await {
                match request {
                    CacheRequest::Get(endpoint, reply) => {
                        debug!("Cache lookup for {}", endpoint);
                        let _ = reply.send(entries.get(&endpoint).cloned());
                    }
                    CacheRequest::Put(endpoint, response) => {
                        debug!("Caching response for {}", endpoint);
                        entries.insert(
                            endpoint,
                            CachedEntry {
                                fetched_at: chrono::Utc::now(),
                                response,
                            },
                        );
                    }
                }
                served += 1;
                if served % Self::CLEANUP_EVERY == 0 {
                    info!("Evicting stale cache entries");
                    let cutoff = chrono::Utc::now() - chrono::Duration::seconds(Self::MAX_AGE_S);
                    entries.retain(|_, entry| entry.fetched_at > cutoff);
                }
            }
        });
        Self { requests: tx }
    }

    pub async fn get(&self, endpoint: Endpoint) -> Option<CachedEntry> {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send(CacheRequest::Get(endpoint, tx))
            .await
            .ok()?;
        rx.await.ok().flatten()
    }

    pub async fn put(&self, endpoint: Endpoint, response: ClientResponse) {
        let _ = self.requests.send(CacheRequest::Put(endpoint, response)).await;
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
