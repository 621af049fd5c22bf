use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, Instant};
use tracing::{debug, error};

/// Spaces requests so the backend sees at most one request per
/// `min_interval`. Callers queue up and are released in arrival order.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: None,
        }
    }

    pub async fn acquire(&mut self) {
        let now = Instant::now();
        let slot = match self.next_slot {
            Some(slot) if slot > now => slot,
            _ => now,
        };
        self.next_slot = Some(slot + self.min_interval);
        if slot > now {
            debug!("Rate limiting: sleeping for {:?}", slot - now);
            tokio::time::sleep_until(slot).await;
        }
    }
}

/// HTTP transport that funnels every request through a single task
/// owning the rate limiter, so concurrent clones of the client share
/// one request budget.
#[derive(Debug, Clone)]
pub struct RateLimitedClient {
    requests: mpsc::Sender<TransportRequest>,
}

struct TransportRequest {
    request: reqwest::Request,
    reply: oneshot::Sender<Result<reqwest::Response, reqwest::Error>>,
}

impl RateLimitedClient {
    const DEFAULT_MIN_INTERVAL_MS: u64 = 100;

    pub fn new(min_interval: Duration) -> Self {
        let (tx, mut rx) = mpsc::channel::<TransportRequest>(100);
        tokio::spawn(async move {
            let mut limiter = RateLimiter::new(min_interval);
            let client = reqwest::Client::new();
            while let Some(req) = rx.recv().await {
                limiter.acquire().await;
                let client = client.clone();
                tokio::spawn(async move {
                    let result = client.execute(req.request).await;
                    if req.reply.send(result).is_err() {
                        error!("Transport reply receiver dropped");
                    }
                });
            }
        });
        Self { requests: tx }
    }

    pub async fn execute(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let (tx, rx) = oneshot::channel();
        if self
            .requests
            .send(TransportRequest { request, reply: tx })
            .await
            .is_err()
        {
            error!("Transport task is gone");
        }
        rx.await.expect("transport task dropped the reply sender")
    }
}

impl Default for RateLimitedClient {
    fn default() -> Self {
        Self::new(Duration::from_millis(Self::DEFAULT_MIN_INTERVAL_MS))
    }
}
