use std::sync::Arc;

use chronicle_types::{page::PostPage, post::Post};
use tracing::{debug, error};

use super::{
    cache::ResponseCache, endpoint::Endpoint, error::Error, rate_limit::RateLimitedClient,
    response::ClientResponse,
};

/// Configuration for the client.
/// use_https: Whether to use HTTPS for requests. (default: true)
/// page_size: Listing page size for post queries. (default: 20)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub use_https: Option<bool>,
    pub page_size: Option<i32>,
}

impl Config {
    const DEFAULT_USE_HTTPS: bool = true;
    const DEFAULT_PAGE_SIZE: i32 = 20;

    pub fn new(use_https: Option<bool>, page_size: Option<i32>) -> Self {
        Config {
            use_https,
            page_size,
        }
    }

    pub fn use_https(&self) -> bool {
        self.use_https.unwrap_or(Self::DEFAULT_USE_HTTPS)
    }

    pub fn page_size(&self) -> i32 {
        self.page_size.unwrap_or(Self::DEFAULT_PAGE_SIZE)
    }
}

/// A client for the content backend's document API.
/// Requests are rate limited and conditional: when an endpoint was
/// fetched before, If-Modified-Since is set and a NOT_MODIFIED reply is
/// answered from the response cache. There is no retry loop; a failed
/// fetch surfaces to the caller.
#[derive(Debug, Clone)]
pub struct Client {
    cfg: Config,
    http: Arc<RateLimitedClient>,
    cache: Arc<ResponseCache>,
}

impl Client {
    pub fn new(cfg: Option<Config>) -> Self {
        Self {
            cfg: cfg.unwrap_or_default(),
            http: Arc::new(RateLimitedClient::default()),
            cache: Arc::new(ResponseCache::new()),
        }
    }

    async fn new_request(&self, endpoint: &Endpoint, https: bool) -> Result<reqwest::Request, Error> {
        let url = endpoint
            .url(https)
            .parse()
            .map_err(|_| Error::InvalidUrl(endpoint.url(https)))?;
        let mut request = reqwest::Request::new(reqwest::Method::GET, url);
        if let Some(entry) = self.cache.get(endpoint.clone()).await {
            if let Ok(value) =
                reqwest::header::HeaderValue::from_str(&entry.fetched_at.to_rfc2822())
            {
                request
                    .headers_mut()
                    .insert(reqwest::header::IF_MODIFIED_SINCE, value);
            }
        }
        Ok(request)
    }

    pub async fn get(&self, endpoint: &Endpoint) -> Result<ClientResponse, Error> {
        let https = self.cfg.use_https();
        debug!("Sending request to {}", endpoint.url(https));
        let request = self.new_request(endpoint, https).await?;
        let response = self.http.execute(request).await?;
        self.handle_response(endpoint, response).await
    }

    async fn handle_response(
        &self,
        endpoint: &Endpoint,
        resp: reqwest::Response,
    ) -> Result<ClientResponse, Error> {
        match resp.status() {
            reqwest::StatusCode::OK => {
                debug!("request: {} status: OK", endpoint);
                let parsed = ClientResponse::parse(endpoint, resp).await?;
                self.cache.put(endpoint.clone(), parsed.clone()).await;
                Ok(parsed)
            }
            reqwest::StatusCode::NOT_MODIFIED => {
                debug!("request: {} status: NOT_MODIFIED", endpoint);
                self.cache
                    .get(endpoint.clone())
                    .await
                    .map(|entry| entry.response)
                    .ok_or(Error::NoCachedResponse)
            }
            status => {
                error!("request {} status: {}", endpoint, status);
                Err(Error::StatusCode(status.as_u16().to_string()))
            }
        }
    }

    /// One page of posts, newest query first, at the configured or
    /// given page size.
    pub async fn query_posts(&self, page_size: Option<i32>) -> Result<Arc<PostPage>, Error> {
        let endpoint = Endpoint::posts(page_size.unwrap_or_else(|| self.cfg.page_size()));
        match self.get(&endpoint).await? {
            ClientResponse::Page(page) => Ok(page),
            _ => Err(Error::InvalidResponse),
        }
    }

    /// Follow an opaque next-page pointer returned by a previous query.
    pub async fn get_page(&self, next_page: &str) -> Result<Arc<PostPage>, Error> {
        match self.get(&Endpoint::Page(next_page.to_string())).await? {
            ClientResponse::Page(page) => Ok(page),
            _ => Err(Error::InvalidResponse),
        }
    }

    /// Fetch a single post by its unique identifier.
    pub async fn get_by_uid(&self, uid: &str) -> Result<Arc<Post>, Error> {
        match self.get(&Endpoint::Document(uid.to_string())).await? {
            ClientResponse::Document(post) => Ok(post),
            _ => Err(Error::InvalidResponse),
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(None)
    }
}
