use std::sync::Arc;

use chronicle_api::client::Client;
use chronicle_types::post::Post;
use tracing::{debug, info};

use super::error::Error;
use super::feed::{FeedPost, PostFeed};

/// Build-time settings for the statically generated pages.
/// listing_page_size: posts fetched for the listing page. (default: 20)
/// paths_page_size: page size when enumerating identifiers. (default: 10)
/// revalidate_secs: regeneration interval for detail pages. (default: 1)
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub listing_page_size: i32,
    pub paths_page_size: i32,
    pub revalidate_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            listing_page_size: 20,
            paths_page_size: 10,
            revalidate_secs: 1,
        }
    }
}

/// How a request for a not-yet-generated page is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Unknown paths 404.
    None,
    /// Serve a placeholder while generating in the background.
    OnDemand,
    /// Generate on first request and serve the result.
    Blocking,
}

/// Props for the listing page: the first page of posts, ready to be
/// extended client-side through a feed session.
#[derive(Debug)]
pub struct HomeProps {
    pub feed: PostFeed,
}

/// Every known post identifier plus the policy for the rest.
#[derive(Debug)]
pub struct PostPaths {
    pub slugs: Vec<String>,
    pub fallback: Fallback,
}

/// Props for one detail page, with its derived values precomputed.
#[derive(Debug, Clone)]
pub struct PostProps {
    pub post: FeedPost,
    pub reading_minutes: usize,
    pub revalidate_secs: u64,
}

impl PostProps {
    fn new(post: Post, revalidate_secs: u64) -> Self {
        let reading_minutes = post.reading_minutes();
        Self {
            post: FeedPost::from(post),
            reading_minutes,
            revalidate_secs,
        }
    }
}

/// Build-time entry points for the static site: one listing query, path
/// enumeration for pre-rendering, and per-post props with a
/// revalidation interval.
#[derive(Debug, Clone)]
pub struct SiteBuilder {
    http: Arc<Client>,
    cfg: SiteConfig,
}

impl SiteBuilder {
    pub fn new(http: Arc<Client>, cfg: Option<SiteConfig>) -> Self {
        Self {
            http,
            cfg: cfg.unwrap_or_default(),
        }
    }

    /// One page of up to `listing_page_size` posts for the listing page.
    pub async fn home(&self) -> Result<HomeProps, Error> {
        let page = self
            .http
            .query_posts(Some(self.cfg.listing_page_size))
            .await?;
        info!("Built listing page with {} posts", page.len());
        Ok(HomeProps {
            feed: PostFeed::new((*page).clone()),
        })
    }

    /// Walk the whole listing and collect every post identifier.
    /// Posts without an identifier cannot be addressed and are skipped.
    pub async fn post_paths(&self) -> Result<PostPaths, Error> {
        let page = self
            .http
            .query_posts(Some(self.cfg.paths_page_size))
            .await?;
        let mut slugs: Vec<String> = page
            .results
            .iter()
            .filter_map(|post| post.slug().map(str::to_string))
            .collect();
        let mut next = page.next_page.clone();
        while let Some(url) = next {
            debug!("Enumerating identifiers, following {}", url);
            let page = self.http.get_page(&url).await?;
            slugs.extend(
                page.results
                    .iter()
                    .filter_map(|post| post.slug().map(str::to_string)),
            );
            next = page.next_page.clone();
        }
        info!("Enumerated {} post paths", slugs.len());
        Ok(PostPaths {
            slugs,
            fallback: Fallback::Blocking,
        })
    }

    /// Props for one detail page, generated at build time or on demand
    /// for paths outside the pre-rendered set.
    pub async fn post(&self, slug: &str) -> Result<PostProps, Error> {
        let post = self.http.get_by_uid(slug).await?;
        Ok(PostProps::new((*post).clone(), self.cfg.revalidate_secs))
    }

    /// Pre-render every known post in one pass, fetching the documents
    /// concurrently.
    pub async fn prerender(&self) -> Result<Vec<PostProps>, Error> {
        let paths = self.post_paths().await?;
        let fetches = paths.slugs.iter().map(|slug| self.post(slug));
        futures::future::join_all(fetches)
            .await
            .into_iter()
            .collect()
    }
}
