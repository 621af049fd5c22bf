use std::sync::atomic::{AtomicBool, Ordering};

use chronicle_api::client::Client;
use chronicle_types::page::PostPage;
use tokio::sync::Mutex;
use tracing::{debug, error};

use super::error::Error;
use super::feed::{FeedPost, PostFeed};

/// Where the session fetches pages from. The client implements this;
/// tests substitute their own source.
pub trait PageSource {
    fn fetch_page(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<PostPage, chronicle_api::error::Error>> + Send;
}

impl PageSource for Client {
    async fn fetch_page(&self, url: &str) -> Result<PostPage, chronicle_api::error::Error> {
        self.get_page(url).await.map(|page| (*page).clone())
    }
}

/// Outcome of a `load_more` call.
#[derive(Debug, PartialEq, Eq)]
pub enum LoadMore {
    /// Appended this many posts and took over the new page's pointer.
    Appended(usize),
    /// No pointer was present; nothing more to load, nothing changed.
    Exhausted,
}

/// One browsing session over the incremental post listing.
///
/// Wraps the pure [`PostFeed`] with the single fetch a "load more"
/// trigger is allowed to make. An atomic in-flight flag rejects
/// overlapping triggers so a double press cannot append the same page
/// twice.
#[derive(Debug)]
pub struct FeedSession<S> {
    source: S,
    feed: Mutex<PostFeed>,
    in_flight: AtomicBool,
}

impl<S: PageSource> FeedSession<S> {
    pub fn new(source: S, first_page: PostPage) -> Self {
        Self {
            source,
            feed: Mutex::new(PostFeed::new(first_page)),
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn posts(&self) -> Vec<FeedPost> {
        self.feed.lock().await.posts().to_vec()
    }

    pub async fn has_more(&self) -> bool {
        self.feed.lock().await.has_more()
    }

    /// Fetch and append the next page, if any.
    ///
    /// Performs exactly one fetch against the current pointer. A fetch
    /// failure surfaces as an error and leaves the feed untouched; the
    /// caller may trigger again. While a load is in flight further
    /// calls fail with [`Error::LoadInFlight`].
    pub async fn load_more(&self) -> Result<LoadMore, Error> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Rejecting load_more: a load is already in flight");
            return Err(Error::LoadInFlight);
        }
        let result = self.load_next().await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn load_next(&self) -> Result<LoadMore, Error> {
        let next = match self.feed.lock().await.next_page() {
            Some(url) => url.to_string(),
            None => {
                debug!("load_more on exhausted feed is a no-op");
                return Ok(LoadMore::Exhausted);
            }
        };
        match self.source.fetch_page(&next).await {
            Ok(page) => {
                let appended = self.feed.lock().await.apply_page(page);
                Ok(LoadMore::Appended(appended))
            }
            Err(e) => {
                error!("Failed to load next page {}: {}", next, e);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_types::post::{Post, PostData};
    use std::collections::HashMap;

    fn post(uid: &str) -> Post {
        Post {
            uid: Some(uid.to_string()),
            first_publication_date: None,
            last_publication_date: None,
            data: PostData::default(),
        }
    }

    fn page(uids: &[&str], next: Option<&str>) -> PostPage {
        PostPage {
            page: None,
            total_pages: None,
            next_page: next.map(str::to_string),
            results: uids.iter().map(|uid| post(uid)).collect(),
        }
    }

    /// Serves pages out of a map, optionally stalling each fetch.
    struct FakeSource {
        pages: HashMap<String, PostPage>,
        delay_ms: u64,
    }

    impl FakeSource {
        fn new(pages: Vec<(&str, PostPage)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                delay_ms: 0,
            }
        }
    }

    impl PageSource for FakeSource {
        async fn fetch_page(
            &self,
            url: &str,
        ) -> Result<PostPage, chronicle_api::error::Error> {
            if self.delay_ms > 0 {
                tokio::time::sleep(tokio::time::Duration::from_millis(self.delay_ms)).await;
            }
            self.pages
                .get(url)
                .cloned()
                .ok_or(chronicle_api::error::Error::StatusCode("404".to_string()))
        }
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn test_load_more_appends_and_advances_pointer() {
        let source = FakeSource::new(vec![("page-2", page(&["c", "d"], Some("page-3")))]);
        let session = FeedSession::new(source, page(&["a", "b"], Some("page-2")));

        let outcome = session.load_more().await.unwrap();
        assert_eq!(outcome, LoadMore::Appended(2));

        let uids: Vec<_> = session
            .posts()
            .await
            .iter()
            .map(|p| p.post.uid.clone().unwrap())
            .collect();
        assert_eq!(uids, vec!["a", "b", "c", "d"]);
        assert!(session.has_more().await);
    }

    #[tokio::test]
    async fn test_load_more_without_pointer_is_a_noop() {
        let source = FakeSource::new(vec![]);
        let session = FeedSession::new(source, page(&["a"], None));

        let outcome = session.load_more().await.unwrap();
        assert_eq!(outcome, LoadMore::Exhausted);
        assert_eq!(session.posts().await.len(), 1);
        assert!(!session.has_more().await);

        // Still a no-op the second time.
        assert_eq!(session.load_more().await.unwrap(), LoadMore::Exhausted);
    }

    #[tokio::test]
    async fn test_failed_fetch_surfaces_and_leaves_feed_untouched() {
        let source = FakeSource::new(vec![]);
        let session = FeedSession::new(source, page(&["a"], Some("page-2")));

        let err = session.load_more().await.unwrap_err();
        assert!(matches!(err, Error::Api(_)));
        assert_eq!(session.posts().await.len(), 1);
        // The pointer survives a failed fetch, so the caller can retry.
        assert!(session.has_more().await);
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn test_overlapping_loads_are_rejected() {
        let mut source = FakeSource::new(vec![("page-2", page(&["b"], None))]);
        source.delay_ms = 100;
        let session = FeedSession::new(source, page(&["a"], Some("page-2")));

        // Two triggers before the first fetch resolves: the second is
        // rejected instead of appending the same page twice.
        let (first, second) = tokio::join!(session.load_more(), session.load_more());
        assert_eq!(first.unwrap(), LoadMore::Appended(1));
        assert!(matches!(second.unwrap_err(), Error::LoadInFlight));
        assert_eq!(session.posts().await.len(), 2);
    }

    #[tokio::test]
    async fn test_sequential_loads_drain_the_listing() {
        let source = FakeSource::new(vec![
            ("page-2", page(&["b"], Some("page-3"))),
            ("page-3", page(&["c"], None)),
        ]);
        let session = FeedSession::new(source, page(&["a"], Some("page-2")));

        assert_eq!(session.load_more().await.unwrap(), LoadMore::Appended(1));
        assert_eq!(session.load_more().await.unwrap(), LoadMore::Appended(1));
        assert_eq!(session.load_more().await.unwrap(), LoadMore::Exhausted);
        assert_eq!(session.posts().await.len(), 3);
    }
}
