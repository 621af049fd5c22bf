use chronicle_types::{page::PostPage, post::Post};
use tracing::debug;

/// A post as held by the feed: the raw document plus its display date,
/// derived once when the post enters the feed. The derived string is
/// presentation-only; order by the raw timestamp, never by this.
#[derive(Debug, Clone)]
pub struct FeedPost {
    pub post: Post,
    pub display_date: Option<String>,
}

impl From<Post> for FeedPost {
    fn from(post: Post) -> Self {
        let display_date = post.display_date();
        FeedPost { post, display_date }
    }
}

/// The growing, append-only post listing of one browsing session.
///
/// Seeded from the first fetched page, extended one page at a time.
/// The next-page pointer is monotonic: once it goes absent the listing
/// is exhausted and stays exhausted.
#[derive(Debug, Default)]
pub struct PostFeed {
    posts: Vec<FeedPost>,
    next_page: Option<String>,
}

impl PostFeed {
    pub fn new(first_page: PostPage) -> Self {
        let mut feed = PostFeed {
            posts: Vec::new(),
            next_page: first_page.next_page,
        };
        feed.append(first_page.results);
        feed
    }

    pub fn posts(&self) -> &[FeedPost] {
        &self.posts
    }

    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Append a freshly fetched page and take over its pointer.
    /// Returns the number of posts appended. Ignores the page when the
    /// feed is already exhausted, so a stale fetch cannot resurrect the
    /// pointer.
    pub fn apply_page(&mut self, page: PostPage) -> usize {
        if !self.has_more() {
            debug!("Feed is exhausted, dropping late page");
            return 0;
        }
        self.next_page = page.next_page;
        self.append(page.results)
    }

    fn append(&mut self, posts: Vec<Post>) -> usize {
        let appended = posts.len();
        self.posts.extend(posts.into_iter().map(FeedPost::from));
        debug!("Feed grew by {} posts to {}", appended, self.posts.len());
        appended
    }
}
