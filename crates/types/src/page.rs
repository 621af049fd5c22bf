use serde::{Deserialize, Serialize};

use crate::post::Post;

/// One page of a paginated listing. `next_page` is an opaque URL
/// pointing at the following page; `None` means the listing is
/// exhausted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PostPage {
    #[serde(default)]
    pub page: Option<i32>,
    #[serde(default)]
    pub total_pages: Option<i32>,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub results: Vec<Post>,
}

impl PostPage {
    pub fn is_last(&self) -> bool {
        self.next_page.is_none()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
