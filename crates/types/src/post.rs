use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::format_display_date;
use crate::richtext::ContentBlock;

/// A single document from the content backend. Read-only snapshot;
/// nothing here is ever mutated after deserialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub first_publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: PostData,
}

/// The author-defined fields of a post, as an explicit schema rather
/// than an ambient field bag. Missing optional fields are not errors;
/// unknown fields are dropped.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PostData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub banner: Option<Banner>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
}

impl Post {
    pub fn slug(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    /// Sum of per-block ceilings, deliberately not a single rounding
    /// over the total word count. Zero blocks estimate to zero.
    pub fn reading_minutes(&self) -> usize {
        self.data
            .content
            .iter()
            .map(|block| block.reading_minutes())
            .sum()
    }

    /// Fixed-locale display date derived from the first publication
    /// timestamp. None when the post was never published.
    pub fn display_date(&self) -> Option<String> {
        self.first_publication_date
            .as_ref()
            .map(format_display_date)
    }
}

impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for Post {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::RichTextNode;

    fn block_with_words(n: usize) -> ContentBlock {
        ContentBlock {
            heading: None,
            body: vec![RichTextNode::Paragraph {
                text: vec!["word"; n].join(" "),
            }],
        }
    }

    fn post_with_blocks(blocks: Vec<ContentBlock>) -> Post {
        Post {
            uid: Some("a-post".to_string()),
            first_publication_date: None,
            last_publication_date: None,
            data: PostData {
                title: "A post".to_string(),
                content: blocks,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_reading_minutes_sums_per_block_ceilings() {
        let post = post_with_blocks(vec![
            block_with_words(150),
            block_with_words(250),
            block_with_words(10),
        ]);
        // ceil(150/200) + ceil(250/200) + ceil(10/200) = 1 + 2 + 1
        assert_eq!(post.reading_minutes(), 4);
    }

    #[test]
    fn test_no_content_reads_in_zero_minutes() {
        assert_eq!(post_with_blocks(vec![]).reading_minutes(), 0);
    }

    #[test]
    fn test_optional_fields_deserialize_as_absent() {
        let raw = r#"{
            "uid": "my-first-post",
            "first_publication_date": "2021-03-15T19:25:28+00:00",
            "last_publication_date": null,
            "data": {
                "title": "My first post",
                "author": "jane"
            }
        }"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.slug(), Some("my-first-post"));
        assert!(post.data.subtitle.is_none());
        assert!(post.data.banner.is_none());
        assert!(post.data.content.is_empty());
        assert_eq!(post.display_date().unwrap(), "15 Mar 2021");
    }

    #[test]
    fn test_unpublished_post_has_no_display_date() {
        let post = post_with_blocks(vec![]);
        assert!(post.display_date().is_none());
    }

    #[test]
    fn test_posts_compare_by_uid() {
        let a = post_with_blocks(vec![]);
        let mut b = post_with_blocks(vec![block_with_words(5)]);
        assert_eq!(a, b);
        b.uid = Some("other".to_string());
        assert_ne!(a, b);
    }
}
