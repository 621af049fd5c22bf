use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::{escape_html, plain_text, word_count};

/// Assumed reading speed for the estimator.
pub const WORDS_PER_MINUTE: usize = 200;

/// Allow-listed rich text node kinds accepted from the content backend.
/// Anything outside this list is rejected at the serde boundary rather
/// than passed through as raw markup.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RichTextNode {
    Paragraph { text: String },
    Heading1 { text: String },
    Heading2 { text: String },
    Heading3 { text: String },
    ListItem { text: String },
    OListItem { text: String },
    Preformatted { text: String },
    Image { url: String, alt: Option<String> },
}

impl RichTextNode {
    /// Plain text content of the node. Image nodes contribute nothing.
    pub fn as_text(&self) -> String {
        match self {
            Self::Paragraph { text }
            | Self::Heading1 { text }
            | Self::Heading2 { text }
            | Self::Heading3 { text }
            | Self::ListItem { text }
            | Self::OListItem { text }
            | Self::Preformatted { text } => plain_text(text).unwrap_or_default(),
            Self::Image { .. } => String::new(),
        }
    }

    /// Render the node to markup. Text is escaped; only the allow-listed
    /// kinds ever produce output, so no backend markup reaches the page
    /// unfiltered. Grouping consecutive list items into `<ul>`/`<ol>` is
    /// left to the caller.
    pub fn as_html(&self) -> String {
        match self {
            Self::Paragraph { text } => format!("<p>{}</p>", escape_html(text)),
            Self::Heading1 { text } => format!("<h1>{}</h1>", escape_html(text)),
            Self::Heading2 { text } => format!("<h2>{}</h2>", escape_html(text)),
            Self::Heading3 { text } => format!("<h3>{}</h3>", escape_html(text)),
            Self::ListItem { text } | Self::OListItem { text } => {
                format!("<li>{}</li>", escape_html(text))
            }
            Self::Preformatted { text } => format!("<pre>{}</pre>", escape_html(text)),
            Self::Image { url, alt } => format!(
                "<img src=\"{}\" alt=\"{}\" />",
                escape_html(url),
                escape_html(alt.as_deref().unwrap_or(""))
            ),
        }
    }
}

/// One section of a post: a heading plus a rich text body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default, deserialize_with = "lenient_body")]
    pub body: Vec<RichTextNode>,
}

impl ContentBlock {
    /// Plain text of the whole body, one node per line.
    pub fn body_text(&self) -> String {
        self.body
            .iter()
            .map(|node| node.as_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.body_text())
    }

    /// Per-block reading estimate: `ceil(words / 200)`. An empty body
    /// has zero words and contributes zero minutes.
    pub fn reading_minutes(&self) -> usize {
        self.word_count().div_ceil(WORDS_PER_MINUTE)
    }

    pub fn body_html(&self) -> String {
        self.body
            .iter()
            .map(|node| node.as_html())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A body that fails to deserialize degrades to an empty body instead of
/// failing the whole document.
fn lenient_body<'de, D>(deserializer: D) -> Result<Vec<RichTextNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match serde_json::from_value(value) {
        Ok(nodes) => Ok(nodes),
        Err(e) => {
            tracing::debug!("Discarding malformed rich text body: {}", e);
            Ok(vec![])
        }
    }
}
