use std::fmt::{Display, Formatter};

/// The content backend's query surface: a paginated search over one
/// document type, single-document retrieval by uid, and opaque
/// next-page pointers returned inside search responses.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Endpoint {
    Search {
        document_type: String,
        page_size: i32,
    },
    Document(String),
    Page(String),
}

impl Endpoint {
    const BASE_URL: &'static str = "cms.chronicle.dev/api/v2";

    pub fn posts(page_size: i32) -> Self {
        Endpoint::Search {
            document_type: "posts".to_string(),
            page_size,
        }
    }

    pub fn http(&self) -> String {
        format!("http://{}", self)
    }

    pub fn https(&self) -> String {
        format!("https://{}", self)
    }

    /// Full request URL. Next-page pointers are already absolute URLs
    /// handed back by the backend and are used verbatim.
    pub fn url(&self, https: bool) -> String {
        match self {
            Self::Page(url) => url.clone(),
            _ if https => self.https(),
            _ => self.http(),
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Search {
                    document_type,
                    page_size,
                } => format!(
                    "{}/documents/search?type={}&page_size={}",
                    Self::BASE_URL,
                    document_type,
                    page_size
                ),
                Self::Document(uid) => format!("{}/documents/{}", Self::BASE_URL, uid),
                Self::Page(url) => url.clone(),
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let endpoint = Endpoint::posts(20);
        assert_eq!(
            endpoint.url(true),
            "https://cms.chronicle.dev/api/v2/documents/search?type=posts&page_size=20"
        );
        assert_eq!(
            endpoint.url(false),
            "http://cms.chronicle.dev/api/v2/documents/search?type=posts&page_size=20"
        );
    }

    #[test]
    fn test_document_url() {
        let endpoint = Endpoint::Document("my-first-post".to_string());
        assert_eq!(
            endpoint.url(true),
            "https://cms.chronicle.dev/api/v2/documents/my-first-post"
        );
    }

    #[test]
    fn test_page_pointer_is_used_verbatim() {
        let pointer = "https://cms.chronicle.dev/api/v2/documents/search?type=posts&page=2";
        let endpoint = Endpoint::Page(pointer.to_string());
        assert_eq!(endpoint.url(false), pointer);
        assert_eq!(endpoint.url(true), pointer);
    }
}
