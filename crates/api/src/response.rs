use std::sync::Arc;

use chronicle_types::{page::PostPage, post::Post};

use super::endpoint::Endpoint;

/// Typed response, keyed by the endpoint that produced it. Search and
/// next-page requests both yield a page of posts; document requests
/// yield a single post.
#[derive(Debug, Clone)]
pub enum ClientResponse {
    Page(Arc<PostPage>),
    Document(Arc<Post>),
}

impl ClientResponse {
    pub async fn parse(
        endpoint: &Endpoint,
        resp: reqwest::Response,
    ) -> Result<Self, reqwest::Error> {
        match endpoint {
            Endpoint::Search { .. } | Endpoint::Page(_) => {
                Ok(ClientResponse::Page(Arc::new(resp.json().await?)))
            }
            Endpoint::Document(_) => Ok(ClientResponse::Document(Arc::new(resp.json().await?))),
        }
    }
}
