//! Google Docs v1 client.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use url::Url;

use super::client::ApiClient;
use super::types::{BatchUpdateRequest, DocsDocument, DocsRequest, InsertText, Location};
use crate::domain::{AccessTokenSource, DocumentStore, DocumentStructure};

pub const DOCS_API_URL: &str = "https://docs.googleapis.com/v1/";

pub struct DocsClient {
    api: ApiClient,
    base_url: String,
    tokens: Arc<dyn AccessTokenSource>,
}

impl DocsClient {
    pub fn new(api: ApiClient, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            api,
            base_url: DOCS_API_URL.to_string(),
            tokens,
        }
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.tokens.access_token().await?;
        Ok(self.api.http().request(method, url).bearer_auth(token))
    }

    /// `documents/{id}` plus an optional `:action` suffix on the last segment.
    fn document_url(&self, document_id: &str, action: Option<&str>) -> Result<Url> {
        let mut url = ApiClient::build_url(&self.base_url, "documents")?;
        let last = match action {
            Some(action) => format!("{}:{}", document_id, action),
            None => document_id.to_string(),
        };
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Docs base URL cannot carry a path: {}", self.base_url))?
            .push(&last);
        Ok(url)
    }
}

#[async_trait]
impl DocumentStore for DocsClient {
    async fn get_document(&self, document_id: &str) -> Result<DocumentStructure> {
        let url = self.document_url(document_id, None)?;
        let doc: DocsDocument = self
            .api
            .send_json(self.request(Method::GET, url).await?)
            .await
            .with_context(|| format!("Failed to fetch document {}", document_id))?;
        Ok(doc.into())
    }

    async fn insert_text(&self, document_id: &str, index: i64, text: &str) -> Result<()> {
        let url = self.document_url(document_id, Some("batchUpdate"))?;
        let body = BatchUpdateRequest {
            requests: vec![DocsRequest {
                insert_text: InsertText {
                    location: Location { index },
                    text,
                },
            }],
        };
        self.api
            .send_empty(self.request(Method::POST, url).await?.json(&body))
            .await
            .with_context(|| format!("Failed to insert text into document {}", document_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockAccessTokenSource;

    #[test]
    fn test_batch_update_url() {
        let client = DocsClient::new(
            ApiClient::new(None).unwrap(),
            Arc::new(MockAccessTokenSource::new()),
        );
        let url = client.document_url("doc-1", Some("batchUpdate")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://docs.googleapis.com/v1/documents/doc-1:batchUpdate"
        );
    }
}
