//! Gemini `generateContent` client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use tracing::debug;
use url::Url;

use super::client::ApiClient;
use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::domain::TextGenerator;

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// The key travels in a header so that it never appears in a URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    api: ApiClient,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api: ApiClient, api_key: String, model: String) -> Self {
        Self {
            api,
            base_url: GEMINI_API_URL.to_string(),
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> Result<Url> {
        let mut url = ApiClient::build_url(&self.base_url, "models")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Gemini base URL cannot carry a path: {}", self.base_url))?
            .push(&format!("{}:generateContent", self.model));
        Ok(url)
    }

    fn generate_request(&self, prompt: &str) -> Result<RequestBuilder> {
        let url = self.generate_url()?;
        Ok(self
            .api
            .http()
            .request(Method::POST, url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt)))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response: GenerateContentResponse = self
            .api
            .send_json(self.generate_request(prompt)?)
            .await
            .with_context(|| format!("Gemini request to {} failed", self.model))?;
        let text = response.text();
        debug!("Gemini returned {} characters", text.chars().count());
        Ok(text)
    }
}
