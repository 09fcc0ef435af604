//! Google Drive v3 client.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use url::Url;

use super::client::ApiClient;
use super::types::{DriveFileList, DriveFileResource};
use crate::domain::{AccessTokenSource, DriveFile, FileStore};

pub const DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3/";

const FILE_FIELDS: &str = "id, name, mimeType, webViewLink, modifiedTime, owners(displayName, emailAddress)";

pub struct DriveClient {
    api: ApiClient,
    base_url: String,
    tokens: Arc<dyn AccessTokenSource>,
}

impl DriveClient {
    pub fn new(api: ApiClient, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            api,
            base_url: DRIVE_API_URL.to_string(),
            tokens,
        }
    }

    fn file_url(&self, file_id: &str) -> Result<Url> {
        let mut url = ApiClient::build_url(&self.base_url, "files")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Drive base URL cannot carry a path: {}", self.base_url))?
            .push(file_id);
        Ok(url)
    }

    /// A request carrying a currently valid access token.
    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.tokens.access_token().await?;
        Ok(self.api.http().request(method, url).bearer_auth(token))
    }
}

#[async_trait]
impl FileStore for DriveClient {
    async fn list_files(&self, query: &str, page_size: u32) -> Result<Vec<DriveFile>> {
        let mut url = ApiClient::build_url(&self.base_url, "files")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("pageSize", &page_size.to_string())
            .append_pair("orderBy", "modifiedTime desc")
            .append_pair("fields", &format!("files({})", FILE_FIELDS));
        let list: DriveFileList = self
            .api
            .send_json(self.request(Method::GET, url).await?)
            .await
            .context("Failed to list Drive files")?;
        Ok(list.files.into_iter().map(DriveFile::from).collect())
    }

    async fn get_file(&self, file_id: &str) -> Result<DriveFile> {
        let mut url = self.file_url(file_id)?;
        url.query_pairs_mut().append_pair("fields", FILE_FIELDS);
        let file: DriveFileResource = self
            .api
            .send_json(self.request(Method::GET, url).await?)
            .await
            .with_context(|| format!("Failed to fetch Drive file {}", file_id))?;
        Ok(file.into())
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let mut url = self.file_url(file_id)?;
        url.query_pairs_mut().append_pair("alt", "media");
        self.api
            .send_bytes(self.request(Method::GET, url).await?)
            .await
            .with_context(|| format!("Failed to download Drive file {}", file_id))
    }
}
