//! GitHub REST v3 client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::client::ApiClient;
use super::types::{CreateRepoBody, GitHubContentEntry, GitHubRepo, PutFileBody};
use crate::domain::{
    ListReposQuery, NewRepository, OwnerInfo, RemoteEntry, RepoInfo, SourceHost,
};

pub const GITHUB_API_URL: &str = "https://api.github.com/";

const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_RAW: &str = "application/vnd.github.raw";
const API_VERSION: &str = "2022-11-28";

/// A contents request returns an array for directories and an object for files.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentsListing {
    Directory(Vec<GitHubContentEntry>),
    File(GitHubContentEntry),
}

/// Token-authenticated GitHub client.
pub struct GitHubClient {
    api: ApiClient,
    base_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api: ApiClient, token: String) -> Self {
        Self {
            api,
            base_url: GITHUB_API_URL.to_string(),
            token,
        }
    }

    /// URL made of the base plus each segment, percent-encoded individually.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = ApiClient::build_url(&self.base_url, "")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("GitHub base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments.iter().flat_map(|s| s.split('/')).filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, accept: &str) -> RequestBuilder {
        self.api
            .http()
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

#[async_trait]
impl SourceHost for GitHubClient {
    async fn authenticated_user(&self) -> Result<OwnerInfo> {
        let url = self.url(&["user"])?;
        self.api
            .send_json(self.request(Method::GET, url, ACCEPT_JSON))
            .await
            .context("Failed to fetch the authenticated GitHub user")
    }

    async fn get_repository(&self, full_name: &str) -> Result<Option<RepoInfo>> {
        let url = self.url(&["repos", full_name])?;
        let repo: Option<GitHubRepo> = self
            .api
            .send_json_opt(self.request(Method::GET, url, ACCEPT_JSON))
            .await
            .with_context(|| format!("Failed to fetch repository {}", full_name))?;
        Ok(repo.map(RepoInfo::from))
    }

    async fn list_repositories(&self, query: &ListReposQuery) -> Result<Vec<RepoInfo>> {
        let mut url = self.url(&["user", "repos"])?;
        url.query_pairs_mut()
            .append_pair("type", &query.repo_type)
            .append_pair("sort", &query.sort)
            .append_pair("per_page", &query.per_page.to_string());
        let repos: Vec<GitHubRepo> = self
            .api
            .send_json(self.request(Method::GET, url, ACCEPT_JSON))
            .await
            .context("Failed to list repositories")?;
        debug!("Listed {} repositories", repos.len());
        Ok(repos.into_iter().map(RepoInfo::from).collect())
    }

    async fn create_repository(&self, repo: &NewRepository) -> Result<RepoInfo> {
        let url = self.url(&["user", "repos"])?;
        let body = CreateRepoBody {
            name: &repo.name,
            description: &repo.description,
            private: repo.private,
            auto_init: false,
        };
        let created: GitHubRepo = self
            .api
            .send_json(self.request(Method::POST, url, ACCEPT_JSON).json(&body))
            .await
            .with_context(|| format!("Failed to create repository {}", repo.name))?;
        Ok(created.into())
    }

    async fn delete_repository(&self, full_name: &str) -> Result<()> {
        let url = self.url(&["repos", full_name])?;
        self.api
            .send_empty(self.request(Method::DELETE, url, ACCEPT_JSON))
            .await
            .with_context(|| format!("Failed to delete repository {}", full_name))
    }

    async fn list_directory(&self, full_name: &str, path: &str) -> Result<Vec<RemoteEntry>> {
        let url = self.url(&["repos", full_name, "contents", path])?;
        let listing: ContentsListing = self
            .api
            .send_json(self.request(Method::GET, url, ACCEPT_JSON))
            .await
            .with_context(|| format!("Failed to list '{}' in {}", path, full_name))?;

        let entries = match listing {
            ContentsListing::Directory(entries) => entries,
            ContentsListing::File(entry) => vec![entry],
        };
        Ok(entries
            .into_iter()
            .map(|e| match e.entry_type.as_str() {
                "dir" => RemoteEntry::dir(e.path),
                _ => RemoteEntry::file(e.path, e.size),
            })
            .collect())
    }

    async fn read_file(&self, full_name: &str, path: &str) -> Result<Vec<u8>> {
        let url = self.url(&["repos", full_name, "contents", path])?;
        self.api
            .send_bytes(self.request(Method::GET, url, ACCEPT_RAW))
            .await
            .with_context(|| format!("Failed to read '{}' from {}", path, full_name))
    }

    async fn put_file(
        &self,
        full_name: &str,
        path: &str,
        content: &[u8],
        message: &str,
    ) -> Result<()> {
        let url = self.url(&["repos", full_name, "contents", path])?;
        let body = PutFileBody {
            message,
            content: STANDARD.encode(content),
        };
        self.api
            .send_empty(self.request(Method::PUT, url, ACCEPT_JSON).json(&body))
            .await
            .with_context(|| format!("Failed to write '{}' to {}", path, full_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitHubClient {
        GitHubClient::new(ApiClient::new(None).unwrap(), "ghp_test".to_string())
    }

    #[test]
    fn test_contents_url_encodes_segments() {
        let url = client()
            .url(&["repos", "octocat/demo", "contents", "notebooks/My Analysis#1.ipynb"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octocat/demo/contents/notebooks/My%20Analysis%231.ipynb"
        );
    }

    #[test]
    fn test_root_contents_url() {
        let url = client()
            .url(&["repos", "octocat/demo", "contents", ""])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/octocat/demo/contents");
    }

    #[test]
    fn test_contents_listing_shapes() {
        let dir: ContentsListing = serde_json::from_str(
            r#"[{"name":"a.py","path":"a.py","type":"file","size":3},{"name":"src","path":"src","type":"dir","size":0}]"#,
        )
        .unwrap();
        assert!(matches!(dir, ContentsListing::Directory(ref v) if v.len() == 2));

        let file: ContentsListing =
            serde_json::from_str(r#"{"name":"a.py","path":"a.py","type":"file","size":3}"#).unwrap();
        assert!(matches!(file, ContentsListing::File(_)));
    }
}
