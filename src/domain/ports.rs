//! Ports for the external collaborators.
//!
//! Every remote service is reached through one of these traits. The live
//! implementations live in `crate::api`; tests drive the components with the
//! in-memory doubles from `crate::testing` or with `mockall` mocks.

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{
    DocumentStructure, DriveFile, ListReposQuery, NewRepository, OwnerInfo, RemoteEntry, RepoInfo,
};

/// Source-hosting platform: repositories, file trees and file contents.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// The account the configured token belongs to.
    async fn authenticated_user(&self) -> Result<OwnerInfo>;

    /// Repository metadata, or `None` when it does not exist.
    async fn get_repository(&self, full_name: &str) -> Result<Option<RepoInfo>>;

    async fn list_repositories(&self, query: &ListReposQuery) -> Result<Vec<RepoInfo>>;

    async fn create_repository(&self, repo: &NewRepository) -> Result<RepoInfo>;

    async fn delete_repository(&self, full_name: &str) -> Result<()>;

    /// Entries of one directory, in the order the platform returns them.
    async fn list_directory(&self, full_name: &str, path: &str) -> Result<Vec<RemoteEntry>>;

    async fn read_file(&self, full_name: &str, path: &str) -> Result<Vec<u8>>;

    /// Create a file on the default branch.
    async fn put_file(
        &self,
        full_name: &str,
        path: &str,
        content: &[u8],
        message: &str,
    ) -> Result<()>;
}

/// Cloud file store: listing, metadata and raw content.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Files matching a store query expression.
    async fn list_files(&self, query: &str, page_size: u32) -> Result<Vec<DriveFile>>;

    async fn get_file(&self, file_id: &str) -> Result<DriveFile>;

    async fn download(&self, file_id: &str) -> Result<Vec<u8>>;
}

/// Rich-text document service.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_document(&self, document_id: &str) -> Result<DocumentStructure>;

    /// Insert `text` at `index` in a single mutation.
    async fn insert_text(&self, document_id: &str, index: i64, text: &str) -> Result<()>;
}

/// Generative text backend.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Bearer tokens for the Google services, refreshed by the implementation as needed.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}
