//! HTTP clients for the external services.
//!
//! Each client implements one port from [`crate::domain::ports`] on top of a
//! shared [`ApiClient`]: GitHub for repositories, Drive for notebook files,
//! Docs for document edits, and Gemini for text generation.

mod client;
mod docs;
mod drive;
mod gemini;
mod github;
mod token;
mod types;

pub use client::ApiClient;
pub use docs::DocsClient;
pub use drive::DriveClient;
pub use gemini::{GeminiClient, DEFAULT_GEMINI_MODEL};
pub use github::GitHubClient;
pub use types::TokenResponse;
