//! MCP tool implementations.
//!
//! Each tool is a plain async function returning `Result<Payload, ToolError>`;
//! the server renders the outcome with [`respond`].

mod colab;
mod common;
mod docs;
mod github;
mod ping;

pub use colab::{generate_readme, list_colab_files, read_colab_notebook};
pub use common::respond;
pub use docs::{add_to_google_doc, list_google_docs};
pub use github::{
    analyze_github_repo_with_ai, create_github_repo, list_github_repos, read_github_repo_files,
    summarize_repo_analysis_for_resume,
};
pub use ping::ping;
