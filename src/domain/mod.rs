//! Domain types shared across modules.
//!
//! This module contains the data model used by the crawler, the analysis
//! pipeline, the publish workflow and the MCP tools, plus the port traits
//! every remote client implements. Keeping them here avoids circular
//! dependencies between `api`, `repository`, `analysis` and `mcp`.

pub mod ports;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use ports::{AccessTokenSource, DocumentStore, FileStore, SourceHost, TextGenerator};

/// Kind of an entry in a remote file tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry of a remote directory listing, in the order the service returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub path: String,
    pub name: String,
    pub kind: EntryKind,
    pub size_bytes: u64,
}

impl RemoteEntry {
    pub fn file(path: impl Into<String>, size_bytes: u64) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self {
            path,
            name,
            kind: EntryKind::File,
            size_bytes,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self {
            path,
            name,
            kind: EntryKind::Dir,
            size_bytes: 0,
        }
    }
}

/// A file captured by one crawl. Immutable once the snapshot is built.
#[derive(Debug, Clone, Serialize)]
pub struct FileNode {
    pub path: String,
    pub name: String,
    pub kind: EntryKind,
    /// Lower-cased extension including the leading dot, empty when absent.
    pub extension: String,
    pub size_bytes: u64,
    /// Directory levels below the crawl root; root entries are at depth 0.
    pub depth: usize,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub truncated: bool,
}

/// Bounded result of one crawl.
#[derive(Debug, Clone, Serialize)]
pub struct RepositorySnapshot {
    pub repo_identifier: String,
    pub files: Vec<FileNode>,
    pub counts_by_category: BTreeMap<String, usize>,
    pub traversal_depth_reached: usize,
    pub file_limit_reached: bool,
}

/// Strategy selecting which files feed a generative request and how much of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Comprehensive,
    ReadmeOnly,
    CodeOnly,
    Structure,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 4] = [
        AnalysisMode::Comprehensive,
        AnalysisMode::ReadmeOnly,
        AnalysisMode::CodeOnly,
        AnalysisMode::Structure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Comprehensive => "comprehensive",
            AnalysisMode::ReadmeOnly => "readme_only",
            AnalysisMode::CodeOnly => "code_only",
            AnalysisMode::Structure => "structure",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|mode| mode.as_str() == value)
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many files of each group were embedded in a prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileCounts {
    pub readme_files: usize,
    pub code_files: usize,
    pub other_files: usize,
    pub total_files: usize,
}

/// A prompt ready to be dispatched to the generative backend.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub mode: AnalysisMode,
    pub content_budget_chars: usize,
    pub prompt_text: String,
    pub prompt_truncated: bool,
    pub files_included: FileCounts,
}

/// Text produced by the generative backend for one request.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub text: String,
    pub source_mode: AnalysisMode,
    pub files_analyzed_counts: FileCounts,
}

/// Exactly three resume statements about one repository.
#[derive(Debug, Clone, Serialize)]
pub struct BulletSummary {
    pub repo_identifier: String,
    pub focus_area: String,
    pub points: Vec<String>,
}

/// The authenticated account on the source-hosting platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerInfo {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub html_url: String,
}

/// Repository metadata as reported by the source-hosting platform.
#[derive(Debug, Clone, Serialize)]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    pub owner: String,
    pub description: Option<String>,
    pub private: bool,
    pub html_url: String,
    pub clone_url: String,
    pub ssh_url: String,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub default_branch: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Parameters of a repository creation.
#[derive(Debug, Clone)]
pub struct NewRepository {
    pub name: String,
    pub description: String,
    pub private: bool,
}

/// Filters for listing the authenticated user's repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListReposQuery {
    pub repo_type: String,
    pub sort: String,
    pub per_page: u32,
}

/// A file in the cloud file store.
#[derive(Debug, Clone, Serialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
    pub web_view_link: Option<String>,
    pub modified_time: Option<String>,
    pub owners: Vec<String>,
}

/// A top-level block of a rich-text document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBlock {
    pub start_index: i64,
    pub end_index: i64,
}

/// The parts of a rich-text document needed to append to it.
#[derive(Debug, Clone)]
pub struct DocumentStructure {
    pub document_id: String,
    pub title: String,
    pub content: Vec<ContentBlock>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_mode_parse() {
        assert_eq!(
            AnalysisMode::parse("comprehensive"),
            Some(AnalysisMode::Comprehensive)
        );
        assert_eq!(
            AnalysisMode::parse(" Code_Only "),
            Some(AnalysisMode::CodeOnly)
        );
        assert_eq!(AnalysisMode::parse("everything"), None);
    }

    #[test]
    fn test_remote_entry_name_from_path() {
        let entry = RemoteEntry::file("src/lib/util.py", 12);
        assert_eq!(entry.name, "util.py");
        assert_eq!(entry.kind, EntryKind::File);

        let entry = RemoteEntry::dir("docs");
        assert_eq!(entry.name, "docs");
        assert_eq!(entry.kind, EntryKind::Dir);
    }
}
