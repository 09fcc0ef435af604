//! MCP tool parameter types.
//!
//! These types are used with rmcp's `Parameters<T>` wrapper for automatic
//! deserialization and JSON schema generation.

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for the ping tool (no arguments needed)
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct PingArgs {}

/// Parameters for the list_colab_files tool
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListColabFilesArgs {
    /// Drive folder to restrict the listing to
    #[serde(default)]
    pub folder_id: Option<String>,
}

/// Parameters for the read_colab_notebook tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadColabNotebookArgs {
    /// Drive file id of the notebook
    pub file_id: String,
}

/// Parameters for the generate_readme tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateReadmeArgs {
    /// Drive file id of the notebook
    pub file_id: String,
    /// Notebook file name, used as the README title
    pub file_name: String,
}

/// Parameters for the create_github_repo tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateGithubRepoArgs {
    /// Drive file id of the notebook to publish
    pub file_id: String,
    /// Notebook file name; `.ipynb` is appended when missing
    pub file_name: String,
    /// Name of the repository to create
    pub repo_name: String,
    /// Repository description
    #[serde(default)]
    pub repo_description: Option<String>,
    /// Create a private repository (default false)
    #[serde(default)]
    pub is_private: Option<bool>,
}

/// Parameters for the list_github_repos tool
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListGithubReposArgs {
    /// One of all, owner, member, public, private (default owner)
    #[serde(default)]
    pub repo_type: Option<String>,
    /// One of created, updated, pushed, full_name (default updated)
    #[serde(default)]
    pub sort: Option<String>,
    /// Results to return, 1 to 100 (default 30)
    #[serde(default)]
    pub per_page: Option<i64>,
}

/// Parameters for the read_github_repo_files tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadGithubRepoFilesArgs {
    /// `owner/name`, or a bare name owned by the authenticated user
    pub repo_name: String,
    /// File extensions to include, e.g. ["py", ".ipynb"]
    #[serde(default)]
    pub file_types: Option<Vec<String>>,
    /// Maximum number of files to read, 1 to 200 (default 50)
    #[serde(default)]
    pub max_files: Option<i64>,
}

/// Parameters for the analyze_github_repo_with_ai tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AnalyzeGithubRepoArgs {
    /// `owner/name`, or a bare name owned by the authenticated user
    pub repo_name: String,
    /// One of comprehensive, readme_only, code_only, structure (default comprehensive)
    #[serde(default)]
    pub analysis_type: Option<String>,
    /// Maximum number of code files sent in code_only mode, 1 to 100 (default 20)
    #[serde(default)]
    pub max_files_to_analyze: Option<i64>,
}

/// Parameters for the summarize_repo_analysis_for_resume tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SummarizeRepoArgs {
    /// Repository the analysis is about
    pub repo_name: String,
    /// Analysis text to summarize
    pub analysis_text: String,
    /// One of technical, leadership, impact, learning (default technical)
    #[serde(default)]
    pub focus_area: Option<String>,
}

/// Parameters for the list_google_docs tool
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListGoogleDocsArgs {
    /// Only documents whose name contains this text
    #[serde(default)]
    pub search_term: Option<String>,
}

/// Parameters for the add_to_google_doc tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddToGoogleDocArgs {
    /// Google Docs document id
    pub doc_id: String,
    /// Text to append
    pub content: String,
    /// Heading placed above the text (default "Repository Summary")
    #[serde(default)]
    pub section_title: Option<String>,
}
