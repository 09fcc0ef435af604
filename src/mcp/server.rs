//! MCP server implementation.
//!
//! This module contains the ColabHubServer struct and its tool routing.

use std::sync::Arc;

use rmcp::{
    handler::server::router::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};

use crate::runtime::Runtime;

use super::tools::{self, respond};
use super::types::*;

/// Notebook, repository and document tools over one shared [`Runtime`].
#[derive(Clone)]
pub struct ColabHubServer {
    runtime: Arc<Runtime>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ColabHubServer {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self {
            runtime,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(name = "ping", description = "Check that the server is alive")]
    async fn ping(&self, Parameters(args): Parameters<PingArgs>) -> Result<CallToolResult, McpError> {
        Ok(respond("ping", tools::ping(args)))
    }

    #[tool(
        name = "list_colab_files",
        description = "List Google Colab notebooks in Google Drive, optionally restricted to one folder"
    )]
    async fn list_colab_files(
        &self,
        Parameters(args): Parameters<ListColabFilesArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(
            "list_colab_files",
            tools::list_colab_files(&self.runtime, args).await,
        ))
    }

    #[tool(
        name = "read_colab_notebook",
        description = "Read the cells of a Google Colab notebook stored in Google Drive"
    )]
    async fn read_colab_notebook(
        &self,
        Parameters(args): Parameters<ReadColabNotebookArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(
            "read_colab_notebook",
            tools::read_colab_notebook(&self.runtime, args).await,
        ))
    }

    #[tool(
        name = "generate_readme",
        description = "Generate a README.md for a Colab notebook, using Gemini when configured and a template otherwise"
    )]
    async fn generate_readme(
        &self,
        Parameters(args): Parameters<GenerateReadmeArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(
            "generate_readme",
            tools::generate_readme(&self.runtime, args).await,
        ))
    }

    #[tool(
        name = "create_github_repo",
        description = "Create a GitHub repository from a Colab notebook, uploading the notebook, a generated README.md and a .gitignore. The repository is deleted again if setup fails before any file is uploaded."
    )]
    async fn create_github_repo(
        &self,
        Parameters(args): Parameters<CreateGithubRepoArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(
            "create_github_repo",
            tools::create_github_repo(&self.runtime, args).await,
        ))
    }

    #[tool(
        name = "list_github_repos",
        description = "List repositories of the authenticated GitHub user"
    )]
    async fn list_github_repos(
        &self,
        Parameters(args): Parameters<ListGithubReposArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(
            "list_github_repos",
            tools::list_github_repos(&self.runtime, args).await,
        ))
    }

    #[tool(
        name = "read_github_repo_files",
        description = "Walk a GitHub repository and return the files matching the given extensions, with their content"
    )]
    async fn read_github_repo_files(
        &self,
        Parameters(args): Parameters<ReadGithubRepoFilesArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(
            "read_github_repo_files",
            tools::read_github_repo_files(&self.runtime, args).await,
        ))
    }

    #[tool(
        name = "analyze_github_repo_with_ai",
        description = "Analyze a GitHub repository with Gemini. Modes: comprehensive, readme_only, code_only, structure."
    )]
    async fn analyze_github_repo_with_ai(
        &self,
        Parameters(args): Parameters<AnalyzeGithubRepoArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(
            "analyze_github_repo_with_ai",
            tools::analyze_github_repo_with_ai(&self.runtime, args).await,
        ))
    }

    #[tool(
        name = "summarize_repo_analysis_for_resume",
        description = "Turn a repository analysis into exactly three resume bullet points"
    )]
    async fn summarize_repo_analysis_for_resume(
        &self,
        Parameters(args): Parameters<SummarizeRepoArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(
            "summarize_repo_analysis_for_resume",
            tools::summarize_repo_analysis_for_resume(&self.runtime, args).await,
        ))
    }

    #[tool(
        name = "list_google_docs",
        description = "List Google Docs documents, optionally filtered by a name search term"
    )]
    async fn list_google_docs(
        &self,
        Parameters(args): Parameters<ListGoogleDocsArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(
            "list_google_docs",
            tools::list_google_docs(&self.runtime, args).await,
        ))
    }

    #[tool(
        name = "add_to_google_doc",
        description = "Append a titled section of text to the end of a Google Docs document"
    )]
    async fn add_to_google_doc(
        &self,
        Parameters(args): Parameters<AddToGoogleDocArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(
            "add_to_google_doc",
            tools::add_to_google_doc(&self.runtime, args).await,
        ))
    }
}

#[tool_handler]
impl ServerHandler for ColabHubServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "colabhub".to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "colabhub bridges Google Colab notebooks in Google Drive, GitHub repositories, Gemini analysis and Google Docs."
                    .to_string(),
            ),
        }
    }
}
