//! GitHub tools: listing, crawling, AI analysis, resume bullets and publishing.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::analysis::{
    formatted_summary, AnalysisComposer, AnalysisOutcome, FocusArea, ResumeSummarizer,
};
use crate::domain::{
    AnalysisMode, FileCounts, FileNode, ListReposQuery, OwnerInfo, RepoInfo, RepositorySnapshot,
    SourceHost,
};
use crate::error::ToolError;
use crate::mcp::types::{
    AnalyzeGithubRepoArgs, CreateGithubRepoArgs, ListGithubReposArgs, ReadGithubRepoFilesArgs,
    SummarizeRepoArgs,
};
use crate::publish::{PublishOrchestrator, PublishReceipt, PublishRequest};
use crate::repository::{normalize_extensions, CrawlOptions, TreeCrawler};
use crate::runtime::Runtime;

use super::common::{require_drive, require_github, require_non_empty, resolve_repo};

pub const REPO_TYPES: [&str; 5] = ["all", "owner", "member", "public", "private"];
pub const REPO_SORTS: [&str; 4] = ["created", "updated", "pushed", "full_name"];

const DEFAULT_PER_PAGE: i64 = 30;
const MAX_PER_PAGE: i64 = 100;
const DEFAULT_MAX_FILES: usize = 50;
const MAX_FILES_CAP: usize = 200;
const DEFAULT_FILES_TO_ANALYZE: usize = 20;
const MAX_FILES_TO_ANALYZE: usize = 100;
/// Files collected before composing an analysis prompt.
const ANALYSIS_CRAWL_LIMIT: usize = 100;

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RepoFilters {
    pub repo_type: String,
    pub sort: String,
    pub per_page: u32,
}

#[derive(Debug, Serialize)]
pub struct RepoListing {
    pub user_info: OwnerInfo,
    pub repositories: Vec<RepoInfo>,
    pub count: usize,
    pub filters: RepoFilters,
}

#[derive(Debug, Serialize)]
pub struct RepositorySummary {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub html_url: String,
    pub default_branch: String,
    pub private: bool,
    pub stars: u64,
    pub forks: u64,
}

impl From<RepoInfo> for RepositorySummary {
    fn from(repo: RepoInfo) -> Self {
        Self {
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            language: repo.language,
            html_url: repo.html_url,
            default_branch: repo.default_branch,
            private: repo.private,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CrawlSummary {
    pub total_files: usize,
    pub counts_by_category: BTreeMap<String, usize>,
    pub max_files: usize,
    pub file_limit_reached: bool,
    pub traversal_depth_reached: usize,
    pub file_types: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RepoFiles {
    pub repository: RepositorySummary,
    pub summary: CrawlSummary,
    pub files: Vec<FileNode>,
    pub files_by_type: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisMetadata {
    pub model: Option<String>,
    pub prompt_characters: usize,
    pub prompt_truncated: bool,
    pub files_collected: usize,
    pub file_limit_reached: bool,
    pub counts_by_category: BTreeMap<String, usize>,
    pub analyzed_at: String,
}

#[derive(Debug, Serialize)]
pub struct RepoAnalysis {
    pub repository_info: RepositorySummary,
    pub analysis_type: AnalysisMode,
    pub files_analyzed: FileCounts,
    pub ai_analysis: String,
    pub analysis_metadata: AnalysisMetadata,
}

#[derive(Debug, Serialize)]
pub struct ResumeBullets {
    pub repository: String,
    pub focus_area: String,
    pub bullet_points: Vec<String>,
    pub formatted_summary: String,
}

#[derive(Debug, Serialize)]
pub struct RepoCreated {
    pub success: bool,
    pub message: String,
    pub repository: PublishReceipt,
}

// ============================================================================
// Parameter handling
// ============================================================================

fn choose<'a>(name: &str, value: Option<&'a str>, allowed: &[&'a str], default: &'a str) -> Result<&'a str, ToolError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(default);
    };
    allowed
        .iter()
        .find(|candidate| **candidate == value)
        .copied()
        .ok_or_else(|| {
            ToolError::validation(format!(
                "Invalid {} '{}'. Must be one of: {}",
                name,
                value,
                allowed.join(", ")
            ))
        })
}

fn list_query(args: &ListGithubReposArgs) -> Result<ListReposQuery, ToolError> {
    let repo_type = choose("repo_type", args.repo_type.as_deref(), &REPO_TYPES, "owner")?;
    let sort = choose("sort", args.sort.as_deref(), &REPO_SORTS, "updated")?;
    let per_page = args.per_page.unwrap_or(DEFAULT_PER_PAGE);
    if !(1..=MAX_PER_PAGE).contains(&per_page) {
        return Err(ToolError::validation(format!(
            "per_page must be between 1 and {}, got {}",
            MAX_PER_PAGE, per_page
        )));
    }
    Ok(ListReposQuery {
        repo_type: repo_type.to_string(),
        sort: sort.to_string(),
        per_page: per_page as u32,
    })
}

/// Missing or non-positive values use the default; large values are capped.
fn clamp_count(value: Option<i64>, default: usize, cap: usize) -> usize {
    match value {
        Some(n) if n >= 1 => (n as u64).min(cap as u64) as usize,
        _ => default,
    }
}

async fn fetch_repository(host: &dyn SourceHost, full_name: &str) -> Result<RepoInfo, ToolError> {
    host.get_repository(full_name)
        .await
        .map_err(|e| ToolError::remote("Failed to fetch repository", &e))?
        .ok_or_else(|| ToolError::Remote(format!("Repository '{}' not found", full_name)))
}

async fn crawl(
    host: &dyn SourceHost,
    full_name: &str,
    options: &CrawlOptions,
) -> Result<RepositorySnapshot, ToolError> {
    TreeCrawler::new(host)
        .crawl(full_name, options)
        .await
        .map_err(|e| ToolError::remote("Failed to read repository files", &e))
}

// ============================================================================
// Tools
// ============================================================================

pub async fn list_github_repos(
    runtime: &Runtime,
    args: ListGithubReposArgs,
) -> Result<RepoListing, ToolError> {
    let host = require_github(runtime)?;
    let query = list_query(&args)?;

    let user_info = host
        .authenticated_user()
        .await
        .map_err(|e| ToolError::remote("Failed to fetch the GitHub user", &e))?;
    let repositories = host
        .list_repositories(&query)
        .await
        .map_err(|e| ToolError::remote("Failed to list repositories", &e))?;

    Ok(RepoListing {
        user_info,
        count: repositories.len(),
        repositories,
        filters: RepoFilters {
            repo_type: query.repo_type,
            sort: query.sort,
            per_page: query.per_page,
        },
    })
}

pub async fn read_github_repo_files(
    runtime: &Runtime,
    args: ReadGithubRepoFilesArgs,
) -> Result<RepoFiles, ToolError> {
    let host = require_github(runtime)?;
    let max_files = clamp_count(args.max_files, DEFAULT_MAX_FILES, MAX_FILES_CAP);
    let extensions = normalize_extensions(args.file_types.as_deref());
    let full_name = resolve_repo(host, &args.repo_name).await?;

    let repo = fetch_repository(host, &full_name).await?;
    let options = CrawlOptions::new(extensions, max_files);
    let snapshot = crawl(host, &full_name, &options).await?;

    let mut files_by_type: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for node in &snapshot.files {
        files_by_type
            .entry(node.category.clone())
            .or_default()
            .push(node.path.clone());
    }
    let mut file_types: Vec<String> = options.allowed_extensions.iter().cloned().collect();
    file_types.sort();

    info!("📂 Read {} files from {}", snapshot.files.len(), full_name);
    Ok(RepoFiles {
        repository: repo.into(),
        summary: CrawlSummary {
            total_files: snapshot.files.len(),
            counts_by_category: snapshot.counts_by_category,
            max_files,
            file_limit_reached: snapshot.file_limit_reached,
            traversal_depth_reached: snapshot.traversal_depth_reached,
            file_types,
        },
        files: snapshot.files,
        files_by_type,
    })
}

pub async fn analyze_github_repo_with_ai(
    runtime: &Runtime,
    args: AnalyzeGithubRepoArgs,
) -> Result<RepoAnalysis, ToolError> {
    let host = require_github(runtime)?;
    let Some(generator) = runtime.generator() else {
        return Err(ToolError::configuration(
            "Gemini API key not configured. Set GEMINI_API_KEY to enable AI analysis.",
        ));
    };
    let mode = match args.analysis_type.as_deref().map(str::trim) {
        None | Some("") => AnalysisMode::Comprehensive,
        Some(value) => AnalysisMode::parse(value).ok_or_else(|| {
            ToolError::validation(format!(
                "Invalid analysis_type '{}'. Must be one of: {}",
                value,
                AnalysisMode::ALL
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?,
    };
    let max_files_to_analyze = clamp_count(
        args.max_files_to_analyze,
        DEFAULT_FILES_TO_ANALYZE,
        MAX_FILES_TO_ANALYZE,
    );
    let full_name = resolve_repo(host, &args.repo_name).await?;

    let repo = fetch_repository(host, &full_name).await?;
    let options = CrawlOptions::new(normalize_extensions(None), ANALYSIS_CRAWL_LIMIT);
    let snapshot = crawl(host, &full_name, &options).await?;

    let composer = AnalysisComposer::new(Some(generator));
    let request = composer.compose(&snapshot, mode, max_files_to_analyze);
    let result = match composer.analyze(&request).await {
        AnalysisOutcome::Completed(result) => result,
        AnalysisOutcome::Unavailable(reason) => {
            return Err(ToolError::Remote(format!("AI analysis failed: {}", reason)))
        }
    };

    Ok(RepoAnalysis {
        repository_info: repo.into(),
        analysis_type: result.source_mode,
        files_analyzed: result.files_analyzed_counts,
        ai_analysis: result.text,
        analysis_metadata: AnalysisMetadata {
            model: runtime.generator_model.clone(),
            prompt_characters: request.prompt_text.chars().count(),
            prompt_truncated: request.prompt_truncated,
            files_collected: snapshot.files.len(),
            file_limit_reached: snapshot.file_limit_reached,
            counts_by_category: snapshot.counts_by_category,
            analyzed_at: chrono::Utc::now().to_rfc3339(),
        },
    })
}

pub async fn summarize_repo_analysis_for_resume(
    runtime: &Runtime,
    args: SummarizeRepoArgs,
) -> Result<ResumeBullets, ToolError> {
    let repo_name = require_non_empty("repo_name", &args.repo_name)?;
    let analysis_text = require_non_empty("analysis_text", &args.analysis_text)?;
    let Some(generator) = runtime.generator() else {
        return Err(ToolError::configuration(
            "Gemini API key not configured. Set GEMINI_API_KEY to enable resume summaries.",
        ));
    };
    let focus = FocusArea::parse(args.focus_area.as_deref());

    let summary = ResumeSummarizer::new(Some(generator))
        .summarize(repo_name, analysis_text, focus)
        .await
        .map_err(|e| ToolError::remote("Failed to summarize analysis", &e))?;

    Ok(ResumeBullets {
        formatted_summary: formatted_summary(&summary),
        repository: summary.repo_identifier,
        focus_area: summary.focus_area,
        bullet_points: summary.points,
    })
}

pub async fn create_github_repo(
    runtime: &Runtime,
    args: CreateGithubRepoArgs,
) -> Result<RepoCreated, ToolError> {
    let host = require_github(runtime)?;
    let drive = require_drive(runtime)?;
    let file_id = require_non_empty("file_id", &args.file_id)?;
    let file_name = require_non_empty("file_name", &args.file_name)?;

    let request = PublishRequest {
        file_id: file_id.to_string(),
        file_name: file_name.to_string(),
        repo_name: args.repo_name.trim().to_string(),
        description: args.repo_description,
        is_private: args.is_private.unwrap_or(false),
    };
    let receipt = PublishOrchestrator::new(host, drive, runtime.generator())
        .publish(&request)
        .await?;

    Ok(RepoCreated {
        success: true,
        message: format!(
            "Repository '{}' created and {} uploaded",
            receipt.repo_name, file_name
        ),
        repository: receipt,
    })
}
