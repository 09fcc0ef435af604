//! Wire types for the remote APIs, plus the typed HTTP error.

use serde::{Deserialize, Serialize};

use crate::domain::{ContentBlock, DocumentStructure, DriveFile, RepoInfo};

// ============================================================================
// API Error Type
// ============================================================================

/// Coarse classification of a non-success HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    InvalidArgument,
    Unauthenticated,
    PermissionDenied,
    NotFound,
    Conflict,
    ResourceExhausted,
    Unavailable,
    Unknown,
}

impl ApiStatus {
    pub fn from_http_status(http_status: u16) -> Self {
        match http_status {
            400 | 422 => ApiStatus::InvalidArgument,
            401 => ApiStatus::Unauthenticated,
            403 => ApiStatus::PermissionDenied,
            404 => ApiStatus::NotFound,
            409 => ApiStatus::Conflict,
            429 => ApiStatus::ResourceExhausted,
            500..=599 => ApiStatus::Unavailable,
            _ => ApiStatus::Unknown,
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            ApiStatus::InvalidArgument => "Invalid request",
            ApiStatus::Unauthenticated => "Authentication failed",
            ApiStatus::PermissionDenied => "Permission denied",
            ApiStatus::NotFound => "Not found",
            ApiStatus::Conflict => "Conflict",
            ApiStatus::ResourceExhausted => "Rate limit exceeded",
            ApiStatus::Unavailable => "Service temporarily unavailable",
            ApiStatus::Unknown => "Unknown error occurred",
        }
    }
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error_message())
    }
}

/// Error body shapes: GitHub sends `{"message": ..}`, Google sends `{"error": {"message": ..}}`.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<GoogleErrorDetail>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GoogleErrorDetail {
    Detailed { message: String },
    Code(String),
}

/// A non-success HTTP response from a remote API.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: ApiStatus,
    pub http_status: u16,
    pub message: String,
}

impl ApiError {
    /// Build from the HTTP status and raw body, extracting the service's own message when present.
    pub fn from_http_response(http_status: u16, body: &str) -> Self {
        let status = ApiStatus::from_http_status(http_status);
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| {
                parsed.message.or(match parsed.error {
                    Some(GoogleErrorDetail::Detailed { message }) => Some(message),
                    Some(GoogleErrorDetail::Code(code)) => Some(code),
                    None => None,
                })
            })
            .unwrap_or_else(|| body.trim().to_string());

        let message = if detail.is_empty() {
            format!("API error (HTTP {}): {}", http_status, status.error_message())
        } else {
            format!("API error (HTTP {}): {}", http_status, detail)
        };

        Self {
            status,
            http_status,
            message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == ApiStatus::NotFound
    }

    /// Hint shown in logs for credential problems.
    pub fn user_hint(&self) -> Option<&'static str> {
        match self.status {
            ApiStatus::Unauthenticated => {
                Some("Check that the configured token is valid and has not expired.")
            }
            ApiStatus::PermissionDenied => {
                Some("The token is missing a required scope or permission.")
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// GitHub REST v3
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    pub owner: GitHubOwner,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    pub html_url: String,
    #[serde(default)]
    pub clone_url: String,
    #[serde(default)]
    pub ssh_url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<GitHubRepo> for RepoInfo {
    fn from(repo: GitHubRepo) -> Self {
        RepoInfo {
            name: repo.name,
            full_name: repo.full_name,
            owner: repo.owner.login,
            description: repo.description,
            private: repo.private,
            html_url: repo.html_url,
            clone_url: repo.clone_url,
            ssh_url: repo.ssh_url,
            language: repo.language,
            stargazers_count: repo.stargazers_count,
            forks_count: repo.forks_count,
            default_branch: repo.default_branch.unwrap_or_else(|| "main".to_string()),
            created_at: repo.created_at,
            updated_at: repo.updated_at,
        }
    }
}

/// One item of a `GET /repos/{owner}/{repo}/contents/{path}` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Serialize)]
pub struct CreateRepoBody<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub private: bool,
    pub auto_init: bool,
}

#[derive(Debug, Serialize)]
pub struct PutFileBody<'a> {
    pub message: &'a str,
    /// Base64-encoded file content.
    pub content: String,
}

// ============================================================================
// Google Drive v3
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveUser {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileResource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub web_view_link: Option<String>,
    #[serde(default)]
    pub modified_time: Option<String>,
    #[serde(default)]
    pub owners: Vec<DriveUser>,
}

impl From<DriveFileResource> for DriveFile {
    fn from(file: DriveFileResource) -> Self {
        DriveFile {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            web_view_link: file.web_view_link,
            modified_time: file.modified_time,
            owners: file
                .owners
                .into_iter()
                .filter_map(|o| o.display_name.or(o.email_address))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriveFileList {
    #[serde(default)]
    pub files: Vec<DriveFileResource>,
}

// ============================================================================
// Google Docs v1
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsStructuralElement {
    #[serde(default)]
    pub start_index: Option<i64>,
    pub end_index: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocsBody {
    #[serde(default)]
    pub content: Vec<DocsStructuralElement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsDocument {
    pub document_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: DocsBody,
}

impl From<DocsDocument> for DocumentStructure {
    fn from(doc: DocsDocument) -> Self {
        DocumentStructure {
            document_id: doc.document_id,
            title: doc.title,
            content: doc
                .body
                .content
                .into_iter()
                .map(|el| ContentBlock {
                    start_index: el.start_index.unwrap_or(0),
                    end_index: el.end_index,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchUpdateRequest<'a> {
    pub requests: Vec<DocsRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsRequest<'a> {
    pub insert_text: InsertText<'a>,
}

#[derive(Debug, Serialize)]
pub struct InsertText<'a> {
    pub location: Location,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Location {
    pub index: i64,
}

// ============================================================================
// Gemini generateContent
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// Google OAuth token refresh
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}
