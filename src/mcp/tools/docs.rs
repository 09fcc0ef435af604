//! Google Docs tools.

use serde::Serialize;
use tracing::info;

use crate::documents::{DocumentAppender, DocumentInfo, DEFAULT_SECTION_TITLE};
use crate::error::ToolError;
use crate::mcp::types::{AddToGoogleDocArgs, ListGoogleDocsArgs};
use crate::runtime::Runtime;

use super::common::{quote_query_value, require_docs, require_drive, require_non_empty};

pub const DOCS_MIME_TYPE: &str = "application/vnd.google-apps.document";
const DOCS_PAGE_SIZE: u32 = 50;

#[derive(Debug, Serialize)]
pub struct DocumentEntry {
    pub id: String,
    pub name: String,
    pub link: String,
    pub modified: Option<String>,
    pub owners: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentListing {
    pub search_term: Option<String>,
    pub documents: Vec<DocumentEntry>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DocumentUpdated {
    pub success: bool,
    pub message: String,
    pub document_info: DocumentInfo,
}

pub fn docs_link(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{}/edit", document_id)
}

pub fn docs_query(search_term: Option<&str>) -> String {
    let mut query = format!("mimeType='{}' and trashed=false", DOCS_MIME_TYPE);
    if let Some(term) = search_term {
        query.push_str(&format!(" and name contains {}", quote_query_value(term)));
    }
    query
}

pub async fn list_google_docs(
    runtime: &Runtime,
    args: ListGoogleDocsArgs,
) -> Result<DocumentListing, ToolError> {
    let drive = require_drive(runtime)?;
    let search_term = args
        .search_term
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let files = drive
        .list_files(&docs_query(search_term.as_deref()), DOCS_PAGE_SIZE)
        .await
        .map_err(|e| ToolError::remote("Failed to list Google Docs", &e))?;

    let documents: Vec<DocumentEntry> = files
        .into_iter()
        .map(|f| DocumentEntry {
            link: f.web_view_link.unwrap_or_else(|| docs_link(&f.id)),
            id: f.id,
            name: f.name,
            modified: f.modified_time,
            owners: f.owners,
        })
        .collect();
    info!("📄 Found {} documents", documents.len());

    Ok(DocumentListing {
        search_term,
        count: documents.len(),
        documents,
    })
}

pub async fn add_to_google_doc(
    runtime: &Runtime,
    args: AddToGoogleDocArgs,
) -> Result<DocumentUpdated, ToolError> {
    let docs = require_docs(runtime)?;
    let doc_id = require_non_empty("doc_id", &args.doc_id)?;
    let content = require_non_empty("content", &args.content)?;
    let title = args
        .section_title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_SECTION_TITLE);

    let document_info = DocumentAppender::new(docs)
        .append(doc_id, content, title)
        .await?;

    Ok(DocumentUpdated {
        success: true,
        message: format!("Added '{}' to '{}'", title, document_info.title),
        document_info,
    })
}
