//! In-memory doubles of the remote ports, shared by the unit tests.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::domain::{
    ContentBlock, DocumentStore, DocumentStructure, DriveFile, FileStore, ListReposQuery,
    NewRepository, OwnerInfo, RemoteEntry, RepoInfo, SourceHost, TextGenerator,
};

pub fn repo_info(owner: &str, name: &str, private: bool) -> RepoInfo {
    RepoInfo {
        name: name.to_string(),
        full_name: format!("{}/{}", owner, name),
        owner: owner.to_string(),
        description: None,
        private,
        html_url: format!("https://github.com/{}/{}", owner, name),
        clone_url: format!("https://github.com/{}/{}.git", owner, name),
        ssh_url: format!("git@github.com:{}/{}.git", owner, name),
        language: Some("Python".to_string()),
        stargazers_count: 3,
        forks_count: 1,
        default_branch: "main".to_string(),
        created_at: Some("2024-01-01T00:00:00Z".to_string()),
        updated_at: Some("2024-02-01T00:00:00Z".to_string()),
    }
}

#[derive(Default)]
struct HostState {
    owner: String,
    repos: BTreeMap<String, RepoInfo>,
    listings: HashMap<(String, String), Vec<RemoteEntry>>,
    contents: HashMap<(String, String), Vec<u8>>,
    failing_paths: HashSet<String>,
    fail_create: bool,
    fail_delete: bool,
    fail_puts: bool,
    listed: Vec<String>,
    written: Vec<(String, String)>,
    deleted: Vec<String>,
    created: Vec<String>,
    last_query: Option<ListReposQuery>,
}

/// Source host backed by maps; listing order is insertion order.
pub struct FakeSourceHost {
    state: Mutex<HostState>,
}

impl FakeSourceHost {
    pub fn new(owner: &str) -> Self {
        Self {
            state: Mutex::new(HostState {
                owner: owner.to_string(),
                ..HostState::default()
            }),
        }
    }

    pub fn with_repo(mut self, name: &str) -> Self {
        let state = self.state.get_mut().unwrap();
        let info = repo_info(&state.owner.clone(), name, false);
        state.repos.insert(info.full_name.clone(), info);
        self
    }

    /// Register a file, creating every missing ancestor directory entry.
    pub fn with_file(mut self, repo: &str, path: &str, content: &str) -> Self {
        let state = self.state.get_mut().unwrap();
        let parts: Vec<&str> = path.split('/').collect();
        let mut parent = String::new();
        for (idx, part) in parts.iter().enumerate() {
            let current = if parent.is_empty() {
                part.to_string()
            } else {
                format!("{}/{}", parent, part)
            };
            let listing = state
                .listings
                .entry((repo.to_string(), parent.clone()))
                .or_default();
            if !listing.iter().any(|e| e.path == current) {
                if idx + 1 == parts.len() {
                    listing.push(RemoteEntry::file(current.clone(), content.len() as u64));
                } else {
                    listing.push(RemoteEntry::dir(current.clone()));
                }
            }
            parent = current;
        }
        state
            .contents
            .insert((repo.to_string(), path.to_string()), content.as_bytes().to_vec());
        self
    }

    /// Listing or reading this path fails.
    pub fn failing_path(mut self, path: &str) -> Self {
        self.state
            .get_mut()
            .unwrap()
            .failing_paths
            .insert(path.to_string());
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.state.get_mut().unwrap().fail_create = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.state.get_mut().unwrap().fail_delete = true;
        self
    }

    pub fn failing_puts(mut self) -> Self {
        self.state.get_mut().unwrap().fail_puts = true;
        self
    }

    pub fn has_repo(&self, full_name: &str) -> bool {
        self.state.lock().unwrap().repos.contains_key(full_name)
    }

    pub fn listed_paths(&self) -> Vec<String> {
        self.state.lock().unwrap().listed.clone()
    }

    pub fn written_paths(&self, full_name: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .written
            .iter()
            .filter(|(repo, _)| repo == full_name)
            .map(|(_, path)| path.clone())
            .collect()
    }

    pub fn file_content(&self, full_name: &str, path: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .contents
            .get(&(full_name.to_string(), path.to_string()))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn last_query(&self) -> Option<ListReposQuery> {
        self.state.lock().unwrap().last_query.clone()
    }
}

#[async_trait]
impl SourceHost for FakeSourceHost {
    async fn authenticated_user(&self) -> Result<OwnerInfo> {
        let state = self.state.lock().unwrap();
        Ok(OwnerInfo {
            login: state.owner.clone(),
            name: Some("Test User".to_string()),
            public_repos: state.repos.len() as u64,
            html_url: format!("https://github.com/{}", state.owner),
        })
    }

    async fn get_repository(&self, full_name: &str) -> Result<Option<RepoInfo>> {
        Ok(self.state.lock().unwrap().repos.get(full_name).cloned())
    }

    async fn list_repositories(&self, query: &ListReposQuery) -> Result<Vec<RepoInfo>> {
        let mut state = self.state.lock().unwrap();
        state.last_query = Some(query.clone());
        Ok(state
            .repos
            .values()
            .take(query.per_page as usize)
            .cloned()
            .collect())
    }

    async fn create_repository(&self, repo: &NewRepository) -> Result<RepoInfo> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create {
            bail!("API error (HTTP 422): Repository creation failed");
        }
        let mut info = repo_info(&state.owner.clone(), &repo.name, repo.private);
        info.description = Some(repo.description.clone());
        state.created.push(info.full_name.clone());
        state.repos.insert(info.full_name.clone(), info.clone());
        Ok(info)
    }

    async fn delete_repository(&self, full_name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_delete {
            bail!("API error (HTTP 403): Must have admin rights to Repository");
        }
        state.repos.remove(full_name);
        state.deleted.push(full_name.to_string());
        Ok(())
    }

    async fn list_directory(&self, full_name: &str, path: &str) -> Result<Vec<RemoteEntry>> {
        let mut state = self.state.lock().unwrap();
        state.listed.push(path.to_string());
        if state.failing_paths.contains(path) {
            bail!("API error (HTTP 500): listing {} failed", path);
        }
        match state
            .listings
            .get(&(full_name.to_string(), path.to_string()))
        {
            Some(entries) => Ok(entries.clone()),
            None if path.is_empty() && state.repos.contains_key(full_name) => Ok(Vec::new()),
            None => Err(anyhow!("API error (HTTP 404): Not Found")),
        }
    }

    async fn read_file(&self, full_name: &str, path: &str) -> Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        if state.failing_paths.contains(path) {
            bail!("API error (HTTP 500): reading {} failed", path);
        }
        state
            .contents
            .get(&(full_name.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| anyhow!("API error (HTTP 404): Not Found"))
    }

    async fn put_file(
        &self,
        full_name: &str,
        path: &str,
        content: &[u8],
        _message: &str,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_puts {
            bail!("API error (HTTP 409): conflict writing {}", path);
        }
        if !state.repos.contains_key(full_name) {
            bail!("API error (HTTP 404): Not Found");
        }
        state
            .written
            .push((full_name.to_string(), path.to_string()));
        state
            .contents
            .insert((full_name.to_string(), path.to_string()), content.to_vec());
        Ok(())
    }
}

#[derive(Default)]
struct StoreState {
    files: Vec<DriveFile>,
    contents: HashMap<String, Vec<u8>>,
    failing_downloads: HashSet<String>,
    queries: Vec<String>,
}

/// File store holding files in insertion order.
#[derive(Default)]
pub struct FakeFileStore {
    state: Mutex<StoreState>,
}

impl FakeFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, id: &str, name: &str, mime_type: &str, content: &[u8]) -> Self {
        let state = self.state.get_mut().unwrap();
        state.files.push(DriveFile {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: Some(mime_type.to_string()),
            web_view_link: Some(format!("https://drive.google.com/file/d/{}/view", id)),
            modified_time: Some("2024-03-01T10:00:00.000Z".to_string()),
            owners: vec!["Test User".to_string()],
        });
        state.contents.insert(id.to_string(), content.to_vec());
        self
    }

    pub fn with_notebook(self, id: &str, name: &str, notebook_json: &str) -> Self {
        self.with_file(
            id,
            name,
            "application/vnd.google.colaboratory",
            notebook_json.as_bytes(),
        )
    }

    pub fn failing_download(mut self, id: &str) -> Self {
        self.state
            .get_mut()
            .unwrap()
            .failing_downloads
            .insert(id.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.state.lock().unwrap().queries.clone()
    }
}

#[async_trait]
impl FileStore for FakeFileStore {
    async fn list_files(&self, query: &str, page_size: u32) -> Result<Vec<DriveFile>> {
        let mut state = self.state.lock().unwrap();
        state.queries.push(query.to_string());
        Ok(state
            .files
            .iter()
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn get_file(&self, file_id: &str) -> Result<DriveFile> {
        self.state
            .lock()
            .unwrap()
            .files
            .iter()
            .find(|f| f.id == file_id)
            .cloned()
            .ok_or_else(|| anyhow!("API error (HTTP 404): File not found: {}", file_id))
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        if state.failing_downloads.contains(file_id) {
            bail!("API error (HTTP 500): download of {} failed", file_id);
        }
        state
            .contents
            .get(file_id)
            .cloned()
            .ok_or_else(|| anyhow!("API error (HTTP 404): File not found: {}", file_id))
    }
}

/// Document store where each document body is one paragraph of plain text.
///
/// Indices follow the document model: a section break occupies `[0, 1)` and
/// the body text, which always ends with a newline, starts at index 1.
#[derive(Default)]
pub struct FakeDocumentStore {
    docs: Mutex<HashMap<String, (String, String)>>,
    inserts: Mutex<Vec<(i64, String)>>,
}

impl FakeDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, id: &str, title: &str, body: &str) -> Self {
        let mut text = body.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        self.docs
            .lock()
            .unwrap()
            .insert(id.to_string(), (title.to_string(), text));
        self
    }

    pub fn body(&self, id: &str) -> Option<String> {
        self.docs.lock().unwrap().get(id).map(|(_, b)| b.clone())
    }

    pub fn inserts(&self) -> Vec<(i64, String)> {
        self.inserts.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for FakeDocumentStore {
    async fn get_document(&self, document_id: &str) -> Result<DocumentStructure> {
        let docs = self.docs.lock().unwrap();
        let (title, body) = docs
            .get(document_id)
            .ok_or_else(|| anyhow!("API error (HTTP 404): Requested entity was not found."))?;
        Ok(DocumentStructure {
            document_id: document_id.to_string(),
            title: title.clone(),
            content: vec![
                ContentBlock {
                    start_index: 0,
                    end_index: 1,
                },
                ContentBlock {
                    start_index: 1,
                    end_index: 1 + body.chars().count() as i64,
                },
            ],
        })
    }

    async fn insert_text(&self, document_id: &str, index: i64, text: &str) -> Result<()> {
        let mut docs = self.docs.lock().unwrap();
        let (_, body) = docs
            .get_mut(document_id)
            .ok_or_else(|| anyhow!("API error (HTTP 404): Requested entity was not found."))?;
        let offset = (index - 1).max(0) as usize;
        let byte_offset = body
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(body.len());
        body.insert_str(byte_offset, text);
        self.inserts
            .lock()
            .unwrap()
            .push((index, text.to_string()));
        Ok(())
    }
}

/// Generator replaying canned responses and recording prompts.
#[derive(Default)]
pub struct FakeGenerator {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        let generator = Self::default();
        generator
            .responses
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        generator
    }

    pub fn failing(message: &str) -> Self {
        let generator = Self::default();
        generator
            .responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        generator
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no canned response left")),
        }
    }
}

/// A minimal notebook document with the given `(cell_type, source)` cells.
pub fn notebook_json(cells: &[(&str, &str)]) -> String {
    let cells: Vec<serde_json::Value> = cells
        .iter()
        .map(|(cell_type, source)| {
            serde_json::json!({
                "cell_type": cell_type,
                "metadata": {},
                "source": source,
            })
        })
        .collect();
    serde_json::json!({
        "cells": cells,
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 0,
    })
    .to_string()
}
