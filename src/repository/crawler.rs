//! Bounded depth-first traversal of a remote repository tree.
//!
//! The walk is pre-order and keeps the listing order of the remote service.
//! Directories are expanded through an explicit stack of listing iterators,
//! so adversarially deep trees never grow the call stack.

use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::domain::{EntryKind, FileNode, RemoteEntry, RepositorySnapshot, SourceHost};

use super::sampler::{categorize, extension_of, is_readme, ContentSampler};

/// Default number of directory levels below the root that are visited.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Extensions crawled when the caller does not name any.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".py", ".ipynb", ".js", ".ts", ".jsx", ".tsx", ".java", ".c", ".cpp", ".h", ".go", ".rs",
    ".rb", ".php", ".md", ".txt", ".json", ".yml", ".yaml", ".toml", ".html", ".css", ".sh",
];

/// Parameters of one crawl.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub root_path: String,
    pub allowed_extensions: HashSet<String>,
    pub max_files: usize,
    pub max_depth: usize,
}

impl CrawlOptions {
    pub fn new(allowed_extensions: HashSet<String>, max_files: usize) -> Self {
        Self {
            root_path: String::new(),
            allowed_extensions,
            max_files,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Readme files are always accepted, whatever their extension.
    pub fn accepts(&self, name: &str) -> bool {
        is_readme(name) || self.allowed_extensions.contains(&extension_of(name))
    }
}

/// Lower-case the given extensions and make sure each carries a leading dot.
///
/// Falls back to [`DEFAULT_EXTENSIONS`] when nothing usable is given.
pub fn normalize_extensions(extensions: Option<&[String]>) -> HashSet<String> {
    let normalized: HashSet<String> = extensions
        .unwrap_or_default()
        .iter()
        .map(|ext| ext.trim().to_lowercase())
        .filter(|ext| !ext.is_empty() && ext != ".")
        .map(|ext| {
            if ext.starts_with('.') {
                ext
            } else {
                format!(".{}", ext)
            }
        })
        .collect();

    if normalized.is_empty() {
        DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    } else {
        normalized
    }
}

struct Frame {
    entries: std::vec::IntoIter<RemoteEntry>,
    depth: usize,
}

/// Walks a repository and samples every accepted file.
pub struct TreeCrawler<'a> {
    host: &'a dyn SourceHost,
    sampler: ContentSampler,
}

impl<'a> TreeCrawler<'a> {
    pub fn new(host: &'a dyn SourceHost) -> Self {
        Self {
            host,
            sampler: ContentSampler::new(),
        }
    }

    /// Crawl `repo` from `options.root_path`.
    ///
    /// Only a failure to list the root is an error; failing subtrees and files
    /// are skipped.
    pub async fn crawl(&self, repo: &str, options: &CrawlOptions) -> Result<RepositorySnapshot> {
        info!(
            "🔍 Crawling {} (max_files={}, max_depth={}, content_budget={} chars)",
            repo,
            options.max_files,
            options.max_depth,
            self.sampler.budget_chars()
        );

        let root = self
            .host
            .list_directory(repo, &options.root_path)
            .await
            .with_context(|| format!("Failed to list contents of {}", repo))?;

        let mut files: Vec<FileNode> = Vec::new();
        let mut counts_by_category: BTreeMap<String, usize> = BTreeMap::new();
        let mut traversal_depth_reached = 0;
        let mut file_limit_reached = false;

        if options.max_files == 0 {
            return Ok(RepositorySnapshot {
                repo_identifier: repo.to_string(),
                files,
                counts_by_category,
                traversal_depth_reached,
                file_limit_reached: !root.is_empty(),
            });
        }

        let mut stack = vec![Frame {
            entries: root.into_iter(),
            depth: 0,
        }];

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let depth = frame.depth;
            let Some(entry) = frame.entries.next() else {
                stack.pop();
                continue;
            };

            match entry.kind {
                EntryKind::Dir => {
                    let child_depth = depth + 1;
                    if child_depth > options.max_depth {
                        debug!("Depth limit reached, not entering {}", entry.path);
                        continue;
                    }
                    match self.host.list_directory(repo, &entry.path).await {
                        Ok(children) => {
                            traversal_depth_reached = traversal_depth_reached.max(child_depth);
                            stack.push(Frame {
                                entries: children.into_iter(),
                                depth: child_depth,
                            });
                        }
                        Err(e) => {
                            warn!("Skipping directory {}: {:#}", entry.path, e);
                        }
                    }
                }
                EntryKind::File => {
                    if !options.accepts(&entry.name) {
                        continue;
                    }
                    let sampled = match self.sampler.sample(self.host, repo, &entry).await {
                        Ok(s) => s,
                        Err(e) => {
                            warn!("Skipping file {}: {:#}", entry.path, e);
                            continue;
                        }
                    };

                    let extension = extension_of(&entry.name);
                    let category = categorize(&entry.name, &extension);
                    *counts_by_category.entry(category.clone()).or_insert(0) += 1;
                    files.push(FileNode {
                        path: entry.path,
                        name: entry.name,
                        kind: EntryKind::File,
                        extension,
                        size_bytes: entry.size_bytes,
                        depth,
                        category,
                        content: Some(sampled.content),
                        truncated: sampled.truncated,
                    });

                    if files.len() >= options.max_files {
                        file_limit_reached = stack.iter().any(|f| f.entries.len() > 0);
                        break;
                    }
                }
            }
        }

        info!(
            "📊 Crawled {}: {} files, depth {}, limit reached: {}",
            repo,
            files.len(),
            traversal_depth_reached,
            file_limit_reached
        );

        Ok(RepositorySnapshot {
            repo_identifier: repo.to_string(),
            files,
            counts_by_category,
            traversal_depth_reached,
            file_limit_reached,
        })
    }
}
