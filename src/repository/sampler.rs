//! Per-file content retrieval under a fixed character budget.

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::{RemoteEntry, SourceHost};

/// Maximum characters kept from a single file.
pub const CONTENT_BUDGET_CHARS: usize = 10_000;

/// Category used for readme-named files.
pub const README_CATEGORY: &str = "README";

/// Category used for files without an extension.
pub const OTHER_CATEGORY: &str = "OTHER";

/// Marker appended to truncated content, carrying the original character count.
pub fn truncation_marker(total_chars: usize) -> String {
    format!(
        "\n\n... [Content truncated - file is {} characters total]",
        total_chars
    )
}

/// Content of one file after budgeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledContent {
    pub content: String,
    pub truncated: bool,
}

/// Fetches file contents and applies the per-file budget.
#[derive(Debug, Clone, Copy)]
pub struct ContentSampler {
    budget_chars: usize,
}

impl Default for ContentSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSampler {
    pub fn new() -> Self {
        Self::with_budget(CONTENT_BUDGET_CHARS)
    }

    pub fn with_budget(budget_chars: usize) -> Self {
        Self { budget_chars }
    }

    pub fn budget_chars(&self) -> usize {
        self.budget_chars
    }

    /// Fetch one file and budget its decoded text.
    pub async fn sample(
        &self,
        host: &dyn SourceHost,
        repo: &str,
        entry: &RemoteEntry,
    ) -> Result<SampledContent> {
        let bytes = host
            .read_file(repo, &entry.path)
            .await
            .with_context(|| format!("Failed to read {}", entry.path))?;
        Ok(self.sample_bytes(&bytes))
    }

    /// Decode lossily and truncate to the budget.
    pub fn sample_bytes(&self, bytes: &[u8]) -> SampledContent {
        let decoded = String::from_utf8_lossy(bytes);
        let total_chars = decoded.chars().count();

        if total_chars <= self.budget_chars {
            return SampledContent {
                content: decoded.into_owned(),
                truncated: false,
            };
        }

        debug!(
            "Truncating content from {} to {} characters",
            total_chars, self.budget_chars
        );
        let mut content: String = decoded.chars().take(self.budget_chars).collect();
        content.push_str(&truncation_marker(total_chars));
        SampledContent {
            content,
            truncated: true,
        }
    }
}

/// Lower-cased extension with its leading dot; empty for dotfiles and bare names.
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => name[idx..].to_lowercase(),
        _ => String::new(),
    }
}

pub fn is_readme(name: &str) -> bool {
    name.to_lowercase().starts_with("readme")
}

/// `README` for readme files, otherwise the upper-cased extension without its dot.
pub fn categorize(name: &str, extension: &str) -> String {
    if is_readme(name) {
        return README_CATEGORY.to_string();
    }
    match extension.trim_start_matches('.') {
        "" => OTHER_CATEGORY.to_string(),
        ext => ext.to_uppercase(),
    }
}
