//! Repository crawling for analysis and file reads.
//!
//! This module walks a remote repository tree, filters files by extension,
//! and samples their content under a per-file character budget. The result is
//! a [`RepositorySnapshot`](crate::domain::RepositorySnapshot) that lives for
//! a single tool call.

mod crawler;
mod sampler;
#[cfg(test)]
mod tests;

// Re-exports
pub use crawler::{normalize_extensions, CrawlOptions, TreeCrawler, DEFAULT_MAX_DEPTH};
pub use sampler::{
    categorize, extension_of, is_readme, truncation_marker, ContentSampler, SampledContent,
    CONTENT_BUDGET_CHARS, OTHER_CATEGORY, README_CATEGORY,
};
