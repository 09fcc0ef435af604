//! Prompt composition for repository analysis.

use std::fmt::Write as _;

use tracing::{debug, info};

use crate::domain::{
    AnalysisMode, AnalysisRequest, AnalysisResult, FileCounts, FileNode, RepositorySnapshot,
    TextGenerator,
};
use crate::repository::is_readme;

use super::{dispatch, take_chars, Generation};

/// Hard ceiling on the assembled prompt.
pub const PROMPT_BUDGET_CHARS: usize = 25_000;

/// Appended when the prompt had to be cut to [`PROMPT_BUDGET_CHARS`].
pub const PROMPT_TRUNCATION_NOTICE: &str = "\n\n[Prompt truncated to fit the analysis budget]";

const CODE_ONLY_FILE_CHARS: usize = 2_000;
const SUMMARY_README_CHARS: usize = 1_500;
const SUMMARY_CODE_CHARS: usize = 1_000;
const SUMMARY_CODE_FILES: usize = 5;
const SUMMARY_OTHER_CHARS: usize = 500;
const SUMMARY_OTHER_FILES: usize = 3;

const CODE_EXTENSIONS: &[&str] = &[
    ".py", ".ipynb", ".js", ".ts", ".jsx", ".tsx", ".java", ".c", ".cpp", ".cc", ".h", ".hpp",
    ".cs", ".go", ".rs", ".rb", ".php", ".swift", ".kt", ".scala", ".r", ".m", ".sh", ".sql",
];

/// Source files in a programming language; readme files never count as code.
pub fn is_code_file(node: &FileNode) -> bool {
    !is_readme(&node.name) && CODE_EXTENSIONS.contains(&node.extension.as_str())
}

/// Result of [`AnalysisComposer::analyze`].
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Completed(AnalysisResult),
    Unavailable(String),
}

/// Builds size-bounded prompts from a snapshot and sends them to the backend.
pub struct AnalysisComposer<'a> {
    generator: Option<&'a dyn TextGenerator>,
    prompt_budget_chars: usize,
}

impl<'a> AnalysisComposer<'a> {
    pub fn new(generator: Option<&'a dyn TextGenerator>) -> Self {
        Self {
            generator,
            prompt_budget_chars: PROMPT_BUDGET_CHARS,
        }
    }

    /// Assemble the prompt for `mode`.
    ///
    /// `max_files_to_analyze` caps the number of code files in `code_only` mode.
    pub fn compose(
        &self,
        snapshot: &RepositorySnapshot,
        mode: AnalysisMode,
        max_files_to_analyze: usize,
    ) -> AnalysisRequest {
        let mut counts = FileCounts::default();
        let mut body = String::new();

        match mode {
            AnalysisMode::ReadmeOnly => {
                for node in snapshot.files.iter().filter(|f| is_readme(&f.name)) {
                    push_file(&mut body, "README", node, None);
                    counts.readme_files += 1;
                }
            }
            AnalysisMode::CodeOnly => {
                for node in snapshot
                    .files
                    .iter()
                    .filter(|f| is_code_file(f))
                    .take(max_files_to_analyze)
                {
                    push_file(&mut body, "CODE", node, Some(CODE_ONLY_FILE_CHARS));
                    counts.code_files += 1;
                }
            }
            AnalysisMode::Structure => {
                body.push_str("=== FILE STRUCTURE ===\n");
                for node in &snapshot.files {
                    let _ = writeln!(
                        body,
                        "{} ({}) - {} bytes",
                        node.path, node.category, node.size_bytes
                    );
                }
                counts.other_files = snapshot.files.len();
            }
            AnalysisMode::Comprehensive => {
                for node in snapshot.files.iter().filter(|f| is_readme(&f.name)) {
                    push_file(&mut body, "README", node, Some(SUMMARY_README_CHARS));
                    counts.readme_files += 1;
                }
                for node in snapshot
                    .files
                    .iter()
                    .filter(|f| is_code_file(f))
                    .take(SUMMARY_CODE_FILES)
                {
                    push_file(&mut body, "CODE", node, Some(SUMMARY_CODE_CHARS));
                    counts.code_files += 1;
                }
                for node in snapshot
                    .files
                    .iter()
                    .filter(|f| !is_readme(&f.name) && !is_code_file(f))
                    .take(SUMMARY_OTHER_FILES)
                {
                    push_file(&mut body, "FILE", node, Some(SUMMARY_OTHER_CHARS));
                    counts.other_files += 1;
                }
            }
        }
        counts.total_files = counts.readme_files + counts.code_files + counts.other_files;

        let mut prompt = prompt_header(snapshot, mode);
        prompt.push_str(&body);

        let prompt_truncated = prompt.chars().count() > self.prompt_budget_chars;
        if prompt_truncated {
            let mut cut = take_chars(&prompt, self.prompt_budget_chars).to_string();
            cut.push_str(PROMPT_TRUNCATION_NOTICE);
            prompt = cut;
        }

        debug!(
            "Composed {} prompt: {} characters, {} files, truncated: {}",
            mode,
            prompt.chars().count(),
            counts.total_files,
            prompt_truncated
        );

        AnalysisRequest {
            mode,
            content_budget_chars: self.prompt_budget_chars,
            prompt_text: prompt,
            prompt_truncated,
            files_included: counts,
        }
    }

    /// Send the prompt; the backend text is returned verbatim.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        info!("🤖 Requesting {} analysis", request.mode);
        match dispatch(self.generator, &request.prompt_text).await {
            Generation::Text(text) => AnalysisOutcome::Completed(AnalysisResult {
                text,
                source_mode: request.mode,
                files_analyzed_counts: request.files_included,
            }),
            Generation::Unavailable(reason) => AnalysisOutcome::Unavailable(reason),
        }
    }
}

fn prompt_header(snapshot: &RepositorySnapshot, mode: AnalysisMode) -> String {
    let mut header = format!(
        "You are an experienced software engineer reviewing the GitHub repository \"{}\".\n",
        snapshot.repo_identifier
    );
    header.push_str(mode_instructions(mode));
    header.push_str("\n\nRepository statistics:\n");
    let _ = writeln!(header, "- Files collected: {}", snapshot.files.len());
    let by_type: Vec<String> = snapshot
        .counts_by_category
        .iter()
        .map(|(category, count)| format!("{}: {}", category, count))
        .collect();
    let _ = writeln!(header, "- Files by type: {}", by_type.join(", "));
    header.push('\n');
    header
}

fn mode_instructions(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Comprehensive => {
            "Provide a comprehensive analysis covering:\n\
             1. The purpose and main functionality of the project\n\
             2. Architecture and code organization\n\
             3. Technologies, frameworks and libraries used\n\
             4. Code quality and notable practices\n\
             5. Concrete suggestions for improvement"
        }
        AnalysisMode::ReadmeOnly => {
            "Based on the README documentation below, summarize the project: its purpose, \
             key features, setup requirements and usage."
        }
        AnalysisMode::CodeOnly => {
            "Analyze the source code below: the main components, programming patterns, \
             code quality, potential issues and possible improvements."
        }
        AnalysisMode::Structure => {
            "Analyze the repository layout below: how the project is organized, which \
             conventions it follows, and what the structure suggests about its purpose."
        }
    }
}

fn push_file(body: &mut String, label: &str, node: &FileNode, max_chars: Option<usize>) {
    let content = node.content.as_deref().unwrap_or_default();
    let content = match max_chars {
        Some(limit) => take_chars(content, limit),
        None => content,
    };
    let _ = write!(body, "=== {}: {} ===\n{}\n\n", label, node.path, content);
}
