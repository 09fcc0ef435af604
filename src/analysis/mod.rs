//! Generative analysis pipeline.
//!
//! Prompt composition for repository analysis, README synthesis for
//! notebooks, and resume bullet extraction. Every request to the generative
//! backend goes through [`dispatch`], which turns a missing backend, a failed
//! call or an empty answer into [`Generation::Unavailable`] instead of an
//! error, so that callers with a non-AI path can fall back to it.

mod composer;
mod notebook;
mod readme;
mod resume;

use tracing::{debug, warn};

use crate::domain::TextGenerator;

pub use composer::{
    is_code_file, AnalysisComposer, AnalysisOutcome, PROMPT_BUDGET_CHARS,
    PROMPT_TRUNCATION_NOTICE,
};
pub use notebook::{Notebook, NotebookCell};
pub use readme::{
    build_readme_prompt, detect_libraries, fallback_readme, GeneratedReadme, ReadmeGenerator,
};
pub use resume::{extract_points, formatted_summary, FocusArea, ResumeSummarizer};

/// Outcome of one generative request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Text(String),
    Unavailable(String),
}

/// Send `prompt` to the backend, if one is configured.
pub async fn dispatch(generator: Option<&dyn TextGenerator>, prompt: &str) -> Generation {
    let Some(generator) = generator else {
        return Generation::Unavailable("generative backend is not configured".to_string());
    };

    debug!("Dispatching prompt of {} characters", prompt.chars().count());
    match generator.generate(prompt).await {
        Ok(text) if !text.trim().is_empty() => Generation::Text(text),
        Ok(_) => {
            warn!("Generative backend returned an empty response");
            Generation::Unavailable("generative backend returned an empty response".to_string())
        }
        Err(e) => {
            warn!("Generative backend request failed: {:#}", e);
            Generation::Unavailable(format!("generative backend request failed: {:#}", e))
        }
    }
}

/// The first `max_chars` characters of `text`.
pub(crate) fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
