//! README synthesis for notebooks.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use tracing::{info, warn};

use crate::domain::TextGenerator;

use super::composer::{PROMPT_BUDGET_CHARS, PROMPT_TRUNCATION_NOTICE};
use super::{dispatch, take_chars, Generation, Notebook};

const DESCRIPTION_CHARS: usize = 1_000;

/// README text plus whether the generative backend produced it.
#[derive(Debug, Clone)]
pub struct GeneratedReadme {
    pub content: String,
    pub ai_generated: bool,
}

pub struct ReadmeGenerator<'a> {
    generator: Option<&'a dyn TextGenerator>,
}

impl<'a> ReadmeGenerator<'a> {
    pub fn new(generator: Option<&'a dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Ask the backend for a README, falling back to the template when it is unavailable.
    pub async fn generate(&self, notebook: &Notebook) -> GeneratedReadme {
        let prompt = build_readme_prompt(notebook);
        match dispatch(self.generator, &prompt).await {
            Generation::Text(content) => {
                info!("📝 Generated README for {} with the generative backend", notebook.name);
                GeneratedReadme {
                    content,
                    ai_generated: true,
                }
            }
            Generation::Unavailable(reason) => {
                warn!(
                    "Using template README for {}: {}",
                    notebook.name, reason
                );
                GeneratedReadme {
                    content: fallback_readme(notebook),
                    ai_generated: false,
                }
            }
        }
    }
}

/// Prompt asking for a professional README, bounded like analysis prompts.
pub fn build_readme_prompt(notebook: &Notebook) -> String {
    let mut prompt = format!(
        "Write a professional README.md for the Jupyter notebook \"{}\".\n\
         Include these sections: a title, Overview, Features, Requirements \
         (with the libraries the notebook uses), Usage, and Notebook Structure.\n\
         Answer with the markdown only.\n\nNotebook cells:\n\n",
        notebook.name
    );
    for (idx, cell) in notebook.cells.iter().enumerate() {
        let _ = write!(
            prompt,
            "--- Cell {} ({}) ---\n{}\n\n",
            idx + 1,
            cell.cell_type,
            cell.source
        );
    }

    if prompt.chars().count() > PROMPT_BUDGET_CHARS {
        let mut cut = take_chars(&prompt, PROMPT_BUDGET_CHARS).to_string();
        cut.push_str(PROMPT_TRUNCATION_NOTICE);
        return cut;
    }
    prompt
}

/// Top-level modules imported by the notebook's code cells, sorted.
///
/// Line-based heuristic: only `import x` and `from x import y` at the start of
/// a line are recognized, and relative imports are ignored.
pub fn detect_libraries(notebook: &Notebook) -> Vec<String> {
    let mut libraries = BTreeSet::new();
    for cell in notebook.code_cells() {
        for line in cell.source.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("import ") {
                for module in rest.split(',') {
                    let module = module.split_whitespace().next().unwrap_or_default();
                    insert_top_level(&mut libraries, module);
                }
            } else if let Some(rest) = line.strip_prefix("from ") {
                let mut words = rest.split_whitespace();
                if let (Some(module), Some("import")) = (words.next(), words.next()) {
                    insert_top_level(&mut libraries, module);
                }
            }
        }
    }
    libraries.into_iter().collect()
}

fn insert_top_level(libraries: &mut BTreeSet<String>, module: &str) {
    if module.starts_with('.') {
        return;
    }
    let top = module.split('.').next().unwrap_or_default();
    if !top.is_empty() && top.chars().all(|c| c.is_alphanumeric() || c == '_') {
        libraries.insert(top.to_string());
    }
}

/// Template README used when no generative backend is available.
pub fn fallback_readme(notebook: &Notebook) -> String {
    let title = notebook
        .name
        .strip_suffix(".ipynb")
        .unwrap_or(&notebook.name);
    let code_cells = notebook.code_cells().count();
    let markdown_cells = notebook.markdown_cells().count();

    let description: Vec<&str> = notebook
        .markdown_cells()
        .map(|c| c.source.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let description = description.join("\n\n");
    let description = if description.is_empty() {
        "No description is available for this notebook.".to_string()
    } else {
        take_chars(&description, DESCRIPTION_CHARS).to_string()
    };

    let libraries = detect_libraries(notebook);

    let mut readme = format!("# {}\n\n", title);
    let _ = write!(
        readme,
        "## Overview\n\nThis notebook contains {} cells.\n\n",
        notebook.cell_count()
    );
    let _ = write!(readme, "## Description\n\n{}\n\n", description);
    readme.push_str("## Libraries Used\n\n");
    if libraries.is_empty() {
        readme.push_str("No external libraries detected.\n");
    } else {
        for library in &libraries {
            let _ = writeln!(readme, "- {}", library);
        }
    }
    readme.push_str(
        "\n## How to Use\n\n\
         1. Open the notebook in Google Colab or Jupyter\n\
         2. Install the libraries listed above\n\
         3. Run the cells in order from top to bottom\n\n",
    );
    let _ = write!(
        readme,
        "## Notebook Structure\n\n- Code cells: {}\n- Markdown cells: {}\n",
        code_cells, markdown_cells
    );
    readme
}
