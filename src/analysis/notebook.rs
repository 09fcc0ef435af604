//! Notebook (`.ipynb`) parsing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct RawNotebook {
    #[serde(default)]
    cells: Vec<RawCell>,
}

#[derive(Deserialize)]
struct RawCell {
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

/// Cell sources are stored either as one string or as a list of lines.
#[derive(Deserialize)]
#[serde(untagged)]
enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Text(String::new())
    }
}

impl CellSource {
    fn into_text(self) -> String {
        match self {
            CellSource::Text(text) => text,
            CellSource::Lines(lines) => lines.concat(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotebookCell {
    pub cell_type: String,
    pub source: String,
}

impl NotebookCell {
    pub fn is_code(&self) -> bool {
        self.cell_type == "code"
    }

    pub fn is_markdown(&self) -> bool {
        self.cell_type == "markdown"
    }
}

/// A parsed notebook with its cells in document order.
#[derive(Debug, Clone)]
pub struct Notebook {
    pub name: String,
    pub cells: Vec<NotebookCell>,
}

impl Notebook {
    pub fn parse(name: &str, bytes: &[u8]) -> Result<Self> {
        let raw: RawNotebook = serde_json::from_slice(bytes)
            .with_context(|| format!("{} is not a valid notebook", name))?;
        let cells = raw
            .cells
            .into_iter()
            .map(|cell| NotebookCell {
                cell_type: cell.cell_type,
                source: cell.source.into_text(),
            })
            .collect();
        Ok(Self {
            name: name.to_string(),
            cells,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn code_cells(&self) -> impl Iterator<Item = &NotebookCell> {
        self.cells.iter().filter(|c| c.is_code())
    }

    pub fn markdown_cells(&self) -> impl Iterator<Item = &NotebookCell> {
        self.cells.iter().filter(|c| c.is_markdown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_list_and_string_sources() {
        let json = r##"{
            "cells": [
                {"cell_type": "markdown", "metadata": {}, "source": ["# Title\n", "Intro"]},
                {"cell_type": "code", "metadata": {}, "source": "import numpy as np", "outputs": []},
                {"cell_type": "raw", "metadata": {}}
            ],
            "metadata": {"colab": {"name": "demo.ipynb"}},
            "nbformat": 4
        }"##;

        let notebook = Notebook::parse("demo.ipynb", json.as_bytes()).unwrap();
        assert_eq!(notebook.cell_count(), 3);
        assert_eq!(notebook.cells[0].source, "# Title\nIntro");
        assert_eq!(notebook.cells[1].source, "import numpy as np");
        assert_eq!(notebook.cells[2].source, "");
        assert_eq!(notebook.code_cells().count(), 1);
        assert_eq!(notebook.markdown_cells().count(), 1);
    }

    #[test]
    fn test_parse_rejects_non_notebook() {
        let err = Notebook::parse("broken.ipynb", b"not json").unwrap_err();
        assert!(err.to_string().contains("broken.ipynb"));
    }
}
