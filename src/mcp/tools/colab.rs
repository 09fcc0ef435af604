//! Colab notebook tools: listing, reading and README generation.

use serde::Serialize;
use tracing::info;

use crate::analysis::{Notebook, NotebookCell, ReadmeGenerator};
use crate::error::ToolError;
use crate::mcp::types::{GenerateReadmeArgs, ListColabFilesArgs, ReadColabNotebookArgs};
use crate::runtime::Runtime;

use super::common::{quote_query_value, require_drive, require_non_empty};

pub const COLAB_MIME_TYPE: &str = "application/vnd.google.colaboratory";
const COLAB_PAGE_SIZE: u32 = 100;

#[derive(Debug, Serialize)]
pub struct ColabFileEntry {
    pub id: String,
    pub name: String,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct NotebookMetadata {
    pub name: String,
    pub cell_count: usize,
}

#[derive(Debug, Serialize)]
pub struct NotebookContent {
    pub metadata: NotebookMetadata,
    pub cells: Vec<NotebookCell>,
}

#[derive(Debug, Serialize)]
pub struct ReadmeResponse {
    pub readme: String,
}

pub fn colab_link(file_id: &str) -> String {
    format!("https://colab.research.google.com/drive/{}", file_id)
}

/// Drive query matching non-trashed Colab notebooks, optionally inside one folder.
pub fn colab_query(folder_id: Option<&str>) -> String {
    let mut query = format!("mimeType='{}' and trashed=false", COLAB_MIME_TYPE);
    if let Some(folder) = folder_id.map(str::trim).filter(|f| !f.is_empty()) {
        query.push_str(&format!(" and {} in parents", quote_query_value(folder)));
    }
    query
}

pub async fn list_colab_files(
    runtime: &Runtime,
    args: ListColabFilesArgs,
) -> Result<Vec<ColabFileEntry>, ToolError> {
    let drive = require_drive(runtime)?;
    let query = colab_query(args.folder_id.as_deref());

    let files = drive
        .list_files(&query, COLAB_PAGE_SIZE)
        .await
        .map_err(|e| ToolError::remote("Failed to list Colab files", &e))?;
    info!("📓 Found {} Colab notebooks", files.len());

    Ok(files
        .into_iter()
        .map(|f| ColabFileEntry {
            link: colab_link(&f.id),
            id: f.id,
            name: f.name,
        })
        .collect())
}

pub async fn read_colab_notebook(
    runtime: &Runtime,
    args: ReadColabNotebookArgs,
) -> Result<NotebookContent, ToolError> {
    let drive = require_drive(runtime)?;
    let file_id = require_non_empty("file_id", &args.file_id)?;

    let file = drive
        .get_file(file_id)
        .await
        .map_err(|e| ToolError::remote("Failed to read notebook metadata", &e))?;
    let bytes = drive
        .download(file_id)
        .await
        .map_err(|e| ToolError::remote("Failed to download notebook", &e))?;
    let notebook = Notebook::parse(&file.name, &bytes)
        .map_err(|e| ToolError::remote("Failed to parse notebook", &e))?;

    Ok(NotebookContent {
        metadata: NotebookMetadata {
            cell_count: notebook.cell_count(),
            name: notebook.name,
        },
        cells: notebook.cells,
    })
}

pub async fn generate_readme(
    runtime: &Runtime,
    args: GenerateReadmeArgs,
) -> Result<ReadmeResponse, ToolError> {
    let drive = require_drive(runtime)?;
    let file_id = require_non_empty("file_id", &args.file_id)?;
    let file_name = require_non_empty("file_name", &args.file_name)?;

    let bytes = drive
        .download(file_id)
        .await
        .map_err(|e| ToolError::remote("Failed to download notebook", &e))?;
    let notebook = Notebook::parse(file_name, &bytes)
        .map_err(|e| ToolError::remote("Failed to parse notebook", &e))?;

    let readme = ReadmeGenerator::new(runtime.generator())
        .generate(&notebook)
        .await;
    Ok(ReadmeResponse {
        readme: readme.content,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::{notebook_json, FakeFileStore};

    fn runtime_with(store: FakeFileStore) -> (Runtime, Arc<FakeFileStore>) {
        let store = Arc::new(store);
        (Runtime::default().with_drive(store.clone()), store)
    }

    #[test]
    fn test_colab_query() {
        assert_eq!(
            colab_query(None),
            "mimeType='application/vnd.google.colaboratory' and trashed=false"
        );
        assert_eq!(
            colab_query(Some("folder-1")),
            "mimeType='application/vnd.google.colaboratory' and trashed=false and 'folder-1' in parents"
        );
        assert_eq!(colab_query(Some("  ")), colab_query(None));
    }

    #[tokio::test]
    async fn test_list_colab_files_links() {
        let (runtime, store) = runtime_with(
            FakeFileStore::new()
                .with_notebook("a1", "First.ipynb", "{}")
                .with_notebook("b2", "Second.ipynb", "{}"),
        );

        let files = list_colab_files(
            &runtime,
            ListColabFilesArgs {
                folder_id: Some("folder-9".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].link, "https://colab.research.google.com/drive/a1");
        assert!(store.queries()[0].contains("'folder-9' in parents"));
    }

    #[tokio::test]
    async fn test_read_notebook() {
        let (runtime, _) = runtime_with(FakeFileStore::new().with_notebook(
            "nb",
            "Analysis.ipynb",
            &notebook_json(&[("markdown", "# Intro"), ("code", "print(1)")]),
        ));

        let content = read_colab_notebook(
            &runtime,
            ReadColabNotebookArgs {
                file_id: "nb".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(content.metadata.name, "Analysis.ipynb");
        assert_eq!(content.metadata.cell_count, 2);
        assert_eq!(content.cells[1].source, "print(1)");
    }

    #[tokio::test]
    async fn test_generate_readme_without_backend_uses_template() {
        let (runtime, _) = runtime_with(FakeFileStore::new().with_notebook(
            "nb",
            "Analysis.ipynb",
            &notebook_json(&[
                ("code", "import pandas as pd\nimport numpy as np"),
                ("code", "from pandas import DataFrame"),
            ]),
        ));

        let response = generate_readme(
            &runtime,
            GenerateReadmeArgs {
                file_id: "nb".to_string(),
                file_name: "Analysis.ipynb".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(response.readme.starts_with("# Analysis\n"));
        assert!(response
            .readme
            .contains("## Libraries Used\n\n- numpy\n- pandas\n\n"));
    }

    #[tokio::test]
    async fn test_tools_require_drive() {
        let runtime = Runtime::default();
        let err = list_colab_files(&runtime, ListColabFilesArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_empty_file_id_is_rejected() {
        let (runtime, _) = runtime_with(FakeFileStore::new());
        let err = read_colab_notebook(
            &runtime,
            ReadColabNotebookArgs {
                file_id: " ".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }
}
