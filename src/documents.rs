//! Appending sections to rich-text documents.

use serde::Serialize;
use tracing::info;

use crate::domain::DocumentStore;
use crate::error::ToolError;

pub const DEFAULT_SECTION_TITLE: &str = "Repository Summary";

/// Where and how much text was inserted.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub document_id: String,
    pub title: String,
    pub inserted_at_index: i64,
    pub characters_added: usize,
}

pub struct DocumentAppender<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> DocumentAppender<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Insert `section_title` and `text` just before the document's final newline.
    ///
    /// The index is read and used in two separate calls, so a concurrent edit
    /// in between can shift the insertion point.
    pub async fn append(
        &self,
        document_id: &str,
        text: &str,
        section_title: &str,
    ) -> Result<DocumentInfo, ToolError> {
        let document = self
            .store
            .get_document(document_id)
            .await
            .map_err(|e| ToolError::remote("Failed to read document", &e))?;

        let end_index = document
            .content
            .last()
            .map(|block| block.end_index)
            .unwrap_or(1);
        let index = (end_index - 1).max(1);
        let formatted = format_section(section_title, text);

        self.store
            .insert_text(document_id, index, &formatted)
            .await
            .map_err(|e| ToolError::remote("Failed to update document", &e))?;

        let characters_added = formatted.chars().count();
        info!(
            "📄 Appended {} characters to '{}' at index {}",
            characters_added, document.title, index
        );
        Ok(DocumentInfo {
            document_id: document.document_id,
            title: document.title,
            inserted_at_index: index,
            characters_added,
        })
    }
}

fn format_section(section_title: &str, text: &str) -> String {
    format!("\n\n{}\n{}\n", section_title, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDocumentStore;

    #[tokio::test]
    async fn test_append_inserts_before_final_newline() {
        let store = FakeDocumentStore::new().with_document("doc-1", "Resume", "Experience");
        let before = store.body("doc-1").unwrap();

        let info = DocumentAppender::new(&store)
            .append("doc-1", "• Built things", "Projects")
            .await
            .unwrap();

        // "Experience\n" spans [1, 12); the insert lands on the final newline.
        assert_eq!(info.inserted_at_index, 11);
        assert_eq!(store.inserts(), vec![(11, "\n\nProjects\n• Built things\n".to_string())]);

        let after = store.body("doc-1").unwrap();
        assert_eq!(
            after.chars().count(),
            before.chars().count() + info.characters_added
        );
        assert_eq!(after, "Experience\n\nProjects\n• Built things\n\n");
        assert_eq!(info.title, "Resume");
    }

    #[tokio::test]
    async fn test_append_to_empty_document_uses_index_one() {
        let store = FakeDocumentStore::new().with_document("doc-2", "Empty", "");

        let info = DocumentAppender::new(&store)
            .append("doc-2", "text", DEFAULT_SECTION_TITLE)
            .await
            .unwrap();
        assert_eq!(info.inserted_at_index, 1);
    }

    #[tokio::test]
    async fn test_missing_document_is_remote_error() {
        let store = FakeDocumentStore::new();
        let err = DocumentAppender::new(&store)
            .append("nope", "text", "Title")
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Remote(_)));
        assert!(store.inserts().is_empty());
    }
}
