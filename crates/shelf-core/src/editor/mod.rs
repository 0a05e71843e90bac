//! Editor state for the document being edited.
//!
//! Every transition borrows the previous snapshot and returns a new one. No
//! transition performs I/O and none can fail.

use crate::models::{slugify, Document};

/// Snapshot of the editor: the working document plus the last fetched list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    /// The single document being edited
    pub current_document: Document,
    /// Documents from the most recent successful list fetch, in server order
    pub document_list: Vec<Document>,
}

impl EditorState {
    /// Fresh editor with a blank working document and an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title, deriving the path from it while no path has been set yet.
    #[must_use]
    pub fn set_title(&self, title: impl Into<String>) -> Self {
        let title = title.into();
        let path = if self.current_document.path.is_empty() {
            slugify(&title)
        } else {
            self.current_document.path.clone()
        };

        Self {
            current_document: Document {
                title,
                path,
                ..self.current_document.clone()
            },
            document_list: self.document_list.clone(),
        }
    }

    /// Set the path unconditionally.
    #[must_use]
    pub fn set_path(&self, path: impl Into<String>) -> Self {
        Self {
            current_document: Document {
                path: path.into(),
                ..self.current_document.clone()
            },
            document_list: self.document_list.clone(),
        }
    }

    #[must_use]
    pub fn set_content(&self, content: impl Into<String>) -> Self {
        Self {
            current_document: Document {
                content: content.into(),
                ..self.current_document.clone()
            },
            document_list: self.document_list.clone(),
        }
    }

    /// Replace the document list wholesale. The store is trusted: no dedup, no validation.
    #[must_use]
    pub fn set_document_list(&self, documents: Vec<Document>) -> Self {
        Self {
            current_document: self.current_document.clone(),
            document_list: documents,
        }
    }

    /// Start a new editing session with a blank document; the list is kept.
    #[must_use]
    pub fn reset_current_document(&self) -> Self {
        Self {
            current_document: Document::default(),
            document_list: self.document_list.clone(),
        }
    }

    /// Replace the working document, e.g. with one just fetched from the store.
    #[must_use]
    pub fn replace_current_document(&self, document: Document) -> Self {
        Self {
            current_document: document,
            document_list: self.document_list.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentId;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_title_derives_path_on_fresh_state() {
        let state = EditorState::new().set_title("Hello World");
        assert_eq!(state.current_document.title, "Hello World");
        assert_eq!(state.current_document.path, "hello-world");
    }

    #[test]
    fn set_title_preserves_double_hyphen() {
        let state = EditorState::new().set_title("A  B");
        assert_eq!(state.current_document.path, "a--b");
    }

    #[test]
    fn set_title_with_empty_title_yields_empty_path() {
        let state = EditorState::new().set_title("");
        assert_eq!(state.current_document.title, "");
        assert_eq!(state.current_document.path, "");
    }

    #[test]
    fn explicit_path_survives_later_titles() {
        let state = EditorState::new()
            .set_path("custom")
            .set_title("New Title")
            .set_title("Another Title");
        assert_eq!(state.current_document.path, "custom");
        assert_eq!(state.current_document.title, "Another Title");
    }

    #[test]
    fn derived_path_is_not_rederived_by_later_titles() {
        let state = EditorState::new().set_title("First").set_title("Second");
        assert_eq!(state.current_document.path, "first");
    }

    #[test]
    fn clearing_path_allows_derivation_again() {
        let state = EditorState::new()
            .set_title("First")
            .set_path("")
            .set_title("Second Draft");
        assert_eq!(state.current_document.path, "second-draft");
    }

    #[test]
    fn derivation_matches_slug_rule_for_many_titles() {
        for title in ["", "x", "Mixed CASE title", "  padded  ", "tabs\tand\nnewlines"] {
            let state = EditorState::new().set_title(title);
            let expected = title
                .to_lowercase()
                .split(char::is_whitespace)
                .collect::<Vec<_>>()
                .join("-");
            assert_eq!(state.current_document.path, expected, "title {title:?}");
        }
    }

    #[test]
    fn transitions_do_not_mutate_previous_snapshot() {
        let before = EditorState::new().set_title("Draft");
        let after = before.set_content("body");
        assert_eq!(before.current_document.content, "");
        assert_eq!(after.current_document.content, "body");
        assert_eq!(after.current_document.title, "Draft");
    }

    #[test]
    fn set_document_list_replaces_without_merge() {
        let state = EditorState::new()
            .set_document_list(Vec::new())
            .set_document_list(vec![Document {
                title: "x".to_string(),
                ..Document::default()
            }]);
        assert_eq!(state.document_list.len(), 1);
        assert_eq!(state.document_list[0].title, "x");

        let replaced = state.set_document_list(vec![
            Document::new("b", "", ""),
            Document::new("a", "", ""),
            Document::new("b", "", ""),
        ]);
        let titles: Vec<_> = replaced
            .document_list
            .iter()
            .map(|doc| doc.title.as_str())
            .collect();
        assert_eq!(titles, vec!["b", "a", "b"]);
    }

    #[test]
    fn reset_clears_document_and_keeps_list() {
        let state = EditorState::new()
            .set_title("Title")
            .set_content("content")
            .set_document_list(vec![Document::new("kept", "kept", "")]);
        let reset = state.reset_current_document();
        assert_eq!(reset.current_document, Document::default());
        assert_eq!(reset.document_list, state.document_list);
    }

    #[test]
    fn replace_current_document_keeps_store_fields() {
        let fetched = Document {
            id: Some(DocumentId::new("abc")),
            ..Document::new("Fetched", "fetched", "text")
        };
        let state = EditorState::new().replace_current_document(fetched.clone());
        assert_eq!(state.current_document, fetched);
        // the fetched path is already set, so retitling keeps it
        assert_eq!(state.set_title("Renamed").current_document.path, "fetched");
    }
}
