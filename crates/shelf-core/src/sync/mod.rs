//! Sync flows between the editor state and the remote store.
//!
//! Every flow runs its store calls strictly in sequence. A failed step is
//! logged and stops the flow; local edits are never rolled back.

use crate::editor::EditorState;
use crate::error::Result;
use crate::models::{Document, DocumentId, User};
use crate::retry::RetryPolicy;
use crate::store::{DocumentStore, StoreResult};

/// Owns the current editor snapshot and drives it against a [`DocumentStore`]
#[derive(Debug)]
pub struct SyncController<S> {
    store: S,
    state: EditorState,
    retry: RetryPolicy,
}

impl<S: DocumentStore> SyncController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: EditorState::new(),
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Apply a state transition, replacing the snapshot with its result.
    ///
    /// ```
    /// # use shelf_core::{DocumentStoreClient, SyncController};
    /// let client = DocumentStoreClient::new("http://localhost:9001").unwrap();
    /// let mut controller = SyncController::new(client);
    /// controller.edit(|state| state.set_title("Hello World"));
    /// assert_eq!(controller.state().current_document.path, "hello-world");
    /// ```
    pub fn edit(&mut self, transition: impl FnOnce(&EditorState) -> EditorState) {
        self.state = transition(&self.state);
    }

    /// Start a new editing session with a blank document.
    pub fn new_document(&mut self) {
        self.edit(EditorState::reset_current_document);
    }

    /// Exchange an external identity token for a store session.
    ///
    /// The empty email tells the store to authenticate by token alone. Login
    /// failures are logged by the store and are not reported here.
    pub async fn sign_in_with_identity_token(&self, token: &str) {
        self.store.login("", token).await;
    }

    pub async fn current_user(&self) -> StoreResult<User> {
        self.store.get_current_user().await
    }

    /// Persist the current document, then refresh the document list.
    pub async fn submit_current_document(&mut self) -> StoreResult<DocumentId> {
        let id = match self.store.create_doc(&self.state.current_document).await {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!("Failed to save document: {}", error);
                return Err(error);
            }
        };
        self.record_persisted(&id);
        self.refresh_documents().await?;
        Ok(id)
    }

    /// Same as [`submit_current_document`](Self::submit_current_document), with
    /// the persist step retried under the configured policy.
    pub async fn submit_current_document_with_retry(&mut self) -> Result<DocumentId> {
        let document = self.state.current_document.clone();
        let store = &self.store;
        let id = self
            .retry
            .run(|| store.create_doc(&document))
            .await
            .inspect_err(|error| tracing::warn!("Failed to save document: {}", error))?;
        self.record_persisted(&id);
        self.refresh_documents().await?;
        Ok(id)
    }

    /// Replace the document list with a fresh listing from the store.
    pub async fn refresh_documents(&mut self) -> StoreResult<()> {
        match self.store.list_docs().await {
            Ok(documents) => {
                tracing::debug!(count = documents.len(), "Refreshed document list");
                self.edit(|state| state.set_document_list(documents));
                Ok(())
            }
            Err(error) => {
                tracing::warn!("Failed to refresh document list: {}", error);
                Err(error)
            }
        }
    }

    /// Load a stored document as the current document.
    pub async fn open_document(&mut self, id: &DocumentId) -> StoreResult<()> {
        match self.store.get_doc(id).await {
            Ok(document) => {
                self.edit(|state| state.replace_current_document(document));
                Ok(())
            }
            Err(error) => {
                tracing::warn!(id = %id, "Failed to open document: {}", error);
                Err(error)
            }
        }
    }

    /// Delete a stored document, then refresh the document list.
    pub async fn delete_document(&mut self, id: &DocumentId) -> StoreResult<()> {
        if let Err(error) = self.store.delete_doc(id).await {
            tracing::warn!(id = %id, "Failed to delete document: {}", error);
            return Err(error);
        }
        if self.state.current_document.id.as_ref() == Some(id) {
            self.new_document();
        }
        self.refresh_documents().await
    }

    fn record_persisted(&mut self, id: &DocumentId) {
        let document = Document {
            id: Some(id.clone()),
            ..self.state.current_document.clone()
        };
        self.edit(|state| state.replace_current_document(document));
    }
}
