// src/application/gateway.rs
use crate::domain::{CreateNotePayload, DeletedNote, DomainError, Note, NotesPage, QueryKey};
use async_trait::async_trait;

/// Access to the remote notes service.
///
/// Implementations hand back canonical domain types only; whatever shape the
/// backend answered with is resolved before returning.
#[async_trait]
pub trait NoteGateway: Send + Sync {
    /// Fetch one page of notes. A page past the end yields empty `items`.
    async fn list_notes(&self, key: &QueryKey) -> Result<NotesPage, DomainError>;

    async fn create_note(&self, payload: &CreateNotePayload) -> Result<Note, DomainError>;

    /// Delete a note; fails with `DomainError::Network` if the id is unknown
    async fn delete_note(&self, id: &str) -> Result<DeletedNote, DomainError>;
}
