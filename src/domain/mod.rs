// src/domain/mod.rs
pub mod error;
pub mod note;
pub mod query;
pub mod validation;

pub use error::DomainError;
pub use note::{CreateNotePayload, DeletedNote, Note, NoteTag, NotesPage};
pub use query::QueryKey;
pub use validation::FieldErrors;
