// src/application/mod.rs
pub mod gateway;
pub mod note_lister;
pub mod note_mutator;
pub mod query_cache;

pub use gateway::NoteGateway;
pub use note_lister::{FetchOutcome, FetchTicket, ListState, NoteLister};
pub use note_mutator::{DeleteReservation, MutationOutcome, NoteMutator};
pub use query_cache::{CachedPage, EntryStatus, QueryCache};
