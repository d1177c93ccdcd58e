// src/ports/mod.rs
pub mod form;
pub mod pagination;
pub mod search;
pub mod terminal;

pub use form::{ModalHost, NoteForm};
pub use pagination::{PageItem, PaginationControl};
pub use search::SearchBox;
pub use terminal::TerminalPresenter;
