// src/ports/form.rs
use crate::domain::validation::{validate_content, validate_payload, validate_tag, validate_title};
use crate::domain::{CreateNotePayload, FieldErrors, NoteTag};

/// Creation form state: raw field values plus the messages shown next to them
#[derive(Debug, Clone, PartialEq)]
pub struct NoteForm {
    title: String,
    content: String,
    tag: String,
    errors: FieldErrors,
    submitting: bool,
}

impl Default for NoteForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: NoteTag::default().to_string(),
            errors: FieldErrors::default(),
            submitting: false,
        }
    }
}

impl NoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    // Editing a field re-checks only that field, like validate-on-change

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.errors.title = validate_title(&self.title);
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
        self.errors.content = validate_content(&self.content);
    }

    pub fn set_tag(&mut self, tag: &str) {
        self.tag = tag.trim().to_string();
        self.errors.tag = validate_tag(&self.tag).err();
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    /// Submit is blocked while any field is invalid or a create is running
    pub fn can_submit(&self) -> bool {
        !self.submitting && self.errors.is_empty()
    }

    /// Validate every field and hand out the payload if all pass.
    ///
    /// Values are kept either way so a failed attempt can be retried as is.
    pub fn submit(&mut self) -> Result<CreateNotePayload, FieldErrors> {
        match validate_payload(&self.title, &self.content, &self.tag) {
            Ok(payload) => {
                self.errors = FieldErrors::default();
                Ok(payload)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }
}

/// Hosts at most one dialog at a time
#[derive(Debug, Default)]
pub struct ModalHost<T> {
    content: Option<T>,
}

impl<T> ModalHost<T> {
    pub fn new() -> Self {
        Self { content: None }
    }

    pub fn open(&mut self, content: T) {
        self.content = Some(content);
    }

    /// Close the dialog, handing back whatever it held
    pub fn close(&mut self) -> Option<T> {
        self.content.take()
    }

    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&T> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut T> {
        self.content.as_mut()
    }
}
