// src/domain/validation.rs
use crate::constants::{CONTENT_MAX_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS};
use crate::domain::{CreateNotePayload, NoteTag};
use serde::Serialize;
use std::fmt;

/// Per-field validation messages, shown next to the offending field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tag: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tag.is_none()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("title", &self.title),
            ("content", &self.content),
            ("tag", &self.tag),
        ]
        .into_iter()
        .filter_map(|(field, msg)| msg.as_ref().map(|m| format!("{field}: {m}")))
        .collect();
        f.write_str(&parts.join("; "))
    }
}

pub fn validate_title(title: &str) -> Option<String> {
    let len = title.chars().count();
    if len == 0 {
        Some("Title is required".to_string())
    } else if len < TITLE_MIN_CHARS {
        Some(format!("Min {TITLE_MIN_CHARS} characters"))
    } else if len > TITLE_MAX_CHARS {
        Some(format!("Max {TITLE_MAX_CHARS} characters"))
    } else {
        None
    }
}

pub fn validate_content(content: &str) -> Option<String> {
    if content.chars().count() > CONTENT_MAX_CHARS {
        Some(format!("Max {CONTENT_MAX_CHARS} characters"))
    } else {
        None
    }
}

pub fn validate_tag(tag: &str) -> Result<NoteTag, String> {
    if tag.trim().is_empty() {
        return Err("Tag is required".to_string());
    }
    tag.parse::<NoteTag>().map_err(|_| "Invalid tag".to_string())
}

/// Validate raw form input into a payload ready to send
pub fn validate_payload(
    title: &str,
    content: &str,
    tag: &str,
) -> Result<CreateNotePayload, FieldErrors> {
    let mut errors = FieldErrors {
        title: validate_title(title),
        content: validate_content(content),
        tag: None,
    };
    let tag = match validate_tag(tag) {
        Ok(tag) => Some(tag),
        Err(msg) => {
            errors.tag = Some(msg);
            None
        }
    };

    match tag {
        Some(tag) if errors.is_empty() => Ok(CreateNotePayload {
            title: title.to_string(),
            content: content.to_string(),
            tag,
        }),
        _ => Err(errors),
    }
}
