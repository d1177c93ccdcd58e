// src/ports/terminal.rs
use crate::application::ListState;
use crate::domain::{FieldErrors, Note, NotesPage};
use crate::ports::form::NoteForm;
use crate::ports::pagination::PaginationControl;
use crate::util::text::preview;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write;
use tracing::instrument;

const PREVIEW_CHARS: usize = 72;

/// Renders list state, notes and the creation form as plain text
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }

    /// One list row. Busy rows show their delete action disabled.
    pub fn render_row(&self, index: u64, note: &Note, busy: bool) -> String {
        let action = if busy { "deleting…" } else { "delete" };
        let mut row = format!("{:>3}. {}  [{}]\n", index, note.title, note.tag);
        if !note.content.is_empty() {
            let _ = writeln!(row, "     {}", preview(&note.content, PREVIEW_CHARS));
        }
        let _ = writeln!(row, "     id: {}  ({})", note.id, action);
        row
    }

    pub fn render_page(&self, page: &NotesPage, busy: &HashSet<String>) -> String {
        if page.items.is_empty() {
            return "No notes found.\n".to_string();
        }
        let offset = u64::from(page.page.saturating_sub(1)) * u64::from(page.per_page);
        let mut out = String::new();
        for (i, note) in (offset + 1..).zip(&page.items) {
            out.push_str(&self.render_row(i, note, busy.contains(&note.id)));
        }
        out
    }

    /// Full list view: status line, rows, pagination bar
    #[instrument(level = "trace", skip(self, state, busy))]
    pub fn render_state(&self, state: &ListState, current_page: u32, busy: &HashSet<String>) -> String {
        match state {
            ListState::Loading => "Loading...\n".to_string(),
            ListState::Error { message } => format!("Error: {message}\n"),
            ListState::Ready {
                page,
                placeholder,
                fetching,
                error,
            } => {
                let mut out = String::new();
                if *placeholder || *fetching {
                    out.push_str("Loading...\n");
                }
                if let Some(message) = error {
                    let _ = writeln!(out, "Error: {message}");
                }
                out.push_str(&self.render_page(page, busy));
                if let Some(control) = PaginationControl::new(page.total_pages, current_page) {
                    let _ = writeln!(out, "{}", control.render());
                }
                out
            }
        }
    }

    pub fn render_note(&self, note: &Note) -> String {
        format!(
            "{title}  [{tag}]\n{content}\nid: {id}\ncreated: {created}\nupdated: {updated}\n",
            title = note.title,
            tag = note.tag,
            content = note.content,
            id = note.id,
            created = or_dash(&note.created_at),
            updated = or_dash(&note.updated_at),
        )
    }

    pub fn render_errors(&self, errors: &FieldErrors) -> String {
        let mut out = String::new();
        for (field, message) in [
            ("Title", &errors.title),
            ("Content", &errors.content),
            ("Tag", &errors.tag),
        ] {
            if let Some(message) = message {
                let _ = writeln!(out, "  {field}: {message}");
            }
        }
        out
    }

    pub fn render_form(&self, form: &NoteForm) -> String {
        let mut out = String::from("── Create note ──\n");
        let _ = writeln!(out, "Title:   {}", form.title());
        let _ = writeln!(out, "Content: {}", preview(form.content(), PREVIEW_CHARS));
        let _ = writeln!(out, "Tag:     {}", form.tag());
        out.push_str(&self.render_errors(form.errors()));
        if form.is_submitting() {
            out.push_str("Creating...\n");
        } else if !form.can_submit() {
            out.push_str("Fix the fields above to submit\n");
        }
        out
    }

    pub fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoteTag;

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: "2%\nwhole if none".to_string(),
            tag: NoteTag::Shopping,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn page(items: Vec<Note>, page: u32, total_pages: u32) -> NotesPage {
        NotesPage {
            total_items: items.len() as u64,
            items,
            page,
            per_page: 12,
            total_pages,
        }
    }

    #[test]
    fn given_loading_state_when_rendering_then_shows_loading() {
        let out = TerminalPresenter::new().render_state(&ListState::Loading, 1, &HashSet::new());

        assert_eq!(out, "Loading...\n");
    }

    #[test]
    fn given_empty_page_when_rendering_then_no_notes_found() {
        let state = ListState::Ready {
            page: page(vec![], 4, 3),
            placeholder: false,
            fetching: false,
            error: None,
        };

        let out = TerminalPresenter::new().render_state(&state, 4, &HashSet::new());

        assert!(out.starts_with("No notes found."));
        assert!(out.contains("[3]"));
        assert!(!out.contains('4'));
    }

    #[test]
    fn given_busy_row_when_rendering_then_delete_is_disabled() {
        let busy: HashSet<String> = ["a".to_string()].into();
        let presenter = TerminalPresenter::new();

        let out = presenter.render_page(&page(vec![note("a", "Milk"), note("b", "Eggs")], 1, 1), &busy);

        assert!(out.contains("id: a  (deleting…)"));
        assert!(out.contains("id: b  (delete)"));
        assert!(out.contains("2%…"));
    }

    #[test]
    fn given_second_page_when_rendering_then_numbering_continues() {
        let out = TerminalPresenter::new().render_page(&page(vec![note("a", "Milk")], 2, 2), &HashSet::new());

        assert!(out.starts_with(" 13. Milk  [Shopping]"));
    }

    #[test]
    fn given_failed_refresh_when_rendering_then_page_shown_with_error() {
        let state = ListState::Ready {
            page: page(vec![note("a", "Milk")], 1, 1),
            placeholder: false,
            fetching: false,
            error: Some("offline".to_string()),
        };

        let out = TerminalPresenter::new().render_state(&state, 1, &HashSet::new());

        assert!(out.contains("Error: offline"));
        assert!(out.contains("Milk"));
    }

    #[test]
    fn given_form_with_errors_when_rendering_then_lists_messages() {
        let mut form = NoteForm::new();
        form.set_title("ab");

        let out = TerminalPresenter::new().render_form(&form);

        assert!(out.contains("Title: Min 3 characters"));
        assert!(out.contains("Tag:     Todo"));
        assert!(out.contains("Fix the fields above to submit"));
    }

    #[test]
    fn given_valid_form_when_rendering_then_submit_not_blocked() {
        let mut form = NoteForm::new();
        form.set_title("Buy milk");

        let out = TerminalPresenter::new().render_form(&form);

        assert!(!out.contains("Fix the fields above"));
    }

    #[test]
    fn given_huge_page_numbers_when_rendering_then_numbering_does_not_overflow() {
        let huge = NotesPage {
            items: vec![note("a", "Milk")],
            page: u32::MAX,
            per_page: u32::MAX,
            total_items: 1,
            total_pages: u32::MAX,
        };

        let out = TerminalPresenter::new().render_page(&huge, &HashSet::new());

        let expected = u64::from(u32::MAX - 1) * u64::from(u32::MAX) + 1;
        assert!(out.starts_with(&format!("{expected}. Milk")));
    }
}
