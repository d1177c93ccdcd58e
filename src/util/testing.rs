// src/util/testing.rs

use anyhow::Result;
use async_trait::async_trait;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::NoteGateway;
use crate::domain::{
    CreateNotePayload, DeletedNote, DomainError, Note, NoteTag, NotesPage, QueryKey,
};

#[derive(Default)]
struct MockState {
    notes: Vec<Note>,
    next_id: u64,
    list_failure: Option<String>,
    create_failure: Option<String>,
}

/// In-memory stand-in for the remote notes service
///
/// Pages and searches like the real endpoint (1-based pages, case-insensitive
/// search over title and content), counts calls, and can be told to fail or
/// to hold mutations until a gate is notified.
///
/// # Examples
///
/// ```
/// use notehub::util::testing::MockNoteGateway;
/// use notehub::domain::NoteTag;
///
/// let mock = MockNoteGateway::builder()
///     .with_note("Buy milk", "2%", NoteTag::Shopping)
///     .with_note("Standup", "10:00", NoteTag::Meeting)
///     .build();
/// assert_eq!(mock.note_ids().len(), 2);
/// ```
pub struct MockNoteGateway {
    state: Mutex<MockState>,
    delete_gate: Option<Arc<Notify>>,
    create_gate: Option<Arc<Notify>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MockNoteGateway {
    pub fn builder() -> MockNoteGatewayBuilder {
        MockNoteGatewayBuilder::new()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn note_ids(&self) -> Vec<String> {
        self.state().notes.iter().map(|n| n.id.clone()).collect()
    }

    /// Make every following list call fail with `message`
    pub fn fail_lists(&self, message: &str) {
        self.state().list_failure = Some(message.to_string());
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

fn build_note(id: u64, title: &str, content: &str, tag: NoteTag) -> Note {
    let stamp = format!("2025-01-01T00:00:{:02}.000Z", id % 60);
    Note {
        id: format!("note-{id}"),
        title: title.to_string(),
        content: content.to_string(),
        tag,
        created_at: stamp.clone(),
        updated_at: stamp,
    }
}

#[async_trait]
impl NoteGateway for MockNoteGateway {
    async fn list_notes(&self, key: &QueryKey) -> Result<NotesPage, DomainError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        if let Some(message) = &state.list_failure {
            return Err(DomainError::Network(message.clone()));
        }

        let matching: Vec<&Note> = match key.search() {
            None => state.notes.iter().collect(),
            Some(query) => {
                let query = query.to_lowercase();
                state
                    .notes
                    .iter()
                    .filter(|n| {
                        n.title.to_lowercase().contains(&query)
                            || n.content.to_lowercase().contains(&query)
                    })
                    .collect()
            }
        };

        let per_page = key.per_page() as usize;
        let total_items = matching.len();
        let items = matching
            .into_iter()
            .skip((key.page() as usize - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();

        Ok(NotesPage {
            items,
            page: key.page(),
            per_page: key.per_page(),
            total_items: total_items as u64,
            total_pages: total_items.div_ceil(per_page) as u32,
        })
    }

    async fn create_note(&self, payload: &CreateNotePayload) -> Result<Note, DomainError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        let mut state = self.state();
        if let Some(message) = &state.create_failure {
            return Err(DomainError::Network(message.clone()));
        }
        state.next_id += 1;
        let note = build_note(state.next_id, &payload.title, &payload.content, payload.tag);
        // newest first, like the service
        state.notes.insert(0, note.clone());
        Ok(note)
    }

    async fn delete_note(&self, id: &str) -> Result<DeletedNote, DomainError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.delete_gate {
            gate.notified().await;
        }
        let mut state = self.state();
        let position = state
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| DomainError::Network("Note not found".to_string()))?;
        let note = state.notes.remove(position);
        Ok(DeletedNote {
            deleted: true,
            note,
        })
    }
}

/// Builder for MockNoteGateway
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockNoteGatewayBuilder {
    state: MockState,
    delete_gate: Option<Arc<Notify>>,
    create_gate: Option<Arc<Notify>>,
}

impl MockNoteGatewayBuilder {
    pub fn new() -> Self {
        Self {
            state: MockState::default(),
            delete_gate: None,
            create_gate: None,
        }
    }

    /// Seed a note; ids are assigned in insertion order (`note-1`, `note-2`, ...)
    pub fn with_note(mut self, title: &str, content: &str, tag: NoteTag) -> Self {
        self.state.next_id += 1;
        let note = build_note(self.state.next_id, title, content, tag);
        self.state.notes.push(note);
        self
    }

    pub fn with_list_failure(mut self, message: &str) -> Self {
        self.state.list_failure = Some(message.to_string());
        self
    }

    pub fn with_create_failure(mut self, message: &str) -> Self {
        self.state.create_failure = Some(message.to_string());
        self
    }

    /// Hold every delete until `gate` is notified
    pub fn with_delete_gate(mut self, gate: Arc<Notify>) -> Self {
        self.delete_gate = Some(gate);
        self
    }

    /// Hold every create until `gate` is notified
    pub fn with_create_gate(mut self, gate: Arc<Notify>) -> Self {
        self.create_gate = Some(gate);
        self
    }

    pub fn build(self) -> MockNoteGateway {
        MockNoteGateway {
            state: Mutex::new(self.state),
            delete_gate: self.delete_gate,
            create_gate: self.create_gate,
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }
}

impl Default for MockNoteGatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "rustls", "mio", "wiremock"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
