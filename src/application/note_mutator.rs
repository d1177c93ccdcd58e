// src/application/note_mutator.rs
use crate::application::{NoteGateway, QueryCache};
use crate::domain::{CreateNotePayload, DeletedNote, DomainError, Note};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    Done(T),
    /// A mutation for the same target was already in flight; nothing was sent
    Ignored,
}

/// Clears the create flag when the request finishes, however it finishes
struct CreateGuard<'a>(&'a AtomicBool);

impl Drop for CreateGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Keeps one id in the busy set until dropped.
///
/// Obtained from [`NoteMutator::reserve_delete`] before the request is
/// started, so the row reads as busy from the moment the user asks.
#[derive(Debug)]
pub struct DeleteReservation {
    busy: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl DeleteReservation {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for DeleteReservation {
    fn drop(&mut self) {
        let mut busy = self.busy.lock().unwrap_or_else(|p| p.into_inner());
        busy.remove(&self.id);
    }
}

/// Create and delete, with per-target in-flight guards and cache invalidation.
///
/// Methods take `&self` so a second trigger can arrive while the first is
/// still awaiting the gateway; the guard turns it into [`MutationOutcome::Ignored`].
pub struct NoteMutator<G: NoteGateway> {
    gateway: Arc<G>,
    cache: QueryCache,
    creating: AtomicBool,
    deleting: Arc<Mutex<HashSet<String>>>,
}

impl<G: NoteGateway> NoteMutator<G> {
    pub fn new(gateway: Arc<G>, cache: QueryCache) -> Self {
        Self {
            gateway,
            cache,
            creating: AtomicBool::new(false),
            deleting: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn is_creating(&self) -> bool {
        self.creating.load(Ordering::SeqCst)
    }

    /// Whether the row for `id` should render its delete action disabled
    pub fn is_deleting(&self, id: &str) -> bool {
        self.busy().contains(id)
    }

    pub fn deleting_ids(&self) -> HashSet<String> {
        self.busy().clone()
    }

    fn busy(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.deleting.lock().unwrap_or_else(|p| p.into_inner())
    }

    #[instrument(level = "debug", skip(self, payload), fields(title = %payload.title))]
    pub async fn create(
        &self,
        payload: &CreateNotePayload,
    ) -> Result<MutationOutcome<Note>, DomainError> {
        if self
            .creating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Create already in flight, ignoring");
            return Ok(MutationOutcome::Ignored);
        }
        let _guard = CreateGuard(&self.creating);

        match self.gateway.create_note(payload).await {
            Ok(note) => {
                self.cache.invalidate_all();
                info!(note_id = %note.id, "Created note");
                Ok(MutationOutcome::Done(note))
            }
            Err(e) => {
                warn!(error = %e, "Create failed");
                Err(e)
            }
        }
    }

    /// Put `id` in the busy set, or `None` when a delete for it is already
    /// running.
    pub fn reserve_delete(&self, id: &str) -> Option<DeleteReservation> {
        if !self.busy().insert(id.to_string()) {
            debug!(note_id = id, "Delete already in flight, ignoring");
            return None;
        }
        Some(DeleteReservation {
            busy: Arc::clone(&self.deleting),
            id: id.to_string(),
        })
    }

    pub async fn delete(&self, id: &str) -> Result<MutationOutcome<DeletedNote>, DomainError> {
        match self.reserve_delete(id) {
            Some(reservation) => self.delete_reserved(reservation).await.map(MutationOutcome::Done),
            None => Ok(MutationOutcome::Ignored),
        }
    }

    /// Send the delete for a reserved id. The id leaves the busy set when
    /// this returns, whatever the outcome.
    #[instrument(level = "debug", skip_all, fields(note_id = %reservation.id))]
    pub async fn delete_reserved(
        &self,
        reservation: DeleteReservation,
    ) -> Result<DeletedNote, DomainError> {
        let id = reservation.id();
        match self.gateway.delete_note(id).await {
            Ok(deleted) => {
                self.cache.invalidate_all();
                info!(note_id = id, "Deleted note");
                Ok(deleted)
            }
            Err(e) => {
                warn!(note_id = id, error = %e, "Delete failed");
                Err(e)
            }
        }
    }
}
