//! Client session: the note lifecycle and how local state follows the server.
//!
//! A [`NotesSession`] owns everything a notes UI shows for one logged-in
//! user: the selected view and tag filter, the cached note list, the edit
//! session and the delete gate. Mutations go to the server first; on success
//! the cached list is patched locally, except when a note's archive flag
//! changes, in which case the current view is re-fetched.
//!
//! Fetches carry a generation ticket. Any response whose ticket is no longer
//! current (the view changed, the user logged out, a newer fetch started) is
//! dropped instead of overwriting fresher state.

use crate::api::{AuthApi, NoteApi};
use crate::auth::TokenStore;
use crate::edit::{EditSession, PendingDeletion};
use crate::errors::{Action, ApiError, SessionError};
use crate::models::{Credentials, Note, NoteDraft, NoteForm, RegisterForm, View};
use crate::notes::NoteList;
use crate::validation::{parse_tags, validate_login, validate_note_form, validate_register};
use crate::view::{all_tags, ViewState};
use std::sync::Arc;

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

// ============================================================================
// Types
// ============================================================================

/// Identifies one list request. Only the most recent ticket may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub view: View,
}

/// What a form submission turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted {
    Created(Note),
    Updated(Note),
}

pub struct NotesSession<B> {
    backend: B,
    tokens: Arc<dyn TokenStore>,
    authenticated: bool,
    view: ViewState,
    notes: NoteList,
    editing: EditSession,
    pending_deletion: Option<PendingDeletion>,
    error: Option<String>,
    loading: bool,
    generation: u64,
}

impl<B> NotesSession<B>
where
    B: NoteApi + AuthApi,
{
    pub fn new(backend: B, tokens: Arc<dyn TokenStore>) -> Self {
        let authenticated = tokens.is_authenticated();
        Self {
            backend,
            tokens,
            authenticated,
            view: ViewState::default(),
            notes: NoteList::new(),
            editing: EditSession::default(),
            pending_deletion: None,
            error: None,
            loading: false,
            generation: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn active_view(&self) -> View {
        self.view.active_view
    }

    /// Every note loaded for the current view, unfiltered.
    pub fn notes(&self) -> &[Note] {
        self.notes.as_slice()
    }

    /// Notes in the current view that pass the tag filter.
    pub fn visible_notes(&self) -> Vec<&Note> {
        self.view.visible(self.notes.as_slice())
    }

    /// Tags across the loaded notes only, not all-time.
    pub fn all_tags(&self) -> Vec<String> {
        all_tags(self.notes.as_slice())
    }

    pub fn editing(&self) -> Option<&Note> {
        self.editing.target()
    }

    pub fn pending_deletion(&self) -> Option<&PendingDeletion> {
        self.pending_deletion.as_ref()
    }

    /// The message currently shown in the error banner, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // ========================================================================
    // Session Lifecycle
    // ========================================================================

    /// Reset all per-session state after a login or logout. In-flight fetches
    /// from before the change are invalidated.
    pub fn session_changed(&mut self) {
        self.view = ViewState::default();
        self.notes.clear();
        self.editing.cancel();
        self.pending_deletion = None;
        self.error = None;
        self.loading = false;
        self.generation += 1;
        self.authenticated = self.tokens.is_authenticated();
    }

    pub async fn login(&mut self, credentials: Credentials) -> Result<(), SessionError> {
        validate_login(&credentials)?;

        let token = match self.backend.login(&credentials).await {
            Ok(token) => token,
            Err(ApiError::Status { status, message }) => {
                log::error!("Login rejected ({}): {}", status, message);
                return Err(SessionError::LoginRejected);
            }
            Err(e) => {
                log::error!("Login error: {}", e);
                return Err(SessionError::LoginFailed);
            }
        };

        self.tokens.set_token(&token)?;
        self.session_changed();
        log::info!("Logged in as {}", credentials.username);
        self.load_notes().await
    }

    /// Register a new account. The caller still has to log in afterwards.
    pub async fn register(&mut self, form: &RegisterForm) -> Result<(), SessionError> {
        validate_register(form)?;

        let credentials = Credentials {
            username: form.username.clone(),
            password: form.password.clone(),
        };
        self.backend.register(&credentials).await.map_err(|e| {
            log::error!("Registration error: {}", e);
            SessionError::RegistrationRejected
        })
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.tokens.clear()?;
        self.session_changed();
        Ok(())
    }

    // ========================================================================
    // Failure Handling
    // ========================================================================

    fn require_auth(&mut self, action: Action) -> Result<(), SessionError> {
        if self.authenticated {
            return Ok(());
        }
        let err = SessionError::NotAuthenticated(action);
        self.error = Some(err.to_string());
        Err(err)
    }

    /// Turn an API failure into what the user sees. A 401 ends the session;
    /// anything else leaves state as it was.
    fn fail(&mut self, action: Action, err: ApiError) -> SessionError {
        log::error!("{:?} failed: {}", action, err);

        let surfaced = if err.is_auth_required() {
            if let Err(e) = self.tokens.clear() {
                log::error!("Cannot clear stored token: {}", e);
            }
            self.session_changed();
            self.authenticated = false;
            SessionError::SessionExpired
        } else {
            SessionError::Failed(action)
        };

        self.error = Some(surfaced.to_string());
        surfaced
    }

    // ========================================================================
    // Fetching
    // ========================================================================

    /// Start a list request for the current view.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        FetchTicket {
            generation: self.generation,
            view: self.view.active_view,
        }
    }

    /// Apply a list response. Returns `Ok(false)` when the ticket has been
    /// superseded and the response was dropped.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Note>, ApiError>,
    ) -> Result<bool, SessionError> {
        if ticket.generation != self.generation {
            log::debug!(
                "Dropping stale {} response (generation {}, current {})",
                ticket.view,
                ticket.generation,
                self.generation
            );
            return Ok(false);
        }

        self.loading = false;
        match result {
            Ok(notes) => {
                self.notes.replace(notes);
                self.error = None;
                Ok(true)
            }
            Err(e) => Err(self.fail(Action::Load, e)),
        }
    }

    /// Re-fetch the current view from the server.
    pub async fn load_notes(&mut self) -> Result<(), SessionError> {
        if !self.authenticated {
            self.notes.clear();
            self.loading = false;
            return Ok(());
        }

        let ticket = self.begin_fetch();
        let result = self.backend.list(ticket.view).await;
        self.apply_fetch(ticket, result).map(|_| ())
    }

    /// Re-fetch after a mutation that already succeeded. A failing reload
    /// only shows up in the error banner.
    async fn refresh_after_mutation(&mut self) {
        if let Err(e) = self.load_notes().await {
            log::warn!("Reload after mutation failed: {}", e);
        }
    }

    pub async fn fetch_note(&mut self, id: i64) -> Result<Note, SessionError> {
        self.require_auth(Action::Fetch)?;
        match self.backend.get(id).await {
            Ok(note) => Ok(note),
            Err(e) => Err(self.fail(Action::Fetch, e)),
        }
    }

    // ========================================================================
    // View & Filter
    // ========================================================================

    /// Switch between active and archived notes. Selecting the current view
    /// does nothing.
    pub async fn select_view(&mut self, view: View) -> Result<(), SessionError> {
        if !self.view.select(view) {
            return Ok(());
        }
        self.load_notes().await
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.view.toggle_tag(tag);
    }

    /// Add a tag to the filter without ever removing it.
    pub fn select_tag(&mut self, tag: &str) {
        self.view.select_tag(tag);
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub async fn create_note(&mut self, draft: NoteDraft) -> Result<Note, SessionError> {
        self.require_auth(Action::Create)?;

        match self.backend.create(&draft).await {
            Ok(note) => {
                // New notes are active; the archived list never shows them.
                if self.view.active_view == View::Active {
                    self.notes.append(note.clone());
                }
                Ok(note)
            }
            Err(e) => Err(self.fail(Action::Create, e)),
        }
    }

    pub async fn update_note(&mut self, note: Note) -> Result<Note, SessionError> {
        self.update_as(Action::Update, note).await
    }

    async fn update_as(&mut self, action: Action, note: Note) -> Result<Note, SessionError> {
        self.require_auth(action)?;

        let cached_archived = self.notes.get(note.id).map(|n| n.is_archived);
        let updated = match self.backend.update(&note).await {
            Ok(updated) => updated,
            Err(e) => return Err(self.fail(action, e)),
        };

        self.editing.cancel();
        // Patch only when neither the request nor the server's answer moved
        // the note out of the current view.
        let stays = cached_archived == Some(note.is_archived)
            && updated.is_archived == note.is_archived;
        if stays {
            self.notes.patch(updated.clone());
        } else {
            self.refresh_after_mutation().await;
        }
        Ok(updated)
    }

    /// Flip the archive flag and send it through the regular update path.
    pub async fn archive_note(&mut self, note: &Note) -> Result<Note, SessionError> {
        let flipped = Note {
            is_archived: !note.is_archived,
            ..note.clone()
        };
        self.update_as(Action::Archive, flipped).await
    }

    /// Server-side archive toggle. Membership changes, so the view is
    /// re-fetched.
    pub async fn toggle_archive(&mut self, id: i64) -> Result<(), SessionError> {
        self.require_auth(Action::ToggleArchive)?;

        if let Err(e) = self.backend.toggle_archive(id).await {
            return Err(self.fail(Action::ToggleArchive, e));
        }
        self.refresh_after_mutation().await;
        Ok(())
    }

    // ========================================================================
    // Edit Session
    // ========================================================================

    pub fn begin_edit(&mut self, note: Note) -> Result<(), SessionError> {
        self.require_auth(Action::Edit)?;
        self.editing.begin(note);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing.cancel();
    }

    /// Validate the form, then update the note being edited or create a new
    /// one when nothing is being edited.
    pub async fn submit_form(&mut self, form: &NoteForm) -> Result<Submitted, SessionError> {
        validate_note_form(form)?;
        let tags = parse_tags(&form.tags);

        match self.editing.target().cloned() {
            Some(target) => {
                let note = Note {
                    title: form.title.clone(),
                    content: form.content.clone(),
                    tags,
                    ..target
                };
                self.update_note(note).await.map(Submitted::Updated)
            }
            None => {
                let draft = NoteDraft::new(form.title.clone(), form.content.clone(), tags);
                self.create_note(draft).await.map(Submitted::Created)
            }
        }
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// First step of deletion: remember what would be deleted. Nothing is
    /// sent to the server.
    pub fn request_delete(&mut self, note_id: i64, title: &str) -> Result<(), SessionError> {
        self.require_auth(Action::Delete)?;
        self.pending_deletion = Some(PendingDeletion {
            note_id,
            title: title.to_string(),
        });
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_deletion = None;
    }

    /// Second step: issue the DELETE. Returns the removed id, or `None` when
    /// there was nothing pending. The pending entry is taken before the call,
    /// so repeating a confirm never sends a second request.
    pub async fn confirm_delete(&mut self) -> Result<Option<i64>, SessionError> {
        let pending = match self.pending_deletion.take() {
            Some(p) => p,
            None => return Ok(None),
        };

        match self.backend.remove(pending.note_id).await {
            Ok(()) => {
                self.notes.remove(pending.note_id);
                Ok(Some(pending.note_id))
            }
            Err(e) => {
                let keep_pending = !e.is_auth_required();
                let err = self.fail(Action::Delete, e);
                if keep_pending {
                    self.pending_deletion = Some(pending);
                }
                Err(err)
            }
        }
    }
}
