//! In-memory backend shared by the session and command tests.

use crate::api::{AuthApi, NoteApi};
use crate::auth::{MemoryTokenStore, TokenStore};
use crate::errors::ApiError;
use crate::models::{Credentials, Note, NoteDraft, View};
use crate::session::NotesSession;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

// ============================================================================
// Fake Backend
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Unauthorized,
    Server(u16),
}

impl Failure {
    fn into_error(self) -> ApiError {
        match self {
            Failure::Unauthorized => ApiError::AuthRequired,
            Failure::Server(status) => ApiError::Status {
                status,
                message: format!("API error: {}", status),
            },
        }
    }
}

#[derive(Default)]
pub struct FakeServer {
    notes: Vec<Note>,
    next_id: i64,
    calls: Vec<String>,
    /// Calls left to succeed before the failure fires.
    failure: Option<(usize, Failure)>,
    flip_archive_on_update: bool,
}

/// Holds notes the way the real API does: one store, two list endpoints.
#[derive(Default)]
pub struct FakeBackend {
    server: Mutex<FakeServer>,
}

impl FakeBackend {
    pub fn with_notes(notes: Vec<Note>) -> Self {
        let next_id = notes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        Self {
            server: Mutex::new(FakeServer {
                notes,
                next_id,
                ..FakeServer::default()
            }),
        }
    }

    pub fn fail_next(&self, failure: Failure) {
        self.fail_after(0, failure);
    }

    /// Let `calls` more requests through, then fail the one after.
    pub fn fail_after(&self, calls: usize, failure: Failure) {
        self.server.lock().unwrap().failure = Some((calls, failure));
    }

    /// Make updates answer with the archive flag flipped, as a server that
    /// applies its own archiving rules might.
    pub fn flip_archive_on_update(&self) {
        self.server.lock().unwrap().flip_archive_on_update = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.server.lock().unwrap().calls.clone()
    }

    pub fn stored(&self, id: i64) -> Option<Note> {
        self.server.lock().unwrap().notes.iter().find(|n| n.id == id).cloned()
    }

    /// Record the call and hand out the injected failure once it is due.
    fn enter(&self, call: String) -> Result<MutexGuard<'_, FakeServer>, ApiError> {
        let mut server = self.server.lock().unwrap();
        server.calls.push(call);
        match server.failure.take() {
            Some((0, f)) => Err(f.into_error()),
            Some((n, f)) => {
                server.failure = Some((n - 1, f));
                Ok(server)
            }
            None => Ok(server),
        }
    }
}

#[async_trait]
impl NoteApi for FakeBackend {
    async fn list(&self, view: View) -> Result<Vec<Note>, ApiError> {
        let server = self.enter(format!("list:{:?}", view))?;
        Ok(server
            .notes
            .iter()
            .filter(|n| n.is_archived == view.is_archived())
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Note, ApiError> {
        let server = self.enter(format!("get:{}", id))?;
        server
            .notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                message: "API error: 404".to_string(),
            })
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note, ApiError> {
        let mut server = self.enter("create".to_string())?;
        let note = Note {
            id: server.next_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            is_archived: draft.is_archived,
            tags: draft.tags.clone(),
            creation_date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        };
        server.next_id += 1;
        server.notes.push(note.clone());
        Ok(note)
    }

    async fn update(&self, note: &Note) -> Result<Note, ApiError> {
        let mut server = self.enter(format!("update:{}", note.id))?;
        let mut stored = note.clone();
        if server.flip_archive_on_update {
            stored.is_archived = !stored.is_archived;
        }
        if let Some(slot) = server.notes.iter_mut().find(|n| n.id == note.id) {
            *slot = Note {
                creation_date: slot.creation_date,
                ..stored.clone()
            };
        }
        // Behaves like a 200 echoing what was stored.
        Ok(stored)
    }

    async fn toggle_archive(&self, id: i64) -> Result<(), ApiError> {
        let mut server = self.enter(format!("toggle:{}", id))?;
        if let Some(n) = server.notes.iter_mut().find(|n| n.id == id) {
            n.is_archived = !n.is_archived;
        }
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), ApiError> {
        let mut server = self.enter(format!("remove:{}", id))?;
        server.notes.retain(|n| n.id != id);
        Ok(())
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        self.enter(format!("login:{}", credentials.username))?;
        if credentials.password == "secret1" {
            Ok(format!("token-{}", credentials.username))
        } else {
            Err(ApiError::Status {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
        }
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.enter(format!("register:{}", credentials.username))?;
        if credentials.username == "taken" {
            return Err(ApiError::Status {
                status: 409,
                message: "Failed to register".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn note(id: i64, title: &str, archived: bool, tags: &[&str]) -> Note {
    Note {
        id,
        title: title.to_string(),
        content: format!("{} body", title),
        is_archived: archived,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        creation_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn seed() -> Vec<Note> {
    vec![
        note(1, "A", false, &["x"]),
        note(2, "B", false, &["y"]),
        note(3, "C", false, &["x", "y"]),
        note(4, "Old", true, &["z"]),
    ]
}

pub fn session_with(
    notes: Vec<Note>,
    token: Option<&str>,
) -> (NotesSession<FakeBackend>, Arc<MemoryTokenStore>) {
    let store = Arc::new(match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    });
    let tokens: Arc<dyn TokenStore> = store.clone();
    (NotesSession::new(FakeBackend::with_notes(notes), tokens), store)
}

pub async fn loaded_session() -> (NotesSession<FakeBackend>, Arc<MemoryTokenStore>) {
    let (mut session, store) = session_with(seed(), Some("tok"));
    session.load_notes().await.unwrap();
    (session, store)
}

pub fn ids(notes: &[Note]) -> Vec<i64> {
    notes.iter().map(|n| n.id).collect()
}
