//! Notes client library.
//!
//! Everything the `notes` binary does goes through these modules, which are
//! public so tests and other front ends can drive a session directly.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod edit;
pub mod errors;
pub mod format;
pub mod models;
pub mod notes;
pub mod session;
pub mod validation;
pub mod view;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, AuthApi, NoteApi};
pub use auth::{MemoryTokenStore, SledTokenStore, TokenStore};
pub use config::Config;
pub use errors::{ApiError, SessionError};
pub use models::{Note, View};
pub use session::NotesSession;
