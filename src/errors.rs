//! Error types for every layer of the client.

use std::fmt;
use thiserror::Error;

// ============================================================================
// Configuration & Storage
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API URL configured; pass --api-url or set NOTES_API_URL")]
    MissingApiUrl,

    #[error("invalid API URL {0}")]
    InvalidApiUrl(String),

    #[error("unsupported API URL scheme: {0}")]
    UnsupportedScheme(String),
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token storage error: {0}")]
    Sled(#[from] sled::Error),

    #[error("stored token is not valid UTF-8")]
    Corrupt,
}

// ============================================================================
// API Errors
// ============================================================================

pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required. Please login again.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered 401; the stored credential is no longer valid.
    #[error("Authentication required. Please login again.")]
    AuthRequired,

    /// Any other non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_auth_required(&self) -> bool {
        matches!(self, ApiError::AuthRequired)
    }
}

// ============================================================================
// Validation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Content,
    Username,
    Password,
    ConfirmPassword,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Title => write!(f, "title"),
            Field::Content => write!(f, "content"),
            Field::Username => write!(f, "username"),
            Field::Password => write!(f, "password"),
            Field::ConfirmPassword => write!(f, "confirm password"),
        }
    }
}

/// Field-level messages produced by client-side form checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<(Field, String)>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: Field, message: &str) {
        self.errors.push((field, message.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message attached to a field, if any.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|(_, m)| m.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// Session Errors (what the user sees)
// ============================================================================

/// The user action a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Fetch,
    Create,
    Update,
    Edit,
    Archive,
    ToggleArchive,
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Load | Action::Fetch => "view",
            Action::Create => "create",
            Action::Update => "update",
            Action::Edit => "edit",
            Action::Archive | Action::ToggleArchive => "archive",
            Action::Delete => "delete",
        }
    }

    fn failure(self) -> &'static str {
        match self {
            Action::Load => "Failed to load notes. Please try again later.",
            Action::Fetch => "Failed to load note. Please try again.",
            Action::Create => "Failed to create note. Please try again.",
            Action::Update | Action::Edit | Action::Archive => {
                "Failed to update note. Please try again."
            }
            Action::ToggleArchive => "Failed to toggle archive status. Please try again.",
            Action::Delete => "Failed to delete note. Please try again.",
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("You must be logged in to {} notes.", .0.verb())]
    NotAuthenticated(Action),

    #[error("Your session has expired. Please login again.")]
    SessionExpired,

    #[error("{}", .0.failure())]
    Failed(Action),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid username or password")]
    LoginRejected,

    #[error("An error occurred during login")]
    LoginFailed,

    #[error("Username already exists or registration failed")]
    RegistrationRejected,

    #[error(transparent)]
    Store(#[from] TokenStoreError),
}
