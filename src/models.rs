//! Data models for the notes client.
//!
//! Wire types mirror the JSON the notes API speaks (camelCase field names).
//! Form types carry raw user input before validation.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Core Note Types
// ============================================================================

/// A note as stored by the server. `id` and `creation_date` are assigned
/// server-side and never generated by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default, deserialize_with = "nullable_tags")]
    pub tags: Vec<String>,
    #[serde(default = "Utc::now", deserialize_with = "lenient_date")]
    pub creation_date: DateTime<Utc>,
}

impl Note {
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }
}

/// A note that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub is_archived: bool,
    pub tags: Vec<String>,
}

impl NoteDraft {
    /// New notes always start out active.
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            is_archived: false,
            tags,
        }
    }
}

/// PUT body: the note without its creation date, which the server does not
/// accept back.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate<'a> {
    pub id: i64,
    pub title: &'a str,
    pub content: &'a str,
    pub is_archived: bool,
    pub tags: &'a [String],
}

impl<'a> From<&'a Note> for NoteUpdate<'a> {
    fn from(note: &'a Note) -> Self {
        Self {
            id: note.id,
            title: &note.title,
            content: &note.content,
            is_archived: note.is_archived,
            tags: &note.tags,
        }
    }
}

// ============================================================================
// Views
// ============================================================================

/// Active and archived notes come from different endpoints and are never
/// mixed in one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Active,
    Archived,
}

impl View {
    pub fn from_archived(archived: bool) -> Self {
        if archived {
            View::Archived
        } else {
            View::Active
        }
    }

    pub fn is_archived(self) -> bool {
        self == View::Archived
    }

    /// The view a note belongs to.
    pub fn of(note: &Note) -> Self {
        Self::from_archived(note.is_archived)
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Active => write!(f, "Active Notes"),
            View::Archived => write!(f, "Archived Notes"),
        }
    }
}

// ============================================================================
// Auth Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Optional JSON error payload returned by the API on failures.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

// ============================================================================
// Form Input
// ============================================================================

/// Raw note form input. Tags are a comma-separated string as typed.
#[derive(Debug, Clone, Default)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    pub tags: String,
}

impl NoteForm {
    /// Prefill the form from an existing note.
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags.join(", "),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

// ============================================================================
// Lenient Parsing
// ============================================================================

/// Parse a creation date as sent by the server. Accepts RFC 3339 and
/// offset-less ISO 8601 (taken as UTC).
pub fn parse_creation_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

// Missing or unparseable dates become "now"; the note is never dropped.
fn lenient_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(serde_json::Value::String(s)) => parse_creation_date(&s),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(Utc::now))
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
