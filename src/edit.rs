//! Single-target edit session and the two-step delete gate.

use crate::models::Note;

// ============================================================================
// Edit Session
// ============================================================================

/// At most one note is editable at a time. There are no drafts: opening
/// another note drops whatever was in progress.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    target: Option<Note>,
}

impl EditSession {
    pub fn begin(&mut self, note: Note) {
        if let Some(previous) = self.target.replace(note) {
            log::debug!("Discarding in-progress edit of note {}", previous.id);
        }
    }

    pub fn cancel(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<&Note> {
        self.target.as_ref()
    }

    pub fn is_editing(&self, id: i64) -> bool {
        self.target.as_ref().is_some_and(|n| n.id == id)
    }
}

// ============================================================================
// Delete Confirmation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    pub note_id: i64,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn note(id: i64) -> Note {
        Note {
            id,
            title: "t".to_string(),
            content: "c".to_string(),
            is_archived: false,
            tags: Vec::new(),
            creation_date: Utc::now(),
        }
    }

    #[test]
    fn test_begin_replaces_target() {
        let mut session = EditSession::default();
        session.begin(note(1));
        session.begin(note(2));
        assert!(session.is_editing(2));
        assert!(!session.is_editing(1));
        session.cancel();
        assert!(session.target().is_none());
    }
}
