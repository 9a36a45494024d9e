//! The in-memory list of notes for the currently selected view.
//!
//! This is a cache of the server's records. It is replaced wholesale on a
//! re-fetch and patched locally after mutations that cannot change view
//! membership.

use crate::models::Note;

#[derive(Debug, Clone, Default)]
pub struct NoteList {
    notes: Vec<Note>,
}

impl NoteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Replace the whole list with a fresh fetch result.
    pub fn replace(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    pub fn append(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Overwrite the entry with the same id. Returns `false` if absent.
    pub fn patch(&mut self, note: Note) -> bool {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(slot) => {
                *slot = note;
                true
            }
            None => false,
        }
    }

    /// Splice out the entry with this id. Returns `false` if absent.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() != before
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn note(id: i64, title: &str) -> Note {
        Note {
            id,
            title: title.to_string(),
            content: "c".to_string(),
            is_archived: false,
            tags: Vec::new(),
            creation_date: Utc::now(),
        }
    }

    #[test]
    fn test_patch_in_place_keeps_order() {
        let mut list = NoteList::new();
        list.replace(vec![note(1, "a"), note(2, "b"), note(3, "c")]);

        assert!(list.patch(note(2, "B")));
        let titles: Vec<&str> = list.as_slice().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "B", "c"]);

        assert!(!list.patch(note(9, "missing")));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_remove_by_id() {
        let mut list = NoteList::new();
        list.append(note(1, "a"));
        list.append(note(2, "b"));

        assert!(list.remove(1));
        assert!(!list.remove(1));
        assert!(list.get(1).is_none());
        assert_eq!(list.get(2).map(|n| n.title.as_str()), Some("b"));
    }

    #[test]
    fn test_replace_and_clear() {
        let mut list = NoteList::new();
        list.append(note(1, "a"));
        list.replace(vec![note(5, "e")]);
        assert_eq!(list.as_slice()[0].id, 5);
        list.clear();
        assert!(list.is_empty());
    }
}
