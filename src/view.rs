//! Which view is shown and which tags filter it.

use crate::models::{Note, View};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub active_view: View,
    /// Selection order is kept for display; membership is set-like.
    pub selected_tags: Vec<String>,
}

impl ViewState {
    /// Switch views. Returns `false` when the view is already selected.
    pub fn select(&mut self, view: View) -> bool {
        if self.active_view == view {
            return false;
        }
        self.active_view = view;
        true
    }

    /// Add the tag if absent, remove it if present.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.selected_tags.iter().position(|t| t == tag) {
            self.selected_tags.remove(pos);
        } else {
            self.selected_tags.push(tag.to_string());
        }
    }

    /// Add the tag unless it is already selected. Returns `false` if it was.
    pub fn select_tag(&mut self, tag: &str) -> bool {
        if self.is_selected(tag) {
            return false;
        }
        self.selected_tags.push(tag.to_string());
        true
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected_tags.iter().any(|t| t == tag)
    }

    /// OR filter: a note is visible when it carries any selected tag, or when
    /// nothing is selected.
    pub fn matches(&self, note: &Note) -> bool {
        self.selected_tags.is_empty() || note.has_any_tag(&self.selected_tags)
    }

    pub fn visible<'a>(&self, notes: &'a [Note]) -> Vec<&'a Note> {
        notes.iter().filter(|n| self.matches(n)).collect()
    }
}

/// Every distinct tag across the loaded notes, in first-seen order.
pub fn all_tags(notes: &[Note]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in notes.iter().flat_map(|n| n.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn note(id: i64, tags: &[&str]) -> Note {
        Note {
            id,
            title: format!("note {}", id),
            content: "body".to_string(),
            is_archived: false,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            creation_date: Utc::now(),
        }
    }

    fn ids(notes: Vec<&Note>) -> Vec<i64> {
        notes.into_iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_tag_filter_is_or() {
        let notes = vec![note(1, &["x"]), note(2, &["y"]), note(3, &["x", "y"])];
        let mut view = ViewState::default();

        assert_eq!(ids(view.visible(&notes)), vec![1, 2, 3]);

        view.toggle_tag("x");
        assert_eq!(ids(view.visible(&notes)), vec![1, 3]);

        view.toggle_tag("y");
        assert_eq!(ids(view.visible(&notes)), vec![1, 2, 3]);

        view.toggle_tag("x");
        view.toggle_tag("y");
        assert!(view.selected_tags.is_empty());
        assert_eq!(ids(view.visible(&notes)), vec![1, 2, 3]);
    }

    #[test]
    fn test_untagged_notes_hidden_by_filter() {
        let notes = vec![note(1, &[]), note(2, &["x"])];
        let mut view = ViewState::default();
        view.toggle_tag("x");
        assert_eq!(ids(view.visible(&notes)), vec![2]);
    }

    #[test]
    fn test_toggle_is_symmetric() {
        let mut view = ViewState::default();
        view.toggle_tag("a");
        view.toggle_tag("b");
        assert!(view.is_selected("a"));
        view.toggle_tag("a");
        assert!(!view.is_selected("a"));
        assert_eq!(view.selected_tags, vec!["b"]);
    }

    #[test]
    fn test_select_tag_is_idempotent() {
        let mut view = ViewState::default();
        assert!(view.select_tag("x"));
        assert!(!view.select_tag("x"));
        assert_eq!(view.selected_tags, vec!["x"]);
    }

    #[test]
    fn test_select_same_view_is_noop() {
        let mut view = ViewState::default();
        assert!(!view.select(View::Active));
        assert!(view.select(View::Archived));
        assert!(!view.select(View::Archived));
        assert_eq!(view.active_view, View::Archived);
    }

    #[test]
    fn test_all_tags_dedupes_in_first_seen_order() {
        let notes = vec![note(1, &["b", "a"]), note(2, &["a", "c", "b"]), note(3, &[])];
        assert_eq!(all_tags(&notes), vec!["b", "a", "c"]);
        assert!(all_tags(&[]).is_empty());
    }
}
