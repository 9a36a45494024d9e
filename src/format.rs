//! Plain-text rendering of notes for the terminal.

use crate::models::{Note, View};
use crate::view::ViewState;
use chrono::{DateTime, Local, Utc};

const PREVIEW_CHARS: usize = 60;

/// Long local date, e.g. "March 5, 2024".
pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    match date {
        Some(d) => d.with_timezone(&Local).format("%B %-d, %Y").to_string(),
        None => "Date unavailable".to_string(),
    }
}

fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    if first_line.chars().count() <= PREVIEW_CHARS {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(PREVIEW_CHARS - 1).collect();
        format!("{}…", cut)
    }
}

fn tag_list(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One block per note under a view heading.
pub fn render_list(view: View, notes: &[&Note], editing: Option<i64>) -> String {
    let mut out = format!("{}\n", view);
    if notes.is_empty() {
        out.push_str("  (no notes)\n");
        return out;
    }
    for note in notes {
        let marker = if editing == Some(note.id) { "*" } else { " " };
        out.push_str(&format!(
            "{}[{}] {}  ({})\n",
            marker,
            note.id,
            note.title,
            format_date(Some(&note.creation_date))
        ));
        out.push_str(&format!("     {}\n", preview(&note.content)));
        if !note.tags.is_empty() {
            out.push_str(&format!("     {}\n", tag_list(&note.tags)));
        }
    }
    out
}

pub fn render_note(note: &Note) -> String {
    let status = if note.is_archived { "archived" } else { "active" };
    let mut out = format!(
        "[{}] {}\nCreated: {}\nStatus: {}\n",
        note.id,
        note.title,
        format_date(Some(&note.creation_date)),
        status
    );
    if !note.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", tag_list(&note.tags)));
    }
    out.push_str("---\n");
    out.push_str(&note.content);
    if !note.content.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Tag cloud with the currently selected tags marked.
pub fn render_tags(tags: &[String], view: &ViewState) -> String {
    if tags.is_empty() {
        return "(no tags)\n".to_string();
    }
    tags.iter()
        .map(|t| {
            if view.is_selected(t) {
                format!("[#{}]\n", t)
            } else {
                format!(" #{}\n", t)
            }
        })
        .collect()
}
