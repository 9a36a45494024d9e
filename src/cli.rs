//! Command-line front end.
//!
//! Each invocation is one short session: the persisted token is picked up,
//! the command runs through [`NotesSession`], and the outcome is printed.

use crate::api::{ApiClient, AuthApi, NoteApi};
use crate::auth::{SledTokenStore, TokenStore};
use crate::config::Config;
use crate::format::{render_list, render_note, render_tags};
use crate::models::{Credentials, NoteForm, RegisterForm, View};
use crate::session::{NotesSession, Submitted};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "notes", version, about = "Manage notes stored on a remote notes API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API origin, e.g. https://notes.example.com (defaults to $NOTES_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where the login token is kept (defaults to $NOTES_TOKEN_DB or .notes_client_db)
    #[arg(long, global = true)]
    pub token_db: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and remember the token
    Login {
        #[arg(short, long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: Option<String>,
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// Show whether a token is stored
    Status,
    /// List notes in a view, optionally filtered by tags (any match)
    List {
        #[arg(long)]
        archived: bool,
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// List the tags used by notes in a view
    Tags {
        #[arg(long)]
        archived: bool,
    },
    /// Show one note
    Show { id: i64 },
    /// Create a note
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
        /// Comma-separated
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Change a note's title, content or tags
    Edit {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
        /// Comma-separated; replaces the existing tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Move a note to the archive
    Archive { id: i64 },
    /// Move a note back to the active notes
    Unarchive { id: i64 },
    /// Flip a note's archive flag on the server
    ToggleArchive { id: i64 },
    /// Delete a note after confirmation
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

// ============================================================================
// Entry Point
// ============================================================================

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::resolve(cli.api_url, cli.token_db)?;
    let tokens: Arc<dyn TokenStore> =
        Arc::new(SledTokenStore::open(&config.token_db, config.origin())?);
    let api = ApiClient::new(&config, tokens.clone())?;
    let mut session = NotesSession::new(api, tokens);

    log::debug!("Using API at {}", config.origin());
    let stdin = io::stdin();
    execute(cli.command, &mut session, &mut stdin.lock(), &mut io::stdout()).await
}

fn require_login<B: NoteApi + AuthApi>(session: &NotesSession<B>) -> Result<(), Box<dyn Error>> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err("Not logged in. Run `notes login` first.".into())
    }
}

/// Run one command. Prompts read from `input`; everything shown to the user
/// goes to `out`.
pub async fn execute<B, R, W>(
    command: Commands,
    session: &mut NotesSession<B>,
    input: &mut R,
    out: &mut W,
) -> Result<(), Box<dyn Error>>
where
    B: NoteApi + AuthApi,
    R: BufRead,
    W: Write,
{
    match command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_line("Password: ", input, out)?,
            };
            session.login(Credentials { username, password }).await?;
            writeln!(out, "Logged in. {} active note(s).", session.notes().len())?;
        }
        Commands::Register {
            username,
            password,
            confirm,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt_line("Password: ", input, out)?,
            };
            let confirm_password = match confirm {
                Some(c) => c,
                None => prompt_line("Confirm password: ", input, out)?,
            };
            let form = RegisterForm {
                username,
                password,
                confirm_password,
            };
            session.register(&form).await?;
            writeln!(
                out,
                "Registered {}. Log in with `notes login -u {}`.",
                form.username, form.username
            )?;
        }
        Commands::Logout => {
            session.logout()?;
            writeln!(out, "Logged out.")?;
        }
        Commands::Status => {
            if session.is_authenticated() {
                writeln!(out, "Logged in.")?;
            } else {
                writeln!(out, "Not logged in.")?;
            }
        }
        Commands::List { archived, tags } => {
            require_login(session)?;
            let view = View::from_archived(archived);
            show_view(session, view).await?;
            for tag in &tags {
                session.select_tag(tag);
            }
            let visible = session.visible_notes();
            write!(
                out,
                "{}",
                render_list(view, &visible, session.editing().map(|n| n.id))
            )?;
        }
        Commands::Tags { archived } => {
            require_login(session)?;
            show_view(session, View::from_archived(archived)).await?;
            write!(out, "{}", render_tags(&session.all_tags(), session.view_state()))?;
        }
        Commands::Show { id } => {
            require_login(session)?;
            let note = session.fetch_note(id).await?;
            write!(out, "{}", render_note(&note))?;
        }
        Commands::Add {
            title,
            content,
            tags,
        } => {
            require_login(session)?;
            let form = NoteForm {
                title,
                content,
                tags,
            };
            if let Submitted::Created(note) = session.submit_form(&form).await? {
                writeln!(out, "Created note {} ({})", note.id, note.title)?;
            }
        }
        Commands::Edit {
            id,
            title,
            content,
            tags,
        } => {
            require_login(session)?;
            let note = session.fetch_note(id).await?;
            show_view(session, View::of(&note)).await?;

            let mut form = NoteForm::from_note(&note);
            if let Some(t) = title {
                form.title = t;
            }
            if let Some(c) = content {
                form.content = c;
            }
            if let Some(t) = tags {
                form.tags = t;
            }

            session.begin_edit(note)?;
            if let Submitted::Updated(updated) = session.submit_form(&form).await? {
                writeln!(out, "Updated note {} ({})", updated.id, updated.title)?;
            }
            report_banner(session, out)?;
        }
        Commands::Archive { id } => set_archived(session, id, true, out).await?,
        Commands::Unarchive { id } => set_archived(session, id, false, out).await?,
        Commands::ToggleArchive { id } => {
            require_login(session)?;
            session.load_notes().await?;
            session.toggle_archive(id).await?;
            writeln!(out, "Toggled archive status of note {}", id)?;
            report_banner(session, out)?;
        }
        Commands::Delete { id, yes } => {
            require_login(session)?;
            let note = session.fetch_note(id).await?;
            show_view(session, View::of(&note)).await?;
            session.request_delete(note.id, &note.title)?;

            let question = format!(
                "Delete note '{}'? This cannot be undone. [y/N] ",
                note.title
            );
            let confirmed = yes || confirm(&question, input, out)?;

            if confirmed {
                if let Some(deleted) = session.confirm_delete().await? {
                    writeln!(out, "Deleted note {}", deleted)?;
                }
            } else {
                session.cancel_delete();
                writeln!(out, "Cancelled.")?;
            }
        }
    }
    Ok(())
}

/// Select `view` and make sure its notes are loaded.
async fn show_view<B: NoteApi + AuthApi>(
    session: &mut NotesSession<B>,
    view: View,
) -> Result<(), Box<dyn Error>> {
    if session.active_view() == view {
        session.load_notes().await?;
    } else {
        session.select_view(view).await?;
    }
    Ok(())
}

async fn set_archived<B: NoteApi + AuthApi, W: Write>(
    session: &mut NotesSession<B>,
    id: i64,
    archived: bool,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    require_login(session)?;
    let note = session.fetch_note(id).await?;
    if note.is_archived == archived {
        let state = if archived { "archived" } else { "active" };
        writeln!(out, "Note {} is already {}.", id, state)?;
        return Ok(());
    }
    show_view(session, View::of(&note)).await?;
    let updated = session.archive_note(&note).await?;
    writeln!(out, "Note {} moved to {}", updated.id, View::of(&updated))?;
    report_banner(session, out)?;
    Ok(())
}

/// A change can succeed while the reload after it fails (or ends the
/// session); say so instead of leaving it to the log.
fn report_banner<B: NoteApi + AuthApi, W: Write>(
    session: &NotesSession<B>,
    out: &mut W,
) -> io::Result<()> {
    match session.error() {
        Some(message) => writeln!(out, "Warning: {}", message),
        None => Ok(()),
    }
}

// ============================================================================
// Prompts
// ============================================================================

fn prompt_line(prompt: &str, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<String> {
    out.write_all(prompt.as_bytes())?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
pub fn confirm(question: &str, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    out.write_all(question.as_bytes())?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod cli_test;
