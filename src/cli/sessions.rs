//! History commands that work without the chat interface.

use std::error::Error;
use std::io::{self, Write};

use crate::cli::SessionCommands;
use crate::core::message::{Message, Segment};
use crate::core::session::Session;
use crate::core::session_store::SessionStore;
use crate::core::storage::KeyValueStore;

pub fn run_sessions<S: KeyValueStore>(
    mut store: SessionStore<S>,
    command: SessionCommands,
) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match command {
        SessionCommands::List => write_session_list(&mut out, store.sessions())?,
        SessionCommands::Show { id } => match store.get(&id) {
            Some(session) => write_session(&mut out, session)?,
            None => {
                eprintln!("❌ Conversation not found: {id}");
                std::process::exit(1);
            }
        },
        SessionCommands::Delete { id } => {
            if store.try_delete_session(&id)? {
                println!("✅ Deleted conversation {id}");
            } else {
                eprintln!("❌ Conversation not found: {id}");
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

pub fn write_session_list<W: Write>(out: &mut W, sessions: &[Session]) -> io::Result<()> {
    if sessions.is_empty() {
        writeln!(out, "No saved conversations.")?;
        return Ok(());
    }
    for session in sessions {
        writeln!(
            out,
            "{}  {}  {} ({} exchanges)",
            session.id,
            session.created_at.format("%Y-%m-%d %H:%M"),
            session.title,
            session.exchange_count()
        )?;
    }
    Ok(())
}

pub fn write_session<W: Write>(out: &mut W, session: &Session) -> io::Result<()> {
    writeln!(out, "# {}", session.title)?;
    writeln!(out)?;
    for message in &session.messages {
        write_message(out, message)?;
    }
    Ok(())
}

/// Plain-text rendition of a message: user lines are prefixed, code
/// segments are indented and framed.
pub fn write_message<W: Write>(out: &mut W, message: &Message) -> io::Result<()> {
    if message.is_user() {
        writeln!(out, "You: {}", message.text)?;
        writeln!(out)?;
        return Ok(());
    }

    for segment in message.segments_or_text() {
        match segment {
            Segment::Text(content) => {
                write!(out, "{content}")?;
                if !content.ends_with('\n') {
                    writeln!(out)?;
                }
            }
            Segment::Code(content) => {
                writeln!(out, "┌────")?;
                for line in content.lines() {
                    writeln!(out, "│ {line}")?;
                }
                writeln!(out, "└────")?;
            }
        }
    }
    writeln!(out)
}
