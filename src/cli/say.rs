//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use crate::cli::sessions::write_message;
use crate::core::conversation::{ConversationController, SubmitOutcome};
use crate::core::storage::KeyValueStore;

/// Sends `prompt` as the first exchange of a new conversation and prints
/// the reply. Returns `false` when the endpoint failed.
pub async fn run_say<S: KeyValueStore>(
    controller: &mut ConversationController<S>,
    prompt: &str,
) -> Result<bool, Box<dyn Error>> {
    let outcome = controller.submit_query(prompt).await;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(reply) = controller.draft_messages().last().filter(|m| m.is_ai()) {
        write_message(&mut out, reply)?;
    }
    out.flush()?;

    Ok(outcome == SubmitOutcome::Completed)
}
