//! Interactive chat loop.
//!
//! Key events are handled synchronously against the controller. Endpoint
//! calls run on spawned tasks and report back over a channel, so the screen
//! keeps redrawing while a reply is outstanding.

use std::error::Error;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::core::conversation::{ConversationController, PendingQuery, SubmitOutcome};
use crate::core::endpoint::EndpointError;
use crate::core::storage::KeyValueStore;
use crate::ui::keybindings::{handle_key, KeyLoopAction};
use crate::ui::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::ui::renderer::ui;
use crate::ui::theme::Theme;
use crate::ui::view::ViewState;

type Completion = (PendingQuery, Result<String, EndpointError>);

pub async fn run_chat<S: KeyValueStore>(
    mut controller: ConversationController<S>,
) -> Result<(), Box<dyn Error>> {
    info!(sessions = controller.sessions().len(), "starting chat");
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut controller).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop<S: KeyValueStore>(
    terminal: &mut ChatTerminal,
    controller: &mut ConversationController<S>,
) -> Result<(), Box<dyn Error>> {
    let theme = Theme::dark_default();
    let mut view = ViewState::default();
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();

    loop {
        terminal.draw(|f| ui(f, &*controller, &view, &theme))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                match handle_key(controller, &mut view, key) {
                    KeyLoopAction::Continue => {}
                    KeyLoopAction::Break => break,
                    KeyLoopAction::Dispatch(pending) => {
                        spawn_query(controller, pending, tx.clone());
                    }
                }
            }
        }

        while let Ok((pending, result)) = rx.try_recv() {
            let outcome = controller.finish_submit(pending, result);
            debug!(?outcome, "query finished");
            if outcome == SubmitOutcome::Failed {
                view.set_status("Request failed");
            }
            view.clamp_selection(controller.sessions().len());
        }
    }

    Ok(())
}

fn spawn_query<S: KeyValueStore>(
    controller: &ConversationController<S>,
    pending: PendingQuery,
    tx: mpsc::UnboundedSender<Completion>,
) {
    let endpoint = controller.endpoint();
    tokio::spawn(async move {
        let result = endpoint.generate(pending.query()).await;
        // The receiver is gone only when the UI has quit.
        let _ = tx.send((pending, result));
    });
}
