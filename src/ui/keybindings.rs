//! Key dispatch for the chat screen.
//!
//! Handlers mutate the controller and view directly; the only thing that
//! escapes to the event loop is a query that needs its endpoint call
//! spawned, or a request to quit.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::conversation::{ConversationController, PendingQuery};
use crate::core::storage::KeyValueStore;
use crate::ui::view::{Focus, ViewState};

const PAGE_ROWS: u16 = 10;

/// Action to take in the main event loop
#[derive(Debug)]
pub enum KeyLoopAction {
    Continue,
    Break,
    /// A query was accepted; its endpoint call must be spawned.
    Dispatch(PendingQuery),
}

pub fn handle_key<S: KeyValueStore>(
    controller: &mut ConversationController<S>,
    view: &mut ViewState,
    key: KeyEvent,
) -> KeyLoopAction {
    if key.kind != KeyEventKind::Press {
        return KeyLoopAction::Continue;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return KeyLoopAction::Break,
        KeyCode::Esc => return KeyLoopAction::Break,
        KeyCode::Char('n') if ctrl => {
            controller.start_new_conversation();
            view.scroll_to_bottom();
            view.focus = Focus::Input;
            view.set_status("New conversation");
            return KeyLoopAction::Continue;
        }
        KeyCode::Tab => {
            view.toggle_focus();
            return KeyLoopAction::Continue;
        }
        KeyCode::PageUp => {
            view.scroll_up(PAGE_ROWS);
            return KeyLoopAction::Continue;
        }
        KeyCode::PageDown => {
            view.scroll_down(PAGE_ROWS);
            return KeyLoopAction::Continue;
        }
        _ => {}
    }

    match view.focus {
        Focus::Input => handle_input_key(controller, view, key),
        Focus::History => handle_history_key(controller, view, key),
    }
}

fn handle_input_key<S: KeyValueStore>(
    controller: &mut ConversationController<S>,
    view: &mut ViewState,
    key: KeyEvent,
) -> KeyLoopAction {
    // The input is read-only while a reply is outstanding.
    if controller.is_pending() {
        return KeyLoopAction::Continue;
    }

    match key.code {
        KeyCode::Enter => match controller.begin_submit_input() {
            Some(pending) => {
                view.status = None;
                view.scroll_to_bottom();
                KeyLoopAction::Dispatch(pending)
            }
            None => KeyLoopAction::Continue,
        },
        KeyCode::Backspace => {
            controller.input_mut().pop();
            KeyLoopAction::Continue
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            controller.input_mut().push(c);
            KeyLoopAction::Continue
        }
        _ => KeyLoopAction::Continue,
    }
}

fn handle_history_key<S: KeyValueStore>(
    controller: &mut ConversationController<S>,
    view: &mut ViewState,
    key: KeyEvent,
) -> KeyLoopAction {
    let count = controller.sessions().len();
    match key.code {
        KeyCode::Up => view.select_previous(),
        KeyCode::Down => view.select_next(count),
        KeyCode::Enter => {
            if let Some(id) = selected_id(controller, view) {
                match controller.load_conversation(&id) {
                    Ok(()) => {
                        view.scroll_to_bottom();
                        view.focus = Focus::Input;
                        view.status = None;
                    }
                    Err(e) => view.set_status(e.to_string()),
                }
            }
        }
        KeyCode::Delete | KeyCode::Char('d') => {
            if let Some(id) = selected_id(controller, view) {
                if controller.delete_conversation(&id) {
                    view.set_status("Conversation deleted");
                }
                view.clamp_selection(controller.sessions().len());
            }
        }
        _ => {}
    }
    KeyLoopAction::Continue
}

fn selected_id<S: KeyValueStore>(
    controller: &ConversationController<S>,
    view: &ViewState,
) -> Option<String> {
    controller
        .sessions()
        .get(view.selected)
        .map(|session| session.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::SubmitOutcome;
    use crate::utils::test_utils::{create_test_controller, ScriptedEndpoint};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text<S: KeyValueStore>(
        controller: &mut ConversationController<S>,
        view: &mut ViewState,
        text: &str,
    ) {
        for c in text.chars() {
            handle_key(controller, view, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn enter_dispatches_typed_query() {
        let mut controller = create_test_controller(ScriptedEndpoint::replies(["hi"]));
        let mut view = ViewState::default();
        type_text(&mut controller, &mut view, "Hello");

        let action = handle_key(&mut controller, &mut view, press(KeyCode::Enter));
        let KeyLoopAction::Dispatch(pending) = action else {
            panic!("expected dispatch");
        };
        assert_eq!(pending.query(), "Hello");
        assert!(controller.is_pending());

        let outcome = controller.finish_submit(pending, Ok("hi".into()));
        assert_eq!(outcome, SubmitOutcome::Completed);
        assert_eq!(controller.input(), "");
    }

    #[test]
    fn typing_and_enter_are_ignored_while_pending() {
        let mut controller = create_test_controller(ScriptedEndpoint::replies(["hi"]));
        let mut view = ViewState::default();
        type_text(&mut controller, &mut view, "Hello");
        let _pending = match handle_key(&mut controller, &mut view, press(KeyCode::Enter)) {
            KeyLoopAction::Dispatch(pending) => pending,
            other => panic!("expected dispatch, got {other:?}"),
        };

        type_text(&mut controller, &mut view, "more");
        assert_eq!(controller.input(), "Hello");
        assert!(matches!(
            handle_key(&mut controller, &mut view, press(KeyCode::Enter)),
            KeyLoopAction::Continue
        ));
    }

    #[test]
    fn blank_enter_does_nothing() {
        let mut controller = create_test_controller(ScriptedEndpoint::replies(["hi"]));
        let mut view = ViewState::default();
        type_text(&mut controller, &mut view, "   ");
        assert!(matches!(
            handle_key(&mut controller, &mut view, press(KeyCode::Enter)),
            KeyLoopAction::Continue
        ));
        assert!(controller.draft_messages().is_empty());
    }

    #[test]
    fn history_enter_loads_and_delete_removes() {
        let mut controller = create_test_controller(ScriptedEndpoint::replies(["a", "b"]));
        let mut view = ViewState::default();
        for query in ["first", "second"] {
            let pending = controller.begin_submit(query).unwrap();
            controller.finish_submit(pending, Ok("reply".into()));
            controller.start_new_conversation();
        }

        handle_key(&mut controller, &mut view, press(KeyCode::Tab));
        handle_key(&mut controller, &mut view, press(KeyCode::Down));
        handle_key(&mut controller, &mut view, press(KeyCode::Enter));
        assert_eq!(controller.draft_messages()[0].text, "first");
        assert_eq!(view.focus, Focus::Input);

        handle_key(&mut controller, &mut view, press(KeyCode::Tab));
        handle_key(&mut controller, &mut view, press(KeyCode::Delete));
        assert_eq!(controller.sessions().len(), 1);
        assert!(controller.draft_messages().is_empty());
        assert_eq!(view.selected, 0);
    }

    #[test]
    fn ctrl_n_starts_new_conversation_and_ctrl_c_quits() {
        let mut controller = create_test_controller(ScriptedEndpoint::replies(["a"]));
        let mut view = ViewState::default();
        let pending = controller.begin_submit("q").unwrap();
        controller.finish_submit(pending, Ok("a".into()));

        handle_key(&mut controller, &mut view, ctrl('n'));
        assert!(controller.draft_messages().is_empty());
        assert!(controller.active_session_id().is_none());
        assert!(matches!(
            handle_key(&mut controller, &mut view, ctrl('c')),
            KeyLoopAction::Break
        ));
    }
}
