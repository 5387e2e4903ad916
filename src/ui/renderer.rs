use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::core::conversation::ConversationController;
use crate::core::storage::KeyValueStore;
use crate::ui::theme::Theme;
use crate::ui::transcript::build_transcript_lines;
use crate::ui::view::{Focus, ViewState};

const SIDEBAR_WIDTH: u16 = 34;

pub fn ui<S: KeyValueStore>(
    f: &mut Frame,
    controller: &ConversationController<S>,
    view: &ViewState,
    theme: &Theme,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(f.area());

    render_history(f, columns[0], controller, view, theme);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(columns[1]);

    render_transcript(f, rows[0], controller, view, theme);
    render_input(f, rows[1], controller, view, theme);
}

fn border_style(theme: &Theme, focused: bool) -> ratatui::style::Style {
    if focused {
        theme.focused_border_style
    } else {
        theme.border_style
    }
}

fn render_history<S: KeyValueStore>(
    f: &mut Frame,
    area: Rect,
    controller: &ConversationController<S>,
    view: &ViewState,
    theme: &Theme,
) {
    let active = controller.active_session_id();
    let items: Vec<ListItem> = controller
        .sessions()
        .iter()
        .map(|session| {
            let is_active = active == Some(session.id.as_str());
            let (marker, style) = if is_active {
                ("● ", theme.active_session_style)
            } else {
                ("  ", theme.session_style)
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(session.title.clone(), style),
            ]))
        })
        .collect();

    let focused = view.focus == Focus::History;
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(theme, focused))
                .title(Span::styled("History (Ctrl+N new)", theme.title_style)),
        )
        .highlight_style(theme.selection_highlight_style);

    let mut state = ListState::default();
    if focused && !controller.sessions().is_empty() {
        state.select(Some(view.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn render_transcript<S: KeyValueStore>(
    f: &mut Frame,
    area: Rect,
    controller: &ConversationController<S>,
    view: &ViewState,
    theme: &Theme,
) {
    let title = format!("SHAN AI v{}", env!("CARGO_PKG_VERSION"));
    let block = Block::default().title(Span::styled(title, theme.title_style));

    let mut lines = if controller.draft_messages().is_empty() && !controller.is_pending() {
        vec![
            Line::from(Span::styled("SHAN AI", theme.title_style)),
            Line::from(Span::styled(
                "Ask me anything and I'll do my best to help!",
                theme.system_text_style,
            )),
        ]
    } else {
        build_transcript_lines(controller.draft_messages(), theme, area.width)
    };
    if controller.is_pending() {
        lines.push(Line::from(Span::styled(
            "Waiting for reply…",
            theme.pending_indicator_style,
        )));
    }

    // Title row only, no borders. Rows are already wrapped to the width.
    let available_height = area.height.saturating_sub(1);
    let max_offset = u16::try_from(lines.len())
        .unwrap_or(u16::MAX)
        .saturating_sub(available_height);
    let scroll_offset = max_offset.saturating_sub(view.scroll_from_bottom);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll_offset, 0));
    f.render_widget(paragraph, area);
}

fn render_input<S: KeyValueStore>(
    f: &mut Frame,
    area: Rect,
    controller: &ConversationController<S>,
    view: &ViewState,
    theme: &Theme,
) {
    let focused = view.focus == Focus::Input;
    let pending = controller.is_pending();

    let title = if pending {
        "Waiting for reply… (Ctrl+C to quit)".to_string()
    } else if let Some(status) = &view.status {
        format!("{status} • Enter to send, Tab for history")
    } else {
        "Message Gemini… (Enter to send, Tab for history, Ctrl+C to quit)".to_string()
    };
    let title_style = if pending {
        theme.pending_indicator_style
    } else {
        theme.title_style
    };
    let text_style = if pending {
        theme.input_disabled_style
    } else {
        theme.input_text_style
    };

    let input = Paragraph::new(controller.input())
        .style(text_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(theme, focused))
                .title(Span::styled(title, title_style)),
        );
    f.render_widget(input, area);

    if focused && !pending {
        let cursor_x = u16::try_from(unicode_width::UnicodeWidthStr::width(controller.input()))
            .unwrap_or(u16::MAX);
        let max_x = area.width.saturating_sub(2);
        f.set_cursor_position((area.x + 1 + cursor_x.min(max_x), area.y + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{create_test_controller, ScriptedEndpoint};
    use ratatui::{backend::TestBackend, Terminal};

    fn render<S: KeyValueStore>(
        controller: &ConversationController<S>,
        view: &ViewState,
        width: u16,
        height: u16,
    ) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark_default();
        terminal
            .draw(|f| ui(f, controller, view, &theme))
            .unwrap();
        terminal
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render_to_string<S: KeyValueStore>(
        controller: &ConversationController<S>,
        view: &ViewState,
    ) -> String {
        screen_text(&render(controller, view, 100, 20))
    }

    #[test]
    fn empty_conversation_shows_welcome() {
        let controller = create_test_controller(ScriptedEndpoint::replies([]));
        let screen = render_to_string(&controller, &ViewState::default());
        assert!(screen.contains("Ask me anything"));
    }

    #[test]
    fn history_and_transcript_are_drawn() {
        let mut controller = create_test_controller(ScriptedEndpoint::replies([]));
        let pending = controller.begin_submit("Hello").unwrap();
        controller.finish_submit(pending, Ok("Hi!\n```print(1)```".into()));

        let screen = render_to_string(&controller, &ViewState::default());
        assert!(screen.contains("● Hello"));
        assert!(screen.contains("You: Hello"));
        assert!(screen.contains("print(1)"));
    }

    #[test]
    fn pending_state_is_announced() {
        let mut controller = create_test_controller(ScriptedEndpoint::replies([]));
        let _pending = controller.begin_submit("Hello").unwrap();
        let screen = render_to_string(&controller, &ViewState::default());
        assert!(screen.contains("Waiting for reply"));
    }

    #[test]
    fn newest_reply_is_visible_after_long_wrapped_replies() {
        let mut controller = create_test_controller(ScriptedEndpoint::replies([]));
        for i in 0..3 {
            let pending = controller.begin_submit(&format!("question {i}")).unwrap();
            let reply = format!("{}\nEND{i}MARK", "lorem ipsumdolor ".repeat(60));
            controller.finish_submit(pending, Ok(reply));
        }

        let screen = screen_text(&render(&controller, &ViewState::default(), 80, 20));
        assert!(screen.contains("END2MARK"), "{screen}");
    }

    #[test]
    fn cursor_stays_inside_input_for_huge_input() {
        use ratatui::backend::Backend;

        let mut controller = create_test_controller(ScriptedEndpoint::replies([]));
        controller.set_input("x".repeat(usize::from(u16::MAX) + 1));
        let mut terminal = render(&controller, &ViewState::default(), 100, 20);
        let position = terminal.backend_mut().get_cursor_position().unwrap();
        // Input box spans columns 34..100 and rows 17..20.
        assert_eq!(position.x, 34 + 1 + 64);
        assert_eq!(position.y, 18);
    }
}
