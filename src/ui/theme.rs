use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub code_block_style: Style,
    pub error_text_style: Style,
    pub system_text_style: Style,

    // Chrome
    pub title_style: Style,
    pub pending_indicator_style: Style,
    pub border_style: Style,
    pub focused_border_style: Style,

    // History list
    pub session_style: Style,
    pub active_session_style: Style,
    pub selection_highlight_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_disabled_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            code_block_style: Style::default().fg(Color::Gray).bg(Color::Rgb(40, 44, 52)),
            error_text_style: Style::default().fg(Color::LightRed),
            system_text_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            pending_indicator_style: Style::default().fg(Color::Yellow),
            border_style: Style::default().fg(Color::DarkGray),
            focused_border_style: Style::default().fg(Color::Cyan),

            session_style: Style::default().fg(Color::Gray),
            active_session_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            selection_highlight_style: Style::default().add_modifier(Modifier::REVERSED),

            input_text_style: Style::default().fg(Color::White),
            input_disabled_style: Style::default().fg(Color::DarkGray),
        }
    }
}
