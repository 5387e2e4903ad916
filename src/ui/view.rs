//! Interaction state that belongs to the terminal UI rather than the
//! conversation: focus, history selection, scroll and status text.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    History,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub focus: Focus,
    pub selected: usize,
    /// Rows scrolled up from the bottom of the transcript.
    pub scroll_from_bottom: u16,
    pub status: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            focus: Focus::Input,
            selected: 0,
            scroll_from_bottom: 0,
            status: None,
        }
    }
}

impl ViewState {
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::History,
            Focus::History => Focus::Input,
        };
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self, count: usize) {
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
    }

    /// Keep the selection inside a list that may have shrunk.
    pub fn clamp_selection(&mut self, count: usize) {
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(rows);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(rows);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }
}
