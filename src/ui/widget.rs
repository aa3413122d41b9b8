use crate::theme::Theme;
use crate::ui_state::{MenuAction, NumberPurpose, PendingAction};
use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders},
};

/// What a popup did with a keystroke. `Close` dismisses the widget with
/// nothing to do; the payload variants carry the user's answer out to the
/// event loop, which executes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetResult {
    Handled,
    Close,
    Action(MenuAction),
    Confirmed(PendingAction),
    Answered { purpose: NumberPurpose, value: u64 },
}

/// A popup drawn over the panes. While one is open it owns the keyboard.
pub trait Widget {
    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme);
    fn handle_input(&mut self, key: KeyEvent) -> WidgetResult;
}

/// Fixed-size popup rect centered in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

pub fn create_dialog_block(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(Style::default().fg(theme.dialog_border))
        .style(Style::default().bg(theme.dialog_bg).fg(theme.dialog_fg))
}
