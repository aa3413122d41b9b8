use crate::theme::Theme;
use crate::ui::widget::{Widget, WidgetResult, centered_rect, create_dialog_block};
use crate::ui_state::ConfirmationState;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Clear, Paragraph},
};

impl Widget for ConfirmationState {
    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let width = (self.title.len().max(self.message.len()) as u16 + 4).max(32);
        let popup = centered_rect(width, 5, area);
        let block = create_dialog_block(&format!(" {} ", self.title), theme);

        let lines = vec![
            Line::styled(
                self.message.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::from(""),
            Line::styled(
                "y/Enter: Proceed  |  n/Esc: Cancel",
                Style::default().fg(theme.highlight_fg),
            ),
        ];

        f.render_widget(Clear, popup);
        f.render_widget(
            Paragraph::new(lines)
                .alignment(ratatui::layout::Alignment::Center)
                .block(block),
            popup,
        );
    }

    /// Cancelling closes the dialog and leaves everything untouched.
    fn handle_input(&mut self, key: KeyEvent) -> WidgetResult {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => WidgetResult::Close,
            KeyCode::Enter | KeyCode::Char('y') => WidgetResult::Confirmed(self.action),
            _ => WidgetResult::Handled,
        }
    }
}
