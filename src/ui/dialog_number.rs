use crate::theme::Theme;
use crate::ui::widget::{Widget, WidgetResult, centered_rect};
use crate::ui_state::NumberPromptState;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

impl Widget for NumberPromptState {
    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let width = (self.prompt.len() as u16 + 4).max(28);
        let popup = centered_rect(width, 4, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.dialog_border))
            .style(Style::default().bg(theme.dialog_bg).fg(theme.dialog_fg));

        let lines = vec![
            Line::styled(
                self.prompt.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                format!("> {}", self.input),
                Style::default().fg(theme.highlight_fg),
            ),
        ];

        f.render_widget(Clear, popup);
        f.render_widget(Paragraph::new(lines).block(block), popup);
    }

    /// Enter hands the parsed answer to the caller. Input that does not
    /// parse counts as zero, which every caller treats as "do nothing".
    fn handle_input(&mut self, key: KeyEvent) -> WidgetResult {
        match key.code {
            KeyCode::Esc => WidgetResult::Close,
            KeyCode::Enter => WidgetResult::Answered {
                purpose: self.purpose,
                value: self.input.parse::<u64>().unwrap_or(0),
            },
            KeyCode::Backspace => {
                self.input.pop();
                WidgetResult::Handled
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.input.len() < 20 {
                    self.input.push(c);
                }
                WidgetResult::Handled
            }
            _ => WidgetResult::Handled,
        }
    }
}
