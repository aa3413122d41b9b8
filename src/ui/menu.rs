use crate::theme::Theme;
use crate::ui::widget::{Widget, WidgetResult, centered_rect};
use crate::ui_state::{MenuAction, MenuState};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

impl Widget for MenuState {
    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let items = MenuAction::all();
        let popup = centered_rect(26, items.len() as u16 + 3, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.dialog_border))
            .style(Style::default().bg(theme.dialog_bg).fg(theme.menu_fg));

        let mut lines = vec![Line::from("Use arrows, Enter, Esc")];
        for (i, (_, label, shortcut)) in items.iter().enumerate() {
            let text = format!(" {:<18} ({})", label, shortcut);
            let line = if i == self.selected {
                Line::styled(
                    text,
                    Style::default()
                        .bg(theme.menu_selected_bg)
                        .fg(theme.menu_selected_fg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Line::from(text)
            };
            lines.push(line);
        }

        f.render_widget(Clear, popup);
        f.render_widget(Paragraph::new(lines).block(block), popup);
    }

    /// A chosen entry closes the menu and hands the action to the caller.
    fn handle_input(&mut self, key: KeyEvent) -> WidgetResult {
        match key.code {
            KeyCode::Esc => {
                self.close();
                WidgetResult::Close
            }
            KeyCode::Down => {
                self.next();
                WidgetResult::Handled
            }
            KeyCode::Up => {
                self.previous();
                WidgetResult::Handled
            }
            KeyCode::Enter => {
                let (action, _, _) = MenuAction::all()[self.selected];
                self.close();
                WidgetResult::Action(action)
            }
            KeyCode::Char(c) => {
                let c = c.to_ascii_lowercase();
                for &(action, _, shortcut) in MenuAction::all() {
                    if c == shortcut {
                        self.close();
                        return WidgetResult::Action(action);
                    }
                }
                WidgetResult::Handled
            }
            _ => WidgetResult::Handled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn shortcut_letters_pick_an_entry_and_close() {
        let mut menu = MenuState::new();
        menu.open();
        assert_eq!(
            menu.handle_input(key(KeyCode::Char('s'))),
            WidgetResult::Action(MenuAction::Save)
        );
        assert!(!menu.active);
    }

    #[test]
    fn arrows_move_the_selection_and_enter_picks_it() {
        let mut menu = MenuState::new();
        menu.open();
        assert_eq!(menu.handle_input(key(KeyCode::Down)), WidgetResult::Handled);
        assert_eq!(
            menu.handle_input(key(KeyCode::Enter)),
            WidgetResult::Action(MenuAction::Save)
        );
    }

    #[test]
    fn escape_closes_without_an_action() {
        let mut menu = MenuState::new();
        menu.open();
        assert_eq!(menu.handle_input(key(KeyCode::Esc)), WidgetResult::Close);
        assert!(!menu.active);
    }
}
