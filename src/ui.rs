use crate::session::{Nibble, Pane, Session};
use crate::ui_state::UIState;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

pub mod dialog_confirmation;
pub mod dialog_number;
pub mod menu;
pub mod view_panes;
pub mod widget;

use self::widget::Widget as _;

pub fn ui(f: &mut Frame, session: &Session, ui_state: &mut UIState) {
    if session.geometry.too_small {
        let message = Paragraph::new("Screen is too small. Please resize to continue.")
            .alignment(Alignment::Center);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .split(f.area());
        f.render_widget(message, rows[1]);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // status block: 3 lines + borders
            Constraint::Min(0),
        ])
        .split(f.area());

    render_status(f, chunks[0], session, ui_state);
    view_panes::render(f, chunks[1], session, ui_state);

    if ui_state.menu.active {
        ui_state.menu.render(f, f.area(), &ui_state.theme);
    }
    if let Some(dialog) = &ui_state.number_prompt {
        dialog.render(f, f.area(), &ui_state.theme);
    }
    if let Some(dialog) = &ui_state.confirmation {
        dialog.render(f, f.area(), &ui_state.theme);
    }
}

fn render_status(
    f: &mut Frame,
    area: ratatui::layout::Rect,
    session: &Session,
    ui_state: &UIState,
) {
    let theme = &ui_state.theme;
    let geometry = session.geometry;
    let size = session.store.size();

    let name = session
        .store
        .path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let pane = match session.cursor.pane {
        Pane::Hex => "hex",
        Pane::Ascii => "ascii",
    };
    let nibble = match session.cursor.nibble {
        Nibble::Hi => "hi",
        Nibble::Lo => "lo",
    };

    let lines = vec![
        Line::from(format!(
            "hexed {} [{}] Size:{} Offset:{}",
            env!("CARGO_PKG_VERSION"),
            name,
            size,
            session.cursor_offset(),
        )),
        Line::from(format!(
            "Grid {}-{} {}x{}={} Pane:{} Nibble:{} Pending:{}",
            session.v_start,
            session.v_start + geometry.grid - 1,
            geometry.width,
            geometry.height,
            geometry.grid,
            pane,
            nibble,
            session.overlay.len(),
        )),
        Line::styled(
            ui_state.status_message.clone(),
            Style::default().fg(theme.highlight_fg),
        ),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_inactive));
    f.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(theme.status_fg))
            .block(block),
        area,
    );
}
