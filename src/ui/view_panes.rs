use crate::session::{byte_to_ascii, Nibble, Pane, Session};
use crate::ui_state::UIState;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Renders the hex and ascii panes side by side and records their inner
/// areas for mouse hit testing.
pub fn render(f: &mut Frame, area: Rect, session: &Session, ui_state: &mut UIState) {
    let theme = &ui_state.theme;
    let geometry = session.geometry;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(geometry.hex_cells() as u16 + 2),
            Constraint::Length(geometry.width as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    let hex_border = pane_border(session, Pane::Hex, theme);
    let hex_block = Block::default()
        .borders(Borders::ALL)
        .border_style(hex_border)
        .title(" Hex ");
    let ascii_border = pane_border(session, Pane::Ascii, theme);
    let ascii_block = Block::default()
        .borders(Borders::ALL)
        .border_style(ascii_border)
        .title(" Ascii ");

    ui_state.hex_area = hex_block.inner(chunks[0]);
    ui_state.ascii_area = ascii_block.inner(chunks[1]);

    let size = session.store.size();
    let edited_style = Style::default()
        .fg(theme.edited)
        .add_modifier(Modifier::BOLD);
    let hex_style = Style::default().fg(theme.hex_bytes);
    let ascii_style = Style::default().fg(theme.hex_ascii);

    let mut hex_lines: Vec<Line> = Vec::with_capacity(geometry.height as usize);
    let mut ascii_lines: Vec<Line> = Vec::with_capacity(geometry.height as usize);

    for row in 0..geometry.height {
        let mut hex_spans: Vec<Span> = Vec::with_capacity(geometry.width as usize);
        let mut ascii_spans: Vec<Span> = Vec::with_capacity(geometry.width as usize);

        for digit in 0..geometry.width {
            let offset = geometry.coord_to_offset(row, digit);
            if geometry.offset_to_coord(session.v_start, offset, size).is_none() {
                break;
            }
            let absolute = session.v_start + offset;
            let pending = session.overlay.get(absolute);
            let byte = pending.unwrap_or_else(|| session.store.read(absolute).unwrap_or(0));

            let (h_style, a_style) = if pending.is_some() {
                (edited_style, edited_style)
            } else {
                (hex_style, ascii_style)
            };
            hex_spans.push(Span::styled(format!("{:02X}", byte), h_style));
            hex_spans.push(Span::raw(" "));
            ascii_spans.push(Span::styled(byte_to_ascii(byte).to_string(), a_style));
        }

        hex_lines.push(Line::from(hex_spans));
        ascii_lines.push(Line::from(ascii_spans));
    }

    f.render_widget(Paragraph::new(hex_lines).block(hex_block), chunks[0]);
    f.render_widget(Paragraph::new(ascii_lines).block(ascii_block), chunks[1]);

    set_terminal_cursor(f, session, ui_state);
}

fn pane_border(session: &Session, pane: Pane, theme: &crate::theme::Theme) -> Style {
    if session.cursor.pane == pane {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    }
}

/// Places the real terminal cursor on the active cell, nibble-accurate in
/// the hex pane.
fn set_terminal_cursor(f: &mut Frame, session: &Session, ui_state: &UIState) {
    let cursor = session.cursor;
    let (area, col) = match cursor.pane {
        Pane::Hex => {
            let nib = if cursor.nibble == Nibble::Lo { 1 } else { 0 };
            (ui_state.hex_area, cursor.digit * 3 + nib)
        }
        Pane::Ascii => (ui_state.ascii_area, cursor.digit),
    };
    let x = area.x.saturating_add(col as u16);
    let y = area.y.saturating_add(cursor.row as u16);
    if x < area.right() && y < area.bottom() {
        f.set_cursor_position((x, y));
    }
}
