use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub border_active: Color,
    pub border_inactive: Color,

    pub address: Color,
    pub hex_bytes: Color,
    pub hex_ascii: Color,
    /// Bytes with a pending edit, in both panes.
    pub edited: Color,

    pub status_fg: Color,
    pub highlight_fg: Color,

    pub dialog_bg: Color,
    pub dialog_fg: Color,
    pub dialog_border: Color,

    pub menu_fg: Color,
    pub menu_selected_bg: Color,
    pub menu_selected_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::Gray,
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            address: Color::DarkGray,
            hex_bytes: Color::Gray,
            hex_ascii: Color::Gray,
            edited: Color::Red,

            status_fg: Color::Gray,
            highlight_fg: Color::Yellow,

            dialog_bg: Color::Black,
            dialog_fg: Color::White,
            dialog_border: Color::Cyan,

            menu_fg: Color::Gray,
            menu_selected_bg: Color::Cyan,
            menu_selected_fg: Color::Black,
        }
    }
}
