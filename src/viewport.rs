/// Minimum terminal size for a usable grid: three status rows plus borders,
/// and enough columns for 16 bytes in each pane.
pub const MIN_TERMINAL_ROWS: u16 = 11;
pub const MIN_TERMINAL_COLS: u16 = 68;

/// Rows reserved above the panes: 3 status lines plus 4 rows of borders.
const CHROME_ROWS: u16 = 7;

/// Grid geometry derived from the terminal size.
///
/// `width` is bytes per row (shared by both panes), `height` is visible
/// rows, `grid` is the number of byte cells visible at once. Each byte
/// occupies 3 character cells in the hex pane (two nibbles plus a
/// separator) and 1 in the ascii pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u64,
    pub height: u64,
    pub grid: u64,
    pub too_small: bool,
}

impl Geometry {
    pub fn from_terminal(rows: u16, cols: u16) -> Self {
        let too_small = rows < MIN_TERMINAL_ROWS || cols < MIN_TERMINAL_COLS;

        // The hex pane gets 3 of every 4 usable columns, the ascii pane 1.
        let hex_cells = (cols.saturating_sub(4) / 4) * 3;
        // Both kept at least 1 so the coordinate math stays total even
        // while the "resize terminal" message is up.
        let width = u64::from(hex_cells / 3).max(1);
        let height = u64::from(rows.saturating_sub(CHROME_ROWS)).max(1);

        Self {
            width,
            height,
            grid: width * height,
            too_small,
        }
    }

    /// Character-cell width of the hex pane.
    pub fn hex_cells(&self) -> u64 {
        self.width * 3
    }

    /// Maps an offset within the grid to (row, hex column, ascii column).
    /// `None` once `v_start + offset` runs past the end of the file.
    pub fn offset_to_coord(&self, v_start: u64, offset: u64, size: u64) -> Option<(u64, u64, u64)> {
        if v_start + offset >= size {
            return None;
        }
        let row = offset / self.width;
        let ascii_col = offset - row * self.width;
        Some((row, ascii_col * 3, ascii_col))
    }

    /// Exact inverse of the ascii-column half of `offset_to_coord`.
    pub fn coord_to_offset(&self, row: u64, digit: u64) -> u64 {
        row * self.width + digit
    }

    /// Absolute file offset of a grid cell, clamped to the last byte when
    /// the grid extends past the end of the file.
    pub fn absolute_offset(&self, v_start: u64, row: u64, digit: u64, size: u64) -> u64 {
        let offset = v_start + self.coord_to_offset(row, digit);
        offset.min(size.saturating_sub(1))
    }

    pub fn scroll_line_up(&self, v_start: u64) -> u64 {
        v_start.saturating_sub(self.width)
    }

    pub fn scroll_line_down(&self, v_start: u64, size: u64) -> u64 {
        if self.grid >= size {
            0
        } else if v_start + self.grid + self.width < size {
            v_start + self.width
        } else {
            size - self.grid
        }
    }

    pub fn scroll_page_up(&self, v_start: u64, size: u64) -> u64 {
        if self.grid >= size {
            0
        } else {
            v_start.saturating_sub(self.grid)
        }
    }

    pub fn scroll_page_down(&self, v_start: u64, size: u64) -> u64 {
        if self.grid >= size {
            0
        } else if v_start + 2 * self.grid < size {
            v_start + self.grid
        } else {
            size - self.grid
        }
    }

    /// New `v_start` that makes `target` visible, clamped so the grid never
    /// runs past the end of the file.
    pub fn scroll_to(&self, target: u64, size: u64) -> u64 {
        if self.grid >= size {
            0
        } else if target + self.grid > size {
            size - self.grid
        } else {
            target
        }
    }
}
