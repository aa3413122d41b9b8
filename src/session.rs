use crate::overlay::EditOverlay;
use crate::store::{ByteStore, StoreError};
use crate::viewport::Geometry;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Hex,
    Ascii,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nibble {
    Hi,
    Lo,
}

/// Cursor position within the grid. The absolute file offset under the
/// cursor is `v_start + row * width + digit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub row: u64,
    pub digit: u64,
    pub nibble: Nibble,
    pub pane: Pane,
}

impl Cursor {
    fn home() -> Self {
        Self {
            row: 0,
            digit: 0,
            nibble: Nibble::Hi,
            pane: Pane::Hex,
        }
    }
}

/// One editing session: the mapped file, its pending edits, the grid
/// geometry and the cursor. Everything the rendering and input layers
/// operate on hangs off this struct.
pub struct Session {
    pub store: ByteStore,
    pub overlay: EditOverlay,
    pub geometry: Geometry,
    pub v_start: u64,
    pub cursor: Cursor,
}

impl Session {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = ByteStore::open(path)?;
        Ok(Self {
            store,
            overlay: EditOverlay::new(),
            geometry: Geometry::from_terminal(24, 80),
            v_start: 0,
            cursor: Cursor::home(),
        })
    }

    /// Recomputes the grid for a new terminal size. The window position is
    /// re-clamped against the new grid and the cursor goes home.
    pub fn resize(&mut self, rows: u16, cols: u16) {
        self.geometry = Geometry::from_terminal(rows, cols);
        self.v_start = self.geometry.scroll_to(self.v_start, self.store.size());
        self.cursor = Cursor {
            pane: self.cursor.pane,
            ..Cursor::home()
        };
    }

    /// The byte as the user sees it: the pending edit if there is one,
    /// otherwise the on-disk byte.
    pub fn effective_byte(&self, offset: u64) -> Option<u8> {
        self.overlay.get(offset).or_else(|| self.store.read(offset))
    }

    /// Absolute file offset under the cursor, clamped to the last byte when
    /// the grid extends past the end of the file.
    pub fn cursor_offset(&self) -> u64 {
        self.geometry.absolute_offset(
            self.v_start,
            self.cursor.row,
            self.cursor.digit,
            self.store.size(),
        )
    }

    /// Unclamped offset under the cursor; may be at or past the file end.
    fn raw_cursor_offset(&self) -> u64 {
        self.v_start + self.geometry.coord_to_offset(self.cursor.row, self.cursor.digit)
    }

    // ---- navigation -------------------------------------------------

    /// One step left. In the hex pane this is nibble-granular; at column 0
    /// the cursor wraps to the last digit of the *same* row (no vertical
    /// wrap).
    pub fn move_left(&mut self) {
        let last_digit = self.geometry.width - 1;
        match self.cursor.pane {
            Pane::Hex => {
                if self.cursor.nibble == Nibble::Lo {
                    self.cursor.nibble = Nibble::Hi;
                } else if self.cursor.digit > 0 {
                    self.cursor.digit -= 1;
                    self.cursor.nibble = Nibble::Lo;
                } else {
                    self.cursor.digit = last_digit;
                    self.cursor.nibble = Nibble::Hi;
                }
            }
            Pane::Ascii => {
                if self.cursor.digit > 0 {
                    self.cursor.digit -= 1;
                } else {
                    self.cursor.digit = last_digit;
                }
                self.cursor.nibble = Nibble::Hi;
            }
        }
    }

    /// Mirror of `move_left`.
    pub fn move_right(&mut self) {
        let last_digit = self.geometry.width - 1;
        match self.cursor.pane {
            Pane::Hex => {
                if self.cursor.nibble == Nibble::Hi {
                    self.cursor.nibble = Nibble::Lo;
                } else if self.cursor.digit < last_digit {
                    self.cursor.digit += 1;
                    self.cursor.nibble = Nibble::Hi;
                } else {
                    self.cursor.digit = 0;
                    self.cursor.nibble = Nibble::Hi;
                }
            }
            Pane::Ascii => {
                if self.cursor.digit < last_digit {
                    self.cursor.digit += 1;
                } else {
                    self.cursor.digit = 0;
                }
                self.cursor.nibble = Nibble::Hi;
            }
        }
    }

    /// Switches panes. The cursor is normalized to the high nibble first so
    /// both panes agree on which byte is current.
    pub fn toggle_pane(&mut self) {
        self.cursor.nibble = Nibble::Hi;
        self.cursor.pane = match self.cursor.pane {
            Pane::Hex => Pane::Ascii,
            Pane::Ascii => Pane::Hex,
        };
    }

    pub fn move_home(&mut self) {
        self.cursor.row = 0;
        self.cursor.digit = 0;
        self.cursor.nibble = Nibble::Hi;
    }

    pub fn move_end(&mut self) {
        self.cursor.row = self.geometry.height - 1;
        self.cursor.digit = self.geometry.width - 1;
        self.cursor.nibble = Nibble::Hi;
    }

    /// Backspace: step left to the previous byte boundary and drop any
    /// pending edit there. This undoes the edit at the cell being left, it
    /// never shifts bytes.
    pub fn undo_edit_left(&mut self) {
        self.move_left();
        if self.cursor.nibble == Nibble::Lo {
            self.move_left();
        }
        let offset = self.raw_cursor_offset();
        self.overlay.remove(offset);
    }

    pub fn move_up(&mut self) {
        if self.cursor.row > 0 {
            self.cursor.row -= 1;
        } else {
            self.v_start = self.geometry.scroll_line_up(self.v_start);
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor.row < self.geometry.height - 1 {
            self.cursor.row += 1;
        } else {
            self.v_start = self
                .geometry
                .scroll_line_down(self.v_start, self.store.size());
        }
    }

    pub fn page_up(&mut self) {
        self.v_start = self
            .geometry
            .scroll_page_up(self.v_start, self.store.size());
    }

    pub fn page_down(&mut self) {
        self.v_start = self
            .geometry
            .scroll_page_down(self.v_start, self.store.size());
    }

    /// Scrolls so that `offset` is visible at the top of the grid, clamped
    /// to file bounds.
    pub fn goto(&mut self, offset: u64) {
        self.v_start = self.geometry.scroll_to(offset, self.store.size());
    }

    // ---- editing ----------------------------------------------------

    /// Applies one keystroke as an edit under the cursor. In the ascii pane
    /// the key is the new byte; in the hex pane it is one nibble combined
    /// with the other nibble of the current effective byte. An edit that
    /// reproduces the on-disk byte removes the pending entry instead of
    /// recording a no-op. A valid edit auto-advances the cursor right.
    ///
    /// Returns false for keys that are not valid input in the active pane,
    /// and for cursor positions at or past the end of the file.
    pub fn edit(&mut self, key: char) -> bool {
        let offset = self.raw_cursor_offset();
        let Some(file_byte) = self.store.read(offset) else {
            return false;
        };

        let pending = match self.cursor.pane {
            Pane::Ascii => {
                if !is_printable(key) {
                    return false;
                }
                key as u8
            }
            Pane::Hex => {
                let Some(nibble) = hex_digit_value(key) else {
                    return false;
                };
                let base = self.effective_byte(offset).unwrap_or(file_byte);
                match self.cursor.nibble {
                    Nibble::Hi => (base & 0x0F) | (nibble << 4),
                    Nibble::Lo => (base & 0xF0) | nibble,
                }
            }
        };

        if pending == file_byte {
            // Reverted to the on-disk value: no pending edit to keep.
            self.overlay.remove(offset);
        } else {
            self.overlay.set(offset, pending);
        }

        self.move_right();
        true
    }

    /// Maps a click at pane-relative (row, col) to a cursor position. In
    /// the hex pane a click on the separator cell snaps back to the low
    /// nibble of the same digit.
    pub fn click(&mut self, pane: Pane, row: u64, col: u64) {
        self.cursor.pane = pane;
        self.cursor.row = row.min(self.geometry.height - 1);
        match pane {
            Pane::Hex => {
                let col = col.min(self.geometry.hex_cells() - 1);
                self.cursor.digit = col / 3;
                self.cursor.nibble = if col % 3 == 0 { Nibble::Hi } else { Nibble::Lo };
            }
            Pane::Ascii => {
                self.cursor.digit = col.min(self.geometry.width - 1);
                self.cursor.nibble = Nibble::Hi;
            }
        }
    }
}

pub fn hex_digit_value(c: char) -> Option<u8> {
    c.to_digit(16).map(|v| v as u8)
}

pub fn is_printable(c: char) -> bool {
    c.is_ascii_graphic() || c == ' '
}

/// Display form of a byte in the ascii pane.
pub fn byte_to_ascii(b: u8) -> char {
    if b.is_ascii_graphic() || b == b' ' {
        b as char
    } else {
        '.'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 68x11 terminal: 16 bytes per row, 4 rows, 64-byte grid.
    fn session_with(bytes: &[u8]) -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.bin");
        std::fs::write(&path, bytes).expect("write fixture");
        let mut session = Session::open(&path).expect("open session");
        session.resize(11, 68);
        (dir, session)
    }

    #[test]
    fn left_wraps_within_the_same_row() {
        let (_dir, mut s) = session_with(&[0u8; 256]);
        assert_eq!(s.geometry.width, 16);

        // hi nibble of digit 0 wraps to hi nibble of digit 15, same row
        s.move_left();
        assert_eq!(s.cursor.row, 0);
        assert_eq!(s.cursor.digit, 15);
        assert_eq!(s.cursor.nibble, Nibble::Hi);

        // and from row 2 it stays in row 2
        s.move_home();
        s.cursor.row = 2;
        s.move_left();
        assert_eq!(s.cursor.row, 2);
        assert_eq!(s.cursor.digit, 15);
    }

    #[test]
    fn right_steps_through_nibbles_and_wraps() {
        let (_dir, mut s) = session_with(&[0u8; 256]);

        s.move_right();
        assert_eq!((s.cursor.digit, s.cursor.nibble), (0, Nibble::Lo));
        s.move_right();
        assert_eq!((s.cursor.digit, s.cursor.nibble), (1, Nibble::Hi));

        s.cursor.digit = 15;
        s.cursor.nibble = Nibble::Lo;
        s.move_right();
        assert_eq!((s.cursor.digit, s.cursor.nibble), (0, Nibble::Hi));
        assert_eq!(s.cursor.row, 0);
    }

    #[test]
    fn ascii_pane_moves_whole_bytes() {
        let (_dir, mut s) = session_with(&[0u8; 256]);
        s.toggle_pane();
        assert_eq!(s.cursor.pane, Pane::Ascii);

        s.move_right();
        assert_eq!(s.cursor.digit, 1);
        assert_eq!(s.cursor.nibble, Nibble::Hi);
        s.move_left();
        s.move_left();
        assert_eq!(s.cursor.digit, 15);
    }

    #[test]
    fn tab_normalizes_to_high_nibble() {
        let (_dir, mut s) = session_with(&[0u8; 256]);
        s.move_right(); // low nibble of digit 0
        s.toggle_pane();
        assert_eq!(s.cursor.pane, Pane::Ascii);
        assert_eq!(s.cursor.nibble, Nibble::Hi);
        assert_eq!(s.cursor.digit, 0);
    }

    #[test]
    fn hex_edit_combines_nibbles() {
        let (_dir, mut s) = session_with(b"ABC");

        // high nibble of 0x41 -> '5' gives 0x51
        assert!(s.edit('5'));
        assert_eq!(s.overlay.get(0), Some(0x51));
        assert_eq!(s.effective_byte(0), Some(0x51));
        // auto-advanced to the low nibble
        assert_eq!((s.cursor.digit, s.cursor.nibble), (0, Nibble::Lo));

        // low nibble -> 'c' gives 0x5C, applied on top of the pending edit
        assert!(s.edit('c'));
        assert_eq!(s.overlay.get(0), Some(0x5C));
        assert_eq!((s.cursor.digit, s.cursor.nibble), (1, Nibble::Hi));
    }

    #[test]
    fn editing_back_to_disk_value_removes_the_entry() {
        let (_dir, mut s) = session_with(b"ABC");

        assert!(s.edit('5')); // 0x41 -> 0x51
        assert_eq!(s.overlay.len(), 1);

        // back on the same byte: one step left from the low nibble lands on
        // the high nibble of offset 0, restore it to '4'
        s.move_left();
        assert_eq!((s.cursor.digit, s.cursor.nibble), (0, Nibble::Hi));
        assert!(s.edit('4'));
        assert!(s.overlay.is_empty());
    }

    #[test]
    fn ascii_edit_matching_disk_value_is_not_recorded() {
        let (_dir, mut s) = session_with(b"ABC");
        s.toggle_pane();
        s.move_right(); // offset 1, on-disk 'B'
        assert!(s.edit('B'));
        assert!(s.overlay.is_empty());

        assert!(s.edit('Z')); // offset 2
        assert_eq!(s.overlay.get(2), Some(b'Z'));
    }

    #[test]
    fn invalid_keys_are_rejected_not_applied() {
        let (_dir, mut s) = session_with(b"ABC");
        assert!(!s.edit('g')); // not a hex digit
        assert!(!s.edit(' '));
        assert!(s.overlay.is_empty());
        assert_eq!((s.cursor.digit, s.cursor.nibble), (0, Nibble::Hi));

        s.toggle_pane();
        assert!(!s.edit('\t')); // not printable
        assert!(s.overlay.is_empty());
    }

    #[test]
    fn edits_past_file_end_are_rejected() {
        let (_dir, mut s) = session_with(b"AB"); // grid is 64 cells
        s.cursor.digit = 5;
        assert!(!s.edit('f'));
        assert!(s.overlay.is_empty());
    }

    #[test]
    fn backspace_removes_the_edit_at_the_previous_byte() {
        let (_dir, mut s) = session_with(b"ABCDEF");

        assert!(s.edit('5'));
        assert!(s.edit('c')); // cursor now at digit 1 hi, overlay = {0: 0x5C}
        assert_eq!(s.overlay.len(), 1);

        s.undo_edit_left();
        assert!(s.overlay.is_empty());
        assert_eq!((s.cursor.digit, s.cursor.nibble), (0, Nibble::Hi));
    }

    #[test]
    fn up_down_scroll_at_grid_boundaries() {
        let (_dir, mut s) = session_with(&[0u8; 256]); // 4 grids worth
        assert_eq!(s.geometry.grid, 64);

        s.move_up();
        assert_eq!(s.v_start, 0); // already at the top

        for _ in 0..3 {
            s.move_down();
        }
        assert_eq!(s.cursor.row, 3);
        assert_eq!(s.v_start, 0);
        s.move_down(); // bottom row: scrolls instead
        assert_eq!(s.cursor.row, 3);
        assert_eq!(s.v_start, 16);

        s.cursor.row = 0;
        s.move_up();
        assert_eq!(s.v_start, 0);
    }

    #[test]
    fn page_and_goto_respect_bounds() {
        let (_dir, mut s) = session_with(&[0u8; 256]);
        s.page_down();
        assert_eq!(s.v_start, 64);
        s.page_down();
        s.page_down();
        assert_eq!(s.v_start, 192);
        s.page_down(); // only one grid left
        assert_eq!(s.v_start, 192);

        s.goto(255);
        assert_eq!(s.v_start, 192);
        s.goto(0);
        assert_eq!(s.v_start, 0);
    }

    #[test]
    fn resize_reclamps_the_window_into_file_bounds() {
        let (_dir, mut s) = session_with(&[0u8; 256]);
        for _ in 0..3 {
            s.page_down();
        }
        assert_eq!(s.v_start, 192);

        // Taller terminal: 9 rows of 16, grid 144. 192 + 144 overshoots the
        // file, so the window slides back to show the last full grid.
        s.resize(16, 68);
        assert_eq!(s.geometry.grid, 144);
        assert_eq!(s.v_start, 112);

        // Grid now larger than the whole file: the window pins to 0.
        s.resize(30, 120);
        assert!(s.geometry.grid >= 256);
        assert_eq!(s.v_start, 0);
        assert_eq!((s.cursor.row, s.cursor.digit), (0, 0));
    }

    #[test]
    fn cursor_offset_is_clamped_to_file_end() {
        let (_dir, mut s) = session_with(b"0123456789"); // 10 bytes
        s.move_end();
        assert_eq!(s.cursor_offset(), 9);
    }

    #[test]
    fn click_maps_columns_to_digits_and_nibbles() {
        let (_dir, mut s) = session_with(&[0u8; 256]);

        s.click(Pane::Hex, 1, 0);
        assert_eq!((s.cursor.row, s.cursor.digit, s.cursor.nibble), (1, 0, Nibble::Hi));
        s.click(Pane::Hex, 1, 4); // low nibble of digit 1
        assert_eq!((s.cursor.digit, s.cursor.nibble), (1, Nibble::Lo));
        s.click(Pane::Hex, 1, 5); // separator snaps to the low nibble
        assert_eq!((s.cursor.digit, s.cursor.nibble), (1, Nibble::Lo));
        s.click(Pane::Hex, 1, 6);
        assert_eq!((s.cursor.digit, s.cursor.nibble), (2, Nibble::Hi));

        s.click(Pane::Ascii, 2, 7);
        assert_eq!(s.cursor.pane, Pane::Ascii);
        assert_eq!((s.cursor.row, s.cursor.digit, s.cursor.nibble), (2, 7, Nibble::Hi));
    }

    #[test]
    fn byte_display_helpers() {
        assert_eq!(hex_digit_value('0'), Some(0));
        assert_eq!(hex_digit_value('a'), Some(10));
        assert_eq!(hex_digit_value('F'), Some(15));
        assert_eq!(hex_digit_value('g'), None);

        assert_eq!(byte_to_ascii(b'A'), 'A');
        assert_eq!(byte_to_ascii(b' '), ' ');
        assert_eq!(byte_to_ascii(0x00), '.');
        assert_eq!(byte_to_ascii(0x7F), '.');
    }
}
