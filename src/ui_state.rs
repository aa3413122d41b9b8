use crate::theme::Theme;
use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Quit,
    Save,
    Abandon,
    Goto,
    Insert,
    Delete,
}

impl MenuAction {
    /// Menu entries in display order, with their shortcut key.
    pub fn all() -> &'static [(MenuAction, &'static str, char)] {
        &[
            (MenuAction::Quit, "Quit", 'q'),
            (MenuAction::Save, "Save changes", 's'),
            (MenuAction::Abandon, "Abandon changes", 'a'),
            (MenuAction::Goto, "Goto byte", 'g'),
            (MenuAction::Insert, "Insert bytes", 'i'),
            (MenuAction::Delete, "Delete bytes", 'd'),
        ]
    }
}

/// An action waiting behind the yes/no confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Quit,
    Save,
    Abandon,
    Insert { offset: u64, count: u64 },
    Delete { offset: u64, count: u64 },
}

pub struct ConfirmationState {
    pub title: String,
    pub message: String,
    pub action: PendingAction,
}

/// What the numeric prompt's answer will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberPurpose {
    Goto,
    InsertCount { offset: u64 },
    DeleteCount { offset: u64, max: u64 },
}

pub struct NumberPromptState {
    pub prompt: String,
    pub input: String,
    pub purpose: NumberPurpose,
}

pub struct MenuState {
    pub active: bool,
    pub selected: usize,
}

impl MenuState {
    pub fn new() -> Self {
        Self {
            active: false,
            selected: 0,
        }
    }

    pub fn open(&mut self) {
        self.active = true;
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.active = false;
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % MenuAction::all().len();
    }

    pub fn previous(&mut self) {
        let len = MenuAction::all().len();
        self.selected = (self.selected + len - 1) % len;
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct UIState {
    pub theme: Theme,
    pub menu: MenuState,
    pub confirmation: Option<ConfirmationState>,
    pub number_prompt: Option<NumberPromptState>,
    pub status_message: String,
    pub should_quit: bool,

    // Inner pane areas from the last render, for mouse hit testing.
    pub hex_area: Rect,
    pub ascii_area: Rect,
}

impl UIState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            menu: MenuState::new(),
            confirmation: None,
            number_prompt: None,
            status_message: "Ready".to_string(),
            should_quit: false,
            hex_area: Rect::default(),
            ascii_area: Rect::default(),
        }
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }
}
