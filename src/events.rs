use crate::mutation::{self, AbandonOutcome, MutationError, SaveOutcome, StructuralOutcome};
use crate::session::{Pane, Session};
use crate::store::StoreError;
use crate::ui;
use crate::ui::widget::{Widget as _, WidgetResult};
use crate::ui_state::{
    ConfirmationState, MenuAction, NumberPromptState, NumberPurpose, PendingAction, UIState,
};
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::Backend};

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut session: Session,
    mut ui_state: UIState,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let size = terminal.size()?;
    session.resize(size.height, size.width);

    loop {
        terminal.draw(|f| ui::ui(f, &session, &mut ui_state))?;

        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                handle_key(key, &mut session, &mut ui_state)?;
            }
            Event::Mouse(mouse) => handle_mouse(mouse, &mut session, &ui_state),
            Event::Resize(cols, rows) => session.resize(rows, cols),
            _ => {}
        }

        if ui_state.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(key: KeyEvent, session: &mut Session, ui_state: &mut UIState) -> Result<()> {
    if let Some(dialog) = ui_state.confirmation.as_mut() {
        let result = dialog.handle_input(key);
        match result {
            WidgetResult::Confirmed(action) => {
                ui_state.confirmation = None;
                execute_pending(action, session, ui_state)?;
            }
            WidgetResult::Close => {
                ui_state.confirmation = None;
                ui_state.set_status_message("Action cancelled");
            }
            _ => {}
        }
        return Ok(());
    }

    if let Some(dialog) = ui_state.number_prompt.as_mut() {
        let result = dialog.handle_input(key);
        match result {
            WidgetResult::Answered { purpose, value } => {
                ui_state.number_prompt = None;
                apply_number_answer(purpose, value, session, ui_state);
            }
            WidgetResult::Close => {
                ui_state.number_prompt = None;
                ui_state.set_status_message("Ready");
            }
            _ => {}
        }
        return Ok(());
    }

    if ui_state.menu.active {
        match ui_state.menu.handle_input(key) {
            WidgetResult::Action(action) => execute_menu_action(action, session, ui_state),
            WidgetResult::Close => ui_state.set_status_message("Ready"),
            _ => {}
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            execute_menu_action(MenuAction::Quit, session, ui_state);
        }
        KeyCode::Esc => {
            ui_state.menu.open();
            ui_state.set_status_message("Menu");
        }
        KeyCode::Left => session.move_left(),
        KeyCode::Right => session.move_right(),
        KeyCode::Tab => session.toggle_pane(),
        KeyCode::Home => session.move_home(),
        KeyCode::End => session.move_end(),
        KeyCode::Backspace | KeyCode::Delete => session.undo_edit_left(),
        KeyCode::Up => session.move_up(),
        KeyCode::Down => session.move_down(),
        KeyCode::PageUp => session.page_up(),
        KeyCode::PageDown => session.page_down(),
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            // Invalid edit keys are dropped silently
            session.edit(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_mouse(mouse: MouseEvent, session: &mut Session, ui_state: &UIState) {
    if ui_state.menu.active || ui_state.confirmation.is_some() || ui_state.number_prompt.is_some() {
        return;
    }
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }

    let position = ratatui::layout::Position::new(mouse.column, mouse.row);
    if ui_state.hex_area.contains(position) {
        session.click(
            Pane::Hex,
            u64::from(mouse.row - ui_state.hex_area.y),
            u64::from(mouse.column - ui_state.hex_area.x),
        );
    } else if ui_state.ascii_area.contains(position) {
        session.click(
            Pane::Ascii,
            u64::from(mouse.row - ui_state.ascii_area.y),
            u64::from(mouse.column - ui_state.ascii_area.x),
        );
    }
}

fn execute_menu_action(action: MenuAction, session: &mut Session, ui_state: &mut UIState) {
    match action {
        MenuAction::Quit => {
            if session.overlay.is_empty() {
                ui_state.should_quit = true;
            } else {
                ui_state.confirmation = Some(ConfirmationState {
                    title: "Quit".to_string(),
                    message: "Abandon unsaved changes?".to_string(),
                    action: PendingAction::Quit,
                });
            }
        }
        MenuAction::Save => {
            if session.overlay.is_empty() {
                ui_state.set_status_message("No changes made");
            } else {
                ui_state.confirmation = Some(ConfirmationState {
                    title: "Save".to_string(),
                    message: format!(
                        "Save {} changes? This can not be undone.",
                        session.overlay.len()
                    ),
                    action: PendingAction::Save,
                });
            }
        }
        MenuAction::Abandon => {
            if session.overlay.is_empty() {
                ui_state.set_status_message("No changes to abandon");
            } else {
                ui_state.confirmation = Some(ConfirmationState {
                    title: "Abandon".to_string(),
                    message: format!(
                        "Abandon {} changes? This can not be undone.",
                        session.overlay.len()
                    ),
                    action: PendingAction::Abandon,
                });
            }
        }
        MenuAction::Goto => {
            ui_state.number_prompt = Some(NumberPromptState {
                prompt: format!("Goto byte? (0-{})", session.store.size() - 1),
                input: String::new(),
                purpose: NumberPurpose::Goto,
            });
        }
        MenuAction::Insert => {
            if !session.overlay.is_empty() {
                ui_state.set_status_message("Save changes before inserting bytes");
            } else {
                let offset = session.cursor_offset();
                ui_state.number_prompt = Some(NumberPromptState {
                    prompt: format!(
                        "How many bytes to insert at offset {}? (max {})",
                        offset,
                        mutation::MAX_STRUCTURAL_BYTES
                    ),
                    input: String::new(),
                    purpose: NumberPurpose::InsertCount { offset },
                });
            }
        }
        MenuAction::Delete => {
            if !session.overlay.is_empty() {
                ui_state.set_status_message("Save changes before deleting bytes");
            } else {
                let offset = session.cursor_offset();
                let max = mutation::MAX_STRUCTURAL_BYTES.min(session.store.size() - offset);
                ui_state.number_prompt = Some(NumberPromptState {
                    prompt: format!(
                        "How many bytes to delete from offset {}? (max {})",
                        offset, max
                    ),
                    input: String::new(),
                    purpose: NumberPurpose::DeleteCount { offset, max },
                });
            }
        }
    }
}

fn apply_number_answer(
    purpose: NumberPurpose,
    value: u64,
    session: &mut Session,
    ui_state: &mut UIState,
) {
    match purpose {
        NumberPurpose::Goto => {
            session.goto(value);
            ui_state.set_status_message(format!("Moved view to offset {}", session.v_start));
        }
        NumberPurpose::InsertCount { offset } => {
            let count = value.min(mutation::MAX_STRUCTURAL_BYTES);
            if count == 0 {
                ui_state.set_status_message("Ready");
                return;
            }
            ui_state.confirmation = Some(ConfirmationState {
                title: "Insert".to_string(),
                message: format!("Insert {} bytes? This can not be undone.", count),
                action: PendingAction::Insert { offset, count },
            });
        }
        NumberPurpose::DeleteCount { offset, max } => {
            let count = value.min(max);
            if count == 0 {
                ui_state.set_status_message("Ready");
                return;
            }
            ui_state.confirmation = Some(ConfirmationState {
                title: "Delete".to_string(),
                message: format!("Delete {} bytes? This can not be undone.", count),
                action: PendingAction::Delete { offset, count },
            });
        }
    }
}

/// Runs a confirmed action. A `Reopen` failure is the one case where the
/// file on disk no longer matches the session and we must bail out.
fn execute_pending(
    action: PendingAction,
    session: &mut Session,
    ui_state: &mut UIState,
) -> Result<()> {
    match action {
        PendingAction::Quit => ui_state.should_quit = true,
        PendingAction::Save => match mutation::save(session) {
            Ok(SaveOutcome::Saved(n)) => {
                ui_state.set_status_message(format!("Saved {} changes", n));
            }
            Ok(SaveOutcome::NothingToSave) => ui_state.set_status_message("No changes made"),
            Err(e) => {
                // Overlay intact; the user can retry
                ui_state.set_status_message(format!("Save failed: {}", e));
            }
        },
        PendingAction::Abandon => match mutation::abandon(session) {
            AbandonOutcome::Abandoned(n) => {
                ui_state.set_status_message(format!("Abandoned {} changes", n));
            }
            AbandonOutcome::NothingToAbandon => {
                ui_state.set_status_message("No changes to abandon");
            }
        },
        PendingAction::Insert { offset, count } => {
            match mutation::insert_bytes(session, offset, count) {
                Ok(StructuralOutcome::Done { count }) => {
                    ui_state.set_status_message(format!("Inserted {} bytes", count));
                }
                Ok(_) => ui_state.set_status_message("Ready"),
                Err(e) => return structural_failure(e, ui_state, "Insert"),
            }
        }
        PendingAction::Delete { offset, count } => {
            match mutation::delete_bytes(session, offset, count) {
                Ok(StructuralOutcome::Done { count }) => {
                    ui_state.set_status_message(format!("Deleted {} bytes", count));
                }
                Ok(StructuralOutcome::FileNowEmpty) => {
                    ui_state.set_status_message("File is now empty");
                    ui_state.should_quit = true;
                }
                Ok(StructuralOutcome::Noop) => ui_state.set_status_message("Ready"),
                Err(e) => return structural_failure(e, ui_state, "Delete"),
            }
        }
    }
    Ok(())
}

fn structural_failure(e: MutationError, ui_state: &mut UIState, what: &str) -> Result<()> {
    match e {
        MutationError::Store(StoreError::Reopen(inner)) => Err(anyhow::anyhow!(
            "file was replaced but could not be re-opened: {}",
            inner
        )),
        other => {
            ui_state.set_status_message(format!("{} failed: {}", what, other));
            Ok(())
        }
    }
}
