use crate::session::Session;
use crate::store::StoreError;
use log::info;
use thiserror::Error;

/// Upper bound on a single insert/delete, matching the interactive prompt.
pub const MAX_STRUCTURAL_BYTES: u64 = 1024;

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("save or abandon pending edits first")]
    PendingEdits,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    NothingToSave,
    Saved(usize),
}

#[derive(Debug, PartialEq, Eq)]
pub enum AbandonOutcome {
    NothingToAbandon,
    Abandoned(usize),
}

#[derive(Debug, PartialEq, Eq)]
pub enum StructuralOutcome {
    Done { count: u64 },
    /// The delete removed the last byte; there is nothing left to display
    /// and the session must end.
    FileNowEmpty,
    Noop,
}

/// Commits all pending edits to disk and clears the overlay. On failure the
/// overlay is left intact so the save can be retried.
pub fn save(session: &mut Session) -> Result<SaveOutcome, StoreError> {
    if session.overlay.is_empty() {
        return Ok(SaveOutcome::NothingToSave);
    }
    let edits: Vec<(u64, u8)> = session.overlay.entries().collect();
    session.store.commit(&edits)?;
    session.overlay.clear();
    info!("saved {} edits to {:?}", edits.len(), session.store.path());
    Ok(SaveOutcome::Saved(edits.len()))
}

/// Drops all pending edits without touching the file.
pub fn abandon(session: &mut Session) -> AbandonOutcome {
    if session.overlay.is_empty() {
        return AbandonOutcome::NothingToAbandon;
    }
    let n = session.overlay.len();
    session.overlay.clear();
    info!("abandoned {} pending edits", n);
    AbandonOutcome::Abandoned(n)
}

/// Inserts `count` zero bytes at `offset`. Refused while edits are pending:
/// a structural change would make their offsets meaningless. `count` is
/// clamped to `MAX_STRUCTURAL_BYTES`.
pub fn insert_bytes(
    session: &mut Session,
    offset: u64,
    count: u64,
) -> Result<StructuralOutcome, MutationError> {
    if !session.overlay.is_empty() {
        return Err(MutationError::PendingEdits);
    }
    let count = count.min(MAX_STRUCTURAL_BYTES);
    if count == 0 {
        return Ok(StructuralOutcome::Noop);
    }

    session.store.insert(offset, count)?;
    reset_view(session);
    Ok(StructuralOutcome::Done { count })
}

/// Deletes up to `count` bytes starting at `offset`, clamped to the prompt
/// maximum and to the end of the file. Deleting the final byte ends the
/// session: an empty file has no valid state to display.
pub fn delete_bytes(
    session: &mut Session,
    offset: u64,
    count: u64,
) -> Result<StructuralOutcome, MutationError> {
    if !session.overlay.is_empty() {
        return Err(MutationError::PendingEdits);
    }
    let count = count
        .min(MAX_STRUCTURAL_BYTES)
        .min(session.store.size().saturating_sub(offset));
    if count == 0 {
        return Ok(StructuralOutcome::Noop);
    }

    session.store.delete(offset, count)?;
    if session.store.size() == 0 {
        return Ok(StructuralOutcome::FileNowEmpty);
    }
    reset_view(session);
    Ok(StructuralOutcome::Done { count })
}

/// After a structural change the old window position and cursor no longer
/// mean anything; start over from the top of the file.
fn reset_view(session: &mut Session) {
    session.v_start = 0;
    session.move_home();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn session_with(bytes: &[u8]) -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.bin");
        std::fs::write(&path, bytes).expect("write fixture");
        let mut session = Session::open(&path).expect("open session");
        session.resize(11, 68); // 16x4 grid
        (dir, session)
    }

    #[test]
    fn save_commits_and_clears_then_is_idempotent() {
        let (_dir, mut s) = session_with(b"ABC");

        assert!(s.edit('5')); // 0x41 -> 0x51 at offset 0
        assert_eq!(save(&mut s).expect("save"), SaveOutcome::Saved(1));
        assert_eq!(s.store.read(0), Some(0x51));
        assert!(s.overlay.is_empty());

        let on_disk = std::fs::read(s.store.path()).expect("read back");
        assert_eq!(on_disk, vec![0x51, 0x42, 0x43]);

        // second save finds nothing to do
        assert_eq!(save(&mut s).expect("save"), SaveOutcome::NothingToSave);
    }

    #[test]
    fn save_applies_edits_in_offset_order() {
        let (_dir, mut s) = session_with(&[0u8; 32]);
        s.overlay.set(20, 3);
        s.overlay.set(2, 1);
        s.overlay.set(9, 2);
        assert_eq!(save(&mut s).expect("save"), SaveOutcome::Saved(3));

        let on_disk = std::fs::read(s.store.path()).expect("read back");
        assert_eq!(on_disk[2], 1);
        assert_eq!(on_disk[9], 2);
        assert_eq!(on_disk[20], 3);
    }

    #[test]
    fn abandon_drops_edits_without_touching_the_file() {
        let (_dir, mut s) = session_with(b"ABC");
        assert_eq!(abandon(&mut s), AbandonOutcome::NothingToAbandon);

        assert!(s.edit('5'));
        assert_eq!(abandon(&mut s), AbandonOutcome::Abandoned(1));
        assert!(s.overlay.is_empty());
        assert_eq!(std::fs::read(s.store.path()).expect("read"), b"ABC");
    }

    #[test]
    fn structural_mutation_refused_while_edits_pending() {
        let (_dir, mut s) = session_with(b"ABCDEF");
        assert!(s.edit('5'));

        assert!(matches!(
            insert_bytes(&mut s, 0, 4),
            Err(MutationError::PendingEdits)
        ));
        assert!(matches!(
            delete_bytes(&mut s, 0, 2),
            Err(MutationError::PendingEdits)
        ));
        // the pending edit survived the refusals
        assert_eq!(s.overlay.len(), 1);
    }

    #[test]
    fn insert_clamps_count_and_resets_the_view() {
        let (_dir, mut s) = session_with(&[7u8; 10]);
        s.v_start = 0;
        s.cursor.digit = 3;

        let outcome = insert_bytes(&mut s, 5, 3).expect("insert");
        assert_eq!(outcome, StructuralOutcome::Done { count: 3 });
        assert_eq!(s.store.size(), 13);
        assert_eq!(s.store.read(5), Some(0));
        assert_eq!(s.store.read(8), Some(7));
        assert_eq!(s.v_start, 0);
        assert_eq!(s.cursor.digit, 0);

        // still fits in one 64-cell grid, so no scrolling is possible
        assert_eq!(s.geometry.scroll_to(12, s.store.size()), 0);

        let outcome = insert_bytes(&mut s, 0, 5000).expect("insert");
        assert_eq!(outcome, StructuralOutcome::Done { count: 1024 });
        assert_eq!(s.store.size(), 13 + 1024);

        assert_eq!(insert_bytes(&mut s, 0, 0).expect("insert"), StructuralOutcome::Noop);
    }

    #[test]
    fn delete_clamps_to_file_end() {
        let (_dir, mut s) = session_with(&[9u8; 10]);
        let outcome = delete_bytes(&mut s, 6, 500).expect("delete");
        assert_eq!(outcome, StructuralOutcome::Done { count: 4 });
        assert_eq!(s.store.size(), 6);
    }

    #[test]
    fn deleting_every_byte_ends_the_session() {
        let (_dir, mut s) = session_with(b"last");
        let outcome = delete_bytes(&mut s, 0, 4).expect("delete");
        assert_eq!(outcome, StructuralOutcome::FileNowEmpty);
        assert_eq!(s.store.size(), 0);
    }
}
