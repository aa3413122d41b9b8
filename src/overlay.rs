use std::collections::BTreeMap;

/// Pending, uncommitted byte edits keyed by absolute file offset.
///
/// An entry exists for an offset iff the pending value differs from the
/// on-disk byte at the time the edit was made; edits that revert a byte to
/// its on-disk value remove the entry instead of storing a no-op.
///
/// A BTreeMap keeps iteration in ascending offset order, which is the order
/// `ByteStore::commit` expects, so no sort step is needed at save time.
#[derive(Debug, Default)]
pub struct EditOverlay {
    edits: BTreeMap<u64, u8>,
}

impl EditOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, offset: u64) -> Option<u8> {
        self.edits.get(&offset).copied()
    }

    pub fn set(&mut self, offset: u64, value: u8) {
        self.edits.insert(offset, value);
    }

    pub fn remove(&mut self, offset: u64) {
        self.edits.remove(&offset);
    }

    pub fn clear(&mut self) {
        self.edits.clear();
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// All pending edits in ascending offset order.
    pub fn entries(&self) -> impl Iterator<Item = (u64, u8)> + '_ {
        self.edits.iter().map(|(&offset, &value)| (offset, value))
    }
}
