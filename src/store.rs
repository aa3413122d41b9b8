use log::{debug, warn};
use memmap2::MmapMut;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("file is empty: {0}")]
    Empty(PathBuf),
    #[error("failed to map file: {0}")]
    Map(#[source] io::Error),
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
    // The replacement file is already in place but we can no longer map it.
    // The session cannot continue safely after this.
    #[error("file was replaced on disk but could not be re-opened: {0}")]
    Reopen(#[source] io::Error),
}

/// The file's bytes, memory-mapped read-write.
///
/// The mapping is only ever mutated by `commit` (point writes of pending
/// edits) or replaced wholesale by `insert`/`delete`, which rewrite the file
/// through a temp file in the same directory and an atomic rename.
pub struct ByteStore {
    path: PathBuf,
    file: File,
    map: Option<MmapMut>,
    size: u64,
}

impl ByteStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    StoreError::NotFound(path.clone())
                } else {
                    StoreError::Io(e)
                }
            })?;

        let size = file.metadata()?.len();
        if size == 0 {
            return Err(StoreError::Empty(path));
        }

        let map = unsafe { MmapMut::map_mut(&file) }.map_err(StoreError::Map)?;

        Ok(Self {
            path,
            file,
            map: Some(map),
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the on-disk byte at `offset`, or `None` past the end.
    pub fn read(&self, offset: u64) -> Option<u8> {
        self.map.as_ref()?.get(offset as usize).copied()
    }

    /// Applies pending edits directly into the mapping, then flushes to
    /// stable storage. Callers pass entries in ascending offset order; the
    /// size is unchanged so no remap happens.
    pub fn commit(&mut self, edits: &[(u64, u8)]) -> Result<(), StoreError> {
        let Some(map) = self.map.as_mut() else {
            return Err(StoreError::Io(io::Error::other("file is not mapped")));
        };
        for &(offset, value) in edits {
            if let Some(slot) = map.get_mut(offset as usize) {
                *slot = value;
            } else {
                warn!("commit: offset {} is past the end, skipped", offset);
            }
        }
        map.flush()?;
        debug!("committed {} edits to {:?}", edits.len(), self.path);
        Ok(())
    }

    /// Inserts `count` zero bytes at `offset`, shifting the tail up.
    pub fn insert(&mut self, offset: u64, count: u64) -> Result<(), StoreError> {
        debug!("insert {} bytes at offset {} in {:?}", count, offset, self.path);
        self.rewrite(offset, count, 0)
    }

    /// Deletes `count` bytes starting at `offset`. The caller clamps `count`
    /// to `size - offset`. Deleting every byte leaves the store unmapped
    /// with `size() == 0`; there is no valid mapping of an empty file.
    pub fn delete(&mut self, offset: u64, count: u64) -> Result<(), StoreError> {
        debug!("delete {} bytes at offset {} in {:?}", count, offset, self.path);
        self.rewrite(offset, 0, count)
    }

    /// Rewrites the whole file as head [0, offset) + `zeros` zero bytes +
    /// tail [offset + skip, size), via a temp file and atomic rename. On any
    /// failure before the rename the original file is untouched and the
    /// mapping is restored; after the rename a re-open failure is `Reopen`.
    fn rewrite(&mut self, offset: u64, zeros: u64, skip: u64) -> Result<(), StoreError> {
        let old_size = self.size;
        let new_size = old_size - skip + zeros;

        // Release the mapping before the file is replaced under it.
        self.map = None;

        match self.write_replacement(offset, zeros, skip, old_size) {
            Ok(()) => {
                if new_size == 0 {
                    self.size = 0;
                    Ok(())
                } else {
                    self.remap()
                }
            }
            Err(e) => {
                // The original is intact; re-establish the mapping so the
                // caller can keep editing and retry.
                if let Err(remap_err) = self.remap() {
                    warn!("could not restore mapping after failed rewrite: {}", remap_err);
                }
                Err(StoreError::Io(e))
            }
        }
    }

    fn write_replacement(
        &mut self,
        offset: u64,
        zeros: u64,
        skip: u64,
        old_size: u64,
    ) -> io::Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut src = BufReader::new(&self.file);
            src.seek(SeekFrom::Start(0))?;
            let mut dst = BufWriter::new(tmp.as_file_mut());

            io::copy(&mut src.by_ref().take(offset), &mut dst)?;
            io::copy(&mut io::repeat(0).take(zeros), &mut dst)?;

            src.seek(SeekFrom::Start(offset + skip))?;
            let tail = old_size.saturating_sub(offset + skip);
            io::copy(&mut src.by_ref().take(tail), &mut dst)?;
            dst.flush()?;
        }
        tmp.as_file().sync_all()?;

        // Atomic rename over the original. A failure here still leaves the
        // original in place; the temp file is removed on drop.
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remap(&mut self) -> Result<(), StoreError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(StoreError::Reopen)?;
        let size = file.metadata().map_err(StoreError::Reopen)?.len();
        let map = unsafe { MmapMut::map_mut(&file) }.map_err(StoreError::Reopen)?;
        self.file = file;
        self.map = Some(map);
        self.size = size;
        Ok(())
    }
}
