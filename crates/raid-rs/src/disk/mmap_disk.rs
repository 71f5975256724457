use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use memmap2::{MmapMut, MmapOptions};

use super::BackingDisk;

/// `MmapDisk` is a file-backed store, memory-mapped for the lifetime of
/// the disk. New space opened by `set_length` reads back as zero, as
/// guaranteed by the OS for a sparse-extended file.
pub struct MmapDisk {
    path: PathBuf,
    file: File,
    map: MmapMut,
    len: u64,
}

impl MmapDisk {
    /// `open` opens (creating if necessary) the file at `path` and
    /// ensures it is at least `len` bytes, mapping it read/write.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, resized, or mapped.
    pub fn open(path: impl AsRef<Path>, len: u64) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let current = file.metadata()?.len();
        let len = current.max(len);
        file.set_len(len)?;

        let map = Self::map_file(&file, len)?;

        Ok(Self {
            path,
            file,
            map,
            len,
        })
    }

    fn map_file(file: &File, len: u64) -> io::Result<MmapMut> {
        if len == 0 {
            // A zero-length mapping is invalid; keep a minimal backing
            // page so reads/writes at offset 0 of an empty disk behave.
            file.set_len(1)?;
            return unsafe { MmapOptions::new().len(1).map_mut(file) };
        }
        let map_len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "disk length too large"))?;
        unsafe { MmapOptions::new().len(map_len).map_mut(file) }
    }

    /// `path` returns the backing file's path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BackingDisk for MmapDisk {
    fn length(&self) -> io::Result<u64> {
        Ok(self.len)
    }

    fn set_length(&mut self, len: u64) -> io::Result<()> {
        if len <= self.len {
            return Ok(());
        }
        self.file.set_len(len)?;
        self.map = Self::map_file(&self.file, len)?;
        self.len = len;
        Ok(())
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let Ok(offset) = usize::try_from(offset) else {
            return Ok(0);
        };
        let disk_len = self.map.len();
        if offset >= disk_len {
            return Ok(0);
        }
        let end = offset.saturating_add(buf.len()).min(disk_len);
        let n = end - offset;
        buf[..n].copy_from_slice(&self.map[offset..end]);
        Ok(n)
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<usize> {
        let Ok(offset) = usize::try_from(offset) else {
            return Ok(0);
        };
        let disk_len = self.map.len();
        if offset >= disk_len {
            return Ok(0);
        }
        let end = offset.saturating_add(buf.len()).min(disk_len);
        let n = end - offset;
        self.map[offset..end].copy_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.map.flush()
    }
}
