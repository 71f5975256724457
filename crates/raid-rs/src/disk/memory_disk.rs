use std::io;

use super::BackingDisk;

/// `MemoryDisk` is a `Vec<u8>`-backed store: the in-memory test harness
/// implementation the design notes call for.
#[derive(Debug, Default, Clone)]
pub struct MemoryDisk {
    data: Vec<u8>,
}

impl MemoryDisk {
    /// `new` creates a zero-filled disk of `len` bytes.
    #[must_use]
    pub fn new(len: u64) -> Self {
        Self {
            data: vec![0u8; len as usize],
        }
    }
}

impl BackingDisk for MemoryDisk {
    fn length(&self) -> io::Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn set_length(&mut self, len: u64) -> io::Result<()> {
        self.data.resize(len as usize, 0);
        Ok(())
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let offset = offset as usize;
        if offset >= self.data.len() {
            return Ok(0);
        }
        let end = (offset + buf.len()).min(self.data.len());
        let n = end - offset;
        buf[..n].copy_from_slice(&self.data[offset..end]);
        Ok(n)
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<usize> {
        let offset = offset as usize;
        if offset >= self.data.len() {
            return Ok(0);
        }
        let end = (offset + buf.len()).min(self.data.len());
        let n = end - offset;
        self.data[offset..end].copy_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
