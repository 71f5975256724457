//! The stream façade: `Length`, `Position`, `Seek`, `SetLength`, `Flush`,
//! `Read`, `Write` over the array's engines, plus the failure control
//! surface.


use std::io::{self, SeekFrom};
use std::time::Instant;

use crate::array::Raid5Array;
use crate::disk::BackingDisk;
use crate::error::{RaidError, Result};
use crate::geometry::Geometry;
use crate::metrics::{self, IoOpType, RaidOp};

/// `Raid5Stream` is the public aggregate: an ordered disk set, rotating
/// parity, a failure registry, and the logical length/position pair
/// callers see as one seekable byte stream.
pub struct Raid5Stream {
    array: Raid5Array,
    geometry: Geometry,
    length: u64,
    position: u64,
}

impl Raid5Stream {
    /// `new` constructs a stream over `disks` with `stripe_unit_size`
    /// bytes per unit. Initial length is the largest multiple of the
    /// stripe that fits in the smallest disk; initial position is 0.
    ///
    /// # Errors
    /// Returns `RaidError::Argument` if fewer than 3 disks are given or
    /// the stripe unit size is not positive.
    pub fn new(disks: Vec<Box<dyn BackingDisk>>, stripe_unit_size: usize) -> Result<Self> {
        let array = Raid5Array::new(disks, stripe_unit_size)?;
        let geometry = *array.geometry();
        let min_len = array.min_physical_length()?;
        // Largest whole number of stripes that fits in the smallest disk.
        let stripes = min_len / geometry.u as u64;
        Ok(Self {
            array,
            geometry,
            length: stripes * geometry.s as u64,
            position: 0,
        })
    }

    /// `length` returns the current logical length `L`.
    #[must_use]
    pub const fn length(&self) -> u64 {
        self.length
    }

    /// `position` returns the current logical position `P`.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// `set_position` seeks to an absolute position from the start.
    ///
    /// # Errors
    /// Returns `RaidError::Seek` if `p` would be negative — unreachable
    /// for the unsigned `p` this method takes, kept for API symmetry
    /// with `seek`.
    pub fn set_position(&mut self, p: u64) -> Result<()> {
        self.seek(SeekFrom::Start(p)).map(|_| ())
    }

    /// `seek` moves the logical position and returns the new value.
    /// Seeking past `length()` is allowed; the next read returns zero
    /// bytes and the next write auto-extends.
    ///
    /// # Errors
    /// Returns `RaidError::Seek` if the resulting position would be
    /// negative.
    pub fn seek(&mut self, origin: SeekFrom) -> Result<u64> {
        let new_pos = match origin {
            SeekFrom::Start(p) => i128::from(p),
            SeekFrom::Current(delta) => i128::from(self.position) + i128::from(delta),
            SeekFrom::End(delta) => i128::from(self.length) + i128::from(delta),
        };
        if new_pos < 0 {
            return Err(RaidError::Seek);
        }
        self.position = u64::try_from(new_pos)
            .map_err(|_| RaidError::Argument("seek position exceeds addressable range".into()))?;
        Ok(self.position)
    }

    /// `set_length` changes the logical length, growing every non-failed
    /// disk's physical backing as needed. Never shrinks a disk; does not
    /// move `position()`.
    ///
    /// # Errors
    /// Returns `RaidError::Io` if a disk cannot be grown.
    pub fn set_length(&mut self, v: u64) -> Result<()> {
        let required = self.geometry.physical_len_for_length(v);
        self.array.ensure_physical_length(required)?;
        self.length = v;
        Ok(())
    }

    /// `flush` flushes every non-failed disk.
    ///
    /// # Errors
    /// Returns `RaidError::Io` if a disk cannot be flushed.
    pub fn flush(&mut self) -> Result<()> {
        self.array.flush()
    }

    /// `fail_disk` marks disk `i` failed.
    ///
    /// # Errors
    /// Returns `RaidError::Argument` if `i` is out of range.
    pub fn fail_disk(&mut self, i: usize) -> Result<()> {
        self.array.fail(i)
    }

    /// `recover_disk` rebuilds and clears the failure bit for disk `i`,
    /// or is a no-op if it was not failed.
    ///
    /// # Errors
    /// Returns an error if rebuild I/O fails or `i` is out of range.
    pub fn recover_disk(&mut self, i: usize) -> Result<()> {
        self.array.recover(i)
    }

    /// `is_disk_failed` reports whether disk `i` is marked failed.
    ///
    /// # Errors
    /// Returns `RaidError::Argument` if `i` is out of range.
    pub fn is_disk_failed(&self, i: usize) -> Result<bool> {
        self.array.is_failed(i)
    }

    /// `read` fills `buf[offset..offset+count]` from the current
    /// position, advancing it by the number of bytes actually read.
    /// Clamped to `length() - position()`; reading at or past the end
    /// returns 0.
    ///
    /// # Errors
    /// Returns `RaidError::Argument` for out-of-bounds `(offset, count)`,
    /// `RaidError::Integrity` if reconstruction needs more than one
    /// failed disk, or `RaidError::Io` on backing-disk failure.
    pub fn read(&mut self, buf: &mut [u8], offset: usize, count: usize) -> Result<usize> {
        let start = metrics::is_enabled().then(Instant::now);
        let result = self.read_unmetered(buf, offset, count);

        if let Some(start) = start {
            metrics::record_raid_op(RaidOp {
                op: IoOpType::Read,
                bytes: result.as_ref().ok().copied().unwrap_or(0) as u64,
                latency_seconds: start.elapsed().as_secs_f64(),
                error: result.is_err(),
            });
        }

        result
    }

    fn read_unmetered(&mut self, buf: &mut [u8], offset: usize, count: usize) -> Result<usize> {
        offset
            .checked_add(count)
            .filter(|&end| end <= buf.len())
            .ok_or_else(|| RaidError::Argument("read(buf, offset, count) out of bounds".into()))?;

        let available = self.length.saturating_sub(self.position);
        let to_read = (count as u64).min(available) as usize;
        if to_read == 0 {
            return Ok(0);
        }

        let mut done = 0;
        while done < to_read {
            let addr = self.geometry.locate(self.position);
            let chunk = (self.geometry.u - addr.offset_in_unit).min(to_read - done);
            self.array
                .read_slice(addr, chunk, &mut buf[offset + done..offset + done + chunk])?;
            self.position += chunk as u64;
            done += chunk;
        }
        Ok(done)
    }

    /// `write` writes `buf[offset..offset+count]` at the current
    /// position, auto-extending `length()` first if the write would run
    /// past it, then advances the position by `count`.
    ///
    /// # Errors
    /// Returns `RaidError::Argument` for out-of-bounds `(offset, count)`,
    /// `RaidError::DiskFailed` if the target data or parity disk for a
    /// touched stripe is failed, or `RaidError::Io` on backing-disk
    /// failure.
    pub fn write(&mut self, buf: &[u8], offset: usize, count: usize) -> Result<usize> {
        let start = metrics::is_enabled().then(Instant::now);
        let result = self.write_unmetered(buf, offset, count);

        if let Some(start) = start {
            metrics::record_raid_op(RaidOp {
                op: IoOpType::Write,
                bytes: result.as_ref().ok().copied().unwrap_or(0) as u64,
                latency_seconds: start.elapsed().as_secs_f64(),
                error: result.is_err(),
            });
        }

        result
    }

    fn write_unmetered(&mut self, buf: &[u8], offset: usize, count: usize) -> Result<usize> {
        offset
            .checked_add(count)
            .filter(|&end| end <= buf.len())
            .ok_or_else(|| RaidError::Argument("write(buf, offset, count) out of bounds".into()))?;

        let end = self.position + count as u64;
        if end > self.length {
            self.set_length(end)?;
        }

        let mut done = 0;
        while done < count {
            let addr = self.geometry.locate(self.position);
            let chunk = (self.geometry.u - addr.offset_in_unit).min(count - done);
            self.array
                .write_slice(addr, chunk, &buf[offset + done..offset + done + chunk])?;
            self.position += chunk as u64;
            done += chunk;
        }
        Ok(count)
    }
}

impl io::Read for Raid5Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len();
        Raid5Stream::read(self, buf, 0, len).map_err(Into::into)
    }
}

impl io::Write for Raid5Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len();
        Raid5Stream::write(self, buf, 0, len).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        Raid5Stream::flush(self).map_err(Into::into)
    }
}

impl io::Seek for Raid5Stream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Raid5Stream::seek(self, pos).map_err(Into::into)
    }
}
