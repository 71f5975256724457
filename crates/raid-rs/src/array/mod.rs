//! Read/write engines, the failure registry, and the rebuild routine —
//! everything that operates across the full disk set for one stripe at a
//! time.

mod failure;
#[cfg(test)]
mod array_tests;

use tracing::{debug, info, trace};

use crate::disk::{BackingDisk, read_unit, write_unit};
use crate::error::{RaidError, Result};
use crate::geometry::{Geometry, SliceAddress};
use crate::xor::xor_into;

pub use failure::FailureRegistry;

/// `Raid5Array` owns the disk set, the rotating-parity geometry, the
/// failure registry, and the two reusable scratch buffers the read and
/// write engines XOR through.
pub struct Raid5Array {
    disks: Vec<Box<dyn BackingDisk>>,
    geometry: Geometry,
    failure: FailureRegistry,
    scratch_a: Vec<u8>,
    scratch_b: Vec<u8>,
}

impl Raid5Array {
    /// `new` validates and wraps a disk set.
    ///
    /// # Errors
    /// Returns `RaidError::Argument` if fewer than 3 disks are given or
    /// `u` is not positive. A disk's capability set is enforced by the
    /// `BackingDisk` trait bound at compile time, so there is no separate
    /// runtime check for it.
    pub fn new(disks: Vec<Box<dyn BackingDisk>>, u: usize) -> Result<Self> {
        if disks.len() < 3 {
            return Err(RaidError::Argument(format!(
                "RAID-5 requires at least 3 disks, got {}",
                disks.len()
            )));
        }
        if u == 0 {
            return Err(RaidError::Argument(
                "stripe unit size must be positive".to_string(),
            ));
        }
        let n = disks.len();
        Ok(Self {
            disks,
            geometry: Geometry::new(n, u),
            failure: FailureRegistry::new(n),
            scratch_a: vec![0u8; u],
            scratch_b: vec![0u8; u],
        })
    }

    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// `min_physical_length` returns the smallest backing length across
    /// every disk, used to derive the stream's initial logical length.
    ///
    /// # Errors
    /// Returns `RaidError::Io` if any disk's length cannot be queried.
    pub fn min_physical_length(&self) -> Result<u64> {
        self.disks
            .iter()
            .enumerate()
            .map(|(i, d)| {
                d.length().map_err(|source| RaidError::Io {
                    disk: i,
                    offset: 0,
                    source,
                })
            })
            .try_fold(u64::MAX, |acc, len| len.map(|len| acc.min(len)))
    }

    /// `ensure_physical_length` grows every non-failed disk to at least
    /// `required` bytes. Never shrinks a disk.
    ///
    /// # Errors
    /// Returns `RaidError::Io` if a disk cannot be grown.
    pub fn ensure_physical_length(&mut self, required: u64) -> Result<()> {
        for (i, disk) in self.disks.iter_mut().enumerate() {
            if self.failure.is_failed(i)? {
                continue;
            }
            let current = disk.length().map_err(|source| RaidError::Io {
                disk: i,
                offset: 0,
                source,
            })?;
            if current < required {
                disk.set_length(required).map_err(|source| RaidError::Io {
                    disk: i,
                    offset: 0,
                    source,
                })?;
            }
        }
        Ok(())
    }

    /// `fail` marks disk `i` failed. Idempotent; no I/O.
    ///
    /// # Errors
    /// Returns `RaidError::Argument` if `i` is out of range.
    pub fn fail(&mut self, i: usize) -> Result<()> {
        self.failure.fail(i)?;
        debug!(disk = i, "disk marked failed");
        Ok(())
    }

    /// `is_failed` reports whether disk `i` is marked failed.
    ///
    /// # Errors
    /// Returns `RaidError::Argument` if `i` is out of range.
    pub fn is_failed(&self, i: usize) -> Result<bool> {
        self.failure.is_failed(i)
    }

    /// `recover` rebuilds disk `i` from its surviving peers (if it was
    /// failed) and clears its failure bit. A no-op, with no I/O, if the
    /// disk was already healthy.
    ///
    /// # Errors
    /// Returns an error if rebuild I/O fails or `i` is out of range.
    pub fn recover(&mut self, i: usize) -> Result<()> {
        if !self.failure.is_failed(i)? {
            return Ok(());
        }
        self.rebuild_disk(i)?;
        self.failure.clear(i);
        Ok(())
    }

    /// `read_slice` services one intra-unit read, reconstructing via XOR
    /// if the target data disk is failed.
    ///
    /// # Errors
    /// Returns `RaidError::Integrity` if more than one disk is failed,
    /// or `RaidError::Io` on a backing-disk failure.
    pub fn read_slice(&mut self, addr: SliceAddress, chunk: usize, out: &mut [u8]) -> Result<()> {
        trace!(stripe = addr.stripe_index, disk = addr.data_disk, chunk, "read_slice");
        if !self.failure.is_failed(addr.data_disk)? {
            let disk = &mut self.disks[addr.data_disk];
            return read_unit(
                addr.data_disk,
                disk.as_mut(),
                addr.physical_offset + addr.offset_in_unit as u64,
                out,
                chunk,
            );
        }

        let failed_count = self.failure.count_failed();
        if failed_count != 1 {
            return Err(RaidError::Integrity { failed_count });
        }

        let u = self.geometry.u;
        self.scratch_a[..u].fill(0);
        for (i, disk) in self.disks.iter_mut().enumerate() {
            if i == addr.data_disk {
                continue;
            }
            read_unit(i, disk.as_mut(), addr.physical_offset, &mut self.scratch_b, u)?;
            xor_into(&mut self.scratch_a, &self.scratch_b, u);
        }
        out[..chunk]
            .copy_from_slice(&self.scratch_a[addr.offset_in_unit..addr.offset_in_unit + chunk]);
        Ok(())
    }

    /// `write_slice` services one intra-unit write via read-modify-write
    /// parity maintenance: old-data-read, old-parity-read, data-write,
    /// parity-write, strictly in that order.
    ///
    /// # Errors
    /// Returns `RaidError::DiskFailed` if the target data disk or the
    /// stripe's parity disk is failed, or `RaidError::Io` on a
    /// backing-disk failure.
    pub fn write_slice(&mut self, addr: SliceAddress, chunk: usize, patch: &[u8]) -> Result<()> {
        trace!(stripe = addr.stripe_index, disk = addr.data_disk, chunk, "write_slice");
        if self.failure.is_failed(addr.data_disk)? {
            return Err(RaidError::DiskFailed {
                disk: addr.data_disk,
            });
        }
        if self.failure.is_failed(addr.parity_disk)? {
            return Err(RaidError::DiskFailed {
                disk: addr.parity_disk,
            });
        }

        let u = self.geometry.u;

        // old-data-read
        read_unit(
            addr.data_disk,
            self.disks[addr.data_disk].as_mut(),
            addr.physical_offset,
            &mut self.scratch_a,
            u,
        )?;
        // old-parity-read
        read_unit(
            addr.parity_disk,
            self.disks[addr.parity_disk].as_mut(),
            addr.physical_offset,
            &mut self.scratch_b,
            u,
        )?;

        // scratch_b := old_parity ^ old_data
        xor_into(&mut self.scratch_b, &self.scratch_a, u);
        // scratch_a := new_data (overlay in place)
        self.scratch_a[addr.offset_in_unit..addr.offset_in_unit + chunk]
            .copy_from_slice(&patch[..chunk]);
        // scratch_b := old_parity ^ old_data ^ new_data == new_parity
        xor_into(&mut self.scratch_b, &self.scratch_a, u);

        // data-write
        write_unit(
            addr.data_disk,
            self.disks[addr.data_disk].as_mut(),
            addr.physical_offset,
            &self.scratch_a,
            u,
        )?;
        // parity-write
        write_unit(
            addr.parity_disk,
            self.disks[addr.parity_disk].as_mut(),
            addr.physical_offset,
            &self.scratch_b,
            u,
        )?;

        Ok(())
    }

    fn rebuild_disk(&mut self, i: usize) -> Result<()> {
        if i >= self.disks.len() {
            return Err(RaidError::Argument(format!("disk index {i} out of range")));
        }

        let u = self.geometry.u;
        let mut num_stripes = u64::MAX;
        for (j, disk) in self.disks.iter().enumerate() {
            if j == i {
                continue;
            }
            let len = disk.length().map_err(|source| RaidError::Io {
                disk: j,
                offset: 0,
                source,
            })?;
            num_stripes = num_stripes.min(len / u as u64);
        }

        let target_len = self.disks[i].length().map_err(|source| RaidError::Io {
            disk: i,
            offset: 0,
            source,
        })?;
        if target_len / u as u64 < num_stripes {
            return Err(RaidError::Argument(format!(
                "disk {i} has insufficient physical capacity to rebuild; replace it with a pre-sized store"
            )));
        }

        info!(disk = i, stripes = num_stripes, "rebuild starting");
        for s in 0..num_stripes {
            let offset = s * u as u64;
            self.scratch_a[..u].fill(0);
            for (j, disk) in self.disks.iter_mut().enumerate() {
                if j == i {
                    continue;
                }
                read_unit(j, disk.as_mut(), offset, &mut self.scratch_b, u)?;
                xor_into(&mut self.scratch_a, &self.scratch_b, u);
            }
            write_unit(i, self.disks[i].as_mut(), offset, &self.scratch_a, u)?;
        }
        info!(disk = i, stripes = num_stripes, "rebuild finished");

        Ok(())
    }

    /// `flush` flushes every non-failed disk.
    ///
    /// # Errors
    /// Returns `RaidError::Io` if a disk cannot be flushed.
    pub fn flush(&mut self) -> Result<()> {
        for (i, disk) in self.disks.iter_mut().enumerate() {
            if self.failure.is_failed(i)? {
                continue;
            }
            disk.flush().map_err(|source| RaidError::Io {
                disk: i,
                offset: 0,
                source,
            })?;
        }
        Ok(())
    }
}
