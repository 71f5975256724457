use crate::error::{RaidError, Result};

/// `FailureRegistry` is a fixed-size bitset over disk indices tracking
/// which disks are currently marked failed. A `Vec<bool>` rather than an
/// integer bitmask, sized once at construction and never resized or
/// reallocated, so it stays a fixed-size array in spirit while supporting
/// arbitrary disk counts.
#[derive(Debug, Clone)]
pub struct FailureRegistry {
    failed: Vec<bool>,
}

impl FailureRegistry {
    /// `new` creates a registry with all `n` disks marked healthy.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            failed: vec![false; n],
        }
    }

    /// `fail` sets the bit for disk `i`. Idempotent; performs no I/O.
    ///
    /// # Errors
    /// Returns `RaidError::Argument` if `i` is out of range.
    pub fn fail(&mut self, i: usize) -> Result<()> {
        self.bit_mut(i).map(|b| *b = true)
    }

    /// `clear` clears the bit for disk `i` without running rebuild. Used
    /// internally once a rebuild has completed.
    pub(crate) fn clear(&mut self, i: usize) {
        self.failed[i] = false;
    }

    /// `is_failed` reports whether disk `i` is marked failed.
    ///
    /// # Errors
    /// Returns `RaidError::Argument` if `i` is out of range.
    pub fn is_failed(&self, i: usize) -> Result<bool> {
        self.failed
            .get(i)
            .copied()
            .ok_or_else(|| RaidError::Argument(format!("disk index {i} out of range")))
    }

    /// `count_failed` returns how many disks are currently marked failed.
    #[must_use]
    pub fn count_failed(&self) -> usize {
        self.failed.iter().filter(|&&f| f).count()
    }

    fn bit_mut(&mut self, i: usize) -> Result<&mut bool> {
        self.failed
            .get_mut(i)
            .ok_or_else(|| RaidError::Argument(format!("disk index {i} out of range")))
    }
}
