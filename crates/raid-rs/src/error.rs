//! Typed error kinds surfaced by the RAID-5 core.

use thiserror::Error;

/// `RaidError` enumerates every way a `Raid5Stream` operation can fail.
///
/// Variants map 1:1 onto the error kinds of the read/write/rebuild
/// engines; none are retried internally, so callers see exactly what
/// failed and where.
#[derive(Debug, Error)]
pub enum RaidError {
    /// Invalid constructor or call argument: too few disks, a
    /// non-positive stripe unit, an out-of-range disk index, or a
    /// negative length/position.
    #[error("{0}")]
    Argument(String),

    /// A write targeted a data or parity disk that is currently marked
    /// failed.
    #[error("disk {disk} is marked failed; refusing write")]
    DiskFailed {
        /// Index of the failed disk that blocked the write.
        disk: usize,
    },

    /// A read required reconstruction but found more than one disk
    /// failed.
    #[error("cannot reconstruct: {failed_count} disks are marked failed (max 1 supported)")]
    Integrity {
        /// Number of disks observed failed at the time of the check.
        failed_count: usize,
    },

    /// A short or failed read/write against a backing disk, or
    /// end-of-store reached before a full unit was obtained.
    #[error("I/O error on disk {disk} at offset {offset}: {source}")]
    Io {
        /// Index of the disk the I/O was attempted against.
        disk: usize,
        /// Physical offset the I/O was attempted at.
        offset: u64,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// A seek produced a negative logical position.
    #[error("seek would move position below zero")]
    Seek,
}

/// Convenience alias used throughout the core.
pub type Result<T> = std::result::Result<T, RaidError>;

impl From<RaidError> for std::io::Error {
    fn from(err: RaidError) -> Self {
        match err {
            RaidError::Io { source, .. } => source,
            other => std::io::Error::other(other),
        }
    }
}
