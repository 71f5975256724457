//! RAID-5 virtualization core: a single seekable byte stream striped
//! across N independent backing disks with rotating parity.

pub mod array;
pub mod disk;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod stream;
pub mod xor;

pub use array::{FailureRegistry, Raid5Array};
pub use disk::{BackingDisk, MemoryDisk, MmapDisk};
pub use error::{RaidError, Result};
pub use geometry::{Geometry, SliceAddress};
pub use stream::Raid5Stream;
