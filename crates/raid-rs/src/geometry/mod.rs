//! Address mapper: stateless arithmetic from logical byte position to
//! physical (disk, offset) coordinates under left-symmetric rotating
//! parity.


/// `Geometry` bundles the constants derived from `(n, u)` at construction
/// time. It is a pure-function value type, not an owner of any I/O state.
#[derive(Copy, Clone, Debug)]
pub struct Geometry {
    /// Total number of disks.
    pub n: usize,
    /// Bytes per stripe unit.
    pub u: usize,
    /// Data slots per stripe (`n - 1`).
    pub d: usize,
    /// Logical bytes per stripe (`u * d`).
    pub s: usize,
}

/// The per-slice physical coordinates for one intra-unit read or write.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SliceAddress {
    /// Index of the stripe this slice falls in.
    pub stripe_index: u64,
    /// Disk holding the parity unit for this stripe.
    pub parity_disk: usize,
    /// Disk holding the target data unit for this slice.
    pub data_disk: usize,
    /// Byte offset within the unit where this slice starts.
    pub offset_in_unit: usize,
    /// Physical byte offset (same on every disk) of this stripe's units.
    pub physical_offset: u64,
}

impl Geometry {
    /// `new` builds a geometry for `n` disks with `u`-byte stripe units.
    ///
    /// # Panics
    /// Panics if `n < 3` or `u == 0` — callers must validate these via
    /// `Raid5Stream::new` before reaching here.
    #[must_use]
    pub const fn new(n: usize, u: usize) -> Self {
        assert!(n >= 3, "RAID-5 requires at least 3 disks");
        assert!(u > 0, "stripe unit size must be positive");
        let d = n - 1;
        Self { n, u, d, s: u * d }
    }

    /// `parity_disk` returns the disk holding parity for `stripe_index`,
    /// per the left-symmetric rotating rule:
    /// `(n - 1) - (stripe_index mod n)`.
    #[must_use]
    pub const fn parity_disk(&self, stripe_index: u64) -> usize {
        let n = self.n as u64;
        (self.n - 1) - (stripe_index % n) as usize
    }

    /// `data_disk` maps a logical slot within a stripe to its physical
    /// disk index, skipping over the parity disk.
    #[must_use]
    pub const fn data_disk(&self, slot_in_stripe: usize, parity_disk: usize) -> usize {
        if slot_in_stripe < parity_disk {
            slot_in_stripe
        } else {
            slot_in_stripe + 1
        }
    }

    /// `physical_offset` returns the byte offset of `stripe_index`'s units
    /// on every disk.
    #[must_use]
    pub const fn physical_offset(&self, stripe_index: u64) -> u64 {
        stripe_index * self.u as u64
    }

    /// `locate` computes the full `SliceAddress` for logical position `p`.
    #[must_use]
    pub fn locate(&self, p: u64) -> SliceAddress {
        let stripe_index = p / self.s as u64;
        let in_stripe = (p % self.s as u64) as usize;
        let slot_in_stripe = in_stripe / self.u;
        let offset_in_unit = in_stripe % self.u;

        let parity_disk = self.parity_disk(stripe_index);
        let data_disk = self.data_disk(slot_in_stripe, parity_disk);
        let physical_offset = self.physical_offset(stripe_index);

        SliceAddress {
            stripe_index,
            parity_disk,
            data_disk,
            offset_in_unit,
            physical_offset,
        }
    }

    /// `stripes_for_length` returns the number of whole stripes needed to
    /// cover `logical_len` bytes (`ceil(logical_len / s)`).
    #[must_use]
    pub fn stripes_for_length(&self, logical_len: u64) -> u64 {
        logical_len.div_ceil(self.s as u64)
    }

    /// `physical_len_for_length` returns the required per-disk physical
    /// length to back `logical_len` logical bytes (`ceil(L/S) * U`).
    #[must_use]
    pub fn physical_len_for_length(&self, logical_len: u64) -> u64 {
        self.stripes_for_length(logical_len) * self.u as u64
    }
}
