//! Packed index entries.
//!
//! An entry stores the location of a rule in the rule buffer together with
//! its ICANN flag and kind, all in a single `u64`:
//!
//! ```text
//!  63   62..56   55..........28   27...........0
//! +---+--------+----------------+----------------+
//! | I |  kind  |       lo       |       hi       |
//! +---+--------+----------------+----------------+
//! ```
//!
//! Offsets are 28 bits wide, so the rule buffer is capped at
//! [`MAX_OFFSET`] bytes (256 MiB). Real PSL data is well under 1 MiB.

use std::fmt;
use std::ops::Range;

use crate::error::{Error, Result};
use crate::RuleKind;

/// Width of the `lo`/`hi` offset fields.
pub const OFFSET_BITS: u32 = 28;

/// Largest offset an entry can address.
pub const MAX_OFFSET: u32 = (1 << OFFSET_BITS) - 1;

const ICANN_SHIFT: u32 = 63;
const KIND_SHIFT: u32 = 56;
const KIND_MASK: u64 = 0x7f;
const OFFSET_MASK: u64 = MAX_OFFSET as u64;

/// A packed `(lo, hi, icann, kind)` record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Entry(u64);

impl Entry {
    /// Pack the given fields.
    ///
    /// Fails if either offset does not fit in 28 bits or `lo > hi`.
    pub fn encode(lo: u32, hi: u32, icann: bool, kind: RuleKind) -> Result<Self> {
        if hi > MAX_OFFSET {
            return Err(Error::CapacityExceeded {
                offset: hi as usize,
                max: MAX_OFFSET,
            });
        }
        if lo > hi {
            return Err(Error::InvalidRange { lo, hi });
        }
        Ok(Self(
            (icann as u64) << ICANN_SHIFT
                | (kind.as_u8() as u64) << KIND_SHIFT
                | (lo as u64) << OFFSET_BITS
                | hi as u64,
        ))
    }

    /// Unpack into `(lo, hi, icann, kind)`.
    pub fn decode(self) -> (u32, u32, bool, RuleKind) {
        (self.lo(), self.hi(), self.icann(), self.kind())
    }

    /// Start offset in the rule buffer.
    #[inline]
    pub fn lo(self) -> u32 {
        ((self.0 >> OFFSET_BITS) & OFFSET_MASK) as u32
    }

    /// End offset (exclusive) in the rule buffer.
    #[inline]
    pub fn hi(self) -> u32 {
        (self.0 & OFFSET_MASK) as u32
    }

    /// Whether the rule came from the ICANN section.
    #[inline]
    pub fn icann(self) -> bool {
        self.0 >> ICANN_SHIFT == 1
    }

    /// Rule kind. Unknown kind bits read as `Regular`.
    #[inline]
    pub fn kind(self) -> RuleKind {
        RuleKind::from_u8(((self.0 >> KIND_SHIFT) & KIND_MASK) as u8).unwrap_or_default()
    }

    /// Byte range in the rule buffer.
    #[inline]
    pub fn range(self) -> Range<usize> {
        self.lo() as usize..self.hi() as usize
    }

    /// Raw packed value.
    pub fn bits(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("lo", &self.lo())
            .field("hi", &self.hi())
            .field("icann", &self.icann())
            .field("kind", &self.kind())
            .finish()
    }
}
