//! Pluggable 64-bit hashers for the rule index.
//!
//! The index is keyed by the hash of the rule text rather than the text
//! itself, so the hasher must be deterministic for the lifetime of a
//! database: the same bytes always hash to the same value.

use std::hash::BuildHasher;

/// Hash function used to key the rule index.
pub trait SuffixHasher: Send + Sync {
    /// Hash a byte string to 64 bits.
    fn hash64(&self, data: &[u8]) -> u64;
}

impl<F> SuffixHasher for F
where
    F: Fn(&[u8]) -> u64 + Send + Sync,
{
    fn hash64(&self, data: &[u8]) -> u64 {
        self(data)
    }
}

/// FNV-1a 64-bit hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fnv1a;

impl SuffixHasher for Fnv1a {
    #[inline]
    fn hash64(&self, data: &[u8]) -> u64 {
        fnv1a_hash(data)
    }
}

/// FNV-1a 64-bit hash function.
pub fn fnv1a_hash(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 14695981039346656037;
    const FNV_PRIME: u64 = 1099511628211;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// aHash-backed hasher with fixed seeds.
///
/// Seeds are fixed so that hashes are stable across the lifetime of the
/// process; they are not stable across aHash versions or platforms.
#[derive(Clone)]
pub struct AHash64 {
    state: ahash::RandomState,
}

impl AHash64 {
    /// Create a hasher with the default seeds.
    pub fn new() -> Self {
        Self::with_seeds(
            0x243f_6a88_85a3_08d3,
            0x1319_8a2e_0370_7344,
            0xa409_3822_299f_31d0,
            0x082e_fa98_ec4e_6c89,
        )
    }

    /// Create a hasher with custom seeds.
    pub fn with_seeds(k0: u64, k1: u64, k2: u64, k3: u64) -> Self {
        Self {
            state: ahash::RandomState::with_seeds(k0, k1, k2, k3),
        }
    }
}

impl Default for AHash64 {
    fn default() -> Self {
        Self::new()
    }
}

impl SuffixHasher for AHash64 {
    #[inline]
    fn hash64(&self, data: &[u8]) -> u64 {
        BuildHasher::hash_one(&self.state, data)
    }
}
