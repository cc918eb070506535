//! Build states for the `weft` hash containers.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// StableState

const SEED: FixedState = FixedState::with_seed(0x5EED_7E47_0B1E_C7A1);

/// `foldhash` seeded with a constant.
///
/// Two runs of the same program hash the same keys to the same values, so
/// anything derived from iteration order (error messages, registry dumps)
/// is reproducible.
///
/// ```
/// use core::hash::BuildHasher;
/// use weft_utils::hash::StableState;
///
/// assert_eq!(StableState.hash_one("legCount"), StableState.hash_one("legCount"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct StableState;

impl BuildHasher for StableState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        SEED.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// TypeIdState

/// Hasher for keys that are already uniformly distributed 64-bit values.
///
/// `TypeId` hashes itself with one `write_u64`, which is taken verbatim.
#[derive(Copy, Clone, Default, Debug)]
pub struct TypeIdHasher(u64);

impl Hasher for TypeIdHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut word = [0_u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            self.0 ^= u64::from_le_bytes(word);
        }
    }

    #[inline]
    fn write_u64(&mut self, value: u64) {
        self.0 = value;
    }
}

/// Build state for [`TypeIdHasher`].
///
/// ```
/// use core::any::TypeId;
/// use core::hash::BuildHasher;
/// use weft_utils::hash::TypeIdState;
///
/// let a = TypeIdState.hash_one(TypeId::of::<String>());
/// assert_eq!(a, TypeIdState.hash_one(TypeId::of::<String>()));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct TypeIdState;

impl BuildHasher for TypeIdState {
    type Hasher = TypeIdHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        TypeIdHasher(0)
    }
}

#[cfg(test)]
mod tests {
    use super::{StableState, TypeIdState};
    use core::hash::{BuildHasher, Hasher};

    #[test]
    fn u64_passes_through() {
        let mut hasher = TypeIdState.build_hasher();
        hasher.write_u64(0xABCD);
        assert_eq!(hasher.finish(), 0xABCD);
    }

    #[test]
    fn bytes_fold_into_words() {
        let mut hasher = TypeIdState.build_hasher();
        hasher.write(&[1, 0, 0, 0, 0, 0, 0, 0, 2]);
        assert_eq!(hasher.finish(), 1 ^ 2);
    }

    #[test]
    fn stable_state_distinguishes_keys() {
        assert_ne!(StableState.hash_one("a"), StableState.hash_one("b"));
    }
}
