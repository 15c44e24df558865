//! The hash-function collaborator.
//!
//! The table never hashes on its own: it is handed a deterministic
//! `&str -> u64` at construction and only ever reduces the result modulo
//! its capacity. Any such function works; the built-ins below are handy
//! defaults and the pair used throughout the test suites.

/// A deterministic string hash chosen by the caller at construction time.
///
/// Blanket-implemented for every `Fn(&str) -> u64`, so plain functions and
/// closures both qualify. Implementations must be pure: the same key must
/// hash to the same value for the lifetime of the table, and they must not
/// call back into the table they serve (the debug reentrancy guard panics
/// if one does).
pub trait KeyHasher {
    fn hash_key(&self, key: &str) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Sum of the key's character code points. Weak but deterministic;
/// anagrams collide, which makes it useful for exercising probe chains.
pub fn additive(key: &str) -> u64 {
    key.chars().map(u64::from).sum()
}

/// Position-weighted code-point sum: character `i` contributes
/// `(i + 1) * code_point`. Distinguishes anagrams that [`additive`]
/// collides.
pub fn weighted(key: &str) -> u64 {
    key.chars()
        .enumerate()
        .map(|(i, c)| (i as u64 + 1) * u64::from(c))
        .sum()
}

/// FNV-1a over the key's UTF-8 bytes. The practical default when the
/// caller has no reason to pick anything else.
pub fn fnv1a(key: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    key.bytes().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}
