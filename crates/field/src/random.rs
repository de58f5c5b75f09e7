// Seeded pseudo-random numbers and seed mixing.
//
// The generator is xoshiro256+ with splitmix64 seed expansion, exactly as
// published by Blackman and Vigna. It is part of the wire contract: an
// encoder and a decoder that share a seed must derive identical coefficient
// sequences, so the algorithm is fixed here rather than delegated to an RNG
// crate whose output could change between versions.
//
// NOT cryptographic. `Random` mutates its four-word state on every draw and
// is not thread-safe; use one instance per thread or serialize access.

/// splitmix64: hash a 64-bit value to another 64-bit value.
///
/// Used for seed expansion and coefficient derivation.
#[inline]
pub const fn hash_u64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Hash a seed into a field element in [1, p).
///
/// Abbreviated splitmix mixer followed by a 61-bit draw: drop the weak low
/// bits, fold the single all-ones value down, then map 0 to 1. The result
/// lies in [1, 2^61 - 2]; the slight bias is acceptable for erasure-coding
/// coefficient selection.
#[inline]
pub const fn hash_to_nonzero_fp(seed: u64) -> u64 {
    let mut w = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    w = (w ^ (w >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);

    // Take the top 61 bits.
    w >>= 3;

    // Eliminate the all-ones value.
    w = w.wrapping_sub((w + 1) >> 61);

    // Eliminate 0.
    w = w.wrapping_add(w.wrapping_sub(1) >> 63);

    w
}

/// xoshiro256+ pseudo-random generator.
///
/// From <http://xoshiro.di.unimi.it/xoshiro256plus.c>, written in 2018 by
/// David Blackman and Sebastiano Vigna. The low 3 bits of `next` are slightly
/// weak according to the authors; the field draws discard them.
pub struct Random {
    state: [u64; 4],
}

impl Random {
    /// Construct a generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        let mut prng = Self { state: [0; 4] };
        prng.seed(seed);
        prng
    }

    /// Re-seed the generator. Fills the state with chained splitmix64
    /// outputs, as the xoshiro authors recommend. Somewhat expensive.
    pub fn seed(&mut self, x: u64) {
        let mut h = hash_u64(x);
        self.state[0] = h;
        h = hash_u64(h);
        self.state[1] = h;
        h = hash_u64(h);
        self.state[2] = h;
        h = hash_u64(h);
        self.state[3] = h;
    }

    /// Next 64-bit output.
    #[inline]
    pub fn next(&mut self) -> u64 {
        let [mut s0, mut s1, mut s2, mut s3] = self.state;

        let result = s0.wrapping_add(s3);

        let t = s1 << 17;
        s2 ^= s0;
        s3 ^= s1;
        s1 ^= s2;
        s0 ^= s3;
        s2 ^= t;
        s3 = s3.rotate_left(45);

        self.state = [s0, s1, s2, s3];

        result
    }

    /// Map a raw 64-bit draw to a field element in [0, p).
    ///
    /// Keeps the top 61 bits and folds the single out-of-range value down, so
    /// the result is in [0, 2^61 - 2].
    #[inline]
    pub const fn convert_rand_to_fp(word: u64) -> u64 {
        let mut w = word >> 3;
        w = w.wrapping_sub((w + 1) >> 61);
        w
    }

    /// Map a raw 64-bit draw to a field element in [1, p).
    #[inline]
    pub const fn convert_rand_to_nonzero_fp(word: u64) -> u64 {
        let mut w = Self::convert_rand_to_fp(word);
        w = w.wrapping_add(w.wrapping_sub(1) >> 63);
        w
    }

    /// Next field element in [0, p).
    #[inline]
    pub fn next_fp(&mut self) -> u64 {
        Self::convert_rand_to_fp(self.next())
    }

    /// Next nonzero field element in [1, p).
    #[inline]
    pub fn next_nonzero_fp(&mut self) -> u64 {
        Self::convert_rand_to_nonzero_fp(self.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fp::MODULUS;

    #[test]
    fn seeding_is_deterministic() {
        let mut a = Random::new(42);
        let mut b = Random::new(42);
        for _ in 0..16 {
            assert_eq!(a.next(), b.next());
        }

        let mut c = Random::new(43);
        assert_ne!(Random::new(42).next(), c.next());
    }

    #[test]
    fn field_draws_stay_in_range() {
        let mut prng = Random::new(7);
        for _ in 0..1_000_000 {
            let f = prng.next_fp();
            assert!(f < MODULUS);

            let nz = prng.next_nonzero_fp();
            assert!(nz >= 1 && nz < MODULUS);
        }
    }

    #[test]
    fn conversion_handles_boundary_words() {
        // Words shifted so the interesting values land in the top 61 bits.
        for i in -1000i64..1000 {
            let lo_word = (i as u64) << 3;
            assert!(Random::convert_rand_to_fp(lo_word) < MODULUS);
            let nz = Random::convert_rand_to_nonzero_fp(lo_word);
            assert!(nz >= 1 && nz < MODULUS);

            let hi_word = MODULUS.wrapping_add(i as u64) << 3;
            assert!(Random::convert_rand_to_fp(hi_word) < MODULUS);
            let nz = Random::convert_rand_to_nonzero_fp(hi_word);
            assert!(nz >= 1 && nz < MODULUS);
        }

        // The all-ones draw folds to the largest 61-bit value minus one.
        assert_eq!(Random::convert_rand_to_fp(u64::MAX), (1 << 61) - 2);
        // A zero draw maps to 0, and to 1 for the nonzero variant.
        assert_eq!(Random::convert_rand_to_fp(0), 0);
        assert_eq!(Random::convert_rand_to_nonzero_fp(0), 1);
    }

    #[test]
    fn hash_to_nonzero_fp_range_and_determinism() {
        for seed in 0..100_000u64 {
            let c = hash_to_nonzero_fp(seed);
            assert!(c >= 1 && c < MODULUS);
            assert_eq!(c, hash_to_nonzero_fp(seed));
        }
    }

    #[test]
    fn hash_u64_known_values() {
        // splitmix64 reference sequence from seed 0: successive outputs of
        // the published generator.
        assert_eq!(hash_u64(0), 0xe220a8397b1dcdaf);
        assert_eq!(hash_u64(0x9e3779b97f4a7c15), 0x6e789e6aa1b965f4);
    }
}
