// Finite field arithmetic modulo the Solinas prime p = 2^64 - 2^32 + 1.
//
// The prime is one subtraction away from 2^64, so a field element is a bare
// u64 and the carry out of any 64-bit operation folds back in with at most
// two small corrections. Elements are kept *partially reduced* (any u64,
// congruent to the intended value) through chains of adds and multiplies;
// `fp::finalize` produces the canonical representative when one is needed.
//
// - fp: add/subtract/negate/multiply/inverse and the reduction helpers
// - memio: little-endian loads and stores for 4/8/0..=8-byte values
// - random: splitmix64 mixer and a xoshiro256+ generator with field draws

pub mod fp;
pub mod memio;
pub mod random;

pub use random::{hash_to_nonzero_fp, hash_u64, Random};
