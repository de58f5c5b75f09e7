// Field primitives for p = 2^64 - 2^32 + 1.
//
// Values are bare u64. Most operations accept and return *partially reduced*
// values: any u64 congruent to the intended result mod p. Only `finalize`
// guarantees the canonical representative in [0, p). The correction constant
// is c = 2^32 - 1 = -p mod 2^64, so wrapping past 2^64 is repaired by adding
// c, and wrapping below 0 by subtracting it; no chain ever needs more than
// two corrections.

/// The modulus p = 2^64 - 2^32 + 1.
pub const MODULUS: u64 = 0xffff_ffff_0000_0001;

/// -p mod 2^64 = 2^32 - 1. Two's complement, not bitwise complement.
///
/// Adding this is equivalent to subtracting p from a value that has wrapped
/// past 2^64.
pub const NOT_MODULUS: u64 = MODULUS.wrapping_neg();

// ---------------------------------------------------------------------------
// Wide multiplication
// ---------------------------------------------------------------------------

/// 64x64 -> 128-bit widening multiply, returns (lo, hi).
#[inline(always)]
pub const fn mul_wide(x: u64, y: u64) -> (u64, u64) {
    let res = x as u128 * y as u128;
    (res as u64, (res >> 64) as u64)
}

/// 64x64 -> 128-bit multiply built from 32x32->64 schoolbook products,
/// returns (lo, hi). Matches `mul_wide` bit for bit.
///
/// The middle accumulator holds a 64-bit product plus two 32-bit values:
///   (2^32-1)*(2^32-1) + (2^32-1) + (2^32-1) = 2^64 - 1,
/// so it cannot overflow regardless of input.
pub const fn mul_wide_emulated(x: u64, y: u64) -> (u64, u64) {
    let x0 = x & 0xffff_ffff;
    let x1 = x >> 32;
    let y0 = y & 0xffff_ffff;
    let y1 = y >> 32;

    let p00 = x0 * y0;
    let p01 = x0 * y1;
    let p10 = x1 * y0;
    let p11 = x1 * y1;

    let middle = p10 + (p00 >> 32) + (p01 & 0xffff_ffff);

    let hi = p11 + (middle >> 32) + (p01 >> 32);
    let lo = (middle << 32) | (p00 & 0xffff_ffff);
    (lo, hi)
}

// ---------------------------------------------------------------------------
// Addition and subtraction
// ---------------------------------------------------------------------------

/// x + y mod p, partially reduced in and out.
///
/// A carry out of the 64-bit sum is folded back with +c; that fold can carry
/// at most once more.
#[inline]
pub const fn add(x: u64, y: u64) -> u64 {
    let (mut r, carry) = x.overflowing_add(y);
    if carry {
        let (r2, carry2) = r.overflowing_add(NOT_MODULUS);
        r = r2;
        if carry2 {
            r = r.wrapping_add(NOT_MODULUS);
        }
    }
    r
}

/// Four-term sum x + y + z + w mod p, partially reduced in and out.
#[inline]
pub const fn add4(x: u64, y: u64, z: u64, w: u64) -> u64 {
    add(add(x, y), add(z, w))
}

/// x - y mod p, partially reduced in and out. Dual of `add`.
#[inline]
pub const fn subtract(x: u64, y: u64) -> u64 {
    let (mut r, borrow) = x.overflowing_sub(y);
    if borrow {
        let (r2, borrow2) = r.overflowing_sub(NOT_MODULUS);
        r = r2;
        if borrow2 {
            r = r.wrapping_sub(NOT_MODULUS);
        }
    }
    r
}

/// -x mod p for x in [0, p]. Returns 0 for both x = 0 and x = p.
///
/// `add(x, negate(x))` is congruent to 0 mod p across that whole range.
#[inline]
pub const fn negate(x: u64) -> u64 {
    if x == 0 {
        0
    } else {
        MODULUS.wrapping_sub(x)
    }
}

// ---------------------------------------------------------------------------
// Multiplication
// ---------------------------------------------------------------------------

/// x * y mod p for any u64 inputs, output partially reduced.
///
/// Reduction uses 2^64 = 2^32 - 1 (mod p). Writing the 128-bit product as
/// hi*2^64 + lo with hi = (a3 || a2):
///   hi*2^64 = a2*(2^32 - 1) - a3 (mod p),
/// because a3*2^32*(2^32 - 1) = a3*(2^64 - 2^32) = -a3 (mod p).
/// The +t addition gets one +c carry fix (the wrapped sum is at most
/// 2^64 - 2^33, so the fix cannot carry again) and the -a3 subtraction gets
/// one -c borrow fix (the wrapped difference is at least 2^64 - 2^32).
#[inline]
pub const fn multiply(x: u64, y: u64) -> u64 {
    let (lo, hi) = mul_wide(x, y);

    let a2 = hi & 0xffff_ffff;
    let a3 = hi >> 32;

    // t = a2 * (2^32 - 1)
    let t = (a2 << 32) - a2;

    let (mut r, carry) = lo.overflowing_add(t);
    if carry {
        r = r.wrapping_add(NOT_MODULUS);
    }
    let (r2, borrow) = r.overflowing_sub(a3);
    r = r2;
    if borrow {
        r = r.wrapping_sub(NOT_MODULUS);
    }
    r
}

// ---------------------------------------------------------------------------
// Reduction
// ---------------------------------------------------------------------------

/// Map any u64 into [0, p), preserving the value mod p. Branchless.
///
/// Every u64 is below 2p, so one conditional subtract suffices.
#[inline]
pub const fn partial_reduce(x: u64) -> u64 {
    let (r, under) = x.overflowing_sub(MODULUS);
    let mask = 0u64.wrapping_sub(under as u64);
    (x & mask) | (r & !mask)
}

/// Canonical representative in [0, p) of a partially reduced value.
#[inline]
pub const fn finalize(x: u64) -> u64 {
    if x >= MODULUS {
        x - MODULUS
    } else {
        x
    }
}

// ---------------------------------------------------------------------------
// Inversion
// ---------------------------------------------------------------------------

/// Multiplicative inverse of x mod p, or 0 if x is 0 mod p.
///
/// Unrolled unsigned extended GCD (Knuth Algorithm X) specialized for the
/// prime. Accepts any u64; the result is in (0, p). The convergent
/// denominators u1/v1 stay below p, so the update products never wrap.
///
/// Runtime depends on the input's quotient chain. NOT constant-time; never
/// call this on secret data.
pub fn inverse(x: u64) -> u64 {
    let mut u3 = x % MODULUS;
    let mut u1: u64 = 1;

    if u3 == 0 {
        return 0; // no inverse
    }

    let mut qt = MODULUS / u3;
    let mut v3 = MODULUS % u3;
    let mut v1 = qt;

    loop {
        if v3 == 0 {
            return if u3 == 1 { u1 } else { 0 };
        }

        qt = u3 / v3;
        u3 %= v3;
        u1 += qt * v1;

        if u3 == 0 {
            return if v3 == 1 { MODULUS - v1 } else { 0 };
        }

        qt = v3 / u3;
        v3 %= u3;
        v1 += qt * u1;
    }
}
