// Erasure-encode driver.
//
// One recovery packet repairs one lost original: R = sum(m_i * f_i) with
// per-row coefficients derived from a shared seed. A decoder that knows the
// seed and the surviving rows rebuilds the coefficients with
// `recovery_coefficient` and solves for the missing row.

use log::{debug, trace};
use thiserror::Error;

use sol64_codec::AppDataReader;
use sol64_field::{hash_to_nonzero_fp, hash_u64};

use crate::region::{multiply_add_region, multiply_region};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("no input rows")]
    NoInput,
    #[error("row {index} has {actual} bytes, expected {expected}")]
    RowLengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("workspace buffer has {actual} bytes, need {needed}")]
    WorkspaceTooSmall { actual: usize, needed: usize },
    #[error("recovery buffer has {actual} bytes, need {needed}")]
    RecoveryTooSmall { actual: usize, needed: usize },
}

/// Coefficient applied to row `row` when encoding with `seed`.
///
/// Nonzero, in [1, p). Decoders reproduce the generator matrix row from
/// these.
#[inline]
pub fn recovery_coefficient(seed: u64, row: u64) -> u64 {
    hash_to_nonzero_fp(hash_u64(seed).wrapping_add(row))
}

/// Compute one recovery packet over `originals`, all rows the same length.
///
/// `workspace` needs `AppDataReader::workspace_bytes(row_len)` bytes and
/// `recovery` needs `AppDataReader::max_output_bytes(row_len)`. Returns the
/// recovery packet length: the rounded row length plus the widest overflow
/// extent across rows.
pub fn encode(
    originals: &[&[u8]],
    seed: u64,
    workspace: &mut [u8],
    recovery: &mut [u8],
) -> Result<usize, EncodeError> {
    let first = *originals.first().ok_or(EncodeError::NoInput)?;
    let bytes = first.len();

    for (index, row) in originals.iter().enumerate() {
        if row.len() != bytes {
            return Err(EncodeError::RowLengthMismatch {
                index,
                expected: bytes,
                actual: row.len(),
            });
        }
    }

    let workspace_needed = AppDataReader::workspace_bytes(bytes);
    if workspace.len() < workspace_needed {
        return Err(EncodeError::WorkspaceTooSmall {
            actual: workspace.len(),
            needed: workspace_needed,
        });
    }

    let recovery_needed = AppDataReader::max_output_bytes(bytes);
    if recovery.len() < recovery_needed {
        return Err(EncodeError::RecoveryTooSmall {
            actual: recovery.len(),
            needed: recovery_needed,
        });
    }

    debug!(
        "encoding {} rows of {} bytes, seed {:#018x}",
        originals.len(),
        bytes,
        seed
    );

    let seed_mix = hash_u64(seed);

    // Unroll the first column, then pad with zeros in case a later row
    // overflows further: multiply_add_region folds existing output words
    // into the field addition.
    let coeff0 = hash_to_nonzero_fp(seed_mix);
    let mut recovery_bytes = multiply_region(first, coeff0, workspace, recovery);
    recovery[recovery_bytes..recovery_needed].fill(0);

    for (i, row) in originals.iter().enumerate().skip(1) {
        let coeff = hash_to_nonzero_fp(seed_mix.wrapping_add(i as u64));
        trace!("row {}: coeff {:#018x}", i, coeff);

        let written = multiply_add_region(row, coeff, workspace, recovery);
        if recovery_bytes < written {
            recovery_bytes = written;
        }
    }

    Ok(recovery_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficient_derivation_is_stable_and_nonzero() {
        for seed in 0..100u64 {
            for row in 0..64u64 {
                let c = recovery_coefficient(seed, row);
                assert!(c >= 1);
                assert_eq!(c, hash_to_nonzero_fp(hash_u64(seed).wrapping_add(row)));
            }
        }
        // Distinct rows get distinct coefficients for a fixed seed.
        let c: Vec<u64> = (0..32).map(|i| recovery_coefficient(99, i)).collect();
        let mut dedup = c.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), c.len());
    }

    #[test]
    fn encode_validates_inputs() {
        let row = [0u8; 16];
        let short = [0u8; 8];
        let mut workspace = [0u8; 64];
        let mut recovery = [0u8; 64];

        assert_eq!(
            encode(&[], 1, &mut workspace, &mut recovery),
            Err(EncodeError::NoInput)
        );
        assert_eq!(
            encode(&[&row, &short], 1, &mut workspace, &mut recovery),
            Err(EncodeError::RowLengthMismatch {
                index: 1,
                expected: 16,
                actual: 8
            })
        );
        assert!(matches!(
            encode(&[&row, &row], 1, &mut workspace, &mut recovery[..8]),
            Err(EncodeError::RecoveryTooSmall { .. })
        ));
    }
}
