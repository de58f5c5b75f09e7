// Bulk region operations.
//
// A region is a byte buffer read as little-endian 64-bit words plus a 0..7
// byte tail. The hot loops process 32 bytes per iteration: the four
// multiplies per round are independent, which is what keeps the 64-bit
// multiplier pipeline full; this unrolling dominates real throughput and a
// one-word-at-a-time loop does not come close.
//
// Input words flow through AppDataReader, so every multiplied word is a
// field element and the auxiliary overflow words extend the output after the
// primary data.

use sol64_codec::app_data::{is_word_ambiguous, AppDataReader, OVERFLOW_WORD_BITS};
use sol64_field::fp::{add, finalize, inverse, multiply, MODULUS};
use sol64_field::memio::{read_u64_le, write_bytes_le, write_u64_le};

/// output[..] = data[..] * coeff.
///
/// Expands the data by up to `AppDataReader::max_output_bytes(data.len())`
/// bytes; `workspace` needs `AppDataReader::workspace_bytes(data.len())`.
/// `coeff` must be in [0, p). `output` is overwritten up to the returned
/// length, which is the rounded data length plus the overflow words.
pub fn multiply_region(data: &[u8], coeff: u64, workspace: &mut [u8], output: &mut [u8]) -> usize {
    let bytes = data.len();
    let rounded = (bytes + 7) & !7;

    debug_assert!(coeff < MODULUS);
    assert!(workspace.len() >= AppDataReader::workspace_bytes(bytes));
    assert!(output.len() >= AppDataReader::max_output_bytes(bytes));

    // Special fast cases.
    if coeff <= 1 {
        if coeff == 0 {
            output[..rounded].fill(0);
        } else {
            output[..bytes].copy_from_slice(data);
            output[bytes..rounded].fill(0);
        }
        return rounded;
    }

    let mut reader = AppDataReader::new(workspace);
    let mut src = 0;
    let mut dst = 0;
    let mut remaining = bytes;

    while remaining >= 32 {
        let x0 = multiply(coeff, reader.read_next_word(&data[src..]));
        let x1 = multiply(coeff, reader.read_next_word(&data[src + 8..]));
        let x2 = multiply(coeff, reader.read_next_word(&data[src + 16..]));
        let x3 = multiply(coeff, reader.read_next_word(&data[src + 24..]));

        write_u64_le(&mut output[dst..], x0);
        write_u64_le(&mut output[dst + 8..], x1);
        write_u64_le(&mut output[dst + 16..], x2);
        write_u64_le(&mut output[dst + 24..], x3);

        src += 32;
        dst += 32;
        remaining -= 32;
    }

    while remaining >= 8 {
        let x0 = multiply(coeff, reader.read_next_word(&data[src..]));
        write_u64_le(&mut output[dst..], x0);
        src += 8;
        dst += 8;
        remaining -= 8;
    }

    if remaining > 0 {
        let x0 = multiply(coeff, reader.read_final_bytes(&data[src..], remaining));
        write_u64_le(&mut output[dst..], x0);
        dst += 8;
    }

    // The overflow words get the same coefficient, extending the output.
    let extra_words = reader.flush_and_word_count();
    for i in 0..extra_words {
        let w = read_u64_le(&workspace[i * 8..]);
        write_u64_le(&mut output[dst..], multiply(coeff, w));
        dst += 8;
    }

    dst
}

/// output[..] = output[..] + data[..] * coeff.
///
/// Same buffer contracts as [`multiply_region`]. Existing output words up to
/// the returned length take part in the field addition, so callers must keep
/// the output zeroed through the maximum extent across rows.
pub fn multiply_add_region(
    data: &[u8],
    coeff: u64,
    workspace: &mut [u8],
    output: &mut [u8],
) -> usize {
    let bytes = data.len();
    let rounded = (bytes + 7) & !7;

    debug_assert!(coeff < MODULUS);
    assert!(workspace.len() >= AppDataReader::workspace_bytes(bytes));
    assert!(output.len() >= AppDataReader::max_output_bytes(bytes));

    // TODO: fast path for coeff == 1 (field add of the raw words, no multiplies).
    if coeff == 0 {
        return rounded;
    }

    let mut reader = AppDataReader::new(workspace);
    let mut src = 0;
    let mut dst = 0;
    let mut remaining = bytes;

    // This loop is nearly all of the encoder's execution time.
    while remaining >= 32 {
        let x0 = add(
            multiply(coeff, reader.read_next_word(&data[src..])),
            read_u64_le(&output[dst..]),
        );
        let x1 = add(
            multiply(coeff, reader.read_next_word(&data[src + 8..])),
            read_u64_le(&output[dst + 8..]),
        );
        let x2 = add(
            multiply(coeff, reader.read_next_word(&data[src + 16..])),
            read_u64_le(&output[dst + 16..]),
        );
        let x3 = add(
            multiply(coeff, reader.read_next_word(&data[src + 24..])),
            read_u64_le(&output[dst + 24..]),
        );

        write_u64_le(&mut output[dst..], x0);
        write_u64_le(&mut output[dst + 8..], x1);
        write_u64_le(&mut output[dst + 16..], x2);
        write_u64_le(&mut output[dst + 24..], x3);

        src += 32;
        dst += 32;
        remaining -= 32;
    }

    while remaining >= 8 {
        let x0 = add(
            multiply(coeff, reader.read_next_word(&data[src..])),
            read_u64_le(&output[dst..]),
        );
        write_u64_le(&mut output[dst..], x0);
        src += 8;
        dst += 8;
        remaining -= 8;
    }

    if remaining > 0 {
        let x0 = add(
            multiply(coeff, reader.read_final_bytes(&data[src..], remaining)),
            read_u64_le(&output[dst..]),
        );
        write_u64_le(&mut output[dst..], x0);
        dst += 8;
    }

    let extra_words = reader.flush_and_word_count();
    for i in 0..extra_words {
        let w = read_u64_le(&workspace[i * 8..]);
        let x = add(multiply(coeff, w), read_u64_le(&output[dst..]));
        write_u64_le(&mut output[dst..], x);
        dst += 8;
    }

    dst
}

/// Reverse [`multiply_region`]: turn a packed region back into the original
/// bytes.
///
/// `packed` is the full output of `multiply_region` (primary words followed
/// by overflow words, `packed.len()` equal to its return value) for the same
/// nonzero `coeff`; `original_bytes` is the pre-pack data length. Recovered
/// primary words that carry the ambiguous bit pattern take their high bit
/// back from the recovered overflow bitstream. Writes `original_bytes` bytes
/// to `output` and returns that count.
pub fn recover_region(packed: &[u8], coeff: u64, original_bytes: usize, output: &mut [u8]) -> usize {
    let primary_words = original_bytes.div_ceil(8);
    let rounded = primary_words * 8;

    assert!(coeff != 0 && coeff < MODULUS);
    assert!(packed.len() >= rounded);
    assert!(output.len() >= original_bytes);

    if coeff == 1 {
        output[..original_bytes].copy_from_slice(&packed[..original_bytes]);
        return original_bytes;
    }

    let inv = inverse(coeff);

    // Bits diverted at pack time sit in the overflow words after the primary
    // data, 63 per word, consumed here strictly in order. Each overflow word
    // is undone once, on first use.
    let mut bit_index = 0usize;
    let mut overflow_index = usize::MAX;
    let mut overflow_word = 0u64;

    for i in 0..primary_words {
        let mut word = finalize(multiply(inv, read_u64_le(&packed[i * 8..])));

        // Clearing the high bit kept bits 32..62 intact, so the words that
        // consumed an overflow bit are still recognizable.
        let tail_bytes = original_bytes - i * 8;
        if tail_bytes >= 8 {
            if is_word_ambiguous(word) {
                let bits = OVERFLOW_WORD_BITS as usize;
                if bit_index / bits != overflow_index {
                    overflow_index = bit_index / bits;
                    let raw = read_u64_le(&packed[rounded + overflow_index * 8..]);
                    overflow_word = finalize(multiply(inv, raw));
                }
                word |= ((overflow_word >> (bit_index % bits)) & 1) << 63;
                bit_index += 1;
            }
            write_u64_le(&mut output[i * 8..], word);
        } else {
            // The tail word was read zero-extended and is never ambiguous.
            write_bytes_le(&mut output[i * 8..], tail_bytes, word);
        }
    }

    original_bytes
}
