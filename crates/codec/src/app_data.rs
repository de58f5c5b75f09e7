// 64-bit word reader with an overflow-bit sidecar.
//
// The bulk region routines want to consume input buffers as raw little-endian
// u64 words. A word w is a valid field element unless w >= p, and every such
// word has bits 32..62 all set, so one extra bit per offending word is enough
// to make the mapping reversible: clear bit 63 before emitting (the cleared
// word is back inside the field) and append the cleared bit to an auxiliary
// bitstream. The auxiliary stream is flushed into caller-provided workspace
// as 63-bit-filled little-endian words, which are themselves field elements,
// and the caller runs the same per-word operation over them after the
// primary data.

use sol64_field::memio::{read_bytes_le, read_u64_le, write_u64_le};

/// A word needs an extra bit when all of these bits are set (bits 32..62).
pub const AMBIGUITY_MASK: u64 = 0x7fff_ffff_0000_0000;

/// Mask that clears the high bit of an ambiguous word.
pub const HIGH_BIT_MASK: u64 = 0x7fff_ffff_ffff_ffff;

/// Bits packed into each auxiliary overflow word.
pub const OVERFLOW_WORD_BITS: u32 = 63;

/// True if `word` needs an extra bit to represent it as a field element.
#[inline(always)]
pub const fn is_word_ambiguous(word: u64) -> bool {
    (word & AMBIGUITY_MASK) == AMBIGUITY_MASK
}

/// Streams 8-byte words out of application data, diverting high bits of
/// ambiguous words into a caller-provided workspace.
///
/// Borrows the workspace for its lifetime; `flush_and_word_count` consumes
/// the reader and releases the borrow so the caller can process the
/// auxiliary words.
pub struct AppDataReader<'a> {
    workspace: &'a mut [u8],
    write_pos: usize,
    acc: u64,
    available: u32,
}

impl<'a> AppDataReader<'a> {
    /// Workspace bytes needed for `bytes` of input.
    ///
    /// Only full input words can be ambiguous, so at most one overflow bit
    /// per 8 input bytes; the accumulator flushes 63 bits per auxiliary
    /// word.
    pub const fn workspace_bytes(bytes: usize) -> usize {
        let max_extra_bits = bytes / 8;
        let words = max_extra_bits.div_ceil(OVERFLOW_WORD_BITS as usize);
        words * 8
    }

    /// Upper bound on the bytes produced for `bytes` of input: the original
    /// data rounded up to whole words, plus the auxiliary overflow words.
    pub const fn max_output_bytes(bytes: usize) -> usize {
        let original_words = bytes.div_ceil(8);
        Self::workspace_bytes(bytes) + original_words * 8
    }

    /// Wrap a workspace buffer of at least `workspace_bytes` bytes.
    pub fn new(workspace: &'a mut [u8]) -> Self {
        Self {
            workspace,
            write_pos: 0,
            acc: 0,
            available: 0,
        }
    }

    /// Read the next full word of input and emit a field element.
    ///
    /// Call this for every complete 8-byte word of data, in order. `chunk`
    /// must hold at least 8 bytes.
    #[inline]
    pub fn read_next_word(&mut self, chunk: &[u8]) -> u64 {
        let mut word = read_u64_le(chunk);

        if is_word_ambiguous(word) {
            if self.available >= OVERFLOW_WORD_BITS {
                // Accumulator full: spill it and start over with this bit.
                write_u64_le(&mut self.workspace[self.write_pos..], self.acc);
                self.write_pos += 8;
                self.acc = word >> 63;
                self.available = 1;
            } else {
                self.acc |= (word >> 63) << self.available;
                self.available += 1;
            }

            word &= HIGH_BIT_MASK;
        }

        word
    }

    /// Read the final 1..=7 bytes of data, zero-extended.
    ///
    /// The high byte is zero, so the result is never ambiguous.
    #[inline]
    pub fn read_final_bytes(&self, chunk: &[u8], bytes: usize) -> u64 {
        read_bytes_le(chunk, bytes)
    }

    /// Flush any buffered overflow bits and return the number of auxiliary
    /// words written to the workspace. Consumes the reader, releasing the
    /// workspace borrow.
    pub fn flush_and_word_count(mut self) -> usize {
        if self.available != 0 {
            write_u64_le(&mut self.workspace[self.write_pos..], self.acc);
            self.write_pos += 8;
        }
        self.write_pos / 8
    }
}
