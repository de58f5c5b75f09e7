// Reversible byte-stream codec over 61-bit words.
//
// ByteReader slices a byte buffer into 61-bit chunks, LSB-first. A chunk
// whose low 60 bits are all ones is *ambiguous*: a 61-bit reducer folds the
// all-ones chunk onto zero, so the two chunks {mask, mask | 1<<60} cannot be
// told apart after a multiply/finalize round trip. The reader emits the mask
// for both and defers the high bit: the next word takes that bit as its LSB
// and consumes only 60 fresh bits from the stream. ByteWriter mirrors the
// state machine, writing ambiguous words with width 60 and completing the
// deferred bit from the following word.
//
// A buffer of 8n stream bits containing a ambiguous chunks expands to
// ceil((8n + a) / 61) words; exactly one emitted element per ambiguous chunk
// equals the mask, and no read consumes more than 61 bits. The writer's
// output covers the original bytes as a prefix and pads the final partial
// word with zeros, staying within n + 8 bytes.
//
// Every emitted word is below 2^61 and round-trips through the field
// arithmetic unchanged.

/// A chunk is ambiguous when all of these bits are set (the low 60).
pub const AMBIGUITY_MASK: u64 = (1 << 60) - 1;

/// Reads a byte buffer as a stream of 61-bit field words.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    acc: u128,
    buffered: u32,
    /// Content bits of `data` not yet consumed.
    content_bits: usize,
    /// Deferred high bit of the previous (ambiguous) chunk.
    pending: Option<u64>,
}

impl<'a> ByteReader<'a> {
    /// Upper bound on the words produced from `bytes` bytes.
    ///
    /// Every read consumes at least 60 fresh stream bits, except a final
    /// read that drains a deferred bit.
    pub const fn max_words(bytes: usize) -> usize {
        (bytes * 8).div_ceil(60)
    }

    /// Begin reading at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            acc: 0,
            buffered: 0,
            content_bits: data.len() * 8,
            pending: None,
        }
    }

    /// Take up to `n` bits from the stream, zero-padded past the end.
    #[inline]
    fn take_bits(&mut self, n: u32) -> u64 {
        while self.buffered < n && self.pos < self.data.len() {
            self.acc |= (self.data[self.pos] as u128) << self.buffered;
            self.buffered += 8;
            self.pos += 1;
        }

        let value = (self.acc & ((1u128 << n) - 1)) as u64;
        self.acc >>= n;
        self.buffered = self.buffered.saturating_sub(n);
        self.content_bits = self.content_bits.saturating_sub(n as usize);
        value
    }

    /// Read the next field word, or `None` once the data is exhausted.
    pub fn read(&mut self) -> Option<u64> {
        if self.content_bits == 0 && self.pending.is_none() {
            return None;
        }

        let word = match self.pending.take() {
            Some(bit) => (self.take_bits(60) << 1) | bit,
            None => self.take_bits(61),
        };

        if word & AMBIGUITY_MASK == AMBIGUITY_MASK {
            self.pending = Some(word >> 60);
            Some(AMBIGUITY_MASK)
        } else {
            Some(word)
        }
    }
}

impl<'a> Iterator for ByteReader<'a> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.read()
    }
}

/// Writes a stream of field words back into the byte form `ByteReader`
/// produced them from.
///
/// Only defined for word sequences a `ByteReader` can emit; in the erasure
/// pipeline that is the original reader output recovered word for word.
pub struct ByteWriter<'a> {
    out: &'a mut [u8],
    pos: usize,
    acc: u128,
    buffered: u32,
    /// Set after an ambiguous word whose high bit is still outstanding.
    escape: bool,
}

impl<'a> ByteWriter<'a> {
    /// Upper bound on bytes written for `words` words.
    pub const fn max_bytes_needed(words: usize) -> usize {
        (61 * words).div_ceil(8)
    }

    /// Begin writing at the start of `out`.
    pub fn new(out: &'a mut [u8]) -> Self {
        Self {
            out,
            pos: 0,
            acc: 0,
            buffered: 0,
            escape: false,
        }
    }

    #[inline]
    fn put_bits(&mut self, value: u64, n: u32) {
        self.acc |= ((value as u128) & ((1u128 << n) - 1)) << self.buffered;
        self.buffered += n;
        while self.buffered >= 8 {
            self.out[self.pos] = self.acc as u8;
            self.pos += 1;
            self.acc >>= 8;
            self.buffered -= 8;
        }
    }

    /// Append one word. `word` must be below 2^61.
    pub fn write(&mut self, word: u64) {
        debug_assert_eq!(word >> 61, 0);

        let (payload, width) = if self.escape {
            // The low bit completes the previous chunk.
            self.put_bits(word & 1, 1);
            (word >> 1, 60)
        } else {
            (word, 61)
        };

        if word & AMBIGUITY_MASK == AMBIGUITY_MASK {
            // High bit of this chunk is deferred to the next word.
            self.put_bits(payload, width - 1);
            self.escape = true;
        } else {
            self.put_bits(payload, width);
            self.escape = false;
        }
    }

    /// Write any trailing partial byte and return total bytes written.
    ///
    /// A reader-produced stream never ends with an escape outstanding.
    pub fn flush(mut self) -> usize {
        while self.buffered > 0 {
            self.out[self.pos] = self.acc as u8;
            self.pos += 1;
            self.acc >>= 8;
            self.buffered = self.buffered.saturating_sub(8);
        }
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sol64_field::memio::write_u64_le;
    use sol64_field::Random;

    const MAX_DATA_LENGTH: usize = 2000;

    fn round_trip(original: &[u8]) {
        let max_words = ByteReader::max_words(original.len());
        let max_bytes = ByteWriter::max_bytes_needed(max_words);

        let mut words = Vec::new();
        let mut reader = ByteReader::new(original);
        while let Some(w) = reader.read() {
            assert!(w >> 61 == 0);
            words.push(w);
        }
        assert!(
            words.len() <= max_words,
            "len={} words={} max={}",
            original.len(),
            words.len(),
            max_words
        );

        let mut recovered = vec![0u8; max_bytes];
        let mut writer = ByteWriter::new(&mut recovered);
        for w in &words {
            writer.write(*w);
        }
        let written = writer.flush();

        assert!(written <= max_bytes);
        assert!(written <= original.len() + 8);
        assert!(written >= original.len());
        assert_eq!(&recovered[..original.len()], original, "len={}", original.len());
    }

    #[test]
    fn ambiguous_chunk_emits_mask_then_carried_bit() {
        // Nine bytes: 64 one bits, then eight zero bits.
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

        // Exactly one emitted element carries the ambiguity mask, and the
        // read that produces it consumes no additional bit: the first chunk
        // (61 ones) collapses to the mask, and its high bit rides along as
        // the LSB of the following word, which takes only 60 fresh bits
        // (the three remaining ones plus zero padding). 72 stream bits plus
        // the one deferred bit make ceil(73 / 61) = 2 words.
        let words: Vec<u64> = ByteReader::new(&data).collect();
        assert_eq!(words, vec![AMBIGUITY_MASK, 0b1111]);
        assert_eq!(words.iter().filter(|w| **w == AMBIGUITY_MASK).count(), 1);

        // The writer reproduces the nine original bytes as the prefix of
        // its output; the rest is zero padding of the final partial word.
        let mut recovered = vec![0u8; ByteWriter::max_bytes_needed(words.len())];
        let mut writer = ByteWriter::new(&mut recovered);
        for w in &words {
            writer.write(*w);
        }
        let written = writer.flush();
        assert_eq!(written, 16);
        assert_eq!(&recovered[..9], &data[..]);
        assert!(recovered[9..written].iter().all(|b| *b == 0));

        round_trip(&data);
    }

    #[test]
    fn short_buffers_round_trip() {
        let simple: Vec<u8> = (0..16u8).collect();
        for n in 0..=simple.len() {
            round_trip(&simple[..n]);
        }

        let mut all_ones = [0xFFu8; 16];
        for n in 0..=all_ones.len() {
            round_trip(&all_ones[..n]);
        }

        // A non-overflowing byte in the middle of ones.
        all_ones[8] = 0;
        for n in 0..=all_ones.len() {
            round_trip(&all_ones[..n]);
        }
    }

    #[test]
    fn empty_reader_is_empty() {
        assert_eq!(ByteReader::new(&[]).read(), None);
        assert_eq!(ByteReader::max_words(0), 0);
    }

    #[test]
    fn chained_ambiguity_round_trips() {
        // 16 bytes of ones: every chunk is ambiguous in turn.
        let data = [0xFFu8; 16];
        let words: Vec<u64> = ByteReader::new(&data).collect();
        assert_eq!(words, vec![AMBIGUITY_MASK, AMBIGUITY_MASK, 0xFF]);
        round_trip(&data);

        // Long runs of ones at every alignment.
        let mut buf = vec![0u8; 64];
        for start in 0..8 {
            for len in 0..40 {
                buf.iter_mut().for_each(|b| *b = 0x55);
                let end = std::cmp::min(start + len, buf.len());
                buf[start..end].fill(0xFF);
                round_trip(&buf);
            }
        }
    }

    #[test]
    fn random_buffers_round_trip() {
        let mut prng = Random::new(14);
        let mut buf = vec![0u8; MAX_DATA_LENGTH + 8];

        for n in (1..MAX_DATA_LENGTH).step_by(7) {
            // Fill with random words, dense in all-ones.
            for k in (0..n).step_by(8) {
                let w = if prng.next() % 100 <= 3 {
                    u64::MAX
                } else {
                    prng.next()
                };
                write_u64_le(&mut buf[k..], w);
            }
            round_trip(&buf[..n]);
        }
    }

    #[test]
    fn unstructured_byte_fills_round_trip() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        // Byte-granular fills rather than word-granular ones, so chunk
        // boundaries fall everywhere.
        let mut rng = StdRng::seed_from_u64(15);
        for n in 0..300usize {
            let buf: Vec<u8> = (0..n).map(|_| rng.random()).collect();
            round_trip(&buf);
        }
    }
}
