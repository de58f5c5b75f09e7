// Packing codecs that map byte streams to field-word sequences and back.
//
// Two families with separate roles:
//
// - app_data: 64-bit words with an overflow-bit sidecar. The bulk multiply
//   routines read input words directly; words whose direct interpretation
//   would not be a field element get their high bit moved into an auxiliary
//   bitstream so that every emitted word is in [0, p).
//
// - word_io / byte_io: dense 61-bit serialization. word_io packs 61-bit
//   values edge to edge; byte_io is the reversible byte-stream variant that
//   escapes the one chunk pattern a 61-bit reducer cannot round-trip.

pub mod app_data;
pub mod byte_io;
pub mod word_io;

pub use app_data::AppDataReader;
pub use byte_io::{ByteReader, ByteWriter};
pub use word_io::{WordReader, WordWriter};
