// Little-endian loads and stores.
//
// Field words live in byte buffers as little-endian u64s. `from_le_bytes` /
// `to_le_bytes` compile to single unaligned loads and stores on little-endian
// hosts and stay correct on big-endian or strict-alignment targets, so there
// is a single code path.

/// Read 8 bytes in little-endian byte order.
#[inline]
pub fn read_u64_le(data: &[u8]) -> u64 {
    u64::from_le_bytes(data[..8].try_into().unwrap())
}

/// Read 4 bytes in little-endian byte order.
#[inline]
pub fn read_u32_le(data: &[u8]) -> u32 {
    u32::from_le_bytes(data[..4].try_into().unwrap())
}

/// Read `bytes` (0..=8) bytes in little-endian byte order, zero-extended.
///
/// Returns 0 for `bytes` = 0 or any unsupported count.
#[inline]
pub fn read_bytes_le(data: &[u8], bytes: usize) -> u64 {
    if bytes == 0 || bytes > 8 {
        return 0;
    }
    let mut buf = [0u8; 8];
    buf[..bytes].copy_from_slice(&data[..bytes]);
    u64::from_le_bytes(buf)
}

/// Write 8 bytes in little-endian byte order.
#[inline]
pub fn write_u64_le(data: &mut [u8], value: u64) {
    data[..8].copy_from_slice(&value.to_le_bytes());
}

/// Write 4 bytes in little-endian byte order.
#[inline]
pub fn write_u32_le(data: &mut [u8], value: u32) {
    data[..4].copy_from_slice(&value.to_le_bytes());
}

/// Write the low `bytes` (0..=8) bytes of `value` in little-endian byte
/// order. A no-op for `bytes` = 0 or any unsupported count.
#[inline]
pub fn write_bytes_le(data: &mut [u8], bytes: usize, value: u64) {
    if bytes == 0 || bytes > 8 {
        return;
    }
    data[..bytes].copy_from_slice(&value.to_le_bytes()[..bytes]);
}
