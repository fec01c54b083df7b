//! Padding decisions for a short final group.

use crate::core::alphabet::Encoding;

// Indexed by `input_len % group_bytes`.
const BASE16_PADDING: &[usize] = &[0];
const BASE32_PADDING: &[usize] = &[0, 6, 4, 3, 1];
const BASE64_PADDING: &[usize] = &[0, 2, 1];

/// Number of `=` symbols that close a final group holding `remainder` bytes.
///
/// `remainder` is the input length modulo the group size; zero means the
/// input ended on a group boundary.
pub fn padding_count(encoding: Encoding, remainder: usize) -> usize {
    let table = match encoding {
        Encoding::Base16 => BASE16_PADDING,
        Encoding::Base32 | Encoding::Base32Hex => BASE32_PADDING,
        Encoding::Base64 => BASE64_PADDING,
    };
    table[remainder % encoding.group_bytes()]
}

/// Number of data symbols emitted for a group holding `len` bytes.
pub fn live_symbols(encoding: Encoding, len: usize) -> usize {
    if len >= encoding.group_bytes() {
        encoding.group_symbols()
    } else if len == 0 {
        0
    } else {
        encoding.group_symbols() - padding_count(encoding, len)
    }
}
