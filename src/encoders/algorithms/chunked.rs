//! Group packing and unpacking.
//!
//! A group is the smallest run of bytes that maps to a whole number of
//! symbols: LCM(bits_per_symbol, 8) bits. Every transform here works on one
//! bounded group at a time, so no state leaks between groups.

use super::padding::live_symbols;
use crate::core::alphabet::{Encoding, PADDING};

/// Largest group, in symbols (Base32).
pub const MAX_GROUP_SYMBOLS: usize = 8;

/// Largest group, in bytes (Base32).
pub const MAX_GROUP_BYTES: usize = 5;

/// Packs one group of raw bytes into symbols.
///
/// `input` holds between 1 and `group_bytes` bytes; fewer than a full group
/// means this is the final group of the stream, and the positions that would
/// need bytes past its end are written as `=`. Exactly `group_symbols`
/// symbols are written to the front of `out`.
pub fn pack_group(encoding: Encoding, input: &[u8], out: &mut [u8]) {
    let bits = encoding.bits_per_symbol();
    let group_bytes = encoding.group_bytes();
    let group_symbols = encoding.group_symbols();
    debug_assert!(!input.is_empty() && input.len() <= group_bytes);

    // Left-align the group in the low `group_bytes * 8` bits, zero-filling
    // the missing tail of a short group.
    let mut bit_buffer = 0u64;
    for i in 0..group_bytes {
        bit_buffer = (bit_buffer << 8) | input.get(i).copied().unwrap_or(0) as u64;
    }

    let total_bits = (group_bytes * 8) as u32;
    let mask = (1u64 << bits) - 1;
    let live = live_symbols(encoding, input.len());
    let alphabet = encoding.alphabet();

    for (k, slot) in out[..group_symbols].iter_mut().enumerate() {
        *slot = if k < live {
            let shift = total_bits - (k as u32 + 1) * bits;
            alphabet.symbol(((bit_buffer >> shift) & mask) as u8)
        } else {
            PADDING
        };
    }
}

/// Unpacks one group of symbol values into raw bytes.
///
/// `values` holds between 0 and `group_symbols` already-mapped values. A
/// short group yields `floor(len * bits / 8)` bytes; the leftover low bits
/// carry no data and are dropped. Returns the number of bytes written to
/// the front of `out`.
pub fn unpack_group(encoding: Encoding, values: &[u8], out: &mut [u8]) -> usize {
    let bits = encoding.bits_per_symbol();
    let group_symbols = encoding.group_symbols();
    debug_assert!(values.len() <= group_symbols);

    let mut bit_buffer = 0u64;
    for k in 0..group_symbols {
        bit_buffer = (bit_buffer << bits) | values.get(k).copied().unwrap_or(0) as u64;
    }

    let total_bits = (encoding.group_bytes() * 8) as u32;
    let produced = values.len() * bits as usize / 8;
    for (b, slot) in out[..produced].iter_mut().enumerate() {
        *slot = (bit_buffer >> (total_bits - (b as u32 + 1) * 8)) as u8;
    }
    produced
}

/// Encodes `data` in one shot, padding the final group.
pub fn encode_chunked(data: &[u8], encoding: Encoding) -> Vec<u8> {
    let mut result = Vec::with_capacity(encoding.encoded_len(data.len()));
    let mut group = [0u8; MAX_GROUP_SYMBOLS];
    let group_symbols = encoding.group_symbols();

    for chunk in data.chunks(encoding.group_bytes()) {
        pack_group(encoding, chunk, &mut group);
        result.extend_from_slice(&group[..group_symbols]);
    }

    result
}
