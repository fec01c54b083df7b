//! Streaming RFC 4648 transcoder: Base16, Base32, Base32hex and Base64.
//!
//! One-shot helpers [`encode`] and [`decode`] cover in-memory data. For
//! inputs of any size use [`StreamingTranscoder`] (or [`run`]), which moves
//! data through two fixed-size buffers and never splits a group across
//! reads.
//!
//! ```
//! use rfc4648_codec::{Encoding, decode, encode};
//!
//! assert_eq!(encode(b"Man", Encoding::Base64), "TWFu");
//! assert_eq!(decode("MY======", Encoding::Base32).unwrap(), b"f");
//! ```

mod core;
mod encoders;

pub use crate::core::alphabet::{Alphabet, Encoding, LookupTable, PADDING, build_lookup};
pub use crate::core::config::{
    ConfigError, DEFAULT_BUFFER_SIZE, DecodeOptions, DecodePolicy, MAX_BUFFER_SIZE, MIN_BUFFER_SIZE,
    Settings,
};
pub use crate::encoders::algorithms::padding::{live_symbols, padding_count};
pub use crate::encoders::algorithms::{DecodeError, TranscodeError};
pub use crate::encoders::chunked::{pack_group, unpack_group};
pub use crate::encoders::streaming::{
    ChunkBuffers, StreamingTranscoder, TranscodeSummary, chunk_len, run,
};
pub use crate::encoders::transcoder::{Decoder, Direction, Encoder, Operation, Transcoder};

/// Encodes `data` in one shot, padding the final group.
pub fn encode(data: &[u8], encoding: Encoding) -> String {
    let symbols = encoders::chunked::encode_chunked(data, encoding);
    // Every alphabet and the padding symbol are ASCII.
    symbols.into_iter().map(char::from).collect()
}

/// Decodes `encoded` in one shot.
///
/// Uses the strict policy and skips line breaks. Decoding stops at the
/// first `=`.
pub fn decode(encoded: &str, encoding: Encoding) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = Decoder::new(encoding);
    let mut result =
        Vec::with_capacity(encoded.len() / encoding.group_symbols() * encoding.group_bytes());
    decoder.process(encoded.as_bytes(), &mut result)?;
    decoder.finish(&mut result)?;
    Ok(result)
}
