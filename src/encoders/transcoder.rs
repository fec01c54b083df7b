use crate::core::alphabet::{Encoding, LookupTable, PADDING};
use crate::core::config::{DecodeOptions, DecodePolicy};
use crate::encoders::algorithms::chunked::{
    MAX_GROUP_BYTES, MAX_GROUP_SYMBOLS, pack_group, unpack_group,
};
use crate::encoders::algorithms::DecodeError;
use std::fmt;

/// Which way data flows through a transcoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Bytes to symbols
    Encode,
    /// Symbols to bytes
    Decode,
}

/// A direction paired with an encoding: everything needed to pick a
/// transcoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    pub direction: Direction,
    pub encoding: Encoding,
}

impl Operation {
    pub const fn new(direction: Direction, encoding: Encoding) -> Self {
        Operation {
            direction,
            encoding,
        }
    }

    pub const fn encode(encoding: Encoding) -> Self {
        Self::new(Direction::Encode, encoding)
    }

    pub const fn decode(encoding: Encoding) -> Self {
        Self::new(Direction::Decode, encoding)
    }

    /// Bytes of input that make up one group.
    pub const fn input_group(self) -> usize {
        match self.direction {
            Direction::Encode => self.encoding.group_bytes(),
            Direction::Decode => self.encoding.group_symbols(),
        }
    }

    /// Bytes of output that one full input group produces.
    pub const fn output_group(self) -> usize {
        match self.direction {
            Direction::Encode => self.encoding.group_symbols(),
            Direction::Decode => self.encoding.group_bytes(),
        }
    }

    /// Creates a fresh transcoder for this operation.
    ///
    /// `options` only affects decoding.
    pub fn transcoder(self, options: DecodeOptions) -> Box<dyn Transcoder> {
        match self.direction {
            Direction::Encode => Box::new(Encoder::new(self.encoding)),
            Direction::Decode => Box::new(Decoder::with_options(self.encoding, options)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.direction {
            Direction::Encode => "encode",
            Direction::Decode => "decode",
        };
        write!(f, "{} {}", verb, self.encoding)
    }
}

/// Incremental transform from one chunk of input to output.
///
/// Input may be split at any offset across calls to [`process`]; a partial
/// group is carried over until the next call or [`finish`]. The output is
/// the same as processing the whole input in a single call.
///
/// [`process`]: Transcoder::process
/// [`finish`]: Transcoder::finish
pub trait Transcoder {
    fn operation(&self) -> Operation;

    /// Transforms `chunk`, appending the result to `out`.
    fn process(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> Result<(), DecodeError>;

    /// Flushes the carried partial group at end of input.
    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), DecodeError>;

    /// True when no further input can change the output.
    fn is_done(&self) -> bool {
        false
    }
}

/// Chunkable encoder. Pads only in [`finish`](Transcoder::finish).
#[derive(Debug, Clone)]
pub struct Encoder {
    encoding: Encoding,
    pending: [u8; MAX_GROUP_BYTES],
    pending_len: usize,
}

impl Encoder {
    pub fn new(encoding: Encoding) -> Self {
        Encoder {
            encoding,
            pending: [0; MAX_GROUP_BYTES],
            pending_len: 0,
        }
    }

    fn emit(&self, group: &[u8], out: &mut Vec<u8>) {
        let mut symbols = [0u8; MAX_GROUP_SYMBOLS];
        pack_group(self.encoding, group, &mut symbols);
        out.extend_from_slice(&symbols[..self.encoding.group_symbols()]);
    }
}

impl Transcoder for Encoder {
    fn operation(&self) -> Operation {
        Operation::encode(self.encoding)
    }

    fn process(&mut self, mut chunk: &[u8], out: &mut Vec<u8>) -> Result<(), DecodeError> {
        let group_bytes = self.encoding.group_bytes();
        out.reserve((self.pending_len + chunk.len()) / group_bytes * self.encoding.group_symbols());

        // Complete a group carried over from the previous call.
        if self.pending_len > 0 {
            let take = (group_bytes - self.pending_len).min(chunk.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&chunk[..take]);
            self.pending_len += take;
            chunk = &chunk[take..];
            if self.pending_len < group_bytes {
                return Ok(());
            }
            let group = self.pending;
            self.emit(&group[..group_bytes], out);
            self.pending_len = 0;
        }

        let groups = chunk.chunks_exact(group_bytes);
        let remainder = groups.remainder();
        for group in groups {
            self.emit(group, out);
        }

        self.pending[..remainder.len()].copy_from_slice(remainder);
        self.pending_len = remainder.len();
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), DecodeError> {
        if self.pending_len > 0 {
            let group = self.pending;
            self.emit(&group[..self.pending_len], out);
            self.pending_len = 0;
        }
        Ok(())
    }
}

/// Chunkable decoder.
///
/// For padded encodings the first `=` ends the encoded data: the group in
/// progress is flushed and every later byte of the stream is ignored. Base16
/// has no padding, so `=` there is an ordinary invalid symbol.
#[derive(Debug, Clone)]
pub struct Decoder {
    encoding: Encoding,
    table: LookupTable,
    options: DecodeOptions,
    pending: [u8; MAX_GROUP_SYMBOLS],
    pending_len: usize,
    position: u64,
    terminated: bool,
}

impl Decoder {
    /// Creates a strict decoder that skips line breaks.
    pub fn new(encoding: Encoding) -> Self {
        Self::with_options(encoding, DecodeOptions::default())
    }

    pub fn with_options(encoding: Encoding, options: DecodeOptions) -> Self {
        Decoder {
            encoding,
            table: encoding.alphabet().lookup_table(),
            options,
            pending: [0; MAX_GROUP_SYMBOLS],
            pending_len: 0,
            position: 0,
            terminated: false,
        }
    }

    /// True once a padding symbol has been seen.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn flush_pending(&mut self, out: &mut Vec<u8>) {
        let mut bytes = [0u8; MAX_GROUP_BYTES];
        let n = unpack_group(self.encoding, &self.pending[..self.pending_len], &mut bytes);
        out.extend_from_slice(&bytes[..n]);
        self.pending_len = 0;
    }
}

impl Transcoder for Decoder {
    fn operation(&self) -> Operation {
        Operation::decode(self.encoding)
    }

    fn process(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> Result<(), DecodeError> {
        if self.terminated {
            self.position += chunk.len() as u64;
            return Ok(());
        }

        let group_symbols = self.encoding.group_symbols();
        out.reserve((self.pending_len + chunk.len()) / group_symbols * self.encoding.group_bytes());

        for (offset, &symbol) in chunk.iter().enumerate() {
            if symbol == PADDING && self.encoding.is_padded() {
                self.flush_pending(out);
                self.terminated = true;
                self.position += chunk.len() as u64;
                tracing::trace!(
                    position = self.position - (chunk.len() - offset) as u64,
                    "padding reached, ignoring rest of input"
                );
                return Ok(());
            }
            if self.options.ignore_newlines && matches!(symbol, b'\n' | b'\r') {
                continue;
            }

            let value = match self.options.policy {
                DecodePolicy::Lenient => self.table.get_or_zero(symbol),
                DecodePolicy::Strict => self.table.get(symbol).ok_or_else(|| {
                    DecodeError::invalid_symbol(
                        symbol,
                        self.position + offset as u64,
                        self.encoding,
                    )
                })?,
            };

            self.pending[self.pending_len] = value;
            self.pending_len += 1;
            if self.pending_len == group_symbols {
                self.flush_pending(out);
            }
        }

        self.position += chunk.len() as u64;
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), DecodeError> {
        if self.pending_len > 0 {
            self.flush_pending(out);
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.terminated
    }
}
