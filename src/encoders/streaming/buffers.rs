use crate::core::config::{MAX_BUFFER_SIZE, MIN_BUFFER_SIZE};
use crate::encoders::transcoder::{Direction, Operation};

/// The raw-byte and symbol buffers owned by one transcoding run.
///
/// Each buffer holds `size` bytes. Input chunks are sized so that one
/// chunk's output also fits in `size` bytes and so that every chunk except
/// the last is a whole number of groups.
#[derive(Debug)]
pub struct ChunkBuffers {
    raw: Vec<u8>,
    symbols: Vec<u8>,
    read_len: usize,
    direction: Direction,
}

impl ChunkBuffers {
    /// Allocates buffers for `operation`; `size` is clamped to
    /// [`MIN_BUFFER_SIZE`]..=[`MAX_BUFFER_SIZE`].
    pub fn new(operation: Operation, size: usize) -> Self {
        let size = size.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE);
        let read_len = chunk_len(operation, size);
        // A carried partial group can add one group of output to a chunk.
        let out_capacity = size + operation.output_group();
        let (raw, symbols) = match operation.direction {
            Direction::Encode => (vec![0u8; read_len], Vec::with_capacity(out_capacity)),
            Direction::Decode => (Vec::with_capacity(out_capacity), vec![0u8; read_len]),
        };
        ChunkBuffers {
            raw,
            symbols,
            read_len,
            direction: operation.direction,
        }
    }

    /// Bytes requested per read.
    pub fn read_len(&self) -> usize {
        self.read_len
    }

    /// Splits into (input buffer, cleared output buffer) for one iteration.
    pub fn split(&mut self) -> (&mut [u8], &mut Vec<u8>) {
        let (input, output) = match self.direction {
            Direction::Encode => (&mut self.raw, &mut self.symbols),
            Direction::Decode => (&mut self.symbols, &mut self.raw),
        };
        output.clear();
        (input.as_mut_slice(), output)
    }
}

/// Input chunk length for `operation` with buffers of `size` bytes.
///
/// Encoding reads `floor(size / group_symbols)` groups of raw bytes so the
/// encoded chunk fits a `size`-byte buffer; decoding reads the same number
/// of symbol groups.
pub fn chunk_len(operation: Operation, size: usize) -> usize {
    let groups = (size / operation.encoding.group_symbols()).max(1);
    groups * operation.input_group()
}
