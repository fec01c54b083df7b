mod buffers;

pub use buffers::{ChunkBuffers, chunk_len};

use crate::core::config::{DEFAULT_BUFFER_SIZE, DecodeOptions, Settings};
use crate::encoders::algorithms::TranscodeError;
use crate::encoders::transcoder::Operation;
use std::io::{self, Read, Write};

/// Byte counts reported after a streaming run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscodeSummary {
    /// Non-empty chunks read from the input
    pub chunks: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Streaming transcoder for inputs of any size.
///
/// Reads the input in bounded chunks, transforms each chunk and writes and
/// flushes the result before reading the next one, so memory use is fixed
/// by the buffer size. Suitable for large files or pipes.
pub struct StreamingTranscoder<W: Write> {
    operation: Operation,
    writer: W,
    buffer_size: usize,
    decode_options: DecodeOptions,
}

impl<W: Write> StreamingTranscoder<W> {
    /// Creates a streaming transcoder with default buffer size and decode
    /// options.
    ///
    /// # Arguments
    ///
    /// * `operation` - Direction and encoding to apply
    /// * `writer` - The destination for transcoded output
    pub fn new(operation: Operation, writer: W) -> Self {
        StreamingTranscoder {
            operation,
            writer,
            buffer_size: DEFAULT_BUFFER_SIZE,
            decode_options: DecodeOptions::default(),
        }
    }

    /// Sets the capacity of each chunk buffer.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Sets how decoding treats bytes outside the alphabet and line breaks.
    pub fn with_decode_options(mut self, options: DecodeOptions) -> Self {
        self.decode_options = options;
        self
    }

    /// Applies buffer size and decode options from loaded settings.
    pub fn with_settings(self, settings: &Settings) -> Self {
        self.with_buffer_size(settings.buffer_size())
            .with_decode_options(settings.decode_options())
    }

    /// Transcodes everything `reader` yields.
    ///
    /// Stops at the first empty read, or once decoding has reached padding.
    /// On a decode error the output of every earlier chunk has already been
    /// written.
    pub fn transcode<R: Read>(&mut self, reader: &mut R) -> Result<TranscodeSummary, TranscodeError> {
        let mut buffers = ChunkBuffers::new(self.operation, self.buffer_size);
        let mut transcoder = self.operation.transcoder(self.decode_options);
        let mut summary = TranscodeSummary::default();

        tracing::debug!(
            operation = %self.operation,
            chunk = buffers.read_len(),
            "starting transcode"
        );

        loop {
            let (input, output) = buffers.split();
            let bytes_read = read_full(reader, input)?;
            if bytes_read == 0 {
                break;
            }

            transcoder.process(&input[..bytes_read], output)?;
            self.writer.write_all(output)?;
            self.writer.flush()?;

            summary.chunks += 1;
            summary.bytes_read += bytes_read as u64;
            summary.bytes_written += output.len() as u64;
            tracing::trace!(chunk = summary.chunks, bytes_read, written = output.len(), "chunk done");

            if transcoder.is_done() {
                tracing::debug!(chunks = summary.chunks, "end of encoded data, not reading further");
                break;
            }
        }

        let (_, output) = buffers.split();
        transcoder.finish(output)?;
        self.writer.write_all(output)?;
        self.writer.flush()?;
        summary.bytes_written += output.len() as u64;

        tracing::debug!(
            chunks = summary.chunks,
            bytes_read = summary.bytes_read,
            bytes_written = summary.bytes_written,
            "transcode finished"
        );
        Ok(summary)
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Transcodes `reader` into `writer` using `settings`.
pub fn run<R: Read, W: Write>(
    operation: Operation,
    reader: &mut R,
    writer: W,
    settings: &Settings,
) -> Result<TranscodeSummary, TranscodeError> {
    StreamingTranscoder::new(operation, writer)
        .with_settings(settings)
        .transcode(reader)
}

/// Read as many bytes as possible into buf, retrying on partial reads.
///
/// Returns less than `buf.len()` only at end of input.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::Encoding;
    use crate::encoders::algorithms::DecodeError;
    use std::io::Cursor;

    /// Reader that hands out at most `step` bytes per call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    fn transcode(operation: Operation, data: &[u8], buffer_size: usize) -> Vec<u8> {
        let mut output = Vec::new();
        StreamingTranscoder::new(operation, &mut output)
            .with_buffer_size(buffer_size)
            .transcode(&mut Cursor::new(data))
            .unwrap();
        output
    }

    #[test]
    fn test_streaming_encode_decode_base64() {
        let data = b"Hello, World! This is a streaming test with multiple chunks of data.";
        let encoded = transcode(Operation::encode(Encoding::Base64), data, 16);
        assert_eq!(encoded, crate::encode(data, Encoding::Base64).as_bytes());

        let decoded = transcode(Operation::decode(Encoding::Base64), &encoded, 16);
        assert_eq!(data, &decoded[..]);
    }

    #[test]
    fn test_streaming_large_data() {
        // Crosses many chunk boundaries with a small buffer.
        let data: Vec<u8> = (0..100000).map(|i| (i % 251) as u8).collect();
        for encoding in Encoding::ALL {
            let encoded = transcode(Operation::encode(encoding), &data, 64);
            assert_eq!(encoded.len(), encoding.encoded_len(data.len()));
            let decoded = transcode(Operation::decode(encoding), &encoded, 64);
            assert_eq!(data, decoded, "{encoding}");
        }
    }

    #[test]
    fn test_short_reads_do_not_split_groups() {
        let data: Vec<u8> = (0..1000).map(|i| (i * 7 % 256) as u8).collect();
        for encoding in Encoding::ALL {
            let expected = crate::encode(&data, encoding);
            let mut output = Vec::new();
            let mut reader = Trickle { data: &data, step: 7 };
            StreamingTranscoder::new(Operation::encode(encoding), &mut output)
                .with_buffer_size(32)
                .transcode(&mut reader)
                .unwrap();
            assert_eq!(output, expected.as_bytes(), "{encoding}");
        }
    }

    #[test]
    fn test_summary_counts() {
        let data = [0u8; 10];
        let mut streamer =
            StreamingTranscoder::new(Operation::encode(Encoding::Base64), Vec::new())
                .with_buffer_size(8);
        let summary = streamer.transcode(&mut Cursor::new(&data)).unwrap();
        // 6-byte chunks: 6 + 4.
        assert_eq!(summary.chunks, 2);
        assert_eq!(summary.bytes_read, 10);
        assert_eq!(summary.bytes_written, 16);
        assert_eq!(streamer.into_inner(), b"AAAAAAAAAAAAAA==");
    }

    #[test]
    fn test_stops_reading_after_padding() {
        struct Unreadable;
        impl Read for Unreadable {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("read past end of encoded data"))
            }
        }

        // The first 8-byte chunk holds the padding; the failing reader
        // behind it must never be touched.
        let mut reader = Cursor::new(b"TQ==AAAA").chain(Unreadable);
        let mut streamer =
            StreamingTranscoder::new(Operation::decode(Encoding::Base64), Vec::new())
                .with_buffer_size(8);
        let summary = streamer.transcode(&mut reader).unwrap();

        assert_eq!(summary.chunks, 1);
        assert_eq!(summary.bytes_read, 8);
        assert_eq!(streamer.into_inner(), b"M");
    }

    #[test]
    fn test_empty_input() {
        let summary = run(
            Operation::encode(Encoding::Base32),
            &mut io::empty(),
            io::sink(),
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(summary, TranscodeSummary::default());
    }

    #[test]
    fn test_decode_error_keeps_earlier_output() {
        let mut encoded = crate::encode(&[1u8; 30], Encoding::Base64).into_bytes();
        encoded.extend_from_slice(b"AB%D");
        let mut output = Vec::new();
        let err = StreamingTranscoder::new(Operation::decode(Encoding::Base64), &mut output)
            .with_buffer_size(40)
            .transcode(&mut Cursor::new(&encoded))
            .unwrap_err();

        match err {
            TranscodeError::Decode(DecodeError::InvalidSymbol { symbol, position, .. }) => {
                assert_eq!(symbol, b'%');
                assert_eq!(position, 42);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(output, [1u8; 30]);
    }

    #[test]
    fn test_write_error_propagates() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = StreamingTranscoder::new(Operation::encode(Encoding::Base16), Broken)
            .transcode(&mut Cursor::new(b"data"))
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe));
    }
}
