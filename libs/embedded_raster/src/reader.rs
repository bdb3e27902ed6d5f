use alloc::vec::Vec;
use embedded_io::Read;

use crate::ReadError;

const SKIP_CHUNK: usize = 64;

/// Turns a stream that may return short reads into exact-size reads.
///
/// The internal buffer grows to the largest chunk requested and is reused for
/// every following read, so a decoder that requests one scanline at a time
/// allocates exactly once.
pub struct ChunkReader<R> {
    stream: R,
    buffer: Vec<u8>,
    position: usize,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(stream: R) -> Self {
        Self::with_capacity(stream, 0)
    }

    pub fn with_capacity(stream: R, capacity: usize) -> Self {
        ChunkReader {
            stream,
            buffer: alloc::vec![0; capacity],
            position: 0,
        }
    }

    /// Total number of bytes handed out so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.stream
    }

    /// Reads exactly `len` bytes.
    ///
    /// Every poll is bounded by the bytes still missing, so the stream can
    /// never hand over more than `len` and nothing has to be carried over to
    /// the next call.
    pub fn read_exact(&mut self, len: usize) -> Result<&[u8], ReadError> {
        if self.buffer.len() < len {
            self.buffer.resize(len, 0);
        }

        let mut filled = 0;
        while filled < len {
            let read = self
                .stream
                .read(&mut self.buffer[filled..len])
                .map_err(ReadError::from_io_error)?;
            if read == 0 {
                return Err(ReadError::Truncated {
                    expected: len,
                    received: filled,
                });
            }
            trace!("chunk reader: polled {} bytes ({}/{})", read, filled + read, len);
            filled += read;
        }

        self.position += len;
        Ok(&self.buffer[..len])
    }

    /// Polls the stream once for up to `max` bytes.
    ///
    /// Returns an empty slice at the end of the stream.
    pub fn read_chunk(&mut self, max: usize) -> Result<&[u8], ReadError> {
        if self.buffer.len() < max {
            self.buffer.resize(max, 0);
        }
        if max == 0 {
            return Ok(&self.buffer[..0]);
        }

        let read = self
            .stream
            .read(&mut self.buffer[..max])
            .map_err(ReadError::from_io_error)?;
        self.position += read;
        Ok(&self.buffer[..read])
    }

    /// Discards exactly `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<(), ReadError> {
        let mut remaining = len;
        while remaining > 0 {
            let step = core::cmp::min(remaining, SKIP_CHUNK);
            self.read_exact(step).map_err(|error| match error {
                ReadError::Truncated { received, .. } => ReadError::Truncated {
                    expected: len,
                    received: len - remaining + received,
                },
                other => other,
            })?;
            remaining -= step;
        }
        Ok(())
    }
}
