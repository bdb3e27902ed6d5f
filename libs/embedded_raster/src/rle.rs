//! `Z2` run-length bodies.
//!
//! Every byte is one run: the top two bits select the palette index, the low
//! six bits give the number of pixels (0..=63). Runs fill the image in raster
//! order and may wrap across rows.

use alloc::vec::Vec;
use embedded_io::Read;

use crate::{ChunkReader, DecodeError, PixelCursor};

/// Bytes requested from the stream per poll.
pub const POLL_SIZE: usize = 512;
pub const MAX_RUN: usize = 0b0011_1111;

const COLOR_SHIFT: u32 = 6;

pub const fn split(byte: u8) -> (u8, usize) {
    (byte >> COLOR_SHIFT, (byte & MAX_RUN as u8) as usize)
}

/// Decodes runs from `reader` into `cursor` until the cursor is full.
///
/// Runs reaching past the end of the image are cut at the last pixel and
/// whatever follows in the stream is left unread. A stream that ends early
/// leaves the remaining pixels at index 0.
pub fn decode<R: Read>(
    reader: &mut ChunkReader<R>,
    cursor: &mut PixelCursor<'_>,
    poll_size: usize,
) -> Result<usize, DecodeError> {
    let poll_size = core::cmp::max(poll_size, 1);

    'stream: while !cursor.is_full() {
        let chunk = reader.read_chunk(poll_size)?;
        if chunk.is_empty() {
            warn!(
                "Z2 stream ended after {} pixels, {} left blank",
                cursor.position(),
                cursor.remaining()
            );
            break;
        }
        for (i, &byte) in chunk.iter().enumerate() {
            let (color, count) = split(byte);
            let written = cursor.fill(color, count)?;
            if cursor.is_full() {
                let discarded = count - written;
                if discarded > 0 || i + 1 < chunk.len() {
                    warn!(
                        "Z2 stream overshoots the image by {} pixels and {} bytes",
                        discarded,
                        chunk.len() - i - 1
                    );
                }
                break 'stream;
            }
        }
    }

    trace!("Z2 decoded {} pixels", cursor.position());
    Ok(cursor.position())
}

/// Encodes palette indices as `Z2` runs.
///
/// Only the low two bits of every index are kept.
pub fn encode(pixels: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut iter = pixels.iter().map(|&p| p & 0b11).peekable();
    while let Some(color) = iter.next() {
        let mut count = 1;
        while count < MAX_RUN && iter.peek() == Some(&color) {
            iter.next();
            count += 1;
        }
        out.push(color << COLOR_SHIFT | count as u8);
    }
    out
}
