//! Palette-indexed Windows BMP bodies.
//!
//! Only the subset produced by image servers is handled: `BITMAPINFOHEADER`
//! or later, uncompressed, bottom-up, 1/2/4/8 bits per pixel. The image is
//! streamed one scanline at a time.

use embedded_io::Read;
use zerocopy::{
    FromBytes,
    byteorder::little_endian::{I32, U16, U32},
};

use crate::{Bitmap, ChunkReader, DecodeError, Limits, Palette, format::MAGIC_LEN};

/// Rest of the 14 byte file header plus the DIB header size field.
#[repr(C)]
#[derive(zerocopy::FromBytes, zerocopy::KnownLayout, zerocopy::Immutable)]
struct FileHeader {
    file_size: U32,
    reserved: U32,
    pixel_offset: U32,
    dib_size: U32,
}

/// `BITMAPINFOHEADER` without its leading size field.
#[repr(C)]
#[derive(zerocopy::FromBytes, zerocopy::KnownLayout, zerocopy::Immutable)]
struct InfoHeader {
    width: I32,
    height: I32,
    planes: U16,
    bit_depth: U16,
    compression: U32,
    image_size: U32,
    x_pixels_per_meter: I32,
    y_pixels_per_meter: I32,
    colors_used: U32,
    colors_important: U32,
}

const FILE_HEADER_LEN: usize = core::mem::size_of::<FileHeader>();
const DIB_SIZE_LEN: usize = 4;
const INFO_HEADER_LEN: usize = DIB_SIZE_LEN + core::mem::size_of::<InfoHeader>();
/// `BITMAPV5HEADER`, the largest header in use.
const MAX_DIB_LEN: usize = 124;
const COMPRESSION_NONE: u32 = 0;

/// Image geometry taken from the headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: usize,
    pub height: usize,
    pub bit_depth: u8,
    pub pixel_offset: usize,
}

impl Header {
    pub fn color_count(&self) -> usize {
        1 << self.bit_depth
    }

    pub fn pixels_per_byte(&self) -> usize {
        8 / self.bit_depth as usize
    }

    /// Bytes per scanline, padded to a multiple of 4.
    pub fn row_bytes(&self) -> Option<usize> {
        let bits = self.width.checked_mul(self.bit_depth as usize)?;
        Some(bits.checked_add(31)? / 32 * 4)
    }
}

/// Reads the file and DIB headers that follow the `BM` magic.
pub fn parse_header<R: Read>(
    reader: &mut ChunkReader<R>,
    limits: &Limits,
) -> Result<Header, DecodeError> {
    let bytes = reader.read_exact(FILE_HEADER_LEN)?;
    let file = FileHeader::read_from_bytes(bytes).map_err(|_| DecodeError::InvalidHeader)?;
    let dib_size = file.dib_size.get() as usize;
    if !(INFO_HEADER_LEN..=MAX_DIB_LEN).contains(&dib_size) {
        warn!("Unsupported DIB header size {}", dib_size);
        return Err(DecodeError::InvalidHeader);
    }

    let bytes = reader.read_exact(dib_size - DIB_SIZE_LEN)?;
    let (info, _) = InfoHeader::read_from_prefix(bytes).map_err(|_| DecodeError::InvalidHeader)?;

    let bit_depth = info.bit_depth.get();
    match bit_depth {
        1 | 2 | 4 | 8 => {}
        depth if depth > 8 => {
            warn!("{} bit BMP exceeds the palette budget", depth);
            return Err(DecodeError::OversizedPalette { bit_depth: depth });
        }
        depth => return Err(DecodeError::UnsupportedBitDepth(depth)),
    }
    let compression = info.compression.get();
    if compression != COMPRESSION_NONE {
        return Err(DecodeError::UnsupportedCompression(compression));
    }
    let (width, height) = (info.width.get(), info.height.get());
    if width <= 0 || height <= 0 {
        warn!("Unsupported BMP dimensions {}x{}", width, height);
        return Err(DecodeError::InvalidHeader);
    }

    let header = Header {
        width: width as usize,
        height: height as usize,
        bit_depth: bit_depth as u8,
        pixel_offset: file.pixel_offset.get() as usize,
    };
    info!(
        "BMP width: {}, height: {}, bit depth: {}, color count: {}",
        header.width,
        header.height,
        header.bit_depth,
        header.color_count()
    );

    if header.color_count() > limits.max_colors {
        return Err(DecodeError::OversizedPalette { bit_depth });
    }
    match header.width.checked_mul(header.height) {
        Some(pixels) if pixels <= limits.max_pixels => Ok(header),
        _ => Err(DecodeError::ImageTooLarge {
            width: header.width,
            height: header.height,
        }),
    }
}

/// Decodes a BMP body whose `BM` magic was the last thing consumed from
/// `reader`, the pixel data offset is counted from the magic.
pub fn decode<R: Read>(
    reader: &mut ChunkReader<R>,
    limits: &Limits,
) -> Result<Bitmap, DecodeError> {
    let file_start = reader.position().saturating_sub(MAGIC_LEN);
    let header = parse_header(reader, limits)?;
    let row_bytes = header.row_bytes().ok_or(DecodeError::ImageTooLarge {
        width: header.width,
        height: header.height,
    })?;

    let table = reader.read_exact(header.color_count() * 4)?;
    let palette = Palette::from_bgr0_table(table);

    // Some writers leave a gap between the color table and the pixel data
    let position = reader.position() - file_start;
    if header.pixel_offset > position {
        reader.skip(header.pixel_offset - position)?;
    }

    let mut bitmap = Bitmap::new(header.width, header.height, palette)?;
    for row in 1..=header.height {
        let scanline = reader.read_exact(row_bytes)?;
        // Scanlines are stored bottom to top
        unpack_row(scanline, header.bit_depth, bitmap.row_mut(header.height - row));
    }

    Ok(bitmap)
}

/// Unpacks one scanline into `row`, most significant pixel first.
///
/// Padding bits past the end of `row` are dropped. Depths other than 1, 2, 4
/// and 8 leave `row` untouched.
pub(crate) fn unpack_row(scanline: &[u8], bit_depth: u8, row: &mut [u8]) {
    if !matches!(bit_depth, 1 | 2 | 4 | 8) {
        return;
    }
    let pixels_per_byte = 8 / bit_depth as usize;
    let mask = ((1u16 << bit_depth) - 1) as u8;

    let mut index = 0;
    'scanline: for &byte in scanline {
        for position in (0..pixels_per_byte).rev() {
            if index >= row.len() {
                break 'scanline;
            }
            let shift = position * bit_depth as usize;
            row[index] = (byte >> shift) & mask;
            index += 1;
        }
    }
}

const _: () = assert!(MAGIC_LEN + FILE_HEADER_LEN == 14 + DIB_SIZE_LEN);
