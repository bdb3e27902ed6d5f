/*!
A no_std streaming decoder for indexed e-paper images using embedded-io for
memory constrained environments.

The body of an image response starts with a two byte magic followed by the
payload. Supported payloads are:
- `Z2`: run-length encoded, two colors, dimensions given by the display
- `BM`: palette-indexed Windows BMP with 1, 2, 4 or 8 bits per pixel

`Z1`, `Z3` and unknown magics decode to a 1×1 placeholder so a caller can
finish its cycle instead of retrying forever.

## Usage
```
# use embedded_raster as raster;
# fn main() -> Result<(), raster::DecodeError> {
# let body: &[u8] = &[b'Z', b'2', 0x3f, 0x3f, 0x42];
let options = raster::DecodeOptions::new(16, 8);
let outcome = raster::decode(body, &options)?;
let bitmap = outcome.into_bitmap();
assert_eq!(bitmap.width(), 16);
assert_eq!(bitmap.pixel(15, 7), Some(1));
# Ok(())
# }
```

## Limitations & non-goals
- no compressed BMP variants (`BI_RLE4`, `BI_RLE8`, bitfields)
- no top-down BMPs
- no scaling or dithering, the image is decoded at its native size
*/

#![no_std]

#[cfg(test)]
extern crate std;

extern crate alloc;

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        log::info!($($arg)*);
        #[cfg(all(test, not(feature = "log")))]
        std::eprintln!($($arg)*);
    }};
}

macro_rules! warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        log::warn!($($arg)*);
        #[cfg(all(test, not(feature = "log")))]
        std::eprintln!($($arg)*);
    }};
}

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        log::trace!($($arg)*);
    }};
}

mod bitmap;
pub mod bmp;
mod error;
mod format;
mod reader;
pub mod rle;


pub use bitmap::{Bitmap, Color, Palette, PixelCursor};
pub use error::{DecodeError, ReadError};
pub use format::{FormatTag, detect};
pub use reader::ChunkReader;

/// Upper bounds checked before any image buffer is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest palette the device can hold.
    pub max_colors: usize,
    /// Largest `width * height` the device can hold.
    pub max_pixels: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_colors: 256,
            max_pixels: 1 << 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Display width, used for `Z2` bodies which carry no header.
    pub width: usize,
    /// Display height, used for `Z2` bodies which carry no header.
    pub height: usize,
    /// `[white, black]`, the fixed palette of `Z2` bodies and the color of
    /// the placeholder.
    pub duotone: [Color; 2],
    /// Bytes requested from the stream per poll while decoding `Z2`.
    pub poll_size: usize,
    pub limits: Limits,
}

impl DecodeOptions {
    pub fn new(width: usize, height: usize) -> Self {
        DecodeOptions {
            width,
            height,
            duotone: [Color::WHITE, Color::BLACK],
            poll_size: rle::POLL_SIZE,
            limits: Limits::default(),
        }
    }
}

/// Result of a successful decode.
#[derive(Debug)]
pub enum DecodeOutcome {
    /// The body carried a supported image.
    Image { format: FormatTag, bitmap: Bitmap },
    /// The body carried a format this crate can't decode, `bitmap` is a 1×1
    /// placeholder.
    Placeholder { format: FormatTag, bitmap: Bitmap },
}

impl DecodeOutcome {
    pub fn format(&self) -> FormatTag {
        match self {
            DecodeOutcome::Image { format, .. } | DecodeOutcome::Placeholder { format, .. } => {
                *format
            }
        }
    }

    pub fn bitmap(&self) -> &Bitmap {
        match self {
            DecodeOutcome::Image { bitmap, .. } | DecodeOutcome::Placeholder { bitmap, .. } => {
                bitmap
            }
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, DecodeOutcome::Placeholder { .. })
    }

    pub fn into_bitmap(self) -> Bitmap {
        match self {
            DecodeOutcome::Image { bitmap, .. } | DecodeOutcome::Placeholder { bitmap, .. } => {
                bitmap
            }
        }
    }
}

/// Decodes a complete image body from `stream`.
///
/// Bytes following the end of the image are ignored.
pub fn decode<R: embedded_io::Read>(
    stream: R,
    options: &DecodeOptions,
) -> Result<DecodeOutcome, DecodeError> {
    let mut reader = ChunkReader::new(stream);
    decode_from(&mut reader, options)
}

/// Same as [`decode`] but reuses an existing [`ChunkReader`].
pub fn decode_from<R: embedded_io::Read>(
    reader: &mut ChunkReader<R>,
    options: &DecodeOptions,
) -> Result<DecodeOutcome, DecodeError> {
    let format = detect(reader)?;
    match format {
        FormatTag::Z2 => {
            let palette = Palette::duotone(options.duotone[0], options.duotone[1]);
            let mut bitmap =
                Bitmap::with_limits(options.width, options.height, palette, &options.limits)?;
            rle::decode(reader, &mut bitmap.cursor(), options.poll_size)?;
            Ok(DecodeOutcome::Image { format, bitmap })
        }
        FormatTag::Bmp => {
            let bitmap = bmp::decode(reader, &options.limits)?;
            Ok(DecodeOutcome::Image { format, bitmap })
        }
        FormatTag::Z1 | FormatTag::Z3 | FormatTag::Unknown => {
            warn!("{} bodies are not supported, using a placeholder", format);
            Ok(DecodeOutcome::Placeholder {
                format,
                bitmap: Bitmap::placeholder(options.duotone[0]),
            })
        }
    }
}
