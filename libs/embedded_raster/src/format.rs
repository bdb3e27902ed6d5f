use embedded_io::Read;

use crate::{ChunkReader, ReadError};

pub const MAGIC_LEN: usize = 2;

/// Image format announced by the first two bytes of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::IntoStaticStr, strum_macros::Display)]
pub enum FormatTag {
    Z2,
    #[strum(serialize = "BMP")]
    Bmp,
    Z1,
    Z3,
    Unknown,
}

impl FormatTag {
    pub fn from_magic(magic: &[u8]) -> Self {
        match magic {
            b"Z2" => FormatTag::Z2,
            b"BM" => FormatTag::Bmp,
            b"Z1" => FormatTag::Z1,
            b"Z3" => FormatTag::Z3,
            _ => FormatTag::Unknown,
        }
    }

    pub fn is_supported(self) -> bool {
        matches!(self, FormatTag::Z2 | FormatTag::Bmp)
    }
}

/// Consumes the magic from `reader` and returns the announced format.
pub fn detect<R: Read>(reader: &mut ChunkReader<R>) -> Result<FormatTag, ReadError> {
    let magic = reader.read_exact(MAGIC_LEN)?;
    let format = FormatTag::from_magic(magic);
    if format == FormatTag::Unknown {
        warn!("Unknown image format: {:02x?}", magic);
    } else {
        info!("Format: {}", format);
    }
    Ok(format)
}
