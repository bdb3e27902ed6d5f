/// Error type for exact-size reads from the underlying stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// The stream ended after `received` of `expected` bytes.
    Truncated { expected: usize, received: usize },
    IoError(embedded_io::ErrorKind),
}

impl ReadError {
    pub(crate) fn from_io_error(error: impl embedded_io::Error) -> Self {
        ReadError::IoError(error.kind())
    }
}

impl embedded_io::Error for ReadError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            ReadError::Truncated { .. } => embedded_io::ErrorKind::Other,
            ReadError::IoError(kind) => *kind,
        }
    }
}

/// Error type for image decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    Read(ReadError),
    InvalidHeader,
    /// Bit depth is not one of 1, 2, 4 or 8.
    UnsupportedBitDepth(u16),
    /// The palette implied by `bit_depth` exceeds what the device can hold.
    OversizedPalette { bit_depth: u16 },
    UnsupportedCompression(u32),
    ImageTooLarge { width: usize, height: usize },
    /// A pixel index outside of the palette.
    PixelOutOfRange { value: u8, color_count: usize },
}

impl DecodeError {
    /// Whether the failure came from the transport rather than the image.
    pub fn is_transport(&self) -> bool {
        matches!(self, DecodeError::Read(_))
    }
}

impl From<ReadError> for DecodeError {
    fn from(error: ReadError) -> Self {
        DecodeError::Read(error)
    }
}

impl embedded_io::Error for DecodeError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            DecodeError::Read(error) => embedded_io::Error::kind(error),
            DecodeError::InvalidHeader | DecodeError::PixelOutOfRange { .. } => {
                embedded_io::ErrorKind::InvalidData
            }
            DecodeError::UnsupportedBitDepth(_)
            | DecodeError::UnsupportedCompression(_)
            | DecodeError::OversizedPalette { .. }
            | DecodeError::ImageTooLarge { .. } => embedded_io::ErrorKind::Unsupported,
        }
    }
}
