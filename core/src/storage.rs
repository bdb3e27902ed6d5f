use core::fmt;

/// Byte-addressed non-volatile memory surviving deep sleep and power loss.
pub trait Storage {
    type Error: fmt::Debug;

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), Self::Error>;
    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), Self::Error>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    type Error = S::Error;

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(offset, buf)
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(offset, data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    OutOfBounds,
}

/// RAM-mapped storage such as an RTC memory region.
impl<const N: usize> Storage for [u8; N] {
    type Error = StorageError;

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        let src = self
            .get(start..start + buf.len())
            .ok_or(StorageError::OutOfBounds)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        let dst = self
            .get_mut(start..start + data.len())
            .ok_or(StorageError::OutOfBounds)?;
        dst.copy_from_slice(data);
        Ok(())
    }
}

/// The 4 byte little-endian timestamp of the last rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampSlot {
    offset: u32,
}

impl TimestampSlot {
    pub const LEN: usize = 4;

    pub const fn new(offset: u32) -> Self {
        TimestampSlot { offset }
    }

    /// Reads the slot. A slot that was never written holds whatever the
    /// memory contained.
    pub fn load<S: Storage>(&self, storage: &mut S) -> Result<u32, S::Error> {
        let mut bytes = [0u8; Self::LEN];
        storage.read(self.offset, &mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn store<S: Storage>(&self, storage: &mut S, timestamp: u32) -> Result<(), S::Error> {
        storage.write(self.offset, &timestamp.to_le_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_slot() {
        let mut nvm = [0u8; 8];
        let slot = TimestampSlot::new(2);
        slot.store(&mut nvm, 0x1234_5678).unwrap();
        assert_eq!(nvm, [0, 0, 0x78, 0x56, 0x34, 0x12, 0, 0]);
        assert_eq!(slot.load(&mut nvm), Ok(0x1234_5678));
    }

    #[test]
    fn test_uninitialized_slot_is_opaque() {
        let mut nvm = [0xffu8; 4];
        assert_eq!(TimestampSlot::new(0).load(&mut nvm), Ok(u32::MAX));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut nvm = [0u8; 4];
        let slot = TimestampSlot::new(1);
        assert_eq!(slot.load(&mut nvm), Err(StorageError::OutOfBounds));
        assert_eq!(slot.store(&mut nvm, 1), Err(StorageError::OutOfBounds));
        assert_eq!(nvm, [0; 4]);
    }
}
