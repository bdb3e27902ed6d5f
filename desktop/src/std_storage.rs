use std::{
    fs,
    io::{Read, Seek, SeekFrom, Write},
    path::PathBuf,
};

use log::info;
use paperframe_core::storage::Storage;

/// Non-volatile memory backed by a file on the host.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        info!("Using FileStorage at {:?}", path);
        FileStorage { path }
    }
}

impl Storage for FileStorage {
    type Error = std::io::Error;

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> std::io::Result<()> {
        let mut file = fs::File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset as u64))?;
        file.read_exact(buf)
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.seek(SeekFrom::Start(offset as u64))?;
        file.write_all(data)?;
        file.sync_data()
    }
}
