use alloc::string::String;
use core::time::Duration;

use embedded_raster::{Limits, rle};

use crate::{display::ColorMode, net::Credentials};

pub const DEFAULT_ENDPOINT: &str = "http://cdn.zivyobraz.eu/index.php";
/// `2.0` servers answer with `Z2` bodies for two-color panels, `1.0` with BMP.
pub const PROTOCOL_VERSION: &str = "2.0";
pub const DEFAULT_SLEEP: Duration = Duration::from_secs(60 * 60);
pub const OFFLINE_SLEEP: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WifiConfig {
    pub primary: Credentials,
    pub fallback: Option<Credentials>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: String,
    pub protocol_version: String,
    pub color_mode: ColorMode,
    pub wifi: WifiConfig,
    /// Sleep used when the response carries no usable `sleep` header or the
    /// cycle fails.
    pub default_sleep: Duration,
    /// Sleep used when no network could be joined.
    pub offline_sleep: Duration,
    /// Bytes requested per poll while decoding `Z2` bodies.
    pub poll_size: usize,
    /// Offset of the last rendered timestamp in non-volatile storage.
    pub timestamp_offset: u32,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: String::from(DEFAULT_ENDPOINT),
            protocol_version: String::from(PROTOCOL_VERSION),
            color_mode: ColorMode::default(),
            wifi: WifiConfig::default(),
            default_sleep: DEFAULT_SLEEP,
            offline_sleep: OFFLINE_SLEEP,
            poll_size: rle::POLL_SIZE,
            timestamp_offset: 0,
            limits: Limits::default(),
        }
    }
}
