use crate::{battery::BatteryVoltage, config::Config, net::MacAddress};

pub const URL_CAPACITY: usize = 256;
pub type Url = heapless::String<URL_CAPACITY>;

/// What the device reports about itself with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub mac: [u8; 6],
    pub rssi: i32,
    pub battery: BatteryVoltage,
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlTooLong;

/// Builds the image request URL.
///
/// The SSID is never reported.
pub fn build_url(config: &Config, info: &DeviceInfo) -> Result<Url, UrlTooLong> {
    heapless::format!(
        "{}?mac={}&timestamp_check=1&rssi={}&v={}&x={}&y={}&c={}&fw={}",
        config.endpoint,
        MacAddress(&info.mac),
        info.rssi,
        info.battery,
        info.width,
        info.height,
        config.color_mode,
        config.protocol_version,
    )
    .map_err(|_| UrlTooLong)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::ColorMode;
    use alloc::string::String;

    fn info() -> DeviceInfo {
        DeviceInfo {
            mac: [0xde, 0xad, 0xbe, 0xef, 0x00, 0x01],
            rssi: -67,
            battery: BatteryVoltage::from_millivolts(3912),
            width: 250,
            height: 122,
        }
    }

    #[test]
    fn test_query_parameters() {
        let url = build_url(&Config::default(), &info()).unwrap();
        assert_eq!(
            url,
            "http://cdn.zivyobraz.eu/index.php?mac=de:ad:be:ef:00:01&timestamp_check=1\
             &rssi=-67&v=3.91&x=250&y=122&c=4G&fw=2.0"
        );
    }

    #[test]
    fn test_color_mode() {
        let config = Config {
            color_mode: ColorMode::Bw,
            ..Config::default()
        };
        let url = build_url(&config, &info()).unwrap();
        assert!(url.ends_with("&c=BW&fw=2.0"));
    }

    #[test]
    fn test_too_long() {
        let config = Config {
            endpoint: String::from("http://example.com/").repeat(20),
            ..Config::default()
        };
        assert_eq!(build_url(&config, &info()), Err(UrlTooLong));
    }
}
