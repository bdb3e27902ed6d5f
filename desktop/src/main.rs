use std::{path::PathBuf, time::Duration};

use argh::FromArgs;
use paperframe_core::{
    battery::BatteryVoltage,
    config::{Config, WifiConfig},
    cycle::{CycleReport, Device, run_cycle},
    display::{ColorMode, DisplayProfile},
    net::Credentials,
    refresh::{SLEEP_HEADER, TIMESTAMP_HEADER},
};

use crate::{
    http::{EhttpClient, HostNetwork, ReplayResponse},
    minifb_display::HostDisplay,
    std_storage::FileStorage,
};

mod http;
mod minifb_display;
mod std_storage;

#[derive(FromArgs)]
/// Runs one wake cycle of the frame on the host
struct Args {
    /// image server endpoint
    #[argh(option, default = "String::from(paperframe_core::config::DEFAULT_ENDPOINT)")]
    url: String,

    /// MAC address reported to the server, e.g. aa:bb:cc:dd:ee:ff
    #[argh(option, default = "String::from(\"02:00:00:00:00:01\")")]
    mac: String,

    /// panel width in pixels
    #[argh(option, short = 'x', default = "250")]
    width: u16,

    /// panel height in pixels
    #[argh(option, short = 'y', default = "122")]
    height: u16,

    /// report a black and white panel instead of 4 greys
    #[argh(switch)]
    bw: bool,

    /// battery voltage reported to the server in millivolts
    #[argh(option, default = "4200")]
    battery_mv: u32,

    /// file holding the persisted timestamp
    #[argh(option, short = 's', default = "PathBuf::from(\"paperframe.nvm\")")]
    storage: PathBuf,

    /// write the rendered image to this PNG file
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// show the rendered image in a window
    #[argh(switch, short = 'w')]
    window: bool,

    /// replay a saved response body instead of requesting one
    #[argh(option)]
    body: Option<PathBuf>,

    /// sleep header of the replayed response, in minutes
    #[argh(option)]
    sleep: Option<String>,

    /// timestamp header of the replayed response
    #[argh(option)]
    timestamp: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    let config = Config {
        endpoint: args.url.clone(),
        color_mode: if args.bw { ColorMode::Bw } else { ColorMode::Grey4 },
        wifi: wifi_from_env(),
        ..Config::default()
    };
    let profile = DisplayProfile::new(args.width, args.height);
    let mut display = HostDisplay::new(profile, args.window, args.output.clone());
    let mut storage = FileStorage::new(args.storage.clone());

    let report = match &args.body {
        Some(path) => {
            let body = std::fs::read(path).expect("Failed to read response body");
            let mut response = ReplayResponse::new(body);
            if let Some(sleep) = &args.sleep {
                response.insert_header(SLEEP_HEADER, sleep);
            }
            if let Some(timestamp) = &args.timestamp {
                response.insert_header(TIMESTAMP_HEADER, timestamp);
            }
            run_cycle(response, &mut display, &mut storage, &config)
        }
        None => {
            let mac = parse_mac(&args.mac).expect("Invalid MAC address");
            let mut device = Device::new(HostNetwork::new(mac), EhttpClient, display, storage);
            let report = device.wake(&config, BatteryVoltage::from_millivolts(args.battery_mv));
            display = device.display;
            report
        }
    };

    print_report(&report);
    display.wait_for_close();
}

fn print_report(report: &CycleReport) {
    log::info!("Outcome: {:?}", report.outcome);
    log::info!("Next wake in {}", format_duration(report.sleep));
}

fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!("{}h {:02}m {:02}s", seconds / 3600, seconds / 60 % 60, seconds % 60)
}

fn wifi_from_env() -> WifiConfig {
    let credentials = |ssid: &str, password: &str| {
        let ssid = std::env::var(ssid).ok()?;
        let password = std::env::var(password).unwrap_or_default();
        Some(Credentials::new(ssid, password))
    };
    WifiConfig {
        primary: credentials("PAPERFRAME_WIFI_SSID", "PAPERFRAME_WIFI_PASSWORD").unwrap_or_default(),
        fallback: credentials(
            "PAPERFRAME_FALLBACK_WIFI_SSID",
            "PAPERFRAME_FALLBACK_WIFI_PASSWORD",
        ),
    }
}

fn parse_mac(text: &str) -> Option<[u8; 6]> {
    let mut mac = [0u8; 6];
    let mut parts = text.split(':');
    for byte in mac.iter_mut() {
        *byte = u8::from_str_radix(parts.next()?, 16).ok()?;
    }
    parts.next().is_none().then_some(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mac() {
        assert_eq!(
            parse_mac("de:ad:BE:ef:00:01"),
            Some([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01])
        );
        assert_eq!(parse_mac("de:ad:be:ef:00"), None);
        assert_eq!(parse_mac("de:ad:be:ef:00:01:02"), None);
        assert_eq!(parse_mac("de:ad:be:ef:00:zz"), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h 00m 00s");
        assert_eq!(format_duration(Duration::from_secs(300)), "0h 05m 00s");
    }
}
