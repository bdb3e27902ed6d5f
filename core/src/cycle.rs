use core::time::Duration;

use embedded_raster::{DecodeError, DecodeOptions, FormatTag, decode};
use log::{error, info, warn};

use crate::{
    battery::BatteryVoltage,
    config::Config,
    display::{Display, present},
    net::{HttpClient, Network, Response, connect_with_fallback},
    refresh::{
        Gate, HeaderParseOutcome, RefreshGate, SLEEP_HEADER, TIMESTAMP_HEADER, parse_headers,
    },
    request::{DeviceInfo, UrlTooLong, build_url},
    storage::{Storage, TimestampSlot},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleError {
    /// The HTTP request could not be sent or answered.
    Request,
    Url(UrlTooLong),
    Decode(DecodeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No Wi-Fi network could be joined.
    Offline,
    /// The server still serves the image on the panel.
    Skipped { timestamp: u32 },
    /// A new image was shown and its timestamp persisted.
    Committed { timestamp: u32, format: FormatTag },
    /// A new image was shown but persisting its timestamp failed, the next
    /// wake will show it again.
    Uncommitted { timestamp: u32, format: FormatTag },
    Failed(CycleError),
}

/// What a wake did and how long to sleep before the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    pub sleep: Duration,
}

impl CycleReport {
    fn new(outcome: CycleOutcome, sleep: Duration) -> Self {
        info!("{:?}, going to sleep for {} seconds", outcome, sleep.as_secs());
        CycleReport { outcome, sleep }
    }

    fn failed(error: CycleError, config: &Config) -> Self {
        Self::new(CycleOutcome::Failed(error), config.default_sleep)
    }
}

/// Runs one wake cycle on an already received `response`.
///
/// The display and storage are only touched when the response carries a new
/// image. The persisted timestamp is written after the display finished.
pub fn run_cycle<R, D, S>(
    response: R,
    display: &mut D,
    storage: &mut S,
    config: &Config,
) -> CycleReport
where
    R: Response,
    D: Display,
    S: Storage,
{
    let headers = parse_headers(
        response.header(SLEEP_HEADER),
        response.header(TIMESTAMP_HEADER),
        config.default_sleep,
    );
    let meta = headers.meta();

    let slot = TimestampSlot::new(config.timestamp_offset);
    let gate = match headers {
        // Without a usable timestamp the comparison means nothing.
        HeaderParseOutcome::Defaulted { .. } => RefreshGate::unknown(),
        HeaderParseOutcome::Parsed(_) => match slot.load(storage) {
            Ok(persisted) => RefreshGate::new(persisted),
            Err(err) => {
                warn!("Failed to read the persisted timestamp: {:?}", err);
                RefreshGate::unknown()
            }
        },
    };

    let timestamp = match gate.check(meta.timestamp) {
        Gate::Skip => {
            return CycleReport::new(
                CycleOutcome::Skipped {
                    timestamp: meta.timestamp,
                },
                meta.sleep,
            );
        }
        Gate::Decode { timestamp } => timestamp,
    };

    let profile = display.profile();
    let options = DecodeOptions {
        width: profile.width as usize,
        height: profile.height as usize,
        duotone: [profile.white, profile.black],
        poll_size: config.poll_size,
        limits: config.limits,
    };
    let decoded = match decode(response, &options) {
        Ok(decoded) => decoded,
        Err(err) => {
            error!("Failed to decode image: {:?}", err);
            return CycleReport::failed(CycleError::Decode(err), config);
        }
    };

    let format = decoded.format();
    present(display, decoded.into_bitmap());

    let outcome = match slot.store(storage, timestamp) {
        Ok(()) => {
            info!("Committed timestamp {}", timestamp);
            CycleOutcome::Committed { timestamp, format }
        }
        Err(err) => {
            error!("Failed to persist timestamp {}: {:?}", timestamp, err);
            CycleOutcome::Uncommitted { timestamp, format }
        }
    };
    CycleReport::new(outcome, meta.sleep)
}

/// The capabilities of a frame, owned for the duration of a wake.
pub struct Device<N, H, D, S> {
    pub network: N,
    pub http: H,
    pub display: D,
    pub storage: S,
}

impl<N, H, D, S> Device<N, H, D, S>
where
    N: Network,
    H: HttpClient,
    D: Display,
    S: Storage,
{
    pub fn new(network: N, http: H, display: D, storage: S) -> Self {
        Device {
            network,
            http,
            display,
            storage,
        }
    }

    /// Joins Wi-Fi, requests the current image and runs the cycle on it.
    pub fn wake(&mut self, config: &Config, battery: BatteryVoltage) -> CycleReport {
        let connected = connect_with_fallback(
            &mut self.network,
            &config.wifi.primary,
            config.wifi.fallback.as_ref(),
        );
        if !connected.is_connected() {
            return CycleReport::new(CycleOutcome::Offline, config.offline_sleep);
        }

        let profile = self.display.profile();
        let info = DeviceInfo {
            mac: self.network.mac_address(),
            rssi: self.network.rssi(),
            battery,
            width: profile.width,
            height: profile.height,
        };
        let url = match build_url(config, &info) {
            Ok(url) => url,
            Err(err) => {
                error!("Request URL exceeds {} bytes", crate::request::URL_CAPACITY);
                return CycleReport::failed(CycleError::Url(err), config);
            }
        };

        info!("Requesting {}", url);
        let response = match self.http.get(&url) {
            Ok(response) => response,
            Err(err) => {
                error!("Request failed: {:?}", err);
                return CycleReport::failed(CycleError::Request, config);
            }
        };
        run_cycle(response, &mut self.display, &mut self.storage, config)
    }
}
