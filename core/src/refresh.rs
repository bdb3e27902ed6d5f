use core::time::Duration;

use log::{info, warn};

pub const SLEEP_HEADER: &str = "sleep";
pub const TIMESTAMP_HEADER: &str = "timestamp";
/// Timestamp assumed when the response carries none.
pub const SENTINEL_TIMESTAMP: u32 = 0;

/// Scheduling metadata carried in the response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseMeta {
    pub sleep: Duration,
    pub timestamp: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderParseError {
    MissingSleep,
    InvalidSleep,
    MissingTimestamp,
    InvalidTimestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderParseOutcome {
    Parsed(ResponseMeta),
    /// Headers were unusable, `meta` holds the defaults.
    Defaulted {
        meta: ResponseMeta,
        error: HeaderParseError,
    },
}

impl HeaderParseOutcome {
    pub fn meta(&self) -> ResponseMeta {
        match self {
            HeaderParseOutcome::Parsed(meta) | HeaderParseOutcome::Defaulted { meta, .. } => *meta,
        }
    }
}

/// Parses the `sleep` (minutes) and `timestamp` headers.
///
/// Both values fall back together: if either is unusable the result is
/// `default_sleep` and [`SENTINEL_TIMESTAMP`].
pub fn parse_headers(
    sleep: Option<&str>,
    timestamp: Option<&str>,
    default_sleep: Duration,
) -> HeaderParseOutcome {
    match parse_meta(sleep, timestamp) {
        Ok(meta) => HeaderParseOutcome::Parsed(meta),
        Err(error) => {
            warn!("Unusable response headers ({:?}), using the default sleep time", error);
            HeaderParseOutcome::Defaulted {
                meta: ResponseMeta {
                    sleep: default_sleep,
                    timestamp: SENTINEL_TIMESTAMP,
                },
                error,
            }
        }
    }
}

fn parse_meta(sleep: Option<&str>, timestamp: Option<&str>) -> Result<ResponseMeta, HeaderParseError> {
    let minutes: u64 = sleep
        .ok_or(HeaderParseError::MissingSleep)?
        .trim()
        .parse()
        .map_err(|_| HeaderParseError::InvalidSleep)?;
    let seconds = minutes.checked_mul(60).ok_or(HeaderParseError::InvalidSleep)?;
    let timestamp = timestamp
        .ok_or(HeaderParseError::MissingTimestamp)?
        .trim()
        .parse()
        .map_err(|_| HeaderParseError::InvalidTimestamp)?;
    Ok(ResponseMeta {
        sleep: Duration::from_secs(seconds),
        timestamp,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// The image is already on the panel.
    Skip,
    /// A new image has to be decoded and `timestamp` committed once shown.
    Decode { timestamp: u32 },
}

/// Decides whether a response carries a new image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshGate {
    persisted: Option<u32>,
}

impl RefreshGate {
    pub fn new(persisted: u32) -> Self {
        RefreshGate {
            persisted: Some(persisted),
        }
    }

    /// Gate for a device whose persisted timestamp can't be read.
    pub fn unknown() -> Self {
        RefreshGate { persisted: None }
    }

    pub fn check(&self, timestamp: u32) -> Gate {
        info!("Response timestamp {}, persisted {:?}", timestamp, self.persisted);
        if self.persisted == Some(timestamp) {
            info!("No new image - doesn't refresh the display.");
            Gate::Skip
        } else {
            info!("New image available!");
            Gate::Decode { timestamp }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: Duration = Duration::from_secs(3600);

    #[test]
    fn test_parse_headers() {
        let outcome = parse_headers(Some("15"), Some("1700000000"), DEFAULT);
        assert_eq!(
            outcome,
            HeaderParseOutcome::Parsed(ResponseMeta {
                sleep: Duration::from_secs(900),
                timestamp: 1_700_000_000,
            })
        );
    }

    #[test]
    fn test_headers_trimmed() {
        let meta = parse_headers(Some(" 1 "), Some("7\r"), DEFAULT).meta();
        assert_eq!(meta.sleep, Duration::from_secs(60));
        assert_eq!(meta.timestamp, 7);
    }

    #[test]
    fn test_missing_headers_default_together() {
        let expected = ResponseMeta {
            sleep: DEFAULT,
            timestamp: SENTINEL_TIMESTAMP,
        };
        for (sleep, timestamp, error) in [
            (None, Some("5"), HeaderParseError::MissingSleep),
            (Some("x"), Some("5"), HeaderParseError::InvalidSleep),
            (Some("-3"), Some("5"), HeaderParseError::InvalidSleep),
            (Some("10"), None, HeaderParseError::MissingTimestamp),
            (Some("10"), Some("4294967296"), HeaderParseError::InvalidTimestamp),
        ] {
            assert_eq!(
                parse_headers(sleep, timestamp, DEFAULT),
                HeaderParseOutcome::Defaulted { meta: expected, error }
            );
        }
    }

    #[test]
    fn test_gate() {
        let gate = RefreshGate::new(42);
        assert_eq!(gate.check(42), Gate::Skip);
        assert_eq!(gate.check(43), Gate::Decode { timestamp: 43 });
        assert_eq!(RefreshGate::unknown().check(0), Gate::Decode { timestamp: 0 });
    }
}
