use alloc::string::String;
use core::fmt;

use log::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub ssid: String,
    pub password: String,
}

impl Credentials {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            ssid: ssid.into(),
            password: password.into(),
        }
    }
}

pub trait Network {
    type Error: fmt::Debug;

    fn connect(&mut self, credentials: &Credentials) -> Result<(), Self::Error>;
    fn mac_address(&self) -> [u8; 6];
    /// Signal strength of the joined access point in dBm.
    fn rssi(&self) -> i32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Primary,
    Fallback,
    Failed,
}

impl ConnectOutcome {
    pub fn is_connected(self) -> bool {
        self != ConnectOutcome::Failed
    }
}

/// Joins `primary`, then `fallback` if the first attempt fails.
pub fn connect_with_fallback<N: Network>(
    network: &mut N,
    primary: &Credentials,
    fallback: Option<&Credentials>,
) -> ConnectOutcome {
    match network.connect(primary) {
        Ok(()) => {
            info!("Connected to primary Wi-Fi: {}", primary.ssid);
            return ConnectOutcome::Primary;
        }
        Err(err) => warn!("Failed to connect to {}: {:?}", primary.ssid, err),
    }

    let Some(fallback) = fallback else {
        return ConnectOutcome::Failed;
    };
    match network.connect(fallback) {
        Ok(()) => {
            info!("Connected to backup Wi-Fi: {}", fallback.ssid);
            ConnectOutcome::Fallback
        }
        Err(err) => {
            warn!("Failed to connect to {}: {:?}", fallback.ssid, err);
            ConnectOutcome::Failed
        }
    }
}

/// Formats a MAC address as colon separated lowercase hex.
pub struct MacAddress<'a>(pub &'a [u8; 6]);

impl fmt::Display for MacAddress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// A streamed HTTP response body with access to its headers.
pub trait Response: embedded_io::Read {
    fn header(&self, name: &str) -> Option<&str>;
}

impl<T: Response + ?Sized> Response for &mut T {
    fn header(&self, name: &str) -> Option<&str> {
        (**self).header(name)
    }
}

pub trait HttpClient {
    type Error: fmt::Debug;
    type Response<'a>: Response
    where
        Self: 'a;

    fn get(&mut self, url: &str) -> Result<Self::Response<'_>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    struct FakeNetwork {
        reachable: &'static [&'static str],
        attempts: Vec<String>,
    }

    impl Network for FakeNetwork {
        type Error = &'static str;

        fn connect(&mut self, credentials: &Credentials) -> Result<(), Self::Error> {
            self.attempts.push(credentials.ssid.clone());
            if self.reachable.contains(&credentials.ssid.as_str()) {
                Ok(())
            } else {
                Err("no ap")
            }
        }

        fn mac_address(&self) -> [u8; 6] {
            [0; 6]
        }

        fn rssi(&self) -> i32 {
            -50
        }
    }

    fn network(reachable: &'static [&'static str]) -> FakeNetwork {
        FakeNetwork {
            reachable,
            attempts: Vec::new(),
        }
    }

    #[test]
    fn test_primary_first() {
        let mut net = network(&["home", "phone"]);
        let outcome = connect_with_fallback(
            &mut net,
            &Credentials::new("home", "pw"),
            Some(&Credentials::new("phone", "pw")),
        );
        assert_eq!(outcome, ConnectOutcome::Primary);
        assert_eq!(net.attempts, ["home"]);
    }

    #[test]
    fn test_fallback() {
        let mut net = network(&["phone"]);
        let outcome = connect_with_fallback(
            &mut net,
            &Credentials::new("home", "pw"),
            Some(&Credentials::new("phone", "pw")),
        );
        assert_eq!(outcome, ConnectOutcome::Fallback);
        assert_eq!(net.attempts, ["home", "phone"]);
    }

    #[test]
    fn test_both_fail() {
        let mut net = network(&[]);
        let outcome = connect_with_fallback(
            &mut net,
            &Credentials::new("home", "pw"),
            Some(&Credentials::new("phone", "pw")),
        );
        assert_eq!(outcome, ConnectOutcome::Failed);
        assert!(!outcome.is_connected());

        let mut net = network(&[]);
        let outcome = connect_with_fallback(&mut net, &Credentials::new("home", "pw"), None);
        assert_eq!(outcome, ConnectOutcome::Failed);
        assert_eq!(net.attempts.len(), 1);
    }

    #[test]
    fn test_mac_format() {
        let mac = [0x0a, 0xff, 0x00, 0x12, 0xab, 0x01];
        let text: heapless::String<17> = heapless::format!("{}", MacAddress(&mac)).unwrap();
        assert_eq!(text, "0a:ff:00:12:ab:01");
    }
}
