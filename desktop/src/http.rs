use std::collections::HashMap;

use embedded_io::ErrorType;
use log::{info, warn};
use paperframe_core::net::{Credentials, HttpClient, Network, Response};

/// The host is always online, joining a network is only logged.
pub struct HostNetwork {
    mac: [u8; 6],
}

impl HostNetwork {
    pub fn new(mac: [u8; 6]) -> Self {
        HostNetwork { mac }
    }
}

impl Network for HostNetwork {
    type Error = std::convert::Infallible;

    fn connect(&mut self, credentials: &Credentials) -> Result<(), Self::Error> {
        if credentials.ssid.is_empty() {
            warn!("No Wi-Fi credentials configured, using the host network");
        } else {
            info!("Pretending to join {}", credentials.ssid);
        }
        Ok(())
    }

    fn mac_address(&self) -> [u8; 6] {
        self.mac
    }

    fn rssi(&self) -> i32 {
        0
    }
}

/// Blocking HTTP client, the whole body is buffered before decoding starts.
pub struct EhttpClient;

impl HttpClient for EhttpClient {
    type Error = String;
    type Response<'a> = HttpResponse;

    fn get(&mut self, url: &str) -> Result<HttpResponse, String> {
        let response = ehttp::fetch_blocking(&ehttp::Request::get(url))?;
        if !response.ok {
            return Err(format!("{} {}", response.status, response.status_text));
        }
        info!(
            "Received {} bytes ({})",
            response.bytes.len(),
            response.headers.get("content-type").unwrap_or("unknown")
        );
        Ok(HttpResponse {
            inner: response,
            position: 0,
        })
    }
}

pub struct HttpResponse {
    inner: ehttp::Response,
    position: usize,
}

impl ErrorType for HttpResponse {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Read for HttpResponse {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let read = copy_from(&self.inner.bytes[self.position..], buf);
        self.position += read;
        Ok(read)
    }
}

impl Response for HttpResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers.get(name)
    }
}

/// A response body loaded from disk with headers given on the command line.
pub struct ReplayResponse {
    headers: HashMap<String, String>,
    body: Vec<u8>,
    position: usize,
}

impl ReplayResponse {
    pub fn new(body: Vec<u8>) -> Self {
        ReplayResponse {
            headers: HashMap::new(),
            body,
            position: 0,
        }
    }

    pub fn insert_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_lowercase(), value.to_string());
    }
}

impl ErrorType for ReplayResponse {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Read for ReplayResponse {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let read = copy_from(&self.body[self.position..], buf);
        self.position += read;
        Ok(read)
    }
}

impl Response for ReplayResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

fn copy_from(remaining: &[u8], buf: &mut [u8]) -> usize {
    let len = remaining.len().min(buf.len());
    buf[..len].copy_from_slice(&remaining[..len]);
    len
}
