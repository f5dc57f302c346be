use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// Raw response: status code plus body bytes
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single GET against the catalog.
///
/// Returns `Err` only for transport-level failures (DNS, connect, timeout);
/// non-2xx statuses come back as an `HttpResponse`.
pub trait Transport {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, String>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("pokedex-seed/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, String> {
        let response = self.client.get(url).send().map_err(|err| err.to_string())?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|err| err.to_string())?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, String> {
        (**self).get(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = HttpResponse { status: 204, body: Vec::new() };
        let missing = HttpResponse { status: 404, body: Vec::new() };
        assert!(ok.is_success());
        assert!(!missing.is_success());
    }
}
