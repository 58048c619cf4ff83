// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for Bayernluft devices.

use std::time::Duration;

use reqwest::Client;

use crate::error::ProtocolError;
use crate::protocol::Protocol;

/// Normalizes a configured host into the base URL used for every request.
///
/// A host without an `http://` or `https://` scheme gets `http://`
/// prepended. Trailing slashes are removed.
///
/// # Examples
///
/// ```
/// use luefter_lib::protocol::normalize_base_url;
///
/// assert_eq!(normalize_base_url("192.168.1.40"), "http://192.168.1.40");
/// assert_eq!(normalize_base_url("https://luefter.local/"), "https://luefter.local");
/// ```
#[must_use]
pub fn normalize_base_url(host: &str) -> String {
    let host = host.trim();
    let url = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    };
    url.trim_end_matches('/').to_string()
}

/// Decodes a response body, dropping invalid UTF-8 sequences.
///
/// The embedded web server occasionally emits stray bytes; they are
/// discarded instead of failing the request.
///
/// # Examples
///
/// ```
/// use luefter_lib::protocol::decode_lossy;
///
/// assert_eq!(decode_lossy(b"Temp\xff_In"), "Temp_In");
/// assert_eq!(decode_lossy("Lüfter".as_bytes()), "Lüfter");
/// ```
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

// ============================================================================
// HttpConfig - Configuration for HTTP devices
// ============================================================================

/// Configuration for an HTTP connection to a ventilation unit.
///
/// # Examples
///
/// ```
/// use luefter_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.1.40").with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://192.168.1.40");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    timeout: Duration,
    client: Option<Client>,
}

impl HttpConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new HTTP configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - Hostname, IP address or URL of the device
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timeout: Self::DEFAULT_TIMEOUT,
            client: None,
        }
    }

    /// Sets the request timeout.
    ///
    /// Ignored when a shared client is supplied with
    /// [`with_client`](Self::with_client); that client's own timeout applies.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses an existing reqwest client, sharing its connection pool.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Returns the configured host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` if a shared client was supplied.
    #[must_use]
    pub fn has_shared_client(&self) -> bool {
        self.client.is_some()
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        normalize_base_url(&self.host)
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the host is empty, or
    /// `ProtocolError::Http` if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if self.host.trim().trim_end_matches('/').is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }
        let base_url = self.base_url();

        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(ProtocolError::Http)?,
        };

        Ok(HttpClient { base_url, client })
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// HTTP client for a single ventilation unit.
///
/// Cloning is cheap and clones share the connection pool, so concurrent
/// requests do not wait on each other.
///
/// # Examples
///
/// ```no_run
/// use luefter_lib::protocol::{HttpClient, Protocol, ENDPOINT_JSON};
///
/// # async fn example() -> luefter_lib::Result<()> {
/// let client = HttpClient::new("192.168.1.40")?;
/// let body = client.fetch(ENDPOINT_JSON).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client for the specified host with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        HttpConfig::new(host).into_client()
    }

    /// Returns the underlying reqwest client.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Builds the URL for an endpoint.
    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    async fn get_text(&self, url: &str) -> Result<String, ProtocolError> {
        tracing::debug!(url = %url, "Sending HTTP request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(ProtocolError::Http)?;
        let body = decode_lossy(&bytes);

        tracing::debug!(bytes = bytes.len(), "Received HTTP response");

        Ok(body)
    }
}

impl Protocol for HttpClient {
    async fn fetch(&self, endpoint: &str) -> Result<String, ProtocolError> {
        self.get_text(&self.build_url(endpoint)).await
    }

    async fn fetch_url(&self, url: &str) -> Result<String, ProtocolError> {
        self.get_text(url).await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prepends_http() {
        assert_eq!(normalize_base_url("10.0.0.7"), "http://10.0.0.7");
        assert_eq!(normalize_base_url("luefter:8080"), "http://luefter:8080");
    }

    #[test]
    fn normalize_keeps_existing_scheme() {
        assert_eq!(normalize_base_url("http://10.0.0.7"), "http://10.0.0.7");
        assert_eq!(normalize_base_url("https://10.0.0.7"), "https://10.0.0.7");
    }

    #[test]
    fn normalize_strips_trailing_slashes() {
        assert_eq!(normalize_base_url("http://10.0.0.7//"), "http://10.0.0.7");
        assert_eq!(normalize_base_url("10.0.0.7/"), "http://10.0.0.7");
    }

    #[test]
    fn build_url_appends_endpoint_verbatim() {
        let client = HttpClient::new("192.168.1.40/").unwrap();
        assert_eq!(
            client.build_url("/index.html?export=live"),
            "http://192.168.1.40/index.html?export=live"
        );
        assert_eq!(client.build_url("?power=on"), "http://192.168.1.40?power=on");
    }

    #[test]
    fn decode_drops_invalid_sequences() {
        assert_eq!(decode_lossy(b"\xc3(abc\x80"), "(abc");
        assert_eq!(decode_lossy(b""), "");
    }

    #[test]
    fn http_config_default_values() {
        let config = HttpConfig::new("192.168.1.40");
        assert_eq!(config.host(), "192.168.1.40");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(!config.has_shared_client());
    }

    #[test]
    fn http_config_with_timeout() {
        let config = HttpConfig::new("192.168.1.40").with_timeout(Duration::from_secs(30));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn http_config_with_shared_client() {
        let config = HttpConfig::new("192.168.1.40").with_client(Client::new());
        assert!(config.has_shared_client());
        let client = config.into_client().unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.40");
    }

    #[test]
    fn http_config_rejects_empty_host() {
        assert!(matches!(
            HttpConfig::new("  ").into_client(),
            Err(ProtocolError::InvalidAddress(_))
        ));
    }
}
