// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP device builder.

use std::time::Duration;

use crate::device::{Device, PollingConfig};
use crate::error::Error;
use crate::firmware::FirmwareServer;
use crate::protocol::{HttpClient, HttpConfig};
use crate::telemetry::WireFormat;

/// Builder for creating HTTP-based devices.
///
/// This builder can be created in two ways:
/// - `Device::http("host")` - Simple host string
/// - `Device::http_config(HttpConfig::new("host").with_timeout(..))` - Advanced configuration
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use luefter_lib::Device;
/// use luefter_lib::telemetry::WireFormat;
///
/// # async fn example() -> luefter_lib::Result<()> {
/// // Current firmware, looks up the latest firmware versions once
/// let device = Device::http("192.168.1.50")
///     .build()
///     .await?;
///
/// // Legacy firmware with a shorter timeout, no network access
/// let device = Device::http("192.168.1.51")
///     .with_wire_format(WireFormat::Template)
///     .with_timeout(Duration::from_secs(5))
///     .build_without_probe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpDeviceBuilder {
    config: HttpConfig,
    wire_format: WireFormat,
    polling: PollingConfig,
    server: FirmwareServer,
}

impl HttpDeviceBuilder {
    /// Creates a new builder with the specified HTTP configuration.
    pub(crate) fn new(config: HttpConfig) -> Self {
        Self {
            config,
            wire_format: WireFormat::default(),
            polling: PollingConfig::default(),
            server: FirmwareServer::default(),
        }
    }

    /// Sets the telemetry wire format. Defaults to [`WireFormat::Json`].
    #[must_use]
    pub fn with_wire_format(mut self, wire_format: WireFormat) -> Self {
        self.wire_format = wire_format;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Uses a shared `reqwest` client instead of creating one.
    ///
    /// The timeout of the shared client applies; [`with_timeout`](Self::with_timeout)
    /// is ignored.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.config = self.config.with_client(client);
        self
    }

    /// Sets the firmware server. Defaults to the official Bayernluft server.
    #[must_use]
    pub fn with_firmware_server(mut self, server: FirmwareServer) -> Self {
        self.server = server;
        self
    }

    /// Sets the polling settings.
    #[must_use]
    pub fn with_polling(mut self, polling: PollingConfig) -> Self {
        self.polling = polling;
        self
    }

    /// Sets how many consecutive transport failures mark the device
    /// unavailable. Defaults to 3.
    #[must_use]
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.polling = self.polling.with_failure_threshold(threshold);
        self
    }

    /// Returns the configured wire format.
    #[must_use]
    pub fn wire_format(&self) -> WireFormat {
        self.wire_format
    }

    /// Returns the configured polling settings.
    #[must_use]
    pub fn polling(&self) -> &PollingConfig {
        &self.polling
    }

    /// Builds the device and looks up the latest firmware versions once.
    ///
    /// The device itself is not contacted. A failed version lookup is logged
    /// and does not fail the build.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub async fn build(self) -> Result<Device<HttpClient>, Error> {
        let device = self.build_without_probe()?;

        let summary = device.poll_latest_versions().await;
        if !summary.is_complete() {
            tracing::debug!(
                base_url = device.base_url(),
                failed = summary.failed.len(),
                "Initial firmware version lookup incomplete"
            );
        }

        Ok(device)
    }

    /// Builds the device without any network access.
    ///
    /// Latest firmware versions stay unknown until
    /// [`Device::poll_latest_versions`] runs.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn build_without_probe(self) -> Result<Device<HttpClient>, Error> {
        let client = self.config.into_client().map_err(Error::Protocol)?;
        Ok(Device::new(client, self.wire_format, self.polling, self.server))
    }
}
