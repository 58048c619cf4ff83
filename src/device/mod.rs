// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device abstraction for Bayernluft ventilation units.
//!
//! This module provides the main [`Device`] type, generic over the transport.
//! A device keeps the last known telemetry snapshot, the connection health,
//! the cached export template of legacy firmware and the latest firmware
//! versions published by Bayernluft.
//!
//! # Polling
//!
//! The host owns the telemetry cadence and calls [`Device::update`] on it
//! (every 20 s by default, see [`PollingConfig`]). A failed poll keeps the
//! last snapshot. Transport failures and non-success statuses both count
//! toward the failure threshold; once it is reached the device is
//! [`Degraded`](ConnectionState::Degraded) until a poll succeeds again.
//!
//! # Examples
//!
//! ```no_run
//! use luefter_lib::{Device, UpdateOutcome};
//!
//! # async fn example() -> luefter_lib::Result<()> {
//! let device = Device::http("192.168.1.50").build().await?;
//!
//! if device.update().await? == UpdateOutcome::Refreshed {
//!     let snapshot = device.snapshot();
//!     println!("Indoor: {:?} °C", snapshot.temperature_in());
//! }
//!
//! device.set_speed(6).await?;
//! # Ok(())
//! # }
//! ```

mod http_builder;
mod polling;

pub use http_builder::HttpDeviceBuilder;
pub use polling::PollingConfig;

use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::command::{Command, PowerCommand, SpeedCommand, TimerCommand, UpdateCheckCommand};
use crate::error::{Error, ProtocolError};
use crate::firmware::{self, FirmwareServer, VersionCache, VersionPollSummary};
use crate::protocol::{
    ENDPOINT_EXPORT, ENDPOINT_JSON, ENDPOINT_TEMPLATE, HttpClient, HttpConfig, Protocol,
};
use crate::state::{ConnectionState, DeviceSnapshot, FailureTracker, FailureVerdict};
use crate::telemetry::{ExportTemplate, ParseOutcome, ResponseParser, WireFormat};
use crate::types::{AntiFreezeSpeed, FanSpeed, MotorSpeed, UpdateTarget};

/// What a call to [`Device::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A new snapshot replaced the previous one.
    Refreshed,
    /// The request failed at transport level below the failure threshold.
    /// The previous snapshot is kept.
    TransientFailure {
        /// Consecutive failures so far.
        consecutive_failures: u32,
    },
    /// The export no longer matched the cached template. The template is
    /// fetched again on the next update.
    TemplateDrift,
    /// The device answered without any field. Nothing changed.
    Empty,
}

/// A Bayernluft ventilation unit.
///
/// The device is generic over the transport `P`. Use [`Device::http`] to
/// create an HTTP device:
///
/// ```no_run
/// use luefter_lib::Device;
/// use luefter_lib::telemetry::WireFormat;
///
/// # async fn example() -> luefter_lib::Result<()> {
/// // Current firmware, eager firmware version lookup
/// let device = Device::http("192.168.1.50").build().await?;
///
/// // Legacy firmware, no network access during construction
/// let legacy = Device::http("192.168.1.51")
///     .with_wire_format(WireFormat::Template)
///     .build_without_probe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Device<P: Protocol> {
    protocol: P,
    wire_format: WireFormat,
    polling: PollingConfig,
    server: FirmwareServer,
    parser: Mutex<ResponseParser>,
    snapshot: RwLock<Arc<DeviceSnapshot>>,
    health: Mutex<FailureTracker>,
    update_target: OnceLock<UpdateTarget>,
    latest_versions: RwLock<VersionCache>,
}

impl<P: Protocol> Device<P> {
    /// Creates a new device on top of a transport.
    pub(crate) fn new(
        protocol: P,
        wire_format: WireFormat,
        polling: PollingConfig,
        server: FirmwareServer,
    ) -> Self {
        Self {
            protocol,
            wire_format,
            polling,
            server,
            parser: Mutex::new(ResponseParser::new(wire_format)),
            snapshot: RwLock::new(Arc::new(DeviceSnapshot::new())),
            health: Mutex::new(FailureTracker::new(polling.failure_threshold())),
            update_target: OnceLock::new(),
            latest_versions: RwLock::new(VersionCache::new()),
        }
    }

    /// Returns the normalized base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.protocol.base_url()
    }

    /// Returns the wire format used for telemetry.
    #[must_use]
    pub fn wire_format(&self) -> WireFormat {
        self.wire_format
    }

    /// Returns the polling settings.
    #[must_use]
    pub fn polling(&self) -> &PollingConfig {
        &self.polling
    }

    /// Returns the firmware server used for version lookups.
    #[must_use]
    pub fn firmware_server(&self) -> &FirmwareServer {
        &self.server
    }

    // ========== Telemetry ==========

    /// Polls the device once and refreshes the snapshot.
    ///
    /// Legacy devices fetch their export template first if none is cached.
    ///
    /// # Errors
    ///
    /// - [`Error::Unavailable`] once the consecutive transport failures reach
    ///   the failure threshold
    /// - [`Error::Protocol`] if the device answers with a non-success status;
    ///   it still counts toward the failure threshold
    /// - [`Error::Protocol`] if the request cannot be built, such as for a
    ///   malformed host; this is not counted
    /// - [`Error::Parse`] if the body is not a JSON object, or the export
    ///   template cannot be used
    pub async fn update(&self) -> Result<UpdateOutcome, Error> {
        let body = match self.fetch_telemetry().await {
            Ok(body) => body,
            Err(Error::Protocol(e)) if e.is_transport() => {
                return self.record_transport_failure(e);
            }
            Err(Error::Protocol(e @ ProtocolError::UnexpectedStatus { .. })) => {
                self.record_failure(&e);
                return Err(Error::Protocol(e));
            }
            Err(e) => return Err(e),
        };

        let outcome = self.parser.lock().parse(&body)?;
        let fields = match outcome {
            ParseOutcome::Fields(fields) => fields,
            ParseOutcome::TemplateDrift => {
                tracing::warn!(
                    base_url = self.base_url(),
                    "Export does not match the cached template, refetching it on next update"
                );
                return Ok(UpdateOutcome::TemplateDrift);
            }
        };

        if fields.is_empty() {
            tracing::debug!(base_url = self.base_url(), "Device reported no fields");
            return Ok(UpdateOutcome::Empty);
        }

        let snapshot = Arc::new(DeviceSnapshot::from_raw(fields));
        self.infer_update_target(&snapshot);
        *self.snapshot.write() = snapshot;

        let previous = self.health.lock().record_success();
        if previous == ConnectionState::Degraded {
            tracing::info!(base_url = self.base_url(), "Device is available again");
        }

        Ok(UpdateOutcome::Refreshed)
    }

    /// Returns the last successful snapshot.
    ///
    /// The snapshot is empty until the first successful update.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DeviceSnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    /// Returns the connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.health.lock().state()
    }

    /// Returns `true` if the last update succeeded or failed below the
    /// failure threshold.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state() == ConnectionState::Ready
    }

    /// Returns the number of consecutive transport failures.
    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.health.lock().consecutive_failures()
    }

    async fn fetch_telemetry(&self) -> Result<String, Error> {
        match self.wire_format {
            WireFormat::Json => Ok(self.protocol.fetch(ENDPOINT_JSON).await?),
            WireFormat::Template => {
                let needs_template = self.parser.lock().needs_template();
                if needs_template {
                    let text = self.protocol.fetch(ENDPOINT_TEMPLATE).await?;
                    let template = ExportTemplate::compile(&text)?;
                    tracing::debug!(
                        base_url = self.base_url(),
                        fields = template.fields().len(),
                        "Loaded export template"
                    );
                    self.parser.lock().set_template(template);
                }
                Ok(self.protocol.fetch(ENDPOINT_EXPORT).await?)
            }
        }
    }

    fn record_transport_failure(&self, source: ProtocolError) -> Result<UpdateOutcome, Error> {
        match self.record_failure(&source) {
            FailureVerdict::Transient {
                consecutive_failures,
            } => Ok(UpdateOutcome::TransientFailure {
                consecutive_failures,
            }),
            FailureVerdict::Unavailable {
                consecutive_failures,
            } => Err(Error::Unavailable {
                consecutive_failures,
                source,
            }),
        }
    }

    fn record_failure(&self, source: &ProtocolError) -> FailureVerdict {
        let (verdict, threshold) = {
            let mut health = self.health.lock();
            (health.record_failure(), health.threshold())
        };

        match verdict {
            FailureVerdict::Transient {
                consecutive_failures,
            } => {
                tracing::warn!(
                    base_url = self.base_url(),
                    consecutive_failures,
                    error = %source,
                    "Device poll failed, keeping last snapshot"
                );
            }
            FailureVerdict::Unavailable {
                consecutive_failures,
            } if consecutive_failures == threshold => {
                tracing::info!(
                    base_url = self.base_url(),
                    consecutive_failures,
                    error = %source,
                    "Device is unavailable"
                );
            }
            FailureVerdict::Unavailable { .. } => {}
        }

        verdict
    }

    fn infer_update_target(&self, snapshot: &DeviceSnapshot) {
        if self.update_target.get().is_some() {
            return;
        }
        let target = UpdateTarget::from_main_controller(snapshot.main_controller_version());
        if self.update_target.set(target).is_ok() {
            tracing::debug!(base_url = self.base_url(), %target, "Inferred firmware update target");
        }
    }

    // ========== Firmware ==========

    /// Returns the firmware family, once inferred from the first successful
    /// update.
    #[must_use]
    pub fn update_target(&self) -> Option<UpdateTarget> {
        self.update_target.get().copied()
    }

    /// Returns the installed Wi-Fi firmware version.
    ///
    /// `None` until the update target is known.
    #[must_use]
    pub fn installed_wifi_version(&self) -> Option<String> {
        self.update_target()?;
        self.snapshot().wifi_version().map(str::to_string)
    }

    /// Returns the latest published Wi-Fi firmware version for this device.
    #[must_use]
    pub fn latest_wifi_version(&self) -> Option<String> {
        let target = self.update_target()?;
        self.latest_versions.read().get(target).map(str::to_string)
    }

    /// Returns the release notes URL for this device's firmware family.
    #[must_use]
    pub fn wifi_release_url(&self) -> Option<String> {
        self.update_target()
            .map(|target| self.server.release_notes_url(target))
    }

    /// Returns the latest published version of every family polled so far.
    #[must_use]
    pub fn latest_versions(&self) -> VersionCache {
        self.latest_versions.read().clone()
    }

    /// Fetches the latest version of every firmware family.
    ///
    /// Successful families overwrite their cached version; failed ones keep
    /// the previous value. Failures never affect the connection state.
    pub async fn poll_latest_versions(&self) -> VersionPollSummary {
        let summary = firmware::fetch_latest_versions(&self.protocol, &self.server).await;

        let mut cache = self.latest_versions.write();
        for (target, version) in &summary.updated {
            cache.insert(*target, version.clone());
        }

        summary
    }

    // ========== Commands ==========

    /// Sends a command to the device.
    ///
    /// The response body is ignored and the snapshot is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the request fails or the device answers
    /// with a non-success status.
    pub async fn send_command<C: Command + Sync>(&self, command: &C) -> Result<(), Error> {
        let endpoint = command.endpoint();
        tracing::debug!(base_url = self.base_url(), %endpoint, "Sending command");
        self.protocol.fetch(&endpoint).await?;
        Ok(())
    }

    /// Switches the unit on.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn power_on(&self) -> Result<(), Error> {
        self.send_command(&PowerCommand::On).await
    }

    /// Switches the unit off.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn power_off(&self) -> Result<(), Error> {
        self.send_command(&PowerCommand::Off).await
    }

    /// Presses the power button.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn power_toggle(&self) -> Result<(), Error> {
        self.send_command(&PowerCommand::Toggle).await
    }

    /// Presses the timer button, starting or stopping the timed maximum-speed
    /// run.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn timer_toggle(&self) -> Result<(), Error> {
        self.send_command(&TimerCommand::Toggle).await
    }

    /// Returns the unit to its automatic speed.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn reset_speed(&self) -> Result<(), Error> {
        self.send_command(&SpeedCommand::Reset).await
    }

    /// Sets the overall fan level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] without sending anything if `level` is
    /// outside 1-10, or error if the request fails.
    pub async fn set_speed(&self, level: u8) -> Result<(), Error> {
        let speed = FanSpeed::new(level)?;
        self.send_command(&SpeedCommand::Set(speed)).await
    }

    /// Sets the intake motor level. The device only honours it while off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] without sending anything if `level` is
    /// outside 0-10, or error if the request fails.
    pub async fn set_speed_in(&self, level: u8) -> Result<(), Error> {
        let speed = MotorSpeed::new(level)?;
        self.send_command(&SpeedCommand::Intake(speed)).await
    }

    /// Sets the exhaust motor level. The device only honours it while off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] without sending anything if `level` is
    /// outside 0-10, or error if the request fails.
    pub async fn set_speed_out(&self, level: u8) -> Result<(), Error> {
        let speed = MotorSpeed::new(level)?;
        self.send_command(&SpeedCommand::Exhaust(speed)).await
    }

    /// Sets the level of the anti-freeze program.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] without sending anything if `level` is
    /// outside 0-50, or error if the request fails.
    pub async fn set_speed_anti_freeze(&self, level: u8) -> Result<(), Error> {
        let speed = AntiFreezeSpeed::new(level)?;
        self.send_command(&SpeedCommand::AntiFreeze(speed)).await
    }

    /// Asks the device to look for a firmware update.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn update_check(&self) -> Result<(), Error> {
        self.send_command(&UpdateCheckCommand).await
    }
}

// ========== HTTP Device Entry Point ==========

impl Device<HttpClient> {
    /// Creates a builder for an HTTP device from a host string.
    ///
    /// This is a convenience method equivalent to
    /// `Device::http_config(HttpConfig::new(host))`.
    ///
    /// # Arguments
    ///
    /// * `host` - Hostname or IP address, optionally with scheme and port
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use luefter_lib::Device;
    ///
    /// # async fn example() -> luefter_lib::Result<()> {
    /// let device = Device::http("192.168.1.50").build().await?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn http(host: impl Into<String>) -> HttpDeviceBuilder {
        HttpDeviceBuilder::new(HttpConfig::new(host))
    }

    /// Creates a builder for an HTTP device from an `HttpConfig`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use luefter_lib::Device;
    /// use luefter_lib::protocol::HttpConfig;
    ///
    /// # async fn example() -> luefter_lib::Result<()> {
    /// let config = HttpConfig::new("192.168.1.50").with_timeout(Duration::from_secs(5));
    /// let device = Device::http_config(config).build().await?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn http_config(config: HttpConfig) -> HttpDeviceBuilder {
        HttpDeviceBuilder::new(config)
    }

    /// Spawns a task polling the firmware server at the configured
    /// [`version_poll_interval`](PollingConfig::version_poll_interval).
    ///
    /// The first poll runs one interval from now. The task stops when the
    /// device is dropped or the handle is aborted.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use luefter_lib::Device;
    ///
    /// # async fn example() -> luefter_lib::Result<()> {
    /// let device = Arc::new(Device::http("192.168.1.50").build().await?);
    /// let poller = device.spawn_version_poller();
    /// // ...
    /// poller.abort();
    /// # Ok(())
    /// # }
    /// ```
    #[must_use = "dropping the handle detaches the poller"]
    pub fn spawn_version_poller(self: &Arc<Self>) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let period = self.polling.version_poll_interval();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(device) = weak.upgrade() else {
                    break;
                };
                device.poll_latest_versions().await;
            }
        })
    }
}
