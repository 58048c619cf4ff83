// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Luefter Lib - A Rust library to poll and control Bayernluft ventilation units.
//!
//! Bayernluft decentralised ventilation units ("Bayernlüfter") expose their
//! state and controls over plain HTTP GET requests. This library provides an
//! async client for both firmware generations.
//!
//! # Supported Features
//!
//! - **State polling**: JSON live export (current firmware) or the
//!   template driven text export (legacy firmware)
//! - **Typed telemetry**: temperatures, humidity, fan levels, system mode,
//!   device clock, firmware versions
//! - **Control**: power, timer, fan level, intake/exhaust motor levels,
//!   anti-freeze level, firmware update check
//! - **Firmware lookup**: latest published Wi-Fi firmware per hardware family
//! - **Availability tracking**: transient failures are tolerated up to a
//!   configurable threshold
//!
//! # Quick Start
//!
//! ## Current Firmware
//!
//! ```no_run
//! use luefter_lib::{Device, UpdateOutcome};
//!
//! #[tokio::main]
//! async fn main() -> luefter_lib::Result<()> {
//!     let device = Device::http("192.168.1.50").build().await?;
//!
//!     if device.update().await? == UpdateOutcome::Refreshed {
//!         let state = device.snapshot();
//!         println!("{:?}: {:?} °C", state.device_name(), state.temperature_in());
//!     }
//!
//!     device.power_on().await?;
//!     device.set_speed(5).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Legacy Firmware
//!
//! ```no_run
//! use luefter_lib::Device;
//! use luefter_lib::telemetry::WireFormat;
//!
//! #[tokio::main]
//! async fn main() -> luefter_lib::Result<()> {
//!     let device = Device::http("192.168.1.51")
//!         .with_wire_format(WireFormat::Template)
//!         .build_without_probe()?;
//!
//!     // Fetches /export.txt once, then ?export=1 on every update
//!     device.update().await?;
//!     println!("On: {:?}", device.snapshot().is_on());
//!     Ok(())
//! }
//! ```
//!
//! ## Polling Loop
//!
//! ```no_run
//! use std::sync::Arc;
//! use luefter_lib::{Device, Error};
//!
//! #[tokio::main]
//! async fn main() -> luefter_lib::Result<()> {
//!     let device = Arc::new(Device::http("192.168.1.50").build().await?);
//!     let _versions = device.spawn_version_poller();
//!
//!     let mut ticker = tokio::time::interval(device.polling().update_interval());
//!     loop {
//!         ticker.tick().await;
//!         match device.update().await {
//!             Ok(outcome) => println!("{outcome:?}"),
//!             Err(Error::Unavailable { consecutive_failures, .. }) => {
//!                 println!("unavailable after {consecutive_failures} failures");
//!             }
//!             Err(e) => println!("poll failed: {e}"),
//!         }
//!         if device.latest_wifi_version() != device.installed_wifi_version() {
//!             println!("firmware update: {:?}", device.wifi_release_url());
//!         }
//!     }
//! }
//! ```

pub mod command;
mod device;
pub mod error;
pub mod firmware;
pub mod protocol;
pub mod state;
pub mod telemetry;
pub mod types;

pub use command::{Command, PowerCommand, SpeedCommand, TimerCommand, UpdateCheckCommand};
pub use device::{Device, HttpDeviceBuilder, PollingConfig, UpdateOutcome};
pub use error::{Error, ParseError, ProtocolError, Result, ValueError};
pub use firmware::{FirmwareServer, VersionCache, VersionPollSummary};
pub use protocol::HttpConfig;
pub use state::{ConnectionState, DeviceSnapshot};
pub use telemetry::WireFormat;
pub use types::{AntiFreezeSpeed, FanSpeed, MotorSpeed, SystemMode, UpdateTarget, Value};
