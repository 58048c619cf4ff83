// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests against a real Bayernluft ventilation unit.
//!
//! These tests require a device on the network and are ignored by default.
//! Run with: `cargo test --test real_devices -- --ignored --test-threads=1`
//!
//! # Environment Variables
//!
//! - `LUEFTER_HOST` - Device IP address or hostname
//! - `LUEFTER_WIRE_FORMAT` - `json` (default) or `template` for legacy firmware
//!
//! # Example
//!
//! ```bash
//! export LUEFTER_HOST=192.168.1.50
//! cargo test --test real_devices -- --ignored --test-threads=1
//! ```

use std::env;
use std::time::Duration;

use luefter_lib::telemetry::WireFormat;
use luefter_lib::{ConnectionState, Device, UpdateOutcome};
use tokio::time::sleep;

// =============================================================================
// Test Configuration from Environment Variables
// =============================================================================

/// Device configuration loaded from environment variables.
struct DeviceConfig {
    host: String,
    wire_format: WireFormat,
}

impl DeviceConfig {
    fn from_env() -> Self {
        let wire_format = match env::var("LUEFTER_WIRE_FORMAT").as_deref() {
            Ok("template") => WireFormat::Template,
            Ok("json") | Err(_) => WireFormat::Json,
            Ok(other) => panic!("Invalid LUEFTER_WIRE_FORMAT: {other}"),
        };
        Self {
            host: env::var("LUEFTER_HOST").expect("LUEFTER_HOST not set"),
            wire_format,
        }
    }
}

async fn connect() -> Device<luefter_lib::protocol::HttpClient> {
    let config = DeviceConfig::from_env();
    Device::http(config.host)
        .with_wire_format(config.wire_format)
        .build()
        .await
        .expect("Failed to create device")
}

// =============================================================================
// Telemetry
// =============================================================================

mod telemetry {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn update_reads_state() {
        let device = connect().await;

        let outcome = device.update().await.expect("Update failed");
        assert_eq!(outcome, UpdateOutcome::Refreshed);
        assert_eq!(device.state(), ConnectionState::Ready);

        let snapshot = device.snapshot();
        println!("Snapshot: {snapshot:#?}");
        assert!(snapshot.device_name().is_some(), "Device should report its name");
        assert!(snapshot.is_on().is_some(), "Device should report power state");
    }

    #[tokio::test]
    #[ignore]
    async fn firmware_versions() {
        let device = connect().await;
        device.update().await.expect("Update failed");

        println!("Update target: {:?}", device.update_target());
        println!("Installed: {:?}", device.installed_wifi_version());
        println!("Latest: {:?}", device.latest_wifi_version());
        println!("Release notes: {:?}", device.wifi_release_url());

        assert!(device.update_target().is_some());
        assert!(device.wifi_release_url().is_some());
    }
}

// =============================================================================
// Commands
// =============================================================================

mod commands {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn set_speed_and_reset() {
        let device = connect().await;

        device.set_speed(3).await.expect("Failed to set speed");
        sleep(Duration::from_secs(2)).await;
        device.update().await.expect("Update failed");
        let snapshot = device.snapshot();
        println!(
            "Speeds after set: in={:?} out={:?}",
            snapshot.speed_in(),
            snapshot.speed_out()
        );

        device.reset_speed().await.expect("Failed to reset speed");
    }

    #[tokio::test]
    #[ignore]
    async fn power_toggle_twice_restores_state() {
        let device = connect().await;
        device.update().await.expect("Update failed");
        let before = device.snapshot().is_on();

        device.power_toggle().await.expect("Failed to toggle");
        sleep(Duration::from_secs(2)).await;
        device.power_toggle().await.expect("Failed to toggle");
        sleep(Duration::from_secs(2)).await;

        device.update().await.expect("Update failed");
        assert_eq!(device.snapshot().is_on(), before);
    }
}
