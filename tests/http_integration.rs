// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP transport using wiremock.

use luefter_lib::protocol::{ENDPOINT_JSON, HttpClient, Protocol};
use luefter_lib::telemetry::WireFormat;
use luefter_lib::{
    ConnectionState, Device, Error, FirmwareServer, ProtocolError, SystemMode, UpdateOutcome,
    UpdateTarget, ValueError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn live_export() -> serde_json::Value {
    serde_json::json!({
        "DeviceName": "Schlafzimmer",
        "MAC": "AA:BB:CC:DD:EE:FF",
        "LocalIP": "192.168.1.50",
        "FW_MainController": "Rev2.4",
        "FW_WiFi": "WS32240427",
        "SystemOn": "1",
        "SystemMode": "Behaglichkeitsmode",
        "Speed_In": "4",
        "Speed_Out": "5",
        "Temp_In": "21,5",
        "Temp_Out": "N/A",
        "rel_Humidity_In": "48,0",
        "Date": "01.03.2023",
        "Time": "12:00:00"
    })
}

/// Device on the mock server, with the firmware server on the same mock.
fn device_for(mock_server: &MockServer) -> Device<HttpClient> {
    Device::http(mock_server.uri().replace("http://", ""))
        .with_firmware_server(FirmwareServer::new(&mock_server.uri()))
        .build_without_probe()
        .unwrap()
}

async fn mount_live(mock_server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .and(query_param("export", "live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

// ============================================================================
// HttpClient Tests
// ============================================================================

mod http_client {
    use super::*;

    #[tokio::test]
    async fn fetch_appends_endpoint() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/index.html"))
            .and(query_param("export", "live"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(format!("{}/", mock_server.uri())).unwrap();
        let body = client.fetch(ENDPOINT_JSON).await.unwrap();
        assert_eq!(body, "{}");
    }

    #[tokio::test]
    async fn fetch_drops_invalid_utf8() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"K\xfcche".to_vec()))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(mock_server.uri()).unwrap();
        let body = client.fetch("?export=1").await.unwrap();
        assert_eq!(body, "Kche");
    }

    #[tokio::test]
    async fn fetch_reports_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(mock_server.uri()).unwrap();
        let err = client.fetch("/export.txt").await.unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnexpectedStatus { status: 404, .. }
        ));
        assert!(!err.is_transport());
    }
}

// ============================================================================
// JSON Telemetry Tests
// ============================================================================

mod json_telemetry {
    use super::*;

    #[tokio::test]
    async fn update_reads_live_export() {
        let mock_server = MockServer::start().await;
        mount_live(&mock_server, live_export()).await;

        let device = device_for(&mock_server);
        assert_eq!(device.update().await.unwrap(), UpdateOutcome::Refreshed);
        assert_eq!(device.state(), ConnectionState::Ready);

        let snapshot = device.snapshot();
        assert_eq!(snapshot.device_name(), Some("Schlafzimmer"));
        assert_eq!(snapshot.is_on(), Some(true));
        assert_eq!(snapshot.system_mode(), Some(SystemMode::Behaglichkeitsmode));
        assert_eq!(snapshot.speed_out(), Some(5));
        assert_eq!(snapshot.temperature_in(), Some(21.5));
        assert_eq!(snapshot.humidity_in(), Some(48.0));
        assert!(snapshot.contains("Temp_Out"));
        assert_eq!(snapshot.temperature_out(), None);
        assert!(snapshot.raw().keys().eq(snapshot.converted().keys()));
    }

    #[tokio::test]
    async fn legacy_underscore_names_are_canonical() {
        let mock_server = MockServer::start().await;
        mount_live(
            &mock_server,
            serde_json::json!({ "_SystemOn": "0", "_FrostschutzAktiv": "1" }),
        )
        .await;

        let device = device_for(&mock_server);
        device.update().await.unwrap();

        let snapshot = device.snapshot();
        assert_eq!(snapshot.is_on(), Some(false));
        assert_eq!(snapshot.is_frost_protection_active(), Some(true));
        assert!(!snapshot.contains("_SystemOn"));
    }

    #[tokio::test]
    async fn non_object_body_is_parse_error() {
        let mock_server = MockServer::start().await;
        mount_live(&mock_server, serde_json::json!(["not", "an", "object"])).await;

        let device = device_for(&mock_server);
        assert!(matches!(device.update().await, Err(Error::Parse(_))));
        assert_eq!(device.consecutive_failures(), 0);
    }
}

// ============================================================================
// Legacy Template Telemetry Tests
// ============================================================================

mod template_telemetry {
    use super::*;

    fn legacy_device(mock_server: &MockServer) -> Device<HttpClient> {
        Device::http(mock_server.uri())
            .with_wire_format(WireFormat::Template)
            .with_firmware_server(FirmwareServer::new(&mock_server.uri()))
            .build_without_probe()
            .unwrap()
    }

    async fn mount_template(mock_server: &MockServer, template: &str, expected: u64) {
        Mock::given(method("GET"))
            .and(path("/export.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(template))
            .expect(expected)
            .mount(mock_server)
            .await;
    }

    async fn mount_export(mock_server: &MockServer, export: &str) {
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("export", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(export))
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn update_fetches_template_once() {
        let mock_server = MockServer::start().await;
        mount_template(&mock_server, "~Date~~Time~~", 1).await;
        mount_export(&mock_server, "~Date~01.03.2023~Time~12:00:00~").await;

        let device = legacy_device(&mock_server);
        assert_eq!(device.update().await.unwrap(), UpdateOutcome::Refreshed);
        assert_eq!(device.update().await.unwrap(), UpdateOutcome::Refreshed);

        let snapshot = device.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.date(), chrono::NaiveDate::from_ymd_opt(2023, 3, 1));
        assert_eq!(snapshot.time(), chrono::NaiveTime::from_hms_opt(12, 0, 0));
    }

    #[tokio::test]
    async fn substituted_values_with_crlf() {
        let mock_server = MockServer::start().await;
        mount_template(
            &mock_server,
            "~_SystemOn~\r\n~_SystemMode~\r\n~Temp_In~°C\r\n",
            1,
        )
        .await;
        mount_export(&mock_server, "1\r\nKellermode\r\n19,5°C\r\n").await;

        let device = legacy_device(&mock_server);
        device.update().await.unwrap();

        let snapshot = device.snapshot();
        assert_eq!(snapshot.is_on(), Some(true));
        assert_eq!(snapshot.system_mode(), Some(SystemMode::Kellermode));
        assert_eq!(snapshot.temperature_in(), Some(19.5));
    }

    #[tokio::test]
    async fn drift_refetches_template() {
        let mock_server = MockServer::start().await;
        mount_template(&mock_server, "~Date~;~Time~", 2).await;
        mount_export(&mock_server, "a changed layout without separators").await;

        let device = legacy_device(&mock_server);
        assert_eq!(device.update().await.unwrap(), UpdateOutcome::TemplateDrift);
        assert_eq!(device.update().await.unwrap(), UpdateOutcome::TemplateDrift);
        assert_eq!(device.state(), ConnectionState::Uninitialized);
        assert!(device.snapshot().is_empty());
    }
}

// ============================================================================
// Device Command Tests
// ============================================================================

mod device_commands {
    use super::*;

    async fn expect_command(mock_server: &MockServer, name: &str, value: &str) {
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param(name, value))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn power_and_timer() {
        let mock_server = MockServer::start().await;
        expect_command(&mock_server, "power", "on").await;
        expect_command(&mock_server, "power", "off").await;
        expect_command(&mock_server, "button", "power").await;
        expect_command(&mock_server, "button", "timer").await;

        let device = device_for(&mock_server);
        device.power_on().await.unwrap();
        device.power_off().await.unwrap();
        device.power_toggle().await.unwrap();
        device.timer_toggle().await.unwrap();
    }

    #[tokio::test]
    async fn speed_levels() {
        let mock_server = MockServer::start().await;
        expect_command(&mock_server, "speed", "1").await;
        expect_command(&mock_server, "speed", "10").await;
        expect_command(&mock_server, "speed", "0").await;
        expect_command(&mock_server, "speedIn", "3").await;
        expect_command(&mock_server, "speedOut", "0").await;
        expect_command(&mock_server, "speedFrM", "50").await;
        expect_command(&mock_server, "updatecheck", "1").await;

        let device = device_for(&mock_server);
        device.set_speed(1).await.unwrap();
        device.set_speed(10).await.unwrap();
        device.reset_speed().await.unwrap();
        device.set_speed_in(3).await.unwrap();
        device.set_speed_out(0).await.unwrap();
        device.set_speed_anti_freeze(50).await.unwrap();
        device.update_check().await.unwrap();

        // Commands never touch the snapshot
        assert!(device.snapshot().is_empty());
    }

    #[tokio::test]
    async fn invalid_levels_send_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let device = device_for(&mock_server);
        for level in [0, 11] {
            assert!(matches!(
                device.set_speed(level).await,
                Err(Error::Value(ValueError::OutOfRange { min: 1, max: 10, .. }))
            ));
        }
        assert!(matches!(
            device.set_speed_out(11).await,
            Err(Error::Value(ValueError::OutOfRange { min: 0, max: 10, .. }))
        ));
        assert!(matches!(
            device.set_speed_anti_freeze(51).await,
            Err(Error::Value(ValueError::OutOfRange { min: 0, max: 50, .. }))
        ));
    }

    #[tokio::test]
    async fn command_status_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let device = device_for(&mock_server);
        assert!(matches!(
            device.power_on().await,
            Err(Error::Protocol(ProtocolError::UnexpectedStatus { status: 500, .. }))
        ));
    }
}

// ============================================================================
// Firmware Version Tests
// ============================================================================

mod firmware_versions {
    use std::sync::Arc;
    use std::time::Duration;

    use luefter_lib::PollingConfig;

    use super::*;

    async fn mount_version(mock_server: &MockServer, family: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/de/download/{family}/version.txt")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn build_polls_versions_eagerly() {
        let mock_server = MockServer::start().await;
        mount_version(&mock_server, "wlan", 200, "WS1.9\n").await;
        mount_version(&mock_server, "wlan32", 200, "WS32250101\r\n").await;

        let device = Device::http(mock_server.uri())
            .with_firmware_server(FirmwareServer::new(&mock_server.uri()))
            .build()
            .await
            .unwrap();

        let versions = device.latest_versions();
        assert_eq!(versions.get(UpdateTarget::Wlan), Some("WS1.9"));
        assert_eq!(versions.get(UpdateTarget::Wlan32), Some("WS32250101"));
    }

    #[tokio::test]
    async fn build_survives_unreachable_firmware_server() {
        let device = Device::http("127.0.0.1:59999")
            .with_firmware_server(FirmwareServer::new("127.0.0.1:59998"))
            .build()
            .await
            .unwrap();

        assert!(device.latest_versions().is_empty());
    }

    #[tokio::test]
    async fn one_family_failing() {
        let mock_server = MockServer::start().await;
        mount_version(&mock_server, "wlan", 503, "").await;
        mount_version(&mock_server, "wlan32", 200, "WS32250101").await;

        let device = device_for(&mock_server);
        let summary = device.poll_latest_versions().await;

        assert!(!summary.is_complete());
        assert_eq!(summary.updated, [(UpdateTarget::Wlan32, "WS32250101".to_string())]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, UpdateTarget::Wlan);
        assert_eq!(device.latest_versions().get(UpdateTarget::Wlan), None);
    }

    #[tokio::test]
    async fn latest_version_follows_inferred_target() {
        let mock_server = MockServer::start().await;
        mount_live(&mock_server, live_export()).await;
        mount_version(&mock_server, "wlan", 200, "WS1.9").await;
        mount_version(&mock_server, "wlan32", 200, "WS32250101").await;

        let device = device_for(&mock_server);
        device.poll_latest_versions().await;
        assert_eq!(device.latest_wifi_version(), None);

        device.update().await.unwrap();
        assert_eq!(device.update_target(), Some(UpdateTarget::Wlan32));
        assert_eq!(device.installed_wifi_version().as_deref(), Some("WS32240427"));
        assert_eq!(device.latest_wifi_version().as_deref(), Some("WS32250101"));
        assert_eq!(
            device.wifi_release_url(),
            Some(format!("{}/de/wlan32_changelist.html", mock_server.uri()))
        );
    }

    #[tokio::test]
    async fn classic_controller_targets_wlan() {
        let mock_server = MockServer::start().await;
        mount_live(
            &mock_server,
            serde_json::json!({ "FW_MainController": "Rev1.3", "FW_WiFi": "WS1.2" }),
        )
        .await;

        let device = device_for(&mock_server);
        device.update().await.unwrap();
        assert_eq!(device.update_target(), Some(UpdateTarget::Wlan));
        assert_eq!(
            device.wifi_release_url(),
            Some(format!("{}/de/wlan_changelist.html", mock_server.uri()))
        );
    }

    #[tokio::test]
    async fn background_poller_refreshes_cache() {
        let mock_server = MockServer::start().await;
        mount_version(&mock_server, "wlan", 200, "WS1.9").await;
        mount_version(&mock_server, "wlan32", 200, "WS32250101").await;

        let device = Arc::new(
            Device::http(mock_server.uri())
                .with_firmware_server(FirmwareServer::new(&mock_server.uri()))
                .with_polling(
                    PollingConfig::default().with_version_poll_interval(Duration::from_millis(50)),
                )
                .build_without_probe()
                .unwrap(),
        );
        assert!(device.latest_versions().is_empty());

        let poller = device.spawn_version_poller();
        tokio::time::sleep(Duration::from_millis(300)).await;
        poller.abort();

        assert_eq!(
            device.latest_versions().get(UpdateTarget::Wlan32),
            Some("WS32250101")
        );
    }

    #[tokio::test]
    async fn zero_interval_poller_keeps_running() {
        let mock_server = MockServer::start().await;
        mount_version(&mock_server, "wlan", 200, "WS1.9").await;
        mount_version(&mock_server, "wlan32", 200, "WS32250101").await;

        let device = Arc::new(
            Device::http(mock_server.uri())
                .with_firmware_server(FirmwareServer::new(&mock_server.uri()))
                .with_polling(PollingConfig::default().with_version_poll_interval(Duration::ZERO))
                .build_without_probe()
                .unwrap(),
        );

        let poller = device.spawn_version_poller();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!poller.is_finished());
        poller.abort();

        assert_eq!(device.latest_versions().get(UpdateTarget::Wlan), Some("WS1.9"));
    }
}

// ============================================================================
// Error Handling Tests
// ============================================================================

mod error_handling {
    use super::*;

    #[tokio::test]
    async fn status_error_is_returned_immediately() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.html"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let device = device_for(&mock_server);
        let err = device.update().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::UnexpectedStatus { status: 500, .. })
        ));
        assert_eq!(device.consecutive_failures(), 1);
        assert_eq!(device.state(), ConnectionState::Uninitialized);
    }

    #[tokio::test]
    async fn repeated_status_errors_degrade() {
        let mock_server = MockServer::start().await;
        mount_live(&mock_server, live_export()).await;

        let device = device_for(&mock_server);
        device.update().await.unwrap();
        assert!(device.is_available());

        mock_server.reset().await;
        Mock::given(method("GET"))
            .and(path("/index.html"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        for _ in 0..3 {
            assert!(matches!(
                device.update().await,
                Err(Error::Protocol(ProtocolError::UnexpectedStatus { status: 500, .. }))
            ));
        }
        assert_eq!(device.state(), ConnectionState::Degraded);
        assert!(!device.is_available());
        assert_eq!(device.snapshot().device_name(), Some("Schlafzimmer"));
    }

    #[tokio::test]
    async fn handles_connection_refused() {
        // Use a port that's definitely not listening
        let device = Device::http("127.0.0.1:59999")
            .build_without_probe()
            .unwrap();

        assert_eq!(
            device.update().await.unwrap(),
            UpdateOutcome::TransientFailure {
                consecutive_failures: 1
            }
        );
        assert_eq!(
            device.update().await.unwrap(),
            UpdateOutcome::TransientFailure {
                consecutive_failures: 2
            }
        );

        let err = device.update().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Unavailable {
                consecutive_failures: 3,
                source: ProtocolError::Http(_)
            }
        ));
        assert_eq!(device.state(), ConnectionState::Degraded);
        assert!(device.power_on().await.is_err());
    }

    #[tokio::test]
    async fn malformed_host_is_not_counted() {
        let device = Device::http("bad host").build_without_probe().unwrap();

        for _ in 0..3 {
            let err = device.update().await.unwrap_err();
            assert!(matches!(err, Error::Protocol(ProtocolError::Http(_))));
        }
        assert_eq!(device.consecutive_failures(), 0);
        assert_eq!(device.state(), ConnectionState::Uninitialized);
    }

    #[tokio::test]
    async fn custom_threshold() {
        let device = Device::http("127.0.0.1:59999")
            .with_failure_threshold(1)
            .build_without_probe()
            .unwrap();

        assert!(matches!(
            device.update().await,
            Err(Error::Unavailable {
                consecutive_failures: 1,
                ..
            })
        ));
    }
}
