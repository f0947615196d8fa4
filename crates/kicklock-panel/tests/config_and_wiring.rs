//! 설정 및 와이어링 통합 테스트.
//!
//! PanelSettings → 어댑터 생성 검증.

use kicklock_core::config::PanelSettings;
use kicklock_core::snapshot::{JsonFileSnapshotStore, MemorySnapshotStore, SNAPSHOT_FILE_NAME};
use kicklock_network::http_client::HttpRemoteClient;
use kicklock_panel::controller::PanelController;
use kicklock_panel::event_bus::{ConnectionPhase, EventBus};
use kicklock_panel::settings::{load_settings, resolve_snapshot_path, SettingsOverrides};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn settings_defaults_are_valid() {
    let settings = PanelSettings::default_config();

    assert!(settings.backend.base_url.starts_with("http"));
    assert!(settings.backend.request_timeout_ms > 0);
    assert!(settings.poller.interval_ms > 0);
    assert!(settings.poller.log_limit > 0);
    assert!(settings.persistence.debounce_ms > 0);
}

#[test]
fn explicit_settings_file_and_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("kicklock.json");
    std::fs::write(
        &path,
        r#"{"backend": {"request_timeout_ms": 5000}, "persistence": {"debounce_ms": 300}}"#,
    )
    .unwrap();

    let overrides = SettingsOverrides {
        snapshot_path: Some(temp_dir.path().join("snap.json")),
        ..Default::default()
    };
    let settings = load_settings(Some(&path), &overrides).unwrap();

    assert_eq!(settings.request_timeout().as_millis(), 5_000);
    assert_eq!(settings.debounce_window().as_millis(), 300);
    assert_eq!(
        resolve_snapshot_path(&settings),
        temp_dir.path().join("snap.json")
    );
}

#[test]
fn adapters_wire_from_settings() {
    let temp_dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let health = server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .create();

    let mut settings = PanelSettings::default_config();
    settings.backend.base_url = server.url();
    settings.persistence.snapshot_path = Some(temp_dir.path().join(SNAPSHOT_FILE_NAME));

    let remote = Arc::new(
        HttpRemoteClient::new(&settings.backend.base_url, settings.request_timeout()).unwrap(),
    );
    let store =
        Arc::new(JsonFileSnapshotStore::with_path(resolve_snapshot_path(&settings)).unwrap());

    // 게이트웨이는 생성 시점의 런타임에 묶인다
    let response = tokio_test::block_on(async {
        let controller =
            PanelController::from_settings(remote, store, &settings, EventBus::default());
        assert_eq!(controller.phase(), ConnectionPhase::Disconnected);
        assert!(controller.view().loading);
        controller.health().await
    })
    .unwrap();
    assert!(response.ok);
    health.assert();
}

#[tokio::test]
async fn ephemeral_session_starts_from_defaults() {
    let server = mockito::Server::new_async().await;
    let remote = Arc::new(
        HttpRemoteClient::new(&server.url(), std::time::Duration::from_secs(1)).unwrap(),
    );
    let controller = PanelController::from_settings(
        remote,
        Arc::new(MemorySnapshotStore::new()),
        &PanelSettings::default(),
        EventBus::default(),
    );
    let view = controller.view();
    assert_eq!(view.config.device.code(), "312");
    assert_eq!(view.config.reconnect_ms, 5_000);
    assert!(view.logs.0.is_empty());
}
