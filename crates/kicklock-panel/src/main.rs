//! # kicklock
//!
//! KICKLOCK 패널 헤드리스 실행기.
//! 설정 복원, 상태 폴링, 연결 상태와 알림 로그 출력, 종료 시 대기 중인 설정 저장.

use anyhow::Result;
use clap::Parser;
use kicklock_core::models::status::MAX_CHANNELS;
use kicklock_core::ports::remote_client::RemoteClient;
use kicklock_core::ports::snapshot_store::SnapshotStore;
use kicklock_core::snapshot::{JsonFileSnapshotStore, MemorySnapshotStore};
use kicklock_network::http_client::HttpRemoteClient;
use kicklock_panel::controller::PanelController;
use kicklock_panel::event_bus::{EventBus, PanelEvent};
use kicklock_panel::lifecycle::{wait_for_exit_signal, Shutdown};
use kicklock_panel::settings::{load_settings, resolve_snapshot_path, SettingsOverrides};
use kicklock_panel::status_poller::PollState;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// KICKLOCK 패널
///
/// 자동화 백엔드 설정 동기화 및 상태 감시
#[derive(Parser, Debug)]
#[command(name = "kicklock")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (TOML/JSON)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 백엔드 URL (기본: http://localhost:3000)
    #[arg(long, short = 'b')]
    backend_url: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 상태 폴링 주기 (밀리초)
    #[arg(long)]
    poll_interval: Option<u64>,

    /// 설정 저장 디바운스 (밀리초)
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// 요청 타임아웃 (밀리초)
    #[arg(long)]
    request_timeout_ms: Option<u64>,

    /// 설정 스냅샷 파일 경로
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// 스냅샷을 디스크에 남기지 않음
    #[arg(long)]
    ephemeral: bool,

    /// 시작 직후 연결 요청
    #[arg(long)]
    connect: bool,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            base_url: self.backend_url.clone(),
            request_timeout_ms: self.request_timeout_ms,
            poll_interval_ms: self.poll_interval,
            debounce_ms: self.debounce_ms,
            snapshot_path: self.snapshot.clone(),
        }
    }
}

/// 알림 이벤트를 로그로 출력
async fn log_events(mut rx: broadcast::Receiver<PanelEvent>, mut shutdown: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(PanelEvent::EditRejected { field, reason }) => warn!("편집 거부 [{field}]: {reason}"),
                Ok(PanelEvent::PersistenceFailed(reason)) => warn!("설정 저장 실패: {reason}"),
                Ok(PanelEvent::RemotePushFailed(reason)) => warn!("백엔드 설정 전송 실패: {reason}"),
                Ok(PanelEvent::ActionFailed { action, reason }) => error!("{action} 실패: {reason}"),
                Ok(PanelEvent::PhaseChanged(phase)) => info!("연결 단계: {phase}"),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => warn!("이벤트 {n}개 누락"),
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = shutdown.changed() => break,
        }
    }
}

/// 채널 개방 상태 전환을 로그로 출력
async fn log_channel_transitions(
    mut rx: watch::Receiver<PollState>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut prev_open: Vec<usize> = Vec::new();
    let mut prev_error: Option<String> = None;
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                let open = state.status.open_channels();
                if open != prev_open {
                    let summary: Vec<String> = (1..=MAX_CHANNELS)
                        .map(|n| format!("ws{n}={}", if open.contains(&n) { "open" } else { "closed" }))
                        .collect();
                    info!("채널 상태: {}", summary.join(" "));
                    prev_open = open;
                }
                if state.error != prev_error {
                    if let Some(err) = &state.error {
                        warn!("백엔드 상태 조회 실패: {err}");
                    } else if prev_error.is_some() {
                        info!("백엔드 상태 조회 복구");
                    }
                    prev_error = state.error;
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화 (RUST_LOG가 있으면 우선)
    let log_filter = format!(
        "kicklock={},kicklock_panel={},kicklock_core={},kicklock_network={}",
        args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let settings = load_settings(args.config.as_deref(), &args.overrides())?;
    info!("KICKLOCK 패널 시작 (백엔드: {})", settings.backend.base_url);

    let remote: Arc<dyn RemoteClient> = Arc::new(HttpRemoteClient::new(
        &settings.backend.base_url,
        settings.request_timeout(),
    )?);

    let snapshots: Arc<dyn SnapshotStore> = if args.ephemeral {
        info!("휘발성 세션, 스냅샷 저장 안 함");
        Arc::new(MemorySnapshotStore::new())
    } else {
        let store = JsonFileSnapshotStore::with_path(resolve_snapshot_path(&settings))?;
        info!("설정 스냅샷: {}", store.path().display());
        Arc::new(store)
    };

    let events = EventBus::default();
    let controller = Arc::new(PanelController::from_settings(
        remote,
        snapshots,
        &settings,
        events.clone(),
    ));

    match controller.health().await {
        Ok(health) if health.ok => info!("백엔드 응답 확인"),
        Ok(_) => warn!("백엔드가 비정상 상태를 보고"),
        Err(e) => warn!("백엔드 확인 실패 (폴링은 계속): {e}"),
    }

    let shutdown = Shutdown::new();
    let event_task = tokio::spawn(log_events(events.subscribe(), shutdown.subscribe()));
    let status_task = tokio::spawn(log_channel_transitions(
        controller.poller().subscribe_state(),
        shutdown.subscribe(),
    ));

    let poller = controller.poller().start();

    if args.connect {
        // 실패는 ActionFailed 이벤트로 이미 출력된다
        if controller.connect().await.is_ok() {
            let open = controller.view().status.open_channels();
            info!("연결됨, 열린 채널: {:?}", open);
        }
    }

    info!("KICKLOCK 패널 실행 중 (Ctrl+C로 종료)");
    let signal = wait_for_exit_signal().await?;
    shutdown.trigger(signal);

    poller.stop().await;
    if controller.gateway().flush().await {
        info!("대기 중이던 설정 저장 완료");
    }
    let _ = tokio::join!(event_task, status_task);

    info!("KICKLOCK 패널 종료");
    Ok(())
}
