//! 패널 컨트롤러.
//!
//! 연결 단계 상태 기계(Disconnected → Connecting → Connected)와 채널
//! 브로드캐스트 동작을 조율하고, 설정과 폴링 결과를 하나의 뷰로 합친다.

use crate::config_store::ConfigStore;
use crate::event_bus::{ConnectionPhase, EventBus, PanelAction, PanelEvent};
use crate::persistence::PersistenceGateway;
use crate::status_poller::StatusPoller;
use futures::future::join_all;
use kicklock_core::config::PanelSettings;
use kicklock_core::error::CoreError;
use kicklock_core::models::logs::ChannelLogs;
use kicklock_core::models::panel_config::PanelConfig;
use kicklock_core::models::status::{Ack, BackendStatus, HealthResponse, MAX_CHANNELS};
use kicklock_core::ports::remote_client::RemoteClient;
use kicklock_core::ports::snapshot_store::SnapshotStore;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 전체 해제 명령
pub const RELEASE_COMMAND: &str = "ACTION 2";

/// UI가 소비하는 병합 뷰
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub phase: ConnectionPhase,
    pub connected: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub status: BackendStatus,
    pub logs: ChannelLogs,
    pub config: Arc<PanelConfig>,
}

/// 성공한 브로드캐스트 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    pub command: String,
    /// 명령을 받은 채널 (오름차순)
    pub channels: Vec<usize>,
}

#[derive(Debug, Default)]
struct PhaseState {
    phase: ConnectionPhase,
    /// 연결 해제가 일어날 때마다 증가. 진행 중인 연결 시도를 무효화한다.
    epoch: u64,
}

/// 패널 컨트롤러
pub struct PanelController {
    remote: Arc<dyn RemoteClient>,
    config: Arc<ConfigStore>,
    gateway: PersistenceGateway,
    poller: StatusPoller,
    events: EventBus,
    phase: Mutex<PhaseState>,
}

impl PanelController {
    pub fn new(
        remote: Arc<dyn RemoteClient>,
        config: Arc<ConfigStore>,
        gateway: PersistenceGateway,
        poller: StatusPoller,
        events: EventBus,
    ) -> Self {
        Self {
            remote,
            config,
            gateway,
            poller,
            events,
            phase: Mutex::new(PhaseState::default()),
        }
    }

    /// 설정값으로 게이트웨이, 설정 저장소, 폴러를 만들어 조립한다.
    /// 설정은 스냅샷 저장소에서 복원한다. Tokio 런타임 안에서 호출해야 한다.
    pub fn from_settings(
        remote: Arc<dyn RemoteClient>,
        snapshots: Arc<dyn SnapshotStore>,
        settings: &PanelSettings,
        events: EventBus,
    ) -> Self {
        let gateway = PersistenceGateway::new(
            Arc::clone(&snapshots),
            Arc::clone(&remote),
            events.clone(),
            settings.debounce_window(),
        );
        let config = Arc::new(ConfigStore::load(
            snapshots.as_ref(),
            gateway.clone(),
            events.clone(),
        ));
        let poller = StatusPoller::new(
            Arc::clone(&remote),
            settings.poll_interval(),
            settings.poller.log_limit,
        );
        Self::new(remote, config, gateway, poller, events)
    }

    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }

    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// 현재 연결 단계
    pub fn phase(&self) -> ConnectionPhase {
        self.phase.lock().phase
    }

    /// 설정과 폴링 결과를 합친 뷰
    pub fn view(&self) -> PanelView {
        let state = self.poller.state();
        PanelView {
            phase: self.phase(),
            connected: state.connected,
            loading: state.loading,
            error: state.error,
            status: state.status,
            logs: self.poller.logs(),
            config: self.config.snapshot(),
        }
    }

    /// 백엔드 생존 확인
    pub async fn health(&self) -> Result<HealthResponse, CoreError> {
        self.remote.health().await
    }

    /// 연결.
    ///
    /// 현재 전체 설정을 먼저 전송하고 완료된 뒤에만 연결을 요청한다.
    /// 어느 단계든 실패하면 Disconnected로 돌아간다.
    /// Connected 단계라도 폴링이 연결 끊김을 보고했으면 다시 연결한다.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let poll = self.poller.state();
        let dropped = !poll.loading && !poll.connected;
        let epoch = {
            let mut state = self.phase.lock();
            match state.phase {
                ConnectionPhase::Disconnected => {}
                ConnectionPhase::Connected if dropped => {
                    info!("백엔드가 연결 끊김을 보고, 재연결 허용");
                }
                phase => {
                    return Err(CoreError::InvalidState(format!(
                        "이미 {phase} 상태입니다"
                    )));
                }
            }
            state.phase = ConnectionPhase::Connecting;
            state.epoch
        };
        self.events
            .publish(PanelEvent::PhaseChanged(ConnectionPhase::Connecting));
        self.poller.set_loading(true);

        let snapshot = self.config.snapshot();
        info!("연결 시작: 설정 전송 후 연결 요청");
        let result = self.configure_then_connect(&snapshot).await;

        match result {
            Ok(()) => {
                if !self.transition_if(epoch, ConnectionPhase::Connected) {
                    self.poller.set_loading(false);
                    warn!("연결 도중 연결 해제 요청이 있어 연결 결과를 무시");
                    return Err(CoreError::InvalidState(
                        "연결 도중 연결이 해제되었습니다".to_string(),
                    ));
                }
                info!("연결 완료");
                self.poller.refresh_status().await;
                Ok(())
            }
            Err(e) => {
                self.transition_if(epoch, ConnectionPhase::Disconnected);
                self.poller.set_loading(false);
                self.report_failure(PanelAction::Connect, &e);
                Err(e)
            }
        }
    }

    async fn configure_then_connect(&self, snapshot: &PanelConfig) -> Result<(), CoreError> {
        self.remote.configure(snapshot).await?;
        self.remote.connect().await?;
        Ok(())
    }

    /// 연결 해제. 현재 단계와 관계없이 항상 시도한다.
    /// 실패하면 단계는 그대로 두어 다시 시도할 수 있다.
    pub async fn disconnect(&self) -> Result<(), CoreError> {
        self.poller.set_loading(true);
        match self.remote.disconnect().await {
            Ok(_) => {
                let changed = {
                    let mut state = self.phase.lock();
                    state.epoch += 1;
                    let changed = state.phase != ConnectionPhase::Disconnected;
                    state.phase = ConnectionPhase::Disconnected;
                    changed
                };
                if changed {
                    self.events
                        .publish(PanelEvent::PhaseChanged(ConnectionPhase::Disconnected));
                }
                info!("연결 해제 완료");
                self.poller.refresh_status().await;
                Ok(())
            }
            Err(e) => {
                self.poller.set_loading(false);
                self.report_failure(PanelAction::Disconnect, &e);
                Err(e)
            }
        }
    }

    /// 열린 모든 채널에 해제 명령 전송
    pub async fn release_all(&self) -> Result<BroadcastReport, CoreError> {
        self.broadcast(PanelAction::ReleaseAll, RELEASE_COMMAND)
            .await
    }

    /// 열린 모든 채널을 목표 행성으로 이동
    pub async fn fly_to_target(&self) -> Result<BroadcastReport, CoreError> {
        let config = self.config.snapshot();
        let planet = config.planet.trim();
        if planet.is_empty() {
            return Err(CoreError::validation("planet", "목표 행성을 입력하세요"));
        }
        self.broadcast(PanelAction::FlyToTarget, &format!("JOIN {planet}"))
            .await
    }

    /// 백엔드 일괄 해제 (`/api/release`)
    pub async fn release_via_backend(&self) -> Result<Ack, CoreError> {
        self.remote.release().await.inspect_err(|e| {
            self.report_failure(PanelAction::ReleaseViaBackend, e);
        })
    }

    /// 단일 채널에 명령 전송
    pub async fn send_command(&self, channel: usize, command: &str) -> Result<Ack, CoreError> {
        if !(1..=MAX_CHANNELS).contains(&channel) {
            return Err(CoreError::validation(
                "wsNumber",
                format!("채널은 1..={MAX_CHANNELS}"),
            ));
        }
        if command.trim().is_empty() {
            return Err(CoreError::validation("command", "빈 명령"));
        }
        self.remote
            .send_command(channel, command)
            .await
            .inspect_err(|e| self.report_failure(PanelAction::SendCommand, e))
    }

    /// 열린 채널 전체에 같은 명령을 동시에 보낸다.
    /// 일부가 실패해도 나머지 전송은 취소하지 않는다.
    async fn broadcast(
        &self,
        action: PanelAction,
        command: &str,
    ) -> Result<BroadcastReport, CoreError> {
        let state = self.poller.state();
        if self.phase() != ConnectionPhase::Connected && !state.connected {
            return Err(CoreError::InvalidState(format!(
                "{action}: 연결되지 않았습니다"
            )));
        }

        let channels = state.status.open_channels();
        debug!("{action} 브로드캐스트: {command} → {:?}", channels);

        let results = join_all(channels.iter().map(|&channel| async move {
            (channel, self.remote.send_command(channel, command).await)
        }))
        .await;

        let total = results.len();
        let failures: Vec<(usize, CoreError)> = results
            .into_iter()
            .filter_map(|(channel, result)| result.err().map(|e| (channel, e)))
            .collect();

        if let Some((channel, first)) = failures.first() {
            let err = CoreError::Broadcast {
                failed: failures.len(),
                total,
                first: format!("ws{channel}: {first}"),
            };
            self.report_failure(action, &err);
            return Err(err);
        }

        info!("{action} 전송 완료: {} 채널", total);
        Ok(BroadcastReport {
            command: command.to_string(),
            channels,
        })
    }

    /// 같은 연결 시도가 아직 유효할 때만 단계를 바꾼다
    fn transition_if(&self, epoch: u64, next: ConnectionPhase) -> bool {
        let applied = {
            let mut state = self.phase.lock();
            if state.epoch == epoch && state.phase == ConnectionPhase::Connecting {
                state.phase = next;
                true
            } else {
                false
            }
        };
        if applied {
            self.events.publish(PanelEvent::PhaseChanged(next));
        }
        applied
    }

    fn report_failure(&self, action: PanelAction, err: &CoreError) {
        warn!("{action} 실패: {err}");
        self.events.publish(PanelEvent::ActionFailed {
            action,
            reason: err.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeRemote};
    use assert_matches::assert_matches;
    use kicklock_core::models::panel_config::ConfigField;
    use kicklock_core::snapshot::MemorySnapshotStore;
    use std::time::Duration;

    fn controller(remote: Arc<FakeRemote>) -> PanelController {
        PanelController::from_settings(
            remote,
            Arc::new(MemorySnapshotStore::new()),
            &PanelSettings::default(),
            EventBus::default(),
        )
    }

    async fn connected(remote: Arc<FakeRemote>) -> PanelController {
        let ctl = controller(remote);
        ctl.connect().await.unwrap();
        ctl
    }

    #[tokio::test]
    async fn connect_pushes_full_config_before_connect() {
        let remote = Arc::new(FakeRemote::with_open_channels(&[1]));
        let ctl = controller(remote.clone());
        ctl.config()
            .apply(ConfigField::Code(1), "X".into())
            .unwrap();

        ctl.connect().await.unwrap();

        let calls = remote.calls();
        let configure_at = calls
            .iter()
            .position(|c| matches!(c, Call::Configure(_)))
            .unwrap();
        let connect_at = calls.iter().position(|c| *c == Call::Connect).unwrap();
        assert!(configure_at < connect_at);
        assert_eq!(calls.last(), Some(&Call::Status));

        let pushed = serde_json::to_value(&remote.configure_calls()[0]).unwrap();
        assert_eq!(pushed["rc1"], "X");
        assert_eq!(pushed["kickrc"], "");

        assert_eq!(ctl.phase(), ConnectionPhase::Connected);
        let view = ctl.view();
        assert!(view.connected);
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn configure_failure_skips_connect() {
        let remote = Arc::new(FakeRemote::new());
        remote.fail("configure");
        let ctl = controller(remote.clone());
        let mut rx = ctl.events().subscribe();

        let err = ctl.connect().await.unwrap_err();
        assert_matches!(err, CoreError::Network(_));
        assert!(!remote.calls().contains(&Call::Connect));
        assert_eq!(ctl.phase(), ConnectionPhase::Disconnected);

        let mut saw_failure = false;
        while let Ok(event) = rx.try_recv() {
            if let PanelEvent::ActionFailed { action, .. } = event {
                assert_eq!(action, PanelAction::Connect);
                saw_failure = true;
            }
        }
        assert!(saw_failure);
    }

    #[tokio::test]
    async fn connect_failure_returns_to_disconnected() {
        let remote = Arc::new(FakeRemote::new());
        remote.fail("connect");
        let ctl = controller(remote.clone());

        assert!(ctl.connect().await.is_err());
        assert_eq!(ctl.phase(), ConnectionPhase::Disconnected);
        assert!(!ctl.view().loading);

        // 재시도 가능
        remote.recover("connect");
        ctl.connect().await.unwrap();
        assert_eq!(ctl.phase(), ConnectionPhase::Connected);
    }

    #[tokio::test]
    async fn second_connect_rejected() {
        let ctl = connected(Arc::new(FakeRemote::with_open_channels(&[1]))).await;
        let err = ctl.connect().await.unwrap_err();
        assert_matches!(err, CoreError::InvalidState(_));
    }

    #[tokio::test]
    async fn reconnect_allowed_after_backend_drops() {
        let remote = Arc::new(FakeRemote::with_open_channels(&[1, 2]));
        let ctl = connected(remote.clone()).await;
        assert_eq!(ctl.phase(), ConnectionPhase::Connected);

        // 백엔드가 스스로 끊긴 뒤 폴링이 반영
        remote.set_open_channels(&[]);
        ctl.poller().poll_once().await;
        let view = ctl.view();
        assert!(!view.connected);
        assert_eq!(view.phase, ConnectionPhase::Connected);

        remote.set_open_channels(&[1]);
        ctl.connect().await.unwrap();
        assert_eq!(ctl.phase(), ConnectionPhase::Connected);
        let connects = remote
            .calls()
            .iter()
            .filter(|c| **c == Call::Connect)
            .count();
        assert_eq!(connects, 2);
        assert_eq!(remote.configure_calls().len(), 2);
    }

    #[tokio::test]
    async fn disconnect_failure_keeps_phase() {
        let remote = Arc::new(FakeRemote::with_open_channels(&[1]));
        let ctl = connected(remote.clone()).await;

        remote.fail("disconnect");
        assert!(ctl.disconnect().await.is_err());
        assert_eq!(ctl.phase(), ConnectionPhase::Connected);

        remote.recover("disconnect");
        ctl.disconnect().await.unwrap();
        assert_eq!(ctl.phase(), ConnectionPhase::Disconnected);
    }

    #[tokio::test]
    async fn disconnect_attempted_when_already_disconnected() {
        let remote = Arc::new(FakeRemote::new());
        let ctl = controller(remote.clone());
        ctl.disconnect().await.unwrap();
        assert!(remote.calls().contains(&Call::Disconnect));
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_during_connect_wins() {
        let remote = Arc::new(FakeRemote::new());
        remote.delay_configure(Duration::from_millis(500));
        let ctl = Arc::new(controller(remote.clone()));

        let connecting = {
            let ctl = Arc::clone(&ctl);
            tokio::spawn(async move { ctl.connect().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(ctl.phase(), ConnectionPhase::Connecting);

        ctl.disconnect().await.unwrap();
        let result = connecting.await.unwrap();
        assert_matches!(result, Err(CoreError::InvalidState(_)));
        assert_eq!(ctl.phase(), ConnectionPhase::Disconnected);
    }

    #[tokio::test]
    async fn release_all_targets_only_open_channels() {
        let remote = Arc::new(FakeRemote::with_open_channels(&[1, 3]));
        let ctl = connected(remote.clone()).await;

        let report = ctl.release_all().await.unwrap();
        assert_eq!(report.channels, vec![1, 3]);
        assert_eq!(
            remote.sent(),
            vec![(1, "ACTION 2".to_string()), (3, "ACTION 2".to_string())]
        );
    }

    #[tokio::test]
    async fn broadcast_reports_first_failure_without_cancelling_siblings() {
        let remote = Arc::new(FakeRemote::with_open_channels(&[1, 2, 4]));
        remote.fail_channel(2);
        let ctl = connected(remote.clone()).await;

        let err = ctl.release_all().await.unwrap_err();
        assert_matches!(
            err,
            CoreError::Broadcast { failed: 1, total: 3, ref first } if first.starts_with("ws2")
        );
        assert_eq!(remote.sent().len(), 3);
    }

    #[tokio::test]
    async fn broadcast_skips_unknown_channels() {
        let remote = Arc::new(FakeRemote::new());
        remote.set_status(BackendStatus {
            connected: true,
            websockets: [("ws2", true), ("ws6", true), ("ws10", true)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        });
        let ctl = connected(remote.clone()).await;

        let report = ctl.release_all().await.unwrap();
        assert_eq!(report.channels, vec![2]);
        assert_eq!(remote.sent(), vec![(2, "ACTION 2".to_string())]);
    }

    #[tokio::test]
    async fn broadcast_requires_connection() {
        let remote = Arc::new(FakeRemote::new());
        let ctl = controller(remote.clone());
        let err = ctl.release_all().await.unwrap_err();
        assert_matches!(err, CoreError::InvalidState(_));
        assert!(remote.sent().is_empty());
    }

    #[tokio::test]
    async fn fly_to_target_uses_planet() {
        let remote = Arc::new(FakeRemote::with_open_channels(&[2, 5]));
        let ctl = connected(remote.clone()).await;

        let err = ctl.fly_to_target().await.unwrap_err();
        assert_matches!(err, CoreError::Validation { ref field, .. } if field == "planet");

        ctl.config()
            .apply(ConfigField::Planet, "Earth".into())
            .unwrap();
        let report = ctl.fly_to_target().await.unwrap();
        assert_eq!(report.command, "JOIN Earth");
        assert_eq!(
            remote.sent(),
            vec![(2, "JOIN Earth".to_string()), (5, "JOIN Earth".to_string())]
        );
    }

    #[tokio::test]
    async fn send_command_validates_channel() {
        let remote = Arc::new(FakeRemote::new());
        let ctl = controller(remote.clone());
        assert_matches!(
            ctl.send_command(0, "ACTION 2").await,
            Err(CoreError::Validation { .. })
        );
        assert_matches!(
            ctl.send_command(6, "ACTION 2").await,
            Err(CoreError::Validation { .. })
        );
        ctl.send_command(5, "PING").await.unwrap();
        assert_eq!(remote.sent(), vec![(5, "PING".to_string())]);
    }

    #[tokio::test]
    async fn release_via_backend_surfaces_failure() {
        let remote = Arc::new(FakeRemote::new());
        remote.fail("release");
        let ctl = controller(remote.clone());
        let mut rx = ctl.events().subscribe();

        assert!(ctl.release_via_backend().await.is_err());
        assert_matches!(
            rx.recv().await.unwrap(),
            PanelEvent::ActionFailed {
                action: PanelAction::ReleaseViaBackend,
                ..
            }
        );
    }
}
