//! 상태/로그 폴러.
//!
//! 시작 즉시 한 번, 이후 고정 주기로 상태와 로그를 동시에 조회해
//! `watch` 채널로 최신 값을 게시한다 (병합 없이 교체).

use kicklock_core::error::CoreError;
use kicklock_core::models::logs::ChannelLogs;
use kicklock_core::models::status::BackendStatus;
use kicklock_core::ports::remote_client::RemoteClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// 폴링으로 얻은 연결 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    /// 백엔드가 보고한 연결 여부 (상태 조회 실패 시 false)
    pub connected: bool,
    /// 첫 상태 결과 전, 또는 연결 동작 진행 중
    pub loading: bool,
    /// 마지막 상태 조회 실패 사유
    pub error: Option<String>,
    /// 마지막으로 성공한 상태
    pub status: BackendStatus,
}

impl Default for PollState {
    fn default() -> Self {
        Self {
            connected: false,
            loading: true,
            error: None,
            status: BackendStatus::default(),
        }
    }
}

struct PollerShared {
    remote: Arc<dyn RemoteClient>,
    period: Duration,
    log_limit: usize,
    state_tx: watch::Sender<PollState>,
    logs_tx: watch::Sender<ChannelLogs>,
}

/// 상태/로그 폴러. 복제본은 같은 게시 채널을 공유한다.
#[derive(Clone)]
pub struct StatusPoller {
    shared: Arc<PollerShared>,
}

impl StatusPoller {
    pub fn new(remote: Arc<dyn RemoteClient>, period: Duration, log_limit: usize) -> Self {
        let (state_tx, _) = watch::channel(PollState::default());
        let (logs_tx, _) = watch::channel(ChannelLogs::default());
        Self {
            shared: Arc::new(PollerShared {
                remote,
                period,
                log_limit,
                state_tx,
                logs_tx,
            }),
        }
    }

    /// 상태 구독
    pub fn subscribe_state(&self) -> watch::Receiver<PollState> {
        self.shared.state_tx.subscribe()
    }

    /// 로그 구독
    pub fn subscribe_logs(&self) -> watch::Receiver<ChannelLogs> {
        self.shared.logs_tx.subscribe()
    }

    /// 현재 상태
    pub fn state(&self) -> PollState {
        self.shared.state_tx.borrow().clone()
    }

    /// 현재 로그
    pub fn logs(&self) -> ChannelLogs {
        self.shared.logs_tx.borrow().clone()
    }

    /// 폴링 시작. 핸들을 멈추거나 버리면 루프가 끝난다.
    pub fn start(&self) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let poller = self.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poller.shared.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(
                "상태 폴링 시작 (주기 {}ms)",
                poller.shared.period.as_millis()
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        poller.poll_once().await;
                    }
                    _ = shutdown_rx.changed() => {
                        info!("상태 폴링 종료");
                        break;
                    }
                }
            }
        });

        PollerHandle {
            shutdown_tx,
            task: Some(task),
        }
    }

    /// 상태와 로그를 한 번 조회한다. 두 조회의 실패는 서로 독립이다.
    pub async fn poll_once(&self) {
        let remote = &self.shared.remote;
        let (status, logs) = tokio::join!(remote.status(), remote.logs());
        self.apply_status(status);
        self.apply_logs(logs);
    }

    /// 상태만 즉시 갱신
    pub async fn refresh_status(&self) {
        let status = self.shared.remote.status().await;
        self.apply_status(status);
    }

    /// 연결 동작 진행 표시
    pub fn set_loading(&self, loading: bool) {
        self.shared.state_tx.send_modify(|state| state.loading = loading);
    }

    fn apply_status(&self, result: Result<BackendStatus, CoreError>) {
        self.shared.state_tx.send_modify(|state| {
            let was_connected = state.connected;
            match result {
                Ok(status) => {
                    state.connected = status.connected;
                    state.status = status;
                    state.error = None;
                }
                Err(e) => {
                    // 전송 실패는 조용히 흡수
                    if e.is_transport() {
                        debug!("상태 조회 실패: {e}");
                    } else {
                        warn!("상태 응답 처리 실패: {e}");
                    }
                    state.connected = false;
                    state.error = Some(e.to_string());
                }
            }
            state.loading = false;
            if was_connected != state.connected {
                info!("백엔드 연결 상태 변경: {}", state.connected);
            }
        });
    }

    fn apply_logs(&self, result: Result<ChannelLogs, CoreError>) {
        match result {
            Ok(logs) => {
                self.shared
                    .logs_tx
                    .send_replace(logs.bounded(self.shared.log_limit));
            }
            Err(e) => warn!("로그 조회 실패 (이전 로그 유지): {e}"),
        }
    }
}

/// 실행 중인 폴링 루프 핸들
pub struct PollerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// 루프가 아직 살아 있는지
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// 폴링 중지. 진행 중인 조회가 있어도 기다리지 않고 취소한다.
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            let _ = self.shutdown_tx.send(true);
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
