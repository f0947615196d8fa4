//! 패널 이벤트 버스.
//!
//! `tokio::broadcast` 기반 알림 채널. 편집 거부, 영속화 실패, 동작 실패 등
//! 사용자에게 보여줄 일시적 알림이 모두 여기로 흐른다.

use kicklock_core::models::panel_config::ConfigField;
use std::fmt;
use tokio::sync::broadcast;
use tracing::debug;

/// 연결 단계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionPhase {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionPhase::Disconnected => "disconnected",
            ConnectionPhase::Connecting => "connecting",
            ConnectionPhase::Connected => "connected",
        };
        f.write_str(s)
    }
}

/// 사용자 동작 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Connect,
    Disconnect,
    ReleaseAll,
    FlyToTarget,
    ReleaseViaBackend,
    SendCommand,
}

impl fmt::Display for PanelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PanelAction::Connect => "connect",
            PanelAction::Disconnect => "disconnect",
            PanelAction::ReleaseAll => "release-all",
            PanelAction::FlyToTarget => "fly-to-target",
            PanelAction::ReleaseViaBackend => "release",
            PanelAction::SendCommand => "send-command",
        };
        f.write_str(s)
    }
}

/// 패널 이벤트
#[derive(Debug, Clone)]
pub enum PanelEvent {
    /// 편집이 수락되어 설정이 바뀜
    ConfigChanged { field: ConfigField },
    /// 편집 거부 (중복 코드 등)
    EditRejected { field: ConfigField, reason: String },
    /// 로컬 스냅샷 저장 완료
    ConfigPersisted,
    /// 로컬 스냅샷 저장 실패
    PersistenceFailed(String),
    /// 백엔드 설정 전송 실패
    RemotePushFailed(String),
    /// 사용자 동작 실패
    ActionFailed { action: PanelAction, reason: String },
    /// 연결 단계 전환
    PhaseChanged(ConnectionPhase),
}

/// 패널 이벤트 버스. 복제본은 같은 채널을 공유한다.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PanelEvent>,
}

impl EventBus {
    /// 새 이벤트 버스 생성
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 이벤트 발행. 구독자가 없으면 버린다.
    pub fn publish(&self, event: PanelEvent) {
        debug!("이벤트 발행: {:?}", std::mem::discriminant(&event));
        let _ = self.tx.send(event);
    }

    /// 구독자 생성
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(128)
    }
}
