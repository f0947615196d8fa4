//! 원격 백엔드 클라이언트 포트.
//!
//! 구현: `kicklock-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::logs::ChannelLogs;
use crate::models::panel_config::PanelConfig;
use crate::models::status::{Ack, BackendStatus, HealthResponse};

/// 백엔드 REST 경계.
///
/// 요청 하나당 호출 하나. 재시도나 캐시는 하지 않는다.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// 생존 확인 (`GET /api/health`)
    async fn health(&self) -> Result<HealthResponse, CoreError>;

    /// 연결/채널 상태 (`GET /api/status`)
    async fn status(&self) -> Result<BackendStatus, CoreError>;

    /// 채널별 최근 로그 (`GET /api/logs`)
    async fn logs(&self) -> Result<ChannelLogs, CoreError>;

    /// 전체 설정 교체 (`POST /api/configure`)
    async fn configure(&self, config: &PanelConfig) -> Result<Ack, CoreError>;

    /// 모든 채널 연결 시작 (`POST /api/connect`)
    async fn connect(&self) -> Result<Ack, CoreError>;

    /// 모든 채널 종료 (`POST /api/disconnect`)
    async fn disconnect(&self) -> Result<Ack, CoreError>;

    /// 채널 하나에 명령 한 줄 전송 (`POST /api/send`)
    async fn send_command(&self, channel: usize, command: &str) -> Result<Ack, CoreError>;

    /// 백엔드 측 일괄 해제 (`POST /api/release`)
    async fn release(&self) -> Result<Ack, CoreError>;
}
