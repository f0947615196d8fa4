//! 설정 스냅샷 저장소 포트.
//!
//! 재시작 후에도 남는 로컬 사본. 구현은 [`crate::snapshot`] 참조.

use crate::error::CoreError;
use crate::models::panel_config::PanelConfig;

/// 패널 설정의 내구성 스냅샷
pub trait SnapshotStore: Send + Sync {
    /// 저장된 스냅샷 로드. 아직 저장된 적이 없으면 `Ok(None)`.
    fn load(&self) -> Result<Option<PanelConfig>, CoreError>;

    /// 스냅샷 덮어쓰기 (동기)
    fn save(&self, config: &PanelConfig) -> Result<(), CoreError>;
}
