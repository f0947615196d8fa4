//! 설정 스냅샷 저장소 구현.
//!
//! 파일 구현은 JSON 한 파일을 통째로 덮어쓴다. 메모리 구현은 휘발성
//! 세션과 테스트에서 사용한다.

use crate::error::CoreError;
use crate::models::panel_config::PanelConfig;
use crate::ports::snapshot_store::SnapshotStore;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 스냅샷 파일 이름
pub const SNAPSHOT_FILE_NAME: &str = "panel-config.json";

/// JSON 파일 기반 스냅샷 저장소
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    /// 지정된 경로로 저장소 생성. 상위 디렉토리가 없으면 만든다.
    pub fn with_path(path: PathBuf) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "스냅샷 디렉토리 생성 실패: {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
                info!("스냅샷 디렉토리 생성: {}", parent.display());
            }
        }
        Ok(Self { path })
    }

    /// 스냅샷 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn load(&self) -> Result<Option<PanelConfig>, CoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            CoreError::Config(format!(
                "스냅샷 읽기 실패: {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let config: PanelConfig = serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(format!(
                "스냅샷 파싱 실패: {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!("스냅샷 로드 완료: {}", self.path.display());
        Ok(Some(config))
    }

    fn save(&self, config: &PanelConfig) -> Result<(), CoreError> {
        let content = serde_json::to_string_pretty(config)?;

        fs::write(&self.path, content).map_err(|e| {
            CoreError::Config(format!(
                "스냅샷 저장 실패: {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!("스냅샷 저장 완료: {}", self.path.display());
        Ok(())
    }
}

/// 메모리 스냅샷 저장소: 저장 횟수를 함께 기록한다
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slot: Mutex<Option<PanelConfig>>,
    writes: Mutex<usize>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 초기 스냅샷을 가진 저장소
    pub fn with_snapshot(config: PanelConfig) -> Self {
        Self {
            slot: Mutex::new(Some(config)),
            writes: Mutex::new(0),
        }
    }

    /// 마지막으로 저장된 스냅샷
    pub fn current(&self) -> Option<PanelConfig> {
        self.slot.lock().clone()
    }

    /// 누적 저장 횟수
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<PanelConfig>, CoreError> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, config: &PanelConfig) -> Result<(), CoreError> {
        *self.slot.lock() = Some(config.clone());
        *self.writes.lock() += 1;
        Ok(())
    }
}
