//! 패널 런타임 설정 구조체.
//!
//! 백엔드 URL, 요청 타임아웃, 폴링/디바운스 주기, 스냅샷 경로 등
//! 엔진 동작 설정을 정의한다. `config` crate를 통해 파일/환경변수에서 로드.
//! 편집 대상인 백엔드 설정은 [`crate::models::panel_config`]에 있다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 최상위 패널 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSettings {
    /// 백엔드 연결 설정
    #[serde(default)]
    pub backend: BackendConfig,
    /// 상태 폴링 설정
    #[serde(default)]
    pub poller: PollerConfig,
    /// 설정 영속화 설정
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// 백엔드 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// 백엔드 기본 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// 상태/로그 폴링 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// 폴링 주기 (밀리초)
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    /// 채널당 보관할 최대 로그 수
    #[serde(default = "default_log_limit")]
    pub log_limit: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            log_limit: default_log_limit(),
        }
    }
}

/// 설정 영속화 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// 디바운스 대기 시간 (밀리초)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// 스냅샷 파일 경로 (None이면 플랫폼 기본 경로)
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            snapshot_path: None,
        }
    }
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self::default_config()
    }
}

impl PanelSettings {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            backend: BackendConfig::default(),
            poller: PollerConfig::default(),
            persistence: PersistenceConfig::default(),
        }
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.backend.request_timeout_ms)
    }

    /// 폴링 주기를 Duration으로 반환
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poller.interval_ms)
    }

    /// 디바운스 대기 시간을 Duration으로 반환
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.persistence.debounce_ms)
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_request_timeout_ms() -> u64 {
    30_000
}
fn default_poll_interval_ms() -> u64 {
    1_000
}
fn default_log_limit() -> usize {
    200
}
fn default_debounce_ms() -> u64 {
    1_000
}
