//! 런타임 설정 로더.
//!
//! 우선순위: 기본값 → 설정 파일(TOML/JSON) → `KICKLOCK_*` 환경변수 → CLI 인자.
//! 중첩 키는 `__`로 구분한다 (`KICKLOCK_POLLER__INTERVAL_MS=2000`).

use config::{Config, Environment, File};
use directories::ProjectDirs;
use kicklock_core::config::PanelSettings;
use kicklock_core::error::CoreError;
use kicklock_core::snapshot::SNAPSHOT_FILE_NAME;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 환경변수 접두사
pub const ENV_PREFIX: &str = "KICKLOCK";

/// 백엔드 URL 단축 환경변수
pub const BACKEND_URL_ENV: &str = "KICKLOCK_BACKEND_URL";

/// 기본 설정 파일 이름 (플랫폼 설정 디렉토리 아래)
pub const SETTINGS_FILE_NAME: &str = "kicklock.toml";

/// CLI에서 넘어오는 덮어쓰기 값
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub base_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub debounce_ms: Option<u64>,
    pub snapshot_path: Option<PathBuf>,
}

/// 플랫폼별 프로젝트 디렉토리
///
/// - macOS: `~/Library/Application Support/com.kicklock.panel`
/// - Windows: `%APPDATA%\kicklock\panel`
/// - Linux: `~/.config/panel`
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "kicklock", "panel")
}

/// 기본 스냅샷 경로 (플랫폼 설정 디렉토리, 없으면 현재 디렉토리)
pub fn default_snapshot_path() -> PathBuf {
    project_dirs()
        .map(|d| d.config_dir().join(SNAPSHOT_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(SNAPSHOT_FILE_NAME))
}

/// 설정에 지정된 스냅샷 경로, 없으면 기본 경로
pub fn resolve_snapshot_path(settings: &PanelSettings) -> PathBuf {
    settings
        .persistence
        .snapshot_path
        .clone()
        .unwrap_or_else(default_snapshot_path)
}

/// 설정 로드.
///
/// `file`이 주어지면 반드시 존재해야 한다. 없으면 플랫폼 설정 디렉토리의
/// `kicklock.toml`을 (있을 때만) 읽는다.
pub fn load_settings(
    file: Option<&Path>,
    overrides: &SettingsOverrides,
) -> Result<PanelSettings, CoreError> {
    build_settings(file, None, overrides)
}

fn build_settings(
    file: Option<&Path>,
    env: Option<HashMap<String, String>>,
    overrides: &SettingsOverrides,
) -> Result<PanelSettings, CoreError> {
    let mut builder = Config::builder();

    match file {
        Some(path) => {
            debug!("설정 파일: {}", path.display());
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }
        None => {
            if let Some(dirs) = project_dirs() {
                let path = dirs.config_dir().join(SETTINGS_FILE_NAME);
                builder = builder.add_source(File::from(path).required(false));
            }
        }
    }

    let backend_url = match &env {
        Some(vars) => vars.get(BACKEND_URL_ENV).cloned(),
        None => std::env::var(BACKEND_URL_ENV).ok(),
    };

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(env),
    );

    let mut settings: PanelSettings = builder
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| CoreError::Config(format!("설정 로드 실패: {e}")))?;

    if let Some(url) = backend_url {
        settings.backend.base_url = url;
    }
    apply_overrides(&mut settings, overrides);
    validate_settings(&settings)?;
    Ok(settings)
}

fn apply_overrides(settings: &mut PanelSettings, overrides: &SettingsOverrides) {
    if let Some(url) = &overrides.base_url {
        settings.backend.base_url = url.clone();
    }
    if let Some(ms) = overrides.request_timeout_ms {
        settings.backend.request_timeout_ms = ms;
    }
    if let Some(ms) = overrides.poll_interval_ms {
        settings.poller.interval_ms = ms;
    }
    if let Some(ms) = overrides.debounce_ms {
        settings.persistence.debounce_ms = ms;
    }
    if let Some(path) = &overrides.snapshot_path {
        settings.persistence.snapshot_path = Some(path.clone());
    }
}

fn validate_settings(settings: &PanelSettings) -> Result<(), CoreError> {
    let url = settings.backend.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(CoreError::Config(format!(
            "백엔드 URL은 http:// 또는 https://로 시작해야 합니다: {url}"
        )));
    }
    // 0 주기는 tokio interval이 거부한다
    if settings.poller.interval_ms == 0 {
        return Err(CoreError::Config("폴링 주기는 0보다 커야 합니다".to_string()));
    }
    Ok(())
}
