//! # kicklock-panel
//!
//! KICKLOCK 패널 엔진. 설정 편집 검증과 디바운스 영속화, 상태/로그 폴링,
//! 연결 상태 기계를 조율한다. 화면 렌더링은 이 crate의 소비자가 맡는다.
//!
//! ## 구조
//!
//! - [`config_store`]: 단일 권위 설정 (copy-on-write 스냅샷)
//! - [`persistence`]: 디바운스 로컬 스냅샷 + 백엔드 전송
//! - [`status_poller`]: 주기적 상태/로그 조회 (`watch` 게시)
//! - [`controller`]: 연결/해제/브로드캐스트 상태 기계, 병합 뷰
//! - [`event_bus`]: 거부/실패 알림 채널
//! - [`settings`]: 파일/환경변수/CLI 설정 로더
//! - [`lifecycle`]: 종료 신호

pub mod config_store;
pub mod controller;
pub mod event_bus;
pub mod lifecycle;
pub mod persistence;
pub mod settings;
pub mod status_poller;

#[cfg(test)]
pub(crate) mod testing;
