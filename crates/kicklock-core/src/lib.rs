//! # kicklock-core
//!
//! KICKLOCK 패널 도메인 모델, 포트(trait) 정의, 에러 타입, 검증기.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 패널 설정, 백엔드 상태, 채널 로그 (serde Serialize/Deserialize)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`validation`]: 식별 코드 중복 검사 (순수 함수)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 런타임 설정 구조체
//! - [`snapshot`]: 설정 스냅샷 저장소 (JSON 파일 / 메모리)

pub mod config;
pub mod error;
pub mod models;
pub mod ports;
pub mod snapshot;
pub mod validation;
