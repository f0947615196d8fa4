//! KICKLOCK 핵심 에러 타입.
//!
//! 어댑터 crate와 패널 레이어는 모두 `CoreError`를 그대로 전파한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 경계 검증, 원격 호출 실패 등 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패 (알 수 없는 키, 타입 불일치, 길이 초과 등)
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 2xx 이외의 응답
    #[error("API 에러 ({status}): {body}")]
    Api {
        /// HTTP 상태 코드
        status: u16,
        /// 응답 본문
        body: String,
    },

    /// 서비스 일시 불가 (503)
    #[error("서비스 일시 불가: {0}")]
    ServiceUnavailable(String),

    /// 리소스를 찾을 수 없음 (404)
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류
        resource_type: String,
        /// 리소스 식별자
        id: String,
    },

    /// 현재 연결 단계에서 허용되지 않는 동작
    #[error("잘못된 상태: {0}")]
    InvalidState(String),

    /// 채널 브로드캐스트 일부 실패
    #[error("브로드캐스트 실패 ({failed}/{total}): {first}")]
    Broadcast {
        /// 실패한 채널 수
        failed: usize,
        /// 전송 시도한 채널 수
        total: usize,
        /// 첫 번째 실패 사유
        first: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 필드 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 전송 계층 실패 여부 (폴링에서 조용히 흡수되는 에러)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CoreError::Network(_)
                | CoreError::Api { .. }
                | CoreError::ServiceUnavailable(_)
                | CoreError::NotFound { .. }
        )
    }
}
