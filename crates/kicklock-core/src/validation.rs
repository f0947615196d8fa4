//! 설정 편집 검증.
//!
//! 식별 코드(기본 코드, 대체 코드, 킥 코드)는 대소문자 구분 없이 전역에서
//! 유일해야 한다. 검사는 편집 후의 전체 코드 집합을 기준으로 한다.

use std::collections::HashSet;

use crate::models::panel_config::{ConfigField, FieldValue, PanelConfig};

/// 검증 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(String),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// 후보 편집을 현재 설정에 대해 검증한다.
///
/// 빈 값과 코드 이외의 필드는 항상 통과한다. 값의 타입과 길이는
/// [`PanelConfig::set`]에서 따로 검사한다.
pub fn validate(field: ConfigField, value: &FieldValue, current: &PanelConfig) -> Verdict {
    if !field.is_identity_code() || value.is_blank() {
        return Verdict::Accept;
    }
    let FieldValue::Text(candidate) = value else {
        return Verdict::Accept;
    };

    let mut seen = HashSet::new();
    for (slot, code) in current.identity_codes() {
        let code = if slot == field {
            candidate.as_str()
        } else {
            code
        };
        if code.trim().is_empty() {
            continue;
        }
        let lowered = code.to_lowercase();
        if !seen.insert(lowered.clone()) {
            return Verdict::Reject(format!("중복 코드: '{lowered}'는 이미 사용 중입니다"));
        }
    }
    Verdict::Accept
}
