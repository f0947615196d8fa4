//! 백엔드 상태 모델.
//!
//! `/api/status`, `/api/health`, `/api/send` 요청/응답 구조체.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 전체 채널 수 (코드 채널 4 + 킥 채널 1)
pub const MAX_CHANNELS: usize = 5;

/// 백엔드가 정의하는 확인 응답. 내용은 해석하지 않는다.
pub type Ack = serde_json::Value;

/// `/api/health` 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 필드가 없으면 2xx 응답 자체를 정상으로 본다
    #[serde(default = "healthy")]
    pub ok: bool,
}

fn healthy() -> bool {
    true
}

/// `/api/status` 응답: 연결 여부와 채널별 웹소켓 개방 상태
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    /// 전체 연결 여부
    pub connected: bool,
    /// `ws1`..`wsN` → 개방 여부
    #[serde(default)]
    pub websockets: BTreeMap<String, bool>,
}

impl BackendStatus {
    /// 채널 웹소켓이 열려 있는지 (보고되지 않은 채널은 닫힌 것으로 본다)
    pub fn is_channel_open(&self, channel: usize) -> bool {
        self.websockets
            .get(&format!("ws{channel}"))
            .copied()
            .unwrap_or(false)
    }

    /// 열린 채널 번호 목록 (오름차순, `1..=MAX_CHANNELS` 밖의 키는 무시)
    pub fn open_channels(&self) -> Vec<usize> {
        let mut channels: Vec<usize> = self
            .websockets
            .iter()
            .filter(|(_, open)| **open)
            .filter_map(|(key, _)| key.strip_prefix("ws")?.parse().ok())
            .filter(|n| (1..=MAX_CHANNELS).contains(n))
            .collect();
        channels.sort_unstable();
        channels
    }
}

/// `/api/send` 요청 본문
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendCommandRequest {
    #[serde(rename = "wsNumber")]
    pub ws_number: usize,
    pub command: String,
}
