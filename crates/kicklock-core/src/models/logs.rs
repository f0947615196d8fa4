//! 채널 로그 모델.
//!
//! 백엔드는 채널별(`log1`..`logN`) 최근 로그를 돌려준다. 클라이언트는
//! 매 폴링마다 통째로 교체하며, 표시용으로 채널당 개수를 제한한다.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// 채널 로그 한 줄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339, `YYYY-MM-DD HH:MM:SS`(UTC) 문자열 또는 epoch 밀리초.
    /// 해석할 수 없으면 `None`이고 메시지는 그대로 남는다.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message: String,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// 엔트리 하나의 타임스탬프 오류가 응답 전체를 깨뜨리지 않도록 실패 대신 `None`
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let parsed = match &raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => parse_timestamp_text(s),
        _ => None,
    };
    if parsed.is_none() && !raw.is_null() {
        debug!("해석할 수 없는 로그 타임스탬프: {raw}");
    }
    Ok(parsed)
}

/// 채널별 로그 묶음 (`log1`..`logN` → 오래된 것부터 최신 순)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelLogs(pub BTreeMap<String, Vec<LogEntry>>);

impl ChannelLogs {
    /// 채널 로그 조회 (없으면 빈 슬라이스)
    pub fn channel(&self, channel: usize) -> &[LogEntry] {
        self.0
            .get(&format!("log{channel}"))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 채널당 최신 `limit`개만 남긴 사본
    pub fn bounded(mut self, limit: usize) -> Self {
        for entries in self.0.values_mut() {
            if entries.len() > limit {
                let excess = entries.len() - limit;
                entries.drain(..excess);
            }
        }
        self
    }

    /// 전체 로그 수
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// `/api/logs` 응답
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: ChannelLogs,
}
