//! 백엔드 REST 클라이언트.
//!
//! `RemoteClient` 포트 구현. 요청마다 한 번만 호출하고 실패는 그대로
//! 호출자에게 돌려준다 (재시도/캐시 없음).

use async_trait::async_trait;
use kicklock_core::error::CoreError;
use kicklock_core::models::logs::{ChannelLogs, LogsResponse};
use kicklock_core::models::panel_config::PanelConfig;
use kicklock_core::models::status::{Ack, BackendStatus, HealthResponse, SendCommandRequest};
use kicklock_core::ports::remote_client::RemoteClient;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// LocalTunnel 경고 페이지 우회 헤더
const TUNNEL_BYPASS_HEADER: &str = "bypass-tunnel-reminder";

/// LocalTunnel 호스트 판별용 문자열
const TUNNEL_HOST_MARKER: &str = "loca.lt";

/// 백엔드 REST 클라이언트: `RemoteClient` 포트 구현
pub struct HttpRemoteClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteClient {
    /// 새 클라이언트 생성
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if base_url.contains(TUNNEL_HOST_MARKER) {
            headers.insert(
                HeaderName::from_static(TUNNEL_BYPASS_HEADER),
                HeaderValue::from_static("true"),
            );
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 백엔드 기본 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let status_code = status.as_u16();
        let text = resp.text().await.unwrap_or_else(|e| {
            tracing::warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });

        match status_code {
            404 => Err(CoreError::NotFound {
                resource_type: "API".to_string(),
                id: text,
            }),
            503 => Err(CoreError::ServiceUnavailable(text)),
            _ => Err(CoreError::Api {
                status: status_code,
                body: text,
            }),
        }
    }

    fn transport_error(what: &str, e: reqwest::Error) -> CoreError {
        if e.is_timeout() {
            CoreError::Network(format!("{what} 타임아웃: {e}"))
        } else {
            CoreError::Network(format!("{what} 실패: {e}"))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| Self::transport_error(path, e))?;

        let resp = Self::check_response(resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| CoreError::Internal(format!("{path} 응답 파싱 실패: {e}")))
    }

    async fn post_for_ack<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<Ack, CoreError> {
        let mut req = self.client.post(self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Self::transport_error(path, e))?;
        let resp = Self::check_response(resp).await?;

        let text = resp
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("{path} 응답 읽기 실패: {e}")))?;
        Ok(parse_ack(&text))
    }
}

/// 확인 응답은 형식이 정해져 있지 않다. JSON이 아니면 문자열 그대로 보관한다.
fn parse_ack(text: &str) -> Ack {
    if text.trim().is_empty() {
        return Ack::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Ack::String(text.to_string()))
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn health(&self) -> Result<HealthResponse, CoreError> {
        self.get_json("/api/health").await
    }

    async fn status(&self) -> Result<BackendStatus, CoreError> {
        self.get_json("/api/status").await
    }

    async fn logs(&self) -> Result<ChannelLogs, CoreError> {
        let resp: LogsResponse = self.get_json("/api/logs").await?;
        Ok(resp.logs)
    }

    async fn configure(&self, config: &PanelConfig) -> Result<Ack, CoreError> {
        debug!("설정 전송: {}", self.base_url);
        self.post_for_ack("/api/configure", Some(config)).await
    }

    async fn connect(&self) -> Result<Ack, CoreError> {
        debug!("연결 요청");
        self.post_for_ack::<()>("/api/connect", None).await
    }

    async fn disconnect(&self) -> Result<Ack, CoreError> {
        debug!("연결 종료 요청");
        self.post_for_ack::<()>("/api/disconnect", None).await
    }

    async fn send_command(&self, channel: usize, command: &str) -> Result<Ack, CoreError> {
        debug!("명령 전송: ws{channel} ← {command}");
        let body = SendCommandRequest {
            ws_number: channel,
            command: command.to_string(),
        };
        self.post_for_ack("/api/send", Some(&body)).await
    }

    async fn release(&self) -> Result<Ack, CoreError> {
        debug!("일괄 해제 요청");
        self.post_for_ack::<()>("/api/release", None).await
    }
}
