//! 테스트용 가짜 `RemoteClient`.
//!
//! 호출 순서를 기록하고, 엔드포인트별 실패와 지연을 주입할 수 있다.

use async_trait::async_trait;
use kicklock_core::error::CoreError;
use kicklock_core::models::logs::ChannelLogs;
use kicklock_core::models::panel_config::PanelConfig;
use kicklock_core::models::status::{Ack, BackendStatus, HealthResponse};
use kicklock_core::ports::remote_client::RemoteClient;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

/// 기록된 호출
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Health,
    Status,
    Logs,
    Configure(PanelConfig),
    Connect,
    Disconnect,
    Send(usize, String),
    Release,
}

#[derive(Default)]
pub struct FakeRemote {
    calls: Mutex<Vec<Call>>,
    status: Mutex<BackendStatus>,
    logs: Mutex<ChannelLogs>,
    failing: Mutex<HashSet<&'static str>>,
    failing_channels: Mutex<HashSet<usize>>,
    configure_delay: Mutex<Option<Duration>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지정된 채널이 열린 상태로 보고
    pub fn with_open_channels(channels: &[usize]) -> Self {
        let fake = Self::new();
        fake.set_open_channels(channels);
        fake
    }

    pub fn set_open_channels(&self, channels: &[usize]) {
        let websockets: BTreeMap<String, bool> = (1..=5)
            .map(|n| (format!("ws{n}"), channels.contains(&n)))
            .collect();
        *self.status.lock() = BackendStatus {
            connected: !channels.is_empty(),
            websockets,
        };
    }

    pub fn set_status(&self, status: BackendStatus) {
        *self.status.lock() = status;
    }

    pub fn set_logs(&self, logs: ChannelLogs) {
        *self.logs.lock() = logs;
    }

    /// 엔드포인트 실패 주입 ("status", "logs", "configure", "connect", ...)
    pub fn fail(&self, endpoint: &'static str) {
        self.failing.lock().insert(endpoint);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.failing.lock().remove(endpoint);
    }

    pub fn fail_channel(&self, channel: usize) {
        self.failing_channels.lock().insert(channel);
    }

    pub fn delay_configure(&self, delay: Duration) {
        *self.configure_delay.lock() = Some(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn configure_calls(&self) -> Vec<PanelConfig> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Configure(config) => Some(config),
                _ => None,
            })
            .collect()
    }

    pub fn sent(&self) -> Vec<(usize, String)> {
        let mut sent: Vec<_> = self
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send(n, cmd) => Some((n, cmd)),
                _ => None,
            })
            .collect();
        sent.sort();
        sent
    }

    fn record(&self, call: Call, endpoint: &'static str) -> Result<(), CoreError> {
        self.calls.lock().push(call);
        if self.failing.lock().contains(endpoint) {
            return Err(CoreError::Network(format!("{endpoint} 실패 (주입)")));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteClient for FakeRemote {
    async fn health(&self) -> Result<HealthResponse, CoreError> {
        self.record(Call::Health, "health")?;
        Ok(HealthResponse { ok: true })
    }

    async fn status(&self) -> Result<BackendStatus, CoreError> {
        self.record(Call::Status, "status")?;
        Ok(self.status.lock().clone())
    }

    async fn logs(&self) -> Result<ChannelLogs, CoreError> {
        self.record(Call::Logs, "logs")?;
        Ok(self.logs.lock().clone())
    }

    async fn configure(&self, config: &PanelConfig) -> Result<Ack, CoreError> {
        let delay = *self.configure_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(Call::Configure(config.clone()), "configure")?;
        Ok(Ack::Null)
    }

    async fn connect(&self) -> Result<Ack, CoreError> {
        self.record(Call::Connect, "connect")?;
        Ok(Ack::Null)
    }

    async fn disconnect(&self) -> Result<Ack, CoreError> {
        self.record(Call::Disconnect, "disconnect")?;
        Ok(Ack::Null)
    }

    async fn send_command(&self, channel: usize, command: &str) -> Result<Ack, CoreError> {
        self.record(Call::Send(channel, command.to_string()), "send")?;
        if self.failing_channels.lock().contains(&channel) {
            return Err(CoreError::Api {
                status: 500,
                body: format!("ws{channel} closed"),
            });
        }
        Ok(Ack::Null)
    }

    async fn release(&self) -> Result<Ack, CoreError> {
        self.record(Call::Release, "release")?;
        Ok(Ack::Null)
    }
}
