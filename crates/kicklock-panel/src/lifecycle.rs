//! 종료 처리.
//!
//! 실행기의 보조 루프(이벤트 로그, 채널 상태 로그)는 [`Shutdown`]을 구독하고,
//! 메인 루프는 [`wait_for_exit_signal`]로 OS 시그널을 기다린 뒤 종료를 알린다.

use std::fmt;
use tokio::sync::watch;
use tracing::info;

/// 종료를 일으킨 OS 시그널
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for ExitSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitSignal::Interrupt => write!(f, "SIGINT"),
            ExitSignal::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// 보조 루프에 종료를 알리는 신호. 한 번 켜지면 되돌리지 않는다.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// 종료 수신기. 이미 종료된 뒤 구독해도 `true`를 본다.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// 구독자 전원에게 종료 알림 (구독자가 없어도 된다)
    pub fn trigger(&self, signal: ExitSignal) {
        info!("{signal} 수신, 종료 알림");
        self.tx.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// SIGINT 또는 SIGTERM(유닉스 외에서는 Ctrl+C)을 기다린다
pub async fn wait_for_exit_signal() -> std::io::Result<ExitSignal> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        let received = tokio::select! {
            _ = sigint.recv() => ExitSignal::Interrupt,
            _ = sigterm.recv() => ExitSignal::Terminate,
        };
        Ok(received)
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(ExitSignal::Interrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_wakes_subscribers() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        assert!(!*rx.borrow());

        shutdown.trigger(ExitSignal::Terminate);
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }

    #[test]
    fn late_subscriber_sees_shutdown() {
        let shutdown = Shutdown::default();
        shutdown.trigger(ExitSignal::Interrupt);
        assert!(*shutdown.subscribe().borrow());
    }

    #[test]
    fn signal_names() {
        assert_eq!(ExitSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(ExitSignal::Terminate.to_string(), "SIGTERM");
    }
}
