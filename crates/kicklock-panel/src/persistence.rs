//! 디바운스 영속화 게이트웨이.
//!
//! 편집이 몰리면 마지막 설정만 기록한다. 대기 창이 끝나면 로컬 스냅샷을
//! 동기로 쓰고, 백엔드 `configure` 전송은 분리된 태스크로 보낸다.
//! 전송끼리는 순서를 맞추지 않는다 (백엔드는 `configure`를 전체 교체로 처리).

use crate::event_bus::{EventBus, PanelEvent};
use kicklock_core::models::panel_config::PanelConfig;
use kicklock_core::ports::remote_client::RemoteClient;
use kicklock_core::ports::snapshot_store::SnapshotStore;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// 대기 중인 쓰기
struct PendingWrite {
    seq: u64,
    config: Arc<PanelConfig>,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct PendingSlot {
    seq: u64,
    write: Option<PendingWrite>,
}

struct GatewayInner {
    store: Arc<dyn SnapshotStore>,
    remote: Arc<dyn RemoteClient>,
    events: EventBus,
    window: Duration,
    /// 타이머와 전송 태스크가 도는 런타임
    runtime: Handle,
    pending: Mutex<PendingSlot>,
}

/// 디바운스 영속화 게이트웨이. 인스턴스마다 대기 타이머를 하나씩 소유한다.
#[derive(Clone)]
pub struct PersistenceGateway {
    inner: Arc<GatewayInner>,
}

impl PersistenceGateway {
    /// 현재 Tokio 런타임에 묶인 게이트웨이를 만든다.
    ///
    /// 런타임 밖에서 호출하면 panic. 이후 `schedule`은 어느 스레드에서든
    /// 부를 수 있고, 타이머는 생성 시점의 런타임에서 돈다.
    pub fn new(
        store: Arc<dyn SnapshotStore>,
        remote: Arc<dyn RemoteClient>,
        events: EventBus,
        window: Duration,
    ) -> Self {
        Self::with_runtime(store, remote, events, window, Handle::current())
    }

    /// 지정한 런타임에서 타이머를 돌리는 게이트웨이
    pub fn with_runtime(
        store: Arc<dyn SnapshotStore>,
        remote: Arc<dyn RemoteClient>,
        events: EventBus,
        window: Duration,
        runtime: Handle,
    ) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                store,
                remote,
                events,
                window,
                runtime,
                pending: Mutex::new(PendingSlot::default()),
            }),
        }
    }

    /// 스냅샷 저장소
    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.inner.store
    }

    /// 쓰기 예약. 대기 중인 쓰기가 있으면 취소하고 새 설정으로 대체한다.
    ///
    /// 호출자를 막지 않는다. 런타임 컨텍스트가 없는 스레드에서도 안전하다.
    pub fn schedule(&self, config: Arc<PanelConfig>) {
        let mut pending = self.inner.pending.lock();
        if let Some(prev) = pending.write.take() {
            prev.timer.abort();
            debug!("대기 중인 쓰기 대체 (seq={})", prev.seq);
        }

        pending.seq += 1;
        let seq = pending.seq;
        let inner = Arc::clone(&self.inner);
        let timer = self.inner.runtime.spawn(async move {
            tokio::time::sleep(inner.window).await;
            if let Some(config) = inner.take_pending(seq) {
                inner.write_local(&config);
                inner.spawn_push(config);
            }
        });

        pending.write = Some(PendingWrite { seq, config, timer });
    }

    /// 대기 중인 쓰기가 있는지
    pub fn has_pending(&self) -> bool {
        self.inner.pending.lock().write.is_some()
    }

    /// 대기 중인 쓰기를 즉시 수행하고 백엔드 전송까지 기다린다.
    ///
    /// 종료 직전 마지막 편집을 잃지 않기 위해 사용한다. 대기 중인 쓰기가
    /// 없었으면 `false`.
    pub async fn flush(&self) -> bool {
        let write = self.inner.pending.lock().write.take();
        let Some(write) = write else {
            return false;
        };
        write.timer.abort();

        debug!("대기 중인 쓰기 즉시 수행 (seq={})", write.seq);
        self.inner.write_local(&write.config);
        self.inner.push(&write.config).await;
        true
    }
}

impl GatewayInner {
    fn take_pending(&self, seq: u64) -> Option<Arc<PanelConfig>> {
        let mut pending = self.pending.lock();
        if pending.write.as_ref().is_some_and(|w| w.seq == seq) {
            pending.write.take().map(|w| w.config)
        } else {
            None
        }
    }

    fn write_local(&self, config: &PanelConfig) {
        match self.store.save(config) {
            Ok(()) => {
                debug!("설정 스냅샷 저장");
                self.events.publish(PanelEvent::ConfigPersisted);
            }
            Err(e) => {
                warn!("설정 스냅샷 저장 실패: {e}");
                self.events.publish(PanelEvent::PersistenceFailed(e.to_string()));
            }
        }
    }

    fn spawn_push(&self, config: Arc<PanelConfig>) {
        let remote = Arc::clone(&self.remote);
        let events = self.events.clone();
        self.runtime.spawn(async move {
            push_config(remote.as_ref(), &events, &config).await;
        });
    }

    async fn push(&self, config: &PanelConfig) {
        push_config(self.remote.as_ref(), &self.events, config).await;
    }
}

async fn push_config(remote: &dyn RemoteClient, events: &EventBus, config: &PanelConfig) {
    match remote.configure(config).await {
        Ok(_) => debug!("백엔드 설정 전송 완료"),
        Err(e) => {
            warn!("백엔드 설정 전송 실패: {e}");
            events.publish(PanelEvent::RemotePushFailed(e.to_string()));
        }
    }
}
