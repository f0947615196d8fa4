//! 설정 저장소.
//!
//! 단일 권위 설정을 `Arc` 스냅샷으로 보관한다. 편집은 검증을 거쳐 새
//! 스냅샷으로 통째로 교체되며, 이전 스냅샷을 들고 있는 읽기 측은 영향받지 않는다.

use crate::event_bus::{EventBus, PanelEvent};
use crate::persistence::PersistenceGateway;
use kicklock_core::error::CoreError;
use kicklock_core::models::panel_config::{
    ConfigField, FieldValue, KickStrategy, OperationalMode, PanelConfig,
};
use kicklock_core::ports::snapshot_store::SnapshotStore;
use kicklock_core::validation::{validate, Verdict};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 편집 적용 결과
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// 수락: 새 스냅샷
    Accepted(Arc<PanelConfig>),
    /// 거부: 기존 스냅샷 유지
    Rejected {
        snapshot: Arc<PanelConfig>,
        reason: String,
    },
}

impl ApplyOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ApplyOutcome::Accepted(_))
    }

    /// 적용 후 현재 스냅샷
    pub fn snapshot(&self) -> &Arc<PanelConfig> {
        match self {
            ApplyOutcome::Accepted(snapshot) | ApplyOutcome::Rejected { snapshot, .. } => {
                snapshot
            }
        }
    }
}

/// 설정 저장소
pub struct ConfigStore {
    current: Mutex<Arc<PanelConfig>>,
    gateway: PersistenceGateway,
    events: EventBus,
}

impl ConfigStore {
    pub fn new(initial: PanelConfig, gateway: PersistenceGateway, events: EventBus) -> Self {
        Self {
            current: Mutex::new(Arc::new(initial)),
            gateway,
            events,
        }
    }

    /// 저장된 스냅샷에서 시작한다. 없거나 읽을 수 없으면 기본값.
    pub fn load(store: &dyn SnapshotStore, gateway: PersistenceGateway, events: EventBus) -> Self {
        let initial = match store.load() {
            Ok(Some(config)) => {
                info!("저장된 설정 복원");
                config
            }
            Ok(None) => {
                info!("저장된 설정 없음, 기본값 사용");
                PanelConfig::default()
            }
            Err(e) => {
                warn!("저장된 설정 로드 실패, 기본값 사용: {e}");
                PanelConfig::default()
            }
        };
        Self::new(initial, gateway, events)
    }

    /// 현재 스냅샷
    pub fn snapshot(&self) -> Arc<PanelConfig> {
        self.current.lock().clone()
    }

    /// 필드 편집 적용.
    ///
    /// 중복 코드는 `Rejected`로 돌려주고 `EditRejected` 이벤트를 발행한다.
    /// 타입 불일치나 길이 초과는 `CoreError::Validation`이며 설정은 그대로다.
    /// 런타임 컨텍스트가 없는 스레드에서 불러도 된다. 저장 타이머는
    /// 게이트웨이를 만든 런타임에서 돈다.
    pub fn apply(&self, field: ConfigField, value: FieldValue) -> Result<ApplyOutcome, CoreError> {
        let outcome = {
            let mut current = self.current.lock();
            match validate(field, &value, &current) {
                Verdict::Reject(reason) => ApplyOutcome::Rejected {
                    snapshot: Arc::clone(&*current),
                    reason,
                },
                Verdict::Accept => {
                    let next = Arc::new(current.with_field(field, value)?);
                    *current = Arc::clone(&next);
                    // 예약 순서가 교체 순서와 같도록 잠금 안에서 예약
                    self.gateway.schedule(Arc::clone(&next));
                    ApplyOutcome::Accepted(next)
                }
            }
        };

        match &outcome {
            ApplyOutcome::Accepted(_) => {
                debug!("편집 수락: {field}");
                self.events.publish(PanelEvent::ConfigChanged { field });
            }
            ApplyOutcome::Rejected { reason, .. } => {
                info!("편집 거부: {field}: {reason}");
                self.events.publish(PanelEvent::EditRejected {
                    field,
                    reason: reason.clone(),
                });
            }
        }
        Ok(outcome)
    }

    /// 와이어 키로 편집 적용 (`"rc1"`, `"kickrc"`, ...)
    pub fn apply_key(&self, key: &str, value: FieldValue) -> Result<ApplyOutcome, CoreError> {
        let field: ConfigField = key.parse()?;
        self.apply(field, value)
    }

    /// 동작 모드 선택. 해제 먼저, 대상 플래그 마지막 순서로 적용한다.
    pub fn select_mode(&self, mode: OperationalMode) -> Result<Arc<PanelConfig>, CoreError> {
        self.apply_batch(mode.mutations())
    }

    /// 킥 전략 선택. 다른 전략 플래그를 모두 끈 뒤 대상 플래그를 켠다.
    pub fn select_kick_strategy(
        &self,
        strategy: KickStrategy,
    ) -> Result<Arc<PanelConfig>, CoreError> {
        self.apply_batch(strategy.mutations())
    }

    fn apply_batch(
        &self,
        batch: Vec<(ConfigField, FieldValue)>,
    ) -> Result<Arc<PanelConfig>, CoreError> {
        let mut last = self.snapshot();
        for (field, value) in batch {
            last = Arc::clone(self.apply(field, value)?.snapshot());
        }
        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRemote;
    use assert_matches::assert_matches;
    use kicklock_core::models::panel_config::DeviceProfile;
    use kicklock_core::snapshot::MemorySnapshotStore;
    use std::time::Duration;

    struct Fixture {
        store: ConfigStore,
        snapshots: Arc<MemorySnapshotStore>,
        remote: Arc<FakeRemote>,
        events: EventBus,
    }

    fn fixture_with(snapshots: MemorySnapshotStore) -> Fixture {
        let snapshots = Arc::new(snapshots);
        let remote = Arc::new(FakeRemote::new());
        let events = EventBus::default();
        let gateway = PersistenceGateway::new(
            snapshots.clone(),
            remote.clone(),
            events.clone(),
            Duration::from_millis(1_000),
        );
        let store = ConfigStore::load(snapshots.as_ref(), gateway, events.clone());
        Fixture {
            store,
            snapshots,
            remote,
            events,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MemorySnapshotStore::new())
    }

    #[tokio::test]
    async fn load_falls_back_to_defaults() {
        let fx = fixture();
        assert_eq!(*fx.store.snapshot(), PanelConfig::default());
    }

    #[tokio::test]
    async fn load_restores_snapshot() {
        let saved = PanelConfig::default()
            .with_field(ConfigField::Device, "352".into())
            .unwrap();
        let fx = fixture_with(MemorySnapshotStore::with_snapshot(saved));
        assert_eq!(fx.store.snapshot().device, DeviceProfile::Web);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_rejected_and_durable_snapshot_untouched() {
        let fx = fixture();
        let mut rx = fx.events.subscribe();

        let first = fx.store.apply(ConfigField::Code(1), "ABC1".into()).unwrap();
        assert!(first.is_accepted());
        tokio::time::sleep(Duration::from_secs(2)).await;

        let second = fx.store.apply(ConfigField::Code(2), "abc1".into()).unwrap();
        assert_matches!(second, ApplyOutcome::Rejected { ref reason, .. } if reason.contains("abc1"));
        assert_eq!(fx.store.snapshot().channels[1].code, "");
        tokio::time::sleep(Duration::from_secs(2)).await;

        // 거부된 값은 저장되지 않는다
        assert_eq!(fx.snapshots.write_count(), 1);
        assert_eq!(fx.snapshots.current().unwrap().channels[1].code, "");

        assert_matches!(rx.recv().await.unwrap(), PanelEvent::ConfigChanged { .. });
        let mut saw_rejection = false;
        while let Ok(event) = rx.try_recv() {
            if let PanelEvent::EditRejected { field, .. } = event {
                assert_eq!(field, ConfigField::Code(2));
                saw_rejection = true;
            }
        }
        assert!(saw_rejection);
    }

    #[tokio::test]
    async fn readers_keep_old_snapshot() {
        let fx = fixture();
        let before = fx.store.snapshot();
        fx.store.apply(ConfigField::Planet, "Earth".into()).unwrap();
        assert_eq!(before.planet, "");
        assert_eq!(fx.store.snapshot().planet, "Earth");
    }

    #[tokio::test]
    async fn boundary_errors_leave_config_unchanged() {
        let fx = fixture();
        let before = fx.store.snapshot();

        let err = fx
            .store
            .apply(ConfigField::Code(1), "ELEVENCHARS".into())
            .unwrap_err();
        assert_matches!(err, CoreError::Validation { .. });

        let err = fx.store.apply_key("rc9", "x".into()).unwrap_err();
        assert_matches!(err, CoreError::Validation { .. });

        let err = fx.store.apply_key("attack1", "fast".into()).unwrap_err();
        assert_matches!(err, CoreError::Validation { .. });

        assert_eq!(fx.store.snapshot(), before);
        assert!(!fx.store.gateway.has_pending());
    }

    #[tokio::test]
    async fn apply_key_routes_to_field() {
        let fx = fixture();
        let outcome = fx.store.apply_key("kickrc", "boot".into()).unwrap();
        assert_eq!(outcome.snapshot().kick_code, "boot");
        let outcome = fx.store.apply_key("waiting3", 1500.into()).unwrap();
        assert_eq!(outcome.snapshot().channels[2].waiting, 1500);
    }

    #[tokio::test]
    async fn kick_strategy_selection_is_exclusive() {
        let fx = fixture();
        let flags = [
            ConfigField::KickMode,
            ConfigField::KickAll,
            ConfigField::KickByBlacklist,
            ConfigField::DadPlus,
        ];

        for strategy in [
            KickStrategy::Everyone,
            KickStrategy::ByBlacklist,
            KickStrategy::DadPlus,
            KickStrategy::Kick,
        ] {
            let config = fx.store.select_kick_strategy(strategy).unwrap();
            let on: Vec<_> = flags
                .iter()
                .filter(|f| config.get(**f).unwrap() == FieldValue::Bool(true))
                .collect();
            assert_eq!(on, vec![&strategy.flag().unwrap()]);
        }

        let config = fx.store.select_kick_strategy(KickStrategy::None).unwrap();
        assert!(flags
            .iter()
            .all(|f| config.get(*f).unwrap() == FieldValue::Bool(false)));
    }

    #[tokio::test]
    async fn mode_selection_is_exclusive() {
        let fx = fixture();
        let config = fx.store.select_mode(OperationalMode::Sleep).unwrap();
        assert_eq!(config.get(ConfigField::Sleeping).unwrap(), FieldValue::Bool(true));
        assert_eq!(config.get(ConfigField::Exiting).unwrap(), FieldValue::Bool(false));

        let config = fx.store.select_mode(OperationalMode::Off).unwrap();
        assert_eq!(config.mode, OperationalMode::Off);
    }

    #[tokio::test(start_paused = true)]
    async fn edit_burst_writes_last_config_once() {
        let fx = fixture();
        for (i, code) in ["a", "ab", "abc", "abcd"].iter().enumerate() {
            fx.store.apply(ConfigField::Code(1), (*code).into()).unwrap();
            fx.store
                .apply(ConfigField::Attack(1), (2000 + i as i64).into())
                .unwrap();
        }
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(fx.snapshots.write_count(), 1);
        let pushed = fx.remote.configure_calls();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].channels[0].code, "abcd");
        assert_eq!(pushed[0].channels[0].attack, 2003);
        assert_eq!(pushed[0], *fx.store.snapshot());
    }

    #[tokio::test(start_paused = true)]
    async fn apply_from_plain_thread_is_persisted() {
        let fx = fixture();
        let store = Arc::new(fx.store);

        let worker = Arc::clone(&store);
        std::thread::spawn(move || worker.apply(ConfigField::Planet, "Mars".into()))
            .join()
            .unwrap()
            .unwrap();
        assert_eq!(store.snapshot().planet, "Mars");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fx.snapshots.current().unwrap().planet, "Mars");
        assert_eq!(fx.remote.configure_calls().len(), 1);
    }
}
