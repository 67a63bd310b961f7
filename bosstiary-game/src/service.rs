//! Orchestration of the daily boosted-boss refresh.
use std::error::Error as _;
use std::sync::{Mutex, PoisonError, RwLock};

use chrono::{Datelike, Local};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::error::BoostError;
use crate::outfit::EntityDefinition;
use crate::record::BoostedBossRecord;
use crate::registry::BossRegistry;
use crate::rotation::{RotationDecision, decide_rotation};
use crate::{BoostedBossStore, EntityLookup};

/// What a successful refresh did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// The stored boss already covered today and was republished.
    Kept(BoostedBossRecord),
    /// A new boss was drawn, saved and published.
    Rotated {
        previous_race_id: Option<u16>,
        record: BoostedBossRecord,
    },
}

impl RefreshOutcome {
    #[must_use]
    pub const fn record(&self) -> &BoostedBossRecord {
        match self {
            Self::Kept(record) | Self::Rotated { record, .. } => record,
        }
    }

    #[must_use]
    pub const fn rotated(&self) -> bool {
        matches!(self, Self::Rotated { .. })
    }
}

/// Owns the boss registry and the currently published boosted boss.
///
/// Refreshes are serialized by one lock that also owns the rotation RNG, so
/// the load, decide and save steps never interleave. The published record is
/// swapped as a whole, and readers see either the old or the new boss.
pub struct BoostedBossService<L, S>
where
    L: EntityLookup,
    S: BoostedBossStore,
{
    lookup: L,
    store: S,
    registry: RwLock<BossRegistry>,
    published: RwLock<Option<BoostedBossRecord>>,
    refresh_lock: Mutex<ChaCha20Rng>,
}

impl<L, S> BoostedBossService<L, S>
where
    L: EntityLookup,
    S: BoostedBossStore,
{
    pub fn new(registry: BossRegistry, lookup: L, store: S, config: &ServiceConfig) -> Self {
        let rng = config
            .rng_seed
            .map_or_else(ChaCha20Rng::from_entropy, ChaCha20Rng::seed_from_u64);
        Self {
            lookup,
            store,
            registry: RwLock::new(registry),
            published: RwLock::new(None),
            refresh_lock: Mutex::new(rng),
        }
    }

    /// Refresh using the local calendar's day of month.
    ///
    /// # Errors
    ///
    /// See [`Self::refresh_for_day`].
    pub fn refresh_for_today(&self) -> Result<RefreshOutcome, BoostError> {
        self.refresh_for_day(day_of_month(&Local::now()))
    }

    /// Resolve the boosted boss for `today`, rotating and persisting when the
    /// stored record belongs to another day.
    ///
    /// Calling this again on the same day republishes the stored boss without
    /// writing. On any error the previously published boss stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`BoostError::StoreUnavailable`] if the record cannot be loaded
    /// or saved, and the rotation errors of [`decide_rotation`].
    pub fn refresh_for_day(&self, today: u8) -> Result<RefreshOutcome, BoostError> {
        let mut rng = self
            .refresh_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let result = self.refresh_locked(today, &mut rng);
        match &result {
            Ok(RefreshOutcome::Kept(record)) => {
                log::info!("Boosted boss: {} (race {})", record.name, record.race_id);
            }
            Ok(RefreshOutcome::Rotated {
                previous_race_id,
                record,
            }) => {
                log::info!(
                    "Boosted boss rotated to {} (race {}) for day {today}, previous race {:?}",
                    record.name,
                    record.race_id,
                    previous_race_id
                );
            }
            Err(err) => log_refresh_failure(today, err),
        }
        result
    }

    fn refresh_locked(
        &self,
        today: u8,
        rng: &mut ChaCha20Rng,
    ) -> Result<RefreshOutcome, BoostError> {
        let stored = self.store.load()?;
        let registry = self.registry();
        let decision = decide_rotation(stored.as_ref(), today, &registry, &self.lookup, rng)?;

        match decision {
            RotationDecision::Keep(record) => {
                self.publish(record.clone());
                Ok(RefreshOutcome::Kept(record))
            }
            RotationDecision::Rotate(pick) => {
                self.store.save(&pick.record).inspect_err(|err| {
                    log::error!(
                        "Failed to persist boosted boss {} (race {}) for day {today}: {err}",
                        pick.record.name,
                        pick.record.race_id
                    );
                })?;
                self.publish(pick.record.clone());
                Ok(RefreshOutcome::Rotated {
                    previous_race_id: stored
                        .filter(BoostedBossRecord::has_boss)
                        .map(|record| record.race_id),
                    record: pick.record,
                })
            }
        }
    }

    fn publish(&self, record: BoostedBossRecord) {
        *self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(record);
    }

    /// Name of the published boosted boss, empty until the first refresh.
    #[must_use]
    pub fn boosted_boss_name(&self) -> String {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|record| record.name.clone())
            .unwrap_or_default()
    }

    /// Full published snapshot, including the outfit shown to clients.
    #[must_use]
    pub fn boosted_boss(&self) -> Option<BoostedBossRecord> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_boosted(&self, race_id: u16) -> bool {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|record| record.has_boss() && record.race_id == race_id)
    }

    /// Live definition of a registered boss, for reward and combat systems.
    #[must_use]
    pub fn monster_definition_for_race_id(&self, race_id: u16) -> Option<EntityDefinition> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .resolve_entity(race_id, &self.lookup)
    }

    /// Register a boss. The first registration of a race id wins.
    pub fn register_boss(&self, race_id: u16, name: impl Into<String>) -> bool {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(race_id, name)
    }

    /// Snapshot of the registry.
    #[must_use]
    pub fn registry(&self) -> BossRegistry {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub const fn lookup(&self) -> &L {
        &self.lookup
    }

    pub const fn store(&self) -> &S {
        &self.store
    }
}

/// Day of month as stored in the record. An unrepresentable day maps to 0,
/// which [`BoostedBossService::refresh_for_day`] rejects as invalid.
fn day_of_month(date: &impl Datelike) -> u8 {
    u8::try_from(date.day()).unwrap_or(0)
}

fn log_refresh_failure(today: u8, err: &BoostError) {
    match err {
        BoostError::StoreUnavailable(store) => {
            let cause = store
                .source()
                .map(ToString::to_string)
                .unwrap_or_default();
            log::error!("Boosted boss refresh for day {today} aborted: {store} {cause}");
        }
        BoostError::StaleRegistryEntry { race_id, name } => {
            log::error!(
                "Boosted boss refresh for day {today} aborted: boss {name} (race {race_id}) has no entity definition"
            );
        }
        BoostError::InsufficientCandidates { .. } | BoostError::InvalidDay(_) => {
            log::error!("Boosted boss refresh for day {today} aborted: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MonsterCatalog;
    use crate::error::StoreError;
    use crate::outfit::OutfitSnapshot;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Once};

    static LOG_LINES: Mutex<Vec<String>> = Mutex::new(Vec::new());

    struct CapturingLogger;

    impl log::Log for CapturingLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            LOG_LINES
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(format!("{} {}", record.level(), record.args()));
        }

        fn flush(&self) {}
    }

    fn captured_logs() -> Vec<String> {
        LOG_LINES
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn capture_logs() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            log::set_logger(&CapturingLogger).unwrap();
            log::set_max_level(log::LevelFilter::Trace);
        });
    }

    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        saves: AtomicUsize,
        fail_loads: AtomicBool,
        fail_saves: AtomicBool,
    }

    impl CountingStore {
        fn seeded(record: BoostedBossRecord) -> Self {
            Self {
                inner: MemoryStore::seeded(record),
                ..Self::default()
            }
        }

        fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    impl BoostedBossStore for CountingStore {
        fn load(&self) -> Result<Option<BoostedBossRecord>, StoreError> {
            if self.fail_loads.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable(String::from("connection refused")));
            }
            self.inner.load()
        }

        fn save(&self, record: &BoostedBossRecord) -> Result<(), StoreError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable(String::from("read only")));
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(record)
        }
    }

    fn registry() -> BossRegistry {
        let mut registry = BossRegistry::new();
        registry.register(101, "Ferumbras");
        registry.register(102, "Morshabaal");
        registry.register(103, "Ghazbaran");
        registry
    }

    fn stored(date: u8, race_id: u16, name: &str) -> BoostedBossRecord {
        BoostedBossRecord {
            date,
            race_id,
            name: name.to_string(),
            outfit: OutfitSnapshot::with_look_type(229),
        }
    }

    fn service(
        registry: BossRegistry,
        store: Arc<CountingStore>,
    ) -> BoostedBossService<MonsterCatalog, Arc<CountingStore>> {
        BoostedBossService::new(
            registry,
            MonsterCatalog::load_from_static(),
            store,
            &ServiceConfig::seeded(42),
        )
    }

    #[test]
    fn nothing_published_before_first_refresh() {
        let svc = service(registry(), Arc::new(CountingStore::default()));
        assert_eq!(svc.boosted_boss_name(), "");
        assert!(svc.boosted_boss().is_none());
        assert!(!svc.is_boosted(101));
    }

    #[test]
    fn rotates_on_new_day_and_persists() {
        let store = Arc::new(CountingStore::seeded(stored(5, 101, "Ferumbras")));
        let svc = service(registry(), Arc::clone(&store));

        let outcome = svc.refresh_for_day(6).unwrap();
        assert!(outcome.rotated());
        let record = outcome.record().clone();
        assert!(matches!(record.race_id, 102 | 103));
        assert_eq!(record.date, 6);
        assert_eq!(
            outcome,
            RefreshOutcome::Rotated {
                previous_race_id: Some(101),
                record: record.clone(),
            }
        );
        assert_eq!(store.inner.snapshot(), Some(record.clone()));
        assert_eq!(svc.boosted_boss_name(), record.name);
        assert!(svc.is_boosted(record.race_id));
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn same_day_republishes_stored_boss() {
        let store = Arc::new(CountingStore::seeded(stored(5, 101, "Ferumbras")));
        let svc = service(registry(), Arc::clone(&store));

        let outcome = svc.refresh_for_day(5).unwrap();
        assert_eq!(outcome, RefreshOutcome::Kept(stored(5, 101, "Ferumbras")));
        assert_eq!(svc.boosted_boss_name(), "Ferumbras");
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn refresh_is_idempotent_within_a_day() {
        let store = Arc::new(CountingStore::default());
        let svc = service(registry(), Arc::clone(&store));

        let first = svc.refresh_for_day(12).unwrap();
        let published = svc.boosted_boss();
        let second = svc.refresh_for_day(12).unwrap();

        assert!(first.rotated());
        assert!(!second.rotated());
        assert_eq!(first.record(), second.record());
        assert_eq!(svc.boosted_boss(), published);
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn first_rotation_has_no_previous_boss() {
        let store = Arc::new(CountingStore::seeded(BoostedBossRecord::default()));
        let svc = service(registry(), store);
        let outcome = svc.refresh_for_day(1).unwrap();
        assert!(matches!(
            outcome,
            RefreshOutcome::Rotated {
                previous_race_id: None,
                ..
            }
        ));
    }

    #[test]
    fn single_boss_registry_keeps_prior_state() {
        let mut registry = BossRegistry::new();
        registry.register(101, "Ferumbras");
        let store = Arc::new(CountingStore::default());
        let svc = service(registry, Arc::clone(&store));

        let err = svc.refresh_for_day(3).unwrap_err();
        assert!(matches!(
            err,
            BoostError::InsufficientCandidates { registered: 1 }
        ));
        assert_eq!(svc.boosted_boss_name(), "");
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn load_failure_is_not_treated_as_first_run() {
        let store = Arc::new(CountingStore::seeded(stored(5, 101, "Ferumbras")));
        let svc = service(registry(), Arc::clone(&store));
        svc.refresh_for_day(5).unwrap();

        store.fail_loads.store(true, Ordering::SeqCst);
        let err = svc.refresh_for_day(6).unwrap_err();
        assert!(matches!(err, BoostError::StoreUnavailable(_)));
        assert_eq!(svc.boosted_boss_name(), "Ferumbras");
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn save_failure_keeps_published_boss() {
        capture_logs();
        let store = Arc::new(CountingStore::seeded(stored(5, 101, "Ferumbras")));
        let svc = service(registry(), Arc::clone(&store));
        svc.refresh_for_day(5).unwrap();

        store.fail_saves.store(true, Ordering::SeqCst);
        let err = svc.refresh_for_day(6).unwrap_err();
        assert!(matches!(err, BoostError::StoreUnavailable(_)));
        assert_eq!(svc.boosted_boss_name(), "Ferumbras");
        assert_eq!(store.inner.snapshot(), Some(stored(5, 101, "Ferumbras")));
        assert_eq!(store.saves(), 0);

        // The drawn boss is named in the log even though it was never saved.
        let unsaved = captured_logs()
            .into_iter()
            .find(|line| line.contains("Failed to persist boosted boss") && line.contains("day 6"))
            .expect("save failure logged");
        assert!(unsaved.starts_with("ERROR"));
        assert!(
            unsaved.contains("Morshabaal (race 102)") || unsaved.contains("Ghazbaran (race 103)"),
            "{unsaved}"
        );
        assert!(unsaved.contains("read only"));
    }

    #[test]
    fn stale_pick_leaves_record_untouched() {
        let mut registry = BossRegistry::new();
        registry.register(101, "Ferumbras");
        registry.register(199, "Deleted Boss");
        let store = Arc::new(CountingStore::seeded(stored(5, 101, "Ferumbras")));
        let svc = service(registry, Arc::clone(&store));

        let err = svc.refresh_for_day(6).unwrap_err();
        assert_eq!(err.race_id(), Some(199));
        assert_eq!(store.inner.snapshot(), Some(stored(5, 101, "Ferumbras")));
        assert_eq!(store.saves(), 0);
        assert_eq!(svc.boosted_boss_name(), "");
    }

    #[test]
    fn monster_definitions_resolve_through_registry() {
        let svc = service(registry(), Arc::new(CountingStore::default()));
        let ferumbras = svc.monster_definition_for_race_id(101).expect("registered");
        assert_eq!(ferumbras.name, "Ferumbras");
        assert_eq!(ferumbras.outfit.look_type, 229);
        assert!(svc.monster_definition_for_race_id(4_000).is_none());

        assert!(svc.register_boss(4_000, "Nobody Knows Me"));
        assert!(svc.monster_definition_for_race_id(4_000).is_none());
        assert!(!svc.register_boss(101, "Impostor"));
        assert_eq!(svc.registry().name_of(101), Some("Ferumbras"));
    }

    #[test]
    fn concurrent_refreshes_write_once() {
        let store = Arc::new(CountingStore::seeded(stored(5, 101, "Ferumbras")));
        let svc = service(registry(), Arc::clone(&store));

        let records: Vec<BoostedBossRecord> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| svc.refresh_for_day(6).unwrap().record().clone()))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        assert_eq!(store.saves(), 1);
        assert!(records.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(svc.boosted_boss(), records.first().cloned());
    }

    #[test]
    fn seeded_services_draw_identically() {
        let draw = || {
            let svc = service(registry(), Arc::new(CountingStore::default()));
            (1..=10)
                .map(|day| svc.refresh_for_day(day).unwrap().record().race_id)
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(), draw());
    }

    #[test]
    fn refresh_for_today_uses_a_valid_day() {
        let svc = service(registry(), Arc::new(CountingStore::default()));
        let outcome = svc.refresh_for_today().unwrap();
        assert!((1..=31).contains(&outcome.record().date));
    }

    #[test]
    fn day_of_month_comes_from_the_calendar_date() {
        let leap_day = NaiveDate::from_ymd_opt(2028, 2, 29).unwrap();
        assert_eq!(day_of_month(&leap_day), 29);
        let first = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        assert_eq!(day_of_month(&first), 1);
    }
}
