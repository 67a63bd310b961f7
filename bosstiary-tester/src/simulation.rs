//! Multi-day rotation simulation against an in-memory store.
use bosstiary_game::{
    BoostedBossService, BossRegistry, MemoryStore, MonsterCatalog, RefreshOutcome, ServiceConfig,
};
use serde::Serialize;
use std::collections::BTreeMap;

const DAYS_PER_CYCLE: usize = 31;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulatedDay {
    pub index: usize,
    pub day_of_month: u8,
    pub race_id: u16,
    pub name: String,
    pub rotated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub days: Vec<SimulatedDay>,
    pub failures: Vec<String>,
    /// Times a boss was picked, by name.
    pub picks: BTreeMap<String, usize>,
    /// Consecutive days sharing a boss.
    pub repeats: usize,
    /// Same-day refreshes that changed the boss.
    pub rerolls: usize,
    pub registered: usize,
}

impl SimulationReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty() && self.repeats == 0 && self.rerolls == 0
    }

    /// Largest share of picks any single boss received.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn max_share(&self) -> f64 {
        let total: usize = self.picks.values().sum();
        if total == 0 {
            return 0.0;
        }
        let max = self.picks.values().copied().max().unwrap_or(0);
        max as f64 / total as f64
    }
}

/// Day of month for the `index`-th simulated day, cycling 1..=31.
#[must_use]
pub fn day_of_month(index: usize) -> u8 {
    u8::try_from(index % DAYS_PER_CYCLE + 1).unwrap_or(1)
}

/// Run `days` consecutive refreshes, each checked for same-day stability.
pub fn run_simulation(
    catalog: &MonsterCatalog,
    days: usize,
    config: &ServiceConfig,
) -> SimulationReport {
    let registry = BossRegistry::from_catalog(catalog);
    let registered = registry.len();
    let service = BoostedBossService::new(registry, catalog.clone(), MemoryStore::new(), config);

    let mut report = SimulationReport {
        days: Vec::with_capacity(days),
        failures: Vec::new(),
        picks: BTreeMap::new(),
        repeats: 0,
        rerolls: 0,
        registered,
    };
    let mut previous: Option<u16> = None;

    for index in 0..days {
        let day = day_of_month(index);
        let outcome = match service.refresh_for_day(day) {
            Ok(outcome) => outcome,
            Err(err) => {
                report.failures.push(format!("day {index} ({day}): {err}"));
                continue;
            }
        };
        match service.refresh_for_day(day) {
            Ok(again) if again.record() == outcome.record() => {}
            Ok(_) => report.rerolls += 1,
            Err(err) => report.failures.push(format!("day {index} ({day}) repeat: {err}")),
        }

        let record = outcome.record();
        if previous == Some(record.race_id) {
            log::warn!("{} boosted on consecutive days", record.name);
            report.repeats += 1;
        }
        previous = Some(record.race_id);
        *report.picks.entry(record.name.clone()).or_default() += 1;
        report.days.push(SimulatedDay {
            index,
            day_of_month: day,
            race_id: record.race_id,
            name: record.name.clone(),
            rotated: matches!(outcome, RefreshOutcome::Rotated { .. }),
        });
    }

    report
}
