//! Registry of bosses eligible for the daily boost.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::EntityLookup;
use crate::catalog::MonsterCatalog;
use crate::outfit::EntityDefinition;

/// A registered boss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossRegistryEntry {
    pub race_id: u16,
    pub name: String,
}

/// Race id → canonical boss name.
///
/// Entries are only ever added, and the first registration of a race id wins.
/// Iteration is ordered by race id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossRegistry {
    bosses: BTreeMap<u16, String>,
}

impl BossRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every catalog definition that carries a bosstiary rarity.
    #[must_use]
    pub fn from_catalog(catalog: &MonsterCatalog) -> Self {
        let mut registry = Self::new();
        for boss in catalog.bosses() {
            registry.register(boss.race_id, boss.name.clone());
        }
        registry
    }

    /// Insert `race_id` → `name` unless the race id is already registered.
    ///
    /// Returns `true` when the entry was inserted.
    pub fn register(&mut self, race_id: u16, name: impl Into<String>) -> bool {
        if self.bosses.contains_key(&race_id) {
            return false;
        }
        self.bosses.insert(race_id, name.into());
        true
    }

    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<u16, String> {
        &self.bosses
    }

    pub fn iter(&self) -> impl Iterator<Item = BossRegistryEntry> + '_ {
        self.bosses.iter().map(|(race_id, name)| BossRegistryEntry {
            race_id: *race_id,
            name: name.clone(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bosses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bosses.is_empty()
    }

    #[must_use]
    pub fn contains(&self, race_id: u16) -> bool {
        self.bosses.contains_key(&race_id)
    }

    #[must_use]
    pub fn name_of(&self, race_id: u16) -> Option<&str> {
        self.bosses.get(&race_id).map(String::as_str)
    }

    /// Resolve the full definition of a registered boss through `lookup`.
    ///
    /// Unregistered race ids and registered names the lookup no longer knows
    /// both come back as `None`; the latter is logged as content drift.
    pub fn resolve_entity<L>(&self, race_id: u16, lookup: &L) -> Option<EntityDefinition>
    where
        L: EntityLookup + ?Sized,
    {
        let name = self.name_of(race_id)?;
        let definition = lookup.entity_by_name(name);
        if definition.is_none() {
            log::warn!("boss {name} (race {race_id}) is registered but has no entity definition");
        }
        definition
    }
}
