//! Content-backed entity definitions.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::EntityLookup;
use crate::outfit::EntityDefinition;

const DEFAULT_MONSTER_DATA: &str = include_str!("../data/monsters.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    monsters: Vec<EntityDefinition>,
}

/// All entity definitions known to the content layer, keyed by name.
///
/// Names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonsterCatalog {
    by_name: HashMap<String, EntityDefinition>,
}

impl MonsterCatalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load definitions from a JSON document of the form
    /// `{ "monsters": [ ... ] }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into entity definitions.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::from_definitions(file.monsters))
    }

    /// Build a catalog from definitions. Later duplicates of a name replace
    /// earlier ones, as reloading a monster file would.
    #[must_use]
    pub fn from_definitions(definitions: impl IntoIterator<Item = EntityDefinition>) -> Self {
        let mut catalog = Self::empty();
        for definition in definitions {
            catalog.insert(definition);
        }
        catalog
    }

    /// Catalog shipped with the crate.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json_or_empty(DEFAULT_MONSTER_DATA)
    }

    fn from_json_or_empty(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|err| {
            log::error!("Bundled monster catalog is invalid, no bosses will be available: {err}");
            Self::empty()
        })
    }

    pub fn insert(&mut self, definition: EntityDefinition) -> Option<EntityDefinition> {
        self.by_name.insert(name_key(&definition.name), definition)
    }

    pub fn remove(&mut self, name: &str) -> Option<EntityDefinition> {
        self.by_name.remove(&name_key(name))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EntityDefinition> {
        self.by_name.get(&name_key(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Definitions that take part in the bosstiary, ordered by race id.
    #[must_use]
    pub fn bosses(&self) -> Vec<&EntityDefinition> {
        let mut bosses: Vec<&EntityDefinition> =
            self.by_name.values().filter(|def| def.is_boss()).collect();
        bosses.sort_by_key(|def| def.race_id);
        bosses
    }
}

impl EntityLookup for MonsterCatalog {
    fn entity_by_name(&self, name: &str) -> Option<EntityDefinition> {
        self.get(name).cloned()
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
