//! The persisted boosted-boss row.
use serde::{Deserialize, Serialize};

use crate::outfit::{EntityDefinition, OutfitSnapshot};

/// First and last valid day-of-month values.
pub const FIRST_DAY: u8 = 1;
pub const LAST_DAY: u8 = 31;

/// Singleton record describing the boss boosted on `date`.
///
/// `date` is a day of the month. Two moments sharing a day number in
/// different months compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoostedBossRecord {
    pub date: u8,
    #[serde(rename = "raceid")]
    pub race_id: u16,
    #[serde(rename = "boostname")]
    pub name: String,
    #[serde(flatten)]
    pub outfit: OutfitSnapshot,
}

impl BoostedBossRecord {
    /// Snapshot `entity` as the boss for `date`.
    #[must_use]
    pub fn snapshot(date: u8, race_id: u16, entity: &EntityDefinition) -> Self {
        Self {
            date,
            race_id,
            name: entity.name.clone(),
            outfit: entity.outfit,
        }
    }

    /// Whether the record already covers `today`.
    #[must_use]
    pub const fn is_for_day(&self, today: u8) -> bool {
        self.date == today
    }

    /// Pre-seeded rows carry race id 0 until the first rotation.
    #[must_use]
    pub const fn has_boss(&self) -> bool {
        self.race_id != 0
    }
}

#[must_use]
pub const fn is_valid_day(day: u8) -> bool {
    day >= FIRST_DAY && day <= LAST_DAY
}
