//! Daily boosted-boss selection.
//!
//! The decision is pure apart from the random draw: given the stored record,
//! today's day of month and the registry it either keeps the stored boss or
//! draws a new one uniformly from every registered boss except yesterday's.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::EntityLookup;
use crate::error::BoostError;
use crate::record::{BoostedBossRecord, is_valid_day};
use crate::registry::{BossRegistry, BossRegistryEntry};

/// Fewest registered bosses that still allow a rotation without repeating.
pub const MIN_CANDIDATES: usize = 2;

/// Outcome of a rotation draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPick {
    pub record: BoostedBossRecord,
    /// Index drawn into the eligible candidate list.
    pub roll: usize,
    pub candidate_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDecision {
    /// The stored record already covers today.
    Keep(BoostedBossRecord),
    Rotate(RotationPick),
}

impl RotationDecision {
    #[must_use]
    pub const fn record(&self) -> &BoostedBossRecord {
        match self {
            Self::Keep(record) => record,
            Self::Rotate(pick) => &pick.record,
        }
    }

    #[must_use]
    pub const fn is_rotation(&self) -> bool {
        matches!(self, Self::Rotate(_))
    }
}

/// Registered bosses other than `excluded`, ordered by race id.
#[must_use]
pub fn eligible_candidates(
    registry: &BossRegistry,
    excluded: Option<u16>,
) -> Vec<BossRegistryEntry> {
    registry
        .iter()
        .filter(|entry| Some(entry.race_id) != excluded)
        .collect()
}

/// Decide today's boosted boss.
///
/// # Errors
///
/// - [`BoostError::InvalidDay`] if `today` is not a day of the month.
/// - [`BoostError::InsufficientCandidates`] if fewer than two bosses are
///   registered; this is checked before the stored date.
/// - [`BoostError::StaleRegistryEntry`] if the drawn boss no longer resolves
///   through `lookup`.
pub fn decide_rotation<L, R>(
    stored: Option<&BoostedBossRecord>,
    today: u8,
    registry: &BossRegistry,
    lookup: &L,
    rng: &mut R,
) -> Result<RotationDecision, BoostError>
where
    L: EntityLookup + ?Sized,
    R: Rng + ?Sized,
{
    if !is_valid_day(today) {
        return Err(BoostError::InvalidDay(today));
    }
    if registry.len() < MIN_CANDIDATES {
        return Err(BoostError::InsufficientCandidates {
            registered: registry.len(),
        });
    }
    if let Some(record) = stored
        && record.is_for_day(today)
    {
        return Ok(RotationDecision::Keep(record.clone()));
    }

    // A stale stored race id is still excluded even if it no longer resolves.
    let excluded = stored.map(|record| record.race_id);
    let candidates = eligible_candidates(registry, excluded);
    if candidates.is_empty() {
        return Err(BoostError::InsufficientCandidates {
            registered: registry.len(),
        });
    }

    let roll = rng.gen_range(0..candidates.len());
    let chosen = &candidates[roll];
    let Some(entity) = lookup.entity_by_name(&chosen.name) else {
        return Err(BoostError::StaleRegistryEntry {
            race_id: chosen.race_id,
            name: chosen.name.clone(),
        });
    };

    Ok(RotationDecision::Rotate(RotationPick {
        record: BoostedBossRecord::snapshot(today, chosen.race_id, &entity),
        roll,
        candidate_count: candidates.len(),
    }))
}
