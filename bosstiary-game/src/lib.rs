//! Bosstiary boosted-boss engine
//!
//! Platform-agnostic daily rotation of the boosted boss: the boss registry,
//! the exclusion-aware draw, outfit snapshots and the persisted record.
//! Content loading and storage sit behind the traits below.

pub mod catalog;
pub mod config;
pub mod error;
pub mod outfit;
pub mod record;
pub mod registry;
pub mod rotation;
pub mod service;
pub mod store;

use std::sync::Arc;

// Re-export commonly used types
pub use catalog::MonsterCatalog;
pub use config::ServiceConfig;
pub use error::{BoostError, StoreError};
pub use outfit::{BosstiaryRarity, EntityDefinition, OutfitSnapshot};
pub use record::BoostedBossRecord;
pub use registry::{BossRegistry, BossRegistryEntry};
pub use rotation::{
    MIN_CANDIDATES, RotationDecision, RotationPick, decide_rotation, eligible_candidates,
};
pub use service::{BoostedBossService, RefreshOutcome};
pub use store::{JsonFileStore, MemoryStore};

/// Trait for resolving entity definitions by name
/// Content loaders provide this
pub trait EntityLookup {
    /// Full definition of the entity called `name`, if the content layer
    /// still knows it.
    fn entity_by_name(&self, name: &str) -> Option<EntityDefinition>;
}

/// Trait for reading and writing the singleton boosted-boss row
/// Storage backends provide this
pub trait BoostedBossStore {
    /// Load the stored record
    ///
    /// `Ok(None)` means no record exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read. That is distinct from an
    /// empty store.
    fn load(&self) -> Result<Option<BoostedBossRecord>, StoreError>;

    /// Insert or overwrite the stored record
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save(&self, record: &BoostedBossRecord) -> Result<(), StoreError>;
}

impl<T: EntityLookup + ?Sized> EntityLookup for Arc<T> {
    fn entity_by_name(&self, name: &str) -> Option<EntityDefinition> {
        self.as_ref().entity_by_name(name)
    }
}

impl<T: BoostedBossStore + ?Sized> BoostedBossStore for Arc<T> {
    fn load(&self) -> Result<Option<BoostedBossRecord>, StoreError> {
        self.as_ref().load()
    }

    fn save(&self, record: &BoostedBossRecord) -> Result<(), StoreError> {
        self.as_ref().save(record)
    }
}
