//! Visual identity of combat entities and their bosstiary classification.
use serde::{Deserialize, Serialize};

/// Frozen copy of an entity's visual appearance.
///
/// Field names follow the persisted `boosted_boss` row so a snapshot can be
/// flattened straight into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OutfitSnapshot {
    #[serde(default, rename = "looktype")]
    pub look_type: u16,
    #[serde(default, rename = "lookhead")]
    pub look_head: u8,
    #[serde(default, rename = "lookbody")]
    pub look_body: u8,
    #[serde(default, rename = "looklegs")]
    pub look_legs: u8,
    #[serde(default, rename = "lookfeet")]
    pub look_feet: u8,
    #[serde(default, rename = "lookaddons")]
    pub look_addons: u8,
    #[serde(default, rename = "lookmount")]
    pub look_mount: u16,
}

impl OutfitSnapshot {
    /// A bare creature look with no colours, addons or mount.
    #[must_use]
    pub const fn with_look_type(look_type: u16) -> Self {
        Self {
            look_type,
            look_head: 0,
            look_body: 0,
            look_legs: 0,
            look_feet: 0,
            look_addons: 0,
            look_mount: 0,
        }
    }

    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.look_type == 0 && self.look_mount == 0
    }
}

/// Bosstiary tier of a boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BosstiaryRarity {
    Bane,
    Archfoe,
    Nemesis,
}

impl BosstiaryRarity {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Bane => "bane",
            Self::Archfoe => "archfoe",
            Self::Nemesis => "nemesis",
        }
    }

    /// Numeric tier as stored by content tooling.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Bane => 0,
            Self::Archfoe => 1,
            Self::Nemesis => 2,
        }
    }

    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Bane),
            1 => Some(Self::Archfoe),
            2 => Some(Self::Nemesis),
            _ => None,
        }
    }
}

/// Full definition of a combat entity as the content layer knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub name: String,
    pub race_id: u16,
    #[serde(default)]
    pub outfit: OutfitSnapshot,
    /// Present only for entities that take part in the bosstiary.
    #[serde(default)]
    pub rarity: Option<BosstiaryRarity>,
}

impl EntityDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, race_id: u16, outfit: OutfitSnapshot) -> Self {
        Self {
            name: name.into(),
            race_id,
            outfit,
            rarity: None,
        }
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: BosstiaryRarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    #[must_use]
    pub const fn is_boss(&self) -> bool {
        self.rarity.is_some()
    }
}
