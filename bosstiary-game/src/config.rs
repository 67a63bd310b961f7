//! Service configuration.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Fixed seed for the rotation draw. Unset draws from OS entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl ServiceConfig {
    #[must_use]
    pub const fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
        }
    }

    /// Parse configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_entropy() {
        let cfg = ServiceConfig::from_json("{}").unwrap();
        assert_eq!(cfg, ServiceConfig::default());
        assert!(cfg.rng_seed.is_none());
    }

    #[test]
    fn seed_is_read() {
        let cfg = ServiceConfig::from_json(r#"{"rng_seed": 1337}"#).unwrap();
        assert_eq!(cfg, ServiceConfig::seeded(1337));
    }
}
