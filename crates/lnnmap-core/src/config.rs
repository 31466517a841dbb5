//! Mapper configuration (ambient stack, SPEC_FULL.md §2.1).

use serde::{Deserialize, Serialize};

/// Configuration for one mapping pass.
///
/// Defaults mirror the CLI's own defaults (§6): a checkpoint offset of 3 and
/// a checkpoint look-ahead of 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Depth-band width `k` used by checkpoint insertion (§4.2). Must be ≥ 1.
    pub checkpoint_offset: usize,
    /// Number of checkpoints' worth of gates considered by the search
    /// heuristic (§4.3). Must be ≥ 1.
    pub checkpoint_look_ahead: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            checkpoint_offset: 3,
            checkpoint_look_ahead: 2,
        }
    }
}

impl MapperConfig {
    pub fn new(checkpoint_offset: usize, checkpoint_look_ahead: usize) -> Self {
        Self {
            checkpoint_offset,
            checkpoint_look_ahead,
        }
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Serializes configuration to a JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let config = MapperConfig::default();
        assert_eq!(config.checkpoint_offset, 3);
        assert_eq!(config.checkpoint_look_ahead, 2);
    }

    #[test]
    fn json_roundtrip() {
        let config = MapperConfig::new(4, 3);
        let json = config.to_json().unwrap();
        let parsed = MapperConfig::from_json(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
