use crate::block_state::BlockState;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Tunables for a [`crate::BlockManager`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerSettings {
    /// Block announced at every cached position when overrides are torn down.
    pub reset_block: BlockState,
    /// Push the full override set to a spectator as soon as it is added.
    pub sync_on_spectator_join: bool,
    /// Skip the transport call entirely when a batch has no entries.
    pub skip_empty_batches: bool,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        ManagerSettings {
            reset_block: BlockState::air(),
            sync_on_spectator_join: true,
            skip_empty_batches: true,
        }
    }
}

impl ManagerSettings {
    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
