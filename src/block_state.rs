use crate::error::ChromaError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use std::str::FromStr;

pub const AIR: &str = "minecraft:air";

/// Block type and properties sent to a viewer in place of the real block.
///
/// The manager never interprets it; it only stores, compares and forwards it.
/// Properties keep insertion order, which is also the order they print in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub name: SmolStr,
    pub properties: Vec<(SmolStr, SmolStr)>,
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.properties.is_empty() {
            return Ok(());
        }
        let pairs: Vec<String> = self
            .properties
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        write!(f, "[{}]", pairs.join(","))
    }
}

impl Default for BlockState {
    fn default() -> Self {
        BlockState::air()
    }
}

impl BlockState {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        BlockState {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// The state used to reveal the real world again.
    pub fn air() -> Self {
        BlockState::new(AIR)
    }

    pub fn is_air(&self) -> bool {
        self.name == AIR
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_property(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.set_property(key, value);
        self
    }

    /// Overwrites an existing property in place, otherwise appends it.
    pub fn set_property(&mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) {
        let key = key.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.properties.push((key, value)),
        }
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }
}

impl FromStr for BlockState {
    type Err = ChromaError;

    /// Parses `namespace:id[key=value,...]`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ChromaError::InvalidBlockState {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let (name, props) = match trimmed.find('[') {
            Some(open) => {
                let rest = &trimmed[open + 1..];
                let body = rest
                    .strip_suffix(']')
                    .ok_or_else(|| invalid("missing closing ']'"))?;
                (&trimmed[..open], Some(body))
            }
            None => (trimmed, None),
        };

        if name.is_empty() {
            return Err(invalid("empty block name"));
        }

        let mut state = BlockState::new(name);
        if let Some(body) = props {
            for pair in body.split(',').filter(|p| !p.trim().is_empty()) {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| invalid("property without '='"))?;
                state.set_property(key.trim(), value.trim());
            }
        }
        Ok(state)
    }
}
