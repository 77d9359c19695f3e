//! Session configuration.

use galaxy_eval::Color;
use galaxy_types::Value;
use serde::{Deserialize, Serialize};

use crate::error::VmResult;

/// How a [`Session`](crate::Session) drives its protocol.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the protocol definition.
    pub protocol: String,
    /// State passed to the first interaction.
    pub initial_state: Value,
    /// RGB color of the first draw of every round.
    pub base_color: [u8; 3],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            protocol: "galaxy".to_string(),
            initial_state: Value::Nil,
            base_color: [89, 89, 89],
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> VmResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// A configuration driving `protocol` with the other fields defaulted.
    pub fn for_protocol(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            ..Self::default()
        }
    }

    pub fn base_color(&self) -> Color {
        let [r, g, b] = self.base_color;
        Color::rgb(r, g, b)
    }
}
