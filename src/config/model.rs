//! SessionConfig struct definition and default implementation.

use crate::strictness::Strictness;
use serde::{Deserialize, Serialize};

/// Configuration for a mocking session.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Default strictness of every stubbing in the session (default: strict).
    #[serde(default)]
    pub strictness: Strictness,

    /// Session name used in journal events and misuse messages.
    #[serde(default = "default_name")]
    pub name: String,

    /// Whether rendered findings include `-> at file:line:column`.
    #[serde(default = "default_true")]
    pub show_locations: bool,

    /// Whether the session keeps an event journal.
    #[serde(default = "default_true")]
    pub record_events: bool,
}

pub(crate) fn default_name() -> String {
    "mocking session".to_string()
}

pub(crate) fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            name: default_name(),
            show_locations: default_true(),
            record_events: default_true(),
        }
    }
}
