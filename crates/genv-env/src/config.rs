use serde::{Deserialize, Serialize};

use crate::error::{EnvResult, EnvironmentError};

/// Which of several parameters bound to the same archetype is reported when
/// that archetype is mapped out of context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AliasPolicy {
    /// The parameter with the smallest `(depth, index)`.
    #[default]
    LowestIndex,
    /// The parameter with the largest `(depth, index)`.
    HighestIndex,
}

/// Settings shared by every environment of a compilation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EnvironmentConfig {
    /// Preferred parameter among aliases of one archetype.
    pub alias_policy: AliasPolicy,
    /// Check at construction that every dependent type rooted in an
    /// archetype-bound parameter has an archetype, and that the archetype
    /// survives a trip out of context and back.
    pub verify_round_trip: bool,
}

impl EnvironmentConfig {
    /// Parses a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> EnvResult<Self> {
        toml::from_str(source).map_err(|err| EnvironmentError::Config { message: err.to_string() })
    }
}
