//! Engine configuration

use serde::{Deserialize, Serialize};

/// Tunables for [`SelectorEngine`](crate::SelectorEngine)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Parsed selector lists kept in the cache; zero disables caching
    pub cache_capacity: usize,
    /// Make `try_query` reject pseudo-classes the registry does not know
    pub report_unknown_pseudos: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 256,
            report_unknown_pseudos: true,
        }
    }
}
