//! Adapter configuration

use serde::{Deserialize, Serialize};

const fn default_max_code_size() -> usize {
    3 * 1024 * 1024
}

const fn default_query_gas_limit() -> u64 {
    10_000_000
}

const fn default_querier_flat() -> u64 {
    100
}

/// Limits and allow-lists for verification code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WasmConfig {
    /// Stargate paths the code may query; anything else is rejected
    #[serde(default)]
    pub stargate_accepted_paths: Vec<String>,
    /// Maximum size in bytes of stored code
    #[serde(default = "default_max_code_size")]
    pub max_code_size: usize,
    /// Gas available to a single invocation
    #[serde(default = "default_query_gas_limit")]
    pub query_gas_limit: u64,
    /// Gas charged for each query the code issues
    #[serde(default = "default_querier_flat")]
    pub querier_flat: u64,
}

impl Default for WasmConfig {
    fn default() -> Self {
        Self {
            stargate_accepted_paths: Vec::new(),
            max_code_size: default_max_code_size(),
            query_gas_limit: default_query_gas_limit(),
            querier_flat: default_querier_flat(),
        }
    }
}

impl WasmConfig {
    /// Whether `path` is on the accept list.
    #[must_use]
    pub fn accepts(&self, path: &str) -> bool {
        self.stargate_accepted_paths.iter().any(|accepted| accepted == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deny_everything() {
        let config = WasmConfig::default();
        assert!(!config.accepts("/ibc.core.client.v1.Query/ClientStatus"));
        assert_eq!(config.max_code_size, 3 * 1024 * 1024);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: WasmConfig =
            serde_json::from_str(r#"{"stargate_accepted_paths":["/a.b/C"]}"#).unwrap();
        assert!(config.accepts("/a.b/C"));
        assert_eq!(config.querier_flat, 100);
        assert_eq!(config.query_gas_limit, 10_000_000);
    }
}
