//! Defines the keeper configuration.
use std::{fs, path::Path};

use ibc_client_host_commitment::ProofCost;
use ibc_client_host_wasm::WasmConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allows every client type.
pub const ALLOW_ALL_CLIENTS: &str = "*";

fn default_commitment_prefix() -> String {
    "ibc".to_string()
}

fn default_allowed_clients() -> Vec<String> {
    vec!["attestor".to_string(), "08-wasm".to_string()]
}

const fn default_max_code_size() -> usize {
    3 * 1024 * 1024
}

const fn default_query_gas_limit() -> u64 {
    10_000_000
}

const fn default_querier_flat() -> u64 {
    100
}

/// The top level configuration for the keeper.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeeperConfig {
    /// Store key of the counterparty commitment prefix
    #[serde(default = "default_commitment_prefix")]
    pub commitment_prefix: String,
    /// Client types that may be created, `*` allows all
    #[serde(default = "default_allowed_clients")]
    pub allowed_clients: Vec<String>,
    /// Gas pricing.
    #[serde(default)]
    pub gas: GasConfig,
    /// Verification code limits.
    #[serde(default)]
    pub wasm: WasmSection,
}

/// Gas pricing of verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasConfig {
    /// Cost of a proof verification
    #[serde(flatten)]
    pub proof: ProofCost,
    /// Gas available to a single verification code invocation
    #[serde(default = "default_query_gas_limit")]
    pub query_gas_limit: u64,
    /// Gas charged per query issued by verification code
    #[serde(default = "default_querier_flat")]
    pub querier_flat: u64,
}

/// Verification code limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasmSection {
    /// Stargate paths verification code may query
    #[serde(default)]
    pub stargate_accepted_paths: Vec<String>,
    /// Maximum stored code size in bytes
    #[serde(default = "default_max_code_size")]
    pub max_code_size: usize,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            commitment_prefix: default_commitment_prefix(),
            allowed_clients: default_allowed_clients(),
            gas: GasConfig::default(),
            wasm: WasmSection::default(),
        }
    }
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            proof: ProofCost::default(),
            query_gas_limit: default_query_gas_limit(),
            querier_flat: default_querier_flat(),
        }
    }
}

impl Default for WasmSection {
    fn default() -> Self {
        Self {
            stargate_accepted_paths: Vec::new(),
            max_code_size: default_max_code_size(),
        }
    }
}

impl KeeperConfig {
    /// Load a `KeeperConfig` from a TOML file on disk.
    ///
    /// # Errors
    /// Fails if the file cannot be read or is not a valid config.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .map_err(|e| ConfigError::Io(path_ref.display().to_string(), e))?;
        Self::from_toml_str(&contents)
    }

    /// Parse a `KeeperConfig` from TOML.
    ///
    /// # Errors
    /// Fails if the TOML is invalid or the commitment prefix is empty.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        if cfg.commitment_prefix.is_empty() {
            return Err(ConfigError::Invalid("commitment_prefix cannot be empty".to_string()));
        }
        Ok(cfg)
    }

    /// Whether clients of `client_type` may be created.
    #[must_use]
    pub fn is_allowed(&self, client_type: &str) -> bool {
        self.allowed_clients
            .iter()
            .any(|allowed| allowed == ALLOW_ALL_CLIENTS || allowed == client_type)
    }

    /// The verification code adapter configuration.
    #[must_use]
    pub fn wasm_config(&self) -> WasmConfig {
        WasmConfig {
            stargate_accepted_paths: self.wasm.stargate_accepted_paths.clone(),
            max_code_size: self.wasm.max_code_size,
            query_gas_limit: self.gas.query_gas_limit,
            querier_flat: self.gas.querier_flat,
        }
    }
}

/// Errors that can occur loading the keeper config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("I/O error reading `{0}`: {1}")]
    Io(String, #[source] std::io::Error),

    /// The file is not valid TOML for the config
    #[error("invalid TOML in config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}
