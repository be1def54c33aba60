//! The host's record of a counterparty light client

use attestor_light_client::AttestorParams;
use cosmwasm_std::{Binary, Checksum};
use ibc_client_host_types::{ensure, Height};
use ibc_client_host_wasm::registry::parse_checksum;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Client type of the built-in attestor algorithm.
pub const ATTESTOR_CLIENT_TYPE: &str = "attestor";
/// Client type of clients verified by stored code.
pub const WASM_CLIENT_TYPE: &str = "08-wasm";

/// Parameters of a client whose verification runs on stored code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasmParams {
    /// Checksum of the code
    pub checksum: Binary,
    /// Opaque client state owned by the code
    pub data: Binary,
}

impl WasmParams {
    /// The checksum as a [`Checksum`].
    ///
    /// # Errors
    /// Fails if the checksum is not 32 bytes.
    pub fn checksum(&self) -> Result<Checksum, ClientError> {
        parse_checksum(&self.checksum).map_err(|err| ClientError::InvalidClientState {
            reason: err.to_string(),
        })
    }
}

/// The verification algorithm of a client and its parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientParams {
    /// Built-in threshold attestation
    Attestor(AttestorParams),
    /// Verification delegated to stored code
    Wasm(WasmParams),
}

impl ClientParams {
    /// The client type identifiers of this algorithm are prefixed with.
    #[must_use]
    pub const fn client_type(&self) -> &'static str {
        match self {
            Self::Attestor(_) => ATTESTOR_CLIENT_TYPE,
            Self::Wasm(_) => WASM_CLIENT_TYPE,
        }
    }
}

/// Per-counterparty light client state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    /// Counterparty chain identifier
    pub chain_id: String,
    /// Seconds a consensus state may be relied upon without an update
    pub trusting_period: u64,
    /// Seconds a header timestamp may run ahead of the host clock
    pub max_clock_drift: u64,
    /// Latest height with a stored consensus state
    pub latest_height: Height,
    /// Non-zero once misbehaviour was detected
    #[serde(default)]
    pub frozen_height: Height,
    /// Counterparty store path of upgraded states, last segment is the key prefix
    #[serde(default)]
    pub upgrade_path: Vec<String>,
    /// The verification algorithm
    pub params: ClientParams,
}

impl ClientState {
    /// Whether misbehaviour froze the client.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        !self.frozen_height.is_zero()
    }

    /// The client type of this state.
    #[must_use]
    pub const fn client_type(&self) -> &'static str {
        self.params.client_type()
    }

    /// Checks the state is usable for a new client.
    ///
    /// # Errors
    /// Fails on an empty chain id, a zero trusting period or latest height,
    /// a frozen state, an empty upgrade path segment, or invalid parameters.
    pub fn validate(&self) -> Result<(), ClientError> {
        ensure!(
            self.trusting_period > 0,
            ClientError::InvalidClientState {
                reason: "trusting period must be non-zero".to_string(),
            }
        );
        self.validate_upgrade()
    }

    /// Checks the fields an upgrade takes from the submitted state. Trust
    /// settings are not checked since the upgrade keeps the current ones.
    ///
    /// # Errors
    /// Fails on an empty chain id, a zero latest height, a frozen state, an
    /// empty upgrade path segment, or invalid parameters.
    pub fn validate_upgrade(&self) -> Result<(), ClientError> {
        let invalid = |reason: &str| ClientError::InvalidClientState {
            reason: reason.to_string(),
        };
        ensure!(!self.chain_id.trim().is_empty(), invalid("chain id cannot be empty"));
        ensure!(!self.latest_height.is_zero(), invalid("latest height must be non-zero"));
        ensure!(!self.is_frozen(), invalid("client state cannot be frozen"));
        ensure!(
            !self.upgrade_path.iter().any(|segment| segment.is_empty()),
            invalid("upgrade path segments cannot be empty")
        );

        match &self.params {
            ClientParams::Attestor(params) => {
                params
                    .validate()
                    .map_err(|err| ClientError::InvalidClientState {
                        reason: err.to_string(),
                    })
            }
            ClientParams::Wasm(params) => params.checksum().map(|_| ()),
        }
    }

    /// The state with every field that is not part of the client's identity
    /// reset, as committed by the counterparty for an upgrade.
    #[must_use]
    pub fn zeroed(&self) -> Self {
        Self {
            trusting_period: 0,
            max_clock_drift: 0,
            latest_height: Height::zero(),
            frozen_height: Height::zero(),
            ..self.clone()
        }
    }

    /// The state after upgrading to `upgraded`: identity and latest height
    /// from `upgraded`, trust settings from `self`.
    #[must_use]
    pub fn upgraded_to(&self, upgraded: &Self) -> Self {
        Self {
            chain_id: upgraded.chain_id.clone(),
            trusting_period: self.trusting_period,
            max_clock_drift: self.max_clock_drift,
            latest_height: upgraded.latest_height,
            frozen_height: Height::zero(),
            upgrade_path: upgraded.upgrade_path.clone(),
            params: upgraded.params.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use attestor_light_client::test_utils::attestor_params;

    use super::*;

    fn client_state() -> ClientState {
        ClientState {
            chain_id: "counterparty-1".to_string(),
            trusting_period: 100,
            max_clock_drift: 10,
            latest_height: Height::new(0, 1),
            frozen_height: Height::zero(),
            upgrade_path: vec!["upgrade".to_string(), "upgradedIBCState".to_string()],
            params: ClientParams::Attestor(attestor_params(3)),
        }
    }

    #[test]
    fn valid_state_passes() {
        client_state().validate().unwrap();
        assert_eq!(client_state().client_type(), "attestor");
    }

    #[rstest::rstest]
    #[case::empty_chain_id(ClientState { chain_id: " ".into(), ..client_state() }, "chain id")]
    #[case::zero_trusting_period(ClientState { trusting_period: 0, ..client_state() }, "trusting period")]
    #[case::zero_latest(ClientState { latest_height: Height::zero(), ..client_state() }, "latest height")]
    #[case::frozen(ClientState { frozen_height: Height::new(0, 1), ..client_state() }, "frozen")]
    #[case::empty_segment(ClientState { upgrade_path: vec![String::new()], ..client_state() }, "upgrade path")]
    #[case::bad_params(ClientState { params: ClientParams::Attestor(attestor_params(9)), ..client_state() }, "min_required_sigs")]
    #[case::bad_checksum(
        ClientState { params: ClientParams::Wasm(WasmParams { checksum: vec![1; 3].into(), data: Binary::default() }), ..client_state() },
        "checksum"
    )]
    fn rejects_invalid_state(#[case] state: ClientState, #[case] expected: &str) {
        let err = state.validate().unwrap_err();
        assert!(err.to_string().contains(expected), "{err}");
    }

    #[test]
    fn upgrade_validation_ignores_trust_settings() {
        let submitted = ClientState {
            trusting_period: 0,
            max_clock_drift: 0,
            ..client_state()
        };
        submitted.validate_upgrade().unwrap();
        assert!(submitted.validate().is_err());

        let err = ClientState {
            latest_height: Height::zero(),
            ..submitted
        }
        .validate_upgrade()
        .unwrap_err();
        assert!(err.to_string().contains("latest height"), "{err}");
    }

    #[test]
    fn zeroing_keeps_identity_only() {
        let state = ClientState {
            frozen_height: Height::new(0, 3),
            ..client_state()
        };
        let zeroed = state.zeroed();
        assert_eq!(zeroed.trusting_period, 0);
        assert_eq!(zeroed.max_clock_drift, 0);
        assert!(zeroed.latest_height.is_zero());
        assert!(!zeroed.is_frozen());
        assert_eq!(zeroed.chain_id, state.chain_id);
        assert_eq!(zeroed.params, state.params);
        assert_eq!(zeroed.upgrade_path, state.upgrade_path);
    }

    #[test]
    fn upgrade_takes_trust_settings_from_the_old_state() {
        let old = client_state();
        let new = ClientState {
            chain_id: "counterparty-2".to_string(),
            trusting_period: 1,
            max_clock_drift: 1,
            latest_height: Height::new(1, 1),
            ..client_state()
        };
        let upgraded = old.upgraded_to(&new);
        assert_eq!(upgraded.chain_id, "counterparty-2");
        assert_eq!(upgraded.latest_height, Height::new(1, 1));
        assert_eq!(upgraded.trusting_period, 100);
        assert_eq!(upgraded.max_clock_drift, 10);
    }
}
