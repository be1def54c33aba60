//! Read-only queries over clients, consensus states and upgrades
//!
//! Every request is optional so that an absent request is rejected with
//! [`ClientError::EmptyRequest`] before anything else is looked at.

use cosmwasm_std::{Binary, Storage};
use ibc_client_host_types::{ensure, ClientId, GasMeter, Height, HostEnv, MerklePath};
use ibc_client_host_wasm::WasmEngine;
use serde::{Deserialize, Serialize};

use crate::{
    codec::{decode_client_state, decode_consensus_state},
    consensus_store::{self, ConsensusStateWithHeight, HeightRange},
    error::ClientError,
    keeper::{Keeper, ProofRequest},
    keys,
    pagination::{paginate, PageRequest, PageResponse},
    upgrade,
};

/// A client state paired with its identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedClientState {
    /// The client
    pub client_id: String,
    /// The packed client state
    pub client_state: Binary,
}

/// Request for a single client state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClientStateRequest {
    /// The client
    pub client_id: String,
}

/// The packed client state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClientStateResponse {
    /// The packed client state
    pub client_state: Binary,
}

/// Request for a page of client states.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClientStatesRequest {
    /// Which page to return
    #[serde(default)]
    pub pagination: Option<PageRequest>,
}

/// A page of client states ordered by identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClientStatesResponse {
    /// The client states
    pub client_states: Vec<IdentifiedClientState>,
    /// Where the listing stopped
    pub pagination: PageResponse,
}

/// Request for a consensus state at a height, or the latest one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConsensusStateRequest {
    /// The client
    pub client_id: String,
    /// Revision of the height, ignored with `latest_height`
    #[serde(default)]
    pub revision_number: u64,
    /// Height within the revision, ignored with `latest_height`
    #[serde(default)]
    pub revision_height: u64,
    /// Return the consensus state at the client's latest height
    #[serde(default)]
    pub latest_height: bool,
}

/// The packed consensus state and the height it was found at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConsensusStateResponse {
    /// The packed consensus state
    pub consensus_state: Binary,
    /// The height it is stored at
    pub height: Height,
}

/// Request for a page of one client's consensus states.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConsensusStatesRequest {
    /// The client
    pub client_id: String,
    /// Which page to return
    #[serde(default)]
    pub pagination: Option<PageRequest>,
}

/// A page of consensus states in ascending height order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConsensusStatesResponse {
    /// The consensus states
    pub consensus_states: Vec<ConsensusStateWithHeight>,
    /// Where the listing stopped
    pub pagination: PageResponse,
}

/// A page of consensus state heights in ascending order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConsensusStateHeightsResponse {
    /// The heights
    pub consensus_state_heights: Vec<Height>,
    /// Where the listing stopped
    pub pagination: PageResponse,
}

/// Request for a client's status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClientStatusRequest {
    /// The client
    pub client_id: String,
}

/// The status string of a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClientStatusResponse {
    /// One of `Active`, `Expired`, `Frozen` or `Unknown`
    pub status: String,
}

/// The client types that may be created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClientParamsResponse {
    /// Allowed client types, `*` allows all
    pub allowed_clients: Vec<String>,
}

/// The packed upgraded client state of the pending plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryUpgradedClientStateResponse {
    /// The packed, zeroed client state
    pub upgraded_client_state: Binary,
}

/// Request for the upgraded consensus state committed at a height.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryUpgradedConsensusStateRequest {
    /// Host height of the upgrade
    pub height: u64,
}

/// The packed upgraded consensus state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryUpgradedConsensusStateResponse {
    /// The packed consensus state
    pub upgraded_consensus_state: Binary,
}

/// Request to verify a membership proof.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryVerifyMembershipRequest {
    /// The verifying client
    pub client_id: String,
    /// The encoded merkle proof
    pub proof: Binary,
    /// Height of the consensus state the proof is against
    pub proof_height: Height,
    /// Path relative to the commitment prefix
    pub merkle_path: MerklePath,
    /// The committed value
    pub value: Binary,
    /// Ignored: delay periods are not enforced by light clients
    #[serde(default)]
    pub time_delay: u64,
    /// Ignored: delay periods are not enforced by light clients
    #[serde(default)]
    pub block_delay: u64,
}

/// Request to verify a non-membership proof.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryVerifyNonMembershipRequest {
    /// The verifying client
    pub client_id: String,
    /// The encoded merkle proof
    pub proof: Binary,
    /// Height of the consensus state the proof is against
    pub proof_height: Height,
    /// Path relative to the commitment prefix
    pub merkle_path: MerklePath,
}

/// Whether a proof verified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryVerifyMembershipResponse {
    /// Always `true`; a proof that does not verify is an error
    pub success: bool,
}

/// Queries against a point-in-time view of the host store.
pub struct QueryService<'a, E> {
    keeper: &'a Keeper<E>,
    store: &'a dyn Storage,
    env: &'a HostEnv,
}

impl<'a, E: WasmEngine> QueryService<'a, E> {
    /// A query service over `store` as of `env`.
    #[must_use]
    pub const fn new(keeper: &'a Keeper<E>, store: &'a dyn Storage, env: &'a HostEnv) -> Self {
        Self { keeper, store, env }
    }

    /// The packed state of a client.
    ///
    /// # Errors
    /// Fails on an empty request, a malformed identifier or an unknown client.
    pub fn client_state(
        &self,
        request: Option<&QueryClientStateRequest>,
    ) -> Result<QueryClientStateResponse, ClientError> {
        let request = request.ok_or(ClientError::EmptyRequest)?;
        let client_id = request.client_id.parse::<ClientId>()?;
        let key = keys::client_state(client_id.as_str());
        let bytes = self.store.get(&key).ok_or_else(|| ClientError::ClientNotFound {
            client_id: client_id.to_string(),
        })?;
        decode_client_state(&key, &bytes)?;
        Ok(QueryClientStateResponse {
            client_state: bytes.into(),
        })
    }

    /// A page of client states ordered by identifier.
    ///
    /// # Errors
    /// Fails on an empty request, invalid pagination or corrupt bytes.
    pub fn client_states(
        &self,
        request: Option<&QueryClientStatesRequest>,
    ) -> Result<QueryClientStatesResponse, ClientError> {
        let request = request.ok_or(ClientError::EmptyRequest)?;
        let page = request.pagination.clone().unwrap_or_default();
        let suffix = format!("/{}", keys::CLIENT_STATE_KEY);

        let (client_states, pagination) = paginate(self.store, keys::CLIENTS_PREFIX, &page, |key, value| {
            let Some(client_id) = key.strip_suffix(suffix.as_bytes()) else {
                return Ok(None);
            };
            if client_id.contains(&b'/') {
                return Ok(None);
            }
            let full_key = [keys::CLIENTS_PREFIX, key].concat();
            decode_client_state(&full_key, value)?;
            Ok(Some(IdentifiedClientState {
                client_id: String::from_utf8_lossy(client_id).into_owned(),
                client_state: Binary::from(value),
            }))
        })?;
        Ok(QueryClientStatesResponse {
            client_states,
            pagination,
        })
    }

    /// The packed consensus state at the requested height, or at the
    /// client's latest height.
    ///
    /// # Errors
    /// Fails on an empty request, a malformed identifier, a zero height
    /// without `latest_height`, or an unknown client or height.
    pub fn consensus_state(
        &self,
        request: Option<&QueryConsensusStateRequest>,
    ) -> Result<QueryConsensusStateResponse, ClientError> {
        let request = request.ok_or(ClientError::EmptyRequest)?;
        let client_id = request.client_id.parse::<ClientId>()?;

        let height = if request.latest_height {
            self.keeper.client_state(self.store, client_id.as_str())?.latest_height
        } else {
            let height = Height::new(request.revision_number, request.revision_height);
            ensure!(
                !height.is_zero(),
                ClientError::InvalidHeight {
                    reason: "consensus state height cannot be zero".to_string(),
                }
            );
            height
        };

        let key = keys::consensus_state(client_id.as_str(), height);
        let bytes = self.store.get(&key).ok_or_else(|| ClientError::ConsensusStateNotFound {
            client_id: client_id.to_string(),
            height,
        })?;
        decode_consensus_state(&key, &bytes)?;
        Ok(QueryConsensusStateResponse {
            consensus_state: bytes.into(),
            height,
        })
    }

    /// A page of a client's consensus states in ascending height order.
    ///
    /// # Errors
    /// Fails on an empty request, a malformed identifier or invalid pagination.
    pub fn consensus_states(
        &self,
        request: Option<&QueryConsensusStatesRequest>,
    ) -> Result<QueryConsensusStatesResponse, ClientError> {
        let request = request.ok_or(ClientError::EmptyRequest)?;
        let client_id = request.client_id.parse::<ClientId>()?;
        let (consensus_states, pagination) = consensus_store::list(
            self.store,
            client_id.as_str(),
            HeightRange::all(),
            &request.pagination.clone().unwrap_or_default(),
        )?;
        Ok(QueryConsensusStatesResponse {
            consensus_states,
            pagination,
        })
    }

    /// A page of a client's consensus state heights in ascending order.
    ///
    /// # Errors
    /// Fails on an empty request, a malformed identifier or invalid pagination.
    pub fn consensus_state_heights(
        &self,
        request: Option<&QueryConsensusStatesRequest>,
    ) -> Result<QueryConsensusStateHeightsResponse, ClientError> {
        let request = request.ok_or(ClientError::EmptyRequest)?;
        let client_id = request.client_id.parse::<ClientId>()?;
        let (consensus_state_heights, pagination) = consensus_store::heights(
            self.store,
            client_id.as_str(),
            HeightRange::all(),
            &request.pagination.clone().unwrap_or_default(),
        )?;
        Ok(QueryConsensusStateHeightsResponse {
            consensus_state_heights,
            pagination,
        })
    }

    /// The status of a client.
    ///
    /// # Errors
    /// Fails on an empty request, a malformed identifier or an unknown client.
    pub fn client_status(
        &self,
        request: Option<&QueryClientStatusRequest>,
    ) -> Result<QueryClientStatusResponse, ClientError> {
        let request = request.ok_or(ClientError::EmptyRequest)?;
        let status = self.keeper.client_status(self.store, self.env, &request.client_id)?;
        Ok(QueryClientStatusResponse {
            status: status.to_string(),
        })
    }

    /// The client types that may be created.
    #[must_use]
    pub fn client_params(&self) -> QueryClientParamsResponse {
        QueryClientParamsResponse {
            allowed_clients: self.keeper.config().allowed_clients.clone(),
        }
    }

    /// The packed upgraded client state of the pending plan.
    ///
    /// # Errors
    /// Fails if no plan is pending, no state was committed for it, or the
    /// stored bytes are corrupt.
    pub fn upgraded_client_state(&self) -> Result<QueryUpgradedClientStateResponse, ClientError> {
        let (_, bytes) = upgrade::upgraded_client_state(self.store)?;
        Ok(QueryUpgradedClientStateResponse {
            upgraded_client_state: bytes.into(),
        })
    }

    /// The packed upgraded consensus state committed at a height.
    ///
    /// # Errors
    /// Fails on an empty request, a zero height, if no plan is pending, or
    /// if nothing was committed at the height.
    pub fn upgraded_consensus_state(
        &self,
        request: Option<&QueryUpgradedConsensusStateRequest>,
    ) -> Result<QueryUpgradedConsensusStateResponse, ClientError> {
        let request = request.ok_or(ClientError::EmptyRequest)?;
        let (_, bytes) = upgrade::upgraded_consensus_state(self.store, request.height)?;
        Ok(QueryUpgradedConsensusStateResponse {
            upgraded_consensus_state: bytes.into(),
        })
    }

    /// Verifies a membership proof, charging proof gas to `meter`.
    ///
    /// # Errors
    /// As [`Keeper::verify_membership`], and on an empty request.
    pub fn verify_membership(
        &self,
        meter: &mut GasMeter,
        request: Option<&QueryVerifyMembershipRequest>,
    ) -> Result<QueryVerifyMembershipResponse, ClientError> {
        let request = request.ok_or(ClientError::EmptyRequest)?;
        let proof_request = ProofRequest {
            client_id: &request.client_id,
            proof_height: request.proof_height,
            proof: &request.proof,
            path: &request.merkle_path,
        };
        self.keeper
            .verify_membership(self.store, self.env, meter, &proof_request, &request.value)?;
        Ok(QueryVerifyMembershipResponse { success: true })
    }

    /// Verifies a non-membership proof, charging proof gas to `meter`.
    ///
    /// # Errors
    /// As [`Keeper::verify_non_membership`], and on an empty request.
    pub fn verify_non_membership(
        &self,
        meter: &mut GasMeter,
        request: Option<&QueryVerifyNonMembershipRequest>,
    ) -> Result<QueryVerifyMembershipResponse, ClientError> {
        let request = request.ok_or(ClientError::EmptyRequest)?;
        let proof_request = ProofRequest {
            client_id: &request.client_id,
            proof_height: request.proof_height,
            proof: &request.proof,
            path: &request.merkle_path,
        };
        self.keeper
            .verify_non_membership(self.store, self.env, meter, &proof_request)?;
        Ok(QueryVerifyMembershipResponse { success: true })
    }
}

#[cfg(test)]
mod tests {
    use attestor_light_client::test_utils::{attestor_params, NOW};
    use cosmwasm_std::MemoryStorage;
    use ibc_client_host_commitment::test_utils::CommitmentTree;
    use ibc_client_host_types::{ConsensusState, ErrorKind};
    use ibc_client_host_wasm::mock::MockEngine;

    use super::*;
    use crate::{
        client_state::{ClientParams, ClientState},
        codec::encode_consensus_state,
        config::KeeperConfig,
    };

    const KEY: &[u8] = b"clients/07-tendermint-0/clientState";
    const VALUE: &[u8] = b"committed";

    struct Fixture {
        keeper: Keeper<MockEngine>,
        store: MemoryStorage,
        env: HostEnv,
        tree: CommitmentTree,
    }

    impl Fixture {
        fn new() -> Self {
            let keeper = Keeper::new(KeeperConfig::default(), MockEngine::new());
            let tree = CommitmentTree::new(b"ibc").with_entry(KEY, VALUE);
            let env = HostEnv::new("host-1", 100, NOW / 1_000_000_000);
            let mut store = MemoryStorage::new();
            for _ in 0..2 {
                keeper
                    .create_client(
                        &mut store,
                        &env,
                        &mut GasMeter::infinite(),
                        client_state(),
                        ConsensusState::new(NOW - 1_000_000_000, tree.root()),
                    )
                    .unwrap();
            }
            Self {
                keeper,
                store,
                env,
                tree,
            }
        }

        fn service(&self) -> QueryService<'_, MockEngine> {
            QueryService::new(&self.keeper, &self.store, &self.env)
        }

        fn membership_request(&self) -> QueryVerifyMembershipRequest {
            QueryVerifyMembershipRequest {
                client_id: "attestor-0".to_string(),
                proof: self.tree.membership_proof(KEY).into(),
                proof_height: Height::new(0, 1),
                merkle_path: MerklePath::new([KEY]),
                value: VALUE.into(),
                ..QueryVerifyMembershipRequest::default()
            }
        }
    }

    fn client_state() -> ClientState {
        ClientState {
            chain_id: "counterparty-1".to_string(),
            trusting_period: 100,
            max_clock_drift: 10,
            latest_height: Height::new(0, 1),
            frozen_height: Height::zero(),
            upgrade_path: vec![],
            params: ClientParams::Attestor(attestor_params(2)),
        }
    }

    #[test]
    fn absent_requests_are_invalid() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let errors = [
            service.client_state(None).unwrap_err(),
            service.client_states(None).unwrap_err(),
            service.consensus_state(None).unwrap_err(),
            service.consensus_states(None).unwrap_err(),
            service.consensus_state_heights(None).unwrap_err(),
            service.client_status(None).unwrap_err(),
            service.upgraded_consensus_state(None).unwrap_err(),
            service.verify_membership(&mut GasMeter::infinite(), None).unwrap_err(),
            service.verify_non_membership(&mut GasMeter::infinite(), None).unwrap_err(),
        ];
        for err in errors {
            assert!(matches!(err, ClientError::EmptyRequest), "{err}");
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn client_states_are_listed_by_identifier() {
        let fixture = Fixture::new();
        let response = fixture
            .service()
            .client_states(Some(&QueryClientStatesRequest {
                pagination: Some(PageRequest {
                    limit: 1,
                    count_total: true,
                    ..PageRequest::default()
                }),
            }))
            .unwrap();
        assert_eq!(response.client_states.len(), 1);
        assert_eq!(response.client_states[0].client_id, "attestor-0");
        assert_eq!(response.pagination.total, Some(2));

        let next = fixture
            .service()
            .client_states(Some(&QueryClientStatesRequest {
                pagination: Some(PageRequest {
                    key: response.pagination.next_key,
                    ..PageRequest::default()
                }),
            }))
            .unwrap();
        let ids: Vec<_> = next.client_states.iter().map(|state| state.client_id.as_str()).collect();
        assert_eq!(ids, ["attestor-1"]);
        assert_eq!(next.pagination.next_key, None);
    }

    #[test]
    fn client_state_is_returned_packed() {
        let fixture = Fixture::new();
        let response = fixture
            .service()
            .client_state(Some(&QueryClientStateRequest {
                client_id: "attestor-1".to_string(),
            }))
            .unwrap();
        assert_eq!(
            response.client_state.as_slice(),
            fixture.store.get(&keys::client_state("attestor-1")).unwrap()
        );

        let err = fixture
            .service()
            .client_state(Some(&QueryClientStateRequest {
                client_id: "attestor-9".to_string(),
            }))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[rstest::rstest]
    #[case::latest_ignores_height(0, 77, true, Ok(Height::new(0, 1)))]
    #[case::explicit(0, 1, false, Ok(Height::new(0, 1)))]
    #[case::zero_height(0, 0, false, Err(ErrorKind::InvalidArgument))]
    #[case::missing_height(0, 2, false, Err(ErrorKind::NotFound))]
    fn consensus_state_lookup(
        #[case] revision_number: u64,
        #[case] revision_height: u64,
        #[case] latest_height: bool,
        #[case] expected: Result<Height, ErrorKind>,
    ) {
        let fixture = Fixture::new();
        let result = fixture
            .service()
            .consensus_state(Some(&QueryConsensusStateRequest {
                client_id: "attestor-0".to_string(),
                revision_number,
                revision_height,
                latest_height,
            }))
            .map(|response| {
                let expected = ConsensusState::new(NOW - 1_000_000_000, fixture.tree.root());
                assert_eq!(
                    response.consensus_state.as_slice(),
                    encode_consensus_state(&expected).unwrap()
                );
                response.height
            })
            .map_err(|err| err.kind());
        assert_eq!(result, expected);
    }

    #[test]
    fn consensus_listings_validate_the_identifier() {
        let fixture = Fixture::new();
        let request = QueryConsensusStatesRequest {
            client_id: "bad".to_string(),
            pagination: None,
        };
        let err = fixture.service().consensus_states(Some(&request)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidClientId(_)));
        let err = fixture.service().consensus_state_heights(Some(&request)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidClientId(_)));

        let request = QueryConsensusStatesRequest {
            client_id: "attestor-0".to_string(),
            pagination: None,
        };
        let heights = fixture.service().consensus_state_heights(Some(&request)).unwrap();
        assert_eq!(heights.consensus_state_heights, [Height::new(0, 1)]);
        let states = fixture.service().consensus_states(Some(&request)).unwrap();
        assert_eq!(states.consensus_states[0].height, Height::new(0, 1));
    }

    #[test]
    fn status_and_params() {
        let fixture = Fixture::new();
        let response = fixture
            .service()
            .client_status(Some(&QueryClientStatusRequest {
                client_id: "attestor-0".to_string(),
            }))
            .unwrap();
        assert_eq!(response.status, "Active");
        assert_eq!(
            fixture.service().client_params().allowed_clients,
            KeeperConfig::default().allowed_clients
        );
    }

    #[test]
    fn upgraded_states_without_a_plan_are_not_found() {
        let fixture = Fixture::new();
        let err = fixture.service().upgraded_client_state().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = fixture
            .service()
            .upgraded_consensus_state(Some(&QueryUpgradedConsensusStateRequest { height: 5 }))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn verifies_membership_and_charges_proof_gas() {
        let fixture = Fixture::new();
        let request = fixture.membership_request();
        let mut meter = GasMeter::infinite();
        let response = fixture.service().verify_membership(&mut meter, Some(&request)).unwrap();
        assert!(response.success);
        let expected = fixture.keeper.config().gas.proof.of(request.proof.len(), 2);
        assert_eq!(meter.consumed(), expected);

        let mut meter = GasMeter::infinite();
        let tampered = QueryVerifyMembershipRequest {
            value: b"other".into(),
            ..request
        };
        let err = fixture.service().verify_membership(&mut meter, Some(&tampered)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
        assert_eq!(meter.consumed(), expected);
    }

    #[test]
    fn verifies_non_membership() {
        let fixture = Fixture::new();
        let absent = b"clients/07-tendermint-1/clientState";
        let request = QueryVerifyNonMembershipRequest {
            client_id: "attestor-0".to_string(),
            proof: fixture.tree.non_membership_proof(absent).into(),
            proof_height: Height::new(0, 1),
            merkle_path: MerklePath::new([absent.to_vec()]),
        };
        let response = fixture
            .service()
            .verify_non_membership(&mut GasMeter::infinite(), Some(&request))
            .unwrap();
        assert!(response.success);
    }

    #[rstest::rstest]
    #[case::client_id(0, "invalid client identifier")]
    #[case::proof(1, "empty proof")]
    #[case::proof_height(2, "proof height must be non-zero")]
    #[case::merkle_path(3, "empty merkle path")]
    #[case::value(4, "empty value")]
    fn validation_runs_in_field_order_before_any_gas(#[case] valid_fields: usize, #[case] expected: &str) {
        let fixture = Fixture::new();
        let valid = fixture.membership_request();
        let mut request = QueryVerifyMembershipRequest {
            client_id: "x".to_string(),
            ..QueryVerifyMembershipRequest::default()
        };
        if valid_fields > 0 {
            request.client_id = valid.client_id;
        }
        if valid_fields > 1 {
            request.proof = valid.proof;
        }
        if valid_fields > 2 {
            request.proof_height = valid.proof_height;
        }
        if valid_fields > 3 {
            request.merkle_path = valid.merkle_path;
        }

        let mut meter = GasMeter::infinite();
        let err = fixture.service().verify_membership(&mut meter, Some(&request)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains(expected), "{err}");
        assert_eq!(meter.consumed(), 0);
    }

    #[test]
    fn unknown_proof_height_is_not_found() {
        let fixture = Fixture::new();
        let request = QueryVerifyMembershipRequest {
            proof_height: Height::new(0, 2),
            ..fixture.membership_request()
        };
        let mut meter = GasMeter::infinite();
        let err = fixture.service().verify_membership(&mut meter, Some(&request)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(meter.consumed(), 0);
    }
}
