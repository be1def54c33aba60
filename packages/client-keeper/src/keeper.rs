//! The client lifecycle manager
//!
//! Every mutation is staged on a [`CacheStorage`] over the host store and
//! only committed once the whole operation succeeded.

use attestor_light_client::{
    misbehaviour::{check_for_misbehaviour, verify_misbehaviour},
    update::update_consensus_state,
    verify::verify_header,
    AttestorParams, ClientMessage,
};
use cosmwasm_std::{Binary, Checksum, Storage};
use ibc_client_host_commitment::{
    verifier::{validate_membership, validate_non_membership},
    CommitmentError, MerkleVerifier,
};
use ibc_client_host_types::{
    ensure, storage::CacheStorage, ClientId, ConsensusState, ErrorKind, GasMeter, Height, HostEnv,
    MerklePath, Status,
};
use ibc_client_host_wasm::{
    msg::{
        CheckForMisbehaviourMsg, CheckForMisbehaviourResult, EmptyResult, InstantiateMsg, QueryMsg,
        StatusMsg, StatusResult, SudoMsg, TimestampAtHeightMsg, TimestampAtHeightResult,
        UpdateStateMsg, UpdateStateOnMisbehaviourMsg, UpdateStateResult, VerifyClientMessageMsg,
        VerifyMembershipMsg, VerifyNonMembershipMsg, VerifyUpgradeAndUpdateStateMsg,
    },
    Invocation, QueryPlugins, WasmAdapter, WasmEngine, WasmError,
};

use crate::{
    client_state::{ClientParams, ClientState, WasmParams},
    codec::{decode_client_state, encode_client_state, encode_consensus_state},
    config::KeeperConfig,
    consensus_store,
    error::ClientError,
    guard::commit_guarded,
    keys,
    status::native_status,
    upgrade::upgrade_paths,
};

/// A proof to verify against a client's consensus state.
#[derive(Clone, Copy, Debug)]
pub struct ProofRequest<'a> {
    /// The verifying client
    pub client_id: &'a str,
    /// Height of the consensus state the proof is against
    pub proof_height: Height,
    /// The encoded merkle proof
    pub proof: &'a [u8],
    /// Path relative to the commitment prefix
    pub path: &'a MerklePath,
}

/// A counterparty upgrade to apply to a client.
#[derive(Clone, Debug)]
pub struct ClientUpgrade {
    /// The client state after the upgrade
    pub client_state: ClientState,
    /// The consensus state after the upgrade
    pub consensus_state: ConsensusState,
    /// Proof of the zeroed client state under the old root
    pub proof_upgrade_client: Vec<u8>,
    /// Proof of the consensus state under the old root
    pub proof_upgrade_consensus_state: Vec<u8>,
}

/// The effect of a client update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateResult {
    /// Consensus states were added at these heights
    Updated(Vec<Height>),
    /// Misbehaviour was detected and the client frozen at this height
    Frozen(Height),
    /// The message was already applied
    Unchanged,
}

/// Creates, updates, freezes, upgrades and verifies against light clients.
pub struct Keeper<E> {
    config: KeeperConfig,
    verifier: MerkleVerifier,
    wasm: WasmAdapter<E>,
}

impl<E: WasmEngine> Keeper<E> {
    /// A keeper running verification code on `engine`.
    #[must_use]
    pub fn new(config: KeeperConfig, engine: E) -> Self {
        Self {
            verifier: MerkleVerifier::new(config.commitment_prefix.clone()),
            wasm: WasmAdapter::new(engine, config.wasm_config()),
            config,
        }
    }

    /// Installs the query plugins offered to verification code.
    #[must_use]
    pub fn with_query_plugins(mut self, plugins: QueryPlugins) -> Self {
        self.wasm = self.wasm.with_plugins(plugins);
        self
    }

    /// The keeper configuration.
    #[must_use]
    pub const fn config(&self) -> &KeeperConfig {
        &self.config
    }

    /// The verification code adapter.
    #[must_use]
    pub const fn wasm(&self) -> &WasmAdapter<E> {
        &self.wasm
    }

    /// Stores verification code, returning its checksum.
    ///
    /// # Errors
    /// Fails on empty, oversized, duplicate or invalid code.
    pub fn store_code(&self, store: &mut dyn Storage, code: &[u8]) -> Result<Checksum, WasmError> {
        self.wasm.store_code(store, code)
    }

    /// The stored state of `client_id`.
    ///
    /// # Errors
    /// Fails on a malformed identifier, an unknown client, or corrupt bytes.
    pub fn client_state(&self, store: &dyn Storage, client_id: &str) -> Result<ClientState, ClientError> {
        load_client(store, &parse_client_id(client_id)?)
    }

    /// Registers a new client and returns its identifier.
    ///
    /// # Errors
    /// Fails if the client type is not allowed, on invalid states, if the
    /// verification code is unknown or rejects the states, or on gas
    /// exhaustion.
    pub fn create_client(
        &self,
        store: &mut dyn Storage,
        env: &HostEnv,
        meter: &mut GasMeter,
        client_state: ClientState,
        consensus_state: ConsensusState,
    ) -> Result<ClientId, ClientError> {
        let client_type = client_state.client_type();
        ensure!(
            self.config.is_allowed(client_type),
            ClientError::ClientTypeNotAllowed {
                client_type: client_type.to_string(),
            }
        );
        client_state.validate()?;
        if let Some(reason) = consensus_state.invalid_reason() {
            return Err(ClientError::InvalidConsensusState {
                reason: reason.to_string(),
            });
        }

        let sequence = next_client_sequence(store)?;
        let client_id = ClientId::new(client_type, sequence)?;
        let height = client_state.latest_height;

        let writes = {
            let mut cache = CacheStorage::new(&*store);
            cache.set(keys::NEXT_CLIENT_SEQUENCE, &sequence.saturating_add(1).to_be_bytes());
            cache.set(&keys::client_state(client_id.as_str()), &encode_client_state(&client_state)?);
            consensus_store::put(&mut cache, client_id.as_str(), height, &consensus_state)?;

            if let ClientParams::Wasm(params) = &client_state.params {
                let invocation = invocation(&client_id, params, env)?;
                let msg = InstantiateMsg {
                    client_state: params.data.clone(),
                    consensus_state: serde_json::to_vec(&consensus_state)
                        .map_err(ClientError::Serialize)?
                        .into(),
                    checksum: params.checksum.clone(),
                };
                let instantiated = self
                    .wasm
                    .instantiate(&cache, &invocation, &msg, self, meter)
                    .map_err(wasm_error(&client_id))?;
                commit_guarded(&mut cache, client_id.as_str(), instantiated, &[])?;
            }
            cache.into_writes()
        };
        writes.commit(store);

        tracing::info!(%client_id, client_type, %height, "created client");
        Ok(client_id)
    }

    /// Applies a client message: a header to append or misbehaviour
    /// evidence that freezes the client.
    ///
    /// # Errors
    /// Fails unless the client is active, if the message does not verify, if
    /// a non-conflicting header is below the latest height, or on gas
    /// exhaustion.
    pub fn update_client(
        &self,
        store: &mut dyn Storage,
        env: &HostEnv,
        meter: &mut GasMeter,
        client_id: &str,
        client_message: &[u8],
    ) -> Result<UpdateResult, ClientError> {
        let client_id = parse_client_id(client_id)?;
        let client_state = load_client(store, &client_id)?;
        self.ensure_active(store, env, meter, &client_id, &client_state)?;

        let result = match &client_state.params {
            ClientParams::Attestor(params) => {
                self.update_attestor(store, env, &client_id, &client_state, params, client_message)?
            }
            ClientParams::Wasm(params) => {
                self.update_wasm(store, env, meter, &client_id, params, client_message)?
            }
        };

        match &result {
            UpdateResult::Updated(heights) => {
                tracing::info!(%client_id, heights = ?heights, "updated client");
            }
            UpdateResult::Frozen(height) => {
                tracing::warn!(%client_id, frozen_height = %height, "misbehaviour detected, client frozen");
            }
            UpdateResult::Unchanged => {
                tracing::debug!(%client_id, "client message already applied");
            }
        }
        Ok(result)
    }

    fn update_attestor(
        &self,
        store: &mut dyn Storage,
        env: &HostEnv,
        client_id: &ClientId,
        client_state: &ClientState,
        params: &AttestorParams,
        client_message: &[u8],
    ) -> Result<UpdateResult, ClientError> {
        let attestor_error = |source| ClientError::Attestor {
            client_id: client_id.to_string(),
            source,
        };
        let message = ClientMessage::decode(client_message).map_err(attestor_error)?;
        let now = env.now_nanos();

        let (result, writes) = {
            let mut cache = CacheStorage::new(&*store);
            let result = match message {
                ClientMessage::Header(header) => {
                    verify_header(params, &header, now, client_state.max_clock_drift).map_err(attestor_error)?;

                    let id = client_id.as_str();
                    let existing = consensus_store::try_get(&cache, id, header.height)?;
                    if existing.as_ref() == Some(&header.consensus_state()) {
                        return Ok(UpdateResult::Unchanged);
                    }
                    let previous = consensus_store::previous(&cache, id, header.height)?;
                    let next = consensus_store::next(&cache, id, header.height)?;

                    if check_for_misbehaviour(existing.as_ref(), previous.as_ref(), next.as_ref(), &header) {
                        freeze(&mut cache, client_id, client_state, header.height)?
                    } else {
                        let (height, consensus_state, new_latest) =
                            update_consensus_state(client_state.latest_height, &header);
                        consensus_store::put(&mut cache, id, height, &consensus_state)?;
                        if let Some(latest_height) = new_latest {
                            let updated = ClientState {
                                latest_height,
                                ..client_state.clone()
                            };
                            cache.set(&keys::client_state(id), &encode_client_state(&updated)?);
                        }
                        UpdateResult::Updated(vec![height])
                    }
                }
                ClientMessage::Misbehaviour(misbehaviour) => {
                    verify_misbehaviour(params, &misbehaviour, now, client_state.max_clock_drift)
                        .map_err(attestor_error)?;
                    freeze(&mut cache, client_id, client_state, misbehaviour.height())?
                }
            };
            (result, cache.into_writes())
        };
        writes.commit(store);
        Ok(result)
    }

    fn update_wasm(
        &self,
        store: &mut dyn Storage,
        env: &HostEnv,
        meter: &mut GasMeter,
        client_id: &ClientId,
        params: &WasmParams,
        client_message: &[u8],
    ) -> Result<UpdateResult, ClientError> {
        let invocation = invocation(client_id, params, env)?;
        let client_message = Binary::from(client_message);

        let _: EmptyResult = self
            .wasm
            .query(
                &*store,
                &invocation,
                &QueryMsg::VerifyClientMessage(VerifyClientMessageMsg {
                    client_message: client_message.clone(),
                }),
                self,
                meter,
            )
            .map_err(wasm_error(client_id))?;
        let CheckForMisbehaviourResult { found_misbehaviour } = self
            .wasm
            .query(
                &*store,
                &invocation,
                &QueryMsg::CheckForMisbehaviour(CheckForMisbehaviourMsg {
                    client_message: client_message.clone(),
                }),
                self,
                meter,
            )
            .map_err(wasm_error(client_id))?;

        let (result, writes) = {
            let mut cache = CacheStorage::new(&*store);
            let result = if found_misbehaviour {
                let (EmptyResult {}, writes) = self
                    .wasm
                    .sudo(
                        &cache,
                        &invocation,
                        &SudoMsg::UpdateStateOnMisbehaviour(UpdateStateOnMisbehaviourMsg { client_message }),
                        self,
                        meter,
                    )
                    .map_err(wasm_error(client_id))?;
                commit_guarded(&mut cache, client_id.as_str(), writes, &[])?;

                let frozen = load_client(&cache, client_id)?;
                ensure!(
                    frozen.is_frozen(),
                    ClientError::WriteRejected {
                        client_id: client_id.to_string(),
                        key: String::from_utf8_lossy(&keys::client_state(client_id.as_str())).into_owned(),
                        reason: "misbehaviour did not freeze the client".to_string(),
                    }
                );
                UpdateResult::Frozen(frozen.frozen_height)
            } else {
                let (UpdateStateResult { heights }, writes) = self
                    .wasm
                    .sudo(
                        &cache,
                        &invocation,
                        &SudoMsg::UpdateState(UpdateStateMsg { client_message }),
                        self,
                        meter,
                    )
                    .map_err(wasm_error(client_id))?;
                let reported: Vec<Height> = heights.into_iter().map(Height::from).collect();
                let added = commit_guarded(&mut cache, client_id.as_str(), writes, &reported)?;
                if added.is_empty() {
                    UpdateResult::Unchanged
                } else {
                    UpdateResult::Updated(added)
                }
            };
            (result, cache.into_writes())
        };
        writes.commit(store);
        Ok(result)
    }

    /// The current status of `client_id`.
    ///
    /// Verification code deriving the status runs with its own meter of
    /// `query_gas_limit`.
    ///
    /// # Errors
    /// Fails on a malformed identifier, an unknown client, or corrupt bytes.
    pub fn client_status(&self, store: &dyn Storage, env: &HostEnv, client_id: &str) -> Result<Status, ClientError> {
        let mut meter = GasMeter::new(self.config.gas.query_gas_limit);
        self.client_status_metered(store, env, &mut meter, client_id)
    }

    pub(crate) fn client_status_metered(
        &self,
        store: &dyn Storage,
        env: &HostEnv,
        meter: &mut GasMeter,
        client_id: &str,
    ) -> Result<Status, ClientError> {
        let client_id = parse_client_id(client_id)?;
        let client_state = load_client(store, &client_id)?;
        self.status(store, env, meter, &client_id, &client_state)
    }

    fn status(
        &self,
        store: &dyn Storage,
        env: &HostEnv,
        meter: &mut GasMeter,
        client_id: &ClientId,
        client_state: &ClientState,
    ) -> Result<Status, ClientError> {
        if client_state.is_frozen() {
            return Ok(Status::Frozen);
        }
        let latest = consensus_store::try_get(store, client_id.as_str(), client_state.latest_height)?;

        let ClientParams::Wasm(params) = &client_state.params else {
            return Ok(native_status(client_state, latest.as_ref(), env.now_nanos()));
        };
        if latest.is_none() {
            return Ok(Status::Expired);
        }
        let Ok(invocation) = invocation(client_id, params, env) else {
            return Ok(Status::Unknown);
        };
        match self
            .wasm
            .query::<StatusResult>(store, &invocation, &QueryMsg::Status(StatusMsg {}), self, meter)
        {
            Ok(result) => Ok(Status::from(result.status.as_str())),
            Err(err) if err.kind() == ErrorKind::ResourceExhausted => Err(wasm_error(client_id)(err)),
            Err(err) => {
                tracing::debug!(%client_id, %err, "status query failed");
                Ok(Status::Unknown)
            }
        }
    }

    fn ensure_active(
        &self,
        store: &dyn Storage,
        env: &HostEnv,
        meter: &mut GasMeter,
        client_id: &ClientId,
        client_state: &ClientState,
    ) -> Result<(), ClientError> {
        let status = self.status(store, env, meter, client_id, client_state)?;
        ensure!(
            status.is_active(),
            ClientError::ClientNotActive {
                client_id: client_id.to_string(),
                status,
            }
        );
        Ok(())
    }

    /// The counterparty timestamp of the consensus state at `height`.
    ///
    /// # Errors
    /// Fails on a malformed identifier, a zero height, or an unknown client
    /// or height.
    pub fn timestamp_at_height(
        &self,
        store: &dyn Storage,
        env: &HostEnv,
        client_id: &str,
        height: Height,
    ) -> Result<u64, ClientError> {
        let client_id = parse_client_id(client_id)?;
        ensure!(
            !height.is_zero(),
            ClientError::InvalidHeight {
                reason: "height must be non-zero".to_string(),
            }
        );
        let client_state = load_client(store, &client_id)?;

        match &client_state.params {
            ClientParams::Attestor(_) => Ok(consensus_store::get(store, client_id.as_str(), height)?.timestamp),
            ClientParams::Wasm(params) => {
                let invocation = invocation(&client_id, params, env)?;
                let mut meter = GasMeter::new(self.config.gas.query_gas_limit);
                let TimestampAtHeightResult { timestamp } = self
                    .wasm
                    .query(
                        store,
                        &invocation,
                        &QueryMsg::TimestampAtHeight(TimestampAtHeightMsg { height: height.into() }),
                        self,
                        &mut meter,
                    )
                    .map_err(wasm_error(&client_id))?;
                Ok(timestamp)
            }
        }
    }

    /// Verifies that `value` is committed at `request.path` in the
    /// consensus state at `request.proof_height`.
    ///
    /// Proof gas is charged to `meter` once the inputs are valid and the
    /// consensus state is found, whether or not the proof verifies.
    ///
    /// # Errors
    /// Fails on a malformed identifier, an empty proof, a zero height, an
    /// empty path or value (checked in that order), an unknown client or
    /// height, an inactive client, gas exhaustion, or a proof that does not
    /// verify.
    pub fn verify_membership(
        &self,
        store: &dyn Storage,
        env: &HostEnv,
        meter: &mut GasMeter,
        request: &ProofRequest<'_>,
        value: &[u8],
    ) -> Result<(), ClientError> {
        self.verify(store, env, meter, request, Some(value))
    }

    /// Verifies that nothing is committed at `request.path` in the
    /// consensus state at `request.proof_height`.
    ///
    /// # Errors
    /// As [`Keeper::verify_membership`], without the value check.
    pub fn verify_non_membership(
        &self,
        store: &dyn Storage,
        env: &HostEnv,
        meter: &mut GasMeter,
        request: &ProofRequest<'_>,
    ) -> Result<(), ClientError> {
        self.verify(store, env, meter, request, None)
    }

    fn verify(
        &self,
        store: &dyn Storage,
        env: &HostEnv,
        meter: &mut GasMeter,
        request: &ProofRequest<'_>,
        value: Option<&[u8]>,
    ) -> Result<(), ClientError> {
        let client_id = parse_client_id(request.client_id)?;
        let ProofRequest {
            proof_height,
            proof,
            path,
            ..
        } = *request;
        let validated = match value {
            Some(value) => validate_membership(proof_height, proof, path, value),
            None => validate_non_membership(proof_height, proof, path),
        };
        validated.map_err(commitment_error(&client_id))?;

        let client_state = load_client(store, &client_id)?;
        self.ensure_active(store, env, meter, &client_id, &client_state)?;
        let consensus_state = consensus_store::get(store, client_id.as_str(), proof_height)?;

        // the commitment prefix is one more segment
        let cost = self.config.gas.proof.of(proof.len(), path.len() + 1);
        meter.consume(cost, "verify membership")?;

        match &client_state.params {
            ClientParams::Attestor(_) => match value {
                Some(value) => {
                    self.verifier
                        .verify_membership(&consensus_state.root, proof_height, proof, path, value)
                }
                None => self
                    .verifier
                    .verify_non_membership(&consensus_state.root, proof_height, proof, path),
            }
            .map_err(commitment_error(&client_id)),
            ClientParams::Wasm(params) => {
                let invocation = invocation(&client_id, params, env)?;
                let merkle_path = (&self.verifier.absolute_path(path)).into();
                let msg = match value {
                    Some(value) => QueryMsg::VerifyMembership(VerifyMembershipMsg {
                        height: proof_height.into(),
                        delay_time_period: 0,
                        delay_block_period: 0,
                        proof: Binary::from(proof),
                        merkle_path,
                        value: Binary::from(value),
                    }),
                    None => QueryMsg::VerifyNonMembership(VerifyNonMembershipMsg {
                        height: proof_height.into(),
                        delay_time_period: 0,
                        delay_block_period: 0,
                        proof: Binary::from(proof),
                        merkle_path,
                    }),
                };
                let EmptyResult {} = self
                    .wasm
                    .query(store, &invocation, &msg, self, meter)
                    .map_err(wasm_error(&client_id))?;
                Ok(())
            }
        }
    }

    /// Applies a counterparty upgrade.
    ///
    /// The counterparty commits the upgraded client state with every
    /// non-identity field zeroed, so the proof is checked against the
    /// zeroed form of `upgrade.client_state`. Trust settings are kept from
    /// the current state.
    ///
    /// # Errors
    /// Fails on empty proofs, invalid states, a changed client type, an
    /// inactive client, a latest height that does not increase, an unknown
    /// consensus state, gas exhaustion, or a proof that does not verify.
    pub fn upgrade_client(
        &self,
        store: &mut dyn Storage,
        env: &HostEnv,
        meter: &mut GasMeter,
        client_id: &str,
        upgrade: ClientUpgrade,
    ) -> Result<(), ClientError> {
        let client_id = parse_client_id(client_id)?;
        let ClientUpgrade {
            client_state: upgraded,
            consensus_state,
            proof_upgrade_client,
            proof_upgrade_consensus_state,
        } = upgrade;
        let invalid = |reason: String| ClientError::InvalidUpgrade {
            client_id: client_id.to_string(),
            reason,
        };
        ensure!(
            !proof_upgrade_client.is_empty() && !proof_upgrade_consensus_state.is_empty(),
            invalid("upgrade proofs cannot be empty".to_string())
        );
        upgraded.validate_upgrade()?;
        if let Some(reason) = consensus_state.invalid_reason() {
            return Err(ClientError::InvalidConsensusState {
                reason: reason.to_string(),
            });
        }

        let client_state = load_client(store, &client_id)?;
        ensure!(
            upgraded.client_type() == client_state.client_type(),
            invalid(format!(
                "client type cannot change from `{}` to `{}`",
                client_state.client_type(),
                upgraded.client_type()
            ))
        );
        self.ensure_active(store, env, meter, &client_id, &client_state)?;
        ensure!(
            upgraded.latest_height > client_state.latest_height,
            invalid(format!(
                "upgraded height {} must exceed the current height {}",
                upgraded.latest_height, client_state.latest_height
            ))
        );

        let writes = match &client_state.params {
            ClientParams::Attestor(_) => {
                let root = consensus_store::get(store, client_id.as_str(), client_state.latest_height)?.root;
                let (client_path, consensus_path) =
                    upgrade_paths(client_id.as_str(), &client_state.upgrade_path, client_state.latest_height)?;
                let proof_cost = &self.config.gas.proof;
                meter.consume(
                    proof_cost
                        .of(proof_upgrade_client.len(), client_path.len())
                        .saturating_add(proof_cost.of(proof_upgrade_consensus_state.len(), consensus_path.len())),
                    "verify upgrade",
                )?;

                self.verifier
                    .verify_membership_at(
                        &root,
                        &proof_upgrade_client,
                        &client_path,
                        &encode_client_state(&upgraded.zeroed())?,
                    )
                    .map_err(commitment_error(&client_id))?;
                self.verifier
                    .verify_membership_at(
                        &root,
                        &proof_upgrade_consensus_state,
                        &consensus_path,
                        &encode_consensus_state(&consensus_state)?,
                    )
                    .map_err(commitment_error(&client_id))?;

                let new_state = client_state.upgraded_to(&upgraded);
                let mut cache = CacheStorage::new(&*store);
                cache.set(&keys::client_state(client_id.as_str()), &encode_client_state(&new_state)?);
                consensus_store::put(&mut cache, client_id.as_str(), new_state.latest_height, &consensus_state)?;
                cache.into_writes()
            }
            ClientParams::Wasm(params) => {
                let invocation = invocation(&client_id, params, env)?;
                let msg = SudoMsg::VerifyUpgradeAndUpdateState(VerifyUpgradeAndUpdateStateMsg {
                    upgrade_client_state: encode_client_state(&upgraded)?.into(),
                    upgrade_consensus_state: encode_consensus_state(&consensus_state)?.into(),
                    proof_upgrade_client: proof_upgrade_client.into(),
                    proof_upgrade_consensus_state: proof_upgrade_consensus_state.into(),
                });
                let (EmptyResult {}, upgrade_writes) = self
                    .wasm
                    .sudo(&*store, &invocation, &msg, self, meter)
                    .map_err(wasm_error(&client_id))?;
                let mut cache = CacheStorage::new(&*store);
                commit_guarded(&mut cache, client_id.as_str(), upgrade_writes, &[])?;
                cache.into_writes()
            }
        };
        writes.commit(store);

        tracing::info!(%client_id, height = %upgraded.latest_height, "upgraded client");
        Ok(())
    }
}

fn parse_client_id(client_id: &str) -> Result<ClientId, ClientError> {
    Ok(client_id.parse::<ClientId>()?)
}

fn load_client(store: &dyn Storage, client_id: &ClientId) -> Result<ClientState, ClientError> {
    let key = keys::client_state(client_id.as_str());
    let bytes = store.get(&key).ok_or_else(|| ClientError::ClientNotFound {
        client_id: client_id.to_string(),
    })?;
    decode_client_state(&key, &bytes)
}

fn next_client_sequence(store: &dyn Storage) -> Result<u64, ClientError> {
    store.get(keys::NEXT_CLIENT_SEQUENCE).map_or(Ok(0), |bytes| {
        <[u8; 8]>::try_from(bytes.as_slice())
            .map(u64::from_be_bytes)
            .map_err(|_| ClientError::corrupt(keys::NEXT_CLIENT_SEQUENCE, "expected a big endian u64"))
    })
}

fn freeze(
    store: &mut dyn Storage,
    client_id: &ClientId,
    client_state: &ClientState,
    height: Height,
) -> Result<UpdateResult, ClientError> {
    let frozen = ClientState {
        frozen_height: height,
        ..client_state.clone()
    };
    store.set(&keys::client_state(client_id.as_str()), &encode_client_state(&frozen)?);
    Ok(UpdateResult::Frozen(height))
}

fn invocation(client_id: &ClientId, params: &WasmParams, env: &HostEnv) -> Result<Invocation, ClientError> {
    Ok(Invocation::new(client_id, params.checksum()?, env.clone()))
}

fn wasm_error(client_id: &ClientId) -> impl Fn(WasmError) -> ClientError + '_ {
    move |source| ClientError::Wasm {
        client_id: client_id.to_string(),
        source,
    }
}

fn commitment_error(client_id: &ClientId) -> impl Fn(CommitmentError) -> ClientError + '_ {
    move |source| ClientError::Commitment {
        client_id: client_id.to_string(),
        source,
    }
}

