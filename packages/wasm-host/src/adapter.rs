//! Drives verification code on an isolated branch of host state

use cosmwasm_std::{Addr, Binary, BlockInfo, Checksum, ContractInfo, Env, Storage};
use ibc_client_host_types::{
    ensure,
    storage::{PrefixedStorage, SharedBranch, StagedWrites},
    ClientId, GasMeter, HostEnv, OutOfGas,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::WasmConfig,
    engine::{EntryPoint, VmContext, WasmEngine},
    error::WasmError,
    msg::{InstantiateMsg, QueryMsg, SudoMsg},
    querier::{HostQuerier, QueryPlugins, StargateRouter},
    registry,
};

/// Identifies the client whose code is invoked and the environment it sees.
#[derive(Clone, Debug)]
pub struct Invocation {
    client_id: String,
    store_prefix: Vec<u8>,
    checksum: Checksum,
    env: HostEnv,
}

impl Invocation {
    /// An invocation of `checksum` on behalf of `client_id`.
    #[must_use]
    pub fn new(client_id: &ClientId, checksum: Checksum, env: HostEnv) -> Self {
        Self {
            client_id: client_id.to_string(),
            store_prefix: format!("clients/{client_id}/").into_bytes(),
            checksum,
            env,
        }
    }

    /// The key prefix of the client's store.
    #[must_use]
    pub fn store_prefix(&self) -> &[u8] {
        &self.store_prefix
    }

    /// The checksum of the invoked code.
    #[must_use]
    pub const fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    /// The host environment presented to the code.
    #[must_use]
    pub const fn env(&self) -> &HostEnv {
        &self.env
    }

    fn contract_env(&self) -> Env {
        Env {
            block: BlockInfo {
                height: self.env.block_height,
                time: self.env.block_time,
                chain_id: self.env.chain_id.clone(),
            },
            transaction: None,
            contract: ContractInfo {
                address: Addr::unchecked(&self.client_id),
            },
        }
    }
}

/// The host side of the 08-wasm light client.
pub struct WasmAdapter<E> {
    engine: E,
    config: WasmConfig,
    plugins: QueryPlugins,
}

impl<E: WasmEngine> WasmAdapter<E> {
    /// An adapter running code on `engine`, with no custom query handler.
    #[must_use]
    pub fn new(engine: E, config: WasmConfig) -> Self {
        Self {
            engine,
            config,
            plugins: QueryPlugins::default(),
        }
    }

    /// Replaces the query plugins.
    #[must_use]
    pub fn with_plugins(mut self, plugins: QueryPlugins) -> Self {
        self.plugins = plugins;
        self
    }

    /// The engine code runs on.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// The adapter configuration.
    #[must_use]
    pub const fn config(&self) -> &WasmConfig {
        &self.config
    }

    /// Stores `code`, returning its checksum.
    ///
    /// # Errors
    /// See [`registry::store_code`].
    pub fn store_code(&self, store: &mut dyn Storage, code: &[u8]) -> Result<Checksum, WasmError> {
        registry::store_code(&self.engine, &self.config, store, code)
    }

    /// Runs `instantiate` and returns the writes to commit.
    ///
    /// # Errors
    /// Fails if the code is unknown, errors, or exhausts its gas.
    pub fn instantiate(
        &self,
        store: &dyn Storage,
        invocation: &Invocation,
        msg: &InstantiateMsg,
        router: &dyn StargateRouter,
        meter: &mut GasMeter,
    ) -> Result<StagedWrites, WasmError> {
        let msg = to_json(msg)?;
        let (_, writes) = self.invoke(EntryPoint::Instantiate, store, invocation, &msg, router, meter)?;
        Ok(writes)
    }

    /// Runs a read-only query. Writes made by the code are discarded.
    ///
    /// # Errors
    /// Fails if the code is unknown, errors, or exhausts its gas, or if the
    /// response is not a `T`.
    pub fn query<T: DeserializeOwned>(
        &self,
        store: &dyn Storage,
        invocation: &Invocation,
        msg: &QueryMsg,
        router: &dyn StargateRouter,
        meter: &mut GasMeter,
    ) -> Result<T, WasmError> {
        let encoded = to_json(msg)?;
        let (response, discarded) = self.invoke(EntryPoint::Query, store, invocation, &encoded, router, meter)?;
        if !discarded.is_empty() {
            tracing::debug!(msg = msg.name(), keys = discarded.len(), "discarded query writes");
        }
        from_json(&response)
    }

    /// Runs a sudo call and returns its response with the writes to commit.
    ///
    /// # Errors
    /// Fails if the code is unknown, errors, or exhausts its gas, or if the
    /// response is not a `T`.
    pub fn sudo<T: DeserializeOwned>(
        &self,
        store: &dyn Storage,
        invocation: &Invocation,
        msg: &SudoMsg,
        router: &dyn StargateRouter,
        meter: &mut GasMeter,
    ) -> Result<(T, StagedWrites), WasmError> {
        let encoded = to_json(msg)?;
        let (response, writes) = self.invoke(EntryPoint::Sudo, store, invocation, &encoded, router, meter)?;
        Ok((from_json(&response)?, writes))
    }

    /// Runs `entry_point` on a fresh branch of `store`.
    ///
    /// The code reads and writes the client's prefixed view of the branch
    /// while its queries see the whole branch. Gas used by execution and by
    /// queries is charged to `meter` before any result is returned.
    fn invoke(
        &self,
        entry_point: EntryPoint,
        store: &dyn Storage,
        invocation: &Invocation,
        msg: &[u8],
        router: &dyn StargateRouter,
        meter: &mut GasMeter,
    ) -> Result<(Binary, StagedWrites), WasmError> {
        ensure!(
            registry::has_checksum(store, &invocation.checksum),
            WasmError::ChecksumNotFound {
                checksum: invocation.checksum.to_hex(),
            }
        );

        let gas_limit = meter.remaining().min(self.config.query_gas_limit);
        let branch = SharedBranch::new(store);
        let (outcome, querier_gas) = {
            let reader = branch.handle();
            let mut writer = branch.handle();
            let querier = HostQuerier::new(
                &self.plugins,
                &self.config,
                router,
                &reader,
                &invocation.env,
                gas_limit,
            );
            let mut client_store = PrefixedStorage::new(&mut writer, &invocation.store_prefix);
            let env = invocation.contract_env();
            let outcome = self.engine.call(
                entry_point,
                &invocation.checksum,
                msg,
                VmContext {
                    env: &env,
                    store: &mut client_store,
                    querier: &querier,
                    gas_limit,
                },
            );
            (outcome, querier.gas_consumed())
        };

        let gas_used = outcome.gas_used.saturating_add(querier_gas);
        tracing::debug!(
            entry_point = entry_point.as_str(),
            client_id = %invocation.client_id,
            checksum = %invocation.checksum,
            gas_used,
            ok = outcome.result.is_ok(),
            "invoked verification code"
        );

        let descriptor = format!("wasm {}", entry_point.as_str());
        meter.consume(gas_used, &descriptor)?;
        ensure!(
            gas_used <= gas_limit,
            WasmError::OutOfGas(OutOfGas {
                descriptor,
                limit: gas_limit,
                consumed: gas_used,
            })
        );

        let response = outcome.result.map_err(|source| WasmError::Vm {
            client_id: invocation.client_id.clone(),
            entry_point: entry_point.as_str(),
            source,
        })?;
        Ok((response, branch.into_writes()))
    }
}

fn to_json(msg: &impl Serialize) -> Result<Vec<u8>, WasmError> {
    serde_json::to_vec(msg).map_err(WasmError::SerializeMsg)
}

fn from_json<T: DeserializeOwned>(response: &[u8]) -> Result<T, WasmError> {
    serde_json::from_slice(response).map_err(WasmError::InvalidResponse)
}
