//! Common fixtures for keeper integration tests
#![allow(dead_code)]

use attestor_light_client::test_utils::{attestor_params, header_message, NOW};
use cosmwasm_std::{MemoryStorage, Order, Storage};
use ibc_client_host_commitment::test_utils::CommitmentTree;
use ibc_client_host_types::{ClientId, ConsensusState, GasMeter, Height, HostEnv};
use ibc_client_host_wasm::mock::MockEngine;
use ibc_client_host_keeper::{ClientParams, ClientState, Keeper, KeeperConfig};

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;
pub const TRUSTING_PERIOD: u64 = 100;
pub const MAX_CLOCK_DRIFT: u64 = 10;

/// The committed counterparty key every fixture tree holds
pub const KEY: &[u8] = b"clients/07-tendermint-0/clientState";
pub const VALUE: &[u8] = b"counterparty client state";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Every entry of `store`, in key order.
pub fn dump(store: &dyn Storage) -> Vec<(Vec<u8>, Vec<u8>)> {
    store.range(None, None, Order::Ascending).collect()
}

/// The host at the fixture signing time
pub fn env() -> HostEnv {
    HostEnv::new("host-1", 100, NOW / NANOS_PER_SECOND)
}

pub fn tree() -> CommitmentTree {
    CommitmentTree::new(b"ibc").with_entry(KEY, VALUE)
}

pub fn attestor_client_state(latest_height: Height) -> ClientState {
    ClientState {
        chain_id: "counterparty-1".to_string(),
        trusting_period: TRUSTING_PERIOD,
        max_clock_drift: MAX_CLOCK_DRIFT,
        latest_height,
        frozen_height: Height::zero(),
        upgrade_path: vec!["upgrade".to_string(), "upgradedIBCState".to_string()],
        params: ClientParams::Attestor(attestor_params(3)),
    }
}

pub struct AttestorFixture {
    pub keeper: Keeper<MockEngine>,
    pub store: MemoryStorage,
    pub env: HostEnv,
    pub client_id: ClientId,
}

impl AttestorFixture {
    /// An attestor client with a genesis consensus state at (0, 1), one
    /// second before the host time, committing the fixture tree.
    pub fn new() -> Self {
        Self::with_root(&tree().root())
    }

    pub fn with_root(root: &[u8]) -> Self {
        init_tracing();
        let keeper = Keeper::new(KeeperConfig::default(), MockEngine::new());
        let env = env();
        let mut store = MemoryStorage::new();
        let client_id = keeper
            .create_client(
                &mut store,
                &env,
                &mut GasMeter::infinite(),
                attestor_client_state(Height::new(0, 1)),
                ConsensusState::new(NOW - NANOS_PER_SECOND, root.to_vec()),
            )
            .unwrap();
        Self {
            keeper,
            store,
            env,
            client_id,
        }
    }

    pub fn id(&self) -> &str {
        self.client_id.as_str()
    }

    /// Submits a header signed by three fixture attestors.
    pub fn update(
        &mut self,
        height: Height,
        timestamp: u64,
        root: &[u8],
    ) -> Result<ibc_client_host_keeper::UpdateResult, ibc_client_host_keeper::ClientError> {
        let message = header_message(height, timestamp, root, 3);
        self.keeper.update_client(
            &mut self.store,
            &self.env,
            &mut GasMeter::infinite(),
            self.client_id.as_str(),
            &message,
        )
    }
}
