//! Integration tests for counterparty upgrades of attestor clients

mod common;

use attestor_light_client::test_utils::{attestor_params, NOW};
use common::AttestorFixture;
use ibc_client_host_commitment::test_utils::CommitmentTree;
use ibc_client_host_keeper::{
    codec::{encode_client_state, encode_consensus_state},
    upgrade::{self, Plan},
    ClientError, ClientParams, ClientState, ClientUpgrade, QueryService,
};
use ibc_client_host_types::{ConsensusState, ErrorKind, GasMeter, Height, Status};

const CLIENT_KEY: &[u8] = b"upgradedIBCState/1/upgradedClient";
const CONSENSUS_KEY: &[u8] = b"upgradedIBCState/1/upgradedConsState";

fn upgraded_client_state() -> ClientState {
    ClientState {
        chain_id: "counterparty-2".to_string(),
        latest_height: Height::new(1, 1),
        params: ClientParams::Attestor(attestor_params(2)),
        ..common::attestor_client_state(Height::new(1, 1))
    }
}

fn upgraded_consensus_state() -> ConsensusState {
    ConsensusState::new(NOW, vec![9; 32])
}

/// The counterparty's upgrade store committing `client_state` and the
/// upgraded consensus state.
fn upgrade_tree(client_state: &ClientState) -> CommitmentTree {
    CommitmentTree::new(b"upgrade")
        .with_entry(CLIENT_KEY, &encode_client_state(&client_state.zeroed()).unwrap())
        .with_entry(CONSENSUS_KEY, &encode_consensus_state(&upgraded_consensus_state()).unwrap())
}

fn upgrade(tree: &CommitmentTree, client_state: ClientState) -> ClientUpgrade {
    ClientUpgrade {
        client_state,
        consensus_state: upgraded_consensus_state(),
        proof_upgrade_client: tree.membership_proof(CLIENT_KEY),
        proof_upgrade_consensus_state: tree.membership_proof(CONSENSUS_KEY),
    }
}

#[test]
fn upgrade_swaps_identity_and_keeps_trust_settings() {
    let tree = upgrade_tree(&upgraded_client_state());
    let mut fixture = AttestorFixture::with_root(&tree.root());

    // a relayer asking for a far longer trusting period
    let submitted = ClientState {
        trusting_period: 1_000_000,
        max_clock_drift: 1_000,
        ..upgraded_client_state()
    };
    let mut meter = GasMeter::infinite();
    fixture
        .keeper
        .upgrade_client(
            &mut fixture.store,
            &fixture.env,
            &mut meter,
            fixture.client_id.as_str(),
            upgrade(&tree, submitted),
        )
        .unwrap();
    assert!(meter.consumed() > 0);

    let client_state = fixture.keeper.client_state(&fixture.store, fixture.id()).unwrap();
    assert_eq!(client_state.chain_id, "counterparty-2");
    assert_eq!(client_state.latest_height, Height::new(1, 1));
    assert_eq!(client_state.trusting_period, common::TRUSTING_PERIOD);
    assert_eq!(client_state.max_clock_drift, common::MAX_CLOCK_DRIFT);
    assert_eq!(client_state.params, ClientParams::Attestor(attestor_params(2)));
    assert_eq!(
        fixture
            .keeper
            .timestamp_at_height(&fixture.store, &fixture.env, fixture.id(), Height::new(1, 1))
            .unwrap(),
        NOW
    );
    let status = fixture.keeper.client_status(&fixture.store, &fixture.env, fixture.id()).unwrap();
    assert_eq!(status, Status::Active);
}

#[test]
fn upgrade_accepts_the_committed_zero_trust_settings() {
    let tree = upgrade_tree(&upgraded_client_state());
    let mut fixture = AttestorFixture::with_root(&tree.root());

    let submitted = ClientState {
        trusting_period: 0,
        max_clock_drift: 0,
        ..upgraded_client_state()
    };
    fixture
        .keeper
        .upgrade_client(
            &mut fixture.store,
            &fixture.env,
            &mut GasMeter::infinite(),
            fixture.client_id.as_str(),
            upgrade(&tree, submitted),
        )
        .unwrap();

    let client_state = fixture.keeper.client_state(&fixture.store, fixture.id()).unwrap();
    assert_eq!(client_state.latest_height, Height::new(1, 1));
    assert_eq!(client_state.trusting_period, common::TRUSTING_PERIOD);
    assert_eq!(client_state.max_clock_drift, common::MAX_CLOCK_DRIFT);
    let status = fixture.keeper.client_status(&fixture.store, &fixture.env, fixture.id()).unwrap();
    assert_eq!(status, Status::Active);
}

#[test]
fn tampered_identity_fails_without_mutation() {
    let tree = upgrade_tree(&upgraded_client_state());
    let mut fixture = AttestorFixture::with_root(&tree.root());
    let before = common::dump(&fixture.store);

    let tampered = ClientState {
        params: ClientParams::Attestor(attestor_params(1)),
        ..upgraded_client_state()
    };
    let err = fixture
        .keeper
        .upgrade_client(
            &mut fixture.store,
            &fixture.env,
            &mut GasMeter::infinite(),
            fixture.client_id.as_str(),
            upgrade(&tree, tampered),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated, "{err}");
    assert_eq!(common::dump(&fixture.store), before);
}

#[test]
fn consensus_state_proof_must_verify_independently() {
    let tree = upgrade_tree(&upgraded_client_state());
    let mut fixture = AttestorFixture::with_root(&tree.root());
    let before = common::dump(&fixture.store);

    let mut request = upgrade(&tree, upgraded_client_state());
    request.consensus_state = ConsensusState::new(NOW + 1, vec![9; 32]);
    let err = fixture
        .keeper
        .upgrade_client(
            &mut fixture.store,
            &fixture.env,
            &mut GasMeter::infinite(),
            fixture.client_id.as_str(),
            request,
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated, "{err}");
    assert_eq!(common::dump(&fixture.store), before);
}

#[rstest::rstest]
#[case::empty_client_proof(|u: &mut ClientUpgrade| u.proof_upgrade_client.clear())]
#[case::empty_consensus_proof(|u: &mut ClientUpgrade| u.proof_upgrade_consensus_state.clear())]
#[case::height_not_increasing(|u: &mut ClientUpgrade| u.client_state.latest_height = Height::new(0, 1))]
#[case::frozen(|u: &mut ClientUpgrade| u.client_state.frozen_height = Height::new(0, 1))]
fn invalid_upgrades_are_rejected(#[case] corrupt: fn(&mut ClientUpgrade)) {
    let tree = upgrade_tree(&upgraded_client_state());
    let mut fixture = AttestorFixture::with_root(&tree.root());
    let mut request = upgrade(&tree, upgraded_client_state());
    corrupt(&mut request);

    let mut meter = GasMeter::infinite();
    let err = fixture
        .keeper
        .upgrade_client(
            &mut fixture.store,
            &fixture.env,
            &mut meter,
            fixture.client_id.as_str(),
            request,
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{err}");
    assert_eq!(meter.consumed(), 0);
}

#[test]
fn upgrade_requires_an_active_client() {
    let tree = upgrade_tree(&upgraded_client_state());
    let mut fixture = AttestorFixture::with_root(&tree.root());
    let expired = fixture.env.advanced_by(1, 2 * common::TRUSTING_PERIOD);
    let err = fixture
        .keeper
        .upgrade_client(
            &mut fixture.store,
            &expired,
            &mut GasMeter::infinite(),
            fixture.client_id.as_str(),
            upgrade(&tree, upgraded_client_state()),
        )
        .unwrap_err();
    assert!(matches!(err, ClientError::ClientNotActive { status: Status::Expired, .. }));
}

#[test]
fn planned_upgrade_states_are_queryable() {
    let mut fixture = AttestorFixture::new();
    upgrade::set_upgrade_plan(
        &mut fixture.store,
        &Plan {
            name: "v2".to_string(),
            height: 200,
        },
    )
    .unwrap();
    upgrade::set_upgraded_client_state(&mut fixture.store, 200, &upgraded_client_state()).unwrap();
    upgrade::set_upgraded_consensus_state(&mut fixture.store, 200, &upgraded_consensus_state()).unwrap();

    let service = QueryService::new(&fixture.keeper, &fixture.store, &fixture.env);
    let response = service.upgraded_client_state().unwrap();
    assert_eq!(
        response.upgraded_client_state.as_slice(),
        encode_client_state(&upgraded_client_state().zeroed()).unwrap()
    );
    let response = service
        .upgraded_consensus_state(Some(
            &ibc_client_host_keeper::query::QueryUpgradedConsensusStateRequest { height: 200 },
        ))
        .unwrap();
    assert_eq!(
        response.upgraded_consensus_state.as_slice(),
        encode_consensus_state(&upgraded_consensus_state()).unwrap()
    );

    upgrade::clear_upgrade_plan(&mut fixture.store).unwrap();
    let service = QueryService::new(&fixture.keeper, &fixture.store, &fixture.env);
    assert_eq!(service.upgraded_client_state().unwrap_err().kind(), ErrorKind::NotFound);
}
