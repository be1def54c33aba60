//! Packing of stored states into protobuf `Any`s with JSON values

use ibc_client_host_types::ConsensusState;
use ibc_proto::google::protobuf::Any;
use prost::Message;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    client_state::{ClientParams, ClientState},
    error::ClientError,
};

/// Type URL of attestor client states.
pub const ATTESTOR_CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.attestor.v1.ClientState";
/// Type URL of wasm client states.
pub const WASM_CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.wasm.v1.ClientState";
/// Type URL of consensus states.
pub const CONSENSUS_STATE_TYPE_URL: &str = "/ibc.lightclients.host.v1.ConsensusState";

fn pack(type_url: &str, value: &impl Serialize) -> Result<Vec<u8>, ClientError> {
    let value = serde_json::to_vec(value).map_err(ClientError::Serialize)?;
    Ok(Any {
        type_url: type_url.to_string(),
        value,
    }
    .encode_to_vec())
}

fn unpack<T: DeserializeOwned>(key: &[u8], bytes: &[u8], type_url: &str) -> Result<T, ClientError> {
    let any = Any::decode(bytes).map_err(|err| ClientError::corrupt(key, err))?;
    if any.type_url != type_url {
        return Err(ClientError::corrupt(
            key,
            format!("unexpected type url `{}`", any.type_url),
        ));
    }
    serde_json::from_slice(&any.value).map_err(|err| ClientError::corrupt(key, err))
}

const fn client_state_type_url(client_state: &ClientState) -> &'static str {
    match client_state.params {
        ClientParams::Attestor(_) => ATTESTOR_CLIENT_STATE_TYPE_URL,
        ClientParams::Wasm(_) => WASM_CLIENT_STATE_TYPE_URL,
    }
}

/// Packs a client state.
///
/// # Errors
/// Fails if the state cannot be serialized.
pub fn encode_client_state(client_state: &ClientState) -> Result<Vec<u8>, ClientError> {
    pack(client_state_type_url(client_state), client_state)
}

/// Unpacks a client state read from `key`.
///
/// # Errors
/// Fails with [`ClientError::Corrupt`] if the bytes are not a packed client state.
pub fn decode_client_state(key: &[u8], bytes: &[u8]) -> Result<ClientState, ClientError> {
    let any = Any::decode(bytes).map_err(|err| ClientError::corrupt(key, err))?;
    let client_state: ClientState =
        serde_json::from_slice(&any.value).map_err(|err| ClientError::corrupt(key, err))?;
    if any.type_url != client_state_type_url(&client_state) {
        return Err(ClientError::corrupt(
            key,
            format!("type url `{}` does not match the client params", any.type_url),
        ));
    }
    Ok(client_state)
}

/// Packs a consensus state.
///
/// # Errors
/// Fails if the state cannot be serialized.
pub fn encode_consensus_state(consensus_state: &ConsensusState) -> Result<Vec<u8>, ClientError> {
    pack(CONSENSUS_STATE_TYPE_URL, consensus_state)
}

/// Unpacks a consensus state read from `key`.
///
/// # Errors
/// Fails with [`ClientError::Corrupt`] if the bytes are not a packed consensus state.
pub fn decode_consensus_state(key: &[u8], bytes: &[u8]) -> Result<ConsensusState, ClientError> {
    unpack(key, bytes, CONSENSUS_STATE_TYPE_URL)
}
