//! Stargate queries verification code may issue back into the keeper
//!
//! Handlers run on the branch of the invocation that issued them, so a
//! re-entrant verification observes that invocation's speculative writes.

use cosmwasm_std::{Binary, Storage};
use ibc_client_host_types::{GasMeter, Height, HostEnv, MerklePath};
use ibc_client_host_wasm::{registry, QuerierError, StargateRouter, WasmEngine};
use prost::Message;

use crate::{
    error::ClientError,
    keeper::{Keeper, ProofRequest},
    proto::{
        QueryChecksumsRequest, QueryChecksumsResponse, QueryClientStatusRequest, QueryClientStatusResponse,
        QueryVerifyMembershipRequest, QueryVerifyMembershipResponse, CHECKSUMS_PATH, CLIENT_STATUS_PATH,
        VERIFY_MEMBERSHIP_PATH,
    },
};

impl<E: WasmEngine> StargateRouter for Keeper<E> {
    fn route(
        &self,
        path: &str,
        data: &[u8],
        store: &dyn Storage,
        env: &HostEnv,
        meter: &mut GasMeter,
    ) -> Result<Binary, QuerierError> {
        let response = match path {
            VERIFY_MEMBERSHIP_PATH => {
                let request: QueryVerifyMembershipRequest = decode(path, data)?;
                let merkle_path = MerklePath::new(request.merkle_path.unwrap_or_default().key_path);
                let proof_request = ProofRequest {
                    client_id: &request.client_id,
                    proof_height: request.proof_height.map(Height::from).unwrap_or_default(),
                    proof: &request.proof,
                    path: &merkle_path,
                };
                self.verify_membership(store, env, meter, &proof_request, &request.value)
                    .map_err(|err| failed(path, err))?;
                QueryVerifyMembershipResponse { success: true }.encode_to_vec()
            }
            CLIENT_STATUS_PATH => {
                let request: QueryClientStatusRequest = decode(path, data)?;
                let status = self
                    .client_status_metered(store, env, meter, &request.client_id)
                    .map_err(|err| failed(path, err))?;
                QueryClientStatusResponse {
                    status: status.to_string(),
                }
                .encode_to_vec()
            }
            CHECKSUMS_PATH => {
                let QueryChecksumsRequest {} = decode(path, data)?;
                let checksums = registry::checksums(store).map_err(|err| QuerierError::Failed {
                    path: path.to_string(),
                    reason: err.to_string(),
                })?;
                QueryChecksumsResponse {
                    checksums: checksums.iter().map(|checksum| checksum.to_hex()).collect(),
                }
                .encode_to_vec()
            }
            _ => {
                return Err(QuerierError::NoRoute {
                    path: path.to_string(),
                })
            }
        };
        Ok(response.into())
    }
}

fn decode<M: Message + Default>(path: &str, data: &[u8]) -> Result<M, QuerierError> {
    M::decode(data).map_err(|err| QuerierError::InvalidRequest {
        path: path.to_string(),
        reason: err.to_string(),
    })
}

fn failed(path: &str, err: ClientError) -> QuerierError {
    match err {
        ClientError::OutOfGas(out_of_gas) => QuerierError::OutOfGas(out_of_gas),
        err => QuerierError::Failed {
            path: path.to_string(),
            reason: err.to_string(),
        },
    }
}
