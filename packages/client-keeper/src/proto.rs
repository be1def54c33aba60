//! Protobuf messages of the stargate queries the host serves to
//! verification code
#![allow(missing_docs, clippy::derive_partial_eq_without_eq)]

use ibc_proto::ibc::core::client::v1::Height;

/// `/ibc.core.client.v1.Query/VerifyMembership`
pub const VERIFY_MEMBERSHIP_PATH: &str = "/ibc.core.client.v1.Query/VerifyMembership";
/// `/ibc.core.client.v1.Query/ClientStatus`
pub const CLIENT_STATUS_PATH: &str = "/ibc.core.client.v1.Query/ClientStatus";
/// `/ibc.lightclients.wasm.v1.Query/Checksums`
pub const CHECKSUMS_PATH: &str = "/ibc.lightclients.wasm.v1.Query/Checksums";

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MerklePath {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub key_path: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryVerifyMembershipRequest {
    #[prost(string, tag = "1")]
    pub client_id: String,
    #[prost(bytes = "vec", tag = "2")]
    pub proof: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub proof_height: Option<Height>,
    #[prost(message, optional, tag = "4")]
    pub merkle_path: Option<MerklePath>,
    #[prost(bytes = "vec", tag = "5")]
    pub value: Vec<u8>,
    #[prost(uint64, tag = "6")]
    pub time_delay: u64,
    #[prost(uint64, tag = "7")]
    pub block_delay: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryVerifyMembershipResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryClientStatusRequest {
    #[prost(string, tag = "1")]
    pub client_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryClientStatusResponse {
    #[prost(string, tag = "1")]
    pub status: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryChecksumsRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryChecksumsResponse {
    #[prost(string, repeated, tag = "1")]
    pub checksums: Vec<String>,
}
