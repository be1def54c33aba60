//! A minimal counterparty commitment tree producing real ICS-23 proofs.
//!
//! The tree is an IAVL store of at most two entries under a single-store
//! multistore, which is enough to exercise membership, non-membership and
//! two distinct proofs against one shared root.

#![allow(clippy::missing_panics_doc, missing_docs)]

use std::collections::BTreeMap;

use ibc_core_commitment_types::proto::ics23::{
    commitment_proof::Proof, CommitmentProof, ExistenceProof, HashOp, InnerOp, LeafOp, LengthOp,
    NonExistenceProof,
};
use ibc_proto::ibc::core::commitment::v1::MerkleProof as RawMerkleProof;
use prost::Message;
use sha2::{Digest, Sha256};

/// height 0, size 1, version 1 as zigzag varints
const IAVL_LEAF_PREFIX: [u8; 3] = [0x00, 0x02, 0x02];
/// height 1, size 2, version 1 as zigzag varints
const IAVL_INNER_HEADER: [u8; 3] = [0x02, 0x04, 0x02];
const HASH_LEN_PREFIX: u8 = 0x20;

#[derive(Clone, Debug)]
pub struct CommitmentTree {
    store_key: Vec<u8>,
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl CommitmentTree {
    #[must_use]
    pub fn new(store_key: &[u8]) -> Self {
        Self {
            store_key: store_key.to_vec(),
            entries: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_entry(mut self, key: &[u8], value: &[u8]) -> Self {
        assert!(
            self.entries.len() < 2 || self.entries.contains_key(key),
            "commitment tree holds at most two entries"
        );
        self.entries.insert(key.to_vec(), value.to_vec());
        self
    }

    /// The multistore root a light client would store as its commitment root.
    #[must_use]
    pub fn root(&self) -> Vec<u8> {
        leaf_hash(&store_leaf_op(), &self.store_key, &self.store_root())
    }

    #[must_use]
    pub fn membership_proof(&self, key: &[u8]) -> Vec<u8> {
        let index = self
            .entries
            .keys()
            .position(|k| k.as_slice() == key)
            .expect("key is not in the tree");
        self.encode(Proof::Exist(self.iavl_existence(index)))
    }

    #[must_use]
    pub fn non_membership_proof(&self, key: &[u8]) -> Vec<u8> {
        assert!(!self.entries.contains_key(key), "key is in the tree");
        let left = self.entries.keys().rposition(|k| k.as_slice() < key);
        let right = self.entries.keys().position(|k| k.as_slice() > key);
        self.encode(Proof::Nonexist(NonExistenceProof {
            key: key.to_vec(),
            left: left.map(|index| self.iavl_existence(index)),
            right: right.map(|index| self.iavl_existence(index)),
        }))
    }

    fn encode(&self, iavl_proof: Proof) -> Vec<u8> {
        let multistore = ExistenceProof {
            key: self.store_key.clone(),
            value: self.store_root(),
            leaf: Some(store_leaf_op()),
            path: vec![],
        };
        RawMerkleProof {
            proofs: vec![
                CommitmentProof {
                    proof: Some(iavl_proof),
                },
                CommitmentProof {
                    proof: Some(Proof::Exist(multistore)),
                },
            ],
        }
        .encode_to_vec()
    }

    fn leaf_hashes(&self) -> Vec<Vec<u8>> {
        self.entries
            .iter()
            .map(|(key, value)| leaf_hash(&iavl_leaf_op(), key, value))
            .collect()
    }

    fn store_root(&self) -> Vec<u8> {
        let leaves = self.leaf_hashes();
        match leaves.as_slice() {
            [only] => only.clone(),
            [left, right] => {
                let mut data = IAVL_INNER_HEADER.to_vec();
                data.push(HASH_LEN_PREFIX);
                data.extend_from_slice(left);
                data.push(HASH_LEN_PREFIX);
                data.extend_from_slice(right);
                Sha256::digest(&data).to_vec()
            }
            _ => panic!("commitment tree needs one or two entries"),
        }
    }

    fn iavl_existence(&self, index: usize) -> ExistenceProof {
        let (key, value) = self.entries.iter().nth(index).expect("index in range");
        let leaves = self.leaf_hashes();
        let path = match (leaves.len(), index) {
            (1, _) => vec![],
            (2, 0) => {
                let mut prefix = IAVL_INNER_HEADER.to_vec();
                prefix.push(HASH_LEN_PREFIX);
                let mut suffix = vec![HASH_LEN_PREFIX];
                suffix.extend_from_slice(&leaves[1]);
                vec![InnerOp {
                    hash: HashOp::Sha256 as i32,
                    prefix,
                    suffix,
                }]
            }
            _ => {
                let mut prefix = IAVL_INNER_HEADER.to_vec();
                prefix.push(HASH_LEN_PREFIX);
                prefix.extend_from_slice(&leaves[0]);
                prefix.push(HASH_LEN_PREFIX);
                vec![InnerOp {
                    hash: HashOp::Sha256 as i32,
                    prefix,
                    suffix: vec![],
                }]
            }
        };
        ExistenceProof {
            key: key.clone(),
            value: value.clone(),
            leaf: Some(iavl_leaf_op()),
            path,
        }
    }
}

fn iavl_leaf_op() -> LeafOp {
    LeafOp {
        hash: HashOp::Sha256 as i32,
        prehash_key: HashOp::NoHash as i32,
        prehash_value: HashOp::Sha256 as i32,
        length: LengthOp::VarProto as i32,
        prefix: IAVL_LEAF_PREFIX.to_vec(),
    }
}

fn store_leaf_op() -> LeafOp {
    LeafOp {
        prefix: vec![0x00],
        ..iavl_leaf_op()
    }
}

fn leaf_hash(op: &LeafOp, key: &[u8], value: &[u8]) -> Vec<u8> {
    let mut data = op.prefix.clone();
    data.extend(varint(key.len()));
    data.extend_from_slice(key);
    let value_hash = Sha256::digest(value);
    data.extend(varint(value_hash.len()));
    data.extend_from_slice(&value_hash);
    Sha256::digest(&data).to_vec()
}

fn varint(mut n: usize) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        // truncation keeps the low seven bits
        #[allow(clippy::cast_possible_truncation)]
        let byte = (n & 0x7f) as u8;
        n >>= 7;
        if n == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}
