//! ICS-23 membership and non-membership verification

use ibc_client_host_types::{ensure, Height, MerklePath as HostMerklePath};
use ibc_core_commitment_types::{
    commitment::CommitmentRoot,
    merkle::{MerklePath, MerkleProof},
    proto::ics23::HostFunctionsManager,
    specs::ProofSpecs,
};
use ibc_core_host_types::path::PathBytes;
use ibc_proto::ibc::core::commitment::v1::MerkleProof as RawMerkleProof;
use prost::Message;

use crate::error::CommitmentError;

/// Verifies proofs for paths relative to a counterparty commitment prefix.
///
/// Verification is a pure function of its inputs and never touches storage.
#[derive(Clone, Debug)]
pub struct MerkleVerifier {
    prefix: Vec<u8>,
    specs: ProofSpecs,
}

impl MerkleVerifier {
    /// A verifier over the Cosmos SDK proof specs using `prefix` as the store key.
    #[must_use]
    pub fn new(prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
            specs: ProofSpecs::cosmos(),
        }
    }

    /// The commitment prefix applied to every relative path.
    #[must_use]
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// The path actually committed for `path`.
    #[must_use]
    pub fn absolute_path(&self, path: &HostMerklePath) -> HostMerklePath {
        path.with_prefix(&self.prefix)
    }

    /// Verifies that `value` is stored at `path` under `root`.
    ///
    /// # Errors
    /// Fails on an empty proof, a zero height, an empty path or an empty
    /// value (checked in that order), and when the proof does not verify.
    pub fn verify_membership(
        &self,
        root: &[u8],
        proof_height: Height,
        proof: &[u8],
        path: &HostMerklePath,
        value: &[u8],
    ) -> Result<(), CommitmentError> {
        validate_membership(proof_height, proof, path, value)?;
        self.verify_membership_at(root, proof, &self.absolute_path(path), value)
    }

    /// Verifies that nothing is stored at `path` under `root`.
    ///
    /// # Errors
    /// Fails on an empty proof, a zero height or an empty path, and when the
    /// proof does not verify.
    pub fn verify_non_membership(
        &self,
        root: &[u8],
        proof_height: Height,
        proof: &[u8],
        path: &HostMerklePath,
    ) -> Result<(), CommitmentError> {
        validate_non_membership(proof_height, proof, path)?;
        ensure!(!root.is_empty(), CommitmentError::EmptyRoot);

        let merkle_proof = decode_proof(proof)?;
        merkle_proof
            .verify_non_membership::<HostFunctionsManager>(
                &self.specs,
                CommitmentRoot::from_bytes(root).into(),
                to_ibc_path(&self.absolute_path(path)),
            )
            .map_err(|err| CommitmentError::VerificationFailed {
                kind: "non-membership",
                reason: err.to_string(),
            })?;

        tracing::debug!(path = ?path.key_path, "verified non-membership");
        Ok(())
    }

    /// Verifies membership for an already absolute `path`, bypassing the
    /// commitment prefix. Upgrade paths name their own store key.
    ///
    /// # Errors
    /// Fails on empty inputs and when the proof does not verify.
    pub fn verify_membership_at(
        &self,
        root: &[u8],
        proof: &[u8],
        path: &HostMerklePath,
        value: &[u8],
    ) -> Result<(), CommitmentError> {
        ensure!(!proof.is_empty(), CommitmentError::EmptyProof);
        ensure!(!path.is_empty(), CommitmentError::EmptyMerklePath);
        ensure!(!value.is_empty(), CommitmentError::EmptyValue);
        ensure!(!root.is_empty(), CommitmentError::EmptyRoot);

        let merkle_proof = decode_proof(proof)?;
        merkle_proof
            .verify_membership::<HostFunctionsManager>(
                &self.specs,
                CommitmentRoot::from_bytes(root).into(),
                to_ibc_path(path),
                value.to_vec(),
                0,
            )
            .map_err(|err| CommitmentError::VerificationFailed {
                kind: "membership",
                reason: err.to_string(),
            })?;

        tracing::debug!(path = ?path.key_path, "verified membership");
        Ok(())
    }
}

/// Input checks for a membership proof, in the order callers observe them.
///
/// # Errors
/// The first failing precondition.
pub fn validate_membership(
    proof_height: Height,
    proof: &[u8],
    path: &HostMerklePath,
    value: &[u8],
) -> Result<(), CommitmentError> {
    validate_non_membership(proof_height, proof, path)?;
    ensure!(!value.is_empty(), CommitmentError::EmptyValue);
    Ok(())
}

/// Input checks for a non-membership proof.
///
/// # Errors
/// The first failing precondition.
pub fn validate_non_membership(
    proof_height: Height,
    proof: &[u8],
    path: &HostMerklePath,
) -> Result<(), CommitmentError> {
    ensure!(!proof.is_empty(), CommitmentError::EmptyProof);
    ensure!(!proof_height.is_zero(), CommitmentError::ZeroProofHeight);
    ensure!(!path.is_empty(), CommitmentError::EmptyMerklePath);
    Ok(())
}

fn decode_proof(proof: &[u8]) -> Result<MerkleProof, CommitmentError> {
    let raw = RawMerkleProof::decode(proof).map_err(CommitmentError::DecodeProof)?;
    MerkleProof::try_from(raw).map_err(|err| CommitmentError::VerificationFailed {
        kind: "membership",
        reason: err.to_string(),
    })
}

fn to_ibc_path(path: &HostMerklePath) -> MerklePath {
    MerklePath::new(
        path.key_path
            .iter()
            .map(|segment| PathBytes::from_bytes(segment.as_slice()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::CommitmentTree;

    const HEIGHT: Height = Height::new(0, 10);

    fn relative(key: &[u8]) -> HostMerklePath {
        HostMerklePath::new([key.to_vec()])
    }

    fn tree() -> CommitmentTree {
        CommitmentTree::new(b"ibc")
            .with_entry(b"clients/a/clientState", b"state-a")
            .with_entry(b"clients/b/clientState", b"state-b")
    }

    #[test]
    fn verifies_membership_of_each_entry() {
        let tree = tree();
        let verifier = MerkleVerifier::new("ibc");
        for (key, value) in [
            (b"clients/a/clientState".as_slice(), b"state-a".as_slice()),
            (b"clients/b/clientState".as_slice(), b"state-b".as_slice()),
        ] {
            verifier
                .verify_membership(&tree.root(), HEIGHT, &tree.membership_proof(key), &relative(key), value)
                .unwrap();
        }
    }

    #[test]
    fn membership_is_deterministic() {
        let tree = tree();
        let verifier = MerkleVerifier::new("ibc");
        let key = b"clients/a/clientState";
        let proof = tree.membership_proof(key);
        let first = verifier.verify_membership(&tree.root(), HEIGHT, &proof, &relative(key), b"state-a");
        let second = verifier.verify_membership(&tree.root(), HEIGHT, &proof, &relative(key), b"state-a");
        assert!(first.is_ok() && second.is_ok());

        let first = verifier.verify_membership(&tree.root(), HEIGHT, &proof, &relative(key), b"forged");
        let second = verifier.verify_membership(&tree.root(), HEIGHT, &proof, &relative(key), b"forged");
        assert_eq!(first.unwrap_err().to_string(), second.unwrap_err().to_string());
    }

    #[rstest::rstest]
    #[case::wrong_value(b"clients/a/clientState".as_slice(), b"forged".as_slice(), "ibc")]
    #[case::wrong_key(b"clients/b/clientState".as_slice(), b"state-a".as_slice(), "ibc")]
    #[case::wrong_prefix(b"clients/a/clientState".as_slice(), b"state-a".as_slice(), "other")]
    fn rejects_mismatched_claims(#[case] key: &[u8], #[case] value: &[u8], #[case] prefix: &str) {
        let tree = tree();
        let proof = tree.membership_proof(b"clients/a/clientState");
        let err = MerkleVerifier::new(prefix)
            .verify_membership(&tree.root(), HEIGHT, &proof, &relative(key), value)
            .unwrap_err();
        assert!(matches!(err, CommitmentError::VerificationFailed { .. }), "{err}");
    }

    #[test]
    fn rejects_wrong_root() {
        let tree = tree();
        let key = b"clients/a/clientState";
        let err = MerkleVerifier::new("ibc")
            .verify_membership(&[0xab; 32], HEIGHT, &tree.membership_proof(key), &relative(key), b"state-a")
            .unwrap_err();
        assert!(matches!(err, CommitmentError::VerificationFailed { .. }));
    }

    #[rstest::rstest]
    #[case::empty_proof(vec![], HEIGHT, relative(b"k"), b"v".to_vec(), "empty proof")]
    #[case::zero_height(vec![1], Height::zero(), relative(b"k"), b"v".to_vec(), "proof height must be non-zero")]
    #[case::empty_path(vec![1], HEIGHT, HostMerklePath::default(), b"v".to_vec(), "empty merkle path")]
    #[case::empty_value(vec![1], HEIGHT, relative(b"k"), vec![], "empty value")]
    fn membership_preconditions(
        #[case] proof: Vec<u8>,
        #[case] height: Height,
        #[case] path: HostMerklePath,
        #[case] value: Vec<u8>,
        #[case] expected: &str,
    ) {
        let err = MerkleVerifier::new("ibc")
            .verify_membership(&[1; 32], height, &proof, &path, &value)
            .unwrap_err();
        assert_eq!(err.to_string(), expected);
        assert_eq!(err.kind(), ibc_client_host_types::ErrorKind::InvalidArgument);
    }

    #[test]
    fn rejects_undecodable_proof() {
        let err = MerkleVerifier::new("ibc")
            .verify_membership(&[1; 32], HEIGHT, &[0xff, 0xff, 0xff], &relative(b"k"), b"v")
            .unwrap_err();
        assert!(matches!(err, CommitmentError::DecodeProof(_)));
    }

    #[test]
    fn verifies_non_membership_outside_stored_range() {
        let tree = tree();
        let verifier = MerkleVerifier::new("ibc");
        for absent in [b"clients/z/clientState".as_slice(), b"aaa".as_slice()] {
            verifier
                .verify_non_membership(&tree.root(), HEIGHT, &tree.non_membership_proof(absent), &relative(absent))
                .unwrap();
        }
    }

    #[test]
    fn non_membership_proof_does_not_prove_present_key() {
        let tree = tree();
        let present = b"clients/b/clientState";
        let proof = tree.non_membership_proof(b"clients/z/clientState");
        let err = MerkleVerifier::new("ibc")
            .verify_non_membership(&tree.root(), HEIGHT, &proof, &relative(present))
            .unwrap_err();
        assert_eq!(err.kind(), ibc_client_host_types::ErrorKind::Unauthenticated);
    }

    #[test]
    fn membership_proof_is_not_a_non_membership_proof() {
        let tree = tree();
        let key = b"clients/a/clientState";
        let err = MerkleVerifier::new("ibc")
            .verify_non_membership(&tree.root(), HEIGHT, &tree.membership_proof(key), &relative(key))
            .unwrap_err();
        assert!(matches!(err, CommitmentError::VerificationFailed { .. }));
    }

    #[test]
    fn absolute_paths_skip_the_prefix() {
        let tree = CommitmentTree::new(b"upgrade").with_entry(b"upgradedIBCState/10/upgradedClient", b"client");
        let path = HostMerklePath::new([b"upgrade".to_vec(), b"upgradedIBCState/10/upgradedClient".to_vec()]);
        MerkleVerifier::new("ibc")
            .verify_membership_at(
                &tree.root(),
                &tree.membership_proof(b"upgradedIBCState/10/upgradedClient"),
                &path,
                b"client",
            )
            .unwrap();
    }
}
