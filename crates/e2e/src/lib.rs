//! End-to-end harness for the RLN relay core
//!
//! Provides a deterministic in-memory [`MembershipEngine`] and a toy prover so
//! the full bootstrap → insert → validate pipeline can be exercised without a
//! zero-knowledge backend. Roots are a SHA3 hash chain over inserted
//! commitments; a "proof" binds the signal and root by hash; the rate check is
//! a per-epoch nullifier log.

#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rln_relay::{
    EngineError, Epoch, IdCommitment, IdSecret, IdentityCredential, MembershipEngine,
    MembershipIndex, MerkleNode, Nullifier, RateLimitProof, RlnIdentifier, ZkProof,
};
use sha3::{Digest, Sha3_256};

pub const TAG_EMPTY: &str = "rln.toy.empty";
pub const TAG_ROOT: &str = "rln.toy.root";
pub const TAG_COMMIT: &str = "rln.toy.commit";
pub const TAG_BIND: &str = "rln.toy.bind";
pub const TAG_SHARE: &str = "rln.toy.share";
pub const TAG_NULLIFIER: &str = "rln.toy.nullifier";

/// Domain-tagged SHA3-256 with length framing:
/// `SHA3_256( UTF8(tag) || Σ ( LE64(|p|) || p ) )`
#[must_use]
pub fn h_tag(tag: &str, parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(tag.as_bytes());
    for p in parts {
        hasher.update((p.len() as u64).to_le_bytes());
        hasher.update(p);
    }
    hasher.finalize().into()
}

/// Credential whose commitment is derived from a one-byte seed.
#[must_use]
pub fn credential(seed: u8) -> IdentityCredential {
    let secret = IdSecret([seed; 32]);
    IdentityCredential { secret, commitment: IdCommitment(h_tag(TAG_COMMIT, &[&secret.0])) }
}

/// Commitments of `seeds`, in order.
#[must_use]
pub fn group(seeds: &[u8]) -> Vec<IdCommitment> {
    seeds.iter().map(|s| credential(*s).commitment).collect()
}

/// In-memory engine recording every call the core makes.
pub struct RecordingEngine {
    leaves: Vec<IdCommitment>,
    root: MerkleNode,
    verify_calls: AtomicUsize,
    nullifier_log: Mutex<HashMap<(u64, Nullifier), (MerkleNode, MerkleNode)>>,
    /// Insertion attempt (0-based) that fails.
    pub fail_insert_at: Option<usize>,
    pub fail_root: bool,
    pub fail_verify: bool,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self {
            leaves: Vec::new(),
            root: MerkleNode(h_tag(TAG_EMPTY, &[])),
            verify_calls: AtomicUsize::new(0),
            nullifier_log: Mutex::new(HashMap::new()),
            fail_insert_at: None,
            fail_root: false,
            fail_verify: false,
        }
    }
}

impl RecordingEngine {
    /// Commitments in insertion order.
    #[must_use]
    pub fn leaves(&self) -> &[IdCommitment] {
        &self.leaves
    }

    #[must_use]
    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    /// Root the tree would have after inserting `members` into an empty engine.
    #[must_use]
    pub fn root_after(members: &[IdCommitment]) -> MerkleNode {
        members.iter().fold(MerkleNode(h_tag(TAG_EMPTY, &[])), |acc, m| {
            MerkleNode(h_tag(TAG_ROOT, &[&acc.0, &m.0]))
        })
    }
}

impl MembershipEngine for RecordingEngine {
    fn insert_member(&mut self, commitment: &IdCommitment) -> Result<MembershipIndex, EngineError> {
        if self.fail_insert_at == Some(self.leaves.len()) {
            return Err(EngineError::Insertion(format!("injected failure at leaf {}", self.leaves.len())));
        }
        self.root = MerkleNode(h_tag(TAG_ROOT, &[&self.root.0, &commitment.0]));
        self.leaves.push(*commitment);
        Ok(self.leaves.len() as u64 - 1)
    }

    fn merkle_root(&self) -> Result<MerkleNode, EngineError> {
        if self.fail_root {
            return Err(EngineError::Root("injected failure".into()));
        }
        Ok(self.root)
    }

    fn verify(&self, proof: &RateLimitProof, signal: &[u8]) -> Result<bool, EngineError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_verify {
            return Err(EngineError::Verification("injected failure".into()));
        }
        let expected = h_tag(TAG_BIND, &[&proof.merkle_root.0, &proof.epoch.0, signal]);
        Ok(proof.proof.0[..32] == expected)
    }

    fn rate_exceeded(&self, proof: &RateLimitProof) -> Result<bool, EngineError> {
        let mut log = self.nullifier_log.lock();
        let key = (proof.epoch.as_u64(), proof.nullifier);
        match log.get(&key) {
            // Same nullifier, same shares: the same message seen again.
            Some((x, y)) => Ok(*x != proof.share_x || *y != proof.share_y),
            None => {
                log.insert(key, (proof.share_x, proof.share_y));
                Ok(false)
            }
        }
    }
}

/// Builds proofs the [`RecordingEngine`] accepts.
pub struct ToyProver {
    pub credential: IdentityCredential,
    pub rln_identifier: RlnIdentifier,
}

impl ToyProver {
    #[must_use]
    pub fn new(credential: IdentityCredential) -> Self {
        Self { credential, rln_identifier: RlnIdentifier([0x42; 32]) }
    }

    /// Proof over `signal` against `root` for `epoch`.
    #[must_use]
    pub fn prove(&self, signal: &[u8], root: MerkleNode, epoch: Epoch) -> RateLimitProof {
        let mut proof = [0u8; 128];
        proof[..32].copy_from_slice(&h_tag(TAG_BIND, &[&root.0, &epoch.0, signal]));
        let secret = &self.credential.secret.0;
        let share_x = h_tag(TAG_SHARE, &[signal]);
        RateLimitProof {
            proof: ZkProof(proof),
            merkle_root: root,
            epoch,
            share_x: MerkleNode(share_x),
            share_y: MerkleNode(h_tag(TAG_SHARE, &[secret, &epoch.0, &share_x])),
            nullifier: Nullifier(h_tag(TAG_NULLIFIER, &[secret, &epoch.0, &self.rln_identifier.0])),
            rln_identifier: self.rln_identifier,
        }
    }
}
