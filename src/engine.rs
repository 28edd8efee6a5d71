use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::EngineError;
use crate::root_tracker::MerkleRootTracker;
use crate::types::{IdCommitment, MembershipIndex, MerkleNode, RateLimitProof};

/// Zero-knowledge membership engine: owns the Merkle tree and the proof system.
///
/// Members are appended at the next free leaf; there is no explicit index
/// parameter, so every participant must insert the same members in the same
/// order to reach the same roots.
pub trait MembershipEngine {
    /// Append `commitment` and return the leaf index it was assigned.
    fn insert_member(&mut self, commitment: &IdCommitment) -> Result<MembershipIndex, EngineError>;

    /// Root of the tree in its current state.
    fn merkle_root(&self) -> Result<MerkleNode, EngineError>;

    /// Verify `proof` against `signal`. `Ok(false)` is a definitive rejection;
    /// `Err` means the check could not be carried out.
    fn verify(&self, proof: &RateLimitProof, signal: &[u8]) -> Result<bool, EngineError>;

    /// Whether the sender behind `proof` went over its message rate for the
    /// proof's epoch, judged from the nullifier and shares. Implementations
    /// record the proof as seen.
    fn rate_exceeded(&self, proof: &RateLimitProof) -> Result<bool, EngineError>;
}

/// Engine handle shared by the group manager (writer) and the validator (reader).
pub type SharedEngine<E> = Arc<RwLock<E>>;

/// Root window handle shared the same way.
pub type SharedRoots = Arc<RwLock<MerkleRootTracker>>;
