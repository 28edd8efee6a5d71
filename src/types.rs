use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;

use subtle::ConstantTimeEq;

use crate::constants::{HASH_LEN, PROOF_LEN};
use crate::errors::DecodeError;

/// Leaf position in the membership tree. Assigned by the engine at insertion.
pub type MembershipIndex = u64;

// Fixed-size newtypes prevent mixing up same-width fields
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)] pub struct MerkleNode(pub [u8; HASH_LEN]);
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)] pub struct IdCommitment(pub [u8; HASH_LEN]);
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)] pub struct Epoch(pub [u8; HASH_LEN]);
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)] pub struct Nullifier(pub [u8; HASH_LEN]);
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)] pub struct RlnIdentifier(pub [u8; HASH_LEN]);
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)] pub struct ZkProof(pub [u8; PROOF_LEN]);
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)] pub struct IdSecret(pub [u8; HASH_LEN]);

// Exact-sized decode helpers
macro_rules! impl_tryfrom_slice {
    ($t:ty, $len:expr, $name:literal) => {
        impl TryFrom<&[u8]> for $t {
            type Error = DecodeError;
            fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
                if b.len() != $len {
                    return Err(DecodeError::InvalidLength { field: $name, expected: $len, got: b.len() });
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(b);
                Ok(Self(arr))
            }
        }
    }
}
impl_tryfrom_slice!(MerkleNode, HASH_LEN, "merkle_node");
impl_tryfrom_slice!(IdCommitment, HASH_LEN, "id_commitment");
impl_tryfrom_slice!(Epoch, HASH_LEN, "epoch");
impl_tryfrom_slice!(Nullifier, HASH_LEN, "nullifier");
impl_tryfrom_slice!(RlnIdentifier, HASH_LEN, "rln_identifier");
impl_tryfrom_slice!(ZkProof, PROOF_LEN, "proof");
impl_tryfrom_slice!(IdSecret, HASH_LEN, "id_secret");

// Hex text form for values that show up in config files and logs
macro_rules! impl_hex {
    ($t:ty) => {
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl FromStr for $t {
            type Err = DecodeError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let digits = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(digits)?;
                Self::try_from(bytes.as_slice())
            }
        }
    }
}
impl_hex!(MerkleNode);
impl_hex!(IdCommitment);
impl_hex!(Nullifier);

impl MerkleNode {
    /// Constant-time equality.
    #[must_use]
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl IdCommitment {
    /// Constant-time equality.
    #[must_use]
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl fmt::Debug for IdSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdSecret(<redacted>)")
    }
}

/// The local participant's membership key pair. Never leaves the node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct IdentityCredential {
    pub secret: IdSecret,
    pub commitment: IdCommitment,
}

/// Rate-limit proof attached to a message, with every field at its exact width.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RateLimitProof {
    pub proof: ZkProof,
    pub merkle_root: MerkleNode,
    pub epoch: Epoch,
    pub share_x: MerkleNode,
    pub share_y: MerkleNode,
    pub nullifier: Nullifier,
    pub rln_identifier: RlnIdentifier,
}

/// Rate-limit proof as handed over by the message decoder: field widths are unchecked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WireRateLimitProof {
    pub proof: Vec<u8>,
    pub merkle_root: Vec<u8>,
    pub epoch: Vec<u8>,
    pub share_x: Vec<u8>,
    pub share_y: Vec<u8>,
    pub nullifier: Vec<u8>,
    pub rln_identifier: Vec<u8>,
}

impl TryFrom<&WireRateLimitProof> for RateLimitProof {
    type Error = DecodeError;

    fn try_from(w: &WireRateLimitProof) -> Result<Self, Self::Error> {
        Ok(Self {
            proof: ZkProof::try_from(w.proof.as_slice())?,
            merkle_root: MerkleNode::try_from(w.merkle_root.as_slice())?,
            epoch: Epoch::try_from(w.epoch.as_slice())?,
            share_x: MerkleNode::try_from(w.share_x.as_slice())?,
            share_y: MerkleNode::try_from(w.share_y.as_slice())?,
            nullifier: Nullifier::try_from(w.nullifier.as_slice())?,
            rln_identifier: RlnIdentifier::try_from(w.rln_identifier.as_slice())?,
        })
    }
}

impl From<&RateLimitProof> for WireRateLimitProof {
    fn from(p: &RateLimitProof) -> Self {
        Self {
            proof: p.proof.0.to_vec(),
            merkle_root: p.merkle_root.0.to_vec(),
            epoch: p.epoch.0.to_vec(),
            share_x: p.share_x.0.to_vec(),
            share_y: p.share_y.0.to_vec(),
            nullifier: p.nullifier.0.to_vec(),
            rln_identifier: p.rln_identifier.0.to_vec(),
        }
    }
}

/// Inbound pub/sub message as seen by the validator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    pub payload: Vec<u8>,
    pub content_topic: String,
    pub rate_limit_proof: Option<RateLimitProof>,
}

/// Outcome of validating one message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageValidationResult {
    /// Local or engine fault; says nothing about the sender.
    Error,
    Valid,
    Invalid,
    Spam,
}

/// Parse a static group from hex-encoded commitments, keeping list order.
pub fn parse_static_group<S: AsRef<str>>(keys: &[S]) -> Result<Vec<IdCommitment>, DecodeError> {
    keys.iter().map(|k| k.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commitment_hex_accepts_prefix_and_rejects_short() {
        let hex_key = "0x".to_owned() + &"ab".repeat(32);
        let c: IdCommitment = hex_key.parse().unwrap();
        assert_eq!(c.0, [0xab; 32]);
        assert_eq!(c.to_string(), "ab".repeat(32));

        let err = "abcd".parse::<IdCommitment>().unwrap_err();
        assert_eq!(err, DecodeError::InvalidLength { field: "id_commitment", expected: 32, got: 2 });
        assert!(matches!("zz".parse::<IdCommitment>(), Err(DecodeError::InvalidHex(_))));
    }

    #[test]
    fn static_group_keeps_order() {
        let keys = ["01".repeat(32), "02".repeat(32), "03".repeat(32)];
        let group = parse_static_group(&keys).unwrap();
        assert_eq!(group, vec![IdCommitment([1; 32]), IdCommitment([2; 32]), IdCommitment([3; 32])]);
    }

    #[test]
    fn wire_proof_field_widths_are_checked() {
        let proof = RateLimitProof {
            proof: ZkProof([7; PROOF_LEN]),
            merkle_root: MerkleNode([1; 32]),
            epoch: Epoch([2; 32]),
            share_x: MerkleNode([3; 32]),
            share_y: MerkleNode([4; 32]),
            nullifier: Nullifier([5; 32]),
            rln_identifier: RlnIdentifier([6; 32]),
        };
        let mut wire = WireRateLimitProof::from(&proof);
        assert_eq!(RateLimitProof::try_from(&wire).unwrap(), proof);

        wire.nullifier.pop();
        assert_eq!(
            RateLimitProof::try_from(&wire).unwrap_err(),
            DecodeError::InvalidLength { field: "nullifier", expected: 32, got: 31 }
        );
    }

    #[test]
    fn secret_is_redacted_in_debug() {
        let cred = IdentityCredential { secret: IdSecret([0xee; 32]), commitment: IdCommitment([1; 32]) };
        let shown = format!("{cred:?}");
        assert!(shown.contains("<redacted>"));
        assert!(!shown.contains("238"));
    }
}
