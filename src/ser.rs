use crate::{
    constants::{HASH_LEN, PROOF_LEN, SERIALIZED_PROOF_LEN},
    errors::DecodeError,
    types::{Epoch, MerkleNode, Nullifier, RateLimitProof, RlnIdentifier, ZkProof},
};

impl RateLimitProof {
    /// Canonical proof encoding.
    /// Order is fixed; lengths are exact; no trailing bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SERIALIZED_PROOF_LEN] {
        let mut out = [0u8; SERIALIZED_PROOF_LEN];
        let mut off = 0usize;
        out[off..off + PROOF_LEN].copy_from_slice(&self.proof.0); off += PROOF_LEN;
        for field in [
            &self.merkle_root.0,
            &self.epoch.0,
            &self.share_x.0,
            &self.share_y.0,
            &self.nullifier.0,
            &self.rln_identifier.0,
        ] {
            out[off..off + HASH_LEN].copy_from_slice(field);
            off += HASH_LEN;
        }
        out
    }

    /// Decode a proof from its canonical encoding.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidLength` unless `data` is exactly `SERIALIZED_PROOF_LEN` bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() != SERIALIZED_PROOF_LEN {
            return Err(DecodeError::InvalidLength {
                field: "rate_limit_proof",
                expected: SERIALIZED_PROOF_LEN,
                got: data.len(),
            });
        }

        let (proof, rest) = data.split_at(PROOF_LEN);
        let mut fields = rest.chunks_exact(HASH_LEN);
        let mut next = || fields.next().unwrap_or_default();

        Ok(Self {
            proof: ZkProof::try_from(proof)?,
            merkle_root: MerkleNode::try_from(next())?,
            epoch: Epoch::try_from(next())?,
            share_x: MerkleNode::try_from(next())?,
            share_y: MerkleNode::try_from(next())?,
            nullifier: Nullifier::try_from(next())?,
            rln_identifier: RlnIdentifier::try_from(next())?,
        })
    }
}
