use crate::types::Message;

/// Signal a proof is bound to: `payload || content_topic` (UTF-8 bytes, no separator).
///
/// Prover and verifier must build this identically, so nothing is normalized.
#[must_use]
pub fn to_rln_signal(payload: &[u8], content_topic: &str) -> Vec<u8> {
    let mut v = Vec::with_capacity(payload.len() + content_topic.len());
    v.extend_from_slice(payload);
    v.extend_from_slice(content_topic.as_bytes());
    v
}

impl Message {
    #[must_use]
    pub fn signal(&self) -> Vec<u8> {
        to_rln_signal(&self.payload, &self.content_topic)
    }
}
