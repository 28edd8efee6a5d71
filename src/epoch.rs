use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::Epoch;

impl Epoch {
    /// Epoch number `n` encoded as LE64 in the first 8 bytes, rest zero.
    #[must_use]
    pub fn from_u64(n: u64) -> Self {
        let mut out = [0u8; 32];
        out[..8].copy_from_slice(&n.to_le_bytes());
        Self(out)
    }

    /// Epoch number read from the first 8 bytes; the remaining bytes are ignored.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        let mut b = [0u8; 8];
        b.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(b)
    }

    /// Epoch containing `unix_seconds`. `unit_seconds` must be non-zero
    /// (see [`crate::RlnConfig::validate`]); zero is treated as one second.
    #[must_use]
    pub fn from_unix_seconds(unix_seconds: u64, unit_seconds: u64) -> Self {
        Self::from_u64(unix_seconds / unit_seconds.max(1))
    }

    /// Epoch of the system clock. A clock before 1970 maps to epoch 0.
    #[must_use]
    pub fn current(unit_seconds: u64) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self::from_unix_seconds(now, unit_seconds)
    }

    /// Absolute distance between two epochs, in epochs.
    #[must_use]
    pub fn distance(&self, other: &Self) -> u64 {
        self.as_u64().abs_diff(other.as_u64())
    }
}
