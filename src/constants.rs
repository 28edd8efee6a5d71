/// Length of every hash-sized field (roots, commitments, epochs, nullifiers, shares).
pub const HASH_LEN: usize = 32;

/// Length of the zkSNARK proof bytes.
pub const PROOF_LEN: usize = 128;

/// proof(128) || root || epoch || share_x || share_y || nullifier || rln_identifier
pub const SERIALIZED_PROOF_LEN: usize = PROOF_LEN + 6 * HASH_LEN; // 320 bytes

/// Length of one epoch in seconds.
pub const EPOCH_UNIT_SECONDS: u64 = 10;

/// Maximum clock difference between peers in seconds.
pub const MAX_CLOCK_GAP_SECONDS: u64 = 20;

/// Maximum allowed distance between a proof's epoch and the local epoch.
pub const MAX_EPOCH_GAP: u64 = MAX_CLOCK_GAP_SECONDS / EPOCH_UNIT_SECONDS;

/// Number of recent roots a proof may be built against.
pub const ACCEPTABLE_ROOT_WINDOW_SIZE: usize = 5;
