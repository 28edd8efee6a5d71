use thiserror::Error;

use crate::types::MembershipIndex;

/// Failure reported by the membership engine (tree storage, root computation,
/// proof verification or rate tracking).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("member insertion failed: {0}")]
    Insertion(String),

    #[error("merkle root unavailable: {0}")]
    Root(String),

    #[error("proof verification failed to run: {0}")]
    Verification(String),

    #[error("rate check failed to run: {0}")]
    RateCheck(String),
}

/// The root window could not be refreshed; its previous contents are intact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("root window sync failed")]
pub struct SyncError(#[source] pub EngineError);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("invalid length for {field}: expected {expected} got {got}")]
    InvalidLength { field: &'static str, expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("epoch unit must be at least one second")]
    ZeroEpochUnit,

    #[error("root window must hold at least one root")]
    EmptyRootWindow,

    #[error("root window holds {actual} roots but config asks for {configured}")]
    RootWindowMismatch { configured: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum RlnError {
    #[error("identity commitment does not match group member at index {index}")]
    MembershipMismatch { index: MembershipIndex },

    #[error("membership index {index} out of range for group of {group_size}")]
    IndexOutOfRange { index: MembershipIndex, group_size: usize },

    #[error("{0} has not been set up")]
    NotConfigured(&'static str),

    #[error("group manager has not been started")]
    NotStarted,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Returned by a spam handler; logged, never changes the classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("spam handler failed: {0}")]
pub struct SpamHandlerError(pub String);
