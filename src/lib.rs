#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::result_large_err
)]

//! RLN relay core - static membership and message validation
//!
//! This crate implements the admission side of Rate-Limiting-Nullifier spam
//! protection for a pub/sub relay: it bootstraps a static membership group
//! into the node's membership tree, keeps a window of recently valid tree
//! roots, and classifies inbound messages by their rate-limit proof.
//!
//! The zero-knowledge engine (tree storage, proof verification, nullifier
//! tracking) is plugged in through [`MembershipEngine`].

// Fixed parameters:
// - Epoch unit: 10 s, clock-gap tolerance: 20 s (max epoch gap 2)
// - Root window: 5 roots, oldest evicted first
// - Signal: payload || content topic, no separator
// - Proof encoding: 320 bytes, proof(128) followed by six 32-byte fields

pub mod constants;
pub mod config;
pub mod types;
pub mod errors;
pub mod ser;
pub mod epoch;
pub mod signal;
pub mod engine;
pub mod root_tracker;
pub mod group_manager;
pub mod validator;

pub use types::*;
pub use config::RlnConfig;
pub use errors::{ConfigError, DecodeError, EngineError, RlnError, SpamHandlerError, SyncError};
pub use engine::{MembershipEngine, SharedEngine, SharedRoots};
pub use root_tracker::MerkleRootTracker;
pub use group_manager::{GroupManager, StaticGroupManager};
pub use signal::to_rln_signal;
pub use validator::{RlnValidator, SpamHandler};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
