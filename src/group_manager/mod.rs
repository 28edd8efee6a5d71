//! Group membership managers.
//!
//! A manager decides which commitments enter the membership tree and in what
//! order, and keeps the root window in step with every insertion. The static
//! variant bootstraps a fixed member list; other variants (e.g. fed by an
//! on-chain registry) share the same lifecycle.

mod static_manager;

pub use static_manager::StaticGroupManager;

use crate::engine::{MembershipEngine, SharedEngine, SharedRoots};
use crate::errors::RlnError;
use crate::types::{IdCommitment, IdentityCredential, MembershipIndex};

/// Lifecycle shared by every group manager variant.
pub trait GroupManager<E: MembershipEngine> {
    /// Attach to the node's engine and root window and load the initial members.
    fn start(&mut self, engine: SharedEngine<E>, roots: SharedRoots) -> Result<(), RlnError>;

    /// Append a member at the next leaf. Callers must deliver members in the
    /// same order on every participant.
    fn insert_member(&mut self, commitment: IdCommitment) -> Result<MembershipIndex, RlnError>;

    fn identity_credential(&self) -> Result<IdentityCredential, RlnError>;

    fn membership_index(&self) -> Result<MembershipIndex, RlnError>;

    /// Release background work, if any.
    fn stop(&mut self);
}
