use tracing::Span;

use super::GroupManager;
use crate::engine::{MembershipEngine, SharedEngine, SharedRoots};
use crate::errors::RlnError;
use crate::types::{IdCommitment, IdentityCredential, MembershipIndex};

/// Group manager for a membership list fixed in configuration.
///
/// The list is inserted into the engine once, in order, by [`start`](GroupManager::start)
/// and dropped afterwards. Later members arrive through
/// [`insert_member`](GroupManager::insert_member).
pub struct StaticGroupManager<E> {
    span: Span,
    identity_credential: Option<IdentityCredential>,
    membership_index: Option<MembershipIndex>,
    group: Vec<IdCommitment>,
    attached: Option<(SharedEngine<E>, SharedRoots)>,
}

impl<E: MembershipEngine> StaticGroupManager<E> {
    /// Check that `credential` sits at `index` in `group`.
    ///
    /// Nothing touches the engine or the network before this check passes.
    pub fn new(
        group: Vec<IdCommitment>,
        credential: IdentityCredential,
        index: MembershipIndex,
        parent: &Span,
    ) -> Result<Self, RlnError> {
        let Some(member) = usize::try_from(index).ok().and_then(|i| group.get(i)) else {
            return Err(RlnError::IndexOutOfRange { index, group_size: group.len() });
        };
        if !member.ct_eq(&credential.commitment) {
            return Err(RlnError::MembershipMismatch { index });
        }

        Ok(Self {
            span: tracing::info_span!(parent: parent, "rln_static"),
            identity_credential: Some(credential),
            membership_index: Some(index),
            group,
            attached: None,
        })
    }

    /// Manager with no local identity, as a relay-only node would hold.
    #[cfg(test)]
    fn unconfigured(group: Vec<IdCommitment>, parent: &Span) -> Self {
        Self {
            span: tracing::info_span!(parent: parent, "rln_static"),
            identity_credential: None,
            membership_index: None,
            group,
            attached: None,
        }
    }

    /// Members still waiting to be inserted; zero once bootstrap has succeeded.
    #[must_use]
    pub fn pending_members(&self) -> usize {
        self.group.len()
    }

    fn bootstrap(&self, engine: &SharedEngine<E>, roots: &SharedRoots) -> Result<(), RlnError> {
        let mut engine = engine.write();
        let mut roots = roots.write();

        // The engine may hold a tree from a previous run.
        roots.sync(&*engine)?;

        for member in &self.group {
            let index = engine.insert_member(member)?;
            tracing::debug!(parent: &self.span, index, member = %member, "static member inserted");
            roots.sync(&*engine)?;
        }
        Ok(())
    }
}

impl<E: MembershipEngine> GroupManager<E> for StaticGroupManager<E> {
    fn start(&mut self, engine: SharedEngine<E>, roots: SharedRoots) -> Result<(), RlnError> {
        tracing::info!(
            parent: &self.span,
            members = self.group.len(),
            "mounting rln-relay in off-chain/static mode"
        );

        if let Err(e) = self.bootstrap(&engine, &roots) {
            tracing::error!(parent: &self.span, error = %e, "static group bootstrap aborted");
            return Err(e);
        }

        self.group = Vec::new();
        self.attached = Some((engine, roots));
        tracing::info!(parent: &self.span, "static group loaded");
        Ok(())
    }

    fn insert_member(&mut self, commitment: IdCommitment) -> Result<MembershipIndex, RlnError> {
        let Some((engine, roots)) = &self.attached else {
            return Err(RlnError::NotStarted);
        };
        tracing::debug!(parent: &self.span, pubkey = %commitment, "a new key is added");

        let mut engine = engine.write();
        let index = engine.insert_member(&commitment).map_err(|e| {
            tracing::error!(parent: &self.span, error = %e, "inserting member into merkle tree");
            e
        })?;

        // Tree and window disagree if this fails; the caller must not carry on.
        roots.write().sync(&*engine).map_err(|e| {
            tracing::error!(parent: &self.span, index, error = %e, "root window out of sync with tree");
            e
        })?;
        Ok(index)
    }

    fn identity_credential(&self) -> Result<IdentityCredential, RlnError> {
        self.identity_credential.ok_or(RlnError::NotConfigured("identity credential"))
    }

    fn membership_index(&self) -> Result<MembershipIndex, RlnError> {
        self.membership_index.ok_or(RlnError::NotConfigured("membership index"))
    }

    fn stop(&mut self) {}
}
